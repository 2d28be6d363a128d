use ratatui::style::{Color, Modifier, Style};
use veritas_common::Verdict;

// Emerald, rose, amber and slate, as RGB so they survive 256-colour themes.
const EMERALD: Color = Color::Rgb(52, 211, 153);
const ROSE: Color = Color::Rgb(244, 63, 94);
const AMBER: Color = Color::Rgb(251, 191, 36);
const SLATE: Color = Color::Rgb(148, 163, 184);

/// Accent colour for a verdict family.
pub fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Real => EMERALD,
        Verdict::Fake => ROSE,
        Verdict::Misleading | Verdict::Satire => AMBER,
        Verdict::Unverified | Verdict::Unknown => SLATE,
    }
}

pub fn verdict_icon(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Real => "✔",
        Verdict::Fake => "✘",
        _ => "⚠",
    }
}

pub fn verdict(verdict: Verdict) -> Style {
    Style::default()
        .fg(verdict_color(verdict))
        .add_modifier(Modifier::BOLD)
}

pub fn title() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn label() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD)
}

pub fn value() -> Style {
    Style::default().fg(Color::White)
}

pub fn link() -> Style {
    Style::default().fg(Color::LightBlue)
}

pub fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn busy() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}
