use crate::{command::EXAMPLE_CLAIMS, input::InputBuffer, state::Phase, styles};
use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};
use textwrap::wrap;
use veritas_common::AnalysisResult;

pub const PENDING_TEXT: &str = "Cross-referencing global sources…";
pub const NO_SOURCES_TEXT: &str =
    "No direct web sources were cited by the analysis engine, but internal knowledge was applied.";

const MAX_INPUT_ROWS: u16 = 6;

pub struct ViewSnap<'a> {
    pub input: &'a InputBuffer,
    pub phase: &'a Phase,
    /// Explanation scroll offset, in wrapped lines from the top.
    pub scroll: u16,
    pub spinner: &'static str,
    pub notice: Option<&'a str>,
}

/// Render one frame. Returns the explanation scroll offset actually used,
/// which is `snap.scroll` bounded by the wrapped text height.
pub fn draw<B: Backend>(term: &mut Terminal<B>, snap: &ViewSnap) -> Result<u16> {
    let mut shown_scroll = 0;
    term.draw(|frame| {
        let area = frame.area();
        let input_rows = snap.input.line_count().clamp(2, usize::from(MAX_INPUT_ROWS)) as u16;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(input_rows + 2),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new(vec![
            Line::from(Span::styled(" Veritas ", styles::title())),
            Line::from(Span::styled(
                " Verify rumors, news, and claims using AI grounding and real-time search.",
                styles::dim(),
            )),
        ]);
        frame.render_widget(header, layout[0]);

        draw_input(frame, layout[1], snap, input_rows);

        match snap.phase {
            Phase::Idle => draw_examples(frame, layout[2]),
            Phase::Pending { claim, .. } => draw_pending(frame, layout[2], claim, snap.spinner),
            Phase::Failed(message) => draw_error(frame, layout[2], message),
            Phase::Succeeded(result) => {
                shown_scroll = draw_result(frame, layout[2], result, snap.scroll);
            }
        }

        // Status bar
        let mut status_line = vec![Span::raw(" ")];
        if matches!(snap.phase, Phase::Pending { .. }) {
            status_line.push(Span::styled(snap.spinner, styles::busy()));
            status_line.push(Span::raw(" "));
            status_line.push(Span::styled(PENDING_TEXT, styles::busy()));
        } else {
            status_line.push(Span::styled("Ready", styles::label()));
        }
        if let Some(notice) = snap.notice {
            status_line.push(Span::styled(" • ", styles::dim()));
            status_line.push(Span::styled(notice, styles::value()));
        }
        let status = Paragraph::new(Line::from(status_line))
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        frame.render_widget(status, layout[3]);
    })?;

    Ok(shown_scroll)
}

fn draw_input(frame: &mut Frame, area: Rect, snap: &ViewSnap, visible_rows: u16) {
    let (row, col) = snap.input.caret();
    let offset = row.saturating_sub(visible_rows.saturating_sub(1));

    let text = if snap.input.text().is_empty() {
        Paragraph::new(Span::styled(
            "Paste a rumor, news headline, or claim here...",
            styles::dim(),
        ))
    } else {
        Paragraph::new(snap.input.text()).scroll((offset, 0))
    };
    let input_box = text.block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Claim ")
            .title_bottom(Line::from(" Enter: check • Shift+Enter: new line ").right_aligned()),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(input_box, area);

    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    frame.set_cursor_position(Position {
        x: area.x.saturating_add(1).saturating_add(col).min(max_x),
        y: area.y.saturating_add(1).saturating_add(row - offset),
    });
}

fn draw_examples(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled("Try asking:", styles::label())),
        Line::default(),
    ];
    for (i, (label, _)) in EXAMPLE_CLAIMS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  /try {}  ", i + 1), styles::link()),
            Span::styled(format!("\"{label}\""), styles::value()),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "/help for commands • Ctrl-C to quit",
        styles::dim(),
    )));

    let body = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn draw_pending(frame: &mut Frame, area: Rect, claim: &str, spinner: &str) {
    let mut lines = vec![
        Line::default(),
        Line::from(vec![
            Span::styled(spinner.to_string(), styles::busy()),
            Span::raw(" "),
            Span::styled(PENDING_TEXT, styles::busy()),
        ]),
        Line::default(),
    ];
    lines.extend(
        claim
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), styles::dim()))),
    );

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Checking "));
    frame.render_widget(body, area);
}

fn draw_error(frame: &mut Frame, area: Rect, message: &str) {
    let body = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(message.to_string(), styles::error())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::error())
            .title(" Error "),
    );
    frame.render_widget(body, area);
}

fn draw_result(frame: &mut Frame, area: Rect, result: &AnalysisResult, scroll: u16) -> u16 {
    let color = styles::verdict_color(result.verdict);
    let card = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(" Result ");
    let inner = card.inner(area);
    frame.render_widget(card, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(inner);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    let verdict = Paragraph::new(vec![
        Line::from(Span::styled(" VERDICT", styles::label())),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(styles::verdict_icon(result.verdict), styles::verdict(result.verdict)),
            Span::raw(" "),
            Span::styled(result.verdict.as_str(), styles::verdict(result.verdict)),
        ]),
    ]);
    frame.render_widget(verdict, top[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Confidence "))
        .gauge_style(Style::default().fg(color))
        .percent(gauge_percent(result.confidence_score))
        .label(format!("{}%", result.confidence_score));
    frame.render_widget(gauge, top[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(rows[1]);

    // Explanation, pre-wrapped so the scroll offset can be bounded.
    let explanation_block = Block::default()
        .borders(Borders::TOP)
        .title(Span::styled(" Analysis & Reasoning ", styles::label()));
    let text_area = explanation_block.inner(bottom[0]);
    let wrapped = wrap_text(&result.explanation, text_area.width as usize);
    let visible = text_area.height as usize;
    let start = (scroll as usize).min(wrapped.len().saturating_sub(visible));
    let lines: Vec<Line> = wrapped
        .into_iter()
        .skip(start)
        .take(visible)
        .map(|l| Line::from(Span::styled(l, styles::value())))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(explanation_block), bottom[0]);

    let sources_block = Block::default()
        .borders(Borders::TOP | Borders::LEFT)
        .title(Span::styled(" Verified Sources ", styles::label()));
    let sources = if result.sources.is_empty() {
        Paragraph::new(Span::styled(
            NO_SOURCES_TEXT,
            styles::dim().add_modifier(Modifier::ITALIC),
        ))
    } else {
        let mut lines = Vec::with_capacity(result.sources.len() * 2);
        for source in &result.sources {
            lines.push(Line::from(vec![
                Span::styled("↗ ", styles::link()),
                Span::styled(source.title.clone(), styles::link()),
            ]));
            let host = source.host().unwrap_or_else(|| source.uri.clone());
            lines.push(Line::from(Span::styled(format!("  {host}"), styles::dim())));
        }
        Paragraph::new(lines)
    };
    frame.render_widget(
        sources.wrap(Wrap { trim: true }).block(sources_block),
        bottom[1],
    );

    start as u16
}

/// Gauge fill for a confidence score; only the drawing is clamped.
pub fn gauge_percent(score: i64) -> u16 {
    score.clamp(0, 100) as u16
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let effective_width = width.max(1);
    let mut out = Vec::new();
    for raw_line in text.split('\n') {
        if raw_line.is_empty() {
            out.push(String::new());
            continue;
        }
        let segments = wrap(raw_line, effective_width);
        if segments.is_empty() {
            out.push(String::new());
        } else {
            out.extend(segments.into_iter().map(|seg| seg.into_owned()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use veritas_common::{Source, Verdict};

    fn render(phase: &Phase, input: &InputBuffer, scroll: u16) -> String {
        render_with_scroll(phase, input, scroll).0
    }

    fn render_with_scroll(phase: &Phase, input: &InputBuffer, scroll: u16) -> (String, u16) {
        let mut term = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let snap = ViewSnap {
            input,
            phase,
            scroll,
            spinner: "⠋",
            notice: Some("hello notice"),
        };
        let shown = draw(&mut term, &snap).unwrap();

        let buffer = term.backend().buffer();
        let width = buffer.area.width as usize;
        let screen = buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        (screen, shown)
    }

    fn result(sources: Vec<Source>, confidence_score: i64) -> AnalysisResult {
        AnalysisResult {
            verdict: Verdict::Misleading,
            confidence_score,
            explanation: "Partly true.\n\nThe figure is outdated.".into(),
            sources,
        }
    }

    #[test]
    fn idle_lists_examples_and_placeholder() {
        let screen = render(&Phase::Idle, &InputBuffer::default(), 0);
        assert!(screen.contains("Try asking:"));
        assert!(screen.contains("/try 1"));
        assert!(screen.contains("\"Great Wall from space\""));
        assert!(screen.contains("Paste a rumor"));
        assert!(screen.contains("Ready"));
        assert!(screen.contains("hello notice"));
    }

    #[test]
    fn pending_shows_spinner_text() {
        let phase = Phase::Pending {
            token: 1,
            claim: "Cats can fly".into(),
        };
        let mut input = InputBuffer::default();
        input.set("Cats can fly");
        let screen = render(&phase, &input, 0);
        assert!(screen.contains(PENDING_TEXT));
        assert!(screen.contains("Checking"));
    }

    #[test]
    fn failure_shows_message() {
        let phase = Phase::Failed("Failed to verify the claim.".into());
        let screen = render(&phase, &InputBuffer::default(), 0);
        assert!(screen.contains("Failed to verify the claim."));
        assert!(!screen.contains("Try asking:"));
    }

    #[test]
    fn result_card_shows_verdict_score_and_hosts() {
        let phase = Phase::Succeeded(result(
            vec![Source::new("Fact sheet", "https://www.who.int/facts")],
            85,
        ));
        let screen = render(&phase, &InputBuffer::default(), 0);
        assert!(screen.contains("MISLEADING"));
        assert!(screen.contains("85%"));
        assert!(screen.contains("Partly true."));
        assert!(screen.contains("Fact sheet"));
        assert!(screen.contains("www.who.int"));
        assert!(!screen.contains("No direct web sources"));
    }

    #[test]
    fn result_without_sources_shows_note_and_raw_score() {
        let phase = Phase::Succeeded(result(vec![], 150));
        let screen = render(&phase, &InputBuffer::default(), 0);
        assert!(screen.contains("No direct web sources"));
        assert!(screen.contains("150%"));
    }

    #[test]
    fn explanation_scroll_is_bounded() {
        let phase = Phase::Succeeded(result(vec![], 10));
        let (screen, shown) = render_with_scroll(&phase, &InputBuffer::default(), u16::MAX);
        assert!(screen.contains("The figure is outdated."));
        // Three wrapped lines fit without scrolling.
        assert_eq!(shown, 0);

        let long = AnalysisResult {
            explanation: (1..=60).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n"),
            ..result(vec![], 10)
        };
        let (screen, shown) =
            render_with_scroll(&Phase::Succeeded(long), &InputBuffer::default(), u16::MAX);
        assert!(shown > 0);
        assert!(screen.contains("line 60"));
        assert!(!screen.contains("line 1 "));
    }

    #[test]
    fn huge_paste_keeps_cursor_in_claim_box() {
        let mut input = InputBuffer::default();
        input.insert_str(&"claim\n".repeat(70_000));

        let mut term = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let snap = ViewSnap {
            input: &input,
            phase: &Phase::Idle,
            scroll: 0,
            spinner: " ",
            notice: None,
        };
        draw(&mut term, &snap).unwrap();

        // Header is two rows; the box interior spans the next MAX_INPUT_ROWS.
        let cursor = term.get_cursor_position().unwrap();
        assert!((3..3 + MAX_INPUT_ROWS).contains(&cursor.y), "{cursor:?}");
    }

    #[test]
    fn gauge_percent_clamps_for_drawing_only() {
        assert_eq!(gauge_percent(-5), 0);
        assert_eq!(gauge_percent(42), 42);
        assert_eq!(gauge_percent(250), 100);
    }

    #[test]
    fn wrap_text_keeps_blank_lines() {
        let lines = wrap_text("one two three\n\nfour", 7);
        assert_eq!(lines, vec!["one two", "three", "", "four"]);
    }
}
