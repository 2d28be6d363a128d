/// Canned claims offered on the idle screen, as `(label, claim)`.
pub const EXAMPLE_CLAIMS: [(&str, &str); 3] = [
    (
        "8 glasses of water rule?",
        "Drinking 8 glasses of water a day is mandatory for health.",
    ),
    (
        "Moon landing 1969",
        "Did humans actually land on the moon in 1969?",
    ),
    (
        "Great Wall from space",
        "The Great Wall of China is visible from space.",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Try(usize),      // /try <n>, 1-based
    Clear,           // /clear
    Help,            // /help
    Quit,            // /quit or /exit
    Invalid(String), // /try with a missing or bad index
}

/// Parse a submitted line as a command.
///
/// Only the known verbs count. Anything else, including text that merely
/// starts with `/` such as `/r/worldnews says ...`, is `None` and should be
/// checked as a claim.
pub fn parse_command(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let rest = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let cmd = match verb {
        "/try" => match rest.and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if (1..=EXAMPLE_CLAIMS.len()).contains(&n) => Command::Try(n),
            _ => Command::Invalid(trimmed.to_string()),
        },
        "/clear" => Command::Clear,
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

/// Claim text for a 1-based `/try` index.
pub fn example_claim(n: usize) -> Option<&'static str> {
    n.checked_sub(1)
        .and_then(|i| EXAMPLE_CLAIMS.get(i))
        .map(|(_, claim)| *claim)
}
