//! Fact-check prompt and the output grammar the parser expects back.

pub const VERDICT_PREFIX: &str = "VERDICT:";
pub const CONFIDENCE_PREFIX: &str = "CONFIDENCE:";
pub const EXPLANATION_MARKER: &str = "EXPLANATION_START";

/// Sampling temperature for fact-check requests; kept low for near-deterministic output.
pub const FACT_CHECK_TEMPERATURE: f32 = 0.1;

/// Build the grounded fact-check prompt for `claim`.
///
/// The claim is embedded verbatim; callers reject blank claims before this point.
///
/// ```
/// use veritas_llm::prompt::{build_prompt, EXPLANATION_MARKER};
///
/// let prompt = build_prompt("The Great Wall of China is visible from space.");
/// assert!(prompt.contains("CLAIM: \"The Great Wall of China is visible from space.\""));
/// assert!(prompt.contains(EXPLANATION_MARKER));
/// ```
pub fn build_prompt(claim: &str) -> String {
    format!(
        r#"You are a professional fact-checker. Verify the following claim using Google Search.

CLAIM: "{claim}"

Strictly follow this output format:
Line 1: {VERDICT_PREFIX} [REAL | FAKE | MISLEADING | SATIRE | UNVERIFIED]
Line 2: {CONFIDENCE_PREFIX} [Number between 0-100]
Line 3: {EXPLANATION_MARKER}
[A comprehensive, unbiased explanation in Markdown format. Cite the specific details you found in search.]

Do not add any other introductory text."#
    )
}
