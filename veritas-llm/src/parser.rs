//! Turns the model's marker-delimited reply into an [`AnalysisResult`].
//!
//! Parsing never fails. Missing or malformed sections fall back to
//! [`Verdict::Unknown`], a confidence of `0`, an empty explanation, and the
//! sources recoverable from citation metadata alone.
use crate::prompt::{CONFIDENCE_PREFIX, EXPLANATION_MARKER, VERDICT_PREFIX};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use veritas_common::{AnalysisResult, GroundingChunk, Source, Verdict};

static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+").expect("static regex"));

/// Parse raw model text plus optional grounding chunks.
///
/// ```
/// use veritas_common::{GroundingChunk, Verdict};
/// use veritas_llm::parser::parse_response;
///
/// let text = "VERDICT: FAKE\nCONFIDENCE: 92\nEXPLANATION_START\nNot true.";
/// let chunks = [GroundingChunk::web("https://example.com/a", "Example A")];
/// let result = parse_response(text, Some(&chunks));
///
/// assert_eq!(result.verdict, Verdict::Fake);
/// assert_eq!(result.confidence_score, 92);
/// assert_eq!(result.explanation, "Not true.");
/// assert_eq!(result.sources.len(), 1);
/// ```
pub fn parse_response(text: &str, chunks: Option<&[GroundingChunk]>) -> AnalysisResult {
    let mut verdict = Verdict::Unknown;
    let mut confidence_score = 0;
    let mut explanation = String::new();
    let mut collecting = false;

    for line in text.split('\n') {
        if line.trim() == EXPLANATION_MARKER {
            collecting = true;
        } else if collecting {
            explanation.push_str(line);
            explanation.push('\n');
        } else if let Some(rest) = line.strip_prefix(VERDICT_PREFIX) {
            verdict = match_verdict(rest);
        } else if let Some(rest) = line.strip_prefix(CONFIDENCE_PREFIX) {
            confidence_score = parse_confidence(rest);
        }
    }

    AnalysisResult {
        verdict,
        confidence_score,
        explanation: explanation.trim().to_string(),
        sources: collect_sources(chunks.unwrap_or_default()),
    }
}

/// Substring match against the verdict tokens in priority order.
///
/// `"NOT REAL"` therefore resolves to `Real`; the model is asked for a bare token.
fn match_verdict(raw: &str) -> Verdict {
    let value = raw.trim().to_uppercase();
    Verdict::MATCH_ORDER
        .into_iter()
        .find(|v| value.contains(v.as_str()))
        .unwrap_or(Verdict::Unknown)
}

/// Leading base-10 integer, so `"85%"` gives 85. Anything else, including
/// values that overflow `i64`, gives 0.
fn parse_confidence(raw: &str) -> i64 {
    LEADING_INTEGER
        .find(raw.trim())
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Web-backed chunks as sources, unique by URI, first occurrence kept.
fn collect_sources(chunks: &[GroundingChunk]) -> Vec<Source> {
    let mut seen = HashSet::new();
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter(|web| seen.insert(web.uri.as_str()))
        .map(|web| Source::new(web.title.as_str(), web.uri.as_str()))
        .collect()
}
