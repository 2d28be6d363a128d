//! Common types and utilities shared across Veritas crates.
//!
//! This crate defines the fact-check data model, observability helpers, and
//! the shared error type used throughout the Veritas workspace. It stays
//! dependency‑light so every other crate can depend on it.
//!
//! # Overview
//!
//! - [`Verdict`], [`Source`], [`AnalysisResult`]: the typed outcome of a check
//! - [`GroundingChunk`] and [`WebRef`]: citation metadata as delivered by the model
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`VeritasError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use veritas_common::{AnalysisResult, Verdict};
//!
//! let result = AnalysisResult::default();
//! assert_eq!(result.verdict, Verdict::Unknown);
//! assert_eq!(result.confidence_score, 0);
//! assert!(result.sources.is_empty());
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod observability;

/// Categorical outcome of fact-checking a claim.
///
/// `Unknown` is never requested from the model; it is the value the parser
/// falls back to when no recognisable verdict token is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Real,
    Fake,
    Misleading,
    Satire,
    Unverified,
    #[default]
    Unknown,
}

impl Verdict {
    /// Verdicts the model may answer with, in matching priority order.
    pub const MATCH_ORDER: [Verdict; 5] = [
        Verdict::Real,
        Verdict::Fake,
        Verdict::Misleading,
        Verdict::Satire,
        Verdict::Unverified,
    ];

    /// Upper-case wire token, e.g. `"MISLEADING"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Real => "REAL",
            Verdict::Fake => "FAKE",
            Verdict::Misleading => "MISLEADING",
            Verdict::Satire => "SATIRE",
            Verdict::Unverified => "UNVERIFIED",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cited web page backing the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

impl Source {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }

    /// Host component of the URI, if it parses as an absolute URL.
    ///
    /// ```
    /// use veritas_common::Source;
    ///
    /// let s = Source::new("Example", "https://www.example.com/a?b=c");
    /// assert_eq!(s.host().as_deref(), Some("www.example.com"));
    /// assert_eq!(Source::new("x", "not a url").host(), None);
    /// ```
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.uri)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}

/// Web reference carried by a grounding chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebRef {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

/// One unit of grounding metadata returned alongside the model text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebRef>,
}

impl GroundingChunk {
    pub fn web(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            web: Some(WebRef {
                uri: uri.into(),
                title: title.into(),
            }),
        }
    }
}

/// Typed result of a single fact-check.
///
/// Built fresh per request and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    /// Nominally 0-100; values outside that range are kept as reported.
    pub confidence_score: i64,
    /// Markdown prose, trimmed.
    pub explanation: String,
    /// Cited sources, unique by `uri`, in first-seen order.
    pub sources: Vec<Source>,
}

/// Error types used across the Veritas system.
#[derive(thiserror::Error, Debug)]
pub enum VeritasError {
    /// The external model call failed (network, auth, or service error).
    #[error("Transport error: {0}")]
    Transport(String),

    /// An actor could not complete a requested operation.
    #[error("Actor error: {0}")]
    Actor(String),

    /// A lower-level component reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`VeritasError`].
pub type Result<T> = std::result::Result<T, VeritasError>;
