//! Search-grounded fact checking for Veritas.
//!
//! The pipeline is three small steps: [`prompt::build_prompt`] formats the
//! claim, a [`traits::GroundedClient`] (concretely [`gemini::GeminiClient`])
//! calls the model with Google Search grounding, and
//! [`parser::parse_response`] turns the reply into an
//! [`veritas_common::AnalysisResult`]. [`traits::GroundedClient::check_fact`]
//! runs all three.
//!
//! # Examples
//! ```no_run
//! use veritas_llm::{gemini::GeminiClient, traits::GroundedClient};
//!
//! # #[tokio::main]
//! # async fn main() -> veritas_common::Result<()> {
//! let client = GeminiClient::new("api-key".into(), "gemini-2.5-flash".into())?;
//! let result = client.check_fact("The Great Wall of China is visible from space.").await?;
//! println!("{} ({}%)", result.verdict, result.confidence_score);
//! # Ok(())
//! # }
//! ```
pub mod gemini;
pub mod parser;
pub mod prompt;
pub mod traits;

pub use gemini::GeminiClient;
pub use parser::parse_response;
pub use traits::{GroundedClient, GroundedResponse};
