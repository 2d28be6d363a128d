use crate::{
    parser::parse_response,
    prompt::{build_prompt, FACT_CHECK_TEMPERATURE},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use veritas_common::{AnalysisResult, GroundingChunk, Result};

/// Raw reply from a search-grounded generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundedResponse {
    /// Generated text; empty when the model produced none.
    pub text: String,
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[async_trait]
pub trait GroundedClient: Send + Sync {
    /// Generate a single, complete response with live web-search grounding enabled.
    async fn generate_grounded(
        &self,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<GroundedResponse>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Sampling temperature used by [`GroundedClient::check_fact`].
    fn fact_check_temperature(&self) -> f32 {
        FACT_CHECK_TEMPERATURE
    }

    /// Fact-check a claim: prompt, call, parse.
    ///
    /// Transport failures are logged and returned unchanged; malformed model
    /// output never errors and instead degrades inside the parser.
    async fn check_fact(&self, claim: &str) -> Result<AnalysisResult> {
        let prompt = build_prompt(claim);
        tracing::debug!(model = %self.model_name(), claim_len = claim.len(), "fact_check.dispatch");

        let response = self
            .generate_grounded(&prompt, Some(self.fact_check_temperature()))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Fact check failed"))?;

        tracing::debug!(
            text_len = response.text.len(),
            chunks = response.grounding_chunks.as_ref().map_or(0, Vec::len),
            tokens_used = ?response.tokens_used,
            "fact_check.response"
        );

        Ok(parse_response(
            &response.text,
            response.grounding_chunks.as_deref(),
        ))
    }
}
