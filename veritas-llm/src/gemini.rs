use crate::traits::{GroundedClient, GroundedResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use veritas_common::{GroundingChunk, Result, VeritasError};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Default, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
    grounding_metadata: Option<GeminiGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGroundingMetadata {
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    total_token_count: Option<u32>,
}

impl GeminiResponse {
    /// Text of the first candidate with thought parts left out, like the
    /// official SDKs' `response.text`.
    fn into_grounded(self) -> GroundedResponse {
        let tokens_used = self.usage_metadata.and_then(|u| u.total_token_count);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return GroundedResponse {
                model: self.model_version,
                tokens_used,
                ..GroundedResponse::default()
            };
        };

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            tracing::warn!("Gemini response was cut short by safety filters");
        }

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        GroundedResponse {
            text,
            grounding_chunks: candidate
                .grounding_metadata
                .and_then(|m| m.grounding_chunks),
            model: self.model_version,
            tokens_used,
        }
    }
}

/// Google Gemini API client with Google Search grounding.
///
/// Requires a valid API key and internet access. Requests carry no overall
/// timeout; only connection setup is bounded.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl GeminiClient {
    /// Create a new client using the provided API key and model.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| VeritasError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
            temperature: crate::prompt::FACT_CHECK_TEMPERATURE,
        })
    }

    /// Point the client at a different API root (gateway, mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GroundedClient for GeminiClient {
    async fn generate_grounded(
        &self,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<GroundedResponse> {
        let url = self.endpoint();

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            tools: vec![GeminiTool {
                google_search: GoogleSearch::default(),
            }],
            generation_config: temperature.map(|temperature| GeminiGenerationConfig { temperature }),
        };

        tracing::debug!("Sending Gemini request to: {}", url);

        let resp = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| VeritasError::Transport(format!("Gemini request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                429 => VeritasError::Transport("Rate limit exceeded".to_string()),
                401 => VeritasError::Transport("Invalid API key".to_string()),
                403 => VeritasError::Transport("API access forbidden".to_string()),
                _ => VeritasError::Transport(format!(
                    "Gemini API error ({}): {}",
                    status, error_text
                )),
            });
        }

        let gemini_response: GeminiResponse = resp.json().await.map_err(|e| {
            VeritasError::Transport(format!("Failed to parse Gemini response: {}", e))
        })?;

        let mut grounded = gemini_response.into_grounded();
        grounded.model.get_or_insert_with(|| self.model.clone());
        Ok(grounded)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn fact_check_temperature(&self) -> f32 {
        self.temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_enables_search_grounding() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: "hi".into() }],
            }],
            tools: vec![GeminiTool {
                google_search: GoogleSearch::default(),
            }],
            generation_config: Some(GeminiGenerationConfig { temperature: 0.1 }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tools"], json!([{ "googleSearch": {} }]));
        assert_eq!(value["contents"][0]["parts"][0]["text"], json!("hi"));
        assert!(value["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn response_text_skips_thoughts_and_joins_parts() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "VERDICT: REAL\n" },
                    { "text": "CONFIDENCE: 90" }
                ]},
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://a.test", "title": "A" } },
                        { "retrievedContext": { "uri": "gs://x" } }
                    ]
                }
            }],
            "usageMetadata": { "totalTokenCount": 42 },
            "modelVersion": "gemini-2.5-flash"
        });

        let parsed: GeminiResponse = serde_json::from_value(raw).unwrap();
        let grounded = parsed.into_grounded();
        assert_eq!(grounded.text, "VERDICT: REAL\nCONFIDENCE: 90");
        assert_eq!(grounded.tokens_used, Some(42));
        assert_eq!(grounded.model.as_deref(), Some("gemini-2.5-flash"));

        let chunks = grounded.grounding_chunks.unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].web.is_some());
        assert!(chunks[1].web.is_none());
    }

    #[test]
    fn empty_response_gives_empty_text() {
        let parsed: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        let grounded = parsed.into_grounded();
        assert_eq!(grounded.text, "");
        assert!(grounded.grounding_chunks.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = GeminiClient::new("k".into(), "m".into())
            .unwrap()
            .with_base_url("http://localhost:1234/");
        assert_eq!(client.endpoint(), "http://localhost:1234/models/m:generateContent");
    }
}
