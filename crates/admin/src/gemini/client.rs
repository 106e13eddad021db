//! Gemini API client for landing-page content generation.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::prompts;
use super::types::{FieldAction, GenerationOptions, LandingContent, ProductBrief};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini content-generation client.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiClient {
    /// Create a new Gemini client.
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            inner: Arc::new(GeminiClientInner {
                client: reqwest::Client::new(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
            }),
        }
    }

    /// Generate a complete landing page from a product brief.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::SafetyBlocked`, `QuotaExceeded`, or
    /// `MalformedOutput` per the documented classification; the raw model
    /// text is preserved on malformed output.
    #[instrument(skip(self, brief, options), fields(model = %self.inner.model, category = %brief.category))]
    pub async fn generate_landing_content(
        &self,
        brief: &ProductBrief,
        options: &GenerationOptions,
    ) -> Result<LandingContent, GeminiError> {
        let prompt = prompts::landing_prompt(brief, options);
        let text = self.generate(&prompt, 0.8, 4096).await?;
        let cleaned = strip_code_fences(&text);

        serde_json::from_str(cleaned).map_err(|e| GeminiError::MalformedOutput {
            detail: e.to_string(),
            raw: text,
        })
    }

    /// Generate, improve, shorten, expand, or translate a single field.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::generate_landing_content`]; the result
    /// here is plain text, so only transport/safety/quota errors apply.
    #[instrument(skip(self, product_context, current_value), fields(model = %self.inner.model, ?action))]
    pub async fn assist_field(
        &self,
        field_label: &str,
        product_context: &str,
        current_value: Option<&str>,
        action: FieldAction,
    ) -> Result<String, GeminiError> {
        let prompt = prompts::field_prompt(field_label, product_context, current_value, action);
        let text = self.generate(&prompt, 0.7, 1024).await?;
        Ok(text.trim().to_string())
    }

    /// Generate product title candidates.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::generate_landing_content`].
    #[instrument(skip(self, product_description), fields(model = %self.inner.model, count))]
    pub async fn suggest_titles(
        &self,
        product_description: &str,
        count: usize,
    ) -> Result<Vec<String>, GeminiError> {
        let prompt = prompts::titles_prompt(product_description, count);
        let text = self.generate(&prompt, 0.9, 512).await?;
        let cleaned = strip_code_fences(&text);

        serde_json::from_str(cleaned).map_err(|e| GeminiError::MalformedOutput {
            detail: e.to_string(),
            raw: text,
        })
    }

    /// Issue one generation call and pull the text out of the response.
    async fn generate(
        &self,
        prompt: &str,
        temperature: f64,
        max_output_tokens: u32,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{GEMINI_API_BASE}/{}:generateContent?key={}",
            self.inner.model,
            self.inner.api_key.expose_secret()
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": temperature,
                "topP": 0.9,
                "maxOutputTokens": max_output_tokens,
            },
        });

        let response = self.inner.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(GeminiError::QuotaExceeded);
            }
            let text = response.text().await.unwrap_or_default();
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&text) {
                if api_error.error.status == "RESOURCE_EXHAUSTED" {
                    return Err(GeminiError::QuotaExceeded);
                }
                return Err(GeminiError::Api {
                    status: api_error.error.status,
                    message: api_error.error.message,
                });
            }
            return Err(GeminiError::Api {
                status: status.to_string(),
                message: text,
            });
        }

        let decoded: GenerateResponse = response
            .json()
            .await
            .map_err(GeminiError::Http)?;

        extract_text(&decoded)
    }
}

/// Pull generated text out of a decoded response, classifying safety blocks.
fn extract_text(response: &GenerateResponse) -> Result<String, GeminiError> {
    if response
        .prompt_feedback
        .as_ref()
        .is_some_and(|fb| fb.block_reason.is_some())
    {
        return Err(GeminiError::SafetyBlocked);
    }

    let Some(candidate) = response.candidates.first() else {
        return Err(GeminiError::EmptyResponse);
    };

    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(GeminiError::SafetyBlocked);
    }

    let text: String = candidate
        .content
        .as_ref()
        .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GeminiError::EmptyResponse);
    }

    Ok(text)
}

/// Strip optional markdown code fences around a JSON payload.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] },
                    "finishReason": "STOP"
                }]
            }"#,
        )
        .expect("deserialize");
        assert_eq!(extract_text(&response).expect("text"), "Hello world");
    }

    #[test]
    fn test_safety_finish_reason_classified() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": { "parts": [] },
                    "finishReason": "SAFETY"
                }]
            }"#,
        )
        .expect("deserialize");
        assert!(matches!(
            extract_text(&response),
            Err(GeminiError::SafetyBlocked)
        ));
    }

    #[test]
    fn test_prompt_block_classified() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{ "candidates": [], "promptFeedback": { "blockReason": "SAFETY" } }"#,
        )
        .expect("deserialize");
        assert!(matches!(
            extract_text(&response),
            Err(GeminiError::SafetyBlocked)
        ));
    }

    #[test]
    fn test_empty_response_classified() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{ "candidates": [] }"#).expect("deserialize");
        assert!(matches!(
            extract_text(&response),
            Err(GeminiError::EmptyResponse)
        ));
    }

    #[test]
    fn test_malformed_output_keeps_raw_text() {
        let raw = "Sure! Here is your JSON: {not json}".to_string();
        let err = serde_json::from_str::<LandingContent>(strip_code_fences(&raw))
            .map_err(|e| GeminiError::MalformedOutput {
                detail: e.to_string(),
                raw: raw.clone(),
            })
            .expect_err("must fail");
        match err {
            GeminiError::MalformedOutput { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_gemini_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<GeminiClient>();
        assert_send_sync::<GeminiClient>();
    }
}
