//! Client for the generative summarization collaborator.
//!
//! Sends the concatenated journal posts to the Gemini text-generation API and
//! returns the produced summary. The response shape is validated before any
//! field access; a malformed or failed response surfaces as an external
//! service error rather than hanging or panicking the request.

use crate::config::Config;
use crate::database::models::Post;
use crate::errors::{ServiceError, ServiceResult};
use serde_json::{Value, json};
use std::time::Duration;

const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SummaryService {
    client: reqwest::Client,
    api_key: String,
}

impl SummaryService {
    /// Create a summary client from loaded configuration
    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| ServiceError::configuration("GEMINI_API_KEY not set"))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ServiceError::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(SummaryService { client, api_key })
    }

    /// Generate a monthly summary from the given posts
    pub async fn generate_summary(&self, posts: &[Post]) -> ServiceResult<String> {
        let prompt = format!(
            "Based on the following learning posts, create a comprehensive monthly summary. Posts: {}",
            serde_json::to_string(posts).map_err(|e| {
                ServiceError::internal_error(format!("Failed to serialize posts: {}", e))
            })?
        );

        let body = json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let response = self
            .client
            .post(GEMINI_URL)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::external_service(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::external_service(format!(
                "Gemini returned status {}",
                status
            )));
        }

        let payload: Value = response.json().await.map_err(|e| {
            ServiceError::external_service(format!("Gemini response was not JSON: {}", e))
        })?;

        extract_summary_text(&payload).ok_or_else(|| {
            ServiceError::external_service("Gemini response missing summary text")
        })
    }
}

/// Pulls the generated text out of a `generateContent` response, verifying
/// the shape at every step.
fn extract_summary_text(payload: &Value) -> Option<String> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_response_yields_the_text() {
        let payload = serde_json::json!({
            "candidates": [
                {
                    "content": {
                        "parts": [
                            { "text": "A productive month." }
                        ]
                    }
                }
            ]
        });
        assert_eq!(
            extract_summary_text(&payload).as_deref(),
            Some("A productive month.")
        );
    }

    #[test]
    fn malformed_responses_yield_none() {
        for payload in [
            serde_json::json!({}),
            serde_json::json!({ "candidates": [] }),
            serde_json::json!({ "candidates": [{ "content": {} }] }),
            serde_json::json!({ "candidates": [{ "content": { "parts": [{}] } }] }),
            serde_json::json!({ "error": { "message": "quota exceeded" } }),
        ] {
            assert!(extract_summary_text(&payload).is_none(), "{payload}");
        }
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "secret".to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 0,
            storage: None,
            gemini_api_key: None,
        };
        let err = SummaryService::from_config(&config).err().unwrap();
        assert!(matches!(err, ServiceError::Configuration { .. }));
    }
}
