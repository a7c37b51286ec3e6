//! Generation provider abstraction and the Gemini implementation.
//!
//! The corpus is moderated government news, so the Gemini call disables
//! provider-side content blocking for all four harm categories — the built-in
//! filters otherwise over-block ordinary policy reporting (defense, labor
//! disputes, criminal enforcement).
//!
//! Provider failures never propagate out of [`answer`]: the user gets a fixed
//! apology, the failure is logged, and the conversation continues.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::error;

use crate::config::GenerationConfig;

/// Fallback answer returned when the generation provider fails.
pub const FALLBACK_ANSWER: &str =
    "Maaf, terjadi kendala saat menyusun jawaban. Silakan coba lagi beberapa saat lagi.";

/// Gemini harm categories whose blocking is disabled for this corpus.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Trait for text generation providers.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"gemini-1.5-flash"`).
    fn model_name(&self) -> &str;
    /// Generate a completion for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generation provider using the Gemini `generateContent` API.
///
/// Requires the `GEMINI_API_KEY` environment variable to be set.
pub struct GeminiGenerator {
    config: GenerationConfig,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config: config.clone(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl GenerationProvider for GeminiGenerator {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.config.model, self.api_key
        );

        let safety_settings: Vec<serde_json::Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| {
                serde_json::json!({ "category": category, "threshold": "BLOCK_NONE" })
            })
            .collect();

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "safetySettings": safety_settings,
        });

        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self.client.post(&url).json(&body).send().await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_generate_response(&json);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err =
                            Some(anyhow::anyhow!("Gemini API error {}: {}", status, body_text));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Gemini API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Generation failed after retries")))
    }
}

/// Extract the first candidate's text from a `generateContent` response.
fn parse_generate_response(json: &serde_json::Value) -> Result<String> {
    let text = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid Gemini response: missing candidate text"))?;

    Ok(text.to_string())
}

/// Generate an answer, absorbing provider failures.
///
/// On success the generated text is returned verbatim. On any failure the
/// error is logged and [`FALLBACK_ANSWER`] is returned instead — a failed
/// generation must never crash the session.
pub async fn answer(provider: &dyn GenerationProvider, prompt: &str) -> String {
    match provider.generate(prompt).await {
        Ok(text) => text,
        Err(e) => {
            error!(model = %provider.model_name(), error = %e, "generation failed, returning fallback");
            FALLBACK_ANSWER.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingGenerator;

    #[async_trait]
    impl GenerationProvider for FailingGenerator {
        fn model_name(&self) -> &str {
            "failing"
        }
        async fn generate(&self, _prompt: &str) -> Result<String> {
            anyhow::bail!("simulated outage")
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl GenerationProvider for EchoGenerator {
        fn model_name(&self) -> &str {
            "echo"
        }
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("echo: {}", prompt))
        }
    }

    #[test]
    fn test_parse_generate_response() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Jawaban dari model." }] }
            }]
        });
        assert_eq!(
            parse_generate_response(&json).unwrap(),
            "Jawaban dari model."
        );
    }

    #[test]
    fn test_parse_generate_response_empty_candidates() {
        let json = serde_json::json!({ "candidates": [] });
        assert!(parse_generate_response(&json).is_err());
    }

    #[tokio::test]
    async fn test_answer_passes_through_success() {
        let text = answer(&EchoGenerator, "halo").await;
        assert_eq!(text, "echo: halo");
    }

    #[tokio::test]
    async fn test_answer_falls_back_on_failure() {
        let text = answer(&FailingGenerator, "halo").await;
        assert_eq!(text, FALLBACK_ANSWER);
    }
}
