//! Grounded answer generation.
//!
//! Builds a single prompt embedding the assembled context and the question,
//! then calls an OpenAI-compatible chat completions API with deterministic
//! sampling and a bounded timeout. Provider failures become a typed
//! [`GenerateError`]; the caller must not let one crash the session.

use std::time::Duration;

use anyhow::{Context as _, Result};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::LlmConfig;
use crate::models::{Answer, Context};

/// Grounding directive: the model must admit absence rather than fabricate.
/// A prompt contract, not a code invariant.
const DIRECTIVE: &str =
    "If the material does not address the question, say explicitly that it is not mentioned in the material.";

/// Typed failure for a single generation attempt.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("language model request timed out")]
    Timeout,
    #[error("language model request failed: {0}")]
    Http(reqwest::Error),
    #[error("language model API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("language model returned no completion")]
    EmptyResponse,
}

/// Client for the configured chat completions endpoint.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl LlmClient {
    /// Build the client. A missing credential or unbuildable HTTP client is
    /// a setup failure and aborts the run.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .with_context(|| format!("{} environment variable not set", config.api_key_env))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Generate a grounded answer for the question.
    ///
    /// The first completion's text is taken verbatim; no post-processing
    /// and no citation verification.
    pub async fn answer(&self, question: &str, context: &Context) -> Result<Answer, GenerateError> {
        let prompt = build_prompt(question, context);
        debug!(prompt_chars = prompt.len(), "calling language model");

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerateError::Timeout
                } else {
                    GenerateError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response.json().await.map_err(GenerateError::Http)?;
        let text = extract_completion(&json)?;
        info!(answer_chars = text.len(), "answer generated");

        Ok(Answer { text })
    }
}

/// Build the grounding prompt: persona, directive, material, question.
pub fn build_prompt(question: &str, context: &Context) -> String {
    format!(
        "You are a rigorous question-answering assistant.\n\n\
         Answer the question using only the material provided below.\n\
         {}\n\n\
         Material:\n{}\n\n\
         Question:\n{}\n",
        DIRECTIVE,
        context.render(),
        question
    )
}

/// Pull the first completion's text out of a chat completions response.
fn extract_completion(json: &Value) -> Result<String, GenerateError> {
    json.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(GenerateError::EmptyResponse)
}
