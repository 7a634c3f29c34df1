//! Remote adapter for the generative-language `generateContent` API.
//!
//! Sends one non-streaming request per utterance. The system preamble rides
//! as the first `user` content with a seeded `model` acknowledgement, then
//! the rolling history as alternating `user`/`model` contents, then the new
//! utterance — mirroring how the conversation screens drove the service.
//! Safety settings are configured on every request but never inspected.

use crate::completion::{CompletionProvider, CompletionRequest, HistoryRole};
use crate::config::LlmConfig;
use crate::error::{AssistantError, Result};
use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

/// Safety categories configured on every request.
const SAFETY_SETTINGS: &[(&str, &str)] = &[
    ("HARM_CATEGORY_HARASSMENT", "BLOCK_MEDIUM_AND_ABOVE"),
    ("HARM_CATEGORY_HATE_SPEECH", "BLOCK_MEDIUM_AND_ABOVE"),
    ("HARM_CATEGORY_SEXUALLY_EXPLICIT", "BLOCK_MEDIUM_AND_ABOVE"),
    ("HARM_CATEGORY_DANGEROUS_CONTENT", "BLOCK_MEDIUM_AND_ABOVE"),
];

/// Completion provider backed by the generative-language HTTP API.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    /// Create a provider from config.
    ///
    /// # Errors
    ///
    /// Returns an error when no API key can be resolved.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.effective_api_key()?;
        info!(
            "completion provider configured: {} model={}",
            config.api_url, config.api_model
        );
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_owned(),
            model: config.api_model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = build_body(request);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Completion(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Completion(format!(
                "API returned {status}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AssistantError::Completion(format!("malformed response: {e}")))?;

        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_owned();
        if text.is_empty() {
            return Err(AssistantError::Completion(
                "empty completion text".to_owned(),
            ));
        }

        info!(
            "completion returned {} chars in {:.0}ms",
            text.len(),
            started.elapsed().as_millis()
        );
        Ok(text)
    }
}

/// Build the `generateContent` JSON body for a request.
fn build_body(request: &CompletionRequest) -> serde_json::Value {
    let mut contents = vec![
        serde_json::json!({
            "role": "user",
            "parts": [{ "text": request.system }],
        }),
        serde_json::json!({
            "role": "model",
            "parts": [{ "text": crate::persona::GREETING }],
        }),
    ];

    for line in &request.history {
        let role = match line.role {
            HistoryRole::User => "user",
            HistoryRole::Assistant => "model",
        };
        contents.push(serde_json::json!({
            "role": role,
            "parts": [{ "text": line.text }],
        }));
    }

    contents.push(serde_json::json!({
        "role": "user",
        "parts": [{ "text": request.utterance }],
    }));

    let safety_settings: Vec<serde_json::Value> = SAFETY_SETTINGS
        .iter()
        .map(|(category, threshold)| {
            serde_json::json!({ "category": category, "threshold": threshold })
        })
        .collect();

    serde_json::json!({
        "contents": contents,
        "safetySettings": safety_settings,
        "generationConfig": {
            "temperature": request.params.temperature,
            "topK": request.params.top_k,
            "topP": request.params.top_p,
            "maxOutputTokens": request.params.max_output_tokens,
        },
    })
}
