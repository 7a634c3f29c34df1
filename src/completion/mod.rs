//! Remote text-completion abstraction.
//!
//! The assistant talks to its generative-language backend through the
//! [`CompletionProvider`] trait, so the intent router, shaper, and controller
//! are all testable with a canned fake and zero network access. The only
//! implementation that performs I/O is [`gemini::GeminiProvider`].

pub mod gemini;

pub use gemini::GeminiProvider;

use crate::config::LlmConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Speaker tag for one line of rolling history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRole {
    /// The user's side.
    User,
    /// The assistant's side.
    Assistant,
}

/// One speaker-labeled line of the rolling history window.
#[derive(Debug, Clone)]
pub struct HistoryLine {
    /// Who said it.
    pub role: HistoryRole,
    /// What was said.
    pub text: String,
}

/// Deterministic generation parameters, biased toward short, consistent
/// answers.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f64,
    /// Top-p (nucleus) threshold.
    pub top_p: f64,
    /// Top-k cutoff.
    pub top_k: u32,
    /// Output-length cap in tokens.
    pub max_output_tokens: usize,
}

impl From<&LlmConfig> for GenerationParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Everything the remote service needs for one completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System preamble: persona rules plus rendered reference data.
    pub system: String,
    /// Rolling window of prior turns, oldest first.
    pub history: Vec<HistoryLine>,
    /// The user's new utterance.
    pub utterance: String,
    /// Generation parameters.
    pub params: GenerationParams,
}

/// An injected text-completion service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for diagnostics.
    fn name(&self) -> &str;

    /// Produce raw completion text for the request.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status, malformed
    /// payload, or empty completion text. Callers convert any error into the
    /// fixed fallback reply; errors never reach the UI.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
