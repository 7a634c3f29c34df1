//! Configuration types for the companion assistant.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Remote completion settings.
    pub llm: LlmConfig,
    /// Speech capture/playback settings.
    pub speech: SpeechConfig,
}

/// Remote completion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL for the generative-language API.
    pub api_url: String,
    /// Model name to request from the API.
    pub api_model: String,
    /// API key. Leave empty to resolve from the `ELDEREASE_API_KEY`
    /// environment variable instead.
    pub api_key: String,
    /// Sampling temperature. Kept low so answers stay predictable.
    pub temperature: f64,
    /// Top-p (nucleus) sampling threshold.
    pub top_p: f64,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Maximum tokens to generate per response. Strict limit for brevity.
    pub max_output_tokens: usize,
    /// Number of prior turns included in the prompt's rolling window.
    pub max_history_turns: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_owned(),
            api_model: "gemini-2.0-flash-001".to_owned(),
            api_key: String::new(),
            temperature: 0.3,
            top_p: 0.7,
            top_k: 20,
            max_output_tokens: 100,
            max_history_turns: 3,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: the config field when set, otherwise the
    /// `ELDEREASE_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source yields a non-empty key.
    pub fn effective_api_key(&self) -> crate::error::Result<String> {
        if !self.api_key.trim().is_empty() {
            return Ok(self.api_key.trim().to_owned());
        }
        match std::env::var("ELDEREASE_API_KEY") {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_owned()),
            _ => Err(crate::error::AssistantError::Config(
                "no API key: set [llm].api_key or the ELDEREASE_API_KEY env var".to_owned(),
            )),
        }
    }
}

/// Speech capture/playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether voice capture is available to the UI.
    pub voice_enabled: bool,
    /// Whether replies are played through speech synthesis.
    pub speak_replies: bool,
    /// BCP-47 language tag for capture and playback.
    ///
    /// Supported: `en-US`, `hi-IN`, `ta-IN`, `te-IN`, `bn-IN`.
    pub language: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice_enabled: false,
            speak_replies: false,
            language: "en-US".to_owned(),
        }
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::AssistantError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::AssistantError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/elderease/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("elderease").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("elderease")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/elderease-config/config.toml")
        }
    }
}
