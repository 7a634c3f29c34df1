//! Error types for the companion assistant.

/// Top-level error type for the assistant core.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Remote completion call error (network, status, malformed payload).
    #[error("completion error: {0}")]
    Completion(String),

    /// Speech capture or playback error.
    #[error("speech error: {0}")]
    Speech(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Stored user account error.
    #[error("account error: {0}")]
    Account(String),

    /// Care plan reference data error.
    #[error("care plan error: {0}")]
    CarePlan(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AssistantError>;
