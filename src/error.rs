//! Error types for moodchat.

/// Top-level error type for construction and configuration.
///
/// Per-turn failures (model inference, generation) never surface through this
/// type; they degrade to a coherent reply inside the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Sentiment model download, loading, or inference error.
    #[error("model error: {0}")]
    Model(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ChatError>;
