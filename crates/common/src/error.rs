use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The exchange answered with a non-empty `error` array.
    #[error("Exchange error: {}", .0.join("; "))]
    Exchange(Vec<String>),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Signature computation received malformed input (bad base64 secret).
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
