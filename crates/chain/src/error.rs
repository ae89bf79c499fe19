/// Errors from the metadata bridge.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error object returned by the chain. `message` is passed through as-is.
    #[error("{message}")]
    Rpc { code: i64, message: String },

    #[error("invalid scheduler address on chain: {0}")]
    InvalidEndpoint(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("gateway returned no confirmation for {method}")]
    MissingConfirmation { method: &'static str },
}
