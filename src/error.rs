use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),

    #[error("Jump message carries no state")]
    MissingState,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
