// Error types for the critique pipeline

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, CritiqueError>;

/// Errors raised by external collaborators (generation, search, storage)
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors surfaced to callers of the pipeline
#[derive(Error, Debug)]
pub enum CritiqueError {
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CollaboratorError::Parse(err.to_string())
        } else {
            CollaboratorError::Network(err.to_string())
        }
    }
}
