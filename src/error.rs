use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegtierError {
    #[error("Audio decoding failed: {0}")]
    AudioDecode(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SegtierError>;
