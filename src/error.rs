//! Error types for Tekst.

use thiserror::Error;

/// Library-level error type for Tekst operations.
#[derive(Error, Debug)]
pub enum TekstError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Metadata lookup failed: {0}")]
    Metadata(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Transcript fetch failed: {0}")]
    Transcript(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Tekst operations.
pub type Result<T> = std::result::Result<T, TekstError>;
