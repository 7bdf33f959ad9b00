//! Error types for stepmeter

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("Model {model} returned HTTP {status}: {message}")]
    Api {
        model: String,
        status: u16,
        message: String,
    },

    #[error("Model reply contained no text")]
    EmptyReply,

    #[error("Could not parse a meter reading from {0:?}")]
    ParseFailure(String),

    #[error("Reading extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Invalid backup format: missing 'onboarded' field")]
    InvalidBackupFormat,

    #[error("Not set up yet; run `stepmeter init --steps <N>` first")]
    NotOnboarded,

    #[error("No API key configured; run `stepmeter config --set-api-key <KEY>`")]
    MissingCredential,

    #[error("No reference photo stored yet; the season's first capture keeps one")]
    NoReferencePhoto,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
