use std::path::PathBuf;
use thiserror::Error;
use xslmap_xslt::{GenerateError, ValidationError};

/// Errors surfaced by the command line and the project file loader.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid project file {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Generation failed: {0}")]
    Generate(#[from] GenerateError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}
