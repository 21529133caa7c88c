//! Error types for ktlens

use std::process::ExitCode;
use thiserror::Error;

/// Errors produced while loading, parsing, or analyzing a Kotlin file
#[derive(Error, Debug)]
pub enum KtLensError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unsupported language for extension: {extension}")]
    UnsupportedLanguage { extension: String },

    #[error("Parse failure: {message}")]
    ParseFailure { message: String },

    #[error("Output encoding failed: {message}")]
    EncodingFailure { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KtLensError {
    /// Map the error to a process exit code for the CLI
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound { .. } => ExitCode::from(2),
            Self::UnsupportedLanguage { .. } => ExitCode::from(3),
            Self::ParseFailure { .. } => ExitCode::from(4),
            Self::EncodingFailure { .. } => ExitCode::from(5),
            Self::Io(_) => ExitCode::from(6),
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, KtLensError>;
