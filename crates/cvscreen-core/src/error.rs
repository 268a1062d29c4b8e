use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read document {}: {reason}", .path.display())]
    DocumentFormat { path: PathBuf, reason: String },

    #[error("Model inference failed: {0}")]
    ModelInference(String),

    #[error("Dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Flat classification of [`Error`], recorded in selection outcomes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    DocumentFormat,
    ModelInference,
    DimensionMismatch,
    DegenerateVector,
    InvalidConfig,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DocumentFormat { path: path.into(), reason: reason.into() }
    }

    /// Wrap any displayable backend error (candle, tokenizers) as an inference failure.
    pub fn inference(err: impl std::fmt::Display) -> Self {
        Self::ModelInference(err.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::DocumentFormat { .. } => ErrorKind::DocumentFormat,
            Self::ModelInference(_) => ErrorKind::ModelInference,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::DegenerateVector(_) => ErrorKind::DegenerateVector,
            Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
