// src/errors.rs

//! Crate-wide error types.
//!
//! Configuration problems are fatal and surface from the loader. Capture
//! problems are recoverable and never leave the program controller; they are
//! typed separately so a failed `open` can be told apart from a failed
//! `start`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures reported by a capture engine or one of its sessions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("invalid capture source '{url}': {reason}")]
    InvalidSource { url: String, reason: String },

    #[error("failed to open capture of '{url}': {reason}")]
    Open { url: String, reason: String },

    #[error("failed to start capture into {path}: {reason}")]
    Start { path: String, reason: String },

    #[error("failed to stop capture: {0}")]
    Stop(String),

    #[error("failed to release capture: {0}")]
    Release(String),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RecorderError>;
