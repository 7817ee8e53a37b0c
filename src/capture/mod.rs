// src/capture/mod.rs

//! Capture engine abstraction.
//!
//! The program controller talks to a [`CaptureEngine`] instead of a concrete
//! transcoder. Production code uses [`FfmpegEngine`], which runs each
//! recording as an `ffmpeg` child process; tests provide an engine that only
//! records which sessions were opened, started and stopped.
//!
//! A session keeps running in the background once started. The controller
//! never waits on it; it only issues `stop` / `release` when the window
//! closes. Both calls are idempotent.

pub mod ffmpeg;

use std::fmt::Debug;
use std::path::Path;

use url::Url;

use crate::errors::CaptureError;

pub use ffmpeg::{build_args, CaptureSettings, FfmpegEngine, FfmpegSession};

/// Factory for capture sessions.
pub trait CaptureEngine: Send + Sync + Debug {
    /// Prepare a session that will tap `source_url` and write `destination`.
    ///
    /// Nothing is recorded until [`CaptureSession::start`] is called.
    fn open(
        &self,
        source_url: &str,
        destination: &Path,
    ) -> Result<Box<dyn CaptureSession>, CaptureError>;
}

/// One recording in progress (or about to be).
pub trait CaptureSession: Send + Debug {
    /// Begin capturing. Calling this on a running session is a no-op.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop capturing. Stopping a stopped session is a no-op.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Free underlying resources. Releasing twice is a no-op.
    fn release(&mut self) -> Result<(), CaptureError>;

    /// Whether the underlying capture is still producing output.
    fn is_running(&mut self) -> bool;
}

/// Parse a stream URL, requiring an absolute URL with a host.
///
/// Used both when the configuration is validated and when a session is
/// opened.
pub fn validate_source(source_url: &str) -> Result<Url, CaptureError> {
    let invalid = |reason: String| CaptureError::InvalidSource {
        url: source_url.to_string(),
        reason,
    };

    let url = Url::parse(source_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}
