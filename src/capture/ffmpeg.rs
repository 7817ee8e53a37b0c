// src/capture/ffmpeg.rs

//! `ffmpeg`-backed capture engine.
//!
//! Each session is one `ffmpeg` child process that pulls the stream and
//! transcodes it to the configured codec/format. The child runs on its own;
//! stderr is drained into `debug!` logs so the pipe never fills up.
//!
//! Stopping kills the child. MP3 output is frame-based, so a killed capture
//! still leaves a playable file.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::capture::{validate_source, CaptureEngine, CaptureSession};
use crate::config::model::CaptureSection;
use crate::errors::CaptureError;

/// Settings the engine is built from; mirrors the `[capture]` section.
pub type CaptureSettings = CaptureSection;

/// Spawns one `ffmpeg` process per recording.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    settings: CaptureSettings,
}

impl FfmpegEngine {
    pub fn new(settings: CaptureSettings) -> Self {
        Self { settings }
    }
}

impl CaptureEngine for FfmpegEngine {
    fn open(
        &self,
        source_url: &str,
        destination: &Path,
    ) -> Result<Box<dyn CaptureSession>, CaptureError> {
        validate_source(source_url)?;

        if destination.exists() {
            return Err(CaptureError::Open {
                url: source_url.to_string(),
                reason: format!("destination {} already exists", destination.display()),
            });
        }

        let args = build_args(&self.settings, source_url, destination);
        debug!(program = %self.settings.program, ?args, "prepared ffmpeg session");

        Ok(Box::new(FfmpegSession {
            program: self.settings.program.clone(),
            args,
            destination: destination.to_path_buf(),
            child: None,
            stopped: false,
            released: false,
        }))
    }
}

/// A single `ffmpeg` capture.
#[derive(Debug)]
pub struct FfmpegSession {
    program: String,
    args: Vec<String>,
    destination: PathBuf,
    child: Option<Child>,
    stopped: bool,
    released: bool,
}

impl FfmpegSession {
    fn start_error(&self, reason: impl Into<String>) -> CaptureError {
        CaptureError::Start {
            path: self.destination.display().to_string(),
            reason: reason.into(),
        }
    }
}

impl CaptureSession for FfmpegSession {
    fn start(&mut self) -> Result<(), CaptureError> {
        if self.released {
            return Err(self.start_error("session already released"));
        }
        if self.child.is_some() {
            return Ok(());
        }

        // tokio::process needs a reactor to register the child with.
        let handle = Handle::try_current()
            .map_err(|_| self.start_error("no async runtime available to spawn ffmpeg"))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.start_error(format!("spawning {}: {e}", self.program)))?;

        if let Some(stderr) = child.stderr.take() {
            let dest = self.destination.display().to_string();
            handle.spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(dest = %dest, "ffmpeg: {}", line);
                }
            });
        }

        info!(
            pid = ?child.id(),
            dest = %self.destination.display(),
            "ffmpeg capture started"
        );

        self.child = Some(child);
        self.stopped = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;

        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(?status, "ffmpeg already exited before stop");
                Ok(())
            }
            Ok(None) => match child.start_kill() {
                Ok(()) => Ok(()),
                // Exited between try_wait and kill.
                Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
                Err(e) => Err(CaptureError::Stop(e.to_string())),
            },
            Err(e) => Err(CaptureError::Stop(e.to_string())),
        }
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        if self.released {
            return Ok(());
        }
        let stop_result = self.stop();
        self.released = true;

        if let Some(mut child) = self.child.take() {
            match child.try_wait() {
                Ok(Some(_)) => {}
                Ok(None) => {
                    // Killed but not reaped yet; let the runtime collect it.
                    if let Ok(handle) = Handle::try_current() {
                        handle.spawn(async move {
                            let _ = child.wait().await;
                        });
                    }
                }
                Err(e) => {
                    warn!(error = %e, "could not reap ffmpeg process");
                    return Err(CaptureError::Release(e.to_string()));
                }
            }
        }

        stop_result.map_err(|e| CaptureError::Release(e.to_string()))
    }

    fn is_running(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

/// Command-line arguments for one capture.
pub fn build_args(settings: &CaptureSettings, source_url: &str, destination: &Path) -> Vec<String> {
    vec![
        "-hide_banner".into(),
        "-nostdin".into(),
        "-loglevel".into(),
        "warning".into(),
        // Never overwrite an existing recording.
        "-n".into(),
        "-i".into(),
        source_url.into(),
        "-vn".into(),
        "-acodec".into(),
        settings.codec.clone(),
        "-b:a".into(),
        format!("{}k", settings.bitrate_kbps),
        "-ac".into(),
        settings.channels.to_string(),
        "-ar".into(),
        settings.sample_rate.to_string(),
        "-f".into(),
        settings.format.clone(),
        destination.display().to_string(),
    ]
}
