// src/engine/state.rs

//! Mutable runtime state of one program.

use std::path::{Path, PathBuf};

use crate::capture::CaptureSession;
use crate::schedule::Window;
use crate::types::Phase;

/// Runtime state owned by exactly one [`ProgramController`].
///
/// The output path and the capture session are present if and only if the
/// phase is `Recording`. The window is absent only between a stop and the
/// next resolve.
///
/// [`ProgramController`]: crate::engine::ProgramController
#[derive(Debug)]
pub struct ProgramState {
    phase: Phase,
    window: Option<Window>,
    active_output: Option<PathBuf>,
    session: Option<Box<dyn CaptureSession>>,
}

/// What was being recorded when a recording ends.
#[derive(Debug)]
pub struct FinishedRecording {
    pub path: PathBuf,
    pub window: Option<Window>,
    pub session: Box<dyn CaptureSession>,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            window: None,
            active_output: None,
            session: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn active_output(&self) -> Option<&Path> {
        self.active_output.as_deref()
    }

    pub fn is_recording(&self) -> bool {
        self.phase == Phase::Recording
    }

    /// Whether the capture behind an active recording is still alive.
    pub fn capture_running(&mut self) -> bool {
        self.session.as_mut().is_some_and(|s| s.is_running())
    }

    pub(crate) fn set_window(&mut self, window: Window) {
        self.window = Some(window);
    }

    pub(crate) fn begin_recording(&mut self, path: PathBuf, session: Box<dyn CaptureSession>) {
        debug_assert_eq!(self.phase, Phase::Idle, "already recording");
        self.phase = Phase::Recording;
        self.active_output = Some(path);
        self.session = Some(session);
    }

    /// Return to `Idle`, dropping the window so the next tick re-resolves.
    ///
    /// Returns `None` if nothing was being recorded.
    pub(crate) fn finish_recording(&mut self) -> Option<FinishedRecording> {
        let window = self.window.take();
        self.phase = Phase::Idle;

        match (self.active_output.take(), self.session.take()) {
            (Some(path), Some(session)) => Some(FinishedRecording {
                path,
                window,
                session,
            }),
            _ => None,
        }
    }

    /// Phase/output/session agreement.
    pub fn is_consistent(&self) -> bool {
        let recording = self.phase == Phase::Recording;
        recording == self.active_output.is_some()
            && recording == self.session.is_some()
            && (!recording || self.window.is_some())
    }
}
