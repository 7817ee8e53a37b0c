// src/engine/controller.rs

//! Per-program state machine.
//!
//! Every tick runs three guarded transitions in order:
//!
//! 1. **Resolve**: idle with no window (or with a window that elapsed
//!    without being recorded) → compute the next window from `now`.
//! 2. **Start**: idle and `start <= now <= stop` → pick a file name, open and
//!    start a capture session, go `Recording`.
//! 3. **Stop**: recording and `now >= stop` → stop and release the session,
//!    go `Idle` and forget the window.
//!
//! Stop is checked after Start within the same tick, so a window that is
//! already over by the time it starts (zero duration, or a tick landing
//! exactly on the stop instant) is started and stopped in one tick rather
//! than left running until the next one.
//!
//! Capture failures never leave this module. A failed start keeps the
//! program idle with its window, so the start is retried on every tick until
//! the window closes. A failed stop is logged and the program goes idle
//! anyway.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, error, info, warn};

use crate::capture::CaptureEngine;
use crate::config::ProgramDescriptor;
use crate::engine::state::{FinishedRecording, ProgramState};
use crate::engine::status::ProgramStatus;
use crate::engine::{ProgramEvent, ProgramId};
use crate::errors::Result;
use crate::naming::NamingService;
use crate::schedule::{resolve, Window, DISPLAY_FORMAT};

/// Owns one program's descriptor and runtime state.
#[derive(Debug)]
pub struct ProgramController {
    id: ProgramId,
    descriptor: ProgramDescriptor,
    state: ProgramState,
    engine: Arc<dyn CaptureEngine>,
    naming: NamingService,
}

impl ProgramController {
    pub fn new(
        id: ProgramId,
        descriptor: ProgramDescriptor,
        engine: Arc<dyn CaptureEngine>,
        naming: NamingService,
    ) -> Self {
        Self {
            id,
            descriptor,
            state: ProgramState::new(),
            engine,
            naming,
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn descriptor(&self) -> &ProgramDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    /// Run one evaluation of the state machine at `now`.
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<ProgramEvent> {
        let mut events = Vec::new();

        if !self.state.is_recording() && self.needs_window(now) {
            let window = resolve(now, &self.descriptor.policy);
            self.state.set_window(window);
            debug!(
                program = %self.descriptor.name,
                %window,
                "resolved next window"
            );
            events.push(ProgramEvent::WindowResolved { window });
        }

        if let Some(window) = self.state.window() {
            if !self.state.is_recording() && window.contains(now) {
                events.push(self.start_recording(now, window));
            }
        }

        if let Some(window) = self.state.window() {
            if self.state.is_recording() && window.has_ended(now) {
                events.extend(self.stop_recording(now));
            }
        }

        debug_assert!(self.state.is_consistent());
        events
    }

    /// An idle program needs a window when it has none, or when its window
    /// passed without a recording being started (every start failed).
    fn needs_window(&self, now: NaiveDateTime) -> bool {
        match self.state.window() {
            None => true,
            Some(window) => now > window.stop,
        }
    }

    /// Window to show for a program that has none stored. At the stop
    /// instant `resolve` still returns the window that just ended, so the
    /// occurrence after it is shown instead.
    fn upcoming_window(&self, now: NaiveDateTime) -> Window {
        let window = resolve(now, &self.descriptor.policy);
        if window.has_ended(now) {
            resolve(window.stop + TimeDelta::seconds(1), &self.descriptor.policy)
        } else {
            window
        }
    }

    /// Stop any active recording regardless of the window (shutdown path).
    pub fn force_stop(&mut self, now: NaiveDateTime) -> Option<ProgramEvent> {
        if !self.state.is_recording() {
            return None;
        }
        info!(program = %self.descriptor.name, "stopping recording early");
        self.stop_recording(now)
    }

    /// Snapshot for the status report.
    ///
    /// An idle program whose window was just cleared by a stop shows its
    /// next window without storing it; the next tick still resolves.
    pub fn status(&mut self, now: NaiveDateTime) -> ProgramStatus {
        let capture_running = self.state.capture_running();
        let window = self
            .state
            .window()
            .unwrap_or_else(|| self.upcoming_window(now));
        ProgramStatus {
            id: self.id,
            name: self.descriptor.name.clone(),
            station: self.descriptor.station.clone(),
            phase: self.state.phase(),
            window: Some(window),
            output: self.state.active_output().map(|p| p.to_path_buf()),
            capture_running,
        }
    }

    fn start_recording(&mut self, now: NaiveDateTime, window: Window) -> ProgramEvent {
        match self.open_session(now) {
            Ok(path) => {
                info!(
                    program = %self.descriptor.name,
                    station = %self.descriptor.station,
                    path = %path.display(),
                    ending = %window.stop.format(DISPLAY_FORMAT),
                    "start recording"
                );
                ProgramEvent::RecordingStarted { path, window }
            }
            Err(err) => {
                warn!(
                    program = %self.descriptor.name,
                    error = %err,
                    "could not start recording; will retry while the window is open"
                );
                ProgramEvent::StartFailed {
                    window,
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Name, open and start a session. On failure nothing is kept.
    fn open_session(&mut self, now: NaiveDateTime) -> Result<PathBuf> {
        let path = self.naming.next_path(
            &self.descriptor.dest_dir,
            &NamingService::date_prefix(now),
            &self.descriptor.file_root,
        )?;

        let mut session = self.engine.open(&self.descriptor.url, &path)?;

        if let Err(err) = session.start() {
            if let Err(release_err) = session.release() {
                debug!(error = %release_err, "release after failed start also failed");
            }
            return Err(err.into());
        }

        self.state.begin_recording(path.clone(), session);
        Ok(path)
    }

    fn stop_recording(&mut self, now: NaiveDateTime) -> Option<ProgramEvent> {
        let FinishedRecording {
            path,
            window,
            mut session,
        } = self.state.finish_recording()?;

        let mut clean = true;
        if let Err(err) = session.stop() {
            clean = false;
            warn!(program = %self.descriptor.name, error = %err, "capture stop failed");
        }
        if let Err(err) = session.release() {
            clean = false;
            warn!(program = %self.descriptor.name, error = %err, "capture release failed");
        }
        if !clean {
            error!(
                program = %self.descriptor.name,
                path = %path.display(),
                "capture session may have leaked; program returned to idle"
            );
        }

        info!(
            program = %self.descriptor.name,
            station = %self.descriptor.station,
            path = %path.display(),
            at = %now.format(DISPLAY_FORMAT),
            "ceased recording"
        );

        let window = window.unwrap_or_else(|| Window::new(now, now));
        Some(ProgramEvent::RecordingStopped {
            path,
            window,
            clean,
        })
    }
}
