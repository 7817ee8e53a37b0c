// src/engine/mod.rs

//! Recording engine for radiorec.
//!
//! This module ties together:
//! - one [`ProgramController`] per configured program, each owning the
//!   `Idle`/`Recording` state machine of its program
//! - the [`Dispatcher`], which ticks every controller in configuration order
//!   and produces a status report
//! - the async [`Runtime`] shell that drives the dispatcher on a fixed
//!   interval and handles shutdown
//!
//! The dispatcher and controllers are synchronous and take the current time
//! from an injected [`Clock`], so the whole state machine can be exercised
//! with a manual clock and a fake capture engine.

use std::fmt;
use std::path::PathBuf;

use crate::schedule::Window;

pub mod clock;
pub mod controller;
pub mod core;
pub mod runtime;
pub mod state;
pub mod status;

pub use self::core::{Dispatcher, TickOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::ProgramController;
pub use runtime::{Runtime, RuntimeCommand, StatusSink, StdoutSink};
pub use state::ProgramState;
pub use status::{ProgramStatus, StatusReport};
pub use crate::types::Phase;

/// Position of a program in the configuration; stable for the process
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub usize);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something a controller did during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramEvent {
    /// A fresh window was computed for an idle program.
    WindowResolved { window: Window },
    /// A capture session was opened and started.
    RecordingStarted { path: PathBuf, window: Window },
    /// Opening or starting the capture failed; retried next tick while the
    /// window is still open.
    StartFailed { window: Window, reason: String },
    /// The capture was stopped and released. `clean` is false when the
    /// engine reported an error and the session may have leaked.
    RecordingStopped {
        path: PathBuf,
        window: Window,
        clean: bool,
    },
}
