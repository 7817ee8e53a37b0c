// src/engine/core.rs

//! Synchronous dispatcher core.
//!
//! The [`Dispatcher`] owns every [`ProgramController`] in configuration
//! order. A tick reads the clock once, evaluates each controller to
//! completion before moving to the next, and then snapshots a
//! [`StatusReport`]. Nothing here sleeps, spawns or awaits; the async shell
//! in [`runtime`](super::runtime) decides when ticks happen.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::capture::CaptureEngine;
use crate::config::ConfigFile;
use crate::engine::clock::Clock;
use crate::engine::controller::ProgramController;
use crate::engine::status::StatusReport;
use crate::engine::{ProgramEvent, ProgramId};
use crate::naming::NamingService;

/// Result of a single tick (or of the shutdown sweep).
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub now: NaiveDateTime,
    /// Events in the order they happened, tagged with their program.
    pub events: Vec<(ProgramId, ProgramEvent)>,
    pub report: StatusReport,
}

impl TickOutcome {
    pub fn started(&self) -> impl Iterator<Item = ProgramId> + '_ {
        self.events.iter().filter_map(|(id, e)| {
            matches!(e, ProgramEvent::RecordingStarted { .. }).then_some(*id)
        })
    }

    pub fn stopped(&self) -> impl Iterator<Item = ProgramId> + '_ {
        self.events.iter().filter_map(|(id, e)| {
            matches!(e, ProgramEvent::RecordingStopped { .. }).then_some(*id)
        })
    }
}

/// Owns the program controllers and ticks them in a fixed order.
#[derive(Debug)]
pub struct Dispatcher {
    controllers: Vec<ProgramController>,
    clock: Arc<dyn Clock>,
    ticks: u64,
}

impl Dispatcher {
    pub fn new(controllers: Vec<ProgramController>, clock: Arc<dyn Clock>) -> Self {
        Self {
            controllers,
            clock,
            ticks: 0,
        }
    }

    /// One controller per configured program, sharing a capture engine and
    /// naming service.
    pub fn from_config(
        cfg: &ConfigFile,
        engine: Arc<dyn CaptureEngine>,
        naming: NamingService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let controllers = cfg
            .programs
            .iter()
            .enumerate()
            .map(|(idx, descriptor)| {
                ProgramController::new(
                    ProgramId(idx),
                    descriptor.clone(),
                    Arc::clone(&engine),
                    naming.clone(),
                )
            })
            .collect();

        Self::new(controllers, clock)
    }

    pub fn controllers(&self) -> &[ProgramController] {
        &self.controllers
    }

    pub fn controller(&self, id: ProgramId) -> Option<&ProgramController> {
        self.controllers.get(id.0)
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Evaluate every program once at the current clock time.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        self.ticks += 1;

        let mut events = Vec::new();
        for controller in self.controllers.iter_mut() {
            let id = controller.id();
            events.extend(controller.tick(now).into_iter().map(|e| (id, e)));
        }

        debug!(tick = self.ticks, %now, events = events.len(), "dispatcher tick");

        TickOutcome {
            now,
            events,
            report: self.report_at(now),
        }
    }

    /// Status of every program without advancing any state machine.
    pub fn report(&mut self) -> StatusReport {
        let now = self.clock.now();
        self.report_at(now)
    }

    /// Stop and release every active capture. Safe to call more than once.
    pub fn shutdown(&mut self) -> TickOutcome {
        let now = self.clock.now();

        let events: Vec<_> = self
            .controllers
            .iter_mut()
            .filter_map(|c| c.force_stop(now).map(|e| (c.id(), e)))
            .collect();

        info!(stopped = events.len(), "dispatcher shut down");

        TickOutcome {
            now,
            events,
            report: self.report_at(now),
        }
    }

    fn report_at(&mut self, at: NaiveDateTime) -> StatusReport {
        StatusReport {
            at,
            programs: self.controllers.iter_mut().map(|c| c.status(at)).collect(),
        }
    }
}
