// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use super::core::Dispatcher;
use super::status::StatusReport;

/// Commands accepted by a running [`Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeCommand {
    /// Finish the current tick, release every capture and return.
    Shutdown,
}

/// Where status reports go after each tick.
pub trait StatusSink: Send {
    fn publish(&mut self, report: &StatusReport);
}

/// Prints reports to stdout (logs go to stderr).
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StatusSink for StdoutSink {
    fn publish(&mut self, report: &StatusReport) {
        println!("{report}");
    }
}

/// Drives the [`Dispatcher`] on a fixed interval.
///
/// This is a thin async shell: all scheduling decisions live in the
/// dispatcher and its controllers. Ticks never overlap; a shutdown command
/// is only observed between ticks, so an in-flight tick always completes.
pub struct Runtime {
    dispatcher: Dispatcher,
    interval: Duration,
    command_rx: mpsc::Receiver<RuntimeCommand>,
    sink: Box<dyn StatusSink>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("dispatcher", &self.dispatcher)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        dispatcher: Dispatcher,
        interval: Duration,
        command_rx: mpsc::Receiver<RuntimeCommand>,
    ) -> Self {
        Self {
            dispatcher,
            interval,
            command_rx,
            sink: Box::new(StdoutSink),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn StatusSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Main loop.
    ///
    /// - Ticks immediately, then every `interval`.
    /// - Publishes a status report after each tick.
    /// - On [`RuntimeCommand::Shutdown`] (or when every command sender is
    ///   dropped) stops all captures and returns the final report.
    pub async fn run(mut self) -> StatusReport {
        info!(interval = ?self.interval, "radiorec runtime started");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(RuntimeCommand::Shutdown) => info!("shutdown requested"),
                        None => info!("runtime command channel closed; exiting"),
                    }
                    break;
                }

                _ = ticker.tick() => {
                    let outcome = self.dispatcher.tick();
                    for (id, event) in &outcome.events {
                        debug!(program = %id, ?event, "program event");
                    }
                    self.sink.publish(&outcome.report);
                }
            }
        }

        let outcome = self.dispatcher.shutdown();
        self.sink.publish(&outcome.report);

        info!("runtime exiting");
        outcome.report
    }
}
