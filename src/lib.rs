// src/lib.rs

pub mod capture;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod naming;
pub mod schedule;
pub mod types;

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::capture::FfmpegEngine;
use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::ConfigFile;
use crate::engine::{Clock, Dispatcher, ManualClock, Runtime, RuntimeCommand, SystemClock};
use crate::errors::Result;
use crate::fs::RealFileSystem;
use crate::naming::NamingService;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - one program controller per `[[program]]`
/// - the ffmpeg capture engine and the naming service
/// - the interval-driven runtime
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;
    info!(
        config = %args.config.display(),
        programs = cfg.programs.len(),
        "configuration loaded"
    );

    if args.dry_run {
        let clock: Arc<dyn Clock> = match args.at {
            Some(at) => Arc::new(ManualClock::new(at)),
            None => Arc::new(SystemClock),
        };
        print_dry_run(&cfg, clock);
        return Ok(());
    }

    let naming = NamingService::new(Arc::new(RealFileSystem), cfg.config.extension.clone());
    let engine = Arc::new(FfmpegEngine::new(cfg.capture.clone()));

    let dispatcher = Dispatcher::from_config(&cfg, engine, naming, Arc::new(SystemClock));

    let interval = Duration::from_secs(args.interval.unwrap_or(cfg.config.tick_interval_secs));

    let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>(4);

    // Ctrl-C → graceful shutdown.
    tokio::spawn(forward_shutdown(tokio::signal::ctrl_c(), cmd_tx));

    let runtime = Runtime::new(dispatcher, interval, cmd_rx);
    let final_report = runtime.run().await;
    debug!(recording = final_report.recording_count(), "final status");

    Ok(())
}

/// Sends `Shutdown` once `signal` fires.
///
/// If the signal cannot be installed the sender is held forever: dropping it
/// would close the channel and the runtime would stop at once.
async fn forward_shutdown<F>(signal: F, cmd_tx: mpsc::Sender<RuntimeCommand>)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(error = %e, "failed to listen for Ctrl+C; recording continues until the process is killed");
        std::future::pending::<()>().await;
    }
    let _ = cmd_tx.send(RuntimeCommand::Shutdown).await;
}

/// Dry-run output: every program with its policy and next window.
///
/// No directory is touched and no capture is started.
fn print_dry_run(cfg: &ConfigFile, clock: Arc<dyn Clock>) {
    let now = clock.now();

    println!("radiorec dry-run");
    println!("  config.tick_interval_secs = {}", cfg.config.tick_interval_secs);
    println!("  config.extension = {}", cfg.config.extension);
    println!(
        "  capture = {} -acodec {} -b:a {}k -ac {} -ar {} -f {}",
        cfg.capture.program,
        cfg.capture.codec,
        cfg.capture.bitrate_kbps,
        cfg.capture.channels,
        cfg.capture.sample_rate,
        cfg.capture.format
    );
    println!("  now = {}", now.format(crate::schedule::DISPLAY_FORMAT));
    println!();

    println!("programs ({}):", cfg.programs.len());
    for program in &cfg.programs {
        let window = crate::schedule::resolve(now, &program.policy);
        let state = if window.contains(now) { "would record now" } else { "queued" };
        println!("  - {} - {}", program.station, program.name);
        println!("      schedule: {}", program.policy);
        println!("      next: {window} ({state})");
        println!(
            "      files: {}/<YYYYMMDD>{}NNN.{}",
            program.dest_dir.display(),
            program.file_root,
            cfg.config.extension
        );
    }

    debug!("dry-run complete (nothing recorded)");
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::sync::mpsc::error::TryRecvError;

    #[tokio::test]
    async fn signal_sends_shutdown() {
        let (tx, mut rx) = mpsc::channel(1);
        forward_shutdown(async { Ok(()) }, tx).await;
        assert_eq!(rx.recv().await, Some(RuntimeCommand::Shutdown));
    }

    #[tokio::test]
    async fn signal_setup_failure_keeps_the_channel_open() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = tokio::spawn(forward_shutdown(
            async { Err(io::Error::other("no signal handler")) },
            tx,
        ));

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert!(!handle.is_finished());
        handle.abort();
    }
}
