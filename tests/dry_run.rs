// tests/dry_run.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::fs;
use std::path::Path;

use clap::Parser;
use tempfile::tempdir;

use radiorec::cli::CliArgs;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn dry_run_validates_without_recording() -> TestResult {
    init_tracing();

    let tmp = tempdir()?;
    let record_dir = tmp.path().join("recordings");
    let config_path = tmp.path().join("Radiorec.toml");

    let demo = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/wtmd.toml"))?;
    let contents = demo.replace(
        "record_dir = \"recordings\"",
        &format!("record_dir = {:?}", record_dir.display().to_string()),
    );
    fs::write(&config_path, contents)?;

    let args = CliArgs::try_parse_from([
        "radiorec",
        "--config",
        config_path.to_str().ok_or("non-utf8 temp path")?,
        "--dry-run",
        "--at",
        "2021-10-29 19:30",
    ])?;

    with_timeout(radiorec::run(args)).await?;

    // Nothing is created or captured in a dry run.
    assert!(!record_dir.exists());
    Ok(())
}

#[tokio::test]
async fn invalid_config_fails_before_anything_runs() -> TestResult {
    init_tracing();

    let tmp = tempdir()?;
    let config_path = tmp.path().join("Radiorec.toml");
    fs::write(&config_path, "[config]\ntick_interval_secs = 5\n")?;

    let args = CliArgs::try_parse_from([
        "radiorec",
        "--config",
        config_path.to_str().ok_or("non-utf8 temp path")?,
    ])?;

    let err = with_timeout(radiorec::run(args)).await.unwrap_err();
    assert!(err.to_string().contains("at least one"), "{err}");
    Ok(())
}
