// src/config/mod.rs

//! Configuration loading and validation for radiorec.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Turn raw program entries into validated [`ProgramDescriptor`]s
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_str};
pub use model::{
    CaptureSection, ConfigFile, ConfigSection, ProgramDescriptor, RawConfigFile, RawProgram,
    ScheduleConfig,
};
