use std::path::PathBuf;
use std::sync::Arc;

use radiorec::capture::CaptureEngine;
use radiorec::config::{
    CaptureSection, ConfigFile, ConfigSection, ProgramDescriptor, RawConfigFile, RawProgram,
    ScheduleConfig,
};
use radiorec::engine::{Clock, Dispatcher, ProgramController, ProgramId};
use radiorec::fs::mock::MockFileSystem;
use radiorec::naming::NamingService;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                capture: CaptureSection::default(),
                program: Vec::new(),
            },
        }
    }

    pub fn with_program(mut self, program: RawProgram) -> Self {
        self.config.program.push(program);
        self
    }

    pub fn with_record_dir(mut self, dir: &str) -> Self {
        self.config.config.record_dir = PathBuf::from(dir);
        self
    }

    pub fn with_tick_interval(mut self, secs: u64) -> Self {
        self.config.config.tick_interval_secs = secs;
        self
    }

    /// The raw config, for tests that expect validation to fail.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a `[[program]]` entry.
pub struct ProgramBuilder {
    program: RawProgram,
}

impl ProgramBuilder {
    /// Defaults: daily at 12:00 for one hour, written to `/rec`, `file_root`
    /// `_<STATION>_<NAME>_` with spaces removed.
    pub fn new(station: &str, name: &str) -> Self {
        Self {
            program: RawProgram {
                name: name.to_string(),
                station: station.to_string(),
                url: "http://stream.example.invalid/live".to_string(),
                file_root: format!("_{station}_{}_", name.replace(' ', "")),
                dest_dir: Some(PathBuf::from("/rec")),
                schedule: ScheduleConfig {
                    day_of_week: "everyday".to_string(),
                    start_hm: 1200,
                    duration_hm: 100,
                },
            },
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.program.url = url.to_string();
        self
    }

    pub fn file_root(mut self, root: &str) -> Self {
        self.program.file_root = root.to_string();
        self
    }

    pub fn dest_dir(mut self, dir: &str) -> Self {
        self.program.dest_dir = Some(PathBuf::from(dir));
        self
    }

    /// `day` is a day code, `start_hm`/`duration_hm` use `HHMM`.
    pub fn schedule(mut self, day: &str, start_hm: u32, duration_hm: u32) -> Self {
        self.program.schedule = ScheduleConfig {
            day_of_week: day.to_string(),
            start_hm,
            duration_hm,
        };
        self
    }

    pub fn build(self) -> RawProgram {
        self.program
    }

    /// Validated descriptor for a single-program config.
    pub fn descriptor(self) -> ProgramDescriptor {
        let cfg = ConfigFileBuilder::new().with_program(self.program).build();
        cfg.programs.into_iter().next().expect("one program")
    }
}

/// Controller wired to a mock filesystem.
pub fn controller_for(
    descriptor: ProgramDescriptor,
    engine: Arc<dyn CaptureEngine>,
    fs: &MockFileSystem,
) -> ProgramController {
    ProgramController::new(
        ProgramId(0),
        descriptor,
        engine,
        NamingService::new(Arc::new(fs.clone()), "mp3"),
    )
}

/// Dispatcher over `cfg` using a mock filesystem and the given engine/clock.
pub fn dispatcher_for(
    cfg: &ConfigFile,
    engine: Arc<dyn CaptureEngine>,
    fs: &MockFileSystem,
    clock: Arc<dyn Clock>,
) -> Dispatcher {
    let naming = NamingService::new(Arc::new(fs.clone()), cfg.config.extension.clone());
    Dispatcher::from_config(cfg, engine, naming, clock)
}
