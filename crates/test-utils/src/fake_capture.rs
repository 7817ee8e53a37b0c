use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use radiorec::capture::{CaptureEngine, CaptureSession};
use radiorec::errors::CaptureError;

/// One call observed by the fake engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureCall {
    Open { url: String, path: PathBuf },
    Start(PathBuf),
    Stop(PathBuf),
    Release(PathBuf),
}

#[derive(Debug, Default)]
struct Shared {
    calls: Vec<CaptureCall>,
    fail_opens: usize,
    fail_starts: usize,
    fail_stops: bool,
    running: Vec<PathBuf>,
}

/// A capture engine that:
/// - records every open/start/stop/release call
/// - can be told to fail the next N opens or starts, or every stop
/// - tracks which sessions are currently "running".
#[derive(Debug, Clone, Default)]
pub struct FakeCaptureEngine {
    shared: Arc<Mutex<Shared>>,
}

impl FakeCaptureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap()
    }

    pub fn fail_next_opens(&self, n: usize) {
        self.lock().fail_opens = n;
    }

    pub fn fail_next_starts(&self, n: usize) {
        self.lock().fail_starts = n;
    }

    pub fn fail_stops(&self, fail: bool) {
        self.lock().fail_stops = fail;
    }

    pub fn calls(&self) -> Vec<CaptureCall> {
        self.lock().calls.clone()
    }

    /// Paths whose `Start` succeeded.
    pub fn started(&self) -> Vec<PathBuf> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                CaptureCall::Start(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn running(&self) -> Vec<PathBuf> {
        self.lock().running.clone()
    }

    /// Simulate the capture dying on its own (e.g. the stream dropped).
    pub fn kill(&self, path: &Path) {
        self.lock().running.retain(|p| p != path);
    }
}

impl CaptureEngine for FakeCaptureEngine {
    fn open(
        &self,
        source_url: &str,
        destination: &Path,
    ) -> Result<Box<dyn CaptureSession>, CaptureError> {
        let mut shared = self.lock();
        if shared.fail_opens > 0 {
            shared.fail_opens -= 1;
            return Err(CaptureError::Open {
                url: source_url.to_string(),
                reason: "source unreachable".to_string(),
            });
        }
        shared.calls.push(CaptureCall::Open {
            url: source_url.to_string(),
            path: destination.to_path_buf(),
        });

        Ok(Box::new(FakeSession {
            shared: Arc::clone(&self.shared),
            path: destination.to_path_buf(),
            started: false,
            stopped: false,
            released: false,
        }))
    }
}

#[derive(Debug)]
struct FakeSession {
    shared: Arc<Mutex<Shared>>,
    path: PathBuf,
    started: bool,
    stopped: bool,
    released: bool,
}

impl CaptureSession for FakeSession {
    fn start(&mut self) -> Result<(), CaptureError> {
        let mut shared = self.shared.lock().unwrap();
        if self.started {
            return Ok(());
        }
        if shared.fail_starts > 0 {
            shared.fail_starts -= 1;
            return Err(CaptureError::Start {
                path: self.path.display().to_string(),
                reason: "stream refused connection".to_string(),
            });
        }
        self.started = true;
        shared.calls.push(CaptureCall::Start(self.path.clone()));
        shared.running.push(self.path.clone());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        let mut shared = self.shared.lock().unwrap();
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;
        shared.calls.push(CaptureCall::Stop(self.path.clone()));
        if shared.fail_stops {
            return Err(CaptureError::Stop("engine did not respond".to_string()));
        }
        let path = self.path.clone();
        shared.running.retain(|p| *p != path);
        Ok(())
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        let mut shared = self.shared.lock().unwrap();
        if self.released {
            return Ok(());
        }
        self.released = true;
        shared.calls.push(CaptureCall::Release(self.path.clone()));
        Ok(())
    }

    fn is_running(&mut self) -> bool {
        self.shared.lock().unwrap().running.contains(&self.path)
    }
}
