// src/naming/mod.rs

//! Destination file naming.
//!
//! Recordings are named `<YYYYMMDD><file_root><NNN>.<ext>`, e.g.
//! `20211029_WTMD_WWW1_002.mp3`. The sequence number starts at the count of
//! files already matching `<YYYYMMDD><file_root>*.<ext>` in the destination
//! directory and is advanced past any name that is already taken.
//!
//! This process is assumed to own its output directories; concurrent writers
//! from outside may still collide.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDateTime;
use globset::{Glob, GlobMatcher};
use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;

/// Produces unique destination paths for new recordings.
#[derive(Debug, Clone)]
pub struct NamingService {
    fs: Arc<dyn FileSystem>,
    extension: String,
}

impl NamingService {
    pub fn new(fs: Arc<dyn FileSystem>, extension: impl Into<String>) -> Self {
        Self {
            fs,
            extension: extension.into(),
        }
    }

    /// Date prefix for a recording started at `now` (`YYYYMMDD`).
    pub fn date_prefix(now: NaiveDateTime) -> String {
        now.format("%Y%m%d").to_string()
    }

    /// Next free path in `directory` for `date_prefix + file_root`.
    ///
    /// Creates `directory` if it does not exist yet.
    pub fn next_path(&self, directory: &Path, date_prefix: &str, file_root: &str) -> Result<PathBuf> {
        if !self.fs.is_dir(directory) {
            self.fs.create_dir_all(directory)?;
        }

        let stem = format!("{date_prefix}{file_root}");
        let matcher = self.matcher_for(&stem)?;

        let existing: HashSet<String> = self
            .fs
            .read_dir(directory)?
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .filter(|name| matcher.is_match(name))
            .collect();

        let mut seq = existing.len();
        let mut name = self.file_name(&stem, seq);
        while existing.contains(&name) {
            seq += 1;
            name = self.file_name(&stem, seq);
        }

        debug!(
            dir = %directory.display(),
            matching = existing.len(),
            file = %name,
            "picked destination file name"
        );

        Ok(directory.join(name))
    }

    fn matcher_for(&self, stem: &str) -> Result<GlobMatcher> {
        let pattern = format!(
            "{}*.{}",
            globset::escape(stem),
            globset::escape(&self.extension)
        );
        let glob = Glob::new(&pattern).with_context(|| format!("building glob {pattern:?}"))?;
        Ok(glob.compile_matcher())
    }

    fn file_name(&self, stem: &str, seq: usize) -> String {
        format!("{stem}{seq:03}.{}", self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn service(fs: &MockFileSystem) -> NamingService {
        NamingService::new(Arc::new(fs.clone()), "mp3")
    }

    #[test]
    fn first_recording_of_the_day_is_000() {
        let fs = MockFileSystem::new();
        fs.add_dir("/rec");

        let path = service(&fs).next_path(Path::new("/rec"), "20211029", "_WTMD_WWW1_").unwrap();
        assert_eq!(path, PathBuf::from("/rec/20211029_WTMD_WWW1_000.mp3"));
    }

    #[test]
    fn counts_existing_matches() {
        let fs = MockFileSystem::new();
        fs.add_file("/rec/20211029_WTMD_WWW1_000.mp3");
        fs.add_file("/rec/20211029_WTMD_WWW1_001.mp3");

        let path = service(&fs).next_path(Path::new("/rec"), "20211029", "_WTMD_WWW1_").unwrap();
        assert_eq!(path, PathBuf::from("/rec/20211029_WTMD_WWW1_002.mp3"));
    }

    #[test]
    fn ignores_other_roots_dates_and_extensions() {
        let fs = MockFileSystem::new();
        fs.add_file("/rec/20211029_WTMD_WWW2_000.mp3");
        fs.add_file("/rec/20211028_WTMD_WWW1_000.mp3");
        fs.add_file("/rec/20211029_WTMD_WWW1_000.txt");

        let path = service(&fs).next_path(Path::new("/rec"), "20211029", "_WTMD_WWW1_").unwrap();
        assert_eq!(path, PathBuf::from("/rec/20211029_WTMD_WWW1_000.mp3"));
    }

    #[test]
    fn skips_past_taken_sequence_numbers() {
        let fs = MockFileSystem::new();
        fs.add_file("/rec/20211029_WTMD_YAH_000.mp3");
        fs.add_file("/rec/20211029_WTMD_YAH_001.mp3");
        fs.add_file("/rec/20211029_WTMD_YAH_003.mp3");

        // Three matches, but 003 already exists.
        let path = service(&fs).next_path(Path::new("/rec"), "20211029", "_WTMD_YAH_").unwrap();
        assert_eq!(path, PathBuf::from("/rec/20211029_WTMD_YAH_004.mp3"));
    }

    #[test]
    fn glob_metacharacters_in_root_are_literal() {
        let fs = MockFileSystem::new();
        fs.add_file("/rec/20211029_[A]_000.mp3");
        fs.add_file("/rec/20211029_A_000.mp3");

        let path = service(&fs).next_path(Path::new("/rec"), "20211029", "_[A]_").unwrap();
        assert_eq!(path, PathBuf::from("/rec/20211029_[A]_001.mp3"));
    }

    #[test]
    fn creates_missing_directory() {
        let fs = MockFileSystem::new();
        let path = service(&fs).next_path(Path::new("/new/dir"), "20211029", "_X_").unwrap();

        assert!(fs.is_dir(Path::new("/new/dir")));
        assert_eq!(path, PathBuf::from("/new/dir/20211029_X_000.mp3"));
    }
}
