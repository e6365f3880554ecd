//! Test utilities and shared fixtures for the dltrack workspace.
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! the unit and integration tests of the other workspace crates.

use crate::Snapshot;
use chrono::NaiveDate;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Build a date, panicking on an invalid calendar day.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Build a snapshot from `(name, downloads)` pairs.
pub fn snapshot(pairs: &[(&str, u64)]) -> Snapshot {
    pairs.iter().map(|(name, count)| (*name, *count)).collect()
}

/// Ledger fixtures written into a temporary directory.
#[cfg(any(test, feature = "tempfile"))]
pub mod ledger_fixtures {
    use std::path::PathBuf;

    /// Create a temporary directory that cleans itself up.
    pub fn temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("Failed to create temporary directory")
    }

    /// Write `contents` to `downloads.csv` inside `dir` and return its path.
    pub fn write_ledger(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("downloads.csv");
        std::fs::write(&path, contents).expect("Failed to write ledger fixture");
        path
    }

    /// Path of a ledger that does not exist yet inside `dir`.
    pub fn missing_ledger(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("downloads.csv")
    }

    /// Read a ledger back as lines with line terminators stripped.
    pub fn read_lines(path: &std::path::Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .expect("Failed to read ledger")
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect()
    }
}
