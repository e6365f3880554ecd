//! Configuration schema definitions using serde.

use dltrack_common::SameDayPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for dltrack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model hub connection settings.
    pub hub: HubConfig,
    /// Ledger file settings.
    pub ledger: LedgerConfig,
    /// Chart output settings.
    pub charts: ChartsConfig,
}

/// Model hub API configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Base URL of the hub, without the `/api` suffix.
    pub endpoint: String,
    /// Owning organisation or user whose models are tracked.
    pub namespace: String,
    /// Optional bearer token.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubConfig")
            .field("endpoint", &self.endpoint)
            .field("namespace", &self.namespace)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Ledger file configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path of the CSV ledger.
    pub path: PathBuf,
    /// Behaviour when today's date already has a row.
    pub same_day: SameDayPolicy,
}

/// Chart output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Output path of the static PNG chart.
    pub png_path: PathBuf,
    /// Output path of the interactive HTML chart.
    pub html_path: PathBuf,
    /// Number of top models annotated by name in the static chart.
    pub top_n: usize,
    /// PNG width in pixels.
    pub png_width: u32,
    /// PNG height in pixels.
    pub png_height: u32,
    /// HTML chart width in pixels.
    pub html_width: u32,
    /// HTML chart height in pixels.
    pub html_height: u32,
}
