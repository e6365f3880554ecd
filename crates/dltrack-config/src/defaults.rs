//! Default configuration values.

use crate::schema::{ChartsConfig, HubConfig, LedgerConfig};
use dltrack_common::SameDayPolicy;
use std::path::PathBuf;

/// Default hub endpoint.
pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";
/// Default namespace whose models are tracked.
pub const DEFAULT_NAMESPACE: &str = "vismatch";
/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
/// Default ledger file name.
pub const DEFAULT_LEDGER_PATH: &str = "downloads.csv";
/// Default static chart file name.
pub const DEFAULT_PNG_PATH: &str = "downloads_per_day.png";
/// Default interactive chart file name.
pub const DEFAULT_HTML_PATH: &str = "downloads_per_day.html";
/// Default number of annotated models.
pub const DEFAULT_TOP_N: usize = 10;

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HUB_ENDPOINT.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LEDGER_PATH),
            same_day: SameDayPolicy::Append,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            png_path: PathBuf::from(DEFAULT_PNG_PATH),
            html_path: PathBuf::from(DEFAULT_HTML_PATH),
            top_n: DEFAULT_TOP_N,
            // 16x9 inches at 150 dpi
            png_width: 2400,
            png_height: 1350,
            html_width: 1200,
            html_height: 700,
        }
    }
}
