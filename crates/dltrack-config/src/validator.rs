//! Runtime validation of loaded configuration.

use crate::schema::Config;
use dltrack_common::{DlTrackError, Result};
use url::Url;

/// Smallest chart dimension accepted, in pixels.
pub const MIN_CHART_DIMENSION: u32 = 200;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates every section, returning the first problem found.
    pub fn validate(config: &Config) -> Result<()> {
        Self::validate_hub(config)?;
        Self::validate_ledger(config)?;
        Self::validate_charts(config)
    }

    fn validate_hub(config: &Config) -> Result<()> {
        let hub = &config.hub;

        let namespace = hub.namespace.trim();
        if namespace.is_empty() {
            return Err(DlTrackError::validation_field(
                "namespace cannot be empty",
                "hub.namespace",
            ));
        }
        if namespace.contains('/') {
            return Err(DlTrackError::validation_field(
                format!("namespace '{namespace}' must not contain '/'"),
                "hub.namespace",
            ));
        }

        let endpoint = Url::parse(&hub.endpoint).map_err(|e| {
            DlTrackError::validation_field(
                format!("endpoint '{}' is not a valid URL: {e}", hub.endpoint),
                "hub.endpoint",
            )
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(DlTrackError::validation_field(
                format!("endpoint scheme '{}' is not http or https", endpoint.scheme()),
                "hub.endpoint",
            ));
        }

        if hub.timeout_seconds == 0 {
            return Err(DlTrackError::validation_field(
                "timeout must be greater than 0",
                "hub.timeout_seconds",
            ));
        }

        Ok(())
    }

    fn validate_ledger(config: &Config) -> Result<()> {
        if config.ledger.path.as_os_str().is_empty() {
            return Err(DlTrackError::validation_field(
                "ledger path cannot be empty",
                "ledger.path",
            ));
        }
        Ok(())
    }

    fn validate_charts(config: &Config) -> Result<()> {
        let charts = &config.charts;

        if charts.png_path.as_os_str().is_empty() {
            return Err(DlTrackError::validation_field(
                "PNG path cannot be empty",
                "charts.png_path",
            ));
        }
        if charts.html_path.as_os_str().is_empty() {
            return Err(DlTrackError::validation_field(
                "HTML path cannot be empty",
                "charts.html_path",
            ));
        }
        if charts.top_n == 0 {
            return Err(DlTrackError::validation_field(
                "top_n must be at least 1",
                "charts.top_n",
            ));
        }

        let dimensions = [
            ("charts.png_width", charts.png_width),
            ("charts.png_height", charts.png_height),
            ("charts.html_width", charts.html_width),
            ("charts.html_height", charts.html_height),
        ];
        for (field, value) in dimensions {
            if value < MIN_CHART_DIMENSION {
                return Err(DlTrackError::validation_field(
                    format!("{value}px is below the {MIN_CHART_DIMENSION}px minimum"),
                    field,
                ));
            }
        }

        Ok(())
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }
}
