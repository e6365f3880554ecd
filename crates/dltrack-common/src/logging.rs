//! Structured logging setup shared by the dltrack binary and tests

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fallback filter when neither `RUST_LOG` nor the configured level parses
const FALLBACK_LEVEL: &str = "info";

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "dltrack_hub=debug")
    pub level: String,
    /// Whether to emit one JSON object per event
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: FALLBACK_LEVEL.to_string(),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Build a configuration for the given filter directive
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// Switch between human-readable and JSON output
    #[must_use]
    pub fn with_json(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }

    /// Resolve the effective filter from the process environment
    pub fn env_filter(&self) -> EnvFilter {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        self.resolve_filter(rust_log.as_deref())
    }

    /// `RUST_LOG` wins over the configured level; an unparsable directive
    /// falls through to the next candidate and finally to `info`.
    pub fn resolve_filter(&self, rust_log: Option<&str>) -> EnvFilter {
        rust_log
            .filter(|directives| !directives.trim().is_empty())
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .or_else(|| EnvFilter::try_new(&self.level).ok())
            .unwrap_or_else(|| EnvFilter::new(FALLBACK_LEVEL))
    }
}

/// Initialize the tracing subscriber with the given configuration. Events are
/// written to stderr.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    if config.json_format {
        let layer = fmt::layer().json().with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer().with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
    }

    #[test]
    fn test_with_level_and_json() {
        let config = LoggingConfig::with_level("dltrack_hub=debug").with_json(true);
        assert_eq!(config.level, "dltrack_hub=debug");
        assert!(config.json_format);
    }

    #[test]
    fn test_configured_level_used_without_rust_log() {
        let config = LoggingConfig::with_level("warn");
        assert_eq!(config.resolve_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(config.resolve_filter(Some("  ")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_rust_log_wins_over_configured_level() {
        let config = LoggingConfig::with_level("warn");
        assert_eq!(
            config.resolve_filter(Some("trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_bad_directives_fall_back() {
        let config = LoggingConfig::with_level("error");
        assert_eq!(
            config.resolve_filter(Some("=[")).max_level_hint(),
            Some(LevelFilter::ERROR)
        );

        let config = LoggingConfig::with_level("=[");
        assert_eq!(config.resolve_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            config.resolve_filter(Some("=[")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
