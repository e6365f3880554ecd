//! Configuration loading from YAML files and environment variables.

use crate::schema::Config;
use dltrack_common::{DlTrackError, Result as DlTrackResult, SameDayPolicy};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "DLTRACK_CONFIG_PATH";

/// Config files probed in the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["dltrack.yaml", "dltrack.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError { var: String, message: String },
}

impl From<ConfigError> for DlTrackError {
    fn from(err: ConfigError) -> Self {
        DlTrackError::config_with_source("Configuration loading failed", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration, preferring an explicit path, then
    /// `DLTRACK_CONFIG_PATH`, then a default file in the working directory,
    /// then built-in defaults. Environment overrides are applied last and the
    /// result is validated.
    pub fn load(explicit: Option<&Path>) -> DlTrackResult<Config> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(|| {
                DEFAULT_CONFIG_FILES
                    .iter()
                    .map(PathBuf::from)
                    .find(|candidate| candidate.exists())
            });

        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::read_file(&path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file without applying overrides or validation.
    pub fn read_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse YAML content. Missing sections and fields take their defaults.
    pub fn from_yaml(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides using `lookup` to resolve variable names.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(namespace) = lookup("DLTRACK_NAMESPACE") {
            config.hub.namespace = namespace;
        }

        if let Some(endpoint) = lookup("DLTRACK_HUB_ENDPOINT") {
            config.hub.endpoint = endpoint;
        }

        if let Some(timeout) = lookup("DLTRACK_HUB_TIMEOUT") {
            config.hub.timeout_seconds = parse_env("DLTRACK_HUB_TIMEOUT", &timeout)?;
        }

        if let Some(token) = lookup("HF_TOKEN").filter(|t| !t.trim().is_empty()) {
            config.hub.token = Some(token);
        }

        if let Some(path) = lookup("DLTRACK_LEDGER_PATH") {
            config.ledger.path = PathBuf::from(path);
        }

        if let Some(policy) = lookup("DLTRACK_SAME_DAY") {
            config.ledger.same_day = policy.parse::<SameDayPolicy>().map_err(|message| {
                ConfigError::EnvParseError {
                    var: "DLTRACK_SAME_DAY".to_string(),
                    message,
                }
            })?;
        }

        if let Some(path) = lookup("DLTRACK_PNG_PATH") {
            config.charts.png_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("DLTRACK_HTML_PATH") {
            config.charts.html_path = PathBuf::from(path);
        }

        if let Some(top_n) = lookup("DLTRACK_TOP_N") {
            config.charts.top_n = parse_env("DLTRACK_TOP_N", &top_n)?;
        }

        Ok(())
    }
}

fn parse_env<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvParseError {
        var: var.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ConfigLoader::from_yaml("hub:\n  namespace: \"acme\"\n").unwrap();
        assert_eq!(config.hub.namespace, "acme");
        assert_eq!(config.hub.endpoint, "https://huggingface.co");
        assert_eq!(config.charts.top_n, 10);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ConfigLoader::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_same_day_policy_from_yaml() {
        let config = ConfigLoader::from_yaml("ledger:\n  same_day: replace\n").unwrap();
        assert_eq!(config.ledger.same_day, SameDayPolicy::Replace);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = ConfigLoader::from_yaml("charts:\n  top_n: lots\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        let lookup = lookup_from(&[
            ("DLTRACK_NAMESPACE", "acme"),
            ("DLTRACK_TOP_N", "5"),
            ("HF_TOKEN", "hf_abc"),
            ("DLTRACK_SAME_DAY", "replace"),
            ("DLTRACK_LEDGER_PATH", "data/ledger.csv"),
        ]);
        ConfigLoader::apply_overrides(&mut config, lookup).unwrap();

        assert_eq!(config.hub.namespace, "acme");
        assert_eq!(config.charts.top_n, 5);
        assert_eq!(config.hub.token.as_deref(), Some("hf_abc"));
        assert_eq!(config.ledger.same_day, SameDayPolicy::Replace);
        assert_eq!(config.ledger.path, PathBuf::from("data/ledger.csv"));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let mut config = Config::default();
        ConfigLoader::apply_overrides(&mut config, lookup_from(&[("HF_TOKEN", " ")])).unwrap();
        assert!(config.hub.token.is_none());
    }

    #[test]
    fn test_bad_env_value_names_variable() {
        let mut config = Config::default();
        let err = ConfigLoader::apply_overrides(&mut config, lookup_from(&[("DLTRACK_TOP_N", "ten")]))
            .unwrap_err();
        assert!(err.to_string().contains("DLTRACK_TOP_N"));
    }
}
