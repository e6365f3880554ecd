//! Error types and utilities for dltrack

use thiserror::Error;

/// Result type alias for dltrack operations
pub type Result<T> = std::result::Result<T, DlTrackError>;

/// Main error type for dltrack operations
#[derive(Error, Debug)]
pub enum DlTrackError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (connect failures, timeouts, unreadable bodies)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Model hub API errors, including an empty result set
    #[error("Hub API error: {message}")]
    Hub {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Ledger structure errors (missing header, bad date or count)
    #[error("Ledger error: {message}")]
    Ledger {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// CSV reading or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for configuration values
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DlTrackError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new hub API error
    pub fn hub(msg: impl Into<String>) -> Self {
        Self::Hub {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new hub API error with status code
    pub fn hub_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Hub {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new ledger error
    pub fn ledger(msg: impl Into<String>) -> Self {
        Self::Ledger {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new ledger error with source
    pub fn ledger_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Ledger {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// HTTP status code carried by a hub error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Hub { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

/// Convert from reqwest::Error to DlTrackError
impl From<reqwest::Error> for DlTrackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map_or(0, |s| s.as_u16());
            Self::Hub {
                message: format!("HTTP error: {status_code}"),
                status_code: Some(status_code),
                source: Some(Box::new(err)),
            }
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to DlTrackError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for DlTrackError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = DlTrackError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = DlTrackError::config("config issue");
        assert!(config_error.to_string().contains("Configuration error"));
        assert!(config_error.to_string().contains("config issue"));

        let hub_error = DlTrackError::hub_with_status("Server error", 503);
        assert!(hub_error.to_string().contains("Hub API error"));
        assert_eq!(hub_error.status_code(), Some(503));

        let ledger_error = DlTrackError::ledger("missing header");
        assert_eq!(ledger_error.to_string(), "Ledger error: missing header");
        assert_eq!(ledger_error.status_code(), None);

        let validation_error = DlTrackError::validation_field("must not be empty", "namespace");
        assert!(validation_error.to_string().contains("Validation error"));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = DlTrackError::with_source("Failed to read file", io_error);

        assert!(wrapped_error.to_string().contains("Failed to read file"));
        assert!(wrapped_error.source().is_some());

        let ledger_error = DlTrackError::ledger_with_source(
            "bad row",
            io::Error::new(io::ErrorKind::InvalidData, "garbage"),
        );
        assert!(ledger_error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: DlTrackError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_error = serde_json::from_str::<serde_json::Value>(r#"{"invalid": json}"#)
            .unwrap_err();
        let error: DlTrackError = serde_error.into();

        assert!(error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_csv_error_conversion() {
        let data = "date,m1\n2024-01-01,1,2\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let csv_error = reader.records().find_map(|r| r.err()).unwrap();
        let error: DlTrackError = csv_error.into();

        assert!(error.to_string().starts_with("CSV error"));
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = DlTrackError::config_with_source("Middle layer", root_error);
        let top_error = DlTrackError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut depth = 0;
        while let Some(source) = current_error.source() {
            current_error = source;
            depth += 1;
        }

        assert_eq!(depth, 2);
    }
}
