//! Application-wide error types using thiserror.

use dltrack_common::DlTrackError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[source] DlTrackError),

    /// The hub query failed or returned nothing.
    #[error("Fetch failed: {0}")]
    Fetch(#[source] DlTrackError),

    /// The ledger could not be read or updated.
    #[error("Ledger update failed: {0}")]
    Ledger(#[source] DlTrackError),

    /// Charts could not be rendered.
    #[error("Chart rendering failed: {0}")]
    Plot(#[source] DlTrackError),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
