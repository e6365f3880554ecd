//! # dltrack Common
//!
//! Shared types, errors, and logging for the dltrack workspace.
//!
//! Every other crate in the workspace returns [`Result`] and speaks in terms of
//! [`Snapshot`], so this crate sits at the bottom of the dependency graph.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{DlTrackError, Result};
pub use types::*;
pub use utils::*;
