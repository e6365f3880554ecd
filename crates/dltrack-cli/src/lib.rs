//! # dltrack
//!
//! Command line front end: `fetch` merges today's download counts into the
//! ledger, `plot` renders the charts from it, `run` does both.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
