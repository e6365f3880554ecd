//! # dltrack Hub
//!
//! HTTP client for the model hub's "list models by author" endpoint and the
//! fetcher that turns its results into a [`dltrack_common::Snapshot`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod fetcher;
pub mod models;

pub use client::*;
pub use fetcher::*;
pub use models::*;
