//! # dltrack Config
//!
//! Configuration schema, defaults, loading, and validation for dltrack.
//!
//! A config file is optional: without one every value comes from
//! [`defaults`], and environment variables override whatever was loaded.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::*;
pub use schema::*;
pub use validator::*;
