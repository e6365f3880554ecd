//! # dltrack Graphs
//!
//! Chart generation for the download ledger.
//!
//! The ledger is turned into a [`CumulativeSeries`] (one row per date, every
//! model relative to the first date) and drawn twice: a static PNG through
//! plotters and a self-contained interactive HTML document. Each model keeps
//! the same color, marker and dash pattern across runs, derived from a hash of
//! its name.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod interactive;
pub mod renderer;
pub mod series;
pub mod static_chart;
pub mod style;

pub use interactive::HtmlChart;
pub use renderer::*;
pub use series::*;
pub use static_chart::PngChart;
pub use style::*;
