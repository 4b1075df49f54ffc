//! Repair-log KPI reporting.
//!
//! Pipeline: [`loader`] reads the spreadsheet (or its `;`-delimited export)
//! into a [`types::Table`], [`classify`] derives status facts per row, and
//! [`aggregate`] computes the headline KPIs, the current-week metric, the
//! daily series and the problem-type ranking. [`output`] renders and
//! exports the result.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod types;
pub mod util;

pub use aggregate::aggregate;
pub use classify::classify;
pub use error::{Error, Result};
