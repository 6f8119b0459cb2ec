//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the loaded series (`RevenueSeries`, `DayRevenue`)
//! - aggregation and forecast outputs (`Bucket`, `LinearFit`, `ForecastResult`)
//! - run configuration (`SalesConfig`, `ForecastParams`)

pub mod types;

pub use types::*;
