//! `sales-trends` library crate.
//!
//! The binary (`sales`) is a thin wrapper around this library so the loading,
//! aggregation and forecasting code is testable without spawning processes.

pub mod analysis;
pub mod app;
pub mod chart;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
