//! Data transforms behind the chart views.
//!
//! Responsibilities:
//!
//! - bucket a daily series into weekly/monthly sums (`aggregate`)
//! - thin a point sequence for display (`downsample`)
//! - fit a linear trend and project it forward (`forecast`)
//!
//! Everything here is a pure function of its inputs.

pub mod aggregate;
pub mod downsample;
pub mod forecast;

pub use aggregate::*;
pub use downsample::*;
pub use forecast::*;
