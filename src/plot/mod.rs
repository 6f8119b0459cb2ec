//! Text rendering of chart descriptions for the CLI.

pub mod ascii;

pub use ascii::*;
