//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - forecast CSV / chart JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
