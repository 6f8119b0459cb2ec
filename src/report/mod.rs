//! Plain-text summaries printed by the CLI and shown in the TUI header.

pub mod format;

pub use format::*;
