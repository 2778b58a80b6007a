//! Shared domain types for the pingstat workspace.

pub mod config;
pub mod measurement;
pub mod record;
pub mod summary;

mod errors;

pub use errors::{PingstatError, Result};

/// Version string shown in `--version` output and in report footers.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
