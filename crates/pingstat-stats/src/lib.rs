//! Stat-file ingestion: line parsing, latency coloring, and per-file and
//! cross-file aggregation.

pub mod aggregate;
pub mod color;
pub mod overview;
pub mod parser;

pub use aggregate::{aggregate, summarize, Aggregator, DaySeries};
pub use color::classify;
pub use overview::{combine, overall, Overview};
pub use parser::{parse, parse_line, ParsedLine};
