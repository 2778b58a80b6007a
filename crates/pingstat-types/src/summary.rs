use serde::{Deserialize, Serialize};

use crate::measurement::DateKey;

/// Initial value of every "lowest latency" field. Only strictly positive
/// latencies below it replace it.
pub const LOWEST_LATENCY_CEILING: f64 = 100.0;

/// Statistics over all records of one stat file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub key: DateKey,
    pub count: u64,
    pub highest: f64,
    pub lowest: f64,
    pub sum: f64,
    pub average: f64,
    pub packets_lost: u64,
}

impl FileSummary {
    pub fn empty(key: DateKey) -> Self {
        Self {
            key,
            count: 0,
            highest: 0.0,
            lowest: LOWEST_LATENCY_CEILING,
            sum: 0.0,
            average: 0.0,
            packets_lost: 0,
        }
    }
}

/// One day in the overview chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewRow {
    /// Zero-based position in ascending date order.
    pub index: usize,
    pub key: DateKey,
    /// `DD.MM.YY`.
    pub date: String,
    pub highest: f64,
    pub lowest: f64,
    /// Rounded to 3 decimal places.
    pub average: f64,
    pub packets_lost: u64,
}

/// Statistics over every stat file taken together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub files: usize,
    pub count: u64,
    pub highest: f64,
    pub lowest: f64,
    pub sum: f64,
    pub average: f64,
    pub packets_lost: u64,
}

impl Default for OverallSummary {
    fn default() -> Self {
        Self {
            files: 0,
            count: 0,
            highest: 0.0,
            lowest: LOWEST_LATENCY_CEILING,
            sum: 0.0,
            average: 0.0,
            packets_lost: 0,
        }
    }
}
