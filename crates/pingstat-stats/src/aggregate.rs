use pingstat_types::{measurement::DateKey, record::Record, summary::FileSummary};
use serde::{Deserialize, Serialize};

use crate::parser::parse;

/// Left fold of records into a [`FileSummary`].
#[derive(Debug, Clone)]
pub struct Aggregator {
    summary: FileSummary,
}

impl Aggregator {
    pub fn new(key: DateKey) -> Self {
        Self {
            summary: FileSummary::empty(key),
        }
    }

    pub fn observe(&mut self, record: &Record) {
        let summary = &mut self.summary;
        summary.count += 1;
        summary.sum += record.latency_ms;
        if record.lost {
            summary.packets_lost += 1;
        }
        if record.latency_ms > 0.0 {
            if record.latency_ms > summary.highest {
                summary.highest = record.latency_ms;
            }
            if record.latency_ms < summary.lowest {
                summary.lowest = record.latency_ms;
            }
        }
        summary.average = summary.sum / summary.count as f64;
    }

    pub fn summary(&self) -> &FileSummary {
        &self.summary
    }

    pub fn finish(self) -> FileSummary {
        self.summary
    }
}

/// Everything a per-day page needs: the summary and the full record series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySeries {
    pub summary: FileSummary,
    pub records: Vec<Record>,
}

pub fn aggregate(key: DateKey, records: Vec<Record>) -> DaySeries {
    let mut aggregator = Aggregator::new(key);
    for record in &records {
        aggregator.observe(record);
    }
    DaySeries {
        summary: aggregator.finish(),
        records,
    }
}

/// Parses and aggregates the contents of one stat file.
pub fn summarize(key: DateKey, contents: &str) -> DaySeries {
    aggregate(key, parse(contents))
}
