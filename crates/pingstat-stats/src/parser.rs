use pingstat_types::record::Record;
use tracing::debug;

use crate::color::classify_ms;

/// Classification of a single stat-file line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine<'a> {
    Latency { time: &'a str, latency_ms: f64 },
    /// Empty latency field: the probe got no reply.
    Lost { time: &'a str },
    /// Latency field present but not a finite number.
    Malformed { time: &'a str, token: String },
}

/// Splits a line into its time token and latency token. The time token runs
/// up to the first space; every whitespace character is dropped from the
/// remainder.
pub fn parse_line(line: &str) -> ParsedLine<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (time, rest) = line.split_once(' ').unwrap_or((line, ""));
    let token: String = rest.chars().filter(|c| !c.is_whitespace()).collect();

    if token.is_empty() {
        return ParsedLine::Lost { time };
    }
    match token.parse::<f64>() {
        Ok(latency_ms) if latency_ms.is_finite() => ParsedLine::Latency { time, latency_ms },
        _ => ParsedLine::Malformed { time, token },
    }
}

/// Parses a whole stat file into records. Lost packets become zero-latency
/// records; malformed lines are skipped and do not consume an index.
pub fn parse(contents: &str) -> Vec<Record> {
    let mut records = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let (time, latency_ms, lost) = match parse_line(line) {
            ParsedLine::Latency { time, latency_ms } => (time, latency_ms, false),
            ParsedLine::Lost { time } => (time, 0.0, true),
            ParsedLine::Malformed { token, .. } => {
                debug!("skipping line {}: unparsable latency {:?}", line_no + 1, token);
                continue;
            }
        };
        records.push(Record {
            index: records.len() + 1,
            time: time.to_string(),
            latency_ms,
            lost,
            color: classify_ms(latency_ms),
        });
    }
    records
}
