use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Name of a per-day stat file, `YYMMDD`.
///
/// Keys order lexicographically, which is chronological within a century.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateKey(String);

impl DateKey {
    pub const FORMAT: &'static str = "%y%m%d";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(Self::FORMAT).to_string())
    }

    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reformats `YYMMDD` as `DD.MM.YY`. Names that are not six ASCII digits
    /// are returned unchanged.
    pub fn display_date(&self) -> String {
        let name = self.0.as_str();
        if name.len() != 6 || !name.bytes().all(|b| b.is_ascii_digit()) {
            return name.to_string();
        }
        format!("{}.{}.{}", &name[4..6], &name[2..4], &name[0..2])
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One probe result as it is appended to a stat file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub taken_at: NaiveDateTime,
    /// Round-trip time in milliseconds; `None` records a lost packet.
    pub latency_ms: Option<f64>,
}

impl Measurement {
    pub const TIME_FORMAT: &'static str = "%H:%M:%S";

    pub fn new(taken_at: NaiveDateTime, latency_ms: Option<f64>) -> Self {
        Self {
            taken_at,
            latency_ms,
        }
    }

    pub fn now(latency_ms: Option<f64>) -> Self {
        Self::new(Local::now().naive_local(), latency_ms)
    }

    pub fn lost(taken_at: NaiveDateTime) -> Self {
        Self::new(taken_at, None)
    }

    pub fn is_lost(&self) -> bool {
        self.latency_ms.is_none()
    }

    /// Stat file this measurement belongs to.
    pub fn date_key(&self) -> DateKey {
        DateKey::from_date(self.taken_at.date())
    }

    /// `HH:MM:SS <latency>\n`, with an empty latency field for a lost packet.
    pub fn log_line(&self) -> String {
        let time = self.taken_at.format(Self::TIME_FORMAT);
        match self.latency_ms {
            Some(latency) => format!("{time} {latency}\n"),
            None => format!("{time} \n"),
        }
    }
}
