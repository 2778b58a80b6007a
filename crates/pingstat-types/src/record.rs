use std::fmt;

use serde::{Deserialize, Serialize};

/// 8-bit RGB color used to tint a chart column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A successfully parsed stat-file line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based position among the parsed lines of its file.
    pub index: usize,
    /// Leading token of the line, normally `HH:MM:SS`.
    pub time: String,
    /// Latency in ms, 0 for a lost packet.
    pub latency_ms: f64,
    pub lost: bool,
    pub color: Rgb,
}
