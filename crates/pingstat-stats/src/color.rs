use pingstat_types::record::Rgb;

/// Maps a latency in whole milliseconds onto the chart gradient:
/// green → yellow → red → magenta → blue → cyan.
pub fn classify(latency_ms: i64) -> Rgb {
    match latency_ms {
        0..=50 => Rgb::new(step(latency_ms, 0, 5), 255, 0),
        51..=75 => Rgb::new(255, 255 - step(latency_ms, 50, 10), 0),
        76..=100 => Rgb::new(255, 0, step(latency_ms, 75, 10)),
        101..=125 => Rgb::new(255 - step(latency_ms, 100, 10), 0, 255),
        126..=150 => Rgb::new(0, step(latency_ms, 125, 10), 255),
        151..=i64::MAX => Rgb::new(0, 255, 255),
        _ => Rgb::BLACK,
    }
}

/// Truncates toward zero, then classifies.
pub fn classify_ms(latency_ms: f64) -> Rgb {
    classify(latency_ms.trunc() as i64)
}

// Band widths keep the product within 0..=250.
fn step(latency_ms: i64, band_start: i64, factor: i64) -> u8 {
    ((latency_ms - band_start) * factor) as u8
}
