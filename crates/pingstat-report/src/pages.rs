use std::collections::BTreeMap;

use pingstat_stats::{overview::round_to, DaySeries, Overview};
use pingstat_types::{record::Record, summary::OverviewRow, Result, VERSION};
use serde::Serialize;
use serde_json::json;

use crate::{
    report_error,
    template::{DAY, INDEX, MENU, OVERVIEW},
};

const ROW_SEPARATOR: &str = ",\n                    ";

pub fn day_page(day: &DaySeries, hostname: &str) -> Result<String> {
    let summary = &day.summary;
    let title = format!(
        "Ping Statistics for {} on {}",
        summary.key.display_date(),
        hostname
    );
    let rows = day
        .records
        .iter()
        .map(day_row)
        .collect::<Result<Vec<_>>>()?
        .join(ROW_SEPARATOR);

    let footer = Footer {
        count: summary.count,
        lowest: summary.lowest,
        highest: summary.highest,
        average: summary.average,
        packets_lost: summary.packets_lost,
    };

    let mut values = BTreeMap::new();
    values.insert("title", script_literal(&title)?);
    values.insert("rows", rows);
    values.insert("footer", footer.to_html());
    DAY.render(&values)
}

pub fn overview_page(overview: &Overview, hostname: &str) -> Result<String> {
    let title = format!("Ping Overview on {hostname}");
    let rows = overview
        .ascending()
        .map(overview_row)
        .collect::<Result<Vec<_>>>()?
        .join(ROW_SEPARATOR);

    let total = &overview.overall;
    let footer = Footer {
        count: total.count,
        lowest: total.lowest,
        highest: total.highest,
        average: total.average,
        packets_lost: total.packets_lost,
    };

    let mut values = BTreeMap::new();
    values.insert("title", script_literal(&title)?);
    values.insert("rows", rows);
    values.insert(
        "footer",
        format!(
            "        <b>days</b>: {}<br>\n{}",
            total.files,
            footer.to_html()
        ),
    );
    OVERVIEW.render(&values)
}

/// Links to every day page, newest first.
pub fn menu_page(overview: &Overview) -> Result<String> {
    let links = overview
        .descending()
        .map(|row| {
            format!(
                "        <a href=\"{}.html\" target=\"frame_content\">{}</a><br>",
                escape_html(row.key.as_str()),
                escape_html(&row.date)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut values = BTreeMap::new();
    values.insert("links", links);
    MENU.render(&values)
}

pub fn index_page() -> Result<String> {
    let mut values = BTreeMap::new();
    values.insert("title", "Ping Report".to_string());
    INDEX.render(&values)
}

fn day_row(record: &Record) -> Result<String> {
    script_literal(&json!([
        record.time,
        record.index,
        record.latency_ms,
        format!("color: {};", record.color),
    ]))
}

fn overview_row(row: &OverviewRow) -> Result<String> {
    script_literal(&json!([
        row.index,
        row.date,
        row.highest,
        row.lowest,
        row.average,
        row.packets_lost,
    ]))
}

/// JSON that is safe to embed inside a `<script>` element.
fn script_literal<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map(|json| json.replace("</", "<\\/"))
        .map_err(|err| report_error(format!("failed to encode chart data: {err}")))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct Footer {
    count: u64,
    lowest: f64,
    highest: f64,
    average: f64,
    packets_lost: u64,
}

impl Footer {
    fn to_html(&self) -> String {
        format!(
            "        <b>number of records</b>: {}<br>\n\
             \x20       <b>lowest latency</b>: {} ms<br>\n\
             \x20       <b>highest latency</b>: {} ms<br>\n\
             \x20       <b>average latency</b>: {} ms<br>\n\
             \x20       <b>packets lost</b>: {}<br><br>\n\
             \x20       powered by <b>pingstat</b> version: {}<br><br>",
            self.count,
            round_to(self.lowest, 2),
            round_to(self.highest, 2),
            round_to(self.average, 2),
            self.packets_lost,
            VERSION
        )
    }
}
