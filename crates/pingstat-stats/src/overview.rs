use std::collections::BTreeMap;

use pingstat_types::{
    measurement::DateKey,
    summary::{FileSummary, OverallSummary, OverviewRow},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rows for the overview chart plus the totals across all files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    /// Ascending by date key.
    pub rows: Vec<OverviewRow>,
    pub overall: OverallSummary,
}

impl Overview {
    pub fn ascending(&self) -> impl Iterator<Item = &OverviewRow> {
        self.rows.iter()
    }

    /// Newest first, as listed in the navigation menu.
    pub fn descending(&self) -> impl Iterator<Item = &OverviewRow> {
        self.rows.iter().rev()
    }
}

/// Builds one overview row per file name, in ascending order. Names without
/// a summary (unreadable files) are left out.
pub fn combine(summaries: &BTreeMap<DateKey, FileSummary>, file_names: &[DateKey]) -> Overview {
    let mut ordered: Vec<&DateKey> = file_names.iter().collect();
    ordered.sort();
    ordered.dedup();

    let mut included = Vec::with_capacity(ordered.len());
    for key in ordered {
        match summaries.get(key) {
            Some(summary) => included.push(summary),
            None => warn!("no statistics for {}; leaving it out of the overview", key),
        }
    }

    let rows = included
        .iter()
        .enumerate()
        .map(|(index, summary)| OverviewRow {
            index,
            key: summary.key.clone(),
            date: summary.key.display_date(),
            highest: summary.highest,
            lowest: summary.lowest,
            average: round_to(summary.average, 3),
            packets_lost: summary.packets_lost,
        })
        .collect();

    Overview {
        rows,
        overall: overall(included),
    }
}

/// Folds file summaries into totals across all files.
pub fn overall<'a>(summaries: impl IntoIterator<Item = &'a FileSummary>) -> OverallSummary {
    let mut total = OverallSummary::default();
    for summary in summaries {
        total.files += 1;
        total.count += summary.count;
        total.sum += summary.sum;
        total.packets_lost += summary.packets_lost;
        if summary.highest > total.highest {
            total.highest = summary.highest;
        }
        if summary.lowest < total.lowest {
            total.lowest = summary.lowest;
        }
    }
    if total.count > 0 {
        total.average = total.sum / total.count as f64;
    }
    total
}

/// Rounds on the exact decimal value of `value`, so `1.0005` (stored just
/// below the midpoint) rounds down.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use pingstat_types::summary::LOWEST_LATENCY_CEILING;

    fn fixtures() -> (BTreeMap<DateKey, FileSummary>, Vec<DateKey>) {
        let files = [
            ("140224", "10:00:00 \n"),
            ("140223", "10:00:00 12.3\n10:00:01 200.5\n"),
        ];
        let mut summaries = BTreeMap::new();
        let mut names = Vec::new();
        for (name, contents) in files {
            let key = DateKey::new(name);
            summaries.insert(key.clone(), summarize(key.clone(), contents).summary);
            names.push(key);
        }
        (summaries, names)
    }

    #[test]
    fn rows_follow_ascending_file_names() {
        let (summaries, names) = fixtures();
        let overview = combine(&summaries, &names);

        assert_eq!(overview.rows.len(), 2);
        let first = &overview.rows[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.date, "23.02.14");
        assert_eq!(first.highest, 200.5);
        assert_eq!(first.lowest, 12.3);
        assert_eq!(first.average, 106.4);
        assert_eq!(first.packets_lost, 0);

        let second = &overview.rows[1];
        assert_eq!(second.index, 1);
        assert_eq!(second.date, "24.02.14");
        assert_eq!(second.highest, 0.0);
        assert_eq!(second.lowest, LOWEST_LATENCY_CEILING);
        assert_eq!(second.average, 0.0);
        assert_eq!(second.packets_lost, 1);
    }

    #[test]
    fn descending_order_for_navigation() {
        let (summaries, names) = fixtures();
        let overview = combine(&summaries, &names);
        let dates: Vec<&str> = overview.descending().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["24.02.14", "23.02.14"]);
    }

    #[test]
    fn missing_summaries_are_skipped() {
        let (summaries, mut names) = fixtures();
        names.push(DateKey::new("140101"));
        let overview = combine(&summaries, &names);
        let indices: Vec<usize> = overview.ascending().map(|r| r.index).collect();
        assert_eq!(indices, [0, 1]);
        assert_eq!(overview.rows[0].key.as_str(), "140223");
    }

    #[test]
    fn overall_totals_span_all_files() {
        let (summaries, names) = fixtures();
        let total = combine(&summaries, &names).overall;
        assert_eq!(total.files, 2);
        assert_eq!(total.count, 3);
        assert_eq!(total.highest, 200.5);
        assert_eq!(total.lowest, 12.3);
        assert_eq!(total.packets_lost, 1);
        assert!((total.average - 212.8 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn overall_of_nothing_is_default() {
        let total = overall(std::iter::empty());
        assert_eq!(total, OverallSummary::default());
    }

    #[test]
    fn average_is_rounded_to_three_places() {
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
        assert_eq!(round_to(15.0, 3), 15.0);
        assert_eq!(round_to(1.0005, 3), 1.0);
        assert_eq!(round_to(0.0015, 3), 0.001);
        assert_eq!(round_to(106.4, 2), 106.4);
    }

    #[test]
    fn recombining_is_stable() {
        let (summaries, names) = fixtures();
        assert_eq!(combine(&summaries, &names), combine(&summaries, &names));
    }
}
