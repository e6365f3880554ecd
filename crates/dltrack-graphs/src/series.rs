//! Cumulative-since-start series built from the ledger.

use chrono::NaiveDate;
use dltrack_common::{format_count, DlTrackError, Result};
use dltrack_ledger::LedgerTable;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Per-model downloads gained since the first ledger date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeSeries {
    dates: Vec<NaiveDate>,
    models: Vec<String>,
    /// `deltas[m][d]` is model `m` on date `d` minus its value on the first date.
    deltas: Vec<Vec<i64>>,
}

impl CumulativeSeries {
    /// Load the ledger at `path` and build the series.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_table(&LedgerTable::load(path)?)
    }

    /// Collapse duplicate dates (last row wins), sort by date and subtract the
    /// first row from every row.
    pub fn from_table(table: &LedgerTable) -> Result<Self> {
        if table.columns.is_empty() {
            return Err(DlTrackError::graph("Ledger has no model columns"));
        }
        if table.is_empty() {
            return Err(DlTrackError::graph("Ledger has no data rows"));
        }

        let by_date: BTreeMap<NaiveDate, &Vec<u64>> =
            table.rows.iter().map(|row| (row.date, &row.values)).collect();
        if by_date.len() < table.rows.len() {
            debug!(
                "Collapsed {} duplicate date row(s)",
                table.rows.len() - by_date.len()
            );
        }

        let dates: Vec<NaiveDate> = by_date.keys().copied().collect();
        let rows: Vec<&Vec<u64>> = by_date.into_values().collect();
        let base = rows[0];

        let deltas = (0..table.columns.len())
            .map(|m| {
                rows.iter()
                    .map(|row| signed(value_at(row, m)) - signed(value_at(base, m)))
                    .collect()
            })
            .collect();

        Ok(Self {
            dates,
            models: table.columns.clone(),
            deltas,
        })
    }

    /// Dates in ascending order, without duplicates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Model names in ledger column order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Deltas of the model at `index`, one per date.
    pub fn values(&self, index: usize) -> &[i64] {
        &self.deltas[index]
    }

    /// Delta of `name` on each date, if the model is known.
    pub fn values_for(&self, name: &str) -> Option<&[i64]> {
        let index = self.models.iter().position(|m| m == name)?;
        Some(self.values(index))
    }

    /// First date of the series.
    pub fn start_date(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Last date of the series.
    pub fn end_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Delta of the model at `index` on the last date.
    pub fn final_value(&self, index: usize) -> i64 {
        self.deltas[index].last().copied().unwrap_or(0)
    }

    /// Model indices ordered by final value descending, then name ascending.
    pub fn ranked(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.models.len()).collect();
        order.sort_by(|&a, &b| {
            self.final_value(b)
                .cmp(&self.final_value(a))
                .then_with(|| self.models[a].cmp(&self.models[b]))
        });
        order
    }

    /// The `n` best-ranked model indices.
    pub fn top(&self, n: usize) -> Vec<usize> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Smallest and largest delta across every model and date.
    pub fn value_range(&self) -> (i64, i64) {
        self.deltas
            .iter()
            .flatten()
            .fold((0, 0), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Days between the first date and the date at `index`.
    pub fn day_offset(&self, index: usize) -> i64 {
        (self.dates[index] - self.start_date()).num_days()
    }

    /// Chart title naming the first date.
    pub fn title(&self) -> String {
        format!(
            "Cumulative Downloads per Model (since {})",
            self.start_date().format("%b %d, %Y")
        )
    }
}

/// Format a signed delta with thousands separators.
pub fn format_delta(value: i64) -> String {
    let formatted = format_count(value.unsigned_abs());
    if value < 0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

fn value_at(row: &[u64], index: usize) -> u64 {
    row.get(index).copied().unwrap_or(0)
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dltrack_common::test_utils::date;
    use dltrack_ledger::LedgerRow;

    fn table(columns: &[&str], rows: Vec<(NaiveDate, Vec<u64>)>) -> LedgerTable {
        LedgerTable {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|(date, values)| LedgerRow { date, values })
                .collect(),
        }
    }

    #[test]
    fn test_cumulative_transform() {
        let t = table(
            &["m1"],
            vec![
                (date(2024, 1, 1), vec![10]),
                (date(2024, 1, 2), vec![20]),
                (date(2024, 1, 3), vec![30]),
            ],
        );
        let series = CumulativeSeries::from_table(&t).unwrap();
        assert_eq!(series.values(0), &[0, 10, 20]);
        assert_eq!(series.values_for("m1"), Some(&[0, 10, 20][..]));
        assert_eq!(series.values_for("m9"), None);
    }

    #[test]
    fn test_duplicates_collapse_and_dates_sort() {
        let t = table(
            &["m1"],
            vec![
                (date(2024, 1, 3), vec![30]),
                (date(2024, 1, 1), vec![10]),
                (date(2024, 1, 3), vec![35]),
                (date(2024, 1, 2), vec![20]),
            ],
        );
        let series = CumulativeSeries::from_table(&t).unwrap();
        assert_eq!(
            series.dates(),
            &[date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
        assert_eq!(series.values(0), &[0, 10, 25]);
        assert_eq!(series.day_offset(2), 2);
    }

    #[test]
    fn test_drops_below_start_go_negative() {
        let t = table(&["m1"], vec![(date(2024, 1, 1), vec![50]), (date(2024, 1, 2), vec![0])]);
        let series = CumulativeSeries::from_table(&t).unwrap();
        assert_eq!(series.values(0), &[0, -50]);
        assert_eq!(series.value_range(), (-50, 0));
    }

    #[test]
    fn test_ranking_breaks_ties_by_name() {
        let t = table(
            &["c", "b", "a", "d"],
            vec![
                (date(2024, 1, 1), vec![0, 0, 0, 0]),
                (date(2024, 1, 2), vec![5, 9, 5, 1]),
            ],
        );
        let series = CumulativeSeries::from_table(&t).unwrap();
        let names: Vec<&str> = series
            .ranked()
            .into_iter()
            .map(|i| series.models()[i].as_str())
            .collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);
        assert_eq!(series.top(2).len(), 2);
        assert_eq!(series.top(10).len(), 4);
    }

    #[test]
    fn test_title_uses_first_date() {
        let t = table(&["m1"], vec![(date(2024, 3, 5), vec![1]), (date(2024, 1, 9), vec![0])]);
        let series = CumulativeSeries::from_table(&t).unwrap();
        assert_eq!(
            series.title(),
            "Cumulative Downloads per Model (since Jan 09, 2024)"
        );
    }

    #[test]
    fn test_empty_ledger_is_graph_error() {
        let err = CumulativeSeries::from_table(&table(&["m1"], vec![])).unwrap_err();
        assert!(matches!(err, DlTrackError::Graph { .. }));

        let err = CumulativeSeries::from_table(&table(&[], vec![(date(2024, 1, 1), vec![])])).unwrap_err();
        assert!(matches!(err, DlTrackError::Graph { .. }));
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(1_234_567), "1,234,567");
        assert_eq!(format_delta(-1_500), "-1,500");
        assert_eq!(format_delta(0), "0");
    }
}
