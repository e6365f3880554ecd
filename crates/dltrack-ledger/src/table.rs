//! Typed view of a ledger for charting.

use crate::DATE_COLUMN;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use dltrack_common::{parse_ledger_date, DlTrackError, Result};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One ledger row with every count parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    /// Row date.
    pub date: NaiveDate,
    /// Counts in column order; empty or missing cells are `0`.
    pub values: Vec<u64>,
}

/// A fully parsed ledger, rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerTable {
    /// Model columns in header order.
    pub columns: Vec<String>,
    /// Data rows as they appear in the file.
    pub rows: Vec<LedgerRow>,
}

impl LedgerTable {
    /// Load and parse the ledger at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            DlTrackError::ledger_with_source(format!("Cannot open ledger {}", path.display()), e)
        })?;
        let table = Self::parse(file, &path.display().to_string())?;
        debug!(
            "Loaded {} row(s) x {} model(s) from {}",
            table.rows.len(),
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse a ledger from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::parse(reader, "ledger")
    }

    fn parse<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = model_columns(reader.headers()?, source)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);

            let raw_date = record.get(0).unwrap_or_default();
            let date = parse_ledger_date(raw_date).ok_or_else(|| {
                DlTrackError::ledger(format!("Line {line}: invalid date '{raw_date}'"))
            })?;

            let values = (1..=columns.len())
                .map(|i| parse_count(record.get(i), line, &columns[i - 1]))
                .collect::<Result<Vec<u64>>>()?;

            rows.push(LedgerRow { date, values });
        }

        Ok(Self { columns, rows })
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Model columns named by a ledger header, `date` excluded. `source` names the
/// ledger in error messages.
pub(crate) fn model_columns(header: &StringRecord, source: &str) -> Result<Vec<String>> {
    match header.get(0).map(str::trim) {
        Some(DATE_COLUMN) => Ok(header.iter().skip(1).map(str::to_string).collect()),
        Some("") | None => Err(DlTrackError::ledger(format!("{source} has no header row"))),
        Some(other) => Err(DlTrackError::ledger(format!(
            "{source}: first column is '{other}', expected '{DATE_COLUMN}'"
        ))),
    }
}

fn parse_count(cell: Option<&str>, line: u64, column: &str) -> Result<u64> {
    let cell = cell.map_or("", str::trim);
    if cell.is_empty() {
        return Ok(0);
    }
    cell.parse().map_err(|e| {
        DlTrackError::ledger_with_source(
            format!("Line {line}: column '{column}' has non-integer value '{cell}'"),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ledger;
    use dltrack_common::test_utils::date;
    use dltrack_common::test_utils::ledger_fixtures::{temp_dir, write_ledger};

    #[test]
    fn test_parse_table() {
        let table = LedgerTable::from_reader("date,m1,m2\n2024-01-01,50,0\n2024-01-02,60,10\n".as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["m1", "m2"]);
        assert_eq!(
            table.rows,
            vec![
                LedgerRow {
                    date: date(2024, 1, 1),
                    values: vec![50, 0]
                },
                LedgerRow {
                    date: date(2024, 1, 2),
                    values: vec![60, 10]
                },
            ]
        );
    }

    #[test]
    fn test_empty_and_missing_cells_read_as_zero() {
        let table = LedgerTable::from_reader("date,m1,m2\n2024-01-01,,\n2024-01-02,3\n".as_bytes()).unwrap();
        assert_eq!(table.rows[0].values, vec![0, 0]);
        assert_eq!(table.rows[1].values, vec![3, 0]);
    }

    #[test]
    fn test_bad_count_names_line() {
        let err = LedgerTable::from_reader("date,m1\n2024-01-01,1\n2024-01-02,lots\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DlTrackError::Ledger { .. }));
        let message = err.to_string();
        assert!(message.contains("Line 3"), "{message}");
        assert!(message.contains("lots"), "{message}");
    }

    #[test]
    fn test_bad_date_is_error() {
        let err = LedgerTable::from_reader("date,m1\n01/02/2024,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("invalid date '01/02/2024'"));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = LedgerTable::from_reader("date,m1\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["m1"]);
    }

    #[test]
    fn test_wrong_first_column() {
        let err = LedgerTable::from_reader("when,m1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DlTrackError::Ledger { .. }));
        assert_eq!(
            err.to_string(),
            "Ledger error: ledger: first column is 'when', expected 'date'"
        );
    }

    #[test]
    fn test_header_errors_agree_with_merge() {
        let dir = temp_dir();
        let path = write_ledger(&dir, "when,m1\n");

        let load = LedgerTable::load(&path).unwrap_err().to_string();
        let merge = Ledger::new(&path).columns().unwrap_err().to_string();
        assert_eq!(load, merge);
        assert!(load.contains("first column is 'when'"), "{load}");

        let path = write_ledger(&dir, "");
        let load = LedgerTable::load(&path).unwrap_err().to_string();
        let merge = Ledger::new(&path).columns().unwrap_err().to_string();
        assert_eq!(load, merge);
        assert!(load.contains("has no header row"), "{load}");
    }
}
