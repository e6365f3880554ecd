//! Snapshot merge with schema growth.
//!
//! Existing columns keep their position; names first seen today are appended
//! in sorted order and every earlier row gets `0` for them. When no column is
//! added the new row is appended in place. Any change to earlier rows goes
//! through a temporary file that is persisted over the original.

use crate::table::model_columns;
use crate::{BACKFILL_VALUE, DATE_COLUMN};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use dltrack_common::{format_ledger_date, DlTrackError, Result, SameDayPolicy, Snapshot};
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// What a merge did to the ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The file did not exist and was created with these model columns.
    Created {
        /// Model columns in header order.
        columns: Vec<String>,
    },
    /// One row was appended; the header is unchanged.
    Appended,
    /// New columns were introduced and earlier rows back-filled.
    Rewritten {
        /// Columns added by this merge, in the order they were appended.
        new_columns: Vec<String>,
    },
    /// Existing rows for the same date were dropped before writing.
    Replaced {
        /// Number of rows removed for the merged date.
        replaced_rows: usize,
        /// Columns added by this merge, possibly empty.
        new_columns: Vec<String>,
    },
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created { columns } => {
                write!(f, "created ledger with {} model(s)", columns.len())
            }
            Self::Appended => f.write_str("appended row"),
            Self::Rewritten { new_columns } => write!(
                f,
                "added {} new model(s): {}",
                new_columns.len(),
                new_columns.join(", ")
            ),
            Self::Replaced {
                replaced_rows,
                new_columns,
            } => write!(
                f,
                "replaced {replaced_rows} row(s) for the same date, {} new model(s)",
                new_columns.len()
            ),
        }
    }
}

/// A ledger file on disk.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    policy: SameDayPolicy,
}

impl Ledger {
    /// Ledger at `path` using the default same-day policy.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: SameDayPolicy::default(),
        }
    }

    /// Set how a merge treats rows already present for the merged date.
    #[must_use]
    pub fn with_policy(mut self, policy: SameDayPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the ledger file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Model columns of the existing file in header order, `date` excluded.
    pub fn columns(&self) -> Result<Vec<String>> {
        let mut reader = self.reader()?;
        let header = reader.headers()?;
        model_columns(header, &self.path.display().to_string())
    }

    /// Merge `snapshot` as the row for `date`.
    #[instrument(skip(self, snapshot), fields(path = %self.path.display(), models = snapshot.len()))]
    pub fn merge(&self, snapshot: &Snapshot, date: NaiveDate) -> Result<MergeOutcome> {
        let date = format_ledger_date(date);

        if !self.exists() {
            let columns: Vec<String> = snapshot.names().map(str::to_string).collect();
            let row = snapshot_row(&date, &columns, snapshot);
            write_atomic(&self.path, &header_for(&columns), std::iter::once(row))?;
            info!("Created {} with {} model(s)", self.path.display(), columns.len());
            return Ok(MergeOutcome::Created { columns });
        }

        let existing = self.columns()?;
        let columns = plan_columns(&existing, snapshot);
        let new_columns = columns[existing.len()..].to_vec();

        let stale_rows = match self.policy {
            SameDayPolicy::Append => 0,
            SameDayPolicy::Replace => self.count_rows_for(&date)?,
        };

        if new_columns.is_empty() && stale_rows == 0 {
            self.append_row(&snapshot_row(&date, &columns, snapshot))?;
            debug!("Appended row for {}", date);
            return Ok(MergeOutcome::Appended);
        }

        self.rewrite(&existing, &columns, snapshot, &date)?;
        if !new_columns.is_empty() {
            info!("New models added: {}", new_columns.join(", "));
        }

        if stale_rows > 0 {
            info!("Replaced {} existing row(s) for {}", stale_rows, date);
            Ok(MergeOutcome::Replaced {
                replaced_rows: stale_rows,
                new_columns,
            })
        } else {
            Ok(MergeOutcome::Rewritten { new_columns })
        }
    }

    fn reader(&self) -> Result<csv::Reader<File>> {
        Ok(ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?)
    }

    fn count_rows_for(&self, date: &str) -> Result<usize> {
        let mut count = 0;
        for record in self.reader()?.records() {
            if record?.get(0).map(str::trim) == Some(date) {
                count += 1;
            }
        }
        Ok(count)
    }

    fn append_row(&self, row: &[String]) -> Result<()> {
        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;

        if file.metadata()?.len() > 0 {
            file.seek(SeekFrom::End(-1))?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
            }
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }

    /// Re-emit every kept row under `columns`, then the row for `date`.
    fn rewrite(
        &self,
        existing: &[String],
        columns: &[String],
        snapshot: &Snapshot,
        date: &str,
    ) -> Result<()> {
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(existing.len());
        for (i, name) in existing.iter().enumerate() {
            positions.entry(name.as_str()).or_insert(i + 1);
        }

        let drop_same_day = self.policy == SameDayPolicy::Replace;
        let mut rows = Vec::new();
        for record in self.reader()?.records() {
            let record = record?;
            if drop_same_day && record.get(0).map(str::trim) == Some(date) {
                continue;
            }
            rows.push(backfill_row(&record, columns, &positions, &self.path));
        }
        rows.push(snapshot_row(date, columns, snapshot));

        debug!("Rewriting {} row(s) across {} column(s)", rows.len(), columns.len());
        write_atomic(&self.path, &header_for(columns), rows.into_iter())
    }
}

/// Merge `snapshot` into the ledger at `path` with the default policy.
pub fn merge_snapshot(path: impl Into<PathBuf>, snapshot: &Snapshot, date: NaiveDate) -> Result<MergeOutcome> {
    Ledger::new(path).merge(snapshot, date)
}

/// Existing columns followed by the snapshot's unseen names in sorted order.
pub fn plan_columns(existing: &[String], snapshot: &Snapshot) -> Vec<String> {
    let known: BTreeSet<&str> = existing.iter().map(String::as_str).collect();
    let mut columns = existing.to_vec();
    columns.extend(
        snapshot
            .names()
            .filter(|name| !known.contains(name))
            .map(str::to_string),
    );
    columns
}

fn header_for(columns: &[String]) -> Vec<String> {
    std::iter::once(DATE_COLUMN.to_string())
        .chain(columns.iter().cloned())
        .collect()
}

fn snapshot_row(date: &str, columns: &[String], snapshot: &Snapshot) -> Vec<String> {
    std::iter::once(date.to_string())
        .chain(columns.iter().map(|name| snapshot.downloads(name).to_string()))
        .collect()
}

fn backfill_row(
    record: &StringRecord,
    columns: &[String],
    positions: &HashMap<&str, usize>,
    path: &Path,
) -> Vec<String> {
    let expected = positions.len() + 1;
    if record.len() < expected {
        let line = record.position().map_or(0, csv::Position::line);
        warn!(
            "{}:{} has {} of {} fields, missing values read as 0",
            path.display(),
            line,
            record.len(),
            expected
        );
    }

    std::iter::once(record.get(0).unwrap_or_default().to_string())
        .chain(columns.iter().map(|name| {
            positions
                .get(name.as_str())
                .and_then(|&i| record.get(i))
                .unwrap_or(BACKFILL_VALUE)
                .to_string()
        }))
        .collect()
}

/// Write a whole ledger to a sibling temporary file and move it over `path`.
fn write_atomic<I>(path: &Path, header: &[String], rows: I) -> Result<()>
where
    I: Iterator<Item = Vec<String>>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = WriterBuilder::new().from_writer(temp.as_file_mut());
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(&row)?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| {
        DlTrackError::ledger_with_source(format!("Failed to replace {}", path.display()), e.error)
    })?;
    Ok(())
}
