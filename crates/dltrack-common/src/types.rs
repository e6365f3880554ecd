//! Domain types shared by the fetcher, the ledger, and configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One run's download counts, keyed by model name with the namespace prefix
/// already stripped. Iteration order is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    counts: BTreeMap<String, u64>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the download count for a model, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, downloads: u64) {
        self.counts.insert(name.into(), downloads);
    }

    /// Download count for `name`, or `0` when the model is absent.
    pub fn downloads(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Whether the snapshot has a value for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    /// Model names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// `(name, downloads)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the snapshot has no models.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all download counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// What a merge does when the ledger already has rows for today's date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameDayPolicy {
    /// Append another row; readers keep the last one for a date.
    #[default]
    Append,
    /// Drop existing rows for today's date before writing the new one.
    Replace,
}

impl fmt::Display for SameDayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => f.write_str("append"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

impl FromStr for SameDayPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "replace" => Ok(Self::Replace),
            other => Err(format!("unknown same-day policy '{other}' (expected append or replace)")),
        }
    }
}
