//! Dataset store — the immutable in-memory mock address database.
//!
//! Loaded once from a JSON file at process start; there is no mutation and
//! no reload. All lookups are case-insensitive on the address string and
//! preserve dataset order.

use std::path::Path;

use anyhow::Context;

use explorer_common::types::AddressRecord;

/// In-memory, load-once store of [`AddressRecord`]s.
#[derive(Debug, Clone)]
pub struct AddressStore {
    records: Vec<AddressRecord>,
}

impl AddressStore {
    /// Load the dataset from a JSON array file.
    ///
    /// A missing or malformed file is a startup failure: the caller (the
    /// server binary) propagates the error and the process does not start.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset file {}", path.display()))?;
        let records: Vec<AddressRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse dataset file {}", path.display()))?;

        tracing::info!(count = records.len(), path = %path.display(), "Loaded address dataset");
        Ok(Self { records })
    }

    /// Build a store directly from records (tests, embedded datasets).
    pub fn from_records(records: Vec<AddressRecord>) -> Self {
        Self { records }
    }

    /// All records in dataset order.
    pub fn records(&self) -> &[AddressRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// All records, or only those whose tag case-insensitively equals the
    /// filter. Records without a tag never match a filter.
    pub fn list(&self, tag_filter: Option<&str>) -> Vec<&AddressRecord> {
        match tag_filter {
            Some(filter) => self
                .records
                .iter()
                .filter(|r| {
                    r.tag
                        .as_deref()
                        .is_some_and(|t| t.eq_ignore_ascii_case(filter))
                })
                .collect(),
            None => self.records.iter().collect(),
        }
    }

    /// First record whose address equals the input, ignoring case.
    pub fn find_exact(&self, address: &str) -> Option<&AddressRecord> {
        self.records
            .iter()
            .find(|r| r.address.eq_ignore_ascii_case(address))
    }

    /// First record whose address contains the input substring, ignoring
    /// case. Only used after [`find_exact`](Self::find_exact) misses; short
    /// queries can match unrelated addresses, which is accepted lookup UX.
    pub fn find_fuzzy(&self, query: &str) -> Option<&AddressRecord> {
        let needle = query.to_ascii_lowercase();
        self.records
            .iter()
            .find(|r| r.address.to_ascii_lowercase().contains(&needle))
    }
}
