//! Persisted account name to archive descriptor records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::PathStoreError;

use super::ArchiveDescriptor;

/// Storage for cached archive root resolutions.
///
/// Records are advisory: a descriptor that no longer resolves is replaced by
/// the next successful search. Records are never removed.
pub trait ArchivePathStore {
    fn get(&self, account: &str) -> Option<ArchiveDescriptor>;

    fn put(&mut self, account: &str, descriptor: ArchiveDescriptor)
        -> Result<(), PathStoreError>;
}

/// In-process records, used for simulate runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchivePaths {
    records: BTreeMap<String, ArchiveDescriptor>,
}

impl MemoryArchivePaths {
    pub fn new(records: BTreeMap<String, ArchiveDescriptor>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &BTreeMap<String, ArchiveDescriptor> {
        &self.records
    }
}

impl ArchivePathStore for MemoryArchivePaths {
    fn get(&self, account: &str) -> Option<ArchiveDescriptor> {
        self.records.get(account).cloned()
    }

    fn put(
        &mut self,
        account: &str,
        descriptor: ArchiveDescriptor,
    ) -> Result<(), PathStoreError> {
        self.records.insert(account.to_string(), descriptor);
        Ok(())
    }
}

/// Write-through records kept in the `archive_paths` member of the config
/// file. Every other member of the file is preserved as-is.
#[derive(Debug)]
pub struct ConfigFileArchivePaths {
    path: PathBuf,
    records: BTreeMap<String, ArchiveDescriptor>,
}

impl ConfigFileArchivePaths {
    pub fn new<P: AsRef<Path>>(path: P, records: BTreeMap<String, ArchiveDescriptor>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            records,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &BTreeMap<String, ArchiveDescriptor> {
        &self.records
    }

    fn persist(&self) -> Result<(), PathStoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| PathStoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        let mut document: serde_json::Value = serde_json::from_str(&content)?;

        let object = document
            .as_object_mut()
            .ok_or_else(|| PathStoreError::NotAnObject(self.path.clone()))?;
        object.insert(
            "archive_paths".to_string(),
            serde_json::to_value(&self.records)?,
        );

        let encoded = serde_json::to_string_pretty(&document)?;
        write_atomically(&self.path, encoded.as_bytes())?;

        debug!(
            "Saved {} archive path record(s) to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl ArchivePathStore for ConfigFileArchivePaths {
    fn get(&self, account: &str) -> Option<ArchiveDescriptor> {
        self.records.get(account).cloned()
    }

    fn put(
        &mut self,
        account: &str,
        descriptor: ArchiveDescriptor,
    ) -> Result<(), PathStoreError> {
        let previous = self.records.insert(account.to_string(), descriptor);
        if let Err(e) = self.persist() {
            // Keep memory and disk in agreement.
            match previous {
                Some(previous) => self.records.insert(account.to_string(), previous),
                None => self.records.remove(account),
            };
            return Err(e);
        }
        Ok(())
    }
}

/// Writes to a sibling temp file and renames it over the destination.
fn write_atomically(path: &Path, content: &[u8]) -> Result<(), PathStoreError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("config.json");
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name));

    std::fs::write(&tmp_path, content).map_err(|e| PathStoreError::Write {
        path: tmp_path.clone(),
        source: e,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| PathStoreError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
