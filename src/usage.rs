//! Per-tool usage counters.
//!
//! The HTTP layer bumps the [`PAYROLL_CALCULATOR_TOOL_ID`] counter on every
//! calculation. Counters live behind the [`UsageStore`] trait so the server
//! can keep them in memory or persist them to a JSON file.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Counter key used for payroll calculations.
pub const PAYROLL_CALCULATOR_TOOL_ID: &str = "payroll-calculator";

/// Storage for per-tool usage counts.
pub trait UsageStore: Send + Sync {
    /// Adds one to the counter for `tool_id` and returns the new count.
    fn increment_usage(&self, tool_id: &str) -> EngineResult<u64>;

    /// Returns the count for `tool_id`, or zero if it was never used.
    fn get_usage(&self, tool_id: &str) -> EngineResult<u64>;
}

type Counts = HashMap<String, u64>;

fn lock(counts: &Mutex<Counts>) -> EngineResult<MutexGuard<'_, Counts>> {
    counts
        .lock()
        .map_err(|_| EngineError::UsageStore {
            message: "usage counter lock poisoned".to_string(),
        })
}

/// Usage counts held in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryUsageStore {
    counts: Mutex<HashMap<String, u64>>,
}

impl InMemoryUsageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UsageStore for InMemoryUsageStore {
    fn increment_usage(&self, tool_id: &str) -> EngineResult<u64> {
        let mut counts = lock(&self.counts)?;
        let count = counts.entry(tool_id.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    fn get_usage(&self, tool_id: &str) -> EngineResult<u64> {
        Ok(lock(&self.counts)?.get(tool_id).copied().unwrap_or(0))
    }
}

/// Usage counts persisted as a JSON object of `{ tool_id: count }`.
///
/// The file is replaced after every increment by writing a sibling temporary
/// file and renaming it over the old one. A count only changes in memory once
/// the new file is in place. A missing file reads as an empty store.
#[derive(Debug)]
pub struct FileUsageStore {
    path: PathBuf,
    counts: Mutex<HashMap<String, u64>>,
}

impl FileUsageStore {
    /// Opens the store at `path`, reading any existing counts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UsageStore`] if the file exists but cannot be
    /// read or does not hold a JSON object of counts.
    pub fn open<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let counts = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| EngineError::UsageStore {
                message: format!("failed to read {}: {}", path.display(), e),
            })?;
            serde_json::from_str(&content).map_err(|e| EngineError::UsageStore {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?
        } else {
            HashMap::new()
        };

        debug!(path = %path.display(), tools = counts.len(), "Opened usage store");
        Ok(Self {
            path,
            counts: Mutex::new(counts),
        })
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, counts: &HashMap<String, u64>) -> EngineResult<()> {
        let write_error = |e: std::io::Error| EngineError::UsageStore {
            message: format!("failed to write {}: {}", self.path.display(), e),
        };

        let json = serde_json::to_string_pretty(counts).map_err(|e| EngineError::UsageStore {
            message: e.to_string(),
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
        file.write_all(json.as_bytes()).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        file.persist(&self.path).map_err(|e| write_error(e.error))?;
        Ok(())
    }
}

impl UsageStore for FileUsageStore {
    fn increment_usage(&self, tool_id: &str) -> EngineResult<u64> {
        let mut counts = lock(&self.counts)?;
        let mut updated = counts.clone();
        let count = {
            let entry = updated.entry(tool_id.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        self.persist(&updated)?;
        *counts = updated;
        Ok(count)
    }

    fn get_usage(&self, tool_id: &str) -> EngineResult<u64> {
        Ok(lock(&self.counts)?.get(tool_id).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_unknown_tool_is_zero() {
        let store = InMemoryUsageStore::new();
        assert_eq!(store.get_usage("anything").unwrap(), 0);
    }

    #[test]
    fn test_in_memory_increments_per_tool() {
        let store = InMemoryUsageStore::new();
        assert_eq!(store.increment_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap(), 1);
        assert_eq!(store.increment_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap(), 2);
        assert_eq!(store.increment_usage("other").unwrap(), 1);
        assert_eq!(store.get_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap(), 2);
    }

    #[test]
    fn test_in_memory_concurrent_increments() {
        let store = Arc::new(InMemoryUsageStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.increment_usage("tool").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get_usage("tool").unwrap(), 800);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileUsageStore::open(dir.path().join("usage.json")).unwrap();
        assert_eq!(store.get_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("usage.json");

        {
            let store = FileUsageStore::open(&path).unwrap();
            store.increment_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap();
            store.increment_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap();
        }

        let reopened = FileUsageStore::open(&path).unwrap();
        assert_eq!(reopened.get_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap(), 2);
        assert_eq!(reopened.increment_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap(), 3);

        let on_disk: HashMap<String, u64> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk[PAYROLL_CALCULATOR_TOOL_ID], 3);
    }

    #[test]
    fn test_file_store_failed_write_leaves_count_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_dir").join("usage.json");
        let store = FileUsageStore::open(&path).unwrap();

        match store.increment_usage(PAYROLL_CALCULATOR_TOOL_ID) {
            Err(EngineError::UsageStore { message }) => assert!(message.contains("write")),
            other => panic!("Expected UsageStore error, got {:?}", other),
        }
        assert_eq!(store.get_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        let store = FileUsageStore::open(dir.path().join("usage.json")).unwrap();
        for _ in 0..3 {
            store.increment_usage(PAYROLL_CALCULATOR_TOOL_ID).unwrap();
        }

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("usage.json")]);
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("usage.json");
        fs::write(&path, "not json").unwrap();

        match FileUsageStore::open(&path) {
            Err(EngineError::UsageStore { message }) => assert!(message.contains("parse")),
            other => panic!("Expected UsageStore error, got {:?}", other),
        }
    }
}
