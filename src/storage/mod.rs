//! JSON file persistence
//!
//! Finished records (crawl results, aggregated profiles) are written as
//! pretty-printed JSON files under a data directory, keyed by filename.
//! The crawl core never touches this module; the CLI and the aggregator
//! treat it as a write-once sink.

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A key-value blob store over JSON files in one directory
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    /// Creates a store rooted at the given directory
    ///
    /// The directory is created lazily on the first save.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Saves a record under the given key
    ///
    /// A `_metadata` object (ISO-8601 timestamp and format version) is
    /// stamped onto the record before writing.
    ///
    /// # Arguments
    ///
    /// * `key` - Filename of the record, e.g. `website_example_com.json`
    /// * `record` - Any serializable value
    ///
    /// # Returns
    ///
    /// The full path of the written file
    pub fn save<T: Serialize>(&self, key: &str, record: &T) -> StorageResult<PathBuf> {
        std::fs::create_dir_all(&self.data_dir)?;

        let mut value = serde_json::to_value(record)?;
        if let Value::Object(ref mut map) = value {
            map.insert(
                "_metadata".to_string(),
                json!({
                    "timestamp": Utc::now().to_rfc3339(),
                    "version": "1.0",
                }),
            );
        }

        let path = self.data_dir.join(key);
        std::fs::write(&path, serde_json::to_string_pretty(&value)?)?;

        tracing::info!("Saved record to {}", path.display());
        Ok(path)
    }

    /// Loads a record by key
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Value))` - The parsed record
    /// * `Ok(None)` - No file exists under this key
    pub fn load(&self, key: &str) -> StorageResult<Option<Value>> {
        let path = self.data_dir.join(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Lists the keys of all stored records
    pub fn list(&self) -> StorageResult<Vec<String>> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".json") {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Storage key for a crawled website record
pub fn website_key(domain: &str) -> String {
    format!("website_{}.json", domain.replace('.', "_"))
}

/// Storage key for an aggregated company profile
pub fn profile_key(company_name: &str) -> String {
    format!(
        "profile_{}.json",
        company_name.to_lowercase().replace(' ', "_")
    )
}
