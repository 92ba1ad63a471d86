//! Persistence for review items
//!
//! The whole item set is stored as one named record, a JSON array of items.
//! Every save writes a full snapshot:
//! ```text
//! {data_dir}/
//! └── flash10_review_data.json   # Array of all review items
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::models::ReviewItem;

/// Name of the persisted record
pub const RECORD_NAME: &str = "flash10_review_data";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage quota exceeded: {items} items (limit {limit})")]
    QuotaExceeded { items: usize, limit: usize },

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Write rejected: {0}")]
    WriteRejected(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable home of the review item set.
///
/// `load` never fails: missing or unreadable data reads as an empty set.
/// `save` replaces the whole record and reports failures to the caller.
pub trait ReviewStore: Send {
    fn load(&self) -> Vec<ReviewItem>;

    fn save(&mut self, items: &[ReviewItem]) -> Result<()>;
}

impl<S: ReviewStore + ?Sized> ReviewStore for Box<S> {
    fn load(&self) -> Vec<ReviewItem> {
        (**self).load()
    }

    fn save(&mut self, items: &[ReviewItem]) -> Result<()> {
        (**self).save(items)
    }
}

/// Serialize items into the record format
pub fn encode_items(items: &[ReviewItem]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(items)?)
}

/// Parse a record, treating anything unparseable as empty
pub fn decode_items(bytes: &[u8], origin: &str) -> Vec<ReviewItem> {
    match serde_json::from_slice::<Vec<ReviewItem>>(bytes) {
        Ok(items) => items,
        Err(e) => {
            log::warn!("Review data in {} is unreadable, starting empty: {}", origin, e);
            Vec::new()
        }
    }
}

/// Review store backed by a single JSON file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store the record inside `data_dir`
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", RECORD_NAME)),
        }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("flash10"))
            .ok_or(StoreError::DataDirNotFound)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReviewStore for JsonFileStore {
    fn load(&self) -> Vec<ReviewItem> {
        match fs::read(&self.path) {
            Ok(bytes) => decode_items(&bytes, &self.path.display().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!(
                    "Failed to read review data at {}, starting empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Save using atomic write (write to .tmp then rename)
    fn save(&mut self, items: &[ReviewItem]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, encode_items(items)?)?;
        fs::rename(&tmp_path, &self.path)?;
        log::debug!("Saved {} review items to {}", items.len(), self.path.display());
        Ok(())
    }
}

/// In-memory review store.
///
/// Keeps the serialized record so callers can compare persisted bytes, and
/// can simulate a storage quota or a failing write.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    record: Option<Vec<u8>>,
    quota: Option<usize>,
    fail_writes: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an arbitrary record, valid or not
    pub fn from_raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            record: Some(bytes.into()),
            ..Self::default()
        }
    }

    /// Reject saves holding more than `limit` items
    pub fn with_quota(mut self, limit: usize) -> Self {
        self.quota = Some(limit);
        self
    }

    /// Make every subsequent save fail
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The persisted record, if anything was ever saved or seeded
    pub fn bytes(&self) -> Option<&[u8]> {
        self.record.as_deref()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ReviewStore for MemoryStore {
    fn load(&self) -> Vec<ReviewItem> {
        match &self.record {
            Some(bytes) => decode_items(bytes, "memory store"),
            None => Vec::new(),
        }
    }

    fn save(&mut self, items: &[ReviewItem]) -> Result<()> {
        if self.fail_writes {
            return Err(StoreError::WriteRejected("writes disabled".to_string()));
        }
        if let Some(limit) = self.quota {
            if items.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    items: items.len(),
                    limit,
                });
            }
        }
        self.record = Some(encode_items(items)?);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::models::Payload;
    use tempfile::TempDir;

    fn sample_items() -> Vec<ReviewItem> {
        vec![
            ReviewItem::new(
                "apple".to_string(),
                Payload::from(serde_json::json!({"word": "apple"})),
                10,
            ),
            ReviewItem::new("banana".to_string(), Payload::default(), 20),
        ]
    }

    fn create_test_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let (mut store, _temp) = create_test_store();
        let items = sample_items();

        store.save(&items).unwrap();
        assert_eq!(store.load(), items);
        assert!(store.path().ends_with("flash10_review_data.json"));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_creates_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path().join("nested").join("dir"));

        store.save(&sample_items()).unwrap();
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), r#"[{"identity": "apple"}]"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_memory_store_quota() {
        let mut store = MemoryStore::new().with_quota(1);
        let err = store.save(&sample_items()).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { items: 2, limit: 1 }));
        assert!(store.bytes().is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_memory_store_failing_writes_keep_old_record() {
        let mut store = MemoryStore::new();
        store.save(&sample_items()[..1]).unwrap();
        let before = store.bytes().unwrap().to_vec();

        store.fail_writes(true);
        assert!(store.save(&sample_items()).is_err());
        assert_eq!(store.bytes().unwrap(), before.as_slice());
    }

    #[test]
    fn test_memory_store_corrupt_record_loads_empty() {
        let store = MemoryStore::from_raw("\u{0}garbage");
        assert!(store.load().is_empty());
    }
}
