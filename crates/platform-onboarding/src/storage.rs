//! Persisted onboarding storage
//!
//! A small key-value abstraction standing in for client-local storage, plus
//! typed accessors for the keys the onboarding flow uses. Values are plain
//! strings; structured values are JSON.
//!
//! There is no locking or conflict detection: the last writer wins.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::cached::CachedPlanData;
use crate::error::{StorageError, StorageResult};

/// Key holding the JSON-encoded [`CachedPlanData`].
pub const PLAN_SELECTION_KEY: &str = "plan_selection";

/// Key holding the tenant id returned by account creation.
pub const TENANT_ID_KEY: &str = "tenant_id";

/// Key holding `"true"` once the plan summary step is done.
pub const PLAN_SUMMARY_COMPLETED_KEY: &str = "plan_summary_completed";

/// Synchronous string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-memory store.
///
/// Suitable for tests and for single-process use where nothing has to
/// survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Unavailable("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self.values.read().map_err(poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// Directory-backed store, one file per key.
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// crash mid-write leaves either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Opened onboarding file store");
        Ok(Self { dir })
    }

    /// Directory the store writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Unavailable(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;

        // Dropping the temp file on an early return deletes it.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Typed access to the onboarding keys.
///
/// # Examples
///
/// ```
/// use platform_onboarding::storage::{MemoryStore, OnboardingStore};
/// use std::sync::Arc;
///
/// let store = OnboardingStore::new(Arc::new(MemoryStore::new()));
/// store.save_tenant_id("tenant-1").unwrap();
/// assert_eq!(store.tenant_id().unwrap().as_deref(), Some("tenant-1"));
/// ```
#[derive(Clone)]
pub struct OnboardingStore {
    inner: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for OnboardingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingStore").finish_non_exhaustive()
    }
}

impl OnboardingStore {
    /// Wrap a key-value store.
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Underlying key-value store.
    pub fn raw(&self) -> &dyn KeyValueStore {
        self.inner.as_ref()
    }

    /// Persist the plan selection, superseding any earlier one.
    pub fn save_plan_data(&self, data: &CachedPlanData) -> StorageResult<()> {
        let json = serde_json::to_string(data)?;
        self.inner.set(PLAN_SELECTION_KEY, &json)
    }

    /// Read the plan selection.
    ///
    /// `Ok(None)` when nothing is stored; `Err(StorageError::Serialization)`
    /// when the stored value is not a valid selection document.
    pub fn read_plan_data(&self) -> StorageResult<Option<CachedPlanData>> {
        match self.inner.get(PLAN_SELECTION_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Delete the plan selection.
    pub fn clear_plan_data(&self) -> StorageResult<()> {
        self.inner.remove(PLAN_SELECTION_KEY)
    }

    /// Persist the tenant id returned by account creation.
    pub fn save_tenant_id(&self, tenant_id: &str) -> StorageResult<()> {
        self.inner.set(TENANT_ID_KEY, tenant_id)
    }

    /// Read the tenant id.
    pub fn tenant_id(&self) -> StorageResult<Option<String>> {
        Ok(self
            .inner
            .get(TENANT_ID_KEY)?
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty()))
    }

    /// Set the plan summary completed flag. Failures are logged, not returned.
    pub fn mark_plan_summary_completed(&self) {
        if let Err(e) = self.inner.set(PLAN_SUMMARY_COMPLETED_KEY, "true") {
            warn!(error = %e, "Failed to persist plan summary completion");
        }
    }

    /// Read the plan summary completed flag. Failures read as not completed.
    pub fn is_plan_summary_completed(&self) -> bool {
        match self.inner.get(PLAN_SUMMARY_COMPLETED_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "Failed to read plan summary completion");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_billing::{BillingCycle, Plan};
    use rust_decimal::Decimal;

    /// Store whose every operation fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    fn cached() -> CachedPlanData {
        CachedPlanData::new(
            Plan::new("growth", "Growth", Decimal::new(100, 0)),
            BillingCycle::Yearly,
            2,
        )
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).unwrap();

        assert_eq!(store.get(TENANT_ID_KEY).unwrap(), None);
        store.set(TENANT_ID_KEY, "tenant-1").unwrap();
        assert_eq!(store.get(TENANT_ID_KEY).unwrap().as_deref(), Some("tenant-1"));

        let reopened = FileStore::open(store.dir().to_path_buf()).unwrap();
        assert_eq!(reopened.get(TENANT_ID_KEY).unwrap().as_deref(), Some("tenant-1"));

        reopened.remove(TENANT_ID_KEY).unwrap();
        reopened.remove(TENANT_ID_KEY).unwrap();
        assert_eq!(store.get(TENANT_ID_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_concurrent_writers_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let values: Vec<String> = (0..8).map(|i| format!("tenant-{}", i).repeat(256)).collect();

        let handles: Vec<_> = values
            .iter()
            .cloned()
            .map(|value| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        store.set(TENANT_ID_KEY, &value).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = store.get(TENANT_ID_KEY).unwrap().unwrap();
        assert!(values.contains(&stored));

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("tenant_id.json")]);
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_plan_data_round_trip() {
        let store = OnboardingStore::new(Arc::new(MemoryStore::new()));
        assert!(store.read_plan_data().unwrap().is_none());

        store.save_plan_data(&cached()).unwrap();
        assert_eq!(store.read_plan_data().unwrap(), Some(cached()));

        store.clear_plan_data().unwrap();
        assert!(store.read_plan_data().unwrap().is_none());
    }

    #[test]
    fn test_malformed_plan_data() {
        let raw = Arc::new(MemoryStore::new());
        raw.set(PLAN_SELECTION_KEY, "{not json").unwrap();
        let store = OnboardingStore::new(raw);

        assert!(matches!(
            store.read_plan_data(),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_blank_tenant_id_reads_as_missing() {
        let store = OnboardingStore::new(Arc::new(MemoryStore::new()));
        store.save_tenant_id("  ").unwrap();
        assert_eq!(store.tenant_id().unwrap(), None);
    }

    #[test]
    fn test_summary_flag() {
        let store = OnboardingStore::new(Arc::new(MemoryStore::new()));
        assert!(!store.is_plan_summary_completed());

        store.mark_plan_summary_completed();
        assert!(store.is_plan_summary_completed());
        assert_eq!(
            store.raw().get(PLAN_SUMMARY_COMPLETED_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_summary_flag_tolerates_storage_failure() {
        let store = OnboardingStore::new(Arc::new(BrokenStore));
        store.mark_plan_summary_completed();
        assert!(!store.is_plan_summary_completed());
    }
}
