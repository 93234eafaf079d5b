//! Nullable store — thread-safe in-memory transaction storage for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chainwatch_store::{StoreError, TransactionStore};
use chainwatch_types::{Page, StatusUpdate, TxFilter, TxId, TxRecord};

/// An in-memory transaction store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    records: Mutex<HashMap<TxId, TxRecord>>,
    update_errors: Mutex<HashSet<TxId>>,
    fail_finds: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            update_errors: Mutex::new(HashSet::new()),
            fail_finds: AtomicBool::new(false),
        }
    }

    /// Make every status write for `id` fail until cleared.
    pub fn fail_updates_for(&self, id: TxId) {
        self.update_errors.lock().unwrap().insert(id);
    }

    /// Make every `find` call fail while set.
    pub fn set_find_failure(&self, fail: bool) {
        self.fail_finds.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TransactionStore for NullStore {
    async fn create(&self, record: &TxRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id.to_string()));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &TxId) -> Result<TxRecord, StoreError> {
        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn find(&self, filter: &TxFilter, page: Page) -> Result<Vec<TxRecord>, StoreError> {
        if self.fail_finds.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected find failure".to_string()));
        }
        let records = self.records.lock().unwrap();
        let mut matched: Vec<TxRecord> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        // Stable order stands in for the backend's created_at, id ordering.
        matched.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matched
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn monitored(&self) -> Result<Vec<TxRecord>, StoreError> {
        if self.fail_finds.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected find failure".to_string()));
        }
        let records = self.records.lock().unwrap();
        let mut matched: Vec<TxRecord> = records
            .values()
            .filter(|r| r.monitoring && !r.reviewed)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matched)
    }

    async fn update_status(&self, id: &TxId, status: &StatusUpdate) -> Result<(), StoreError> {
        if self.update_errors.lock().unwrap().contains(id) {
            return Err(StoreError::Backend(format!(
                "injected update failure for {id}"
            )));
        }
        let mut records = self.records.lock().unwrap();
        match records.get_mut(id) {
            Some(record) => {
                status.apply_to(record);
                Ok(())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn mark_reviewed(&self, id: &TxId) -> Result<TxRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(id) {
            Some(record) => {
                record.reviewed = true;
                Ok(record.clone())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
