//! Abstract storage trait for the chainwatch transaction monitor.
//!
//! Every storage backend (Postgres, in-memory for testing) implements this
//! trait. The rest of the codebase depends only on the trait.

pub mod error;

pub use error::StoreError;

use chainwatch_types::{Page, StatusUpdate, TxFilter, TxId, TxRecord};

/// Persistent home of transaction records.
///
/// Lookups are by transaction hash alone; the hash is unique across chains.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a new record. Fails with [`StoreError::Duplicate`] when a
    /// record with the same hash already exists.
    async fn create(&self, record: &TxRecord) -> Result<(), StoreError>;

    /// Fetch a single record by hash.
    async fn get(&self, id: &TxId) -> Result<TxRecord, StoreError>;

    /// Fetch the records matching `filter`, ordered oldest-first, windowed
    /// by `page`.
    async fn find(&self, filter: &TxFilter, page: Page) -> Result<Vec<TxRecord>, StoreError>;

    /// Snapshot of the sweep working set: every record with
    /// `monitoring && !reviewed`, unwindowed.
    async fn monitored(&self) -> Result<Vec<TxRecord>, StoreError>;

    /// Overwrite the status fields of the record identified by `id`.
    async fn update_status(&self, id: &TxId, status: &StatusUpdate) -> Result<(), StoreError>;

    /// Flag the record identified by `id` as operator-reviewed and return
    /// the record as stored afterwards.
    async fn mark_reviewed(&self, id: &TxId) -> Result<TxRecord, StoreError>;

    /// Liveness probe against the backend.
    async fn ping(&self) -> Result<(), StoreError>;
}
