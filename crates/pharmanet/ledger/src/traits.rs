use crate::{
    CompositeKey, HistoryCursor, PreparedTransaction, StateEntry, StorageResult,
    TransactionRecord, VersionedValue,
};
use async_trait::async_trait;

/// Storage interface the workflow core runs against.
///
/// Reads observe committed state only. Writes are never applied one by one:
/// a transaction stages them and hands the whole set to [`WorldState::commit`],
/// which either applies all of them or none.
#[async_trait]
pub trait WorldState: Send + Sync {
    /// Exact-match read of the current value of a key.
    async fn get_state(&self, key: &CompositeKey) -> StorageResult<Option<VersionedValue>>;

    /// All current entries whose key starts with `prefix`, in key order.
    async fn query_by_prefix(&self, prefix: &CompositeKey) -> StorageResult<Vec<StateEntry>>;

    /// Every version ever written for `key`, oldest first.
    async fn history(&self, key: &CompositeKey) -> StorageResult<HistoryCursor>;

    /// Validate the read set against committed state and apply the write set
    /// atomically.
    async fn commit(&self, transaction: PreparedTransaction) -> StorageResult<TransactionRecord>;
}
