//! File-backed world state.
//!
//! The in-memory adapter stays authoritative for reads; every commit writes a
//! full JSON snapshot to disk before the new state becomes visible, and the
//! snapshot is hash-verified when it is loaded again.

use crate::memory::InMemoryWorldState;
use crate::{
    CompositeKey, HistoryCursor, LedgerSnapshot, PreparedTransaction, StateEntry, StorageResult,
    TransactionRecord, VersionedValue, WorldState,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// World state persistence backend configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LedgerStorageConfig {
    /// Keep all state in process memory only.
    #[default]
    Memory,
    /// Mirror every commit to a JSON snapshot file and hydrate from it on start.
    File { path: PathBuf },
}

impl LedgerStorageConfig {
    pub fn memory() -> Self {
        Self::Memory
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File { .. } => "file",
        }
    }

    /// Open the configured backend.
    pub fn open(&self) -> StorageResult<Arc<dyn WorldState>> {
        match self {
            Self::Memory => Ok(Arc::new(InMemoryWorldState::new())),
            Self::File { path } => Ok(Arc::new(FileWorldState::open(path)?)),
        }
    }
}

/// World state mirrored to a snapshot file.
#[derive(Debug)]
pub struct FileWorldState {
    memory: InMemoryWorldState,
    path: PathBuf,
}

impl FileWorldState {
    /// Load `path` if it exists, otherwise start empty. The file is created on
    /// the first commit.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let memory = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let snapshot: LedgerSnapshot = serde_json::from_str(&contents)?;
            InMemoryWorldState::from_snapshot(snapshot)?
        } else {
            InMemoryWorldState::new()
        };
        tracing::debug!(path = %path.display(), "world state opened");
        Ok(Self { memory, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn verify_chain(&self) -> StorageResult<()> {
        self.memory.verify_chain()
    }

    pub fn transaction_log(&self) -> StorageResult<Vec<TransactionRecord>> {
        self.memory.transaction_log()
    }
}

fn write_snapshot(path: &Path, snapshot: &LedgerSnapshot) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let staging = path.with_extension("tmp");
    std::fs::write(&staging, serde_json::to_vec_pretty(snapshot)?)?;
    std::fs::rename(&staging, path)?;
    Ok(())
}

#[async_trait]
impl WorldState for FileWorldState {
    async fn get_state(&self, key: &CompositeKey) -> StorageResult<Option<VersionedValue>> {
        self.memory.get_state(key).await
    }

    async fn query_by_prefix(&self, prefix: &CompositeKey) -> StorageResult<Vec<StateEntry>> {
        self.memory.query_by_prefix(prefix).await
    }

    async fn history(&self, key: &CompositeKey) -> StorageResult<HistoryCursor> {
        self.memory.history(key).await
    }

    async fn commit(&self, transaction: PreparedTransaction) -> StorageResult<TransactionRecord> {
        let record = self
            .memory
            .commit_persisted(transaction, |snapshot| write_snapshot(&self.path, snapshot))?;
        tracing::debug!(
            sequence = record.sequence,
            tx_id = %record.tx_id,
            path = %self.path.display(),
            "transaction committed and persisted"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ReadSet, StorageError};
    use chrono::Utc;
    use serde_json::json;

    fn transaction(tx_id: &str, attribute: &str) -> PreparedTransaction {
        PreparedTransaction {
            tx_id: tx_id.to_string(),
            timestamp: Utc::now(),
            read_set: ReadSet::default(),
            writes: [(
                CompositeKey::new("org.test.item", [attribute]).unwrap(),
                json!({"attribute": attribute}),
            )]
            .into_iter()
            .collect(),
        }
    }

    #[tokio::test]
    async fn commits_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("ledger.json");

        let store = FileWorldState::open(&path).unwrap();
        store.commit(transaction("tx-1", "a")).await.unwrap();
        store.commit(transaction("tx-2", "b")).await.unwrap();
        drop(store);

        let reopened = FileWorldState::open(&path).unwrap();
        reopened.verify_chain().unwrap();
        assert_eq!(reopened.transaction_log().unwrap().len(), 2);
        let key = CompositeKey::new("org.test.item", ["b"]).unwrap();
        assert!(reopened.get_state(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rejected_commit_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let store = FileWorldState::open(&path).unwrap();
        store.commit(transaction("tx-1", "a")).await.unwrap();
        let err = store.commit(transaction("tx-1", "b")).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let reopened = FileWorldState::open(&path).unwrap();
        assert_eq!(reopened.transaction_log().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_snapshot_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FileWorldState::open(&path),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn storage_config_labels() {
        assert_eq!(LedgerStorageConfig::default().label(), "memory");
        assert_eq!(LedgerStorageConfig::file("/tmp/x.json").label(), "file");
    }
}
