//! In-memory reference implementation of [`WorldState`].
//!
//! This adapter is deterministic and test-friendly. It keeps the current value
//! of every key, the full per-key version history, and a hash-chained log of
//! committed transactions.

use crate::{
    CompositeKey, HistoryCursor, KeyHistory, KeyVersion, LedgerSnapshot, PreparedTransaction,
    StateEntry, StorageError, StorageResult, TransactionRecord, VersionedValue, WorldState,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory world state adapter.
#[derive(Debug, Default)]
pub struct InMemoryWorldState {
    inner: RwLock<LedgerState>,
}

impl InMemoryWorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a world state from a snapshot, verifying the transaction log.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> StorageResult<Self> {
        let state = LedgerState::from_snapshot(snapshot)?;
        state.verify()?;
        Ok(Self {
            inner: RwLock::new(state),
        })
    }

    pub fn snapshot(&self) -> StorageResult<LedgerSnapshot> {
        Ok(self.read()?.snapshot())
    }

    /// Check log sequencing, hash links and write digests against history.
    pub fn verify_chain(&self) -> StorageResult<()> {
        self.read()?.verify()
    }

    pub fn transaction_log(&self) -> StorageResult<Vec<TransactionRecord>> {
        Ok(self.read()?.log.clone())
    }

    /// Validate and apply `transaction`, calling `persist` with the resulting
    /// snapshot before the new state becomes visible. A failing `persist`
    /// leaves the in-memory state untouched.
    pub(crate) fn commit_persisted<F>(
        &self,
        transaction: PreparedTransaction,
        persist: F,
    ) -> StorageResult<TransactionRecord>
    where
        F: FnOnce(&LedgerSnapshot) -> StorageResult<()>,
    {
        let mut guard = self.write()?;
        guard.validate(&transaction)?;
        let mut next = guard.clone();
        let record = next.apply(transaction)?;
        persist(&next.snapshot())?;
        *guard = next;
        Ok(record)
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, LedgerState>> {
        self.inner
            .read()
            .map_err(|_| StorageError::Backend("world state lock poisoned".to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, LedgerState>> {
        self.inner
            .write()
            .map_err(|_| StorageError::Backend("world state lock poisoned".to_string()))
    }
}

#[async_trait]
impl WorldState for InMemoryWorldState {
    async fn get_state(&self, key: &CompositeKey) -> StorageResult<Option<VersionedValue>> {
        Ok(self.read()?.current.get(key).cloned())
    }

    async fn query_by_prefix(&self, prefix: &CompositeKey) -> StorageResult<Vec<StateEntry>> {
        Ok(self.read()?.scan(prefix))
    }

    async fn history(&self, key: &CompositeKey) -> StorageResult<HistoryCursor> {
        let versions = self
            .read()?
            .history
            .get(key)
            .cloned()
            .unwrap_or_default();
        Ok(HistoryCursor::new(versions))
    }

    async fn commit(&self, transaction: PreparedTransaction) -> StorageResult<TransactionRecord> {
        let mut guard = self.write()?;
        guard.validate(&transaction)?;
        let record = guard.apply(transaction)?;
        tracing::debug!(
            sequence = record.sequence,
            tx_id = %record.tx_id,
            keys = record.keys.len(),
            "transaction committed"
        );
        Ok(record)
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct LedgerState {
    current: BTreeMap<CompositeKey, VersionedValue>,
    history: HashMap<CompositeKey, Vec<KeyVersion<Value>>>,
    log: Vec<TransactionRecord>,
}

impl LedgerState {
    fn scan(&self, prefix: &CompositeKey) -> Vec<StateEntry> {
        self.current
            .range(prefix.clone()..)
            .take_while(|(key, _)| prefix.is_prefix_of(key))
            .map(|(key, versioned)| StateEntry {
                key: key.clone(),
                value: versioned.value.clone(),
                version: versioned.version,
            })
            .collect()
    }

    fn validate(&self, transaction: &PreparedTransaction) -> StorageResult<()> {
        if transaction.writes.is_empty() {
            return Err(StorageError::InvalidInput(format!(
                "transaction {} has an empty write set",
                transaction.tx_id
            )));
        }

        if self.log.iter().any(|record| record.tx_id == transaction.tx_id) {
            return Err(StorageError::Conflict(format!(
                "transaction {} was already committed",
                transaction.tx_id
            )));
        }

        for (key, observed) in &transaction.read_set.keys {
            let current = self.current.get(key).map(|versioned| versioned.version);
            if current != *observed {
                return Err(StorageError::Conflict(format!(
                    "key {} changed since it was read (read {:?}, now {:?})",
                    key, observed, current
                )));
            }
        }

        for range in &transaction.read_set.ranges {
            let current = self
                .scan(&range.prefix)
                .into_iter()
                .map(|entry| (entry.key, entry.version))
                .collect::<Vec<_>>();
            if current != range.observed {
                return Err(StorageError::Conflict(format!(
                    "entries under prefix {} changed since they were queried",
                    range.prefix
                )));
            }
        }

        Ok(())
    }

    fn apply(&mut self, transaction: PreparedTransaction) -> StorageResult<TransactionRecord> {
        let sequence = self.log.len() as u64 + 1;
        let write_digest = digest_writes(&transaction.writes)?;
        let keys = transaction.writes.keys().cloned().collect::<Vec<_>>();
        let previous_hash = self.log.last().map(|record| record.hash.clone());
        let hash = compute_record_hash(
            sequence,
            &transaction.tx_id,
            transaction.timestamp,
            &keys,
            &write_digest,
            previous_hash.as_deref(),
        );

        for (key, value) in transaction.writes {
            self.history.entry(key.clone()).or_default().push(KeyVersion {
                tx_id: transaction.tx_id.clone(),
                timestamp: transaction.timestamp,
                value: value.clone(),
            });
            self.current.insert(
                key,
                VersionedValue {
                    value,
                    version: sequence,
                },
            );
        }

        let record = TransactionRecord {
            sequence,
            tx_id: transaction.tx_id,
            timestamp: transaction.timestamp,
            keys,
            write_digest,
            previous_hash,
            hash,
        };
        self.log.push(record.clone());
        Ok(record)
    }

    fn verify(&self) -> StorageResult<()> {
        let mut previous_hash: Option<String> = None;

        for (position, record) in self.log.iter().enumerate() {
            let expected_sequence = position as u64 + 1;
            if record.sequence != expected_sequence {
                return Err(StorageError::Integrity(format!(
                    "log sequence gap at position {} (found {})",
                    expected_sequence, record.sequence
                )));
            }
            if record.previous_hash != previous_hash {
                return Err(StorageError::Integrity(format!(
                    "broken hash link at sequence {}",
                    record.sequence
                )));
            }

            let writes = record
                .keys
                .iter()
                .map(|key| {
                    self.history
                        .get(key)
                        .and_then(|versions| {
                            versions.iter().find(|version| version.tx_id == record.tx_id)
                        })
                        .map(|version| (key.clone(), version.value.clone()))
                        .ok_or_else(|| {
                            StorageError::Integrity(format!(
                                "history for {} is missing transaction {}",
                                key, record.tx_id
                            ))
                        })
                })
                .collect::<StorageResult<BTreeMap<_, _>>>()?;

            if digest_writes(&writes)? != record.write_digest {
                return Err(StorageError::Integrity(format!(
                    "write digest mismatch at sequence {}",
                    record.sequence
                )));
            }

            let expected_hash = compute_record_hash(
                record.sequence,
                &record.tx_id,
                record.timestamp,
                &record.keys,
                &record.write_digest,
                record.previous_hash.as_deref(),
            );
            if record.hash != expected_hash {
                return Err(StorageError::Integrity(format!(
                    "record hash mismatch at sequence {}",
                    record.sequence
                )));
            }

            previous_hash = Some(record.hash.clone());
        }

        for (key, versioned) in &self.current {
            let latest = self.history.get(key).and_then(|versions| versions.last());
            if latest.map(|version| &version.value) != Some(&versioned.value) {
                return Err(StorageError::Integrity(format!(
                    "current value of {} does not match its latest history entry",
                    key
                )));
            }
        }

        Ok(())
    }

    fn snapshot(&self) -> LedgerSnapshot {
        let state = self
            .current
            .iter()
            .map(|(key, versioned)| StateEntry {
                key: key.clone(),
                value: versioned.value.clone(),
                version: versioned.version,
            })
            .collect();

        let mut history = self
            .history
            .iter()
            .map(|(key, versions)| KeyHistory {
                key: key.clone(),
                versions: versions.clone(),
            })
            .collect::<Vec<_>>();
        history.sort_by(|a, b| a.key.cmp(&b.key));

        LedgerSnapshot {
            state,
            history,
            log: self.log.clone(),
        }
    }

    fn from_snapshot(snapshot: LedgerSnapshot) -> StorageResult<Self> {
        let mut state = Self::default();
        for entry in snapshot.state {
            if state
                .current
                .insert(
                    entry.key.clone(),
                    VersionedValue {
                        value: entry.value,
                        version: entry.version,
                    },
                )
                .is_some()
            {
                return Err(StorageError::Integrity(format!(
                    "duplicate state entry for {}",
                    entry.key
                )));
            }
        }
        for key_history in snapshot.history {
            state.history.insert(key_history.key, key_history.versions);
        }
        state.log = snapshot.log;
        Ok(state)
    }
}

fn digest_writes(writes: &BTreeMap<CompositeKey, Value>) -> StorageResult<String> {
    let bytes = serde_json::to_vec(writes)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

fn compute_record_hash(
    sequence: u64,
    tx_id: &str,
    timestamp: DateTime<Utc>,
    keys: &[CompositeKey],
    write_digest: &str,
    previous_hash: Option<&str>,
) -> String {
    let material = serde_json::json!({
        "sequence": sequence,
        "tx_id": tx_id,
        "timestamp": timestamp,
        "keys": keys,
        "write_digest": write_digest,
        "previous_hash": previous_hash,
    });

    let bytes = serde_json::to_vec(&material).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}
