use crate::{CompositeKey, StorageResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sequence number of the transaction that last wrote a key.
pub type Version = u64;

/// Current value of a key together with the version that wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedValue {
    pub value: Value,
    pub version: Version,
}

/// One row of a prefix query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub key: CompositeKey,
    pub value: Value,
    pub version: Version,
}

/// One historical version of a key.
///
/// The ledger stores `KeyVersion<Value>`; callers decode it into their own
/// record type with [`KeyVersion::decode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyVersion<T> {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: T,
}

impl KeyVersion<Value> {
    pub fn decode<T: DeserializeOwned>(self) -> StorageResult<KeyVersion<T>> {
        Ok(KeyVersion {
            tx_id: self.tx_id,
            timestamp: self.timestamp,
            value: serde_json::from_value(self.value)?,
        })
    }
}

/// Keys (and the versions observed) returned by one prefix query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRead {
    pub prefix: CompositeKey,
    pub observed: Vec<(CompositeKey, Version)>,
}

/// Everything a transaction read from committed state.
///
/// `keys` maps each key read to the version seen (`None` when absent).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadSet {
    pub keys: BTreeMap<CompositeKey, Option<Version>>,
    pub ranges: Vec<RangeRead>,
}

impl ReadSet {
    /// Record a point read. The first observation of a key wins.
    pub fn record_key(&mut self, key: &CompositeKey, version: Option<Version>) {
        self.keys.entry(key.clone()).or_insert(version);
    }

    pub fn record_range(&mut self, prefix: &CompositeKey, entries: &[StateEntry]) {
        self.ranges.push(RangeRead {
            prefix: prefix.clone(),
            observed: entries
                .iter()
                .map(|entry| (entry.key.clone(), entry.version))
                .collect(),
        });
    }
}

/// A transaction ready to be validated and committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedTransaction {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub read_set: ReadSet,
    pub writes: BTreeMap<CompositeKey, Value>,
}

/// Hash-chained log entry for a committed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub sequence: u64,
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub keys: Vec<CompositeKey>,
    pub write_digest: String,
    pub previous_hash: Option<String>,
    pub hash: String,
}

/// Full version history of one key, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyHistory {
    pub key: CompositeKey,
    pub versions: Vec<KeyVersion<Value>>,
}

/// Serializable image of an in-memory world state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub state: Vec<StateEntry>,
    pub history: Vec<KeyHistory>,
    pub log: Vec<TransactionRecord>,
}
