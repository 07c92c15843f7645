//! Per-transaction view of the world state.

use crate::{ContractError, ContractResult, Operation};
use chrono::{DateTime, Utc};
use pharmanet_identity::{CallerIdentity, IdentityResolver};
use pharmanet_ledger::{CompositeKey, PreparedTransaction, ReadSet, TransactionRecord, WorldState};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// State of one in-flight transaction: who submitted it, what it read and
/// what it intends to write.
///
/// Reads go to committed state and are recorded in the read set, except for
/// keys this transaction already staged, which read back the staged value.
/// Nothing reaches the world state until [`TransactionContext::commit`].
pub struct TransactionContext<'a> {
    store: &'a dyn WorldState,
    operation: Operation,
    caller: CallerIdentity,
    tx_id: String,
    timestamp: DateTime<Utc>,
    read_set: ReadSet,
    writes: BTreeMap<CompositeKey, Value>,
}

impl<'a> TransactionContext<'a> {
    pub fn begin(
        store: &'a dyn WorldState,
        resolver: &dyn IdentityResolver,
        operation: Operation,
    ) -> ContractResult<Self> {
        let caller = resolver.caller_identity()?;
        Ok(Self {
            store,
            operation,
            caller,
            tx_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            read_set: ReadSet::default(),
            writes: BTreeMap::new(),
        })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn caller(&self) -> &CallerIdentity {
        &self.caller
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Transaction timestamp, shared by every record this transaction writes.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub async fn get<T: DeserializeOwned>(
        &mut self,
        key: &CompositeKey,
    ) -> ContractResult<Option<T>> {
        if let Some(staged) = self.writes.get(key) {
            return Ok(Some(serde_json::from_value(staged.clone())?));
        }

        let current = self.store.get_state(key).await?;
        self.read_set
            .record_key(key, current.as_ref().map(|versioned| versioned.version));
        tracing::debug!(
            tx_id = %self.tx_id,
            key = %key,
            found = current.is_some(),
            "state read"
        );

        match current {
            Some(versioned) => Ok(Some(serde_json::from_value(versioned.value)?)),
            None => Ok(None),
        }
    }

    /// Every record under `prefix`, in key order, with this transaction's
    /// staged writes layered on top.
    pub async fn query_prefix<T: DeserializeOwned>(
        &mut self,
        prefix: &CompositeKey,
    ) -> ContractResult<Vec<T>> {
        let entries = self.store.query_by_prefix(prefix).await?;
        self.read_set.record_range(prefix, &entries);

        let mut merged = entries
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect::<BTreeMap<_, _>>();
        let staged = self
            .writes
            .range(prefix.clone()..)
            .take_while(|(key, _)| prefix.is_prefix_of(key));
        for (key, value) in staged {
            merged.insert(key.clone(), value.clone());
        }
        tracing::debug!(
            tx_id = %self.tx_id,
            prefix = %prefix,
            matches = merged.len(),
            "prefix query"
        );

        merged
            .into_values()
            .map(|value| serde_json::from_value(value).map_err(ContractError::from))
            .collect()
    }

    /// Stage a full new version of the record under `key`.
    pub fn put<T: Serialize>(&mut self, key: &CompositeKey, record: &T) -> ContractResult<()> {
        let value = serde_json::to_value(record)?;
        self.writes.insert(key.clone(), value);
        Ok(())
    }

    /// Hand the read and write sets to the world state for validation and
    /// atomic application.
    pub async fn commit(self) -> ContractResult<TransactionRecord> {
        let transaction = PreparedTransaction {
            tx_id: self.tx_id,
            timestamp: self.timestamp,
            read_set: self.read_set,
            writes: self.writes,
        };
        Ok(self.store.commit(transaction).await?)
    }

    pub fn unauthorized(&self, expected: impl Into<String>) -> ContractError {
        ContractError::unauthorized(
            self.operation,
            expected,
            self.caller.organization_name(),
        )
    }

    pub fn invalid(&self, reason: impl fmt::Display) -> ContractError {
        ContractError::validation(self.operation, reason)
    }

    pub fn not_found(&self, what: impl fmt::Display) -> ContractError {
        ContractError::not_found(self.operation, what)
    }
}
