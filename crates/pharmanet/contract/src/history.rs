//! History query over the versions of a drug unit.

use crate::{ContractError, ContractResult, Operation};
use pharmanet_ledger::{CompositeKey, HistoryCursor, KeyVersion, WorldState};
use pharmanet_types::{keys, DrugUnit};

/// Every version ever written for one drug unit, oldest first.
///
/// Versions are decoded as they are pulled. The iterator is finite and cannot
/// be rewound; query the history again to replay it.
#[derive(Debug)]
pub struct DrugHistory {
    key: CompositeKey,
    cursor: HistoryCursor,
}

impl DrugHistory {
    pub fn key(&self) -> &CompositeKey {
        &self.key
    }
}

impl Iterator for DrugHistory {
    type Item = ContractResult<KeyVersion<DrugUnit>>;

    fn next(&mut self) -> Option<Self::Item> {
        let version = self.cursor.next()?;
        Some(version.decode::<DrugUnit>().map_err(ContractError::from))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

impl ExactSizeIterator for DrugHistory {}

pub(crate) async fn history(
    store: &dyn WorldState,
    name: &str,
    serial: &str,
) -> ContractResult<DrugHistory> {
    let operation = Operation::History;
    let key = keys::drug(name, serial).map_err(|err| ContractError::validation(operation, err))?;
    let cursor = store.history(&key).await?;
    if cursor.is_exhausted() {
        return Err(ContractError::not_found(
            operation,
            format!("history for drug unit {} with serial {}", name, serial),
        ));
    }
    tracing::debug!(key = %key, versions = cursor.len(), "history query");
    Ok(DrugHistory { key, cursor })
}
