use pharmanet_identity::IdentityError;
use pharmanet_ledger::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type ContractResult<T> = Result<T, ContractError>;

/// Workflow operations exposed by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Register,
    AddDrug,
    CreatePurchaseOrder,
    CreateShipment,
    UpdateShipment,
    Retail,
    History,
    CurrentState,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::AddDrug => "addDrug",
            Self::CreatePurchaseOrder => "createPO",
            Self::CreateShipment => "createShipment",
            Self::UpdateShipment => "updateShipment",
            Self::Retail => "retail",
            Self::History => "history",
            Self::CurrentState => "currentState",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Authorization,
    Validation,
    NotFound,
    Infrastructure,
}

/// Contract errors. Any error aborts the transaction without writes.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error(
        "{operation}: not authorized to initiate the transaction: \
         expected '{expected}', caller is '{actual}'"
    )]
    Authorization {
        operation: Operation,
        expected: String,
        actual: String,
    },

    #[error("{operation}: {reason}")]
    Validation { operation: Operation, reason: String },

    #[error("{operation}: {what} not found")]
    NotFound { operation: Operation, what: String },

    #[error("Ledger error: {0}")]
    Ledger(#[from] StorageError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Record codec error: {0}")]
    Codec(String),
}

impl ContractError {
    pub fn unauthorized(
        operation: Operation,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Authorization {
            operation,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn validation(operation: Operation, reason: impl fmt::Display) -> Self {
        Self::Validation {
            operation,
            reason: reason.to_string(),
        }
    }

    pub fn not_found(operation: Operation, what: impl fmt::Display) -> Self {
        Self::NotFound {
            operation,
            what: what.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Ledger(_) | Self::Identity(_) | Self::Codec(_) => ErrorKind::Infrastructure,
        }
    }
}

impl From<serde_json::Error> for ContractError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        let err = ContractError::unauthorized(
            Operation::AddDrug,
            "manufacturer.pharma-network.com",
            "retailer.pharma-network.com",
        );
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(err.to_string().starts_with("addDrug: not authorized"));

        let err = ContractError::validation(
            Operation::CreatePurchaseOrder,
            "quantity must be at least 1",
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "createPO: quantity must be at least 1");

        let err = ContractError::not_found(Operation::Retail, "drug unit Paracetamol:S9");
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = ContractError::from(StorageError::Conflict("stale read".to_string()));
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
    }
}
