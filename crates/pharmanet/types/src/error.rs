use crate::ShipmentStatus;
use chrono::NaiveDate;
use thiserror::Error;

/// Structural problems detected while building or parsing records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("unrecognized organisation role '{0}'")]
    UnknownRole(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("malformed asset token '{0}': expected 'drugName|serialNumber'")]
    MalformedAsset(String),

    #[error("asset list is empty")]
    EmptyAssetList,

    #[error("asset '{0}' is listed more than once")]
    DuplicateAsset(String),

    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("expiry date {expires} is not after manufacturing date {manufactured}")]
    ExpiryNotAfterManufacture {
        manufactured: NaiveDate,
        expires: NaiveDate,
    },

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    #[error("shipment cannot move from '{from}' to '{to}'")]
    InvalidTransition {
        from: ShipmentStatus,
        to: ShipmentStatus,
    },
}
