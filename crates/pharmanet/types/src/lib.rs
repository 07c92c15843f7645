//! Pharmanet Types - records exchanged by the supply chain workflow
//!
//! Every record is immutable-by-replacement: an update writes a complete new
//! version under the same composite key.
#![deny(unsafe_code)]

mod asset;
mod error;
pub mod keys;
mod records;
mod role;

pub use asset::{AssetList, AssetRef};
pub use error::RecordError;
pub use keys::Namespace;
pub use records::{
    parse_date, DrugUnit, Organization, Owner, PurchaseOrder, Shipment, ShipmentStatus,
};
pub use role::{HierarchyRank, OrganizationRole};

pub use pharmanet_ledger::CompositeKey;
