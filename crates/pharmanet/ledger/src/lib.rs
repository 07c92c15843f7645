//! Pharmanet ledger abstractions.
//!
//! This crate defines the narrow storage contract the workflow core consumes:
//! - exact-match reads of versioned, keyed records
//! - prefix queries over composite keys
//! - append-only per-key version history
//! - atomic, optimistically validated commit of a transaction's write set
//!
//! Design stance:
//! - The production ledger platform owns replication and ordering.
//! - `InMemoryWorldState` is the deterministic reference adapter used by tests
//!   and the CLI; `FileWorldState` mirrors it to a JSON snapshot.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
mod history;
mod key;
pub mod memory;
mod model;
pub mod persistent;
mod traits;

pub use error::{StorageError, StorageResult};
pub use history::HistoryCursor;
pub use key::CompositeKey;
pub use model::{
    KeyHistory, KeyVersion, LedgerSnapshot, PreparedTransaction, RangeRead, ReadSet, StateEntry,
    TransactionRecord, Version, VersionedValue,
};
pub use persistent::{FileWorldState, LedgerStorageConfig};
pub use traits::WorldState;
