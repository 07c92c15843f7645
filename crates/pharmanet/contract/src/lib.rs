//! Pharmanet Contract - pharmaceutical supply chain workflow
//!
//! Organisations register with a role, manufacturers record serialized drug
//! units, buyers order from the level directly above them in the hierarchy,
//! sellers ship through transporters, and retailers sell units to consumers.
//! Every unit keeps a full, replayable version history.
//!
//! All operations go through [`PharmanetContract`], which runs each call as
//! one atomic transaction against an injected
//! [`WorldState`](pharmanet_ledger::WorldState).

#![deny(unsafe_code)]

mod auth;
mod company;
pub mod config;
mod context;
mod contract;
mod drug;
mod error;
mod history;
mod purchase_order;
mod retail;
mod shipment;

pub use auth::Authorizer;
pub use config::{ConfigError, ContractConfig, RetailPolicy};
pub use context::TransactionContext;
pub use contract::PharmanetContract;
pub use error::{ContractError, ContractResult, ErrorKind, Operation};
pub use history::DrugHistory;
