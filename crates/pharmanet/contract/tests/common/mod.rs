#![allow(dead_code)]

use pharmanet_contract::{ContractConfig, PharmanetContract};
use pharmanet_identity::{CallerIdentity, MspDirectory, StaticIdentity};
use pharmanet_ledger::memory::InMemoryWorldState;
use pharmanet_types::OrganizationRole;
use std::sync::Arc;

pub const MANUFACTURER_CRN: &str = "MAN001";
pub const DISTRIBUTOR_CRN: &str = "DIST001";
pub const RETAILER_CRN: &str = "RET002";
pub const TRANSPORTER_CRN: &str = "TRA001";

/// A contract over a fresh in-memory ledger plus one identity per role.
pub struct Network {
    pub store: Arc<InMemoryWorldState>,
    pub contract: PharmanetContract,
    pub manufacturer: StaticIdentity,
    pub distributor: StaticIdentity,
    pub retailer: StaticIdentity,
    pub transporter: StaticIdentity,
}

impl Network {
    pub fn new() -> Self {
        Self::with_config(ContractConfig::default())
    }

    pub fn with_config(config: ContractConfig) -> Self {
        let directory = MspDirectory::new(config.network_domain.clone());
        let store = Arc::new(InMemoryWorldState::new());
        let identity = |role: OrganizationRole| StaticIdentity::new(directory.identity_for(role));
        Self {
            contract: PharmanetContract::new(store.clone(), config),
            manufacturer: identity(OrganizationRole::Manufacturer),
            distributor: identity(OrganizationRole::Distributor),
            retailer: identity(OrganizationRole::Retailer),
            transporter: identity(OrganizationRole::Transporter),
            store,
        }
    }

    pub fn outsider(&self) -> StaticIdentity {
        StaticIdentity::new(CallerIdentity::new("regulatorMSP", "regulator.pharma-network.com"))
    }

    /// Register one organisation per role.
    pub async fn register_all(&self) {
        let c = &self.contract;
        c.register(&self.manufacturer, MANUFACTURER_CRN, "Sun Pharma", "Chennai", "Manufacturer")
            .await
            .unwrap();
        c.register(&self.distributor, DISTRIBUTOR_CRN, "VG Pharma", "Vizag", "Distributor")
            .await
            .unwrap();
        c.register(&self.retailer, RETAILER_CRN, "upgrad", "Mumbai", "Retailer")
            .await
            .unwrap();
        c.register(&self.transporter, TRANSPORTER_CRN, "FedEx", "Delhi", "Transporter")
            .await
            .unwrap();
    }

    pub async fn manufacture(&self, name: &str, serials: &[&str]) {
        for serial in serials {
            self.contract
                .add_drug(
                    &self.manufacturer,
                    name,
                    serial,
                    "2024-01-01",
                    "2026-01-01",
                    MANUFACTURER_CRN,
                )
                .await
                .unwrap();
        }
    }
}
