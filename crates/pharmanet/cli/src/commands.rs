//! Command implementations

use crate::output::{print_json, LedgerSummary};
use crate::Commands;
use anyhow::{anyhow, Context};
use pharmanet_contract::{ContractConfig, PharmanetContract};
use pharmanet_identity::StaticIdentity;
use pharmanet_ledger::{FileWorldState, LedgerStorageConfig};
use pharmanet_types::OrganizationRole;
use std::path::{Path, PathBuf};

/// Everything one invocation needs: the contract over the opened world
/// state and, when `--org` was given, the identity to submit as.
pub struct Session {
    contract: PharmanetContract,
    storage: LedgerStorageConfig,
    caller: Option<StaticIdentity>,
}

impl Session {
    pub fn open(
        state: Option<PathBuf>,
        config_path: Option<&Path>,
        org: Option<OrganizationRole>,
    ) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => ContractConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ContractConfig::default(),
        };
        let storage = state
            .map(LedgerStorageConfig::file)
            .unwrap_or_else(LedgerStorageConfig::memory);
        let store = storage.open().context("opening world state")?;
        tracing::debug!(
            storage = storage.label(),
            network_domain = %config.network_domain,
            "session opened"
        );

        let caller = org.map(|role| StaticIdentity::new(config.directory().identity_for(role)));
        Ok(Self {
            contract: PharmanetContract::new(store, config),
            storage,
            caller,
        })
    }

    fn caller(&self) -> anyhow::Result<&StaticIdentity> {
        self.caller.as_ref().ok_or_else(|| {
            anyhow!("this command submits a transaction; pass --org or set PHARMANET_ORG")
        })
    }
}

/// Execute one command
pub async fn execute(command: Commands, session: &Session) -> anyhow::Result<()> {
    let contract = &session.contract;
    match command {
        Commands::Register {
            crn,
            name,
            location,
            role,
        } => {
            let organization = contract
                .register(session.caller()?, &crn, &name, &location, &role)
                .await?;
            print_json(&organization)
        }
        Commands::AddDrug {
            name,
            serial,
            manufacturing_date,
            expiry_date,
            manufacturer_crn,
        } => {
            let unit = contract
                .add_drug(
                    session.caller()?,
                    &name,
                    &serial,
                    &manufacturing_date,
                    &expiry_date,
                    &manufacturer_crn,
                )
                .await?;
            print_json(&unit)
        }
        Commands::CreatePo {
            buyer_crn,
            seller_crn,
            drug_name,
            quantity,
        } => {
            let order = contract
                .create_purchase_order(
                    session.caller()?,
                    &buyer_crn,
                    &seller_crn,
                    &drug_name,
                    quantity,
                )
                .await?;
            print_json(&order)
        }
        Commands::CreateShipment {
            buyer_crn,
            drug_name,
            assets,
            transporter_crn,
        } => {
            let shipment = contract
                .create_shipment(
                    session.caller()?,
                    &buyer_crn,
                    &drug_name,
                    &assets,
                    &transporter_crn,
                )
                .await?;
            print_json(&shipment)
        }
        Commands::UpdateShipment {
            buyer_crn,
            drug_name,
            transporter_crn,
        } => {
            let shipment = contract
                .update_shipment(session.caller()?, &buyer_crn, &drug_name, &transporter_crn)
                .await?;
            print_json(&shipment)
        }
        Commands::Retail {
            name,
            serial,
            retailer_crn,
            consumer_id,
        } => {
            let unit = contract
                .retail(session.caller()?, &name, &serial, &retailer_crn, &consumer_id)
                .await?;
            print_json(&unit)
        }
        Commands::ViewState { name, serial } => {
            let unit = contract.current_state(&name, &serial).await?;
            print_json(&unit)
        }
        Commands::ViewHistory { name, serial } => {
            let versions = contract
                .history(&name, &serial)
                .await?
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&versions)
        }
        Commands::VerifyLedger => verify_ledger(&session.storage),
    }
}

fn verify_ledger(storage: &LedgerStorageConfig) -> anyhow::Result<()> {
    let LedgerStorageConfig::File { path } = storage else {
        return Err(anyhow!("verify-ledger needs a snapshot file; pass --state"));
    };
    // Opening a snapshot re-verifies the chain.
    let ledger = FileWorldState::open(path)
        .with_context(|| format!("verifying {}", path.display()))?;
    ledger.verify_chain()?;
    let log = ledger.transaction_log()?;
    print_json(&LedgerSummary {
        path: path.display().to_string(),
        transactions: log.len(),
        head: log.last().map(|record| record.hash.clone()),
        verified: true,
    })
}
