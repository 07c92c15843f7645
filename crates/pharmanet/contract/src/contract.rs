use crate::auth::Authorizer;
use crate::history::DrugHistory;
use crate::{
    company, drug, history, purchase_order, retail, shipment, ContractConfig, ContractResult,
    Operation, TransactionContext,
};
use pharmanet_identity::{IdentityResolver, MspDirectory};
use pharmanet_ledger::WorldState;
use pharmanet_types::{DrugUnit, Organization, PurchaseOrder, Shipment};
use std::sync::Arc;

/// Entry point of the supply chain workflow.
///
/// Every mutating operation runs as one transaction: the caller is resolved,
/// records are read and validated, new versions are staged, and the staged
/// writes are committed together only if every check passed.
pub struct PharmanetContract {
    store: Arc<dyn WorldState>,
    config: ContractConfig,
    directory: MspDirectory,
}

impl PharmanetContract {
    pub fn new(store: Arc<dyn WorldState>, config: ContractConfig) -> Self {
        let directory = config.directory();
        Self {
            store,
            config,
            directory,
        }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn directory(&self) -> &MspDirectory {
        &self.directory
    }

    /// Register an organisation. Open to any caller.
    pub async fn register(
        &self,
        caller: &dyn IdentityResolver,
        crn: &str,
        name: &str,
        location: &str,
        role: &str,
    ) -> ContractResult<Organization> {
        let mut ctx = self.begin(caller, Operation::Register)?;
        let outcome = company::register(&mut ctx, crn, name, location, role).await;
        self.finish(ctx, outcome).await
    }

    /// Record a newly manufactured unit. Manufacturer only.
    pub async fn add_drug(
        &self,
        caller: &dyn IdentityResolver,
        name: &str,
        serial: &str,
        manufacturing_date: &str,
        expiry_date: &str,
        manufacturer_crn: &str,
    ) -> ContractResult<DrugUnit> {
        let mut ctx = self.begin(caller, Operation::AddDrug)?;
        let outcome = drug::add_drug(
            &mut ctx,
            &self.authorizer(),
            name,
            serial,
            manufacturing_date,
            expiry_date,
            manufacturer_crn,
        )
        .await;
        self.finish(ctx, outcome).await
    }

    /// Place an order one level up the hierarchy. Distributors and retailers
    /// only.
    pub async fn create_purchase_order(
        &self,
        caller: &dyn IdentityResolver,
        buyer_crn: &str,
        seller_crn: &str,
        drug_name: &str,
        quantity: u32,
    ) -> ContractResult<PurchaseOrder> {
        let mut ctx = self.begin(caller, Operation::CreatePurchaseOrder)?;
        let outcome = purchase_order::create(
            &mut ctx,
            &self.authorizer(),
            buyer_crn,
            seller_crn,
            drug_name,
            quantity,
        )
        .await;
        self.finish(ctx, outcome).await
    }

    /// Hand the units fulfilling an order to a transporter. `asset_list` is a
    /// comma-separated list of `drugName|serial` tokens.
    pub async fn create_shipment(
        &self,
        caller: &dyn IdentityResolver,
        buyer_crn: &str,
        drug_name: &str,
        asset_list: &str,
        transporter_crn: &str,
    ) -> ContractResult<Shipment> {
        let mut ctx = self.begin(caller, Operation::CreateShipment)?;
        let outcome = shipment::create(
            &mut ctx,
            &self.authorizer(),
            buyer_crn,
            drug_name,
            asset_list,
            transporter_crn,
        )
        .await;
        self.finish(ctx, outcome).await
    }

    /// Confirm delivery of a shipment to its buyer. Transporter only.
    pub async fn update_shipment(
        &self,
        caller: &dyn IdentityResolver,
        buyer_crn: &str,
        drug_name: &str,
        transporter_crn: &str,
    ) -> ContractResult<Shipment> {
        let mut ctx = self.begin(caller, Operation::UpdateShipment)?;
        let outcome = shipment::update(
            &mut ctx,
            &self.authorizer(),
            buyer_crn,
            drug_name,
            transporter_crn,
        )
        .await;
        self.finish(ctx, outcome).await
    }

    /// Sell a unit to a consumer. Retailer only.
    pub async fn retail(
        &self,
        caller: &dyn IdentityResolver,
        name: &str,
        serial: &str,
        retailer_crn: &str,
        consumer_id: &str,
    ) -> ContractResult<DrugUnit> {
        let mut ctx = self.begin(caller, Operation::Retail)?;
        let outcome = retail::retail(
            &mut ctx,
            &self.authorizer(),
            self.config.retail_policy,
            name,
            serial,
            retailer_crn,
            consumer_id,
        )
        .await;
        self.finish(ctx, outcome).await
    }

    pub async fn history(&self, name: &str, serial: &str) -> ContractResult<DrugHistory> {
        history::history(self.store.as_ref(), name, serial)
            .await
            .inspect_err(|err| reject(Operation::History, err))
    }

    pub async fn current_state(&self, name: &str, serial: &str) -> ContractResult<DrugUnit> {
        drug::current_state(self.store.as_ref(), name, serial)
            .await
            .inspect_err(|err| reject(Operation::CurrentState, err))
    }

    fn authorizer(&self) -> Authorizer<'_> {
        Authorizer::new(&self.directory)
    }

    fn begin(
        &self,
        caller: &dyn IdentityResolver,
        operation: Operation,
    ) -> ContractResult<TransactionContext<'_>> {
        TransactionContext::begin(self.store.as_ref(), caller, operation)
            .inspect_err(|err| reject(operation, err))
    }

    async fn finish<T>(
        &self,
        ctx: TransactionContext<'_>,
        outcome: ContractResult<T>,
    ) -> ContractResult<T> {
        let operation = ctx.operation();
        let caller = ctx.caller().organization_name().to_string();
        let outcome = match outcome {
            Ok(value) => ctx.commit().await.map(|record| {
                tracing::info!(
                    operation = %operation,
                    caller = %caller,
                    tx_id = %record.tx_id,
                    sequence = record.sequence,
                    keys = ?record.keys.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "transaction committed"
                );
                value
            }),
            Err(err) => Err(err),
        };
        outcome.inspect_err(|err| reject(operation, err))
    }
}

fn reject(operation: Operation, err: &crate::ContractError) {
    tracing::warn!(
        operation = %operation,
        kind = ?err.kind(),
        error = %err,
        "operation rejected"
    );
}
