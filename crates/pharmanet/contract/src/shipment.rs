//! Shipment workflow: dispatching the units of a purchase order and
//! confirming their delivery.

use crate::auth::Authorizer;
use crate::{company, ContractError, ContractResult, TransactionContext};
use pharmanet_types::{
    keys, AssetList, DrugUnit, Organization, OrganizationRole, PurchaseOrder, Shipment,
};

pub(crate) async fn create(
    ctx: &mut TransactionContext<'_>,
    auth: &Authorizer<'_>,
    buyer_crn: &str,
    drug_name: &str,
    asset_list: &str,
    transporter_crn: &str,
) -> ContractResult<Shipment> {
    let assets = AssetList::parse(asset_list).map_err(|err| ctx.invalid(err))?;
    if let Some(other) = assets.iter().find(|asset| asset.drug_name != drug_name) {
        return Err(ctx.invalid(format!(
            "asset {} does not belong to drug {}",
            other, drug_name
        )));
    }

    let order_key =
        keys::purchase_order(buyer_crn, drug_name).map_err(|err| ctx.invalid(err))?;
    let order = ctx.get::<PurchaseOrder>(&order_key).await?.ok_or_else(|| {
        ctx.not_found(format!(
            "purchase order from {} for {} (no purchase order exists)",
            buyer_crn, drug_name
        ))
    })?;

    let seller = ctx
        .get::<Organization>(&order.seller)
        .await?
        .ok_or_else(|| ctx.not_found(format!("seller {}", order.seller)))?;
    auth.require_acting_for(ctx, seller.role, &seller.name)?;

    let transporter = company::resolve(ctx, transporter_crn).await?;
    if transporter.role != OrganizationRole::Transporter {
        return Err(ctx.invalid(format!(
            "{} is a {}, not a transporter",
            transporter.name, transporter.role
        )));
    }
    company::resolve(ctx, buyer_crn).await?;

    if assets.len() != order.quantity as usize {
        return Err(ctx.invalid(format!(
            "asset list has {} units but the purchase order asks for {}",
            assets.len(),
            order.quantity
        )));
    }

    let shipment_key = keys::shipment(buyer_crn, drug_name).map_err(|err| ctx.invalid(err))?;
    if let Some(existing) = ctx.get::<Shipment>(&shipment_key).await? {
        if existing.is_open() {
            return Err(ctx.invalid(format!(
                "shipment {} is still {}",
                existing.key, existing.status
            )));
        }
    }

    let mut units = Vec::with_capacity(assets.len());
    for asset in &assets {
        let key = asset.key().map_err(|err| ctx.invalid(err))?;
        let unit = ctx
            .get::<DrugUnit>(&key)
            .await?
            .ok_or_else(|| {
                ctx.invalid(format!("incorrect asset list: {} does not exist", asset))
            })?;
        if !unit.is_owned_by(&order.seller) {
            return Err(ctx.invalid(format!(
                "incorrect asset list: {} is held by {}, not the seller",
                asset, unit.owner
            )));
        }
        units.push(unit);
    }

    let shipment = Shipment::dispatch(
        &order,
        buyer_crn,
        units.iter().map(|unit| unit.key.clone()).collect(),
        &transporter,
        ctx.timestamp(),
    )
    .map_err(|err| ctx.invalid(err))?;

    for unit in &mut units {
        unit.transfer_custody(&transporter.key, &shipment.key);
        ctx.put(&unit.key, &*unit)?;
    }
    ctx.put(&shipment.key, &shipment)?;
    Ok(shipment)
}

pub(crate) async fn update(
    ctx: &mut TransactionContext<'_>,
    auth: &Authorizer<'_>,
    buyer_crn: &str,
    drug_name: &str,
    transporter_crn: &str,
) -> ContractResult<Shipment> {
    let key = keys::shipment(buyer_crn, drug_name).map_err(|err| ctx.invalid(err))?;
    let mut shipment = ctx
        .get::<Shipment>(&key)
        .await?
        .ok_or_else(|| ctx.not_found(format!("shipment to {} for {}", buyer_crn, drug_name)))?;

    auth.require(ctx, OrganizationRole::Transporter)?;

    let transporter = company::resolve(ctx, transporter_crn).await?;
    let buyer = company::resolve(ctx, buyer_crn).await?;
    if transporter.key != shipment.transporter {
        return Err(ContractError::unauthorized(
            ctx.operation(),
            format!("transporter of record {}", shipment.transporter),
            transporter.key.to_string(),
        ));
    }

    shipment
        .deliver(ctx.timestamp())
        .map_err(|err| ctx.invalid(err))?;

    for asset in &shipment.assets {
        let mut unit = ctx
            .get::<DrugUnit>(asset)
            .await?
            .ok_or_else(|| ctx.not_found(format!("drug unit {}", asset)))?;
        // Units sold to a consumer while in transit stay with the consumer.
        if unit.owner.organization().is_none() {
            tracing::debug!(
                tx_id = %ctx.tx_id(),
                unit = %unit.key,
                owner = %unit.owner,
                "retailed unit left out of delivery"
            );
            continue;
        }
        unit.transfer_custody(&buyer.key, &shipment.key);
        ctx.put(&unit.key, &unit)?;
    }
    ctx.put(&shipment.key, &shipment)?;
    Ok(shipment)
}
