//! Purchase order workflow.

use crate::auth::Authorizer;
use crate::{company, ContractResult, TransactionContext};
use pharmanet_types::{keys, DrugUnit, OrganizationRole, PurchaseOrder};

const BUYER_ROLES: [OrganizationRole; 2] =
    [OrganizationRole::Distributor, OrganizationRole::Retailer];

pub(crate) async fn create(
    ctx: &mut TransactionContext<'_>,
    auth: &Authorizer<'_>,
    buyer_crn: &str,
    seller_crn: &str,
    drug_name: &str,
    quantity: u32,
) -> ContractResult<PurchaseOrder> {
    let caller_role = auth.require_any(ctx, &BUYER_ROLES)?;

    let buyer = company::resolve(ctx, buyer_crn).await?;
    let seller = company::resolve(ctx, seller_crn).await?;
    if caller_role != buyer.role {
        return Err(ctx.unauthorized(format!("member of buyer {} ({})", buyer.name, buyer.role)));
    }

    if !buyer.hierarchy_rank.buys_from(seller.hierarchy_rank) {
        return Err(ctx.invalid(format!(
            "transfer of drug takes place in a hierarchical manner: \
             {} (rank {}) cannot buy from {} (rank {})",
            buyer.name, buyer.hierarchy_rank, seller.name, seller.hierarchy_rank
        )));
    }

    let order = PurchaseOrder::new(&buyer, &seller, drug_name, quantity, ctx.timestamp())
        .map_err(|err| ctx.invalid(err))?;

    let prefix = keys::drug_prefix(drug_name).map_err(|err| ctx.invalid(err))?;
    let units = ctx.query_prefix::<DrugUnit>(&prefix).await?;
    if units.is_empty() {
        return Err(ctx.invalid(format!("no unit of {} has been manufactured", drug_name)));
    }
    let held = units.iter().filter(|unit| unit.is_owned_by(&seller.key)).count();
    if held == 0 {
        return Err(ctx.invalid(format!(
            "{} does not own any unit of {}",
            seller.name, drug_name
        )));
    }
    tracing::debug!(
        tx_id = %ctx.tx_id(),
        drug = drug_name,
        held,
        requested = quantity,
        "seller holds drug"
    );

    ctx.put(&order.key, &order)?;
    Ok(order)
}
