use crate::auth::Authorizer;
use crate::config::RetailPolicy;
use crate::{company, ContractResult, TransactionContext};
use pharmanet_types::{keys, DrugUnit, OrganizationRole};

/// Sell a unit to an end consumer.
pub(crate) async fn retail(
    ctx: &mut TransactionContext<'_>,
    auth: &Authorizer<'_>,
    policy: RetailPolicy,
    name: &str,
    serial: &str,
    retailer_crn: &str,
    consumer_id: &str,
) -> ContractResult<DrugUnit> {
    auth.require(ctx, OrganizationRole::Retailer)?;

    let key = keys::drug(name, serial).map_err(|err| ctx.invalid(err))?;
    let mut unit = ctx
        .get::<DrugUnit>(&key)
        .await?
        .ok_or_else(|| ctx.not_found(format!("drug unit {} with serial {}", name, serial)))?;

    let retailer = company::resolve(ctx, retailer_crn).await?;

    let consumer_id = consumer_id.trim();
    if consumer_id.is_empty() {
        return Err(ctx.invalid("consumer id must not be empty"));
    }

    if policy == RetailPolicy::RequireRetailerCustody && !unit.is_owned_by(&retailer.key) {
        return Err(ctx.invalid(format!(
            "{} does not hold drug unit {} (owner is {})",
            retailer.name, unit.key, unit.owner
        )));
    }

    unit.retail_to(consumer_id);
    ctx.put(&unit.key, &unit)?;
    Ok(unit)
}
