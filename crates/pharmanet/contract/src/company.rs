//! Company directory: organisation registration and lookup by CRN.

use crate::{ContractResult, TransactionContext};
use pharmanet_types::{keys, Organization, OrganizationRole};

pub(crate) async fn register(
    ctx: &mut TransactionContext<'_>,
    crn: &str,
    name: &str,
    location: &str,
    role: &str,
) -> ContractResult<Organization> {
    let role = role
        .parse::<OrganizationRole>()
        .map_err(|err| ctx.invalid(err))?;
    let prefix = keys::company_prefix(crn).map_err(|err| ctx.invalid(err))?;

    let existing = ctx.query_prefix::<Organization>(&prefix).await?;
    if let Some(existing) = existing.first() {
        return Err(ctx.invalid(format!(
            "company registration number {} is already registered to {}",
            crn, existing.name
        )));
    }

    let organization = Organization::new(crn, name, location, role, ctx.timestamp())
        .map_err(|err| ctx.invalid(err))?;
    ctx.put(&organization.key, &organization)?;
    Ok(organization)
}

/// The organisation registered under `crn`.
pub(crate) async fn resolve(
    ctx: &mut TransactionContext<'_>,
    crn: &str,
) -> ContractResult<Organization> {
    let prefix = keys::company_prefix(crn).map_err(|err| ctx.invalid(err))?;
    ctx.query_prefix::<Organization>(&prefix)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ctx.not_found(format!("company with CRN {}", crn)))
}
