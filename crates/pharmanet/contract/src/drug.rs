//! Drug registry: recording manufactured units and reading their state.

use crate::auth::Authorizer;
use crate::{company, ContractError, ContractResult, Operation, TransactionContext};
use pharmanet_ledger::WorldState;
use pharmanet_types::{keys, parse_date, DrugUnit, OrganizationRole};

pub(crate) async fn add_drug(
    ctx: &mut TransactionContext<'_>,
    auth: &Authorizer<'_>,
    name: &str,
    serial: &str,
    manufacturing_date: &str,
    expiry_date: &str,
    manufacturer_crn: &str,
) -> ContractResult<DrugUnit> {
    auth.require(ctx, OrganizationRole::Manufacturer)?;

    let manufactured =
        parse_date("manufacturingDate", manufacturing_date).map_err(|err| ctx.invalid(err))?;
    let expires = parse_date("expiryDate", expiry_date).map_err(|err| ctx.invalid(err))?;

    let manufacturer = company::resolve(ctx, manufacturer_crn).await?;
    if manufacturer.role != OrganizationRole::Manufacturer {
        return Err(ctx.invalid(format!(
            "{} is a {}, only manufacturers can add drugs",
            manufacturer.name, manufacturer.role
        )));
    }

    let unit = DrugUnit::manufacture(
        name,
        serial,
        &manufacturer,
        manufactured,
        expires,
        ctx.timestamp(),
    )
    .map_err(|err| ctx.invalid(err))?;

    if ctx.get::<DrugUnit>(&unit.key).await?.is_some() {
        return Err(ctx.invalid(format!(
            "drug unit {} with serial {} already exists",
            name, serial
        )));
    }

    ctx.put(&unit.key, &unit)?;
    Ok(unit)
}

/// Latest committed version of a unit.
pub(crate) async fn current_state(
    store: &dyn WorldState,
    name: &str,
    serial: &str,
) -> ContractResult<DrugUnit> {
    let operation = Operation::CurrentState;
    let key = keys::drug(name, serial).map_err(|err| ContractError::validation(operation, err))?;
    let current = store.get_state(&key).await?.ok_or_else(|| {
        ContractError::not_found(operation, format!("drug unit {} with serial {}", name, serial))
    })?;
    Ok(serde_json::from_value(current.value)?)
}
