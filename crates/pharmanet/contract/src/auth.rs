use crate::{ContractResult, TransactionContext};
use pharmanet_identity::MspDirectory;
use pharmanet_types::OrganizationRole;

/// Compares the caller's issuing organisation with the organisation names
/// the directory assigns to roles.
#[derive(Debug, Clone, Copy)]
pub struct Authorizer<'a> {
    directory: &'a MspDirectory,
}

impl<'a> Authorizer<'a> {
    pub fn new(directory: &'a MspDirectory) -> Self {
        Self { directory }
    }

    /// Fail unless the caller belongs to the organisation of `expected`.
    pub fn require(
        &self,
        ctx: &TransactionContext<'_>,
        expected: OrganizationRole,
    ) -> ContractResult<()> {
        let expected_name = self.directory.organization_name(expected);
        if ctx.caller().organization_name() != expected_name {
            tracing::debug!(
                operation = %ctx.operation(),
                expected = %expected_name,
                caller = %ctx.caller().organization_name(),
                "caller organisation mismatch"
            );
            return Err(ctx.unauthorized(expected_name));
        }
        Ok(())
    }

    /// The caller's role, which must be one of `allowed`.
    pub fn require_any(
        &self,
        ctx: &TransactionContext<'_>,
        allowed: &[OrganizationRole],
    ) -> ContractResult<OrganizationRole> {
        match self.caller_role(ctx) {
            Some(role) if allowed.contains(&role) => Ok(role),
            _ => {
                let expected = allowed
                    .iter()
                    .map(|role| self.directory.organization_name(*role))
                    .collect::<Vec<_>>()
                    .join(" or ");
                Err(ctx.unauthorized(expected))
            }
        }
    }

    /// Fail unless the caller belongs to the organisation of `role`, naming
    /// `party` in the error.
    pub fn require_acting_for(
        &self,
        ctx: &TransactionContext<'_>,
        role: OrganizationRole,
        party: &str,
    ) -> ContractResult<()> {
        if self.caller_role(ctx) != Some(role) {
            return Err(ctx.unauthorized(format!(
                "{} ({})",
                self.directory.organization_name(role),
                party
            )));
        }
        Ok(())
    }

    pub fn caller_role(&self, ctx: &TransactionContext<'_>) -> Option<OrganizationRole> {
        self.directory.role_of(ctx.caller())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContractError, Operation};
    use pharmanet_identity::{CallerIdentity, StaticIdentity};
    use pharmanet_ledger::memory::InMemoryWorldState;

    fn check<F>(identity: CallerIdentity, f: F)
    where
        F: FnOnce(&Authorizer<'_>, &TransactionContext<'_>),
    {
        let store = InMemoryWorldState::new();
        let directory = MspDirectory::default();
        let resolver = StaticIdentity::new(identity);
        let ctx = TransactionContext::begin(&store, &resolver, Operation::AddDrug).unwrap();
        f(&Authorizer::new(&directory), &ctx);
    }

    #[test]
    fn require_matches_trimmed_organisation() {
        let padded = CallerIdentity::new("manufacturerMSP", " manufacturer.pharma-network.com ");
        check(padded, |auth, ctx| {
            assert!(auth.require(ctx, OrganizationRole::Manufacturer).is_ok());
            let err = auth.require(ctx, OrganizationRole::Retailer).unwrap_err();
            assert!(matches!(
                err,
                ContractError::Authorization { ref expected, ref actual, .. }
                    if expected == "retailer.pharma-network.com"
                        && actual == "manufacturer.pharma-network.com"
            ));
        });
    }

    #[test]
    fn require_any_returns_caller_role() {
        let retailer = MspDirectory::default().identity_for(OrganizationRole::Retailer);
        check(retailer, |auth, ctx| {
            let allowed = [OrganizationRole::Distributor, OrganizationRole::Retailer];
            assert_eq!(auth.require_any(ctx, &allowed).unwrap(), OrganizationRole::Retailer);
            assert!(auth.require_any(ctx, &[OrganizationRole::Manufacturer]).is_err());
        });
    }

    #[test]
    fn unknown_organisation_has_no_role() {
        let stranger = CallerIdentity::new("regulatorMSP", "regulator.pharma-network.com");
        check(stranger, |auth, ctx| {
            assert_eq!(auth.caller_role(ctx), None);
            assert!(auth
                .require_acting_for(ctx, OrganizationRole::Transporter, "FedEx")
                .is_err());
        });
    }
}
