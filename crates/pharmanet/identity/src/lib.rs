//! Pharmanet Identity - caller identity resolution
//!
//! Every transaction is submitted on behalf of an organisation. The workflow
//! never inspects certificates itself; it asks an [`IdentityResolver`] for the
//! caller's MSP id and the organisation name of the certificate issuer, and
//! maps roles to organisation names through an [`MspDirectory`].

#![deny(unsafe_code)]

use pharmanet_types::OrganizationRole;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default network domain organisation names are derived from.
pub const DEFAULT_NETWORK_DOMAIN: &str = "pharma-network.com";

/// The identity a transaction was submitted with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub msp_id: String,
    /// Organisation name of the certificate issuer, e.g.
    /// `manufacturer.pharma-network.com`.
    pub organization: String,
}

impl CallerIdentity {
    pub fn new(msp_id: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
            organization: organization.into(),
        }
    }

    /// Issuer organisation name with surrounding whitespace removed.
    pub fn organization_name(&self) -> &str {
        self.organization.trim()
    }
}

/// Resolves the identity of the current caller.
pub trait IdentityResolver: Send + Sync {
    fn caller_identity(&self) -> Result<CallerIdentity, IdentityError>;
}

/// Resolver that always answers with the same identity.
#[derive(Clone, Debug)]
pub struct StaticIdentity {
    identity: CallerIdentity,
}

impl StaticIdentity {
    pub fn new(identity: CallerIdentity) -> Self {
        Self { identity }
    }
}

impl IdentityResolver for StaticIdentity {
    fn caller_identity(&self) -> Result<CallerIdentity, IdentityError> {
        if self.identity.organization_name().is_empty() {
            return Err(IdentityError::MissingOrganization(
                self.identity.msp_id.clone(),
            ));
        }
        Ok(self.identity.clone())
    }
}

/// Maps organisation roles to the names and MSP ids their members carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MspDirectory {
    network_domain: String,
}

impl MspDirectory {
    pub fn new(network_domain: impl Into<String>) -> Self {
        Self {
            network_domain: network_domain.into(),
        }
    }

    pub fn network_domain(&self) -> &str {
        &self.network_domain
    }

    /// `manufacturer.pharma-network.com` for the default domain.
    pub fn organization_name(&self, role: OrganizationRole) -> String {
        format!("{}.{}", role.slug(), self.network_domain)
    }

    /// `manufacturerMSP` for the manufacturer role.
    pub fn msp_id(&self, role: OrganizationRole) -> String {
        format!("{}MSP", role.slug())
    }

    /// The identity a member of `role` submits transactions with.
    pub fn identity_for(&self, role: OrganizationRole) -> CallerIdentity {
        CallerIdentity::new(self.msp_id(role), self.organization_name(role))
    }

    /// The role whose organisation issued `identity`, if any.
    pub fn role_of(&self, identity: &CallerIdentity) -> Option<OrganizationRole> {
        let organization = identity.organization_name();
        OrganizationRole::ALL
            .into_iter()
            .find(|role| self.organization_name(*role) == organization)
    }
}

impl Default for MspDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_NETWORK_DOMAIN)
    }
}

/// Identity errors
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Caller identity for MSP '{0}' carries no organisation name")]
    MissingOrganization(String),
}
