use crate::RecordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of organisation roles in the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganizationRole {
    Manufacturer,
    Distributor,
    Retailer,
    Transporter,
}

impl OrganizationRole {
    pub const ALL: [OrganizationRole; 4] = [
        Self::Manufacturer,
        Self::Distributor,
        Self::Retailer,
        Self::Transporter,
    ];

    /// Position in the trade hierarchy. Transporters move goods but never
    /// trade them, so they are unranked.
    pub fn rank(self) -> HierarchyRank {
        match self {
            Self::Manufacturer => HierarchyRank::Ranked(1),
            Self::Distributor => HierarchyRank::Ranked(2),
            Self::Retailer => HierarchyRank::Ranked(3),
            Self::Transporter => HierarchyRank::Unranked,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Manufacturer => "Manufacturer",
            Self::Distributor => "Distributor",
            Self::Retailer => "Retailer",
            Self::Transporter => "Transporter",
        }
    }

    /// Lower-case label used for organisation domains and MSP ids.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Manufacturer => "manufacturer",
            Self::Distributor => "distributor",
            Self::Retailer => "retailer",
            Self::Transporter => "transporter",
        }
    }
}

impl fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OrganizationRole {
    type Err = RecordError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RecordError::UnknownRole(value.to_string()))
    }
}

/// Hierarchy rank of an organisation. Serialized as an integer, with `-1`
/// standing for "not part of the trade hierarchy".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", from = "i8")]
pub enum HierarchyRank {
    Ranked(u8),
    Unranked,
}

impl HierarchyRank {
    pub fn value(self) -> Option<u8> {
        match self {
            Self::Ranked(rank) => Some(rank),
            Self::Unranked => None,
        }
    }

    /// Trade flows exactly one level down the hierarchy: a buyer at rank `n`
    /// may only buy from a seller at rank `n - 1`.
    pub fn buys_from(self, seller: HierarchyRank) -> bool {
        match (self, seller) {
            (Self::Ranked(buyer), Self::Ranked(seller)) => buyer.checked_sub(seller) == Some(1),
            _ => false,
        }
    }
}

impl fmt::Display for HierarchyRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ranked(rank) => write!(f, "{}", rank),
            Self::Unranked => f.write_str("unranked"),
        }
    }
}

impl From<HierarchyRank> for i8 {
    fn from(value: HierarchyRank) -> Self {
        match value {
            HierarchyRank::Ranked(rank) => i8::try_from(rank).unwrap_or(i8::MAX),
            HierarchyRank::Unranked => -1,
        }
    }
}

impl From<i8> for HierarchyRank {
    fn from(value: i8) -> Self {
        match u8::try_from(value) {
            Ok(rank) if rank > 0 => Self::Ranked(rank),
            _ => Self::Unranked,
        }
    }
}
