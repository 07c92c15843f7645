use crate::{keys, HierarchyRank, OrganizationRole, RecordError};
use chrono::{DateTime, NaiveDate, Utc};
use pharmanet_ledger::CompositeKey;
use serde::{Deserialize, Serialize};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| RecordError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// A registered participant of the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub key: CompositeKey,
    pub crn: String,
    pub name: String,
    pub location: String,
    pub role: OrganizationRole,
    pub hierarchy_rank: HierarchyRank,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(
        crn: &str,
        name: &str,
        location: &str,
        role: OrganizationRole,
        created_at: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            key: keys::company(crn, name)?,
            crn: crn.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            role,
            hierarchy_rank: role.rank(),
            created_at,
        })
    }
}

/// Current holder of a drug unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Owner {
    Organization(CompositeKey),
    Consumer(String),
}

impl Owner {
    pub fn organization(&self) -> Option<&CompositeKey> {
        match self {
            Self::Organization(key) => Some(key),
            Self::Consumer(_) => None,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization(key) => write!(f, "{}", key),
            Self::Consumer(id) => write!(f, "consumer:{}", id),
        }
    }
}

/// One physical, serialized unit of a drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugUnit {
    pub key: CompositeKey,
    pub name: String,
    pub serial: String,
    pub manufacturer: CompositeKey,
    pub manufacturing_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub owner: Owner,
    pub shipments: Vec<CompositeKey>,
    pub created_at: DateTime<Utc>,
}

impl DrugUnit {
    /// A freshly manufactured unit, owned by its manufacturer.
    pub fn manufacture(
        name: &str,
        serial: &str,
        manufacturer: &Organization,
        manufacturing_date: NaiveDate,
        expiry_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        if expiry_date <= manufacturing_date {
            return Err(RecordError::ExpiryNotAfterManufacture {
                manufactured: manufacturing_date,
                expires: expiry_date,
            });
        }

        Ok(Self {
            key: keys::drug(name, serial)?,
            name: name.to_string(),
            serial: serial.to_string(),
            manufacturer: manufacturer.key.clone(),
            manufacturing_date,
            expiry_date,
            owner: Owner::Organization(manufacturer.key.clone()),
            shipments: Vec::new(),
            created_at,
        })
    }

    pub fn is_owned_by(&self, organization: &CompositeKey) -> bool {
        self.owner.organization() == Some(organization)
    }

    /// Hand the unit to `holder` as part of `shipment`.
    pub fn transfer_custody(&mut self, holder: &CompositeKey, shipment: &CompositeKey) {
        self.owner = Owner::Organization(holder.clone());
        self.shipments.push(shipment.clone());
    }

    /// Sell the unit to an end consumer. The shipment trail is left as is.
    pub fn retail_to(&mut self, consumer_id: &str) {
        self.owner = Owner::Consumer(consumer_id.to_string());
    }
}

/// A buyer's request for a quantity of a drug from a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub key: CompositeKey,
    pub drug_name: String,
    pub quantity: u32,
    pub buyer: CompositeKey,
    pub seller: CompositeKey,
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    pub fn new(
        buyer: &Organization,
        seller: &Organization,
        drug_name: &str,
        quantity: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        if quantity == 0 {
            return Err(RecordError::InvalidQuantity(quantity));
        }

        Ok(Self {
            key: keys::purchase_order(&buyer.crn, drug_name)?,
            drug_name: drug_name.to_string(),
            quantity,
            buyer: buyer.key.clone(),
            seller: seller.key.clone(),
            created_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShipmentStatus {
    InTransit,
    Delivered,
}

impl ShipmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InTransit => "in-transit",
            Self::Delivered => "delivered",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical movement of the units fulfilling one purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub key: CompositeKey,
    pub creator: CompositeKey,
    pub assets: Vec<CompositeKey>,
    pub transporter: CompositeKey,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Shipment {
    /// Open a shipment for `order`, sent by the order's seller.
    pub fn dispatch(
        order: &PurchaseOrder,
        buyer_crn: &str,
        assets: Vec<CompositeKey>,
        transporter: &Organization,
        created_at: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            key: keys::shipment(buyer_crn, &order.drug_name)?,
            creator: order.seller.clone(),
            assets,
            transporter: transporter.key.clone(),
            status: ShipmentStatus::InTransit,
            created_at,
        })
    }

    /// Mark the shipment delivered. The timestamp is reset to the delivery
    /// time.
    pub fn deliver(&mut self, delivered_at: DateTime<Utc>) -> Result<(), RecordError> {
        if self.status != ShipmentStatus::InTransit {
            return Err(RecordError::InvalidTransition {
                from: self.status,
                to: ShipmentStatus::Delivered,
            });
        }
        self.status = ShipmentStatus::Delivered;
        self.created_at = delivered_at;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }
}
