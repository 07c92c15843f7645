//! Composite key schemes for every record type.

use crate::RecordError;
use pharmanet_ledger::CompositeKey;

/// Entity-type namespaces of the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Company,
    Drug,
    PurchaseOrder,
    Shipment,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Company => "org.pharma-network.pharmanet.company",
            Self::Drug => "org.pharma-network.pharmanet.drug",
            Self::PurchaseOrder => "org.pharma-network.pharmanet.purchase-order",
            Self::Shipment => "org.pharma-network.pharmanet.shipment",
        }
    }

    pub fn key(self, attributes: &[&str]) -> Result<CompositeKey, RecordError> {
        CompositeKey::new(self.as_str(), attributes)
            .map_err(|err| RecordError::InvalidKey(err.to_string()))
    }
}

/// Organisation key: (registration number, name).
pub fn company(crn: &str, name: &str) -> Result<CompositeKey, RecordError> {
    Namespace::Company.key(&[crn, name])
}

/// Partial organisation key matching every organisation with `crn`.
pub fn company_prefix(crn: &str) -> Result<CompositeKey, RecordError> {
    Namespace::Company.key(&[crn])
}

/// Drug unit key: (drug name, serial number).
pub fn drug(name: &str, serial: &str) -> Result<CompositeKey, RecordError> {
    Namespace::Drug.key(&[name, serial])
}

/// Partial drug key matching every unit of `name`.
pub fn drug_prefix(name: &str) -> Result<CompositeKey, RecordError> {
    Namespace::Drug.key(&[name])
}

/// Purchase order key: (buyer registration number, drug name).
pub fn purchase_order(buyer_crn: &str, drug_name: &str) -> Result<CompositeKey, RecordError> {
    Namespace::PurchaseOrder.key(&[buyer_crn, drug_name])
}

/// Shipment key: (buyer registration number, drug name).
pub fn shipment(buyer_crn: &str, drug_name: &str) -> Result<CompositeKey, RecordError> {
    Namespace::Shipment.key(&[buyer_crn, drug_name])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_prefix_matches_registered_key() {
        let key = company("CRN-1", "Acme Pharma").unwrap();
        assert!(company_prefix("CRN-1").unwrap().is_prefix_of(&key));
        assert!(!company_prefix("CRN-10").unwrap().is_prefix_of(&key));
        assert_eq!(key.namespace(), Namespace::Company.as_str());
    }

    #[test]
    fn order_and_shipment_share_attributes_but_not_namespace() {
        let order = purchase_order("CRN-2", "Paracetamol").unwrap();
        let shipment = shipment("CRN-2", "Paracetamol").unwrap();
        assert_eq!(order.attributes(), shipment.attributes());
        assert_ne!(order, shipment);
    }

    #[test]
    fn empty_attribute_is_invalid() {
        assert!(matches!(drug("", "S1"), Err(RecordError::InvalidKey(_))));
    }
}
