use crate::{keys, RecordError};
use pharmanet_ledger::CompositeKey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

const TOKEN_DELIMITER: char = ',';
const FIELD_DELIMITER: char = '|';

/// Reference to one drug unit inside a shipment asset list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub drug_name: String,
    pub serial: String,
}

impl AssetRef {
    pub fn new(drug_name: impl Into<String>, serial: impl Into<String>) -> Self {
        Self {
            drug_name: drug_name.into(),
            serial: serial.into(),
        }
    }

    pub fn key(&self) -> Result<CompositeKey, RecordError> {
        keys::drug(&self.drug_name, &self.serial)
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.drug_name, FIELD_DELIMITER, self.serial)
    }
}

impl FromStr for AssetRef {
    type Err = RecordError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let malformed = || RecordError::MalformedAsset(token.to_string());
        let (name, serial) = token.split_once(FIELD_DELIMITER).ok_or_else(malformed)?;
        let (name, serial) = (name.trim(), serial.trim());
        if name.is_empty() || serial.is_empty() || serial.contains(FIELD_DELIMITER) {
            return Err(malformed());
        }
        Ok(Self::new(name, serial))
    }
}

/// Ordered, duplicate-free list of units, parsed from
/// `drugName|serial,drugName|serial,...`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetList(Vec<AssetRef>);

impl AssetList {
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        if raw.trim().is_empty() {
            return Err(RecordError::EmptyAssetList);
        }

        let mut seen = HashSet::new();
        let mut assets = Vec::new();
        for token in raw.split(TOKEN_DELIMITER) {
            let asset = token.trim().parse::<AssetRef>()?;
            if !seen.insert(asset.clone()) {
                return Err(RecordError::DuplicateAsset(asset.to_string()));
            }
            assets.push(asset);
        }
        Ok(Self(assets))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetRef> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a AssetList {
    type Item = &'a AssetRef;
    type IntoIter = std::slice::Iter<'a, AssetRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_tokens_in_order() {
        let list = AssetList::parse("Paracetamol|S1, Paracetamol|S2").unwrap();
        let serials = list.iter().map(|a| a.serial.as_str()).collect::<Vec<_>>();
        assert_eq!(serials, vec!["S1", "S2"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(
            AssetList::parse("Paracetamol-S1"),
            Err(RecordError::MalformedAsset("Paracetamol-S1".to_string()))
        );
        assert!(matches!(
            AssetList::parse("Paracetamol|S1,"),
            Err(RecordError::MalformedAsset(_))
        ));
        assert!(matches!(
            AssetList::parse("a|b|c"),
            Err(RecordError::MalformedAsset(_))
        ));
        assert_eq!(AssetList::parse("  "), Err(RecordError::EmptyAssetList));
    }

    #[test]
    fn rejects_duplicates() {
        assert_eq!(
            AssetList::parse("Paracetamol|S1,Paracetamol|S1"),
            Err(RecordError::DuplicateAsset("Paracetamol|S1".to_string()))
        );
    }

    #[test]
    fn asset_key_matches_drug_key() {
        let asset: AssetRef = "Paracetamol|S1".parse().unwrap();
        assert_eq!(asset.key().unwrap(), keys::drug("Paracetamol", "S1").unwrap());
    }
}
