use crate::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const SEPARATOR: char = '\u{0}';

/// Deterministic, order-preserving key built from a namespace and an ordered
/// tuple of attributes.
///
/// Encoding: `\0namespace\0attr1\0attr2\0`. Every component is terminated, so
/// a partial key built from leading attributes is a string prefix of exactly
/// the full keys that extend it (`["Para"]` never matches `["Paracetamol"]`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompositeKey(String);

impl CompositeKey {
    /// Build a key from a namespace and its attributes.
    ///
    /// The same encoding is used for full and partial keys; a partial key
    /// simply carries fewer attributes.
    pub fn new<I, S>(namespace: &str, attributes: I) -> StorageResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_component(namespace)?;
        let mut encoded = String::with_capacity(namespace.len() + 2);
        encoded.push(SEPARATOR);
        encoded.push_str(namespace);
        encoded.push(SEPARATOR);
        for attribute in attributes {
            let attribute = attribute.as_ref();
            validate_component(attribute)?;
            encoded.push_str(attribute);
            encoded.push(SEPARATOR);
        }
        Ok(Self(encoded))
    }

    /// Raw encoded form, as stored by the ledger.
    pub fn encoded(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> &str {
        self.components().next().unwrap_or_default()
    }

    pub fn attributes(&self) -> Vec<&str> {
        self.components().skip(1).collect()
    }

    /// True when `self` is this key or one of its leading-attribute prefixes.
    pub fn is_prefix_of(&self, other: &CompositeKey) -> bool {
        other.0.starts_with(&self.0)
    }

    fn components(&self) -> impl Iterator<Item = &str> {
        let inner = self
            .0
            .strip_prefix(SEPARATOR)
            .and_then(|rest| rest.strip_suffix(SEPARATOR))
            .unwrap_or_default();
        inner.split(SEPARATOR)
    }
}

fn validate_component(component: &str) -> StorageResult<()> {
    if component.is_empty() {
        return Err(StorageError::InvalidInput(
            "composite key components must not be empty".to_string(),
        ));
    }
    if component.contains(SEPARATOR) {
        return Err(StorageError::InvalidInput(format!(
            "composite key component {:?} contains a reserved separator",
            component
        )));
    }
    Ok(())
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in self.components() {
            if !first {
                f.write_str(":")?;
            }
            f.write_str(component)?;
            first = false;
        }
        Ok(())
    }
}

impl TryFrom<String> for CompositeKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let well_formed = value.len() >= 3
            && value.starts_with(SEPARATOR)
            && value.ends_with(SEPARATOR)
            && !value.contains("\u{0}\u{0}");
        if !well_formed {
            return Err(StorageError::InvalidInput(format!(
                "malformed composite key {:?}",
                value
            )));
        }
        Ok(Self(value))
    }
}

impl From<CompositeKey> for String {
    fn from(value: CompositeKey) -> Self {
        value.0
    }
}
