use crate::KeyVersion;
use serde_json::Value;

/// Cursor over the version history of one key, oldest first.
///
/// The cursor is consumed as it is read; replaying a history means asking the
/// world state for a fresh cursor.
#[derive(Debug)]
pub struct HistoryCursor {
    versions: std::vec::IntoIter<KeyVersion<Value>>,
}

impl HistoryCursor {
    pub fn new(versions: Vec<KeyVersion<Value>>) -> Self {
        Self {
            versions: versions.into_iter(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.versions.len() == 0
    }
}

impl Iterator for HistoryCursor {
    type Item = KeyVersion<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.versions.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.versions.size_hint()
    }
}

impl ExactSizeIterator for HistoryCursor {}
