//! Opaque identifiers for queried service state.
//!
//! The service owns id semantics; the harness treats them as handles and
//! never parses structure out of them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a top-level collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(String);

impl CollectionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a record within a collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a record id scoped under a collection (`<collection>-NNN`).
    ///
    /// Convention used by the reference ledger when assigning ids; the
    /// harness itself never assumes this shape.
    #[must_use]
    pub fn scoped(collection: &CollectionId, seq: u32) -> Self {
        Self(format!("{collection}-{seq:03}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_record_ids() {
        let collection = CollectionId::new("K01");
        assert_eq!(RecordId::scoped(&collection, 7).as_str(), "K01-007");
        assert_eq!(RecordId::scoped(&collection, 123).as_str(), "K01-123");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = CollectionId::new("K01");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"K01\"");
    }
}
