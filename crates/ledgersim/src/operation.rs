//! Built operations: the payloads generators construct and submit.

use ledgersim_types::{Address, CollectionId, RecordId};
use serde::{Deserialize, Serialize};

/// Stable operation kind codes, shared by the catalog, payloads, and reports.
pub mod kind {
    /// Replace a record's metadata.
    pub const UPDATE_RECORD_METADATA: &str = "update_record_metadata";
    /// Hand a record to a different controller.
    pub const UPDATE_RECORD_ADMIN: &str = "update_record_admin";
    /// Replace a collection's metadata.
    pub const UPDATE_COLLECTION_METADATA: &str = "update_collection_metadata";
    /// Hand a collection to a different controller.
    pub const UPDATE_COLLECTION_ADMIN: &str = "update_collection_admin";
    /// Mint a new record under an existing collection.
    pub const CREATE_RECORD: &str = "create_record";
}

/// A fully built operation: the acting controller plus its request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Controller the operation acts as. Must match the target's admin at
    /// delivery time or the service rejects the envelope.
    pub actor: Address,
    /// The state transition being requested.
    pub payload: RequestPayload,
}

impl Operation {
    /// Pairs an actor with a payload.
    #[must_use]
    pub const fn new(actor: Address, payload: RequestPayload) -> Self {
        Self { actor, payload }
    }

    /// The catalog kind this operation belongs to.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.payload.kind()
    }

    /// Display identifier of the entity the operation targets.
    #[must_use]
    pub fn target(&self) -> &str {
        self.payload.target()
    }
}

/// The concrete state transition a generator built.
///
/// Serialized with an inline `kind` tag so envelopes stay self-describing
/// in logs and failure reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestPayload {
    /// Replace the metadata of an existing record.
    UpdateRecordMetadata {
        /// Record being updated.
        record: RecordId,
        /// Replacement metadata, length within the configured bounds.
        metadata: String,
    },
    /// Transfer control of a record to another harness account.
    UpdateRecordAdmin {
        /// Record being transferred.
        record: RecordId,
        /// Controller taking over.
        new_admin: Address,
    },
    /// Replace the metadata of an existing collection.
    UpdateCollectionMetadata {
        /// Collection being updated.
        collection: CollectionId,
        /// Replacement metadata, length within the configured bounds.
        metadata: String,
    },
    /// Transfer control of a collection to another harness account.
    UpdateCollectionAdmin {
        /// Collection being transferred.
        collection: CollectionId,
        /// Controller taking over.
        new_admin: Address,
    },
    /// Mint a new record under an existing collection. The service assigns
    /// the record id at delivery time.
    CreateRecord {
        /// Parent collection.
        collection: CollectionId,
        /// Metadata for the new record.
        metadata: String,
    },
}

impl RequestPayload {
    /// The catalog kind this payload belongs to.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UpdateRecordMetadata { .. } => kind::UPDATE_RECORD_METADATA,
            Self::UpdateRecordAdmin { .. } => kind::UPDATE_RECORD_ADMIN,
            Self::UpdateCollectionMetadata { .. } => kind::UPDATE_COLLECTION_METADATA,
            Self::UpdateCollectionAdmin { .. } => kind::UPDATE_COLLECTION_ADMIN,
            Self::CreateRecord { .. } => kind::CREATE_RECORD,
        }
    }

    /// Display identifier of the targeted entity.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::UpdateRecordMetadata { record, .. } | Self::UpdateRecordAdmin { record, .. } => {
                record.as_str()
            }
            Self::UpdateCollectionMetadata { collection, .. }
            | Self::UpdateCollectionAdmin { collection, .. }
            | Self::CreateRecord { collection, .. } => collection.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_kind_matches_serde_tag() {
        let payload = RequestPayload::UpdateRecordMetadata {
            record: RecordId::new("C01-001"),
            metadata: "m".into(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"kind\":\"update_record_metadata\""));
        assert_eq!(payload.kind(), "update_record_metadata");
    }

    #[test]
    fn target_names_the_entity() {
        let record = RequestPayload::UpdateRecordAdmin {
            record: RecordId::new("C01-002"),
            new_admin: Address::derive(b"t"),
        };
        assert_eq!(record.target(), "C01-002");

        let collection = RequestPayload::CreateRecord {
            collection: CollectionId::new("C01"),
            metadata: String::new(),
        };
        assert_eq!(collection.target(), "C01");
    }

    #[test]
    fn operation_round_trips_through_json() {
        let op = Operation::new(
            Address::derive(b"actor"),
            RequestPayload::UpdateCollectionMetadata {
                collection: CollectionId::new("C07"),
                metadata: "updated".into(),
            },
        );
        let json = serde_json::to_string(&op).unwrap();
        let back: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }
}
