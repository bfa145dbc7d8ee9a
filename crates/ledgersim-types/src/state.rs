//! Point-in-time snapshots of queried service state.
//!
//! Snapshots are plain data, fetched fresh on every invocation and never
//! cached across invocations. Admins rotate mid-run, so a stale snapshot
//! would fail authorization at delivery.

use serde::{Deserialize, Serialize};

use crate::ids::{CollectionId, RecordId};

/// Snapshot of a top-level collection.
///
/// `admin` is deliberately the raw string returned by the query capability:
/// a malformed controller must surface as a data error during validation,
/// not vanish inside deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    /// Category tag used as the discovery filter.
    pub kind: String,
    /// Controlling identity, unparsed.
    pub admin: String,
    pub metadata: String,
}

/// Snapshot of a record within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub collection: CollectionId,
    /// Controlling identity, unparsed.
    pub admin: String,
    pub metadata: String,
}
