//! The standard operation generators and their catalog.
//!
//! Each submodule contributes one generator: a `WEIGHT` constant and a
//! `generate` function with the catalog signature. [`standard_catalog`]
//! assembles all of them with the default weights; callers that want a
//! different mix build their own [`OperationCatalog`] from [`CatalogEntry`]
//! values directly.

pub mod create_record;
pub mod update_collection_admin;
pub mod update_collection_metadata;
pub mod update_record_admin;
pub mod update_record_metadata;

use ledgersim_error::SimResult;

use crate::catalog::{CatalogEntry, OperationCatalog};
use crate::operation::kind;

/// Builds the full default catalog.
///
/// # Errors
///
/// Returns a configuration error if the standard registrations are invalid;
/// with the built-in weights this only fires if a registration is edited
/// inconsistently.
pub fn standard_catalog() -> SimResult<OperationCatalog> {
    OperationCatalog::new(vec![
        CatalogEntry::new(
            kind::UPDATE_RECORD_METADATA,
            update_record_metadata::WEIGHT,
            update_record_metadata::generate,
        ),
        CatalogEntry::new(
            kind::UPDATE_RECORD_ADMIN,
            update_record_admin::WEIGHT,
            update_record_admin::generate,
        ),
        CatalogEntry::new(
            kind::UPDATE_COLLECTION_METADATA,
            update_collection_metadata::WEIGHT,
            update_collection_metadata::generate,
        ),
        CatalogEntry::new(
            kind::UPDATE_COLLECTION_ADMIN,
            update_collection_admin::WEIGHT,
            update_collection_admin::generate,
        ),
        CatalogEntry::new(
            kind::CREATE_RECORD,
            create_record::WEIGHT,
            create_record::generate,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn standard_catalog_registers_every_kind_once() {
        let catalog = standard_catalog().unwrap();
        let kinds: BTreeSet<_> = catalog.kinds().collect();
        assert_eq!(kinds.len(), catalog.len());
        assert_eq!(
            kinds,
            BTreeSet::from([
                kind::CREATE_RECORD,
                kind::UPDATE_COLLECTION_ADMIN,
                kind::UPDATE_COLLECTION_METADATA,
                kind::UPDATE_RECORD_ADMIN,
                kind::UPDATE_RECORD_METADATA,
            ])
        );
    }

    #[test]
    fn standard_weights_favour_updates_over_creation() {
        let catalog = standard_catalog().unwrap();
        let weight_of = |kind: &str| {
            catalog
                .entries()
                .iter()
                .find(|entry| entry.kind() == kind)
                .map(CatalogEntry::weight)
                .unwrap()
        };
        assert_eq!(weight_of(kind::UPDATE_RECORD_METADATA), 30);
        assert_eq!(weight_of(kind::CREATE_RECORD), 20);
        assert_eq!(catalog.total_weight(), 140);
    }
}
