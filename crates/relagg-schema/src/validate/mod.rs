//! Catalog validation orchestration.

pub mod naming;
pub mod relationship;

use crate::{catalog::Catalog, error::ErrorTree};

/// Run full catalog validation in a staged, deterministic order.
pub(crate) fn validate_catalog(catalog: &Catalog) -> Result<(), ErrorTree> {
    // Phase 1: per-resource structural invariants.
    let mut errors = ErrorTree::new();
    for resource in catalog.resources() {
        let mut errs = ErrorTree::new();
        naming::validate_resource_naming(resource, &mut errs);
        naming::validate_read_actions(resource, &mut errs);
        errors.merge(resource.name.clone(), errs);
    }

    // Phase 2: invariants that need the full catalog.
    relationship::validate_relationship_targets(catalog, &mut errors);
    relationship::validate_aggregate_declarations(catalog, &mut errors);

    errors.result()
}
