//! Mapping-graph validation orchestration and shared helpers.

pub mod naming;
pub mod structure;

use crate::{error::ErrorTree, mapping::DatabaseMapping};

/// Run full graph validation in a staged, deterministic order. The
/// consolidation engine assumes a graph that passed this; violations found
/// here are upstream generator defects.
pub fn validate_mapping(mapping: &DatabaseMapping) -> Result<(), ErrorTree> {
    let mut errors = ErrorTree::new();

    // Phase 1: per-node referential invariants.
    structure::validate_structure(mapping, &mut errors);

    // Phase 2: schema-wide naming invariants.
    naming::validate_naming(&mapping.schema, &mut errors);

    errors.result()
}
