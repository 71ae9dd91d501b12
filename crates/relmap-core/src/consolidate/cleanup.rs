//! Orphan detection. Consolidation can strip every fragment off a table;
//! removing the physical artifacts is the job of the cleanup stage that runs
//! after this engine, so orphans are reported rather than deleted here.

use relmap_schema::{mapping::DatabaseMapping, types::TableId};
use std::collections::BTreeSet;

/// Tables no fragment and no association-set mapping references any longer.
#[must_use]
pub fn orphaned_tables(mapping: &DatabaseMapping) -> Vec<TableId> {
    let mut referenced: BTreeSet<TableId> = BTreeSet::new();

    for set_mapping in &mapping.entity_set_mappings {
        for type_mapping in &set_mapping.type_mappings {
            for fragment in &type_mapping.fragments {
                referenced.insert(fragment.table());
            }
        }
    }
    for association_mapping in &mapping.association_set_mappings {
        referenced.insert(association_mapping.table);
    }

    mapping
        .schema
        .tables()
        .map(|(id, _)| id)
        .filter(|id| !referenced.contains(id))
        .collect()
}
