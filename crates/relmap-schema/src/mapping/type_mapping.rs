use crate::{
    mapping::MappingFragment,
    types::{EntityTypeId, TableId},
};
use serde::Serialize;

///
/// EntityTypeMapping
/// Groups the fragments for one entity type. A hierarchy (IsTypeOf) mapping
/// applies to the type and all of its subtypes, not just exact instances.
///

#[derive(Clone, Debug, Serialize)]
pub struct EntityTypeMapping {
    pub entity_type: EntityTypeId,
    pub is_hierarchy_mapping: bool,
    pub fragments: Vec<MappingFragment>,
}

impl EntityTypeMapping {
    #[must_use]
    pub const fn new(entity_type: EntityTypeId) -> Self {
        Self {
            entity_type,
            is_hierarchy_mapping: false,
            fragments: Vec::new(),
        }
    }

    #[must_use]
    pub fn fragment_for_table(&self, table: TableId) -> Option<&MappingFragment> {
        self.fragments.iter().find(|f| f.table() == table)
    }
}
