use crate::{
    mapping::EntityTypeMapping,
    types::{AssociationId, EntitySetId, EntityTypeId, TableId},
};
use serde::Serialize;

///
/// EntitySetMapping
/// All type mappings grouped under one entity set.
///

#[derive(Clone, Debug, Serialize)]
pub struct EntitySetMapping {
    pub entity_set: EntitySetId,
    pub type_mappings: Vec<EntityTypeMapping>,
}

impl EntitySetMapping {
    #[must_use]
    pub const fn new(entity_set: EntitySetId) -> Self {
        Self {
            entity_set,
            type_mappings: Vec::new(),
        }
    }

    pub fn mappings_for(
        &self,
        entity_type: EntityTypeId,
    ) -> impl Iterator<Item = &EntityTypeMapping> {
        self.type_mappings
            .iter()
            .filter(move |tm| tm.entity_type == entity_type)
    }

    #[must_use]
    pub fn hierarchy_mapping_for(&self, entity_type: EntityTypeId) -> Option<&EntityTypeMapping> {
        self.mappings_for(entity_type)
            .find(|tm| tm.is_hierarchy_mapping)
    }
}

///
/// AssociationSetMapping
/// Maps one association onto the table realizing it. Source and target name
/// the entity sets at the association's two ends.
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AssociationSetMapping {
    pub association: AssociationId,
    pub source_set: EntitySetId,
    pub target_set: EntitySetId,
    pub table: TableId,
}
