//! Mapping-graph nodes: raw per-type fragments grouped under entity-set
//! mappings, plus the `DatabaseMapping` container the consolidation engine
//! takes exclusive mutable access over.

mod fragment;
mod set_mapping;
mod type_mapping;

pub use fragment::{ColumnCondition, MappingFragment, PropertyMapping};
pub use set_mapping::{AssociationSetMapping, EntitySetMapping};
pub use type_mapping::EntityTypeMapping;

use crate::{node::Schema, types::EntitySetId};
use serde::Serialize;

///
/// DatabaseMapping
/// The complete mapping graph: schema plus raw mapping nodes. Consolidation
/// mutates this in place; there is no rollback, so a failed run leaves the
/// graph unusable.
///

#[derive(Clone, Debug, Serialize)]
pub struct DatabaseMapping {
    pub schema: Schema,
    pub entity_set_mappings: Vec<EntitySetMapping>,
    pub association_set_mappings: Vec<AssociationSetMapping>,
}

impl DatabaseMapping {
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self {
            schema,
            entity_set_mappings: Vec::new(),
            association_set_mappings: Vec::new(),
        }
    }

    /// Find-or-create the set mapping for `entity_set`.
    pub fn set_mapping_mut(&mut self, entity_set: EntitySetId) -> &mut EntitySetMapping {
        if let Some(index) = self
            .entity_set_mappings
            .iter()
            .position(|m| m.entity_set == entity_set)
        {
            return &mut self.entity_set_mappings[index];
        }

        self.entity_set_mappings
            .push(EntitySetMapping::new(entity_set));
        self.entity_set_mappings
            .last_mut()
            .expect("set mapping just pushed")
    }

    #[must_use]
    pub fn set_mapping(&self, entity_set: EntitySetId) -> Option<&EntitySetMapping> {
        self.entity_set_mappings
            .iter()
            .find(|m| m.entity_set == entity_set)
    }
}
