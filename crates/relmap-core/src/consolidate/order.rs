use relmap_schema::{
    node::Schema,
    types::{EntitySetId, EntityTypeId},
};
use std::collections::BTreeMap;

///
/// EntityTypeOrder
///
/// Ordered entity-type registry per entity set: an ancestor always precedes
/// its descendants, unrelated types keep insertion order. Scoped either
/// globally (every registered pair) or to one table mapping.
///

#[derive(Debug, Default)]
pub struct EntityTypeOrder {
    orders: BTreeMap<EntitySetId, Vec<EntityTypeId>>,
}

impl EntityTypeOrder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            orders: BTreeMap::new(),
        }
    }

    /// Insert `entity_type` for `set`; re-inserting is a no-op. Scans left to
    /// right and slots the type in front of its first registered descendant.
    pub fn add(&mut self, schema: &Schema, set: EntitySetId, entity_type: EntityTypeId) {
        let order = self.orders.entry(set).or_default();

        for index in 0..order.len() {
            if order[index] == entity_type {
                return;
            }
            if schema.is_strict_ancestor(entity_type, order[index]) {
                order.insert(index, entity_type);
                return;
            }
        }

        order.push(entity_type);
    }

    #[must_use]
    pub fn contains(&self, set: EntitySetId, entity_type: EntityTypeId) -> bool {
        self.entity_types(set).contains(&entity_type)
    }

    /// False only when another registered type of the set is a strict
    /// ancestor of `entity_type`.
    #[must_use]
    pub fn is_root(&self, schema: &Schema, set: EntitySetId, entity_type: EntityTypeId) -> bool {
        !self
            .entity_types(set)
            .iter()
            .any(|other| *other != entity_type && schema.is_strict_ancestor(*other, entity_type))
    }

    /// Registered types for `set`, ancestors first. Empty for an unregistered
    /// set, not an error.
    #[must_use]
    pub fn entity_types(&self, set: EntitySetId) -> &[EntityTypeId] {
        self.orders.get(&set).map_or(&[], Vec::as_slice)
    }

    /// Sets with at least one registered type.
    pub fn entity_sets(&self) -> impl Iterator<Item = EntitySetId> + '_ {
        self.orders.keys().copied()
    }
}
