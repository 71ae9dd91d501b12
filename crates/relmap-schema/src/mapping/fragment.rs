use crate::{
    node::Schema,
    types::{ColumnId, ConditionValue, PropertyPath, TableId},
};
use serde::Serialize;

///
/// PropertyMapping
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PropertyMapping {
    pub path: PropertyPath,
    pub column: ColumnId,
}

///
/// ColumnCondition
/// Value-based discriminator on one column. A default discriminator is the
/// condition the upstream generator synthesized, as opposed to one the user
/// configured explicitly.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ColumnCondition {
    pub column: ColumnId,
    pub value: ConditionValue,
    pub is_default_discriminator: bool,
}

///
/// MappingFragment
/// Raw unit of mapping input: one entity type's property and condition
/// assertions against one table. The table is fixed at creation; the
/// consolidator edits contents or deletes the fragment, never moves it.
///

#[derive(Clone, Debug, Serialize)]
pub struct MappingFragment {
    table: TableId,
    pub property_mappings: Vec<PropertyMapping>,
    pub conditions: Vec<ColumnCondition>,
}

impl MappingFragment {
    #[must_use]
    pub const fn new(table: TableId) -> Self {
        Self {
            table,
            property_mappings: Vec::new(),
            conditions: Vec::new(),
        }
    }

    #[must_use]
    pub const fn table(&self) -> TableId {
        self.table
    }

    pub fn map_property(&mut self, path: impl Into<PropertyPath>, column: ColumnId) {
        self.property_mappings.push(PropertyMapping {
            path: path.into(),
            column,
        });
    }

    pub fn add_condition(
        &mut self,
        column: ColumnId,
        value: ConditionValue,
        is_default_discriminator: bool,
    ) {
        self.conditions.push(ColumnCondition {
            column,
            value,
            is_default_discriminator,
        });
    }

    #[must_use]
    pub fn property_for(&self, path: &PropertyPath) -> Option<&PropertyMapping> {
        self.property_mappings.iter().find(|pm| pm.path == *path)
    }

    #[must_use]
    pub fn maps_path(&self, path: &PropertyPath) -> bool {
        self.property_for(path).is_some()
    }

    /// True when every property mapping targets a primary-key column.
    /// Vacuously true for a fragment with no property mappings.
    #[must_use]
    pub fn maps_only_key_columns(&self, schema: &Schema) -> bool {
        self.property_mappings
            .iter()
            .all(|pm| schema.column(pm.column).is_primary_key)
    }
}
