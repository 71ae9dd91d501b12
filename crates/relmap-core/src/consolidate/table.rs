use crate::{
    consolidate::{ColumnMapping, ConsolidateError, EntityTypeOrder},
    report::ConsolidationReport,
};
use relmap_schema::{
    mapping::{ColumnCondition, MappingFragment},
    node::Schema,
    types::{ColumnId, EntitySetId, EntityTypeId, PropertyPath, TableId},
};
use std::collections::BTreeMap;

///
/// TableMapping
///
/// Consolidated per-table view of every raw fragment targeting one table.
/// Working state for a single consolidation run: built by Analyze, consulted
/// and discarded by Transform, never persisted.
///

#[derive(Debug)]
pub struct TableMapping {
    table: TableId,
    order: EntityTypeOrder,
    column_mappings: Vec<ColumnMapping>,
}

impl TableMapping {
    #[must_use]
    pub const fn new(table: TableId) -> Self {
        Self {
            table,
            order: EntityTypeOrder::new(),
            column_mappings: Vec::new(),
        }
    }

    #[must_use]
    pub const fn table(&self) -> TableId {
        self.table
    }

    #[must_use]
    pub fn column_mappings(&self) -> &[ColumnMapping] {
        &self.column_mappings
    }

    /// Entity types registered for `set` against this table, ancestors first.
    #[must_use]
    pub fn entity_types(&self, set: EntitySetId) -> &[EntityTypeId] {
        self.order.entity_types(set)
    }

    #[must_use]
    pub fn is_root(&self, schema: &Schema, set: EntitySetId, entity_type: EntityTypeId) -> bool {
        self.order.is_root(schema, set, entity_type)
    }

    /// Fold one raw fragment into the consolidated view: register the type,
    /// then record one specification per column the fragment touches.
    pub fn ingest_fragment(
        &mut self,
        schema: &Schema,
        set: EntitySetId,
        entity_type: EntityTypeId,
        fragment: &MappingFragment,
    ) -> Result<(), ConsolidateError> {
        if fragment.table() != self.table {
            return Err(ConsolidateError::FragmentTableMismatch {
                entity_type: schema.entity_type(entity_type).name.clone(),
                fragment_table: schema.table(fragment.table()).name.clone(),
                table: schema.table(self.table).name.clone(),
            });
        }

        self.order.add(schema, set, entity_type);

        for property in &fragment.property_mappings {
            let conditions: Vec<ColumnCondition> = fragment
                .conditions
                .iter()
                .filter(|c| c.column == property.column)
                .cloned()
                .collect();
            let is_default_discriminator =
                conditions.iter().any(|c| c.is_default_discriminator);
            self.column_mapping_mut(property.column).add_specification(
                entity_type,
                Some(property.path.clone()),
                conditions,
                is_default_discriminator,
            );
        }

        // Conditions on columns with no property mapping become
        // condition-only specifications, one per column.
        let mut condition_only: BTreeMap<ColumnId, Vec<ColumnCondition>> = BTreeMap::new();
        for condition in &fragment.conditions {
            if fragment
                .property_mappings
                .iter()
                .any(|pm| pm.column == condition.column)
            {
                continue;
            }
            condition_only
                .entry(condition.column)
                .or_default()
                .push(condition.clone());
        }
        for (column, conditions) in condition_only {
            let is_default_discriminator =
                conditions.iter().any(|c| c.is_default_discriminator);
            self.column_mapping_mut(column).add_specification(
                entity_type,
                None,
                conditions,
                is_default_discriminator,
            );
        }

        Ok(())
    }

    // Find-or-create, keyed by column identity.
    fn column_mapping_mut(&mut self, column: ColumnId) -> &mut ColumnMapping {
        if let Some(index) = self
            .column_mappings
            .iter()
            .position(|cm| cm.column() == column)
        {
            return &mut self.column_mappings[index];
        }

        self.column_mappings.push(ColumnMapping::new(column));
        self.column_mappings
            .last_mut()
            .expect("column mapping just pushed")
    }

    /// True when any specification for `entity_type` carries conditions.
    #[must_use]
    pub fn has_conditions_for(&self, entity_type: EntityTypeId) -> bool {
        self.column_mappings.iter().any(|cm| {
            cm.specifications()
                .iter()
                .any(|spec| spec.entity_type == entity_type && !spec.conditions.is_empty())
        })
    }

    /// (column, path) assertions recorded for exactly `entity_type`.
    #[must_use]
    pub fn property_assertions_for(
        &self,
        entity_type: EntityTypeId,
    ) -> Vec<(ColumnId, PropertyPath)> {
        let mut assertions = Vec::new();
        for column_mapping in &self.column_mappings {
            for spec in column_mapping.specifications() {
                if spec.entity_type != entity_type {
                    continue;
                }
                if let Some(path) = &spec.path {
                    assertions.push((column_mapping.column(), path.clone()));
                }
            }
        }

        assertions
    }

    /// Conditions recorded for exactly `entity_type`, deduplicated
    /// structurally.
    #[must_use]
    pub fn conditions_for(&self, entity_type: EntityTypeId) -> Vec<ColumnCondition> {
        let mut conditions: Vec<ColumnCondition> = Vec::new();
        for column_mapping in &self.column_mappings {
            for spec in column_mapping.specifications() {
                if spec.entity_type != entity_type {
                    continue;
                }
                for condition in &spec.conditions {
                    if !conditions.contains(condition) {
                        conditions.push(condition.clone());
                    }
                }
            }
        }

        conditions
    }

    /// Once per (table, set), ahead of per-type processing: drop default
    /// discriminators that distinguish only one registered type.
    pub(crate) fn remove_redundant_default_discriminators(
        &mut self,
        set: EntitySetId,
        report: &mut ConsolidationReport,
    ) {
        let set_types = self.order.entity_types(set).to_vec();
        for column_mapping in &mut self.column_mappings {
            column_mapping.remove_redundant_default_discriminator(&set_types, report);
        }
    }
}
