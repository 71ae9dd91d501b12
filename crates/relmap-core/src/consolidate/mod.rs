//! Two-phase mapping consolidation: Analyze folds the raw fragments into
//! per-table views, Transform rewrites the mapping graph against those views
//! in ancestor-before-descendant order.

mod cleanup;
mod column;
mod order;
mod table;

pub use cleanup::orphaned_tables;
pub use column::{ColumnMapping, PropertyMappingSpecification};
pub use order::EntityTypeOrder;
pub use table::TableMapping;

use crate::report::ConsolidationReport;
use relmap_schema::{
    mapping::{
        AssociationSetMapping, DatabaseMapping, EntitySetMapping, EntityTypeMapping,
        MappingFragment, PropertyMapping,
    },
    node::Schema,
    types::{ColumnId, EntitySetId, EntityTypeId, PropertyPath, TableId},
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// ConsolidateError
///
/// Defects in the upstream fragment generator. Nothing here is recoverable:
/// Transform has no rollback, so callers must discard the mapping graph on
/// error.
///

#[derive(Debug, ThisError)]
pub enum ConsolidateError {
    #[error(
        "fragment for '{entity_type}' targets table '{fragment_table}' but was folded into '{table}'"
    )]
    FragmentTableMismatch {
        entity_type: String,
        fragment_table: String,
        table: String,
    },
}

///
/// MappingConsolidator
///
/// Two-phase engine over one mapping graph. `configure` runs Analyze then
/// Transform and may be invoked at most once per graph: re-running on
/// already-consolidated input is unsupported.
///

pub struct MappingConsolidator<'a> {
    mapping: &'a mut DatabaseMapping,
    order: EntityTypeOrder,
    table_mappings: BTreeMap<TableId, TableMapping>,
    report: ConsolidationReport,
}

/// Consolidate a mapping graph in place and return the mutation report.
pub fn consolidate(
    mapping: &mut DatabaseMapping,
) -> Result<ConsolidationReport, ConsolidateError> {
    MappingConsolidator::new(mapping).configure()
}

impl<'a> MappingConsolidator<'a> {
    #[must_use]
    pub fn new(mapping: &'a mut DatabaseMapping) -> Self {
        Self {
            mapping,
            order: EntityTypeOrder::new(),
            table_mappings: BTreeMap::new(),
            report: ConsolidationReport::default(),
        }
    }

    pub fn configure(mut self) -> Result<ConsolidationReport, ConsolidateError> {
        self.analyze()?;
        self.transform();
        self.report.orphaned_tables = cleanup::orphaned_tables(self.mapping);

        Ok(self.report)
    }

    // Group raw fragments by table and record which types map where.
    fn analyze(&mut self) -> Result<(), ConsolidateError> {
        let mapping: &DatabaseMapping = &*self.mapping;

        for set_mapping in &mapping.entity_set_mappings {
            for type_mapping in &set_mapping.type_mappings {
                for fragment in &type_mapping.fragments {
                    self.order.add(
                        &mapping.schema,
                        set_mapping.entity_set,
                        type_mapping.entity_type,
                    );
                    self.table_mappings
                        .entry(fragment.table())
                        .or_insert_with(|| TableMapping::new(fragment.table()))
                        .ingest_fragment(
                            &mapping.schema,
                            set_mapping.entity_set,
                            type_mapping.entity_type,
                            fragment,
                        )?;
                }
            }
        }

        Ok(())
    }

    fn transform(&mut self) {
        let sets: Vec<EntitySetId> = self.order.entity_sets().collect();
        let table_ids: Vec<TableId> = self.table_mappings.keys().copied().collect();

        for set in sets {
            // Hierarchy roots promoted for this set, keyed by table.
            let mut promoted: BTreeSet<(TableId, EntityTypeId)> = BTreeSet::new();

            for table_id in &table_ids {
                let table_mapping = self
                    .table_mappings
                    .get_mut(table_id)
                    .expect("table mapping built during analyze");

                let types = table_mapping.entity_types(set).to_vec();
                if types.is_empty() {
                    continue;
                }

                table_mapping.remove_redundant_default_discriminators(set, &mut self.report);

                let table_mapping = self
                    .table_mappings
                    .get(table_id)
                    .expect("table mapping built during analyze");
                let DatabaseMapping {
                    schema,
                    entity_set_mappings,
                    ..
                } = &mut *self.mapping;
                let set_mapping = entity_set_mappings
                    .iter_mut()
                    .find(|m| m.entity_set == set)
                    .expect("entity set mapping registered during analyze");

                for entity_type in types {
                    transform_entity_type(
                        schema,
                        set_mapping,
                        table_mapping,
                        set,
                        entity_type,
                        &mut promoted,
                        &mut self.report,
                    );
                }
            }

            // Final pass: the nullability rule applied through the
            // association-set mappings touching this set.
            let DatabaseMapping {
                schema,
                association_set_mappings,
                ..
            } = &mut *self.mapping;
            for association_mapping in &*association_set_mappings {
                if association_mapping.source_set != set && association_mapping.target_set != set {
                    continue;
                }
                infer_association_nullability(
                    schema,
                    &self.table_mappings,
                    association_mapping,
                    &mut self.report,
                );
            }
        }
    }
}

// Address of one fragment inside a set mapping. Structural edits invalidate
// locations, so every helper that reshapes the mapping list hands back the
// adjusted address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct FragmentLoc {
    mapping: usize,
    fragment: usize,
}

fn transform_entity_type(
    schema: &mut Schema,
    set_mapping: &mut EntitySetMapping,
    table_mapping: &TableMapping,
    set: EntitySetId,
    entity_type: EntityTypeId,
    promoted: &mut BTreeSet<(TableId, EntityTypeId)>,
    report: &mut ConsolidationReport,
) {
    let table = table_mapping.table();

    let requires_is_type_of =
        determine_requires_is_type_of(schema, table_mapping, set, entity_type);

    let Some(mut properties) =
        find_properties_fragment(set_mapping, entity_type, table, requires_is_type_of)
    else {
        // No fragment for this table: nothing to do for this type.
        return;
    };

    // Abstract types need no direct storage fragment unless they anchor a
    // shared-hierarchy mapping.
    if schema.entity_type(entity_type).is_abstract && !requires_is_type_of {
        remove_fragment_at(set_mapping, properties, report);
        return;
    }

    let requires_split = requires_is_type_of && table_mapping.has_conditions_for(entity_type);

    let mut conditions = if requires_split {
        Some(split_conditions_fragment(
            schema,
            set_mapping,
            properties,
            report,
        ))
    } else {
        None
    };

    if requires_is_type_of {
        properties =
            promote_hierarchy_mapping(set_mapping, properties, &mut conditions, report);
        promoted.insert((table, entity_type));
    }

    reconcile_properties(
        schema,
        set_mapping,
        table_mapping,
        properties,
        entity_type,
        promoted,
        report,
    );

    reconcile_conditions(
        schema,
        set_mapping,
        table_mapping,
        conditions.unwrap_or(properties),
        entity_type,
        report,
    );

    drop_vestigial_fragments(schema, set_mapping, properties, conditions, report);

    infer_fk_nullability(schema, table_mapping, set, entity_type, report);
}

// A root type needs an IsTypeOf mapping when concrete subtypes share its
// table, or when a type-constraint FK targets the table from another table.
fn determine_requires_is_type_of(
    schema: &Schema,
    table_mapping: &TableMapping,
    set: EntitySetId,
    entity_type: EntityTypeId,
) -> bool {
    if !table_mapping.is_root(schema, set, entity_type) {
        return false;
    }

    let types = table_mapping.entity_types(set);
    let shares_with_concrete = types.len() > 1
        && types
            .iter()
            .any(|other| *other != entity_type && schema.entity_type(*other).is_concrete());

    shares_with_concrete || schema.has_subtype_constraint_to(table_mapping.table())
}

// Locate the fragment carrying this type's properties for one table,
// preferring mappings whose hierarchy flag matches the required role.
fn find_properties_fragment(
    set_mapping: &EntitySetMapping,
    entity_type: EntityTypeId,
    table: TableId,
    prefer_hierarchy: bool,
) -> Option<FragmentLoc> {
    let locate = |hierarchy: bool| {
        set_mapping
            .type_mappings
            .iter()
            .enumerate()
            .find_map(|(mapping, type_mapping)| {
                if type_mapping.entity_type != entity_type
                    || type_mapping.is_hierarchy_mapping != hierarchy
                {
                    return None;
                }
                type_mapping
                    .fragments
                    .iter()
                    .position(|f| f.table() == table)
                    .map(|fragment| FragmentLoc { mapping, fragment })
            })
    };

    locate(prefer_hierarchy).or_else(|| locate(!prefer_hierarchy))
}

// Remove one fragment, dropping its type mapping once no fragments remain.
fn remove_fragment_at(
    set_mapping: &mut EntitySetMapping,
    loc: FragmentLoc,
    report: &mut ConsolidationReport,
) {
    let type_mapping = &mut set_mapping.type_mappings[loc.mapping];
    type_mapping.fragments.remove(loc.fragment);
    report.fragments_removed += 1;

    if type_mapping.fragments.is_empty() {
        set_mapping.type_mappings.remove(loc.mapping);
    }
}

// Split conditions off into a dedicated exact-type mapping: the promoted
// fragment keeps the properties, the clone keeps the key mappings plus the
// conditions selecting the exact type.
fn split_conditions_fragment(
    schema: &Schema,
    set_mapping: &mut EntitySetMapping,
    properties: FragmentLoc,
    report: &mut ConsolidationReport,
) -> FragmentLoc {
    let source = &mut set_mapping.type_mappings[properties.mapping];
    let entity_type = source.entity_type;
    let fragment = &mut source.fragments[properties.fragment];

    let mut clone = MappingFragment::new(fragment.table());
    for property in &fragment.property_mappings {
        if schema.column(property.column).is_primary_key {
            clone.property_mappings.push(property.clone());
        }
    }
    clone.conditions = std::mem::take(&mut fragment.conditions);

    let mut type_mapping = EntityTypeMapping::new(entity_type);
    type_mapping.fragments.push(clone);
    set_mapping.type_mappings.push(type_mapping);
    report.fragment_splits += 1;

    FragmentLoc {
        mapping: set_mapping.type_mappings.len() - 1,
        fragment: 0,
    }
}

// Promote the properties mapping to a hierarchy (IsTypeOf) mapping: merge
// into an existing hierarchy mapping for the type, or split unrelated
// fragments off first and flag the mapping in place.
fn promote_hierarchy_mapping(
    set_mapping: &mut EntitySetMapping,
    properties: FragmentLoc,
    conditions: &mut Option<FragmentLoc>,
    report: &mut ConsolidationReport,
) -> FragmentLoc {
    if set_mapping.type_mappings[properties.mapping].is_hierarchy_mapping {
        return properties;
    }
    let entity_type = set_mapping.type_mappings[properties.mapping].entity_type;

    let existing = set_mapping
        .type_mappings
        .iter()
        .position(|tm| tm.entity_type == entity_type && tm.is_hierarchy_mapping);

    let location = if let Some(mut target) = existing {
        let fragment =
            set_mapping.type_mappings[properties.mapping].fragments.remove(properties.fragment);
        set_mapping.type_mappings[target].fragments.push(fragment);

        if set_mapping.type_mappings[properties.mapping].fragments.is_empty() {
            set_mapping.type_mappings.remove(properties.mapping);
            if properties.mapping < target {
                target -= 1;
            }
            if let Some(cond) = conditions.as_mut() {
                if properties.mapping < cond.mapping {
                    cond.mapping -= 1;
                }
            }
        }

        FragmentLoc {
            mapping: target,
            fragment: set_mapping.type_mappings[target].fragments.len() - 1,
        }
    } else {
        if set_mapping.type_mappings[properties.mapping].fragments.len() > 1 {
            let type_mapping = &mut set_mapping.type_mappings[properties.mapping];
            let keep = type_mapping.fragments.remove(properties.fragment);
            let rest = std::mem::replace(&mut type_mapping.fragments, vec![keep]);

            let mut sibling = EntityTypeMapping::new(entity_type);
            sibling.fragments = rest;
            set_mapping.type_mappings.push(sibling);
        }

        set_mapping.type_mappings[properties.mapping].is_hierarchy_mapping = true;

        FragmentLoc {
            mapping: properties.mapping,
            fragment: 0,
        }
    };

    report.hierarchy_promotions += 1;
    location
}

// A path is covered when a promoted root ancestor's hierarchy mapping already
// maps it in this table.
fn covered_by_promoted_root(
    schema: &Schema,
    set_mapping: &EntitySetMapping,
    promoted: &BTreeSet<(TableId, EntityTypeId)>,
    table: TableId,
    entity_type: EntityTypeId,
    path: &PropertyPath,
) -> bool {
    schema.ancestors(entity_type).any(|ancestor| {
        promoted.contains(&(table, ancestor))
            && set_mapping
                .hierarchy_mapping_for(ancestor)
                .and_then(|tm| tm.fragment_for_table(table))
                .is_some_and(|fragment| fragment.maps_path(path))
    })
}

// Ensure the fragment carries exactly the property mappings the table view
// records for this type, minus paths a promoted root already covers. Stale
// mappings are removed, primary-key columns excepted.
fn reconcile_properties(
    schema: &Schema,
    set_mapping: &mut EntitySetMapping,
    table_mapping: &TableMapping,
    properties: FragmentLoc,
    entity_type: EntityTypeId,
    promoted: &BTreeSet<(TableId, EntityTypeId)>,
    report: &mut ConsolidationReport,
) {
    let table = table_mapping.table();

    let recorded: Vec<_> = table_mapping
        .property_assertions_for(entity_type)
        .into_iter()
        .filter(|(_, path)| {
            !covered_by_promoted_root(schema, set_mapping, promoted, table, entity_type, path)
        })
        .collect();

    let fragment =
        &mut set_mapping.type_mappings[properties.mapping].fragments[properties.fragment];

    let mut recomputed: BTreeSet<PropertyPath> = BTreeSet::new();
    for (column, path) in recorded {
        match fragment
            .property_mappings
            .iter_mut()
            .find(|pm| pm.path == path)
        {
            Some(existing) => existing.column = column,
            None => {
                fragment.property_mappings.push(PropertyMapping {
                    path: path.clone(),
                    column,
                });
                report.property_mappings_added += 1;
            }
        }
        recomputed.insert(path);
    }

    let before = fragment.property_mappings.len();
    fragment
        .property_mappings
        .retain(|pm| recomputed.contains(&pm.path) || schema.column(pm.column).is_primary_key);
    report.property_mappings_removed += before - fragment.property_mappings.len();
}

// Sync the conditions fragment with the conditions the table view records for
// this type. Abstract types carry no conditions at all.
fn reconcile_conditions(
    schema: &Schema,
    set_mapping: &mut EntitySetMapping,
    table_mapping: &TableMapping,
    conditions: FragmentLoc,
    entity_type: EntityTypeId,
    report: &mut ConsolidationReport,
) {
    let fragment =
        &mut set_mapping.type_mappings[conditions.mapping].fragments[conditions.fragment];

    if schema.entity_type(entity_type).is_abstract {
        report.conditions_removed += fragment.conditions.len();
        fragment.conditions.clear();
        return;
    }

    let recorded = table_mapping.conditions_for(entity_type);
    for condition in &recorded {
        if !fragment.conditions.contains(condition) {
            fragment.conditions.push(condition.clone());
            report.conditions_added += 1;
        }
    }

    let before = fragment.conditions.len();
    fragment.conditions.retain(|c| recorded.contains(c));
    report.conditions_removed += before - fragment.conditions.len();
}

// Drop fragments that only restate key columns and carry no conditions.
fn drop_vestigial_fragments(
    schema: &Schema,
    set_mapping: &mut EntitySetMapping,
    properties: FragmentLoc,
    conditions: Option<FragmentLoc>,
    report: &mut ConsolidationReport,
) {
    let is_vestigial = |set_mapping: &EntitySetMapping, loc: FragmentLoc| {
        let fragment = &set_mapping.type_mappings[loc.mapping].fragments[loc.fragment];
        fragment.conditions.is_empty() && fragment.maps_only_key_columns(schema)
    };

    let mut removals: Vec<FragmentLoc> = Vec::new();
    if is_vestigial(set_mapping, properties) {
        removals.push(properties);
    }
    if let Some(cond) = conditions {
        if is_vestigial(set_mapping, cond) {
            removals.push(cond);
        }
    }

    // Deepest locations first so earlier addresses stay valid.
    removals.sort_by(|a, b| (b.mapping, b.fragment).cmp(&(a.mapping, a.fragment)));
    for loc in removals {
        remove_fragment_at(set_mapping, loc, report);
    }
}

// Required-to-optional FKs held by this type become non-nullable unless the
// table is shared with a non-abstract base or sibling type.
fn infer_fk_nullability(
    schema: &mut Schema,
    table_mapping: &TableMapping,
    set: EntitySetId,
    entity_type: EntityTypeId,
    report: &mut ConsolidationReport,
) {
    let foreign_keys = schema.table(table_mapping.table()).foreign_keys.clone();

    for fk_id in foreign_keys {
        let fk = schema.foreign_key(fk_id);
        let Some(association_id) = fk.association else {
            continue;
        };
        let dependent_columns = fk.columns.clone();

        let association = schema.association(association_id);
        if !association.is_required_to_optional()
            || association.dependent.entity_type != entity_type
        {
            continue;
        }

        if table_shared_outside_subtree(schema, table_mapping, set, entity_type) {
            continue;
        }

        mark_non_nullable(schema, &dependent_columns, report);
    }
}

// Rows of a base or sibling type have no value for this type's FK, so the
// columns must stay nullable. The type's own descendants always carry the
// value and do not count.
fn table_shared_outside_subtree(
    schema: &Schema,
    table_mapping: &TableMapping,
    set: EntitySetId,
    entity_type: EntityTypeId,
) -> bool {
    table_mapping.entity_types(set).iter().any(|other| {
        *other != entity_type
            && schema.entity_type(*other).is_concrete()
            && !schema.is_strict_ancestor(entity_type, *other)
    })
}

fn mark_non_nullable(
    schema: &mut Schema,
    columns: &[ColumnId],
    report: &mut ConsolidationReport,
) {
    for column_id in columns {
        let column = schema.column_mut(*column_id);
        if column.is_nullable {
            column.is_nullable = false;
            report.columns_marked_non_nullable += 1;
        }
    }
}

// Final per-set pass: resolve the dependent table through the association's
// realizing FK and apply the same sharing rule.
fn infer_association_nullability(
    schema: &mut Schema,
    table_mappings: &BTreeMap<TableId, TableMapping>,
    association_mapping: &AssociationSetMapping,
    report: &mut ConsolidationReport,
) {
    let association = schema.association(association_mapping.association);
    if !association.is_required_to_optional() {
        return;
    }
    let Some(fk_id) = association.constraint else {
        return;
    };
    let dependent_type = association.dependent.entity_type;

    let fk = schema.foreign_key(fk_id);
    let dependent_table = fk.table;
    let dependent_columns = fk.columns.clone();

    let Some(table_mapping) = table_mappings.get(&dependent_table) else {
        return;
    };
    let Some(dependent_set) = [association_mapping.source_set, association_mapping.target_set]
        .into_iter()
        .find(|set| table_mapping.entity_types(*set).contains(&dependent_type))
    else {
        return;
    };

    if table_shared_outside_subtree(schema, table_mapping, dependent_set, dependent_type) {
        return;
    }

    mark_non_nullable(schema, &dependent_columns, report);
}
