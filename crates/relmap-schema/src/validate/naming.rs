use crate::{err, error::ErrorTree, node::Schema};
use std::collections::BTreeMap;

/// Duplicate-name checks across the schema. Names are diagnostics-only for
/// the engine, but duplicates usually mean the upstream generator registered
/// the same element twice.
pub fn validate_naming(schema: &Schema, errs: &mut ErrorTree) {
    let mut type_names: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, entity_type) in schema.entity_types() {
        *type_names.entry(entity_type.name.as_str()).or_default() += 1;
    }
    for (name, count) in type_names {
        if count > 1 {
            err!(errs, "duplicate entity type name '{name}' ({count} registrations)");
        }
    }

    let mut table_names: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, table) in schema.tables() {
        *table_names.entry(table.name.as_str()).or_default() += 1;
    }
    for (name, count) in table_names {
        if count > 1 {
            err!(errs, "duplicate table name '{name}' ({count} registrations)");
        }
    }

    for (_, table) in schema.tables() {
        let mut column_names: BTreeMap<&str, usize> = BTreeMap::new();
        for column_id in &table.columns {
            *column_names
                .entry(schema.column(*column_id).name.as_str())
                .or_default() += 1;
        }
        for (name, count) in column_names {
            if count > 1 {
                err!(
                    errs,
                    "duplicate column name '{name}' in table '{}' ({count} registrations)",
                    table.name
                );
            }
        }
    }
}
