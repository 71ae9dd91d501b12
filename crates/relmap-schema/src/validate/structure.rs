use crate::{err, error::ErrorTree, mapping::DatabaseMapping};
use std::collections::BTreeSet;

/// Referential checks over the raw mapping graph: every fragment stays inside
/// its declared table, every foreign key stays inside its owning table, and
/// association back-links are consistent.
pub fn validate_structure(mapping: &DatabaseMapping, errs: &mut ErrorTree) {
    let schema = &mapping.schema;

    for set_mapping in &mapping.entity_set_mappings {
        let set = schema.entity_set(set_mapping.entity_set);

        for type_mapping in &set_mapping.type_mappings {
            let ty = schema.entity_type(type_mapping.entity_type);

            if !schema.is_ancestor_or_self(set.element_type, type_mapping.entity_type) {
                err!(
                    errs,
                    "entity type '{}' is mapped under entity set '{}' but does not descend from its element type",
                    ty.name,
                    set.name
                );
            }

            let mut seen_tables = BTreeSet::new();
            for fragment in &type_mapping.fragments {
                let table = schema.table(fragment.table());

                if !seen_tables.insert(fragment.table()) {
                    err!(
                        errs,
                        "entity type '{}' carries more than one fragment for table '{}' in one type mapping",
                        ty.name,
                        table.name
                    );
                }

                let mut seen_paths = BTreeSet::new();
                for property in &fragment.property_mappings {
                    let column = schema.column(property.column);
                    if column.table != fragment.table() {
                        err!(
                            errs,
                            "fragment for '{}' maps '{}' to column '{}.{}', outside its table '{}'",
                            ty.name,
                            property.path,
                            schema.table(column.table).name,
                            column.name,
                            table.name
                        );
                    }
                    if !seen_paths.insert(property.path.clone()) {
                        err!(
                            errs,
                            "fragment for '{}' maps property '{}' twice in table '{}'",
                            ty.name,
                            property.path,
                            table.name
                        );
                    }
                }

                for condition in &fragment.conditions {
                    let column = schema.column(condition.column);
                    if column.table != fragment.table() {
                        err!(
                            errs,
                            "fragment for '{}' conditions on column '{}.{}', outside its table '{}'",
                            ty.name,
                            schema.table(column.table).name,
                            column.name,
                            table.name
                        );
                    }
                }
            }
        }
    }

    for (_, fk) in schema.foreign_keys() {
        for column_id in &fk.columns {
            let column = schema.column(*column_id);
            if column.table != fk.table {
                err!(
                    errs,
                    "foreign key '{}' lists column '{}.{}', outside its table '{}'",
                    fk.name,
                    schema.table(column.table).name,
                    column.name,
                    schema.table(fk.table).name
                );
            }
        }
    }

    for (id, association) in schema.associations() {
        if let Some(fk_id) = association.constraint {
            let fk = schema.foreign_key(fk_id);
            if fk.association != Some(id) {
                err!(
                    errs,
                    "association '{}' names constraint '{}' but the constraint does not point back",
                    association.name,
                    fk.name
                );
            }
        }
    }
}
