use crate::report::ConsolidationReport;
use relmap_schema::{
    mapping::ColumnCondition,
    types::{ColumnId, EntityTypeId, PropertyPath},
};
use std::collections::BTreeSet;

///
/// PropertyMappingSpecification
///
/// One type's assertion against a column: a data-carrying property path, the
/// conditions applying on the column, or both. A missing path means the
/// column is condition-only for that type.
///

#[derive(Clone, Debug)]
pub struct PropertyMappingSpecification {
    pub entity_type: EntityTypeId,
    pub path: Option<PropertyPath>,
    pub conditions: Vec<ColumnCondition>,
    pub is_default_discriminator: bool,
}

///
/// ColumnMapping
///
/// Accumulates the specifications every sharing type asserts for one column,
/// across all fragments that target the column's table.
///

#[derive(Debug)]
pub struct ColumnMapping {
    column: ColumnId,
    specifications: Vec<PropertyMappingSpecification>,
}

impl ColumnMapping {
    #[must_use]
    pub const fn new(column: ColumnId) -> Self {
        Self {
            column,
            specifications: Vec::new(),
        }
    }

    #[must_use]
    pub const fn column(&self) -> ColumnId {
        self.column
    }

    #[must_use]
    pub fn specifications(&self) -> &[PropertyMappingSpecification] {
        &self.specifications
    }

    /// Append a specification. No dedup here: the ingestion protocol calls
    /// this once per distinct (type, column) pair per fragment.
    pub fn add_specification(
        &mut self,
        entity_type: EntityTypeId,
        path: Option<PropertyPath>,
        conditions: Vec<ColumnCondition>,
        is_default_discriminator: bool,
    ) {
        self.specifications.push(PropertyMappingSpecification {
            entity_type,
            path,
            conditions,
            is_default_discriminator,
        });
    }

    /// A default discriminator carried by exactly one of the types registered
    /// for the set distinguishes nothing; drop it. Condition-only
    /// specifications losing their condition are dropped whole.
    pub(crate) fn remove_redundant_default_discriminator(
        &mut self,
        set_types: &[EntityTypeId],
        report: &mut ConsolidationReport,
    ) {
        let carriers: BTreeSet<EntityTypeId> = self
            .specifications
            .iter()
            .filter(|spec| spec.is_default_discriminator && set_types.contains(&spec.entity_type))
            .map(|spec| spec.entity_type)
            .collect();
        if carriers.len() != 1 {
            return;
        }
        let carrier = *carriers.first().expect("exactly one carrier");

        self.specifications.retain_mut(|spec| {
            if spec.entity_type != carrier || !spec.is_default_discriminator {
                return true;
            }

            spec.conditions.retain(|c| !c.is_default_discriminator);
            spec.is_default_discriminator = false;
            report.redundant_discriminators_removed += 1;

            spec.path.is_some()
        });
    }
}
