use relmap_schema::types::TableId;
use serde::Serialize;

///
/// ConsolidationReport
///
/// Point-in-time account of one configure run: how much the transform
/// changed, plus the tables left orphaned for the downstream artifact-cleanup
/// stage. Counters are totals across every entity set and table.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ConsolidationReport {
    pub redundant_discriminators_removed: usize,
    pub hierarchy_promotions: usize,
    pub fragment_splits: usize,
    pub fragments_removed: usize,
    pub property_mappings_added: usize,
    pub property_mappings_removed: usize,
    pub conditions_added: usize,
    pub conditions_removed: usize,
    pub columns_marked_non_nullable: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orphaned_tables: Vec<TableId>,
}

impl ConsolidationReport {
    /// True when the run changed nothing and left nothing to clean up.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.redundant_discriminators_removed == 0
            && self.hierarchy_promotions == 0
            && self.fragment_splits == 0
            && self.fragments_removed == 0
            && self.property_mappings_added == 0
            && self.property_mappings_removed == 0
            && self.conditions_added == 0
            && self.conditions_removed == 0
            && self.columns_marked_non_nullable == 0
            && self.orphaned_tables.is_empty()
    }
}
