use crate::types::TableId;
use serde::Serialize;

///
/// Column
/// Belongs to exactly one table. Nullability is mutated by the consolidation
/// engine when foreign-key inference tightens it.
///

#[derive(Clone, Debug, Serialize)]
pub struct Column {
    pub name: String,
    pub table: TableId,
    pub is_primary_key: bool,
    pub is_nullable: bool,
}
