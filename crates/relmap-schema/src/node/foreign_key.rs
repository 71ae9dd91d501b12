use crate::types::{AssociationId, ColumnId, TableId};
use serde::Serialize;

///
/// ForeignKey
/// Constraint from dependent columns to a principal table. A type constraint
/// links a subtype's table to its base type's table and carries no
/// association of its own.
///

#[derive(Clone, Debug, Serialize)]
pub struct ForeignKey {
    pub name: String,
    pub table: TableId,
    pub columns: Vec<ColumnId>,
    pub principal_table: TableId,
    pub is_type_constraint: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<AssociationId>,
}
