use crate::types::{ColumnId, ForeignKeyId};
use serde::Serialize;

///
/// Table
///

#[derive(Clone, Debug, Serialize)]
pub struct Table {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKeyId>,
}
