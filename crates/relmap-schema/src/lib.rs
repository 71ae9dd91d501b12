//! Schema and mapping-graph model for relmap: the logical entity model, the
//! physical database model, and the raw per-type mapping fragments consumed
//! by the consolidation engine in `relmap-core`.

pub mod error;
pub mod mapping;
pub mod node;
pub mod types;
pub mod validate;

use crate::error::ErrorTree;
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        mapping::{
            AssociationSetMapping, ColumnCondition, DatabaseMapping, EntitySetMapping,
            EntityTypeMapping, MappingFragment, PropertyMapping,
        },
        node::{
            Association, AssociationEnd, Column, EntitySet, EntityType, ForeignKey, Schema, Table,
        },
        types::{
            AssociationId, ColumnId, ConditionValue, DiscriminatorValue, EntitySetId,
            EntityTypeId, ForeignKeyId, Multiplicity, PropertyPath, TableId,
        },
    };
    pub use serde::Serialize;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("mapping graph validation failed: {0}")]
    Validation(ErrorTree),
}

impl From<ErrorTree> for Error {
    fn from(tree: ErrorTree) -> Self {
        Self::Validation(tree)
    }
}
