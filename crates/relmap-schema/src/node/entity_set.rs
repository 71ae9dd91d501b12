use crate::types::EntityTypeId;
use serde::Serialize;

///
/// EntitySet
/// Named collection storing one inheritance hierarchy, rooted at
/// `element_type`. A set groups types logically; it says nothing about how
/// many tables those types land in.
///

#[derive(Clone, Debug, Serialize)]
pub struct EntitySet {
    pub name: String,
    pub element_type: EntityTypeId,
}
