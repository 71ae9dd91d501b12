use crate::types::EntityTypeId;
use serde::Serialize;

///
/// EntityType
/// One node in a single-rooted inheritance tree. Identity is the arena id;
/// names exist for diagnostics, not lookup.
///

#[derive(Clone, Debug, Serialize)]
pub struct EntityType {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<EntityTypeId>,

    pub is_abstract: bool,
}

impl EntityType {
    #[must_use]
    pub const fn is_concrete(&self) -> bool {
        !self.is_abstract
    }
}
