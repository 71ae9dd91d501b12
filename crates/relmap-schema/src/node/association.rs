use crate::types::{EntityTypeId, ForeignKeyId, Multiplicity};
use serde::Serialize;

///
/// AssociationEnd
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AssociationEnd {
    pub entity_type: EntityTypeId,
    pub multiplicity: Multiplicity,
}

///
/// Association
/// Relationship between two entity types. The dependent end holds the
/// foreign key named by `constraint`; the principal end is referenced by it.
///

#[derive(Clone, Debug, Serialize)]
pub struct Association {
    pub name: String,
    pub principal: AssociationEnd,
    pub dependent: AssociationEnd,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<ForeignKeyId>,
}

impl Association {
    /// One required end, one optional end.
    #[must_use]
    pub const fn is_required_to_optional(&self) -> bool {
        (self.principal.multiplicity.is_required() && self.dependent.multiplicity.is_optional())
            || (self.principal.multiplicity.is_optional()
                && self.dependent.multiplicity.is_required())
    }
}
