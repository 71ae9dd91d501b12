use derive_more::{Deref, Display, FromStr};
use serde::{Deserialize, Serialize};
use std::fmt;

// Arena ids: a value indexes into the `Schema` that produced it. Ids are
// plain indices, so an id from a different schema is a programming defect.
macro_rules! schema_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
        )]
        pub struct $name(usize);

        impl $name {
            #[must_use]
            pub(crate) const fn from_index(index: usize) -> Self {
                Self(index)
            }

            #[must_use]
            pub(crate) const fn index(self) -> usize {
                self.0
            }
        }
    };
}

schema_id!(
    /// Identifies an entity type within one `Schema`.
    EntityTypeId
);
schema_id!(
    /// Identifies an entity set within one `Schema`.
    EntitySetId
);
schema_id!(
    /// Identifies a physical table within one `Schema`.
    TableId
);
schema_id!(
    /// Identifies a physical column within one `Schema`.
    ColumnId
);
schema_id!(
    /// Identifies a foreign-key constraint within one `Schema`.
    ForeignKeyId
);
schema_id!(
    /// Identifies an association within one `Schema`.
    AssociationId
);

///
/// Multiplicity
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize)]
#[remain::sorted]
pub enum Multiplicity {
    Many,
    One,
    ZeroOrOne,
}

impl Multiplicity {
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::One)
    }

    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::ZeroOrOne)
    }
}

///
/// DiscriminatorValue
/// Literal a discriminator column is compared against.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum DiscriminatorValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for DiscriminatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "'{value}'"),
        }
    }
}

///
/// ConditionValue
/// What a column condition asserts about the column's stored value.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum ConditionValue {
    IsNull,
    NotNull,
    Value(DiscriminatorValue),
}

///
/// PropertyPath
/// Structural path from an entity type to one of its scalar properties.
/// Equality is element-wise over the segments.
///

#[derive(
    Clone, Debug, Deref, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for PropertyPath {
    fn from(segment: &str) -> Self {
        Self(vec![segment.to_string()])
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}
