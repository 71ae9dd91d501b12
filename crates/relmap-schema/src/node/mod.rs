//! Schema nodes: the logical entity model and the physical database model,
//! held together in one arena container.

mod association;
mod column;
mod entity_set;
mod entity_type;
mod foreign_key;
mod table;

pub use association::{Association, AssociationEnd};
pub use column::Column;
pub use entity_set::EntitySet;
pub use entity_type::EntityType;
pub use foreign_key::ForeignKey;
pub use table::Table;

use crate::types::{
    AssociationId, ColumnId, EntitySetId, EntityTypeId, ForeignKeyId, TableId,
};
use serde::Serialize;

///
/// Schema
/// Arena for logical and physical schema nodes. The `add_*` builders return
/// typed ids that index back into this arena; handing an id to a different
/// schema is a programming defect and panics on lookup.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Schema {
    entity_types: Vec<EntityType>,
    entity_sets: Vec<EntitySet>,
    tables: Vec<Table>,
    columns: Vec<Column>,
    foreign_keys: Vec<ForeignKey>,
    associations: Vec<Association>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- builders ---

    /// Register an entity type. A base, when given, must already be
    /// registered, which keeps the inheritance graph acyclic by construction.
    pub fn add_entity_type(
        &mut self,
        name: impl Into<String>,
        base: Option<EntityTypeId>,
        is_abstract: bool,
    ) -> EntityTypeId {
        if let Some(base) = base {
            let _ = self.entity_type(base);
        }

        self.entity_types.push(EntityType {
            name: name.into(),
            base,
            is_abstract,
        });

        EntityTypeId::from_index(self.entity_types.len() - 1)
    }

    pub fn add_entity_set(
        &mut self,
        name: impl Into<String>,
        element_type: EntityTypeId,
    ) -> EntitySetId {
        let _ = self.entity_type(element_type);
        self.entity_sets.push(EntitySet {
            name: name.into(),
            element_type,
        });

        EntitySetId::from_index(self.entity_sets.len() - 1)
    }

    pub fn add_table(&mut self, name: impl Into<String>) -> TableId {
        self.tables.push(Table {
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        });

        TableId::from_index(self.tables.len() - 1)
    }

    /// Register a column and wire it into its owning table.
    pub fn add_column(
        &mut self,
        table: TableId,
        name: impl Into<String>,
        is_primary_key: bool,
        is_nullable: bool,
    ) -> ColumnId {
        self.columns.push(Column {
            name: name.into(),
            table,
            is_primary_key,
            is_nullable,
        });
        let id = ColumnId::from_index(self.columns.len() - 1);
        self.table_mut(table).columns.push(id);

        id
    }

    /// Register a foreign key on `table` and wire it into the table's
    /// constraint list.
    pub fn add_foreign_key(
        &mut self,
        table: TableId,
        name: impl Into<String>,
        columns: Vec<ColumnId>,
        principal_table: TableId,
        is_type_constraint: bool,
    ) -> ForeignKeyId {
        let _ = self.table(principal_table);
        self.foreign_keys.push(ForeignKey {
            name: name.into(),
            table,
            columns,
            principal_table,
            is_type_constraint,
            association: None,
        });
        let id = ForeignKeyId::from_index(self.foreign_keys.len() - 1);
        self.table_mut(table).foreign_keys.push(id);

        id
    }

    /// Register an association; when a realizing constraint is given, the
    /// foreign key is back-linked to the new association.
    pub fn add_association(
        &mut self,
        name: impl Into<String>,
        principal: AssociationEnd,
        dependent: AssociationEnd,
        constraint: Option<ForeignKeyId>,
    ) -> AssociationId {
        self.associations.push(Association {
            name: name.into(),
            principal,
            dependent,
            constraint,
        });
        let id = AssociationId::from_index(self.associations.len() - 1);
        if let Some(fk) = constraint {
            self.foreign_key_mut(fk).association = Some(id);
        }

        id
    }

    // --- accessors ---

    #[must_use]
    pub fn entity_type(&self, id: EntityTypeId) -> &EntityType {
        self.entity_types.get(id.index()).expect("unknown entity type id")
    }

    #[must_use]
    pub fn entity_set(&self, id: EntitySetId) -> &EntitySet {
        self.entity_sets.get(id.index()).expect("unknown entity set id")
    }

    #[must_use]
    pub fn table(&self, id: TableId) -> &Table {
        self.tables.get(id.index()).expect("unknown table id")
    }

    #[must_use]
    pub fn column(&self, id: ColumnId) -> &Column {
        self.columns.get(id.index()).expect("unknown column id")
    }

    #[must_use]
    pub fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        self.columns.get_mut(id.index()).expect("unknown column id")
    }

    #[must_use]
    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        self.foreign_keys.get(id.index()).expect("unknown foreign key id")
    }

    #[must_use]
    pub fn association(&self, id: AssociationId) -> &Association {
        self.associations.get(id.index()).expect("unknown association id")
    }

    fn table_mut(&mut self, id: TableId) -> &mut Table {
        self.tables.get_mut(id.index()).expect("unknown table id")
    }

    fn foreign_key_mut(&mut self, id: ForeignKeyId) -> &mut ForeignKey {
        self.foreign_keys.get_mut(id.index()).expect("unknown foreign key id")
    }

    pub fn entity_types(&self) -> impl Iterator<Item = (EntityTypeId, &EntityType)> {
        self.entity_types
            .iter()
            .enumerate()
            .map(|(index, node)| (EntityTypeId::from_index(index), node))
    }

    pub fn entity_sets(&self) -> impl Iterator<Item = (EntitySetId, &EntitySet)> {
        self.entity_sets
            .iter()
            .enumerate()
            .map(|(index, node)| (EntitySetId::from_index(index), node))
    }

    pub fn tables(&self) -> impl Iterator<Item = (TableId, &Table)> {
        self.tables
            .iter()
            .enumerate()
            .map(|(index, node)| (TableId::from_index(index), node))
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = (ForeignKeyId, &ForeignKey)> {
        self.foreign_keys
            .iter()
            .enumerate()
            .map(|(index, node)| (ForeignKeyId::from_index(index), node))
    }

    pub fn associations(&self) -> impl Iterator<Item = (AssociationId, &Association)> {
        self.associations
            .iter()
            .enumerate()
            .map(|(index, node)| (AssociationId::from_index(index), node))
    }

    // --- inheritance queries ---

    /// True when `ancestor` is a strict ancestor of `ty`.
    #[must_use]
    pub fn is_strict_ancestor(&self, ancestor: EntityTypeId, ty: EntityTypeId) -> bool {
        let mut current = self.entity_type(ty).base;
        while let Some(base) = current {
            if base == ancestor {
                return true;
            }
            current = self.entity_type(base).base;
        }

        false
    }

    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: EntityTypeId, ty: EntityTypeId) -> bool {
        ancestor == ty || self.is_strict_ancestor(ancestor, ty)
    }

    /// Strict ancestors of `ty`, nearest base first.
    pub fn ancestors(&self, ty: EntityTypeId) -> impl Iterator<Item = EntityTypeId> + '_ {
        std::iter::successors(self.entity_type(ty).base, |base| {
            self.entity_type(*base).base
        })
    }

    /// True when another table carries a type-constraint foreign key whose
    /// principal is `table`, i.e. the table anchors a cross-table subtype
    /// relationship.
    #[must_use]
    pub fn has_subtype_constraint_to(&self, table: TableId) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| fk.is_type_constraint && fk.principal_table == table && fk.table != table)
    }
}
