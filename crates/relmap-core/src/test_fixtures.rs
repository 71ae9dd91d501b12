//! Scenario builders shared by the consolidation tests. Each builder returns
//! the raw, pre-consolidation mapping graph the way the upstream generator
//! would emit it, plus the ids the assertions need.

use relmap_schema::{
    mapping::{AssociationSetMapping, DatabaseMapping, EntityTypeMapping, MappingFragment},
    node::{AssociationEnd, Schema},
    types::{
        ColumnId, ConditionValue, DiscriminatorValue, EntitySetId, EntityTypeId, Multiplicity,
        TableId,
    },
};

fn discriminator(value: &str) -> ConditionValue {
    ConditionValue::Value(DiscriminatorValue::Text(value.to_string()))
}

fn push_fragment(
    mapping: &mut DatabaseMapping,
    set: EntitySetId,
    entity_type: EntityTypeId,
    fragment: MappingFragment,
) {
    let mut type_mapping = EntityTypeMapping::new(entity_type);
    type_mapping.fragments.push(fragment);
    mapping.set_mapping_mut(set).type_mappings.push(type_mapping);
}

///
/// TphFixture
/// Abstract `Animal` root plus concrete `Dog` and `Cat`, all in one table
/// with a default discriminator on `kind`. The generator emits inherited
/// properties on every subtype fragment; consolidation must dedup them.
///

pub(crate) struct TphFixture {
    pub mapping: DatabaseMapping,
    pub set: EntitySetId,
    pub animal: EntityTypeId,
    pub dog: EntityTypeId,
    pub cat: EntityTypeId,
    pub animals: TableId,
    pub kind: ColumnId,
}

pub(crate) fn animals_tph() -> TphFixture {
    let mut schema = Schema::new();
    let animal = schema.add_entity_type("Animal", None, true);
    let dog = schema.add_entity_type("Dog", Some(animal), false);
    let cat = schema.add_entity_type("Cat", Some(animal), false);
    let set = schema.add_entity_set("Animals", animal);

    let animals = schema.add_table("animals");
    let id = schema.add_column(animals, "id", true, false);
    let name = schema.add_column(animals, "name", false, true);
    let bark = schema.add_column(animals, "bark", false, true);
    let meow = schema.add_column(animals, "meow", false, true);
    let kind = schema.add_column(animals, "kind", false, true);

    let mut mapping = DatabaseMapping::new(schema);

    let mut animal_fragment = MappingFragment::new(animals);
    animal_fragment.map_property("id", id);
    animal_fragment.map_property("name", name);
    push_fragment(&mut mapping, set, animal, animal_fragment);

    let mut dog_fragment = MappingFragment::new(animals);
    dog_fragment.map_property("id", id);
    dog_fragment.map_property("name", name);
    dog_fragment.map_property("bark", bark);
    dog_fragment.add_condition(kind, discriminator("Dog"), true);
    push_fragment(&mut mapping, set, dog, dog_fragment);

    let mut cat_fragment = MappingFragment::new(animals);
    cat_fragment.map_property("id", id);
    cat_fragment.map_property("name", name);
    cat_fragment.map_property("meow", meow);
    cat_fragment.add_condition(kind, discriminator("Cat"), true);
    push_fragment(&mut mapping, set, cat, cat_fragment);

    TphFixture {
        mapping,
        set,
        animal,
        dog,
        cat,
        animals,
        kind,
    }
}

///
/// SingleTypeFixture
/// One concrete type, one table, one default discriminator: the condition
/// distinguishes nothing and must be erased.
///

pub(crate) struct SingleTypeFixture {
    pub mapping: DatabaseMapping,
    pub set: EntitySetId,
    pub order: EntityTypeId,
}

pub(crate) fn single_type_with_discriminator() -> SingleTypeFixture {
    let mut schema = Schema::new();
    let order = schema.add_entity_type("Order", None, false);
    let set = schema.add_entity_set("Orders", order);

    let orders = schema.add_table("orders");
    let id = schema.add_column(orders, "id", true, false);
    let total = schema.add_column(orders, "total", false, true);
    let disc = schema.add_column(orders, "disc", false, true);

    let mut mapping = DatabaseMapping::new(schema);
    let mut fragment = MappingFragment::new(orders);
    fragment.map_property("id", id);
    fragment.map_property("total", total);
    fragment.add_condition(disc, discriminator("Order"), true);
    push_fragment(&mut mapping, set, order, fragment);

    SingleTypeFixture { mapping, set, order }
}

///
/// FkFixture
/// `Order` (principal, required) and `OrderDetail` (dependent, optional)
/// joined by a foreign key on the detail table. With `shared`, a concrete
/// `Document` base type also maps into the detail table, which must keep the
/// key nullable.
///

pub(crate) struct FkFixture {
    pub mapping: DatabaseMapping,
    pub order_id: ColumnId,
}

pub(crate) fn order_detail_fk(shared: bool) -> FkFixture {
    let mut schema = Schema::new();
    let order = schema.add_entity_type("Order", None, false);
    let document = if shared {
        Some(schema.add_entity_type("Document", None, false))
    } else {
        None
    };
    let detail = schema.add_entity_type("OrderDetail", document, false);
    let orders_set = schema.add_entity_set("Orders", order);
    let details_root = document.unwrap_or(detail);
    let details_set = schema.add_entity_set("OrderDetails", details_root);

    let orders = schema.add_table("orders");
    let orders_id = schema.add_column(orders, "id", true, false);

    let order_details = schema.add_table("order_details");
    let details_id = schema.add_column(order_details, "id", true, false);
    let note = schema.add_column(order_details, "note", false, true);
    let order_id = schema.add_column(order_details, "order_id", false, true);

    let fk = schema.add_foreign_key(
        order_details,
        "fk_order_details_orders",
        vec![order_id],
        orders,
        false,
    );
    let association = schema.add_association(
        "Order_OrderDetail",
        AssociationEnd {
            entity_type: order,
            multiplicity: Multiplicity::One,
        },
        AssociationEnd {
            entity_type: detail,
            multiplicity: Multiplicity::ZeroOrOne,
        },
        Some(fk),
    );

    let mut mapping = DatabaseMapping::new(schema);

    let mut order_fragment = MappingFragment::new(orders);
    order_fragment.map_property("id", orders_id);
    push_fragment(&mut mapping, orders_set, order, order_fragment);

    if let Some(document) = document {
        let mut document_fragment = MappingFragment::new(order_details);
        document_fragment.map_property("id", details_id);
        document_fragment.map_property("note", note);
        push_fragment(&mut mapping, details_set, document, document_fragment);
    }

    let mut detail_fragment = MappingFragment::new(order_details);
    detail_fragment.map_property("id", details_id);
    detail_fragment.map_property("note", note);
    detail_fragment.map_property("order", order_id);
    push_fragment(&mut mapping, details_set, detail, detail_fragment);

    mapping.association_set_mappings.push(AssociationSetMapping {
        association,
        source_set: orders_set,
        target_set: details_set,
        table: order_details,
    });

    FkFixture { mapping, order_id }
}

///
/// SplitFixture
/// Concrete `Vehicle` root sharing its table with `Car`, both discriminated.
/// The root needs an IsTypeOf mapping and its own discriminator, which forces
/// the properties/conditions split.
///

pub(crate) struct SplitFixture {
    pub mapping: DatabaseMapping,
    pub set: EntitySetId,
    pub vehicle: EntityTypeId,
    pub car: EntityTypeId,
    pub vehicles: TableId,
    pub kind: ColumnId,
}

pub(crate) fn vehicles_concrete_root() -> SplitFixture {
    let mut schema = Schema::new();
    let vehicle = schema.add_entity_type("Vehicle", None, false);
    let car = schema.add_entity_type("Car", Some(vehicle), false);
    let set = schema.add_entity_set("Vehicles", vehicle);

    let vehicles = schema.add_table("vehicles");
    let id = schema.add_column(vehicles, "id", true, false);
    let vin = schema.add_column(vehicles, "vin", false, true);
    let doors = schema.add_column(vehicles, "doors", false, true);
    let kind = schema.add_column(vehicles, "kind", false, true);

    let mut mapping = DatabaseMapping::new(schema);

    let mut vehicle_fragment = MappingFragment::new(vehicles);
    vehicle_fragment.map_property("id", id);
    vehicle_fragment.map_property("vin", vin);
    vehicle_fragment.add_condition(kind, discriminator("V"), true);
    push_fragment(&mut mapping, set, vehicle, vehicle_fragment);

    let mut car_fragment = MappingFragment::new(vehicles);
    car_fragment.map_property("id", id);
    car_fragment.map_property("doors", doors);
    car_fragment.add_condition(kind, discriminator("C"), true);
    push_fragment(&mut mapping, set, car, car_fragment);

    SplitFixture {
        mapping,
        set,
        vehicle,
        car,
        vehicles,
        kind,
    }
}

///
/// TptFixture
/// `Person` root and `Employee` subtype, each in its own table, linked by a
/// type-constraint foreign key from the subtype's key to the root's table.
///

pub(crate) struct TptFixture {
    pub mapping: DatabaseMapping,
    pub set: EntitySetId,
    pub person: EntityTypeId,
    pub employee: EntityTypeId,
    pub people: TableId,
}

pub(crate) fn tpt_pair() -> TptFixture {
    let mut schema = Schema::new();
    let person = schema.add_entity_type("Person", None, false);
    let employee = schema.add_entity_type("Employee", Some(person), false);
    let set = schema.add_entity_set("People", person);

    let people = schema.add_table("people");
    let people_id = schema.add_column(people, "id", true, false);
    let name = schema.add_column(people, "name", false, true);

    let employees = schema.add_table("employees");
    let employees_id = schema.add_column(employees, "id", true, false);
    let salary = schema.add_column(employees, "salary", false, true);

    schema.add_foreign_key(
        employees,
        "fk_employees_people",
        vec![employees_id],
        people,
        true,
    );

    let mut mapping = DatabaseMapping::new(schema);

    let mut person_fragment = MappingFragment::new(people);
    person_fragment.map_property("id", people_id);
    person_fragment.map_property("name", name);
    push_fragment(&mut mapping, set, person, person_fragment);

    let mut employee_fragment = MappingFragment::new(employees);
    employee_fragment.map_property("id", employees_id);
    employee_fragment.map_property("salary", salary);
    push_fragment(&mut mapping, set, employee, employee_fragment);

    TptFixture {
        mapping,
        set,
        person,
        employee,
        people,
    }
}

///
/// LoneAbstractFixture
/// An abstract type alone in its table, with no polymorphic role: its
/// fragment is vestigial input and must be removed, orphaning the table.
///

pub(crate) struct LoneAbstractFixture {
    pub mapping: DatabaseMapping,
    pub set: EntitySetId,
    pub lones: TableId,
}

pub(crate) fn lone_abstract_type() -> LoneAbstractFixture {
    let mut schema = Schema::new();
    let lone = schema.add_entity_type("Ghost", None, true);
    let set = schema.add_entity_set("Ghosts", lone);

    let lones = schema.add_table("ghosts");
    let id = schema.add_column(lones, "id", true, false);
    let name = schema.add_column(lones, "name", false, true);

    let mut mapping = DatabaseMapping::new(schema);
    let mut fragment = MappingFragment::new(lones);
    fragment.map_property("id", id);
    fragment.map_property("name", name);
    push_fragment(&mut mapping, set, lone, fragment);

    LoneAbstractFixture { mapping, set, lones }
}
