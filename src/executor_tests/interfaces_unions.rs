use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{
    executor_tests::run_query,
    schema::{Schema, SchemaConfig},
    types::{
        Field, InterfaceConfig, InterfaceType, ObjectConfig, ObjectType, Type, UnionConfig,
        UnionType,
    },
    value::{HostValue, Object, Value},
};

/// A pet handed to resolvers as opaque host data.
#[derive(Debug)]
struct Cat {
    name: &'static str,
    meows: bool,
}

impl HostValue for Cat {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(self.name.into()),
            "meows" => Some(self.meows.into()),
            _ => None,
        }
    }
}

fn dog(name: &str) -> Value {
    let dog: Object = [
        ("kind", Value::from("dog")),
        ("name", Value::from(name)),
        ("barks", Value::from(true)),
    ]
    .into_iter()
    .collect();
    Value::Object(dog)
}

fn pets() -> Value {
    Value::list(vec![
        dog("Odie"),
        Value::host(Cat {
            name: "Garfield",
            meows: false,
        }),
    ])
}

fn kind(kind: &str) -> Value {
    Value::Object([("kind", Value::from(kind))].into_iter().collect())
}

fn schema() -> Schema {
    let named = InterfaceType::new(
        InterfaceConfig::new("Named").field(Field::new("name", Type::string())),
    );

    let dog_type = ObjectType::new(
        ObjectConfig::new("Dog")
            .field(Field::new("name", Type::string()))
            .field(Field::new("barks", Type::boolean()))
            .interface(named.clone())
            .is_type_of(|v, _| v.property("kind") == Some(Value::from("dog"))),
    );

    let cat_type = ObjectType::new(
        ObjectConfig::new("Cat")
            .field(Field::new("name", Type::string()))
            .field(Field::new("meows", Type::boolean()))
            .interface(named.clone())
            .is_type_of(|v, _| v.downcast_ref::<Cat>().is_some()),
    );

    let stranger = ObjectType::new(
        ObjectConfig::new("Stranger").field(Field::new("name", Type::string())),
    );

    let pet = {
        let dog_type = dog_type.clone();
        let cat_type = cat_type.clone();
        UnionType::new(
            UnionConfig::new("Pet")
                .member(dog_type.clone())
                .member(cat_type.clone())
                .resolve_type(move |v, _| {
                    if v.downcast_ref::<Cat>().is_some() {
                        return Some(cat_type.clone());
                    }
                    match v.property("kind")?.as_str()? {
                        "dog" => Some(dog_type.clone()),
                        "stranger" => Some(stranger.clone()),
                        _ => None,
                    }
                }),
        )
    };

    let query = ObjectType::new(
        ObjectConfig::new("Query")
            .field(Field::new("pets", Type::list(pet.clone())).resolve(|_| Ok(pets())))
            .field(Field::new("named", Type::list(named)).resolve(|_| Ok(pets())))
            .field(Field::new("weird", Type::list(pet)).resolve(|_| {
                Ok(Value::list(vec![kind("fish"), kind("stranger")]))
            })),
    );

    Schema::new(SchemaConfig::new(query).types([Type::from(dog_type), Type::from(cat_type)]))
        .expect("schema assembles")
}

#[test]
fn resolves_union_members() {
    assert_eq!(
        run_query(
            &schema(),
            "{ pets { __typename ... on Dog { name barks } ... on Cat { name meows } } }",
        ),
        json!({
            "data": {
                "pets": [
                    {"__typename": "Dog", "name": "Odie", "barks": true},
                    {"__typename": "Cat", "name": "Garfield", "meows": false},
                ],
            },
        }),
    );
}

#[test]
fn resolves_interface_implementers_by_is_type_of() {
    assert_eq!(
        run_query(
            &schema(),
            "{ named { __typename name ... on Dog { barks } ... on Cat { meows } } }",
        ),
        json!({
            "data": {
                "named": [
                    {"__typename": "Dog", "name": "Odie", "barks": true},
                    {"__typename": "Cat", "name": "Garfield", "meows": false},
                ],
            },
        }),
    );
}

#[test]
fn fragments_on_the_interface_apply_to_every_implementer() {
    assert_eq!(
        run_query(
            &schema(),
            "{ pets { ...N } } fragment N on Named { name }",
        ),
        json!({"data": {"pets": [{"name": "Odie"}, {"name": "Garfield"}]}}),
    );
}

#[test]
fn reports_unresolvable_runtime_types() {
    assert_eq!(
        run_query(&schema(), "{ weird { __typename } }"),
        json!({
            "data": {"weird": [null, null]},
            "errors": [
                {
                    "message": "Abstract type Pet must resolve to an Object type at runtime \
                                for field Query.weird.",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["weird", 0],
                },
                {
                    "message": "Runtime Object type \"Stranger\" is not a possible type for \
                                \"Pet\".",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["weird", 1],
                },
            ],
        }),
    );
}

#[test]
fn possible_types_are_introspectable() {
    let result = run_query(
        &schema(),
        r#"{
            pet: __type(name: "Pet") { possibleTypes { name } }
            named: __type(name: "Named") { possibleTypes { name } }
        }"#,
    );

    assert_eq!(
        result,
        json!({
            "data": {
                "pet": {"possibleTypes": [{"name": "Dog"}, {"name": "Cat"}]},
                "named": {"possibleTypes": [{"name": "Dog"}, {"name": "Cat"}]},
            },
        }),
    );
}
