use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

use crate::{
    executor_tests::run_query,
    schema::{Schema, SchemaConfig},
    types::{Argument, EnumConfig, EnumType, EnumValue, Field, ObjectConfig, ObjectType, Type},
    value::Value,
};

fn schema() -> Schema {
    let sample = EnumType::new(
        EnumConfig::new("SampleEnum")
            .value(EnumValue::new("ONE").value(1).description("The first one"))
            .value(EnumValue::new("TWO").value(2))
            .value(EnumValue::new("THREE").value(3).deprecated(Some("Too many"))),
    );

    let root = ObjectType::new(
        ObjectConfig::new("Root")
            .description("The root query object")
            .field(
                Field::new("sampleEnum", sample)
                    .argument(Argument::new("first", Type::boolean()).default_value(true))
                    .resolve(|p| {
                        let first = p.arg("first").and_then(Value::as_bool).unwrap_or(true);
                        Ok(Value::Int(if first { 1 } else { 2 }))
                    }),
            )
            .field(
                Field::new("old", Type::non_null(Type::list(Type::string())))
                    .deprecated(None),
            ),
    );

    let mutation = ObjectType::new(
        ObjectConfig::new("Mutation").field(Field::new("noop", Type::boolean())),
    );

    Schema::new(SchemaConfig::new(root).mutation(mutation)).expect("schema assembles")
}

fn data(query: &str) -> Json {
    let result = run_query(&schema(), query);
    assert_eq!(result.get("errors"), None, "{result}");
    result["data"].clone()
}

#[test]
fn typename_names_the_runtime_type() {
    assert_eq!(
        data("{ __typename t: __typename sampleEnum }"),
        json!({"__typename": "Root", "t": "Root", "sampleEnum": "ONE"}),
    );
    assert_eq!(
        data("mutation { __typename }"),
        json!({"__typename": "Mutation"}),
    );
}

#[test]
fn enum_values_serialize_by_name() {
    assert_eq!(
        data("{ sampleEnum(first: false) }"),
        json!({"sampleEnum": "TWO"}),
    );
}

#[test]
fn enum_introspection() {
    assert_eq!(
        data(
            r#"
            {
                __type(name: "SampleEnum") {
                    kind
                    name
                    enumValues {
                        name
                        description
                        isDeprecated
                        deprecationReason
                    }
                }
            }
            "#,
        ),
        json!({
            "__type": {
                "kind": "ENUM",
                "name": "SampleEnum",
                "enumValues": [
                    {
                        "name": "ONE",
                        "description": "The first one",
                        "isDeprecated": false,
                        "deprecationReason": null,
                    },
                    {
                        "name": "TWO",
                        "description": null,
                        "isDeprecated": false,
                        "deprecationReason": null,
                    },
                ],
            },
        }),
    );
}

#[test]
fn enum_introspection_including_deprecated() {
    assert_eq!(
        data(
            r#"
            {
                __type(name: "SampleEnum") {
                    enumValues(includeDeprecated: true) { name deprecationReason }
                }
            }
            "#,
        ),
        json!({
            "__type": {
                "enumValues": [
                    {"name": "ONE", "deprecationReason": null},
                    {"name": "TWO", "deprecationReason": null},
                    {"name": "THREE", "deprecationReason": "Too many"},
                ],
            },
        }),
    );
}

#[test]
fn object_introspection() {
    assert_eq!(
        data(
            r#"
            {
                __type(name: "Root") {
                    kind
                    name
                    description
                    interfaces { name }
                    possibleTypes { name }
                    fields(includeDeprecated: true) {
                        name
                        isDeprecated
                        args { name defaultValue type { kind name } }
                        type { kind name ofType { kind name ofType { kind name } } }
                    }
                }
            }
            "#,
        ),
        json!({
            "__type": {
                "kind": "OBJECT",
                "name": "Root",
                "description": "The root query object",
                "interfaces": [],
                "possibleTypes": null,
                "fields": [
                    {
                        "name": "sampleEnum",
                        "isDeprecated": false,
                        "args": [{
                            "name": "first",
                            "defaultValue": "true",
                            "type": {"kind": "SCALAR", "name": "Boolean"},
                        }],
                        "type": {"kind": "ENUM", "name": "SampleEnum", "ofType": null},
                    },
                    {
                        "name": "old",
                        "isDeprecated": true,
                        "args": [],
                        "type": {
                            "kind": "NON_NULL",
                            "name": null,
                            "ofType": {
                                "kind": "LIST",
                                "name": null,
                                "ofType": {"kind": "SCALAR", "name": "String"},
                            },
                        },
                    },
                ],
            },
        }),
    );
}

#[test]
fn deprecated_fields_are_hidden_by_default() {
    assert_eq!(
        data(r#"{ __type(name: "Root") { fields { name } } }"#),
        json!({"__type": {"fields": [{"name": "sampleEnum"}]}}),
    );
}

#[test]
fn unknown_types_introspect_to_null() {
    assert_eq!(
        data(r#"{ __type(name: "Nope") { name } }"#),
        json!({"__type": null}),
    );
}

#[test]
fn schema_introspection() {
    let result = data(
        r"
        {
            __schema {
                queryType { name }
                mutationType { name }
                subscriptionType { name }
                directives { name locations args { name defaultValue } }
            }
        }
        ",
    );

    assert_eq!(
        result,
        json!({
            "__schema": {
                "queryType": {"name": "Root"},
                "mutationType": {"name": "Mutation"},
                "subscriptionType": null,
                "directives": [
                    {
                        "name": "include",
                        "locations": ["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"],
                        "args": [{"name": "if", "defaultValue": null}],
                    },
                    {
                        "name": "skip",
                        "locations": ["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"],
                        "args": [{"name": "if", "defaultValue": null}],
                    },
                    {
                        "name": "deprecated",
                        "locations": ["FIELD_DEFINITION", "ENUM_VALUE"],
                        "args": [{"name": "reason", "defaultValue": "\"No longer supported\""}],
                    },
                ],
            },
        }),
    );
}

#[test]
fn schema_lists_every_named_type() {
    let result = data("{ __schema { types { name } } }");

    let names = result["__schema"]["types"]
        .as_array()
        .expect("types are a list")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect::<Vec<_>>();

    for expected in [
        "Root",
        "Mutation",
        "SampleEnum",
        "Boolean",
        "String",
        "__Schema",
        "__Type",
        "__TypeKind",
        "__Field",
        "__InputValue",
        "__EnumValue",
        "__Directive",
        "__DirectiveLocation",
    ] {
        assert!(names.contains(&expected), "{expected} missing from {names:?}");
    }
}
