use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

use crate::{
    executor_tests::{run, run_query},
    schema::{Schema, SchemaConfig},
    types::{Field, ObjectConfig, ObjectType, Type},
    value::Value,
    Params,
};

fn schema() -> Schema {
    let test_type = ObjectType::new(
        ObjectConfig::new("TestType")
            .field(Field::new("a", Type::string()).resolve(|_| Ok("a".into())))
            .field(Field::new("b", Type::string()).resolve(|_| Ok("b".into()))),
    );

    Schema::new(SchemaConfig::new(test_type)).expect("schema assembles")
}

fn data(query: &str) -> Json {
    run_query(&schema(), query)["data"].clone()
}

#[test]
fn scalar_include_true() {
    assert_eq!(data("{ a, b @include(if: true) }"), json!({"a": "a", "b": "b"}));
}

#[test]
fn scalar_include_false() {
    assert_eq!(data("{ a, b @include(if: false) }"), json!({"a": "a"}));
}

#[test]
fn scalar_skip_false() {
    assert_eq!(data("{ a, b @skip(if: false) }"), json!({"a": "a", "b": "b"}));
}

#[test]
fn scalar_skip_true() {
    assert_eq!(data("{ a, b @skip(if: true) }"), json!({"a": "a"}));
}

#[test]
fn fragment_spread_include_true() {
    assert_eq!(
        data("{ a, ...Frag @include(if: true) } fragment Frag on TestType { b }"),
        json!({"a": "a", "b": "b"}),
    );
}

#[test]
fn fragment_spread_include_false() {
    assert_eq!(
        data("{ a, ...Frag @include(if: false) } fragment Frag on TestType { b }"),
        json!({"a": "a"}),
    );
}

#[test]
fn fragment_spread_skip_true() {
    assert_eq!(
        data("{ a, ...Frag @skip(if: true) } fragment Frag on TestType { b }"),
        json!({"a": "a"}),
    );
}

#[test]
fn inline_fragment_include_false() {
    assert_eq!(
        data("{ a, ... on TestType @include(if: false) { b } }"),
        json!({"a": "a"}),
    );
}

#[test]
fn anonymous_inline_fragment_skip_true() {
    assert_eq!(data("{ a, ... @skip(if: true) { b } }"), json!({"a": "a"}));
}

#[test]
fn anonymous_inline_fragment_skip_false() {
    assert_eq!(
        data("{ a, ... @skip(if: false) { b } }"),
        json!({"a": "a", "b": "b"}),
    );
}

#[test]
fn skip_takes_precedence_over_include() {
    assert_eq!(
        data("{ a, b @include(if: true) @skip(if: true) }"),
        json!({"a": "a"}),
    );
    assert_eq!(
        data("{ a, b @include(if: false) @skip(if: false) }"),
        json!({"a": "a", "b": "b"}),
    );
}

#[test]
fn directive_arguments_take_variables() {
    let params = Params {
        variable_values: [("skipB".to_owned(), Value::Boolean(true))]
            .into_iter()
            .collect(),
        ..Params::new("query Q($skipB: Boolean!) { a, b @skip(if: $skipB) }")
    };

    assert_eq!(run(&schema(), params), json!({"data": {"a": "a"}}));
}
