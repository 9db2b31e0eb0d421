use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

use crate::{
    ast::InputValue,
    executor::Variables,
    executor_tests::{run, run_query},
    parser::{parse_document_source, SourcePosition},
    schema::{Schema, SchemaConfig},
    types::{
        Argument, Field, InputObjectConfig, InputObjectType, ObjectConfig, ObjectType,
        ScalarConfig, ScalarType, Type,
    },
    validation::RuleError,
    value::Value,
    GraphQLError, Params,
};

fn complex_scalar() -> Arc<ScalarType> {
    ScalarType::new(
        ScalarConfig::new("ComplexScalar")
            .serialize(|_| Value::from("SerializedValue"))
            .parse_value(|v| match v.as_str() {
                Some("SerializedValue") => Value::from("DeserializedValue"),
                _ => Value::Null,
            })
            .parse_literal(|lit| match lit {
                InputValue::String(s) if s == "SerializedValue" => {
                    Value::from("DeserializedValue")
                }
                _ => Value::Null,
            }),
    )
}

/// A field echoing its `input` argument as JSON.
fn echo(name: &str, input_type: impl Into<Type>) -> Field {
    Field::new(name, Type::string())
        .argument(Argument::new("input", input_type))
        .resolve(|p| {
            Ok(p.arg("input")
                .map_or_else(|| "null".to_owned(), ToString::to_string)
                .into())
        })
}

fn schema() -> Schema {
    let test_input_object = InputObjectType::new(
        InputObjectConfig::new("TestInputObject")
            .field(Argument::new("a", Type::string()))
            .field(Argument::new("b", Type::list(Type::string())))
            .field(Argument::new("c", Type::non_null(Type::string())))
            .field(Argument::new("d", complex_scalar())),
    );

    let test_nested_input_object = InputObjectType::new(
        InputObjectConfig::new("TestNestedInputObject")
            .field(Argument::new("na", Type::non_null(test_input_object.clone())))
            .field(Argument::new("nb", Type::non_null(Type::string()))),
    );

    let test_type = ObjectType::new(
        ObjectConfig::new("TestType")
            .field(echo("fieldWithObjectInput", test_input_object))
            .field(echo("fieldWithNullableStringInput", Type::string()))
            .field(echo(
                "fieldWithNonNullableStringInput",
                Type::non_null(Type::string()),
            ))
            .field(
                Field::new("fieldWithDefaultArgumentValue", Type::string())
                    .argument(
                        Argument::new("input", Type::string()).default_value("Hello World"),
                    )
                    .resolve(|p| {
                        Ok(p.arg("input")
                            .map_or_else(|| "null".to_owned(), ToString::to_string)
                            .into())
                    }),
            )
            .field(echo("fieldWithNestedObjectInput", test_nested_input_object))
            .field(echo("list", Type::list(Type::string())))
            .field(echo("nnList", Type::non_null(Type::list(Type::string()))))
            .field(echo("listNn", Type::list(Type::non_null(Type::string()))))
            .field(echo(
                "nnListNn",
                Type::non_null(Type::list(Type::non_null(Type::string()))),
            )),
    );

    Schema::new(SchemaConfig::new(test_type)).expect("schema assembles")
}

fn vars(json: Json) -> Variables {
    match serde_json::from_value(json).expect("variables deserialize") {
        Value::Object(o) => o.into_iter().collect(),
        v => panic!("variables must be an object, got {v}"),
    }
}

fn run_variable_query(query: &str, variables: Json) -> Json {
    run(
        &schema(),
        Params {
            variable_values: vars(variables),
            ..Params::new(query)
        },
    )
}

/// The response of a request failing variable coercion with `message`,
/// reported at the variable definition starting at column `column`.
fn variable_error(message: &str, column: usize) -> Json {
    json!({
        "data": null,
        "errors": [{
            "message": message,
            "locations": [{"line": 1, "column": column}],
        }],
    })
}

#[test]
fn inline_complex_input() {
    assert_eq!(
        run_query(
            &schema(),
            r#"{ fieldWithObjectInput(input: {a: "foo", b: ["bar"], c: "baz"}) }"#,
        ),
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"#}}),
    );
}

#[test]
fn inline_parse_single_value_to_list() {
    assert_eq!(
        run_query(
            &schema(),
            r#"{ fieldWithObjectInput(input: {a: "foo", b: "bar", c: "baz"}) }"#,
        ),
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"#}}),
    );
}

#[test]
fn inline_runs_parse_literal_on_scalar() {
    assert_eq!(
        run_query(
            &schema(),
            r#"{ fieldWithObjectInput(input: {c: "baz", d: "SerializedValue"}) }"#,
        ),
        json!({"data": {"fieldWithObjectInput": r#"{"c":"baz","d":"DeserializedValue"}"#}}),
    );
}

#[test]
fn variable_complex_input() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            json!({"input": {"a": "foo", "b": ["bar"], "c": "baz"}}),
        ),
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"#}}),
    );
}

#[test]
fn variable_parse_single_value_to_list() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            json!({"input": {"a": "foo", "b": "bar", "c": "baz"}}),
        ),
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"#}}),
    );
}

#[test]
fn variable_runs_parse_value_on_scalar() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            json!({"input": {"c": "baz", "d": "SerializedValue"}}),
        ),
        json!({"data": {"fieldWithObjectInput": r#"{"c":"baz","d":"DeserializedValue"}"#}}),
    );
}

#[test]
fn variable_error_on_nested_non_null() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            json!({"input": {"a": "foo", "b": "bar", "c": null}}),
        ),
        variable_error(
            r#"Variable "$input" expected value of type "TestInputObject" but got: {"a":"foo","b":"bar","c":null}."#,
            9,
        ),
    );
}

#[test]
fn variable_error_on_incorrect_type() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            json!({"input": "foo bar"}),
        ),
        variable_error(
            r#"Variable "$input" expected value of type "TestInputObject" but got: "foo bar"."#,
            9,
        ),
    );
}

#[test]
fn variable_error_on_omit_non_null() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            json!({"input": {"a": "foo", "b": "bar"}}),
        ),
        variable_error(
            r#"Variable "$input" expected value of type "TestInputObject" but got: {"a":"foo","b":"bar"}."#,
            9,
        ),
    );
}

#[test]
fn variable_error_on_nested_omission() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestNestedInputObject) { fieldWithNestedObjectInput(input: $input) }",
            json!({"input": {"na": {"a": "foo"}}}),
        ),
        variable_error(
            r#"Variable "$input" expected value of type "TestNestedInputObject" but got: {"na":{"a":"foo"}}."#,
            9,
        ),
    );
}

#[test]
fn variable_error_on_additional_field() {
    assert_eq!(
        run_variable_query(
            "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }",
            json!({"input": {"a": "foo", "b": "bar", "c": "baz", "extra": "dog"}}),
        ),
        variable_error(
            r#"Variable "$input" expected value of type "TestInputObject" but got: {"a":"foo","b":"bar","c":"baz","extra":"dog"}."#,
            9,
        ),
    );
}

#[test]
fn reports_every_invalid_variable() {
    let result = run_variable_query(
        "query q($a: String!, $b: [String!]) { fieldWithNullableStringInput(input: $a) listNn(input: $b) }",
        json!({"b": ["A", null]}),
    );

    assert_eq!(
        result["errors"],
        json!([
            {
                "message": r#"Variable "$a" of required type "String!" was not provided."#,
                "locations": [{"line": 1, "column": 9}],
            },
            {
                "message": r#"Variable "$b" expected value of type "[String!]" but got: ["A",null]."#,
                "locations": [{"line": 1, "column": 22}],
            },
        ]),
    );
}

#[test]
fn allow_nullable_inputs_to_be_omitted() {
    assert_eq!(
        run_query(&schema(), "{ fieldWithNullableStringInput }"),
        json!({"data": {"fieldWithNullableStringInput": "null"}}),
    );
}

#[test]
fn allow_nullable_inputs_to_be_omitted_in_variable() {
    assert_eq!(
        run_query(
            &schema(),
            "query q($value: String) { fieldWithNullableStringInput(input: $value) }",
        ),
        json!({"data": {"fieldWithNullableStringInput": "null"}}),
    );
}

#[test]
fn allow_nullable_inputs_to_be_set_to_null_in_variable() {
    assert_eq!(
        run_variable_query(
            "query q($value: String) { fieldWithNullableStringInput(input: $value) }",
            json!({"value": null}),
        ),
        json!({"data": {"fieldWithNullableStringInput": "null"}}),
    );
}

#[test]
fn allow_nullable_inputs_to_be_set_to_value_in_variable() {
    assert_eq!(
        run_variable_query(
            "query q($value: String) { fieldWithNullableStringInput(input: $value) }",
            json!({"value": "a"}),
        ),
        json!({"data": {"fieldWithNullableStringInput": r#""a""#}}),
    );
}

#[test]
fn allow_nullable_inputs_to_be_set_to_value_directly() {
    assert_eq!(
        run_query(&schema(), r#"{ fieldWithNullableStringInput(input: "a") }"#),
        json!({"data": {"fieldWithNullableStringInput": r#""a""#}}),
    );
}

#[test]
fn does_not_allow_non_nullable_input_to_be_omitted_in_variable() {
    assert_eq!(
        run_query(
            &schema(),
            "query q($value: String!) { fieldWithNonNullableStringInput(input: $value) }",
        ),
        variable_error(
            r#"Variable "$value" of required type "String!" was not provided."#,
            9,
        ),
    );
}

#[test]
fn does_not_allow_non_nullable_input_to_be_set_to_null_in_variable() {
    assert_eq!(
        run_variable_query(
            "query q($value: String!) { fieldWithNonNullableStringInput(input: $value) }",
            json!({"value": null}),
        ),
        variable_error(
            r#"Variable "$value" of required type "String!" was not provided."#,
            9,
        ),
    );
}

#[test]
fn allow_non_nullable_inputs_to_be_set_to_value_in_variable() {
    assert_eq!(
        run_variable_query(
            "query q($value: String!) { fieldWithNonNullableStringInput(input: $value) }",
            json!({"value": "a"}),
        ),
        json!({"data": {"fieldWithNonNullableStringInput": r#""a""#}}),
    );
}

#[test]
fn allow_lists_to_be_null_or_contain_values() {
    let query = "query q($input: [String]) { list(input: $input) }";

    assert_eq!(
        run_variable_query(query, json!({"input": null})),
        json!({"data": {"list": "null"}}),
    );
    assert_eq!(
        run_variable_query(query, json!({"input": ["A"]})),
        json!({"data": {"list": r#"["A"]"#}}),
    );
    assert_eq!(
        run_variable_query(query, json!({"input": ["A", null, "B"]})),
        json!({"data": {"list": r#"["A",null,"B"]"#}}),
    );
}

#[test]
fn does_not_allow_non_null_lists_to_be_null() {
    assert_eq!(
        run_variable_query(
            "query q($input: [String]!) { nnList(input: $input) }",
            json!({"input": null}),
        ),
        variable_error(
            r#"Variable "$input" of required type "[String]!" was not provided."#,
            9,
        ),
    );
}

#[test]
fn allow_non_null_lists_to_contain_null() {
    assert_eq!(
        run_variable_query(
            "query q($input: [String]!) { nnList(input: $input) }",
            json!({"input": ["A", null, "B"]}),
        ),
        json!({"data": {"nnList": r#"["A",null,"B"]"#}}),
    );
}

#[test]
fn does_not_allow_lists_of_non_null_to_contain_null() {
    assert_eq!(
        run_variable_query(
            "query q($input: [String!]) { listNn(input: $input) }",
            json!({"input": ["A", null, "B"]}),
        ),
        variable_error(
            r#"Variable "$input" expected value of type "[String!]" but got: ["A",null,"B"]."#,
            9,
        ),
    );
}

#[test]
fn allow_non_null_lists_of_non_null_to_contain_values() {
    assert_eq!(
        run_variable_query(
            "query q($input: [String!]!) { nnListNn(input: $input) }",
            json!({"input": ["A"]}),
        ),
        json!({"data": {"nnListNn": r#"["A"]"#}}),
    );
}

#[test]
fn does_not_allow_invalid_types_to_be_used_as_values() {
    let document =
        parse_document_source("query q($input: TestType!) { fieldWithObjectInput(input: $input) }")
            .expect("query parses");

    assert_eq!(
        crate::execute(
            &schema(),
            &document,
            None,
            &Variables::default(),
            Value::Null,
            Arc::new(()),
        ),
        Err(GraphQLError::ValidationError(vec![RuleError::new(
            r#"Variable "$input" expected value of type "TestType!" which cannot be used as an input type."#,
            &[SourcePosition::new(8, 0, 8)],
        )])),
    );
}

#[test]
fn does_not_allow_unknown_types_to_be_used_as_values() {
    let document = parse_document_source(
        "query q($input: UnknownType!) { fieldWithObjectInput(input: $input) }",
    )
    .expect("query parses");

    assert_eq!(
        crate::execute(
            &schema(),
            &document,
            None,
            &Variables::default(),
            Value::Null,
            Arc::new(()),
        ),
        Err(GraphQLError::ValidationError(vec![RuleError::new(
            r#"Variable "$input" expected value of type "UnknownType!" which cannot be used as an input type."#,
            &[SourcePosition::new(8, 0, 8)],
        )])),
    );
}

#[test]
fn default_argument_when_not_provided() {
    assert_eq!(
        run_query(&schema(), "{ fieldWithDefaultArgumentValue }"),
        json!({"data": {"fieldWithDefaultArgumentValue": r#""Hello World""#}}),
    );
}

#[test]
fn default_argument_when_nullable_variable_not_provided() {
    assert_eq!(
        run_query(
            &schema(),
            "query q($input: String) { fieldWithDefaultArgumentValue(input: $input) }",
        ),
        json!({"data": {"fieldWithDefaultArgumentValue": r#""Hello World""#}}),
    );
}

#[test]
fn default_argument_when_nullable_variable_set_to_null() {
    assert_eq!(
        run_variable_query(
            "query q($input: String) { fieldWithDefaultArgumentValue(input: $input) }",
            json!({"input": null}),
        ),
        json!({"data": {"fieldWithDefaultArgumentValue": r#""Hello World""#}}),
    );
}

#[test]
fn variable_default_applies_when_omitted() {
    assert_eq!(
        run_query(
            &schema(),
            r#"query q($input: TestInputObject = {c: "fallback"}) { fieldWithObjectInput(input: $input) }"#,
        ),
        json!({"data": {"fieldWithObjectInput": r#"{"c":"fallback"}"#}}),
    );
}
