mod field_execution {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::{
        executor::Variables,
        executor_tests::run,
        schema::{Schema, SchemaConfig},
        types::{Argument, Field, ObjectConfig, ObjectType, Type},
        value::{Object, Value},
        Params,
    };

    fn constant(name: &str, value: &'static str) -> Field {
        Field::new(name, Type::string()).resolve(move |_| Ok(value.into()))
    }

    fn schema() -> Schema {
        let data_type = ObjectType::new(
            ObjectConfig::new("DataType")
                .field(constant("a", "Apple"))
                .field(constant("b", "Banana"))
                .field(constant("c", "Cookie"))
                .field(constant("d", "Donut"))
                .field(constant("e", "Egg"))
                .field(constant("f", "Fish"))
                .field(
                    Field::new("pic", Type::string())
                        .argument(Argument::new("size", Type::int()))
                        .resolve(|p| {
                            let size = p.arg("size").and_then(Value::as_int).unwrap_or(50);
                            Ok(format!("Pic of size: {size}").into())
                        }),
                ),
        );

        let deep_data_type = ObjectType::new(
            ObjectConfig::new("DeepDataType")
                .field(constant("a", "Already Been Done"))
                .field(constant("b", "Boring"))
                .field(Field::new("c", Type::list(Type::string())).resolve(|_| {
                    Ok(vec![Some("Contrived"), None, Some("Confusing")].into())
                }))
                .field(Field::new("deeper", Type::list(data_type.clone())).resolve(|_| {
                    Ok(Value::list(vec![
                        Value::object(Object::default()),
                        Value::Null,
                        Value::object(Object::default()),
                    ]))
                })),
        );

        data_type.add_field_config(
            "deep",
            Field::new("deep", deep_data_type).resolve(|_| Ok(Value::object(Object::default()))),
        );

        Schema::new(SchemaConfig::new(data_type)).expect("schema assembles")
    }

    #[test]
    fn test() {
        let doc = r"
          query Example($size: Int) {
            a,
            b,
            x: c
            ...c
            f
            ...on DataType {
              pic(size: $size)
            }
            deep {
              a
              b
              c
              deeper {
                a
                b
              }
            }
          }

          fragment c on DataType {
            d
            e
          }";

        let mut vars = Variables::default();
        vars.insert("size".into(), Value::Int(100));

        let result = run(
            &schema(),
            Params {
                variable_values: vars,
                ..Params::new(doc)
            },
        );

        assert_eq!(
            result,
            json!({
                "data": {
                    "a": "Apple",
                    "b": "Banana",
                    "x": "Cookie",
                    "d": "Donut",
                    "e": "Egg",
                    "f": "Fish",
                    "pic": "Pic of size: 100",
                    "deep": {
                        "a": "Already Been Done",
                        "b": "Boring",
                        "c": ["Contrived", null, "Confusing"],
                        "deeper": [
                            {"a": "Apple", "b": "Banana"},
                            null,
                            {"a": "Apple", "b": "Banana"},
                        ],
                    },
                },
            }),
        );
    }

    #[test]
    fn keeps_selection_order() {
        let response = crate::graphql(&schema(), Params::new("{ f e d c b a }"));

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"data":{"f":"Fish","e":"Egg","d":"Donut","c":"Cookie","b":"Banana","a":"Apple"}}"#,
        );
    }

    #[test]
    fn default_argument_values_apply() {
        assert_eq!(
            run(&schema(), Params::new("{ pic }")),
            json!({"data": {"pic": "Pic of size: 50"}}),
        );
        assert_eq!(
            run(&schema(), Params::new("{ pic(size: 3) }")),
            json!({"data": {"pic": "Pic of size: 3"}}),
        );
    }

    #[test]
    fn unknown_operation_is_reported() {
        let schema = schema();
        let params = Params {
            operation_name: Some("Missing".into()),
            ..Params::new("query A { a } query B { b }")
        };

        assert_eq!(
            run(&schema, params),
            json!({
                "data": null,
                "errors": [{"message": "Unknown operation named \"Missing\"."}],
            }),
        );
        assert_eq!(
            run(&schema, Params::new("query A { a } query B { b }")),
            json!({
                "data": null,
                "errors": [{
                    "message": "Must provide operation name if query contains multiple operations.",
                }],
            }),
        );
    }

    #[test]
    fn selects_the_named_operation() {
        let params = Params {
            operation_name: Some("B".into()),
            ..Params::new("query A { a } query B { b }")
        };

        assert_eq!(run(&schema(), params), json!({"data": {"b": "Banana"}}));
    }

    #[test]
    fn handles_are_shared_across_schemas() {
        let first = schema();
        let second = Schema::new(SchemaConfig::new(Arc::clone(first.query_type())))
            .expect("schema assembles");

        assert_eq!(
            run(&second, Params::new("{ deep { b } }")),
            json!({"data": {"deep": {"b": "Boring"}}}),
        );
    }
}

mod root_values {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::{
        executor_tests::run,
        schema::{Schema, SchemaConfig},
        types::{Argument, Field, ObjectConfig, ObjectType, Type},
        value::{Object, Value},
        Params,
    };

    struct Greeting(&'static str);

    fn schema() -> Schema {
        let query = ObjectType::new(
            ObjectConfig::new("Query")
                .field(Field::new("fromRoot", Type::string()))
                .field(Field::new("greeting", Type::string()).resolve(|p| {
                    let greeting = p
                        .context
                        .downcast_ref::<Greeting>()
                        .ok_or("no greeting in context")?;
                    Ok(greeting.0.into())
                }))
                .field(
                    Field::new("plus", Type::int())
                        .argument(Argument::new("n", Type::int()))
                        .resolve(|p| {
                            let n = p.arg("n").and_then(Value::as_int).ok_or("missing n")?;
                            Ok(Value::Int(n + 1))
                        }),
                ),
        );

        Schema::new(SchemaConfig::new(query)).expect("schema assembles")
    }

    #[test]
    fn default_resolver_reads_the_root_value() {
        let root: Object = [("fromRoot", Value::from("rooted"))].into_iter().collect();
        let params = Params {
            root_value: Value::Object(root),
            ..Params::new("{ fromRoot }")
        };

        assert_eq!(run(&schema(), params), json!({"data": {"fromRoot": "rooted"}}));
    }

    #[test]
    fn missing_properties_resolve_to_null() {
        assert_eq!(
            run(&schema(), Params::new("{ fromRoot }")),
            json!({"data": {"fromRoot": null}}),
        );
    }

    #[test]
    fn resolvers_see_the_context() {
        let params = Params {
            context: Arc::new(Greeting("hi")),
            ..Params::new("{ greeting }")
        };

        assert_eq!(run(&schema(), params), json!({"data": {"greeting": "hi"}}));
    }

    #[test]
    fn variable_defaults_reach_arguments() {
        let schema = schema();

        assert_eq!(
            run(&schema, Params::new("query Q($x: Int = 7) { plus(n: $x) }")),
            json!({"data": {"plus": 8}}),
        );

        let params = Params {
            variable_values: [("x".to_owned(), Value::Int(1))].into_iter().collect(),
            ..Params::new("query Q($x: Int = 7) { plus(n: $x) }")
        };
        assert_eq!(run(&schema, params), json!({"data": {"plus": 2}}));
    }
}

mod errors {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::{
        executor::Variables,
        executor_tests::run_query,
        parser::parse_document_source,
        schema::{Schema, SchemaConfig},
        types::{Field, ObjectConfig, ObjectType, Type},
        value::{Object, Value},
        GraphQLError, Params,
    };

    fn schema() -> Schema {
        let nest = ObjectType::new(
            ObjectConfig::new("Nest")
                .field(Field::new("nonNull", Type::non_null(Type::string())))
                .field(Field::new("nullable", Type::string()).resolve(|_| Ok("here".into()))),
        );

        let item = ObjectType::new(ObjectConfig::new("Item").field(
            Field::new("value", Type::int()).resolve(|p| {
                match p.source.property("n").and_then(|n| n.as_int()) {
                    Some(7) => Err("seven".into()),
                    n => Ok(n.into()),
                }
            }),
        ));

        let strict = ObjectType::new(
            ObjectConfig::new("Strict")
                .field(Field::new("sync", Type::string()).resolve(|_| Ok("sync".into())))
                .is_type_of(|v, _| v.as_object().is_some()),
        );

        let query = ObjectType::new(
            ObjectConfig::new("Query")
                .field(Field::new("sync", Type::string()).resolve(|_| Ok("sync".into())))
                .field(
                    Field::new("syncError", Type::string())
                        .resolve(|_| Err("Error getting syncError".into())),
                )
                .field(
                    Field::new("nest", nest.clone())
                        .resolve(|_| Ok(Value::object(Object::default()))),
                )
                .field(
                    Field::new("nonNullRoot", Type::non_null(Type::string()))
                        .resolve(|_| Ok(Value::Null)),
                )
                .field(Field::new("panics", Type::string()).resolve(|_| panic!("boom")))
                .field(Field::new("items", Type::list(item)).resolve(|_| {
                    Ok(Value::list(
                        (0..10)
                            .map(|n| {
                                Value::Object([("n", Value::Int(n))].into_iter().collect())
                            })
                            .collect(),
                    ))
                }))
                .field(
                    Field::new("notList", Type::list(Type::string()))
                        .resolve(|_| Ok("single".into())),
                )
                .field(Field::new("wrongObject", strict).resolve(|_| Ok("nope".into()))),
        );

        Schema::new(SchemaConfig::new(query)).expect("schema assembles")
    }

    #[test]
    fn keeps_sibling_values_of_failed_fields() {
        assert_eq!(
            run_query(&schema(), "{ sync syncError }"),
            json!({
                "data": {"sync": "sync", "syncError": null},
                "errors": [{
                    "message": "Error getting syncError",
                    "locations": [{"line": 1, "column": 8}],
                    "path": ["syncError"],
                }],
            }),
        );
    }

    #[test]
    fn null_in_non_null_field_nulls_the_parent() {
        assert_eq!(
            run_query(&schema(), "{ nest { nonNull } }"),
            json!({
                "data": {"nest": null},
                "errors": [{
                    "message": "Cannot return null for non-nullable field Nest.nonNull.",
                    "locations": [{"line": 1, "column": 10}],
                    "path": ["nest", "nonNull"],
                }],
            }),
        );
    }

    #[test]
    fn null_in_non_null_root_field_nulls_data() {
        assert_eq!(
            run_query(&schema(), "{ nonNullRoot sync }"),
            json!({
                "data": null,
                "errors": [{
                    "message": "Cannot return null for non-nullable field Query.nonNullRoot.",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["nonNullRoot"],
                }],
            }),
        );
    }

    #[test]
    fn recovers_from_resolver_panics() {
        assert_eq!(
            run_query(&schema(), "{ panics sync }"),
            json!({
                "data": {"panics": null, "sync": "sync"},
                "errors": [{
                    "message": "boom",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["panics"],
                }],
            }),
        );
    }

    #[test]
    fn long_lists_keep_item_order() {
        assert_eq!(
            run_query(&schema(), "{ items { value } }"),
            json!({
                "data": {
                    "items": [
                        {"value": 0},
                        {"value": 1},
                        {"value": 2},
                        {"value": 3},
                        {"value": 4},
                        {"value": 5},
                        {"value": 6},
                        {"value": null},
                        {"value": 8},
                        {"value": 9},
                    ],
                },
                "errors": [{
                    "message": "seven",
                    "locations": [{"line": 1, "column": 11}],
                    "path": ["items", 7, "value"],
                }],
            }),
        );
    }

    #[test]
    fn non_iterable_list_value_fails() {
        assert_eq!(
            run_query(&schema(), "{ notList }"),
            json!({
                "data": {"notList": null},
                "errors": [{
                    "message": "User Error: expected iterable, but did not find one for field \
                                Query.notList.",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["notList"],
                }],
            }),
        );
    }

    #[test]
    fn is_type_of_rejects_foreign_values() {
        assert_eq!(
            run_query(&schema(), "{ wrongObject { sync } }"),
            json!({
                "data": {"wrongObject": null},
                "errors": [{
                    "message": "Expected value of type \"Strict\" but got: \"nope\".",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["wrongObject"],
                }],
            }),
        );
    }

    #[test]
    fn invalid_documents_are_not_executed() {
        let result = run_query(&schema(), "{ ...A } fragment A on Query { sync ...A }");

        assert_eq!(result["data"], json!(null));
        let messages = result["errors"]
            .as_array()
            .expect("errors are a list")
            .iter()
            .map(|e| e["message"].as_str().unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        assert!(
            messages.contains(&"Cannot spread fragment \"A\" within itself.".to_owned()),
            "{messages:?}",
        );
    }

    #[test]
    fn conflicting_response_keys_are_rejected() {
        assert_eq!(
            run_query(&schema(), "{ a: sync a: syncError }"),
            json!({
                "data": null,
                "errors": [{
                    "message": "Fields \"a\" conflict because sync and syncError are different \
                                fields.",
                    "locations": [
                        {"line": 1, "column": 3},
                        {"line": 1, "column": 11},
                    ],
                }],
            }),
        );
    }

    #[test]
    fn parse_errors_are_reported() {
        let result = run_query(&schema(), "{ sync");

        assert_eq!(result["data"], json!(null));
        assert_eq!(result["errors"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn missing_roots_are_request_errors() {
        let schema = schema();
        let execute = |query: &str| {
            let document = parse_document_source(query).expect("query parses");
            crate::execute(
                &schema,
                &document,
                None,
                &Variables::default(),
                Value::Null,
                Arc::new(()),
            )
        };

        assert_eq!(
            execute("mutation { sync }"),
            Err(GraphQLError::NotConfiguredForMutations),
        );
        assert_eq!(
            execute("subscription { sync }"),
            Err(GraphQLError::IsSubscription),
        );
    }

    #[test]
    fn empty_documents_have_no_operation() {
        let schema = schema();
        let document = parse_document_source("fragment A on Query { sync }").expect("parses");

        assert_eq!(
            crate::execute(
                &schema,
                &document,
                None,
                &Variables::default(),
                Value::Null,
                Arc::new(()),
            ),
            Err(GraphQLError::NoOperationProvided),
        );
        assert!(!crate::graphql(&schema, Params::new("fragment A on Query { sync }")).is_ok());
    }

    #[test]
    fn results_can_be_inspected_directly() {
        let (data, errors) = crate::graphql(&schema(), Params::new("{ sync }"))
            .into_result()
            .expect("request succeeds");

        assert!(errors.is_empty());
        assert_eq!(
            data,
            Value::Object([("sync", Value::from("sync"))].into_iter().collect()),
        );
    }
}

mod mutations {
    use std::{sync::Arc, thread, time::Duration};

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::{
        executor_tests::run,
        schema::{Schema, SchemaConfig},
        types::{Argument, Field, ObjectConfig, ObjectType, Type},
        value::Value,
        Params,
    };

    type Log = Mutex<Vec<i64>>;

    fn schema() -> Schema {
        let query = ObjectType::new(
            ObjectConfig::new("Query")
                .field(Field::new("log", Type::list(Type::int())).resolve(|p| {
                    let log = p.context.downcast_ref::<Log>().ok_or("no log in context")?;
                    Ok(log.lock().clone().into())
                })),
        );

        let mutation = ObjectType::new(
            ObjectConfig::new("Mutation").field(
                Field::new("push", Type::int())
                    .argument(Argument::new("n", Type::non_null(Type::int())))
                    .resolve(|p| {
                        let n = p.arg("n").and_then(Value::as_int).ok_or("missing n")?;
                        if n == 1 {
                            thread::sleep(Duration::from_millis(20));
                        }
                        let log = p.context.downcast_ref::<Log>().ok_or("no log in context")?;
                        let mut log = log.lock();
                        log.push(n);
                        Ok(Value::Int(i64::try_from(log.len()).unwrap_or(i64::MAX)))
                    }),
            ),
        );

        Schema::new(SchemaConfig::new(query).mutation(mutation)).expect("schema assembles")
    }

    #[test]
    fn run_serially_in_document_order() {
        let log = Arc::new(Log::default());
        let params = Params {
            context: log.clone(),
            ..Params::new("mutation { first: push(n: 1) second: push(n: 2) third: push(n: 3) }")
        };

        assert_eq!(
            run(&schema(), params),
            json!({"data": {"first": 1, "second": 2, "third": 3}}),
        );
        assert_eq!(*log.lock(), vec![1, 2, 3]);
    }
}
