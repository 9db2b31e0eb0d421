//! Introspection types and meta-fields
//!
//! The introspection types are built once per process with the regular type
//! API and shared by every schema. Their resolvers read the schema of the
//! running execution through [`ResolveInfo::schema`].
//!
//! [`ResolveInfo::schema`]: crate::executor::ResolveInfo::schema

use std::sync::{Arc, OnceLock};

use crate::{
    ast::InputValue,
    executor::{FieldError, FieldResult, ResolveParams},
    parser::Spanning,
    schema::model::{DirectiveLocation, DirectiveType},
    types::{
        Argument, EnumConfig, EnumType, EnumValue, Field, FieldMap, ObjectConfig, ObjectType,
        Type, TypeKind,
    },
    value::{HostValue, Value},
};

#[derive(Debug)]
struct SchemaMeta;

#[derive(Debug)]
struct TypeMeta(Type);

#[derive(Debug)]
struct FieldMeta(Field);

#[derive(Debug)]
struct InputValueMeta(Argument);

#[derive(Debug)]
struct EnumValueMeta(EnumValue);

#[derive(Debug)]
struct DirectiveMeta(Arc<DirectiveType>);

impl HostValue for SchemaMeta {}
impl HostValue for TypeMeta {}
impl HostValue for FieldMeta {}
impl HostValue for InputValueMeta {}
impl HostValue for EnumValueMeta {}
impl HostValue for DirectiveMeta {}

fn source<T: HostValue>(p: &ResolveParams) -> FieldResult<&T> {
    p.source.downcast_ref::<T>().ok_or_else(|| {
        FieldError::from(format!(
            "Introspection field \"{}\" resolved on an unexpected value",
            p.info.field_name(),
        ))
    })
}

fn type_value(t: &Type) -> Value {
    Value::host(TypeMeta(t.clone()))
}

fn include_deprecated(p: &ResolveParams) -> bool {
    p.arg("includeDeprecated")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn string_or_null(s: Option<&str>) -> Value {
    s.map_or(Value::Null, Value::from)
}

/// Every introspection type, in the order they are added to a schema.
pub(crate) fn types() -> Vec<Type> {
    vec![
        Type::Object(schema_type()),
        Type::Object(type_type()),
        Type::Object(field_type()),
        Type::Object(input_value_type()),
        Type::Object(enum_value_type()),
        Type::Object(directive_type()),
        Type::Enum(type_kind_type()),
        Type::Enum(directive_location_type()),
    ]
}

/// `__schema: __Schema!`
pub(crate) fn schema_meta_field() -> Field {
    static FIELD: OnceLock<Field> = OnceLock::new();
    FIELD
        .get_or_init(|| {
            Field::new("__schema", Type::non_null(schema_type()))
                .description("Access the current type schema of this server.")
                .resolve(|_| Ok(Value::host(SchemaMeta)))
        })
        .clone()
}

/// `__type(name: String!): __Type`
pub(crate) fn type_meta_field() -> Field {
    static FIELD: OnceLock<Field> = OnceLock::new();
    FIELD
        .get_or_init(|| {
            Field::new("__type", type_type())
                .description("Request the type information of a single type.")
                .argument(Argument::new("name", Type::non_null(Type::string())))
                .resolve(|p| {
                    Ok(p.arg("name")
                        .and_then(Value::as_str)
                        .and_then(|name| p.info.schema().type_by_name(name))
                        .map_or(Value::Null, type_value))
                })
        })
        .clone()
}

/// `__typename: String!`
pub(crate) fn typename_meta_field() -> Field {
    static FIELD: OnceLock<Field> = OnceLock::new();
    FIELD
        .get_or_init(|| {
            Field::new("__typename", Type::non_null(Type::string()))
                .description("The name of the current Object type at runtime.")
                .resolve(|p| Ok(Value::from(p.info.parent_type().name())))
        })
        .clone()
}

fn schema_type() -> Arc<ObjectType> {
    static TYPE: OnceLock<Arc<ObjectType>> = OnceLock::new();
    TYPE.get_or_init(|| {
        ObjectType::new(
            ObjectConfig::new("__Schema")
                .description(
                    "A GraphQL Schema defines the capabilities of a GraphQL server. It exposes \
                     all available types and directives on the server, as well as the entry \
                     points for query and mutation operations.",
                )
                .fields_thunk(|| {
                    FieldMap::new()
                        .with(
                            Field::new("types", Type::non_null(Type::list(Type::non_null(type_type()))))
                                .description("A list of all types supported by this server.")
                                .resolve(|p| {
                                    source::<SchemaMeta>(&p)?;
                                    Ok(Value::list(
                                        p.info.schema().type_list().map(type_value).collect(),
                                    ))
                                }),
                        )
                        .with(
                            Field::new("queryType", Type::non_null(type_type()))
                                .description("The type that query operations will be rooted at.")
                                .resolve(|p| {
                                    source::<SchemaMeta>(&p)?;
                                    Ok(type_value(&Type::from(p.info.schema().query_type())))
                                }),
                        )
                        .with(
                            Field::new("mutationType", type_type())
                                .description(
                                    "If this server supports mutation, the type that mutation \
                                     operations will be rooted at.",
                                )
                                .resolve(|p| {
                                    source::<SchemaMeta>(&p)?;
                                    Ok(p.info
                                        .schema()
                                        .mutation_type()
                                        .map_or(Value::Null, |m| type_value(&Type::from(m))))
                                }),
                        )
                        .with(
                            Field::new("subscriptionType", type_type())
                                .description(
                                    "If this server supports subscription, the type that \
                                     subscription operations will be rooted at.",
                                )
                                .resolve(|_| Ok(Value::Null)),
                        )
                        .with(
                            Field::new(
                                "directives",
                                Type::non_null(Type::list(Type::non_null(directive_type()))),
                            )
                            .description("A list of all directives supported by this server.")
                            .resolve(|p| {
                                source::<SchemaMeta>(&p)?;
                                Ok(Value::list(
                                    p.info
                                        .schema()
                                        .directive_list()
                                        .map(|d| Value::host(DirectiveMeta(d.clone())))
                                        .collect(),
                                ))
                            }),
                        )
                }),
        )
    })
    .clone()
}

fn type_type() -> Arc<ObjectType> {
    static TYPE: OnceLock<Arc<ObjectType>> = OnceLock::new();
    TYPE.get_or_init(|| {
        ObjectType::new(
            ObjectConfig::new("__Type")
                .description(
                    "The fundamental unit of any GraphQL Schema is the type. There are many \
                     kinds of types in GraphQL as represented by the `__TypeKind` enum.",
                )
                .fields_thunk(|| {
                    let include_deprecated_arg = || {
                        Argument::new("includeDeprecated", Type::boolean()).default_value(false)
                    };
                    FieldMap::new()
                        .with(Field::new("kind", Type::non_null(type_kind_type())).resolve(|p| {
                            let TypeMeta(t) = source(&p)?;
                            Ok(Value::from(t.kind().as_str()))
                        }))
                        .with(Field::new("name", Type::string()).resolve(|p| {
                            let TypeMeta(t) = source(&p)?;
                            Ok(string_or_null(t.name()))
                        }))
                        .with(Field::new("description", Type::string()).resolve(|p| {
                            let TypeMeta(t) = source(&p)?;
                            Ok(string_or_null(t.description()))
                        }))
                        .with(
                            Field::new("fields", Type::list(Type::non_null(field_type())))
                                .argument(include_deprecated_arg())
                                .resolve(|p| {
                                    let TypeMeta(t) = source(&p)?;
                                    let include = include_deprecated(&p);
                                    Ok(t.fields().map_or(Value::Null, |fields| {
                                        Value::list(
                                            fields
                                                .iter()
                                                .filter(|f| !f.is_builtin())
                                                .filter(|f| {
                                                    include
                                                        || !f.deprecation_status.is_deprecated()
                                                })
                                                .map(|f| Value::host(FieldMeta(f.clone())))
                                                .collect(),
                                        )
                                    }))
                                }),
                        )
                        .with(
                            Field::new("interfaces", Type::list(Type::non_null(type_type())))
                                .resolve(|p| {
                                    let TypeMeta(t) = source(&p)?;
                                    Ok(match t {
                                        Type::Object(o) => Value::list(
                                            o.interfaces()
                                                .iter()
                                                .map(|i| type_value(&Type::from(i)))
                                                .collect(),
                                        ),
                                        _ => Value::Null,
                                    })
                                }),
                        )
                        .with(
                            Field::new("possibleTypes", Type::list(Type::non_null(type_type())))
                                .resolve(|p| {
                                    let TypeMeta(t) = source(&p)?;
                                    if !t.is_abstract() {
                                        return Ok(Value::Null);
                                    }
                                    Ok(Value::list(
                                        p.info
                                            .schema()
                                            .possible_types(t)
                                            .iter()
                                            .map(|o| type_value(&Type::from(o)))
                                            .collect(),
                                    ))
                                }),
                        )
                        .with(
                            Field::new("enumValues", Type::list(Type::non_null(enum_value_type())))
                                .argument(include_deprecated_arg())
                                .resolve(|p| {
                                    let TypeMeta(t) = source(&p)?;
                                    let include = include_deprecated(&p);
                                    Ok(match t {
                                        Type::Enum(e) => Value::list(
                                            e.values()
                                                .iter()
                                                .filter(|v| {
                                                    include
                                                        || !v.deprecation_status.is_deprecated()
                                                })
                                                .map(|v| Value::host(EnumValueMeta(v.clone())))
                                                .collect(),
                                        ),
                                        _ => Value::Null,
                                    })
                                }),
                        )
                        .with(
                            Field::new("inputFields", Type::list(Type::non_null(input_value_type())))
                                .resolve(|p| {
                                    let TypeMeta(t) = source(&p)?;
                                    Ok(match t {
                                        Type::InputObject(i) => Value::list(
                                            i.fields()
                                                .iter()
                                                .map(|f| Value::host(InputValueMeta(f.clone())))
                                                .collect(),
                                        ),
                                        _ => Value::Null,
                                    })
                                }),
                        )
                        .with(Field::new("ofType", type_type()).resolve(|p| {
                            let TypeMeta(t) = source(&p)?;
                            Ok(t.of_type().map_or(Value::Null, type_value))
                        }))
                }),
        )
    })
    .clone()
}

fn field_type() -> Arc<ObjectType> {
    static TYPE: OnceLock<Arc<ObjectType>> = OnceLock::new();
    TYPE.get_or_init(|| {
        ObjectType::new(
            ObjectConfig::new("__Field")
                .description(
                    "Object and Interface types are described by a list of Fields, each of \
                     which has a name, potentially a list of arguments, and a return type.",
                )
                .fields_thunk(|| {
                    FieldMap::new()
                        .with(Field::new("name", Type::non_null(Type::string())).resolve(|p| {
                            let FieldMeta(f) = source(&p)?;
                            Ok(Value::from(f.name.as_str()))
                        }))
                        .with(Field::new("description", Type::string()).resolve(|p| {
                            let FieldMeta(f) = source(&p)?;
                            Ok(string_or_null(f.description.as_deref()))
                        }))
                        .with(
                            Field::new(
                                "args",
                                Type::non_null(Type::list(Type::non_null(input_value_type()))),
                            )
                            .resolve(|p| {
                                let FieldMeta(f) = source(&p)?;
                                Ok(Value::list(
                                    f.arguments
                                        .iter()
                                        .map(|a| Value::host(InputValueMeta(a.clone())))
                                        .collect(),
                                ))
                            }),
                        )
                        .with(Field::new("type", Type::non_null(type_type())).resolve(|p| {
                            let FieldMeta(f) = source(&p)?;
                            Ok(type_value(&f.field_type))
                        }))
                        .with(
                            Field::new("isDeprecated", Type::non_null(Type::boolean())).resolve(
                                |p| {
                                    let FieldMeta(f) = source(&p)?;
                                    Ok(Value::from(f.deprecation_status.is_deprecated()))
                                },
                            ),
                        )
                        .with(Field::new("deprecationReason", Type::string()).resolve(|p| {
                            let FieldMeta(f) = source(&p)?;
                            Ok(string_or_null(f.deprecation_status.reason()))
                        }))
                }),
        )
    })
    .clone()
}

fn input_value_type() -> Arc<ObjectType> {
    static TYPE: OnceLock<Arc<ObjectType>> = OnceLock::new();
    TYPE.get_or_init(|| {
        ObjectType::new(
            ObjectConfig::new("__InputValue")
                .description(
                    "Arguments provided to Fields or Directives and the input fields of an \
                     InputObject are represented as Input Values which describe their type and \
                     optionally a default value.",
                )
                .fields_thunk(|| {
                    FieldMap::new()
                        .with(Field::new("name", Type::non_null(Type::string())).resolve(|p| {
                            let InputValueMeta(a) = source(&p)?;
                            Ok(Value::from(a.name.as_str()))
                        }))
                        .with(Field::new("description", Type::string()).resolve(|p| {
                            let InputValueMeta(a) = source(&p)?;
                            Ok(string_or_null(a.description.as_deref()))
                        }))
                        .with(Field::new("type", Type::non_null(type_type())).resolve(|p| {
                            let InputValueMeta(a) = source(&p)?;
                            Ok(type_value(&a.arg_type))
                        }))
                        .with(Field::new("defaultValue", Type::string()).resolve(|p| {
                            let InputValueMeta(a) = source(&p)?;
                            Ok(a.default_value
                                .as_ref()
                                .and_then(|v| ast_from_value(v, &a.arg_type))
                                .map_or(Value::Null, |literal| Value::from(literal.to_string())))
                        }))
                }),
        )
    })
    .clone()
}

fn enum_value_type() -> Arc<ObjectType> {
    static TYPE: OnceLock<Arc<ObjectType>> = OnceLock::new();
    TYPE.get_or_init(|| {
        ObjectType::new(
            ObjectConfig::new("__EnumValue")
                .description(
                    "One possible value for a given Enum. Enum values are unique values, not a \
                     placeholder for a string or numeric value.",
                )
                .fields_thunk(|| {
                    FieldMap::new()
                        .with(Field::new("name", Type::non_null(Type::string())).resolve(|p| {
                            let EnumValueMeta(v) = source(&p)?;
                            Ok(Value::from(v.name.as_str()))
                        }))
                        .with(Field::new("description", Type::string()).resolve(|p| {
                            let EnumValueMeta(v) = source(&p)?;
                            Ok(string_or_null(v.description.as_deref()))
                        }))
                        .with(
                            Field::new("isDeprecated", Type::non_null(Type::boolean())).resolve(
                                |p| {
                                    let EnumValueMeta(v) = source(&p)?;
                                    Ok(Value::from(v.deprecation_status.is_deprecated()))
                                },
                            ),
                        )
                        .with(Field::new("deprecationReason", Type::string()).resolve(|p| {
                            let EnumValueMeta(v) = source(&p)?;
                            Ok(string_or_null(v.deprecation_status.reason()))
                        }))
                }),
        )
    })
    .clone()
}

fn directive_type() -> Arc<ObjectType> {
    static TYPE: OnceLock<Arc<ObjectType>> = OnceLock::new();
    TYPE.get_or_init(|| {
        ObjectType::new(
            ObjectConfig::new("__Directive")
                .description(
                    "A Directive provides a way to describe alternate runtime execution and \
                     type validation behavior in a GraphQL document.",
                )
                .fields_thunk(|| {
                    FieldMap::new()
                        .with(Field::new("name", Type::non_null(Type::string())).resolve(|p| {
                            let DirectiveMeta(d) = source(&p)?;
                            Ok(Value::from(d.name.as_str()))
                        }))
                        .with(Field::new("description", Type::string()).resolve(|p| {
                            let DirectiveMeta(d) = source(&p)?;
                            Ok(string_or_null(d.description.as_deref()))
                        }))
                        .with(
                            Field::new(
                                "locations",
                                Type::non_null(Type::list(Type::non_null(
                                    directive_location_type(),
                                ))),
                            )
                            .resolve(|p| {
                                let DirectiveMeta(d) = source(&p)?;
                                Ok(Value::list(
                                    d.locations
                                        .iter()
                                        .map(|l| Value::from(l.to_string()))
                                        .collect(),
                                ))
                            }),
                        )
                        .with(
                            Field::new(
                                "args",
                                Type::non_null(Type::list(Type::non_null(input_value_type()))),
                            )
                            .resolve(|p| {
                                let DirectiveMeta(d) = source(&p)?;
                                Ok(Value::list(
                                    d.arguments
                                        .iter()
                                        .map(|a| Value::host(InputValueMeta(a.clone())))
                                        .collect(),
                                ))
                            }),
                        )
                }),
        )
    })
    .clone()
}

fn type_kind_type() -> Arc<EnumType> {
    static TYPE: OnceLock<Arc<EnumType>> = OnceLock::new();
    TYPE.get_or_init(|| {
        let config = [
            (TypeKind::Scalar, "Indicates this type is a scalar."),
            (TypeKind::Object, "Indicates this type is an object. `fields` and `interfaces` are valid fields."),
            (TypeKind::Interface, "Indicates this type is an interface. `fields` and `possibleTypes` are valid fields."),
            (TypeKind::Union, "Indicates this type is a union. `possibleTypes` is a valid field."),
            (TypeKind::Enum, "Indicates this type is an enum. `enumValues` is a valid field."),
            (TypeKind::InputObject, "Indicates this type is an input object. `inputFields` is a valid field."),
            (TypeKind::List, "Indicates this type is a list. `ofType` is a valid field."),
            (TypeKind::NonNull, "Indicates this type is a non-null. `ofType` is a valid field."),
        ]
        .into_iter()
        .fold(
            EnumConfig::new("__TypeKind")
                .description("An enum describing what kind of type a given `__Type` is."),
            |config, (kind, description)| {
                config.value(EnumValue::new(kind.as_str()).description(description))
            },
        );
        EnumType::new(config)
    })
    .clone()
}

fn directive_location_type() -> Arc<EnumType> {
    static TYPE: OnceLock<Arc<EnumType>> = OnceLock::new();
    TYPE.get_or_init(|| {
        let config = DirectiveLocation::ALL.into_iter().fold(
            EnumConfig::new("__DirectiveLocation").description(
                "A Directive can be adjacent to many parts of the GraphQL language, a \
                 __DirectiveLocation describes one such possible adjacencies.",
            ),
            |config, location| config.value(EnumValue::new(location.to_string())),
        );
        EnumType::new(config)
    })
    .clone()
}

/// Prints an internal value as the query literal producing it, following
/// the input type.
pub(crate) fn ast_from_value(value: &Value, t: &Type) -> Option<InputValue> {
    match t {
        Type::NonNull(inner) => ast_from_value(value, inner),
        _ if value.is_null() => Some(InputValue::Null),
        Type::List(inner) => match value {
            Value::List(items) => Some(InputValue::List(
                items
                    .iter()
                    .map(|v| ast_from_value(v, inner).map(Spanning::unlocated))
                    .collect::<Option<_>>()?,
            )),
            v => ast_from_value(v, inner),
        },
        Type::InputObject(input) => {
            let object = value.as_object()?;
            Some(InputValue::Object(
                input
                    .fields()
                    .iter()
                    .filter_map(|f| {
                        let v = object.get_field_value(&f.name)?;
                        let literal = ast_from_value(v, &f.arg_type)?;
                        Some((
                            Spanning::unlocated(f.name.to_string()),
                            Spanning::unlocated(literal),
                        ))
                    })
                    .collect(),
            ))
        }
        Type::Enum(e) => match e.serialize(value) {
            Value::String(name) => Some(InputValue::Enum(name)),
            _ => None,
        },
        Type::Scalar(s) => match s.serialize(value) {
            Value::Int(i) => Some(InputValue::Int(i)),
            Value::Float(f) => Some(InputValue::Float(f)),
            Value::String(s) => Some(InputValue::String(s)),
            Value::Boolean(b) => Some(InputValue::Boolean(b)),
            _ => None,
        },
        Type::Object(_) | Type::Interface(_) | Type::Union(_) => None,
    }
}
