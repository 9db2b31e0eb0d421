//! Input coercion: variables, arguments and literals.

use crate::{
    ast::{Arguments, InputValue, VariableDefinitions},
    executor::Variables,
    schema::Schema,
    types::{Argument, Type},
    validation::RuleError,
    value::{Object, Value},
};

/// Coerces the provided variable inputs against the operation's variable
/// definitions.
///
/// Absent inputs fall back to the definition's default. Every invalid input
/// is reported, located at its definition.
pub(crate) fn variable_values(
    schema: &Schema,
    definitions: &VariableDefinitions,
    inputs: &Variables,
) -> Result<Variables, Vec<RuleError>> {
    let mut values = Variables::default();
    let mut errors = vec![];

    for (name, def) in definitions {
        let var_name = &name.item;
        let literal_type = &def.var_type.item;

        let Some(var_type) = schema.type_from_ast(literal_type).filter(Type::is_input) else {
            errors.push(RuleError::new(
                &format!(
                    "Variable \"${var_name}\" expected value of type \"{literal_type}\" which \
                     cannot be used as an input type.",
                ),
                &[name.span.start],
            ));
            continue;
        };

        let input = inputs.get(var_name).unwrap_or(&Value::Null);
        if is_valid_input_value(input, &var_type) {
            let value = match &def.default_value {
                Some(default) if input.is_null() => {
                    value_from_ast(&default.item, &var_type, &Variables::default())
                }
                _ => coerce_value(&var_type, input),
            };
            if !value.is_null() {
                values.insert(var_name.clone(), value);
            }
        } else if input.is_null() {
            errors.push(RuleError::new(
                &format!(
                    "Variable \"${var_name}\" of required type \"{literal_type}\" was not \
                     provided.",
                ),
                &[name.span.start],
            ));
        } else {
            let json = serde_json::to_string(input).unwrap_or_default();
            errors.push(RuleError::new(
                &format!(
                    "Variable \"${var_name}\" expected value of type \"{literal_type}\" but \
                     got: {json}.",
                ),
                &[name.span.start],
            ));
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

/// Builds the argument map of a field or directive from its literals.
///
/// Null and absent arguments take the declared default; arguments still null
/// after that are left out.
pub(super) fn argument_values(
    definitions: &[Argument],
    arguments: &Arguments,
    variables: &Variables,
) -> Object {
    definitions
        .iter()
        .filter_map(|def| {
            let value = arguments
                .iter()
                .find(|(name, _)| name.item == def.name.as_str())
                .map_or(Value::Null, |(_, literal)| {
                    value_from_ast(&literal.item, &def.arg_type, variables)
                });
            let value = if value.is_null() {
                def.default_value.clone()?
            } else {
                value
            };
            (!value.is_null()).then(|| (def.name.to_string(), value))
        })
        .collect()
}

/// Produces the internal value of a query literal of the given input type.
///
/// Variables are substituted from `variables`. A literal that does not fit
/// the type yields `Value::Null`.
pub fn value_from_ast(literal: &InputValue, t: &Type, variables: &Variables) -> Value {
    if let InputValue::Variable(name) = literal {
        return variables.get(name).cloned().unwrap_or(Value::Null);
    }

    match t {
        Type::NonNull(inner) => value_from_ast(literal, inner, variables),
        Type::List(inner) => match literal {
            InputValue::List(items) => Value::list(
                items
                    .iter()
                    .map(|item| value_from_ast(&item.item, inner, variables))
                    .collect(),
            ),
            _ => Value::list(vec![value_from_ast(literal, inner, variables)]),
        },
        Type::InputObject(input) => {
            let InputValue::Object(fields) = literal else {
                return Value::Null;
            };
            Value::object(
                input
                    .fields()
                    .iter()
                    .filter_map(|def| {
                        let value = fields
                            .iter()
                            .find(|(name, _)| name.item == def.name.as_str())
                            .map_or(Value::Null, |(_, v)| {
                                value_from_ast(&v.item, &def.arg_type, variables)
                            });
                        let value = if value.is_null() {
                            def.default_value.clone()?
                        } else {
                            value
                        };
                        (!value.is_null()).then(|| (def.name.to_string(), value))
                    })
                    .collect(),
            )
        }
        Type::Scalar(s) => s.parse_literal(literal),
        Type::Enum(e) => e.parse_literal(literal),
        Type::Object(_) | Type::Interface(_) | Type::Union(_) => Value::Null,
    }
}

/// Coerces a runtime input value, e.g. a variable, to the given input type.
///
/// Single values given for a list type are wrapped into a one-element list.
pub fn coerce_value(t: &Type, value: &Value) -> Value {
    if let Type::NonNull(inner) = t {
        return coerce_value(inner, value);
    }
    if value.is_null() {
        return Value::Null;
    }

    match t {
        Type::List(inner) => match value {
            Value::List(items) => Value::list(items.iter().map(|v| coerce_value(inner, v)).collect()),
            v => Value::list(vec![coerce_value(inner, v)]),
        },
        Type::InputObject(input) => {
            let provided = value.as_object();
            Value::object(
                input
                    .fields()
                    .iter()
                    .filter_map(|def| {
                        let field = provided
                            .and_then(|o| o.get_field_value(&def.name))
                            .map_or(Value::Null, |v| coerce_value(&def.arg_type, v));
                        let field = if field.is_null() {
                            def.default_value.clone()?
                        } else {
                            field
                        };
                        (!field.is_null()).then(|| (def.name.to_string(), field))
                    })
                    .collect(),
            )
        }
        Type::Scalar(s) => s.parse_value(value),
        Type::Enum(e) => e.parse_value(value),
        Type::NonNull(_) | Type::Object(_) | Type::Interface(_) | Type::Union(_) => Value::Null,
    }
}

/// Can `value` be coerced to the given input type?
///
/// Input objects reject unknown fields; non-null positions reject null.
pub fn is_valid_input_value(value: &Value, t: &Type) -> bool {
    if let Type::NonNull(inner) = t {
        return !value.is_null() && is_valid_input_value(value, inner);
    }
    if value.is_null() {
        return true;
    }

    match t {
        Type::List(inner) => match value {
            Value::List(items) => items.iter().all(|v| is_valid_input_value(v, inner)),
            v => is_valid_input_value(v, inner),
        },
        Type::InputObject(input) => {
            let Some(provided) = value.as_object() else {
                return false;
            };
            let fields = input.fields();
            provided
                .iter()
                .all(|(name, _)| fields.iter().any(|f| f.name == name.as_str()))
                && fields.iter().all(|f| {
                    is_valid_input_value(
                        provided.get_field_value(&f.name).unwrap_or(&Value::Null),
                        &f.arg_type,
                    )
                })
        }
        Type::Scalar(s) => !s.parse_value(value).is_null(),
        Type::Enum(e) => !e.parse_value(value).is_null(),
        Type::NonNull(_) | Type::Object(_) | Type::Interface(_) | Type::Union(_) => false,
    }
}
