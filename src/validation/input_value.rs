use crate::{ast::InputValue, types::Type};

/// Can the query literal `value` be used where `t` is expected?
///
/// Variables are accepted here; their usage is checked separately. A single
/// value in a list position counts as a one-element list.
pub fn is_valid_literal_value(t: &Type, value: &InputValue) -> bool {
    if let Type::NonNull(inner) = t {
        return !value.is_null() && is_valid_literal_value(inner, value);
    }

    if value.is_null() || value.is_variable() {
        return true;
    }

    match t {
        Type::List(inner) => match value {
            InputValue::List(items) => items
                .iter()
                .all(|item| is_valid_literal_value(inner, &item.item)),
            v => is_valid_literal_value(inner, v),
        },
        Type::InputObject(input) => {
            let InputValue::Object(provided) = value else {
                return false;
            };
            let fields = input.fields();

            let all_known = provided
                .iter()
                .all(|(name, _)| fields.iter().any(|f| f.name == name.item.as_str()));
            all_known
                && fields.iter().all(|f| {
                    let field_value = provided
                        .iter()
                        .find(|(name, _)| name.item == f.name.as_str())
                        .map_or(&InputValue::Null, |(_, v)| &v.item);
                    is_valid_literal_value(&f.arg_type, field_value)
                })
        }
        Type::Scalar(s) => !s.parse_literal(value).is_null(),
        Type::Enum(e) => !e.parse_literal(value).is_null(),
        Type::NonNull(_) | Type::Object(_) | Type::Interface(_) | Type::Union(_) => false,
    }
}
