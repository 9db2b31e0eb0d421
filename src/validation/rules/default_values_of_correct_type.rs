use crate::{
    ast::{InputValue, Type, VariableDefinition},
    parser::Spanning,
    validation::{is_valid_literal_value, ValidatorContext, Visitor},
};

pub struct DefaultValuesOfCorrectType;

pub fn factory() -> DefaultValuesOfCorrectType {
    DefaultValuesOfCorrectType
}

impl<'a> Visitor<'a> for DefaultValuesOfCorrectType {
    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (var_name, var_def): &'a (Spanning<String>, VariableDefinition),
    ) {
        let Some(default_value) = &var_def.default_value else {
            return;
        };
        let var_type = &var_def.var_type.item;

        if let Type::NonNull(inner) = var_type {
            ctx.report_error(
                &non_null_error_message(&var_name.item, var_type, inner),
                &[default_value.start()],
            );
        } else if let Some(input_type) = ctx.current_input_type().cloned() {
            if !is_valid_literal_value(&input_type, &default_value.item) {
                ctx.report_error(
                    &type_error_message(&var_name.item, var_type, &default_value.item),
                    &[default_value.start()],
                );
            }
        }
    }
}

fn type_error_message(var_name: &str, type_name: &Type, value: &InputValue) -> String {
    format!("Variable \"${var_name}\" of type \"{type_name}\" has invalid default value: {value}.")
}

fn non_null_error_message(var_name: &str, type_name: &Type, guess_type: &Type) -> String {
    format!(
        "Variable \"${var_name}\" of type \"{type_name}\" is required and will not use the \
         default value. Perhaps you meant to use type \"{guess_type}\".",
    )
}
