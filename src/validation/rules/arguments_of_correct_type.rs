use crate::{
    ast::InputValue,
    parser::Spanning,
    types::Type,
    validation::{is_valid_literal_value, ValidatorContext, Visitor},
};

pub struct ArgumentsOfCorrectType;

pub fn factory() -> ArgumentsOfCorrectType {
    ArgumentsOfCorrectType
}

impl<'a> Visitor<'a> for ArgumentsOfCorrectType {
    fn enter_argument(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (arg_name, arg_value): &'a (Spanning<String>, Spanning<InputValue>),
    ) {
        let Some(arg_type) = ctx.current_argument().map(|a| a.arg_type.clone()) else {
            return;
        };

        if !is_valid_literal_value(&arg_type, &arg_value.item) {
            ctx.report_error(
                &error_message(&arg_name.item, &arg_type, &arg_value.item),
                &[arg_value.start()],
            );
        }
    }
}

fn error_message(arg_name: &str, type_name: &Type, value: &InputValue) -> String {
    format!("Argument \"{arg_name}\" expected type \"{type_name}\" but got: {value}.")
}
