use crate::{
    ast::Field,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub struct FieldsOnCorrectType;

pub fn factory() -> FieldsOnCorrectType {
    FieldsOnCorrectType
}

impl<'a> Visitor<'a> for FieldsOnCorrectType {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field>) {
        let Some(parent_type) = ctx.parent_type() else {
            return;
        };
        if ctx.current_field().is_none() {
            let message = error_message(&field.item.name.item, &parent_type.to_string());
            ctx.report_error(&message, &[field.start()]);
        }
    }
}

fn error_message(field: &str, type_name: &str) -> String {
    format!("Cannot query field \"{field}\" on \"{type_name}\".")
}
