use crate::{
    ast::Field,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub struct ScalarLeafs;

pub fn factory() -> ScalarLeafs {
    ScalarLeafs
}

impl<'a> Visitor<'a> for ScalarLeafs {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field>) {
        let Some(field_type) = ctx.current_field().map(|f| &f.field_type) else {
            return;
        };

        let field_name = &field.item.name.item;
        let message = match (field_type.named_type().is_leaf(), &field.item.selection_set) {
            (true, Some(_)) => Some(no_allowed_error_message(field_name, &field_type.to_string())),
            (false, None) => Some(required_error_message(field_name, &field_type.to_string())),
            _ => None,
        };

        if let Some(message) = message {
            ctx.report_error(&message, &[field.start()]);
        }
    }
}

fn no_allowed_error_message(field_name: &str, type_name: &str) -> String {
    format!("Field \"{field_name}\" of type \"{type_name}\" must not have a sub selection.")
}

fn required_error_message(field_name: &str, type_name: &str) -> String {
    format!("Field \"{field_name}\" of type \"{type_name}\" must have a sub selection.")
}
