use crate::{
    ast::VariableDefinition,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub struct VariablesAreInputTypes;

pub fn factory() -> VariablesAreInputTypes {
    VariablesAreInputTypes
}

impl<'a> Visitor<'a> for VariablesAreInputTypes {
    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (var_name, var_def): &'a (Spanning<String>, VariableDefinition),
    ) {
        let is_input = ctx
            .schema
            .type_from_ast(&var_def.var_type.item)
            .map(|t| t.is_input());

        if is_input == Some(false) {
            ctx.report_error(
                &error_message(&var_name.item, &var_def.var_type.item.to_string()),
                &[var_def.var_type.start()],
            );
        }
    }
}

fn error_message(var_name: &str, type_name: &str) -> String {
    format!("Variable \"${var_name}\" cannot be non-input type \"{type_name}\".")
}
