use fnv::FnvHashSet;

use crate::{
    ast::{Operation, VariableDefinition},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub struct NoUndefinedVariables<'a> {
    current_operation: Option<(Option<&'a str>, SourcePosition)>,
    defined_variables: FnvHashSet<&'a str>,
}

pub fn factory<'a>() -> NoUndefinedVariables<'a> {
    NoUndefinedVariables {
        current_operation: None,
        defined_variables: FnvHashSet::default(),
    }
}

impl<'a> Visitor<'a> for NoUndefinedVariables<'a> {
    fn follows_fragment_spreads(&self) -> bool {
        true
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        let op_name = op.item.name.as_ref().map(|s| s.item.as_str());
        self.current_operation = Some((op_name, op.start()));
        self.defined_variables.clear();
    }

    fn exit_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation>,
    ) {
        self.current_operation = None;
    }

    fn enter_variable_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        (var_name, _): &'a (Spanning<String>, VariableDefinition),
    ) {
        self.defined_variables.insert(&var_name.item);
    }

    fn enter_variable_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        var_name: Spanning<&'a String>,
    ) {
        let Some((op_name, op_start)) = self.current_operation else {
            return;
        };
        if !self.defined_variables.contains(var_name.item.as_str()) {
            ctx.report_error(
                &error_message(var_name.item, op_name),
                &[var_name.start(), op_start],
            );
        }
    }
}

fn error_message(var_name: &str, op_name: Option<&str>) -> String {
    match op_name {
        Some(op_name) => {
            format!("Variable \"${var_name}\" is not defined by operation \"{op_name}\".")
        }
        None => format!("Variable \"${var_name}\" is not defined."),
    }
}
