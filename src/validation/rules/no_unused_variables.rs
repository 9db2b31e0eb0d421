use fnv::FnvHashSet;

use crate::{
    ast::{Operation, VariableDefinition},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub struct NoUnusedVariables<'a> {
    in_operation: bool,
    defined_variables: Vec<&'a Spanning<String>>,
    used_variables: FnvHashSet<&'a str>,
}

pub fn factory<'a>() -> NoUnusedVariables<'a> {
    NoUnusedVariables {
        in_operation: false,
        defined_variables: Vec::new(),
        used_variables: FnvHashSet::default(),
    }
}

impl<'a> Visitor<'a> for NoUnusedVariables<'a> {
    fn follows_fragment_spreads(&self) -> bool {
        true
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation>,
    ) {
        self.in_operation = true;
        self.defined_variables.clear();
        self.used_variables.clear();
    }

    fn exit_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        self.in_operation = false;

        let op_name = op.item.name.as_ref().map(|s| s.item.as_str());
        for var_name in &self.defined_variables {
            if !self.used_variables.contains(var_name.item.as_str()) {
                ctx.report_error(
                    &error_message(&var_name.item, op_name),
                    &[var_name.start()],
                );
            }
        }
    }

    fn enter_variable_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        (var_name, _): &'a (Spanning<String>, VariableDefinition),
    ) {
        self.defined_variables.push(var_name);
    }

    fn enter_variable_value(
        &mut self,
        _: &mut ValidatorContext<'a>,
        var_name: Spanning<&'a String>,
    ) {
        if self.in_operation {
            self.used_variables.insert(var_name.item);
        }
    }
}

fn error_message(var_name: &str, op_name: Option<&str>) -> String {
    match op_name {
        Some(op_name) => format!("Variable \"${var_name}\" is never used in operation \"{op_name}\"."),
        None => format!("Variable \"${var_name}\" is never used."),
    }
}
