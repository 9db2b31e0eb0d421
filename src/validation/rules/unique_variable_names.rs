use std::collections::hash_map::Entry;

use fnv::FnvHashMap;

use crate::{
    ast::{Operation, VariableDefinition},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub struct UniqueVariableNames<'a> {
    names: FnvHashMap<&'a str, SourcePosition>,
}

pub fn factory<'a>() -> UniqueVariableNames<'a> {
    UniqueVariableNames {
        names: FnvHashMap::default(),
    }
}

impl<'a> Visitor<'a> for UniqueVariableNames<'a> {
    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation>,
    ) {
        self.names.clear();
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (var_name, _): &'a (Spanning<String>, VariableDefinition),
    ) {
        match self.names.entry(&var_name.item) {
            Entry::Occupied(e) => {
                ctx.report_error(
                    &error_message(&var_name.item),
                    &[*e.get(), var_name.start()],
                );
            }
            Entry::Vacant(e) => {
                e.insert(var_name.start());
            }
        }
    }
}

fn error_message(var_name: &str) -> String {
    format!("There can only be one variable named \"{var_name}\".")
}
