use std::collections::hash_map::Entry;

use fnv::FnvHashMap;

use crate::{
    ast::Operation,
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub struct UniqueOperationNames<'a> {
    names: FnvHashMap<&'a str, SourcePosition>,
}

pub fn factory<'a>() -> UniqueOperationNames<'a> {
    UniqueOperationNames {
        names: FnvHashMap::default(),
    }
}

impl<'a> Visitor<'a> for UniqueOperationNames<'a> {
    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        if let Some(op_name) = &op.item.name {
            match self.names.entry(&op_name.item) {
                Entry::Occupied(e) => {
                    ctx.report_error(
                        &error_message(&op_name.item),
                        &[*e.get(), op_name.start()],
                    );
                }
                Entry::Vacant(e) => {
                    e.insert(op_name.start());
                }
            }
        }
    }
}

fn error_message(op_name: &str) -> String {
    format!("There can only be one operation named \"{op_name}\".")
}
