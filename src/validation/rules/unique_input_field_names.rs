use std::collections::hash_map::Entry;

use fnv::FnvHashMap;

use crate::{
    ast::InputValue,
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub struct UniqueInputFieldNames<'a> {
    known_name_stack: Vec<FnvHashMap<&'a str, SourcePosition>>,
}

pub fn factory<'a>() -> UniqueInputFieldNames<'a> {
    UniqueInputFieldNames {
        known_name_stack: Vec::new(),
    }
}

impl<'a> Visitor<'a> for UniqueInputFieldNames<'a> {
    fn enter_object_value(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>,
    ) {
        self.known_name_stack.push(FnvHashMap::default());
    }

    fn exit_object_value(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>,
    ) {
        self.known_name_stack.pop();
    }

    fn enter_object_field(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (field_name, _): &'a (Spanning<String>, Spanning<InputValue>),
    ) {
        let Some(known_names) = self.known_name_stack.last_mut() else {
            return;
        };
        match known_names.entry(&field_name.item) {
            Entry::Occupied(e) => {
                ctx.report_error(
                    &error_message(&field_name.item),
                    &[*e.get(), field_name.start()],
                );
            }
            Entry::Vacant(e) => {
                e.insert(field_name.start());
            }
        }
    }
}

fn error_message(field_name: &str) -> String {
    format!("There can only be one input field named \"{field_name}\".")
}
