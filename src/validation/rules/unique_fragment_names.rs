use std::collections::hash_map::Entry;

use fnv::FnvHashMap;

use crate::{
    ast::Fragment,
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub struct UniqueFragmentNames<'a> {
    names: FnvHashMap<&'a str, SourcePosition>,
}

pub fn factory<'a>() -> UniqueFragmentNames<'a> {
    UniqueFragmentNames {
        names: FnvHashMap::default(),
    }
}

impl<'a> Visitor<'a> for UniqueFragmentNames<'a> {
    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment>,
    ) {
        let name = &f.item.name;
        match self.names.entry(&name.item) {
            Entry::Occupied(e) => {
                ctx.report_error(&error_message(&name.item), &[*e.get(), name.start()]);
            }
            Entry::Vacant(e) => {
                e.insert(name.start());
            }
        }
    }
}

fn error_message(frag_name: &str) -> String {
    format!("There can only be one fragment named \"{frag_name}\".")
}
