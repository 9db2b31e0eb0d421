use crate::{
    ast::FragmentSpread,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub struct KnownFragmentNames;

pub fn factory() -> KnownFragmentNames {
    KnownFragmentNames
}

impl<'a> Visitor<'a> for KnownFragmentNames {
    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread>,
    ) {
        let spread_name = &spread.item.name.item;
        if !ctx.is_known_fragment(spread_name) {
            ctx.report_error(&error_message(spread_name), &[spread.start()]);
        }
    }
}

fn error_message(frag_name: &str) -> String {
    format!("Unknown fragment \"{frag_name}\".")
}
