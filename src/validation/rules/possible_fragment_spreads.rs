use crate::{
    ast::{FragmentSpread, InlineFragment},
    parser::Spanning,
    types::Type,
    validation::{ValidatorContext, Visitor},
};

pub struct PossibleFragmentSpreads;

pub fn factory() -> PossibleFragmentSpreads {
    PossibleFragmentSpreads
}

impl<'a> Visitor<'a> for PossibleFragmentSpreads {
    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        frag: &'a Spanning<InlineFragment>,
    ) {
        let (Some(parent_type), Some(frag_type)) = (ctx.parent_type(), ctx.current_type()) else {
            return;
        };
        if let Some((parent_name, frag_name)) = non_overlapping_names(ctx, parent_type, frag_type)
        {
            ctx.report_error(
                &error_message(None, &parent_name, &frag_name),
                &[frag.start()],
            );
        }
    }

    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread>,
    ) {
        let Some(parent_type) = ctx.parent_type() else {
            return;
        };
        let Some(frag_type) = ctx
            .fragment(&spread.item.name.item)
            .and_then(|f| ctx.schema.type_by_name(&f.item.type_condition.item))
        else {
            return;
        };
        if let Some((parent_name, frag_name)) = non_overlapping_names(ctx, parent_type, frag_type)
        {
            ctx.report_error(
                &error_message(Some(spread.item.name.item.as_str()), &parent_name, &frag_name),
                &[spread.start()],
            );
        }
    }
}

/// Names of both types, if they are composite and no object can be of both.
fn non_overlapping_names(
    ctx: &ValidatorContext<'_>,
    parent_type: &Type,
    frag_type: &Type,
) -> Option<(String, String)> {
    if !parent_type.is_composite() || !frag_type.is_composite() {
        return None;
    }
    if ctx.schema.type_overlap(parent_type, frag_type) {
        return None;
    }
    Some((parent_type.name()?.into(), frag_type.name()?.into()))
}

fn error_message(frag_name: Option<&str>, parent_type_name: &str, frag_type_name: &str) -> String {
    match frag_name {
        Some(frag_name) => format!(
            "Fragment \"{frag_name}\" cannot be spread here as objects of type \
             \"{parent_type_name}\" can never be of type \"{frag_type_name}\".",
        ),
        None => format!(
            "Fragment cannot be spread here as objects of type \"{parent_type_name}\" \
             can never be of type \"{frag_type_name}\".",
        ),
    }
}
