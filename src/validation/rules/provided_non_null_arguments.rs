use crate::{
    ast::{Arguments, Directive, Field},
    parser::{SourcePosition, Spanning},
    types::Argument,
    validation::{ValidatorContext, Visitor},
};

pub struct ProvidedNonNullArguments;

pub fn factory() -> ProvidedNonNullArguments {
    ProvidedNonNullArguments
}

impl<'a> Visitor<'a> for ProvidedNonNullArguments {
    fn exit_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field>) {
        let Some(field_def) = ctx.current_field() else {
            return;
        };
        let messages = missing_arguments(&field_def.arguments, &field.item.arguments)
            .map(|arg| field_error_message(&field.item.name.item, &arg.name, &arg.arg_type))
            .collect::<Vec<_>>();

        report_all(ctx, messages, field.start());
    }

    fn exit_directive(&mut self, ctx: &mut ValidatorContext<'a>, directive: &'a Spanning<Directive>) {
        let Some(directive_def) = ctx.current_directive() else {
            return;
        };
        let messages = missing_arguments(&directive_def.arguments, &directive.item.arguments)
            .map(|arg| {
                directive_error_message(&directive.item.name.item, &arg.name, &arg.arg_type)
            })
            .collect::<Vec<_>>();

        report_all(ctx, messages, directive.start());
    }
}

/// Non-null arguments without a default that the query does not pass.
fn missing_arguments<'d>(
    defs: &'d [Argument],
    provided: &'d Arguments,
) -> impl Iterator<Item = &'d Argument> {
    defs.iter().filter(move |def| {
        def.arg_type.is_non_null()
            && def.default_value.is_none()
            && !provided.iter().any(|(name, _)| name.item == def.name.as_str())
    })
}

fn report_all(ctx: &mut ValidatorContext<'_>, messages: Vec<String>, location: SourcePosition) {
    for message in messages {
        ctx.report_error(&message, &[location]);
    }
}

fn field_error_message(
    field_name: &str,
    arg_name: &str,
    type_name: &dyn std::fmt::Display,
) -> String {
    format!(
        "Field \"{field_name}\" argument \"{arg_name}\" of type \"{type_name}\" is required but \
         not provided.",
    )
}

fn directive_error_message(
    directive_name: &str,
    arg_name: &str,
    type_name: &dyn std::fmt::Display,
) -> String {
    format!(
        "Directive \"@{directive_name}\" argument \"{arg_name}\" of type \"{type_name}\" is \
         required but not provided.",
    )
}
