use crate::{
    ast::{Directive, InputValue},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

#[derive(Debug)]
enum ArgumentPosition {
    Directive(String),
    Field(String, String),
}

pub struct KnownArgumentNames {
    current_args: Option<ArgumentPosition>,
    in_directive: bool,
}

pub fn factory() -> KnownArgumentNames {
    KnownArgumentNames {
        current_args: None,
        in_directive: false,
    }
}

impl<'a> Visitor<'a> for KnownArgumentNames {
    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Spanning<Directive>) {
        self.in_directive = true;
        self.current_args = ctx
            .current_directive()
            .map(|d| ArgumentPosition::Directive(d.name.to_string()));
    }

    fn exit_directive(&mut self, _: &mut ValidatorContext<'a>, _: &'a Spanning<Directive>) {
        self.in_directive = false;
    }

    fn enter_argument(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (arg_name, _): &'a (Spanning<String>, Spanning<InputValue>),
    ) {
        if !self.in_directive {
            self.current_args = ctx
                .current_field()
                .zip(ctx.parent_type())
                .map(|(f, t)| ArgumentPosition::Field(f.name.to_string(), t.to_string()));
        }

        if ctx.current_argument().is_some() {
            return;
        }

        let message = match &self.current_args {
            Some(ArgumentPosition::Field(field_name, type_name)) => {
                field_error_message(&arg_name.item, field_name, type_name)
            }
            Some(ArgumentPosition::Directive(directive_name)) => {
                directive_error_message(&arg_name.item, directive_name)
            }
            None => return,
        };
        ctx.report_error(&message, &[arg_name.start()]);
    }
}

fn field_error_message(arg_name: &str, field_name: &str, type_name: &str) -> String {
    format!("Unknown argument \"{arg_name}\" on field \"{field_name}\" of type \"{type_name}\".")
}

fn directive_error_message(arg_name: &str, directive_name: &str) -> String {
    format!("Unknown argument \"{arg_name}\" on directive \"@{directive_name}\".")
}
