use crate::{
    ast::{
        Arguments, Definition, Directive, Document, Field, FragmentSpread, InlineFragment,
        InputValue, OperationType, Selection, VariableDefinitions,
    },
    parser::Spanning,
    types::{Argument, Type},
    validation::{ValidatorContext, Visitor},
};

#[doc(hidden)]
pub fn visit<'a, V: Visitor<'a>>(v: &mut V, ctx: &mut ValidatorContext<'a>, d: &'a Document) {
    v.enter_document(ctx, d);
    visit_definitions(v, ctx, d);
    v.exit_document(ctx, d);
}

fn visit_definitions<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    d: &'a Document,
) {
    for def in d {
        let def_type = match def {
            Definition::Fragment(f) => ctx
                .schema
                .type_by_name(&f.item.type_condition.item)
                .cloned(),
            Definition::Operation(op) => match op.item.operation_type {
                OperationType::Query => Some(Type::from(ctx.schema.query_type())),
                OperationType::Mutation => ctx.schema.mutation_type().map(Type::from),
                OperationType::Subscription => None,
            },
        };

        let is_operation = matches!(def, Definition::Operation(_));
        if is_operation {
            ctx.enter_operation();
        }

        ctx.with_pushed_type(def_type, |ctx| {
            enter_definition(v, ctx, def);
            visit_definition(v, ctx, def);
            exit_definition(v, ctx, def);
        });

        if is_operation {
            ctx.exit_operation();
        }
    }
}

fn enter_definition<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    def: &'a Definition,
) {
    match def {
        Definition::Operation(op) => v.enter_operation_definition(ctx, op),
        Definition::Fragment(f) => v.enter_fragment_definition(ctx, f),
    }
}

fn exit_definition<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    def: &'a Definition,
) {
    match def {
        Definition::Operation(op) => v.exit_operation_definition(ctx, op),
        Definition::Fragment(f) => v.exit_fragment_definition(ctx, f),
    }
}

fn visit_definition<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    def: &'a Definition,
) {
    match def {
        Definition::Operation(op) => {
            visit_variable_definitions(v, ctx, &op.item.variable_definitions);
            visit_directives(v, ctx, &op.item.directives);
            visit_selection_set(v, ctx, &op.item.selection_set);
        }
        Definition::Fragment(f) => {
            visit_directives(v, ctx, &f.item.directives);
            visit_selection_set(v, ctx, &f.item.selection_set);
        }
    }
}

fn visit_variable_definitions<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    defs: &'a VariableDefinitions,
) {
    for def in defs {
        let var_type = ctx.schema.type_from_ast(&def.1.var_type.item);

        ctx.with_pushed_input_type(var_type, |ctx| {
            v.enter_variable_definition(ctx, def);

            if let Some(default_value) = &def.1.default_value {
                visit_input_value(v, ctx, default_value);
            }

            v.exit_variable_definition(ctx, def);
        })
    }
}

fn visit_directives<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    directives: &'a [Spanning<Directive>],
) {
    for directive in directives {
        let directive_def = ctx
            .schema
            .directive_by_name(&directive.item.name.item)
            .cloned();

        ctx.with_pushed_directive(directive_def.clone(), |ctx| {
            v.enter_directive(ctx, directive);
            visit_arguments(
                v,
                ctx,
                directive_def.as_ref().map(|d| d.arguments.as_slice()),
                &directive.item.arguments,
            );
            v.exit_directive(ctx, directive);
        });
    }
}

fn visit_arguments<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    meta_args: Option<&[Argument]>,
    arguments: &'a Arguments,
) {
    for argument in arguments {
        let arg_def = meta_args
            .and_then(|args| args.iter().find(|a| argument.0.item == a.name.as_str()))
            .cloned();

        ctx.with_pushed_argument(arg_def, |ctx| {
            v.enter_argument(ctx, argument);

            visit_input_value(v, ctx, &argument.1);

            v.exit_argument(ctx, argument);
        })
    }
}

fn visit_selection_set<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    selection_set: &'a [Selection],
) {
    ctx.with_pushed_parent_type(|ctx| {
        v.enter_selection_set(ctx, selection_set);

        for selection in selection_set {
            visit_selection(v, ctx, selection);
        }

        v.exit_selection_set(ctx, selection_set);
    });
}

fn visit_selection<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    selection: &'a Selection,
) {
    match selection {
        Selection::Field(field) => visit_field(v, ctx, field),
        Selection::FragmentSpread(spread) => visit_fragment_spread(v, ctx, spread),
        Selection::InlineFragment(fragment) => visit_inline_fragment(v, ctx, fragment),
    }
}

fn visit_field<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    field: &'a Spanning<Field>,
) {
    let meta_field = ctx
        .parent_type()
        .and_then(|t| ctx.schema.field_def(t, &field.item.name.item));

    ctx.with_pushed_field(meta_field.clone(), |ctx| {
        v.enter_field(ctx, field);

        visit_arguments(
            v,
            ctx,
            meta_field.as_ref().map(|f| f.arguments.as_slice()),
            &field.item.arguments,
        );
        visit_directives(v, ctx, &field.item.directives);

        if let Some(selection_set) = &field.item.selection_set {
            visit_selection_set(v, ctx, selection_set);
        }

        v.exit_field(ctx, field);
    });
}

fn visit_fragment_spread<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    spread: &'a Spanning<FragmentSpread>,
) {
    v.enter_fragment_spread(ctx, spread);

    visit_directives(v, ctx, &spread.item.directives);

    if v.follows_fragment_spreads() {
        if let Some(fragment) = ctx.begin_fragment_expansion(&spread.item.name.item) {
            let fragment_type = ctx
                .schema
                .type_by_name(&fragment.item.type_condition.item)
                .cloned();

            ctx.with_pushed_type(fragment_type, |ctx| {
                visit_directives(v, ctx, &fragment.item.directives);
                visit_selection_set(v, ctx, &fragment.item.selection_set);
            });

            ctx.end_fragment_expansion();
        }
    }

    v.exit_fragment_spread(ctx, spread);
}

fn visit_inline_fragment<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    fragment: &'a Spanning<InlineFragment>,
) {
    let fragment_type = match &fragment.item.type_condition {
        Some(Spanning {
            item: type_name, ..
        }) => ctx.schema.type_by_name(type_name).cloned(),
        None => ctx.current_type().map(|t| t.named_type().clone()),
    };

    ctx.with_pushed_type(fragment_type, |ctx| {
        v.enter_inline_fragment(ctx, fragment);

        visit_directives(v, ctx, &fragment.item.directives);
        visit_selection_set(v, ctx, &fragment.item.selection_set);

        v.exit_inline_fragment(ctx, fragment);
    });
}

fn visit_input_value<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    input_value: &'a Spanning<InputValue>,
) {
    enter_input_value(v, ctx, input_value);

    match &input_value.item {
        InputValue::Object(fields) => {
            for field in fields {
                let inner_type = ctx
                    .current_input_type()
                    .and_then(|t| t.named_type().input_field_by_name(&field.0.item))
                    .map(|f| f.arg_type);

                ctx.with_pushed_input_type(inner_type, |ctx| {
                    v.enter_object_field(ctx, field);
                    visit_input_value(v, ctx, &field.1);
                    v.exit_object_field(ctx, field);
                })
            }
        }
        InputValue::List(ls) => {
            let inner_type = ctx.current_input_type().map(|t| match t.nullable_type() {
                Type::List(inner) => (**inner).clone(),
                t => t.clone(),
            });

            ctx.with_pushed_input_type(inner_type, |ctx| {
                for value in ls {
                    visit_input_value(v, ctx, value);
                }
            })
        }
        _ => (),
    }

    exit_input_value(v, ctx, input_value);
}

fn enter_input_value<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    input_value: &'a Spanning<InputValue>,
) {
    use InputValue::*;

    let span = input_value.span;

    match &input_value.item {
        Null => v.enter_null_value(ctx, Spanning::new(span, ())),
        Int(i) => v.enter_int_value(ctx, Spanning::new(span, *i)),
        Float(f) => v.enter_float_value(ctx, Spanning::new(span, *f)),
        String(s) => v.enter_string_value(ctx, Spanning::new(span, s)),
        Boolean(b) => v.enter_boolean_value(ctx, Spanning::new(span, *b)),
        Enum(s) => v.enter_enum_value(ctx, Spanning::new(span, s)),
        Variable(s) => v.enter_variable_value(ctx, Spanning::new(span, s)),
        List(l) => v.enter_list_value(ctx, Spanning::new(span, l)),
        Object(o) => v.enter_object_value(ctx, Spanning::new(span, o)),
    }
}

fn exit_input_value<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    input_value: &'a Spanning<InputValue>,
) {
    use InputValue::*;

    let span = input_value.span;

    match &input_value.item {
        Null => v.exit_null_value(ctx, Spanning::new(span, ())),
        Int(i) => v.exit_int_value(ctx, Spanning::new(span, *i)),
        Float(f) => v.exit_float_value(ctx, Spanning::new(span, *f)),
        String(s) => v.exit_string_value(ctx, Spanning::new(span, s)),
        Boolean(b) => v.exit_boolean_value(ctx, Spanning::new(span, *b)),
        Enum(s) => v.exit_enum_value(ctx, Spanning::new(span, s)),
        Variable(s) => v.exit_variable_value(ctx, Spanning::new(span, s)),
        List(l) => v.exit_list_value(ctx, Spanning::new(span, l)),
        Object(o) => v.exit_object_value(ctx, Spanning::new(span, o)),
    }
}
