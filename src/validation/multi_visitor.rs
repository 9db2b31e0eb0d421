use crate::{
    ast::{
        Directive, Document, Field, Fragment, FragmentSpread, InlineFragment, InputValue,
        Operation, Selection, VariableDefinition,
    },
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Runs several visitors in lockstep over a single walk of the document.
///
/// While the walk is inside an expanded fragment spread, only visitors that
/// follow spreads are called.
#[doc(hidden)]
pub struct MultiVisitor<'a> {
    visitors: Vec<Box<dyn Visitor<'a> + 'a>>,
}

impl<'a> MultiVisitor<'a> {
    #[doc(hidden)]
    pub fn new(visitors: Vec<Box<dyn Visitor<'a> + 'a>>) -> MultiVisitor<'a> {
        MultiVisitor { visitors }
    }

    fn visit_all<F>(&mut self, ctx: &mut ValidatorContext<'a>, mut f: F)
    where
        F: FnMut(&mut dyn Visitor<'a>, &mut ValidatorContext<'a>),
    {
        let expanding = ctx.is_expanding_fragment();
        for v in &mut self.visitors {
            if !expanding || v.follows_fragment_spreads() {
                f(v.as_mut(), ctx);
            }
        }
    }
}

impl<'a> Visitor<'a> for MultiVisitor<'a> {
    fn follows_fragment_spreads(&self) -> bool {
        self.visitors.iter().any(|v| v.follows_fragment_spreads())
    }

    fn enter_document(&mut self, ctx: &mut ValidatorContext<'a>, doc: &'a Document) {
        self.visit_all(ctx, |v, ctx| v.enter_document(ctx, doc));
    }
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, doc: &'a Document) {
        self.visit_all(ctx, |v, ctx| v.exit_document(ctx, doc));
    }

    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        self.visit_all(ctx, |v, ctx| v.enter_operation_definition(ctx, op));
    }
    fn exit_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        self.visit_all(ctx, |v, ctx| v.exit_operation_definition(ctx, op));
    }

    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment>,
    ) {
        self.visit_all(ctx, |v, ctx| v.enter_fragment_definition(ctx, f));
    }
    fn exit_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment>,
    ) {
        self.visit_all(ctx, |v, ctx| v.exit_fragment_definition(ctx, f));
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a (Spanning<String>, VariableDefinition),
    ) {
        self.visit_all(ctx, |v, ctx| v.enter_variable_definition(ctx, def));
    }
    fn exit_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a (Spanning<String>, VariableDefinition),
    ) {
        self.visit_all(ctx, |v, ctx| v.exit_variable_definition(ctx, def));
    }

    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'a>, d: &'a Spanning<Directive>) {
        self.visit_all(ctx, |v, ctx| v.enter_directive(ctx, d));
    }
    fn exit_directive(&mut self, ctx: &mut ValidatorContext<'a>, d: &'a Spanning<Directive>) {
        self.visit_all(ctx, |v, ctx| v.exit_directive(ctx, d));
    }

    fn enter_argument(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        arg: &'a (Spanning<String>, Spanning<InputValue>),
    ) {
        self.visit_all(ctx, |v, ctx| v.enter_argument(ctx, arg));
    }
    fn exit_argument(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        arg: &'a (Spanning<String>, Spanning<InputValue>),
    ) {
        self.visit_all(ctx, |v, ctx| v.exit_argument(ctx, arg));
    }

    fn enter_selection_set(&mut self, ctx: &mut ValidatorContext<'a>, s: &'a [Selection]) {
        self.visit_all(ctx, |v, ctx| v.enter_selection_set(ctx, s));
    }
    fn exit_selection_set(&mut self, ctx: &mut ValidatorContext<'a>, s: &'a [Selection]) {
        self.visit_all(ctx, |v, ctx| v.exit_selection_set(ctx, s));
    }

    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, f: &'a Spanning<Field>) {
        self.visit_all(ctx, |v, ctx| v.enter_field(ctx, f));
    }
    fn exit_field(&mut self, ctx: &mut ValidatorContext<'a>, f: &'a Spanning<Field>) {
        self.visit_all(ctx, |v, ctx| v.exit_field(ctx, f));
    }

    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        s: &'a Spanning<FragmentSpread>,
    ) {
        self.visit_all(ctx, |v, ctx| v.enter_fragment_spread(ctx, s));
    }
    fn exit_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        s: &'a Spanning<FragmentSpread>,
    ) {
        self.visit_all(ctx, |v, ctx| v.exit_fragment_spread(ctx, s));
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<InlineFragment>,
    ) {
        self.visit_all(ctx, |v, ctx| v.enter_inline_fragment(ctx, f));
    }
    fn exit_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<InlineFragment>,
    ) {
        self.visit_all(ctx, |v, ctx| v.exit_inline_fragment(ctx, f));
    }

    fn enter_null_value(&mut self, ctx: &mut ValidatorContext<'a>, n: Spanning<()>) {
        self.visit_all(ctx, |v, ctx| v.enter_null_value(ctx, n));
    }
    fn exit_null_value(&mut self, ctx: &mut ValidatorContext<'a>, n: Spanning<()>) {
        self.visit_all(ctx, |v, ctx| v.exit_null_value(ctx, n));
    }

    fn enter_int_value(&mut self, ctx: &mut ValidatorContext<'a>, i: Spanning<i64>) {
        self.visit_all(ctx, |v, ctx| v.enter_int_value(ctx, i));
    }
    fn exit_int_value(&mut self, ctx: &mut ValidatorContext<'a>, i: Spanning<i64>) {
        self.visit_all(ctx, |v, ctx| v.exit_int_value(ctx, i));
    }

    fn enter_float_value(&mut self, ctx: &mut ValidatorContext<'a>, f: Spanning<f64>) {
        self.visit_all(ctx, |v, ctx| v.enter_float_value(ctx, f));
    }
    fn exit_float_value(&mut self, ctx: &mut ValidatorContext<'a>, f: Spanning<f64>) {
        self.visit_all(ctx, |v, ctx| v.exit_float_value(ctx, f));
    }

    fn enter_string_value(&mut self, ctx: &mut ValidatorContext<'a>, s: Spanning<&'a String>) {
        self.visit_all(ctx, |v, ctx| v.enter_string_value(ctx, s));
    }
    fn exit_string_value(&mut self, ctx: &mut ValidatorContext<'a>, s: Spanning<&'a String>) {
        self.visit_all(ctx, |v, ctx| v.exit_string_value(ctx, s));
    }

    fn enter_boolean_value(&mut self, ctx: &mut ValidatorContext<'a>, b: Spanning<bool>) {
        self.visit_all(ctx, |v, ctx| v.enter_boolean_value(ctx, b));
    }
    fn exit_boolean_value(&mut self, ctx: &mut ValidatorContext<'a>, b: Spanning<bool>) {
        self.visit_all(ctx, |v, ctx| v.exit_boolean_value(ctx, b));
    }

    fn enter_enum_value(&mut self, ctx: &mut ValidatorContext<'a>, s: Spanning<&'a String>) {
        self.visit_all(ctx, |v, ctx| v.enter_enum_value(ctx, s));
    }
    fn exit_enum_value(&mut self, ctx: &mut ValidatorContext<'a>, s: Spanning<&'a String>) {
        self.visit_all(ctx, |v, ctx| v.exit_enum_value(ctx, s));
    }

    fn enter_variable_value(&mut self, ctx: &mut ValidatorContext<'a>, s: Spanning<&'a String>) {
        self.visit_all(ctx, |v, ctx| v.enter_variable_value(ctx, s));
    }
    fn exit_variable_value(&mut self, ctx: &mut ValidatorContext<'a>, s: Spanning<&'a String>) {
        self.visit_all(ctx, |v, ctx| v.exit_variable_value(ctx, s));
    }

    fn enter_list_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        l: Spanning<&'a Vec<Spanning<InputValue>>>,
    ) {
        self.visit_all(ctx, |v, ctx| v.enter_list_value(ctx, l));
    }
    fn exit_list_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        l: Spanning<&'a Vec<Spanning<InputValue>>>,
    ) {
        self.visit_all(ctx, |v, ctx| v.exit_list_value(ctx, l));
    }

    fn enter_object_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        o: Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>,
    ) {
        self.visit_all(ctx, |v, ctx| v.enter_object_value(ctx, o));
    }
    fn exit_object_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        o: Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>,
    ) {
        self.visit_all(ctx, |v, ctx| v.exit_object_value(ctx, o));
    }

    fn enter_object_field(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a (Spanning<String>, Spanning<InputValue>),
    ) {
        self.visit_all(ctx, |v, ctx| v.enter_object_field(ctx, f));
    }
    fn exit_object_field(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a (Spanning<String>, Spanning<InputValue>),
    ) {
        self.visit_all(ctx, |v, ctx| v.exit_object_field(ctx, f));
    }
}
