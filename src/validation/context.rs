use std::{fmt, sync::Arc};

use fnv::{FnvHashMap, FnvHashSet};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::{
    ast::{Definition, Document, Fragment},
    parser::{SourcePosition, Spanning},
    schema::{DirectiveType, Schema},
    types::{Argument, Field, Type},
};

/// Query validation error
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct RuleError {
    locations: Vec<SourcePosition>,
    message: String,
}

#[doc(hidden)]
pub struct ValidatorContext<'a> {
    pub schema: &'a Schema,
    errors: Vec<RuleError>,
    type_stack: Vec<Option<Type>>,
    parent_type_stack: Vec<Option<Type>>,
    input_type_stack: Vec<Option<Type>>,
    field_stack: Vec<Option<Field>>,
    directive_stack: Vec<Option<Arc<DirectiveType>>>,
    argument_stack: Vec<Option<Argument>>,
    fragments: FnvHashMap<&'a str, &'a Spanning<Fragment>>,
    in_operation: bool,
    expanded_fragments: FnvHashSet<&'a str>,
    expansion_depth: usize,
}

impl RuleError {
    #[doc(hidden)]
    pub fn new(message: &str, locations: &[SourcePosition]) -> Self {
        Self {
            message: message.into(),
            locations: locations.to_vec(),
        }
    }

    /// Access the message for a validation error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Access the positions of the validation error
    ///
    /// All validation errors contain at least one source position, but some
    /// validators supply extra context through multiple positions.
    pub fn locations(&self) -> &[SourcePosition] {
        &self.locations
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let locations = self
            .locations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}. At {locations}", self.message)
    }
}

impl std::error::Error for RuleError {}

impl Serialize for RuleError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_struct("RuleError", 2)?;
        map.serialize_field("message", &self.message)?;
        map.serialize_field("locations", &self.locations)?;
        map.end()
    }
}

impl<'a> ValidatorContext<'a> {
    #[doc(hidden)]
    pub fn new(schema: &'a Schema, document: &'a Document) -> ValidatorContext<'a> {
        ValidatorContext {
            schema,
            errors: Vec::new(),
            type_stack: Vec::new(),
            parent_type_stack: Vec::new(),
            input_type_stack: Vec::new(),
            field_stack: Vec::new(),
            directive_stack: Vec::new(),
            argument_stack: Vec::new(),
            fragments: document
                .iter()
                .filter_map(|def| match def {
                    Definition::Fragment(frag) => Some((frag.item.name.item.as_str(), &**frag)),
                    Definition::Operation(_) => None,
                })
                .collect(),
            in_operation: false,
            expanded_fragments: FnvHashSet::default(),
            expansion_depth: 0,
        }
    }

    #[doc(hidden)]
    pub fn report_error(&mut self, message: &str, locations: &[SourcePosition]) {
        self.errors.push(RuleError::new(message, locations))
    }

    #[doc(hidden)]
    pub fn into_errors(mut self) -> Vec<RuleError> {
        self.errors.sort();
        self.errors
    }

    #[doc(hidden)]
    pub fn with_pushed_type<F, R>(&mut self, t: Option<Type>, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        self.type_stack.push(t);
        let res = f(self);
        self.type_stack.pop();

        res
    }

    #[doc(hidden)]
    pub fn with_pushed_parent_type<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        self.parent_type_stack
            .push(self.current_type().map(|t| t.named_type().clone()));
        let res = f(self);
        self.parent_type_stack.pop();

        res
    }

    #[doc(hidden)]
    pub fn with_pushed_input_type<F, R>(&mut self, t: Option<Type>, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        self.input_type_stack.push(t);
        let res = f(self);
        self.input_type_stack.pop();

        res
    }

    /// Pushes a field definition together with its output type.
    #[doc(hidden)]
    pub fn with_pushed_field<F, R>(&mut self, field: Option<Field>, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        let field_type = field.as_ref().map(|def| def.field_type.clone());
        self.field_stack.push(field);
        let res = self.with_pushed_type(field_type, f);
        self.field_stack.pop();

        res
    }

    #[doc(hidden)]
    pub fn with_pushed_directive<F, R>(&mut self, directive: Option<Arc<DirectiveType>>, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        self.directive_stack.push(directive);
        let res = f(self);
        self.directive_stack.pop();

        res
    }

    /// Pushes an argument definition together with its input type.
    #[doc(hidden)]
    pub fn with_pushed_argument<F, R>(&mut self, argument: Option<Argument>, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        let arg_type = argument.as_ref().map(|def| def.arg_type.clone());
        self.argument_stack.push(argument);
        let res = self.with_pushed_input_type(arg_type, f);
        self.argument_stack.pop();

        res
    }

    #[doc(hidden)]
    pub fn current_type(&self) -> Option<&Type> {
        self.type_stack.last().and_then(Option::as_ref)
    }

    #[doc(hidden)]
    pub fn parent_type(&self) -> Option<&Type> {
        self.parent_type_stack.last().and_then(Option::as_ref)
    }

    #[doc(hidden)]
    pub fn current_input_type(&self) -> Option<&Type> {
        self.input_type_stack.last().and_then(Option::as_ref)
    }

    #[doc(hidden)]
    pub fn current_field(&self) -> Option<&Field> {
        self.field_stack.last().and_then(Option::as_ref)
    }

    #[doc(hidden)]
    pub fn current_directive(&self) -> Option<&Arc<DirectiveType>> {
        self.directive_stack.last().and_then(Option::as_ref)
    }

    #[doc(hidden)]
    pub fn current_argument(&self) -> Option<&Argument> {
        self.argument_stack.last().and_then(Option::as_ref)
    }

    #[doc(hidden)]
    pub fn fragment(&self, name: &str) -> Option<&'a Spanning<Fragment>> {
        self.fragments.get(name).copied()
    }

    #[doc(hidden)]
    pub fn is_known_fragment(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// Is the visitor currently walking a fragment expanded at one of its
    /// spreads?
    #[doc(hidden)]
    pub fn is_expanding_fragment(&self) -> bool {
        self.expansion_depth > 0
    }

    pub(super) fn enter_operation(&mut self) {
        self.in_operation = true;
        self.expanded_fragments.clear();
    }

    pub(super) fn exit_operation(&mut self) {
        self.in_operation = false;
    }

    /// Starts expanding the named fragment, unless it is unknown, the visitor
    /// is outside of an operation, or the fragment was already expanded in
    /// the current operation.
    pub(super) fn begin_fragment_expansion(
        &mut self,
        name: &str,
    ) -> Option<&'a Spanning<Fragment>> {
        if !self.in_operation {
            return None;
        }
        let (&name, &fragment) = self.fragments.get_key_value(name)?;
        if !self.expanded_fragments.insert(name) {
            return None;
        }
        self.expansion_depth += 1;
        Some(fragment)
    }

    pub(super) fn end_fragment_expansion(&mut self) {
        self.expansion_depth = self.expansion_depth.saturating_sub(1);
    }
}
