use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use indexmap::IndexMap;
use itertools::Itertools as _;

use crate::{
    ast,
    executor::{ResolveManager, ResolveManagerConfig},
    schema::{build, introspection},
    types::{Argument, Field, ObjectType, Type},
};

/// Definition of a schema: its roots, extra types and directives.
pub struct SchemaConfig {
    pub(crate) query: Arc<ObjectType>,
    pub(crate) mutation: Option<Arc<ObjectType>>,
    pub(crate) types: Vec<Type>,
    pub(crate) directives: Vec<DirectiveType>,
    pub(crate) resolve_manager: ResolveManagerConfig,
}

impl SchemaConfig {
    /// Starts a schema definition with the given query root.
    pub fn new(query: Arc<ObjectType>) -> Self {
        Self {
            query,
            mutation: None,
            types: vec![],
            directives: vec![],
            resolve_manager: ResolveManagerConfig::default(),
        }
    }

    /// Sets the mutation root.
    #[must_use]
    pub fn mutation(mut self, mutation: Arc<ObjectType>) -> Self {
        self.mutation = Some(mutation);
        self
    }

    /// Adds types not reachable from the roots, e.g. interface
    /// implementations only returned through the interface.
    #[must_use]
    pub fn types(mut self, types: impl IntoIterator<Item = Type>) -> Self {
        self.types.extend(types);
        self
    }

    /// Registers a custom directive next to `@skip`, `@include` and
    /// `@deprecated`.
    #[must_use]
    pub fn directive(mut self, directive: DirectiveType) -> Self {
        self.directives.push(directive);
        self
    }

    /// Tunes the worker pool executing resolvers.
    #[must_use]
    pub fn resolve_manager(mut self, config: ResolveManagerConfig) -> Self {
        self.resolve_manager = config;
        self
    }
}

/// Assembled schema
///
/// Cheap to clone; clones share the type map and the resolve manager. The
/// manager's worker threads stop once the last clone and the last execution
/// using it are gone.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

pub(crate) struct SchemaInner {
    pub(crate) query_type: Arc<ObjectType>,
    pub(crate) mutation_type: Option<Arc<ObjectType>>,
    pub(crate) types: IndexMap<ArcStr, Type>,
    pub(crate) directives: IndexMap<ArcStr, Arc<DirectiveType>>,
    pub(crate) errors: Vec<String>,
    pub(crate) manager_config: ResolveManagerConfig,
    pub(crate) manager: OnceLock<ResolveManager>,
}

/// Error of assembling a [`Schema`].
///
/// Carries every problem found together with the partially assembled schema.
/// Requests against that schema fail with the same messages.
#[derive(Debug, Display, Error)]
#[display("{}", errors.iter().join("\n"))]
pub struct SchemaBuildError {
    errors: Vec<String>,
    #[error(not(source))]
    schema: Schema,
}

impl SchemaBuildError {
    /// The problems found, in discovery order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The partially assembled schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Takes the partially assembled schema.
    pub fn into_schema(self) -> Schema {
        self.schema
    }
}

/// Directive definition
#[derive(Clone, Debug)]
pub struct DirectiveType {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub locations: Vec<DirectiveLocation>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
}

/// Where a directive may appear.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[allow(missing_docs)]
pub enum DirectiveLocation {
    #[display("QUERY")]
    Query,
    #[display("MUTATION")]
    Mutation,
    #[display("SUBSCRIPTION")]
    Subscription,
    #[display("FIELD")]
    Field,
    #[display("FRAGMENT_DEFINITION")]
    FragmentDefinition,
    #[display("FRAGMENT_SPREAD")]
    FragmentSpread,
    #[display("INLINE_FRAGMENT")]
    InlineFragment,
    #[display("SCHEMA")]
    Schema,
    #[display("SCALAR")]
    Scalar,
    #[display("OBJECT")]
    Object,
    #[display("FIELD_DEFINITION")]
    FieldDefinition,
    #[display("ARGUMENT_DEFINITION")]
    ArgumentDefinition,
    #[display("INTERFACE")]
    Interface,
    #[display("UNION")]
    Union,
    #[display("ENUM")]
    Enum,
    #[display("ENUM_VALUE")]
    EnumValue,
    #[display("INPUT_OBJECT")]
    InputObject,
    #[display("INPUT_FIELD_DEFINITION")]
    InputFieldDefinition,
}

impl DirectiveLocation {
    /// All locations, in introspection order.
    pub const ALL: [Self; 18] = [
        Self::Query,
        Self::Mutation,
        Self::Subscription,
        Self::Field,
        Self::FragmentDefinition,
        Self::FragmentSpread,
        Self::InlineFragment,
        Self::Schema,
        Self::Scalar,
        Self::Object,
        Self::FieldDefinition,
        Self::ArgumentDefinition,
        Self::Interface,
        Self::Union,
        Self::Enum,
        Self::EnumValue,
        Self::InputObject,
        Self::InputFieldDefinition,
    ];
}

impl Schema {
    /// Assembles a schema from its definition.
    ///
    /// Walks every type reachable from the roots, the extra types and the
    /// introspection types, and checks the whole graph.
    pub fn new(config: SchemaConfig) -> Result<Self, SchemaBuildError> {
        let inner = build::assemble(config);
        let schema = Self {
            inner: Arc::new(inner),
        };
        if schema.inner.errors.is_empty() {
            Ok(schema)
        } else {
            Err(SchemaBuildError {
                errors: schema.inner.errors.clone(),
                schema,
            })
        }
    }

    /// Problems found while assembling; empty for a usable schema.
    pub fn errors(&self) -> &[String] {
        &self.inner.errors
    }

    /// The query root.
    pub fn query_type(&self) -> &Arc<ObjectType> {
        &self.inner.query_type
    }

    /// The mutation root, if any.
    pub fn mutation_type(&self) -> Option<&Arc<ObjectType>> {
        self.inner.mutation_type.as_ref()
    }

    /// Looks up a named type.
    pub fn type_by_name(&self, name: &str) -> Option<&Type> {
        self.inner.types.get(name)
    }

    /// All named types, in discovery order.
    pub fn type_list(&self) -> impl Iterator<Item = &Type> {
        self.inner.types.values()
    }

    /// All directives, built-in ones first.
    pub fn directive_list(&self) -> impl Iterator<Item = &Arc<DirectiveType>> {
        self.inner.directives.values()
    }

    /// Looks up a directive by name.
    pub fn directive_by_name(&self, name: &str) -> Option<&Arc<DirectiveType>> {
        self.inner.directives.get(name)
    }

    /// Converts a type literal of the query into a schema type.
    ///
    /// Returns `None` if the named type is unknown.
    pub fn type_from_ast(&self, t: &ast::Type) -> Option<Type> {
        match t {
            ast::Type::Named(n) => self.type_by_name(n).cloned(),
            ast::Type::List(inner) => self.type_from_ast(inner).map(Type::list),
            ast::Type::NonNull(inner) => self.type_from_ast(inner).map(Type::non_null),
        }
    }

    /// Looks up the definition of a field selected on `parent_type`.
    ///
    /// Knows the meta-fields: `__schema` and `__type` on the query root and
    /// `__typename` on every composite type.
    pub fn field_def(&self, parent_type: &Type, name: &str) -> Option<Field> {
        match name {
            "__schema" | "__type" if self.is_query_root(parent_type) => {
                Some(if name == "__schema" {
                    introspection::schema_meta_field()
                } else {
                    introspection::type_meta_field()
                })
            }
            "__typename" if parent_type.is_composite() => {
                Some(introspection::typename_meta_field())
            }
            _ => parent_type.field_by_name(name),
        }
    }

    fn is_query_root(&self, t: &Type) -> bool {
        t.as_object()
            .is_some_and(|o| o.name() == self.inner.query_type.name())
    }

    /// The object types an abstract type may resolve to.
    ///
    /// Returns nothing for non-abstract types.
    pub fn possible_types(&self, t: &Type) -> Vec<Arc<ObjectType>> {
        match t {
            Type::Union(u) => u.types().to_vec(),
            Type::Interface(i) => i
                .implementations()
                .into_iter()
                .filter(|o| self.contains_object(o))
                .collect(),
            _ => vec![],
        }
    }

    fn contains_object(&self, object: &Arc<ObjectType>) -> bool {
        matches!(
            self.inner.types.get(object.name()),
            Some(Type::Object(o)) if Arc::ptr_eq(o, object),
        )
    }

    /// Can a value of the abstract type be of the object type named
    /// `object_name`?
    pub fn is_possible_type(&self, abstract_type: &Type, object_name: &str) -> bool {
        match abstract_type {
            Type::Union(u) => u.is_possible_type(object_name),
            Type::Interface(i) => {
                i.is_possible_type(object_name)
                    && matches!(self.type_by_name(object_name), Some(Type::Object(_)))
            }
            _ => false,
        }
    }

    /// Can a value be of both named types at once?
    pub fn type_overlap(&self, t1: &Type, t2: &Type) -> bool {
        if t1 == t2 {
            return true;
        }

        match (t1.is_abstract(), t2.is_abstract()) {
            (true, true) => self
                .possible_types(t1)
                .iter()
                .any(|t| self.is_possible_type(t2, t.name())),
            (true, false) => t2.name().is_some_and(|n| self.is_possible_type(t1, n)),
            (false, true) => t1.name().is_some_and(|n| self.is_possible_type(t2, n)),
            (false, false) => false,
        }
    }

    /// Can a value of `sub_type` be used where `super_type` is expected?
    pub fn is_subtype(&self, sub_type: &Type, super_type: &Type) -> bool {
        if super_type == sub_type {
            return true;
        }

        match (super_type, sub_type) {
            (Type::NonNull(sup), Type::NonNull(sub)) => self.is_subtype(sub, sup),
            (Type::NonNull(_), _) => false,
            (sup, Type::NonNull(sub)) => self.is_subtype(sub, sup),
            (Type::List(sup), Type::List(sub)) => self.is_subtype(sub, sup),
            (Type::List(_), _) | (_, Type::List(_)) => false,
            (sup, sub) => {
                sup.is_abstract() && sub.name().is_some_and(|n| self.is_possible_type(sup, n))
            }
        }
    }

    /// The worker pool of this schema, started on first use.
    pub(crate) fn manager(&self) -> &ResolveManager {
        self.inner
            .manager
            .get_or_init(|| ResolveManager::start(self.inner.manager_config.clone()))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("query_type", &self.inner.query_type.name())
            .field("types", &self.inner.types.keys().collect::<Vec<_>>())
            .field("errors", &self.inner.errors)
            .finish_non_exhaustive()
    }
}

impl DirectiveType {
    /// Defines a directive usable at the given locations.
    pub fn new(name: impl Into<ArcStr>, locations: &[DirectiveLocation]) -> Self {
        Self {
            name: name.into(),
            description: None,
            locations: locations.to_vec(),
            arguments: vec![],
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an argument.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Looks up an argument definition by name.
    pub fn argument_by_name(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    pub(crate) fn new_skip() -> Self {
        Self::new(
            "skip",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        )
        .description(
            "Directs the executor to skip this field or fragment when the `if` argument is \
             true.",
        )
        .argument(
            Argument::new("if", Type::non_null(Type::boolean())).description("Skipped when true."),
        )
    }

    pub(crate) fn new_include() -> Self {
        Self::new(
            "include",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        )
        .description(
            "Directs the executor to include this field or fragment only when the `if` \
             argument is true.",
        )
        .argument(
            Argument::new("if", Type::non_null(Type::boolean()))
                .description("Included when true."),
        )
    }

    pub(crate) fn new_deprecated() -> Self {
        Self::new(
            "deprecated",
            &[DirectiveLocation::FieldDefinition, DirectiveLocation::EnumValue],
        )
        .description("Marks an element of a GraphQL schema as no longer supported.")
        .argument(
            Argument::new("reason", Type::string())
                .description(
                    "Explains why this element was deprecated, usually also including a \
                     suggestion for how to access supported similar data.",
                )
                .default_value("No longer supported"),
        )
    }
}
