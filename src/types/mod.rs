//! The schema type system
//!
//! Named types are created once by the host and shared as `Arc` handles.
//! [`Type`] wraps those handles together with the list and non-null
//! modifiers.

mod enums;
mod field;
mod input_object;
mod interface;
mod name;
mod object;
pub(crate) mod scalars;
mod thunk;
mod union;

use std::{fmt, sync::Arc};

use arcstr::ArcStr;

use crate::{
    executor::{FieldResult, ResolveInfo, ResolveParams},
    value::Value,
};

pub use self::{
    enums::{EnumConfig, EnumType, EnumValue},
    field::{Argument, Field, FieldMap},
    input_object::{InputObjectConfig, InputObjectType},
    interface::{InterfaceConfig, InterfaceType},
    name::is_valid_name,
    object::{ObjectConfig, ObjectType},
    scalars::{ScalarConfig, ScalarType},
    thunk::Thunk,
    union::{UnionConfig, UnionType},
};

pub(crate) use self::{name::assert_valid_name, thunk::ThunkCell};

/// Field resolver.
pub type ResolveFn = Arc<dyn Fn(ResolveParams) -> FieldResult<Value> + Send + Sync>;

/// Decides whether a runtime value belongs to an object type.
pub type IsTypeOfFn = Arc<dyn Fn(&Value, &ResolveInfo) -> bool + Send + Sync>;

/// Picks the concrete object type of a runtime value of an abstract type.
pub type ResolveTypeFn =
    Arc<dyn Fn(&Value, &ResolveInfo) -> Option<Arc<ObjectType>> + Send + Sync>;

/// A schema type: a named type or a list/non-null modifier around one.
///
/// Equality compares structure and type names, not handle identity.
#[derive(Clone)]
#[allow(missing_docs)]
pub enum Type {
    Scalar(Arc<ScalarType>),
    Object(Arc<ObjectType>),
    Interface(Arc<InterfaceType>),
    Union(Arc<UnionType>),
    Enum(Arc<EnumType>),
    InputObject(Arc<InputObjectType>),
    List(Box<Type>),
    NonNull(Box<Type>),
}

/// GraphQL type kind
///
/// GraphQL defines a number of type kinds - the meta type
/// of a type.
#[derive(Clone, Eq, PartialEq, Debug, Copy, Hash)]
pub enum TypeKind {
    /// ## Scalar types
    ///
    /// Scalar types appear as the leaf nodes of GraphQL queries. Strings,
    /// numbers, and booleans are the built in types, and while it's possible
    /// to define your own, it's relatively uncommon.
    Scalar,

    /// ## Object types
    ///
    /// The most common type to be implemented by users. Objects have fields
    /// and can implement interfaces.
    Object,

    /// ## Interface types
    ///
    /// Interface types are used to represent overlapping fields between
    /// multiple types, and can be queried for their concrete type.
    Interface,

    /// ## Union types
    ///
    /// Unions are similar to interfaces but can not contain any fields on
    /// their own.
    Union,

    /// ## Enum types
    ///
    /// Like scalars, enum types appear as the leaf nodes of GraphQL queries.
    Enum,

    /// ## Input objects
    ///
    /// Represents complex values provided in queries _into_ the system.
    InputObject,

    /// ## List types
    ///
    /// Represent lists of other types.
    List,

    /// ## Non-null types
    ///
    /// In GraphQL, nullable types are the default. By putting a `!` after a
    /// type, it becomes non-nullable.
    NonNull,
}

impl TypeKind {
    /// The introspection name of the kind, e.g. `INPUT_OBJECT`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::InputObject => "INPUT_OBJECT",
            Self::List => "LIST",
            Self::NonNull => "NON_NULL",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an item is deprecated, with context.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum DeprecationStatus {
    /// The field/variant is not deprecated.
    #[default]
    Current,
    /// The field/variant is deprecated, with an optional reason
    Deprecated(Option<ArcStr>),
}

impl DeprecationStatus {
    /// If this deprecation status indicates the item is deprecated.
    pub fn is_deprecated(&self) -> bool {
        match self {
            Self::Current => false,
            Self::Deprecated(_) => true,
        }
    }

    /// An optional reason for the deprecation, or none if `Current`.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Current => None,
            Self::Deprecated(rsn) => rsn.as_deref(),
        }
    }
}

impl Type {
    /// Wraps a type into a list.
    pub fn list(of_type: impl Into<Type>) -> Self {
        Self::List(Box::new(of_type.into()))
    }

    /// Wraps a type into a non-null modifier.
    ///
    /// Wrapping a non-null type again is reported when the schema is
    /// assembled.
    pub fn non_null(of_type: impl Into<Type>) -> Self {
        Self::NonNull(Box::new(of_type.into()))
    }

    /// The built-in `Int` scalar.
    pub fn int() -> Self {
        Self::Scalar(scalars::int())
    }

    /// The built-in `Float` scalar.
    pub fn float() -> Self {
        Self::Scalar(scalars::float())
    }

    /// The built-in `String` scalar.
    pub fn string() -> Self {
        Self::Scalar(scalars::string())
    }

    /// The built-in `Boolean` scalar.
    pub fn boolean() -> Self {
        Self::Scalar(scalars::boolean())
    }

    /// The built-in `ID` scalar.
    pub fn id() -> Self {
        Self::Scalar(scalars::id())
    }

    /// Access the name of the type, if applicable
    ///
    /// Lists and non-null wrappers don't have names.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Scalar(t) => Some(t.name()),
            Self::Object(t) => Some(t.name()),
            Self::Interface(t) => Some(t.name()),
            Self::Union(t) => Some(t.name()),
            Self::Enum(t) => Some(t.name()),
            Self::InputObject(t) => Some(t.name()),
            Self::List(_) | Self::NonNull(_) => None,
        }
    }

    /// Access the description of the type, if applicable
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar(t) => t.description(),
            Self::Object(t) => t.description(),
            Self::Interface(t) => t.description(),
            Self::Union(t) => t.description(),
            Self::Enum(t) => t.description(),
            Self::InputObject(t) => t.description(),
            Self::List(_) | Self::NonNull(_) => None,
        }
    }

    /// The error recorded while constructing a named type, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Scalar(t) => t.error(),
            Self::Object(t) => t.error(),
            Self::Interface(t) => t.error(),
            Self::Union(t) => t.error(),
            Self::Enum(t) => t.error(),
            Self::InputObject(t) => t.error(),
            Self::List(_) | Self::NonNull(_) => None,
        }
    }

    /// Construct a `TypeKind` for a given type
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::Enum(_) => TypeKind::Enum,
            Self::InputObject(_) => TypeKind::InputObject,
            Self::List(_) => TypeKind::List,
            Self::NonNull(_) => TypeKind::NonNull,
        }
    }

    /// Unwraps all list and non-null modifiers.
    pub fn named_type(&self) -> &Type {
        match self {
            Self::List(t) | Self::NonNull(t) => t.named_type(),
            t => t,
        }
    }

    /// Strips a single non-null modifier, if present.
    pub fn nullable_type(&self) -> &Type {
        match self {
            Self::NonNull(t) => &**t,
            t => t,
        }
    }

    /// The wrapped type of a list or non-null modifier.
    pub fn of_type(&self) -> Option<&Type> {
        match self {
            Self::List(t) | Self::NonNull(t) => Some(&**t),
            _ => None,
        }
    }

    /// Determines if a type only can represent non-null values.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Is the type a list, ignoring an outer non-null modifier?
    pub fn is_list(&self) -> bool {
        matches!(self.nullable_type(), Self::List(_))
    }

    /// Can values of this type be used as variables and arguments?
    pub fn is_input(&self) -> bool {
        matches!(
            self.named_type(),
            Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_),
        )
    }

    /// Can values of this type be returned from fields?
    pub fn is_output(&self) -> bool {
        !matches!(self.named_type(), Self::InputObject(_))
    }

    /// Returns true if the type can occur in leaf positions in queries
    ///
    /// Only enums and scalars are leaf types.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }

    /// Returns true if the type is a composite type
    ///
    /// Objects, interfaces, and unions are composite.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    /// Returns true if the type can be used in abstract positions, i.e.
    /// interfaces or unions.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// Access the fields of an object or interface type.
    pub fn fields(&self) -> Option<Arc<FieldMap>> {
        match self {
            Self::Object(t) => Some(t.fields()),
            Self::Interface(t) => Some(t.fields()),
            _ => None,
        }
    }

    /// Access a field's definition given its name
    ///
    /// Only objects and interfaces have fields. This method always returns
    /// `None` for other types.
    pub fn field_by_name(&self, name: &str) -> Option<Field> {
        self.fields().and_then(|f| f.get(name).cloned())
    }

    /// Access an input field's definition given its name
    ///
    /// Only input objects have input fields.
    pub fn input_field_by_name(&self, name: &str) -> Option<Argument> {
        match self {
            Self::InputObject(t) => t.field(name),
            _ => None,
        }
    }

    /// The object handle, if this is an object type.
    pub fn as_object(&self) -> Option<&Arc<ObjectType>> {
        match self {
            Self::Object(t) => Some(t),
            _ => None,
        }
    }

    /// Converts the type into the equivalent query type literal, keeping its
    /// list and non-null modifiers.
    pub fn to_ast(&self) -> crate::ast::Type {
        use crate::ast::Type as Literal;

        match self {
            Self::List(t) => Literal::List(Box::new(t.to_ast())),
            Self::NonNull(t) => Literal::NonNull(Box::new(t.to_ast())),
            t => Literal::Named(t.name().unwrap_or_default().into()),
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) | (Self::NonNull(a), Self::NonNull(b)) => a == b,
            (Self::List(_), _) | (Self::NonNull(_), _) => false,
            (a, b) => a.kind() == b.kind() && a.name() == b.name(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNull(t) => write!(f, "{t}!"),
            t => f.write_str(t.name().unwrap_or_default()),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}

impl From<Arc<ScalarType>> for Type {
    fn from(t: Arc<ScalarType>) -> Self {
        Self::Scalar(t)
    }
}

impl From<Arc<ObjectType>> for Type {
    fn from(t: Arc<ObjectType>) -> Self {
        Self::Object(t)
    }
}

impl From<Arc<InterfaceType>> for Type {
    fn from(t: Arc<InterfaceType>) -> Self {
        Self::Interface(t)
    }
}

impl From<Arc<UnionType>> for Type {
    fn from(t: Arc<UnionType>) -> Self {
        Self::Union(t)
    }
}

impl From<Arc<EnumType>> for Type {
    fn from(t: Arc<EnumType>) -> Self {
        Self::Enum(t)
    }
}

impl From<Arc<InputObjectType>> for Type {
    fn from(t: Arc<InputObjectType>) -> Self {
        Self::InputObject(t)
    }
}

impl From<&Arc<ObjectType>> for Type {
    fn from(t: &Arc<ObjectType>) -> Self {
        Self::Object(t.clone())
    }
}

impl From<&Arc<InterfaceType>> for Type {
    fn from(t: &Arc<InterfaceType>) -> Self {
        Self::Interface(t.clone())
    }
}

impl From<&Arc<UnionType>> for Type {
    fn from(t: &Arc<UnionType>) -> Self {
        Self::Union(t.clone())
    }
}

impl From<&Arc<EnumType>> for Type {
    fn from(t: &Arc<EnumType>) -> Self {
        Self::Enum(t.clone())
    }
}

impl From<&Arc<InputObjectType>> for Type {
    fn from(t: &Arc<InputObjectType>) -> Self {
        Self::InputObject(t.clone())
    }
}

impl From<&Type> for Type {
    fn from(t: &Type) -> Self {
        t.clone()
    }
}
