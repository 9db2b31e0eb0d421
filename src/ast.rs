use std::{fmt, sync::Arc};

use crate::parser::Spanning;

/// A type literal in the syntax tree
///
/// This enum carries no semantic information and might refer to types that do
/// not exist.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Type {
    /// A nullable named type, e.g. `String`
    Named(String),
    /// A nullable list type, e.g. `[String]`
    ///
    /// The list itself is what's nullable, the containing type might be non-null.
    List(Box<Type>),
    /// A non-null type, e.g. `String!` or `[String]!`
    NonNull(Box<Type>),
}

/// A JSON-like value that can appear in a query document, either as an
/// argument or as the default value of a variable. These are _not_ constant
/// and might contain variables.
///
/// Lists and objects variants are _spanned_, i.e. they contain a reference to
/// their position in the source file, if available.
#[derive(Clone, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum InputValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    Variable(String),
    List(Vec<Spanning<InputValue>>),
    Object(Vec<(Spanning<String>, Spanning<InputValue>)>),
}

#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct VariableDefinition {
    pub var_type: Spanning<Type>,
    pub default_value: Option<Spanning<InputValue>>,
}

/// Arguments of a field or directive, in document order.
pub type Arguments = Vec<(Spanning<String>, Spanning<InputValue>)>;

/// Variable definitions of an operation, in document order.
pub type VariableDefinitions = Vec<(Spanning<String>, VariableDefinition)>;

#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct Field {
    pub alias: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub arguments: Arguments,
    pub directives: Vec<Spanning<Directive>>,
    pub selection_set: Option<Vec<Selection>>,
}

#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct FragmentSpread {
    pub name: Spanning<String>,
    pub directives: Vec<Spanning<Directive>>,
}

#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct InlineFragment {
    pub type_condition: Option<Spanning<String>>,
    pub directives: Vec<Spanning<Directive>>,
    pub selection_set: Vec<Selection>,
}

/// Entry in a GraphQL selection set
///
/// This enum represents one of the three variants of a selection that exists
/// in GraphQL: a field, a fragment spread, or an inline fragment. Each of the
/// variants references their location in the query source.
///
/// Fields are reference counted: the executor hands them to worker threads
/// without copying the subtree.
///
/// ```text
/// {
///   field(withArg: 123) { subField }
///   ...fragmentSpread
///   ...on User {
///     inlineFragmentField
///   }
/// }
/// ```
#[derive(Clone, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum Selection {
    Field(Arc<Spanning<Field>>),
    FragmentSpread(Spanning<FragmentSpread>),
    InlineFragment(Spanning<InlineFragment>),
}

#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct Directive {
    pub name: Spanning<String>,
    pub arguments: Arguments,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct Operation {
    pub operation_type: OperationType,
    pub name: Option<Spanning<String>>,
    pub variable_definitions: VariableDefinitions,
    pub directives: Vec<Spanning<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct Fragment {
    pub name: Spanning<String>,
    pub type_condition: Spanning<String>,
    pub directives: Vec<Spanning<Directive>>,
    pub selection_set: Vec<Selection>,
}

#[doc(hidden)]
#[derive(Clone, PartialEq, Debug)]
pub enum Definition {
    Operation(Arc<Spanning<Operation>>),
    Fragment(Arc<Spanning<Fragment>>),
}

#[doc(hidden)]
pub type Document = [Definition];
#[doc(hidden)]
pub type OwnedDocument = Vec<Definition>;

impl Type {
    /// Get the name of a named type.
    ///
    /// Only applies to named types; lists will return `None`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Type::Named(n) => Some(n),
            Type::NonNull(inner) => inner.name(),
            Type::List(_) => None,
        }
    }

    /// Get the innermost name by unpacking lists
    ///
    /// All type literals contain exactly one named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            Type::Named(n) => n,
            Type::List(inner) | Type::NonNull(inner) => inner.innermost_name(),
        }
    }

    /// Determines if a type only can represent non-null values.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNull(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNull(t) => write!(f, "{t}!"),
        }
    }
}

impl InputValue {
    /// Does the value represent null?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Does the value represent a variable?
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// View the underlying enum value, if present.
    pub fn as_enum_value(&self) -> Option<&str> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Recursively find all variables
    pub fn referenced_variables(&self) -> Vec<&str> {
        match self {
            Self::Variable(name) => vec![name.as_str()],
            Self::List(l) => l
                .iter()
                .flat_map(|v| v.item.referenced_variables())
                .collect(),
            Self::Object(o) => o
                .iter()
                .flat_map(|(_, v)| v.item.referenced_variables())
                .collect(),
            _ => vec![],
        }
    }

    /// Compare equality with another `InputValue` ignoring any source position information.
    pub fn unlocated_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(l1), Self::List(l2)) => {
                l1.len() == l2.len()
                    && l1
                        .iter()
                        .zip(l2.iter())
                        .all(|(v1, v2)| v1.item.unlocated_eq(&v2.item))
            }
            (Self::Object(o1), Self::Object(o2)) => {
                o1.len() == o2.len()
                    && o1.iter().all(|(sk1, sv1)| {
                        o2.iter().any(|(sk2, sv2)| {
                            sk1.item == sk2.item && sv1.item.unlocated_eq(&sv2.item)
                        })
                    })
            }
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Enum(v) => write!(f, "{v}"),
            Self::Variable(v) => write!(f, "${v}"),
            Self::List(v) => {
                write!(f, "[")?;
                for (i, spanning) in v.iter().enumerate() {
                    spanning.item.fmt(f)?;
                    if i < v.len() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "]")
            }
            Self::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    write!(f, "{}: ", k.item)?;
                    v.item.fmt(f)?;
                    if i < o.len() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

impl Field {
    /// The key this field is stored under in the response: its alias, or its
    /// name when no alias is given.
    pub fn response_key(&self) -> &str {
        self.alias.as_ref().unwrap_or(&self.name).item.as_str()
    }
}

impl Operation {
    /// Looks up a variable definition by name.
    pub fn variable_definition(&self, name: &str) -> Option<&VariableDefinition> {
        self.variable_definitions
            .iter()
            .find(|(n, _)| n.item == name)
            .map(|(_, def)| def)
    }
}
