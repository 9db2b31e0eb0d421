use std::{fmt, sync::Arc};

use arcstr::ArcStr;
use indexmap::IndexMap;

use crate::{
    executor::{FieldResult, ResolveParams},
    types::{DeprecationStatus, ResolveFn, Type},
    value::Value,
};

/// Metadata for a field
#[derive(Clone)]
pub struct Field {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub field_type: Type,
    #[doc(hidden)]
    pub resolve: Option<ResolveFn>,
    #[doc(hidden)]
    pub deprecation_status: DeprecationStatus,
    /// Complexity weight of selecting this field.
    pub cost: usize,
}

impl Field {
    /// Builds a new field with the given name and output type.
    ///
    /// Without a resolver the field reads the same-named property of its
    /// parent value.
    pub fn new(name: impl Into<ArcStr>, field_type: impl Into<Type>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: vec![],
            field_type: field_type.into(),
            resolve: None,
            deprecation_status: DeprecationStatus::Current,
            cost: 0,
        }
    }

    /// Sets the `description` of this [`Field`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an `argument` to this [`Field`].
    ///
    /// Arguments are unordered and can't contain duplicates by name.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Sets the resolver of this [`Field`].
    #[must_use]
    pub fn resolve<F>(mut self, f: F) -> Self
    where
        F: Fn(ResolveParams) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.resolve = Some(Arc::new(f));
        self
    }

    /// Sets this [`Field`] as deprecated with an optional `reason`.
    ///
    /// Overwrites any previously set deprecation reason.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<&str>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason.map(Into::into));
        self
    }

    /// Sets the complexity weight of this [`Field`].
    #[must_use]
    pub fn cost(mut self, cost: usize) -> Self {
        self.cost = cost;
        self
    }

    /// Looks up an argument definition by name.
    pub fn argument_by_name(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Returns true if the field is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        self.name.starts_with("__")
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Metadata for an argument to a field, or a field of an input object
#[derive(Debug, Clone)]
pub struct Argument {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arg_type: Type,
    #[doc(hidden)]
    pub default_value: Option<Value>,
}

impl Argument {
    /// Builds a new [`Argument`] of the given [`Type`] with the given `name`.
    pub fn new(name: impl Into<ArcStr>, arg_type: impl Into<Type>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_type: arg_type.into(),
            default_value: None,
        }
    }

    /// Sets the `description` of this [`Argument`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default value of this [`Argument`].
    ///
    /// Overwrites any previously set default value.
    #[must_use]
    pub fn default_value(mut self, val: impl Into<Value>) -> Self {
        self.default_value = Some(val.into());
        self
    }

    /// Returns true if the type is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        self.name.starts_with("__")
    }
}

/// Fields of an object or interface, keyed and ordered by name of
/// declaration.
#[derive(Clone, Debug, Default)]
pub struct FieldMap(IndexMap<ArcStr, Field>);

impl FieldMap {
    /// An empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, returning the map.
    #[must_use]
    pub fn with(mut self, field: Field) -> Self {
        self.insert(field);
        self
    }

    /// Adds a field, replacing a previous one of the same name.
    pub fn insert(&mut self, field: Field) {
        self.0.insert(field.name.clone(), field);
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.get(name)
    }

    /// Iterates over the fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.values()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Field> for FieldMap {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut map = Self::new();
        for f in iter {
            map.insert(f);
        }
        map
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = &'a Field;
    type IntoIter = indexmap::map::Values<'a, ArcStr, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}
