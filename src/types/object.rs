use std::{fmt, sync::Arc};

use arcstr::ArcStr;

use crate::{
    executor::ResolveInfo,
    types::{
        assert_valid_name, Field, FieldMap, InterfaceType, IsTypeOfFn, Thunk, ThunkCell,
    },
    value::Value,
};

/// Definition of an object type.
pub struct ObjectConfig {
    name: ArcStr,
    description: Option<ArcStr>,
    fields: Thunk<FieldMap>,
    interfaces: Thunk<Vec<Arc<InterfaceType>>>,
    is_type_of: Option<IsTypeOfFn>,
}

impl ObjectConfig {
    /// Starts the definition of an object named `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Thunk::default(),
            interfaces: Thunk::default(),
            is_type_of: None,
        }
    }

    /// Sets the description of the object.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field.
    ///
    /// Fields added after a [`ObjectConfig::fields_thunk`] are appended to the
    /// map the thunk produces.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.amend(move |fields| fields.insert(field.clone()));
        self
    }

    /// Provides the fields lazily, replacing any fields added before.
    ///
    /// The function runs once, when the fields are first needed, so it may
    /// refer to types declared after this one.
    #[must_use]
    pub fn fields_thunk<F>(mut self, f: F) -> Self
    where
        F: Fn() -> FieldMap + Send + Sync + 'static,
    {
        self.fields = Thunk::lazy(f);
        self
    }

    /// Declares an implemented interface.
    #[must_use]
    pub fn interface(mut self, interface: Arc<InterfaceType>) -> Self {
        self.interfaces
            .amend(move |interfaces| interfaces.push(interface.clone()));
        self
    }

    /// Provides the implemented interfaces lazily.
    #[must_use]
    pub fn interfaces_thunk<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Vec<Arc<InterfaceType>> + Send + Sync + 'static,
    {
        self.interfaces = Thunk::lazy(f);
        self
    }

    /// Sets the check used to tell whether a runtime value is of this type.
    #[must_use]
    pub fn is_type_of<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ResolveInfo) -> bool + Send + Sync + 'static,
    {
        self.is_type_of = Some(Arc::new(f));
        self
    }
}

/// Object type
///
/// Fields and interfaces are resolved on first access and cached; the cache
/// is shared by every schema and execution using this handle.
pub struct ObjectType {
    name: ArcStr,
    description: Option<ArcStr>,
    fields: ThunkCell<FieldMap>,
    interfaces: ThunkCell<Vec<Arc<InterfaceType>>>,
    is_type_of: Option<IsTypeOfFn>,
    error: Option<String>,
}

impl ObjectType {
    /// Builds an object type from its definition.
    pub fn new(config: ObjectConfig) -> Arc<Self> {
        Arc::new(Self {
            error: assert_valid_name(&config.name).err(),
            name: config.name,
            description: config.description,
            fields: ThunkCell::new(config.fields),
            interfaces: ThunkCell::new(config.interfaces),
            is_type_of: config.is_type_of,
        })
    }

    /// The name of the object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description of the object.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The definition problem found at construction, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Snapshot of the fields.
    pub fn fields(&self) -> Arc<FieldMap> {
        self.fields.get()
    }

    /// Snapshot of the implemented interfaces.
    pub fn interfaces(&self) -> Arc<Vec<Arc<InterfaceType>>> {
        self.interfaces.get()
    }

    /// Does this object declare the interface named `name`?
    pub fn implements(&self, name: &str) -> bool {
        self.interfaces().iter().any(|i| i.name() == name)
    }

    /// The `is_type_of` check, if defined.
    pub fn is_type_of(&self) -> Option<&IsTypeOfFn> {
        self.is_type_of.as_ref()
    }

    /// Adds a field after construction.
    ///
    /// Executions started afterwards see the new field; running ones keep the
    /// snapshot they already hold.
    pub fn add_field_config(&self, name: impl Into<ArcStr>, field: Field) {
        let field = Field {
            name: name.into(),
            ..field
        };
        self.fields.amend(move |fields| fields.insert(field.clone()));
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
