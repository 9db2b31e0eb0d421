use std::{
    fmt,
    sync::{Arc, Weak},
};

use arcstr::ArcStr;
use fnv::FnvHashSet;
use parking_lot::RwLock;

use crate::{
    executor::ResolveInfo,
    types::{assert_valid_name, Field, FieldMap, ObjectType, ResolveTypeFn, Thunk, ThunkCell},
    value::Value,
};

/// Definition of an interface type.
pub struct InterfaceConfig {
    name: ArcStr,
    description: Option<ArcStr>,
    fields: Thunk<FieldMap>,
    resolve_type: Option<ResolveTypeFn>,
}

impl InterfaceConfig {
    /// Starts the definition of an interface named `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Thunk::default(),
            resolve_type: None,
        }
    }

    /// Sets the description of the interface.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.amend(move |fields| fields.insert(field.clone()));
        self
    }

    /// Provides the fields lazily, replacing any fields added before.
    #[must_use]
    pub fn fields_thunk<F>(mut self, f: F) -> Self
    where
        F: Fn() -> FieldMap + Send + Sync + 'static,
    {
        self.fields = Thunk::lazy(f);
        self
    }

    /// Sets the function picking the concrete object type of a value.
    ///
    /// Without it, the `is_type_of` checks of the implementing objects are
    /// tried in turn.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ResolveInfo) -> Option<Arc<ObjectType>> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }
}

/// Interface type
///
/// Implementing objects register themselves when a schema containing them is
/// assembled. The interface only keeps weak handles to them.
pub struct InterfaceType {
    name: ArcStr,
    description: Option<ArcStr>,
    fields: ThunkCell<FieldMap>,
    resolve_type: Option<ResolveTypeFn>,
    implementations: RwLock<Vec<Weak<ObjectType>>>,
    possible_type_names: RwLock<Option<Arc<FnvHashSet<String>>>>,
    error: Option<String>,
}

impl InterfaceType {
    /// Builds an interface type from its definition.
    pub fn new(config: InterfaceConfig) -> Arc<Self> {
        Arc::new(Self {
            error: assert_valid_name(&config.name).err(),
            name: config.name,
            description: config.description,
            fields: ThunkCell::new(config.fields),
            resolve_type: config.resolve_type,
            implementations: RwLock::new(vec![]),
            possible_type_names: RwLock::new(None),
        })
    }

    /// The name of the interface.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description of the interface.
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

    /// The `resolve_type` function, if defined.
    pub fn resolve_type(&self) -> Option<&ResolveTypeFn> {
        self.resolve_type.as_ref()
    }

    /// Adds a field after construction.
    pub fn add_field_config(&self, name: impl Into<ArcStr>, field: Field) {
        let field = Field {
            name: name.into(),
            ..field
        };
        self.fields.amend(move |fields| fields.insert(field.clone()));
    }

    /// Registers an implementing object, ignoring repeats.
    ///
    /// The name cache is cleared only after the implementation lock is
    /// released.
    pub(crate) fn register_implementation(&self, object: &Arc<ObjectType>) {
        let added = {
            let mut implementations = self.implementations.write();
            implementations.retain(|w| w.strong_count() > 0);
            let known = implementations
                .iter()
                .filter_map(Weak::upgrade)
                .any(|o| Arc::ptr_eq(&o, object));
            if !known {
                implementations.push(Arc::downgrade(object));
            }
            !known
        };
        if added {
            *self.possible_type_names.write() = None;
        }
    }

    /// The live implementing objects, in registration order.
    pub fn implementations(&self) -> Vec<Arc<ObjectType>> {
        self.implementations
            .read()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    /// Is an object named `name` a registered implementation?
    pub fn is_possible_type(&self, name: &str) -> bool {
        if let Some(names) = &*self.possible_type_names.read() {
            return names.contains(name);
        }

        // Invalidations wait until the rebuilt set is stored.
        let mut cached = self.possible_type_names.write();
        cached
            .get_or_insert_with(|| {
                Arc::new(
                    self.implementations()
                        .iter()
                        .map(|o| o.name().to_owned())
                        .collect::<FnvHashSet<_>>(),
                )
            })
            .contains(name)
    }
}

impl fmt::Debug for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
