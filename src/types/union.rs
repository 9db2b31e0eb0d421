use std::{fmt, sync::Arc};

use arcstr::ArcStr;

use crate::{
    executor::ResolveInfo,
    types::{assert_valid_name, ObjectType, ResolveTypeFn},
    value::Value,
};

/// Definition of a union type.
pub struct UnionConfig {
    name: ArcStr,
    description: Option<ArcStr>,
    types: Vec<Arc<ObjectType>>,
    resolve_type: Option<ResolveTypeFn>,
}

impl UnionConfig {
    /// Starts the definition of a union named `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            types: vec![],
            resolve_type: None,
        }
    }

    /// Sets the description of the union.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a member object type.
    #[must_use]
    pub fn member(mut self, object: Arc<ObjectType>) -> Self {
        self.types.push(object);
        self
    }

    /// Sets the function picking the concrete member of a value.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ResolveInfo) -> Option<Arc<ObjectType>> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }
}

/// Union type
pub struct UnionType {
    name: ArcStr,
    description: Option<ArcStr>,
    types: Vec<Arc<ObjectType>>,
    resolve_type: Option<ResolveTypeFn>,
    error: Option<String>,
}

impl UnionType {
    /// Builds a union type from its definition.
    pub fn new(config: UnionConfig) -> Arc<Self> {
        let error = Self::check(&config).err();
        Arc::new(Self {
            name: config.name,
            description: config.description,
            types: config.types,
            resolve_type: config.resolve_type,
            error,
        })
    }

    fn check(config: &UnionConfig) -> Result<(), String> {
        assert_valid_name(&config.name)?;
        if config.types.is_empty() {
            return Err(format!(
                "Must provide Array of types for Union {}.",
                config.name,
            ));
        }
        if config.resolve_type.is_none() {
            if let Some(o) = config.types.iter().find(|o| o.is_type_of().is_none()) {
                return Err(format!(
                    "Union Type {} does not provide a \"resolveType\" function and possible \
                     Type {} does not provide a \"isTypeOf\" function. There is no way to \
                     resolve this possible type during execution.",
                    config.name,
                    o.name(),
                ));
            }
        }
        Ok(())
    }

    /// The name of the union.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description of the union.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The definition problem found at construction, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The member object types.
    pub fn types(&self) -> &[Arc<ObjectType>] {
        &self.types
    }

    /// The `resolve_type` function, if defined.
    pub fn resolve_type(&self) -> Option<&ResolveTypeFn> {
        self.resolve_type.as_ref()
    }

    /// Is an object named `name` a member?
    pub fn is_possible_type(&self, name: &str) -> bool {
        self.types.iter().any(|o| o.name() == name)
    }
}

impl fmt::Debug for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
