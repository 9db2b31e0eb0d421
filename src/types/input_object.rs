use std::{fmt, sync::Arc};

use arcstr::ArcStr;

use crate::types::{assert_valid_name, Argument, Thunk, ThunkCell};

/// Definition of an input object type.
pub struct InputObjectConfig {
    name: ArcStr,
    description: Option<ArcStr>,
    fields: Thunk<Vec<Argument>>,
}

impl InputObjectConfig {
    /// Starts the definition of an input object named `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Thunk::default(),
        }
    }

    /// Sets the description of the input object.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an input field.
    #[must_use]
    pub fn field(mut self, field: Argument) -> Self {
        self.fields.amend(move |fields| fields.push(field.clone()));
        self
    }

    /// Provides the input fields lazily, replacing any fields added before.
    #[must_use]
    pub fn fields_thunk<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Vec<Argument> + Send + Sync + 'static,
    {
        self.fields = Thunk::lazy(f);
        self
    }
}

/// Input object type
pub struct InputObjectType {
    name: ArcStr,
    description: Option<ArcStr>,
    fields: ThunkCell<Vec<Argument>>,
    error: Option<String>,
}

impl InputObjectType {
    /// Builds an input object type from its definition.
    pub fn new(config: InputObjectConfig) -> Arc<Self> {
        Arc::new(Self {
            error: assert_valid_name(&config.name).err(),
            name: config.name,
            description: config.description,
            fields: ThunkCell::new(config.fields),
        })
    }

    /// The name of the input object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description of the input object.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The definition problem found at construction, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Snapshot of the input fields, in declaration order.
    pub fn fields(&self) -> Arc<Vec<Argument>> {
        self.fields.get()
    }

    /// Looks up an input field by name.
    pub fn field(&self, name: &str) -> Option<Argument> {
        self.fields().iter().find(|f| f.name == name).cloned()
    }
}

impl fmt::Debug for InputObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputObjectType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{InputObjectConfig, InputObjectType};
    use crate::{
        types::{Argument, Type},
        value::Value,
    };

    #[test]
    fn resolves_fields() {
        let point = InputObjectType::new(
            InputObjectConfig::new("Point")
                .field(Argument::new("x", Type::non_null(Type::float())))
                .field(Argument::new("y", Type::float()).default_value(0.0)),
        );

        let names = point
            .fields()
            .iter()
            .map(|f| f.name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(
            point.field("y").and_then(|f| f.default_value),
            Some(Value::Float(0.0)),
        );
        assert!(point.field("z").is_none());
    }
}
