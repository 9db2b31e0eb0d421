use std::{fmt, sync::Arc};

use arcstr::ArcStr;

use crate::{
    ast::InputValue,
    types::{assert_valid_name, DeprecationStatus},
    value::Value,
};

/// Metadata for a single value in an enum
#[derive(Debug, Clone)]
pub struct EnumValue {
    /// The name of the enum value
    ///
    /// This is the string literal representation of the enum in responses.
    pub name: ArcStr,
    /// The internal value resolvers produce and receive for this name.
    pub value: Value,
    /// The optional description of the enum value.
    ///
    /// Note: this is not the description of the enum itself; it's the
    /// description of this enum _value_.
    pub description: Option<ArcStr>,
    /// Whether the field is deprecated or not, with an optional reason.
    pub deprecation_status: DeprecationStatus,
}

impl EnumValue {
    /// Constructs a new [`EnumValue`] whose internal value is its name.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        let name = name.into();
        Self {
            value: Value::String(name.to_string()),
            name,
            description: None,
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Sets the internal value.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the `description` of this [`EnumValue`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets this [`EnumValue`] as deprecated with an optional `reason`.
    ///
    /// Overwrites any previously set deprecation reason.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<&str>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason.map(Into::into));
        self
    }
}

/// Definition of an enum type.
pub struct EnumConfig {
    name: ArcStr,
    description: Option<ArcStr>,
    values: Vec<EnumValue>,
}

impl EnumConfig {
    /// Starts the definition of an enum named `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: vec![],
        }
    }

    /// Sets the description of the enum.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a value, keeping declaration order.
    #[must_use]
    pub fn value(mut self, value: EnumValue) -> Self {
        self.values.push(value);
        self
    }
}

/// Enum type
pub struct EnumType {
    name: ArcStr,
    description: Option<ArcStr>,
    values: Vec<EnumValue>,
    error: Option<String>,
}

impl EnumType {
    /// Builds an enum type from its definition.
    pub fn new(config: EnumConfig) -> Arc<Self> {
        let error = assert_valid_name(&config.name)
            .and_then(|()| {
                config
                    .values
                    .iter()
                    .try_for_each(|v| assert_valid_name(&v.name))
            })
            .err();
        Arc::new(Self {
            name: config.name,
            description: config.description,
            values: config.values,
            error,
        })
    }

    /// The name of the enum.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description of the enum.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The definition problem found at construction, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The values, in declaration order.
    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// Looks up a value by name.
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Maps an internal value to its name.
    pub fn serialize(&self, value: &Value) -> Value {
        self.values
            .iter()
            .find(|v| &v.value == value)
            .map_or(Value::Null, |v| Value::String(v.name.to_string()))
    }

    /// Maps a name given as a variable value to its internal value.
    pub fn parse_value(&self, value: &Value) -> Value {
        value
            .as_str()
            .and_then(|name| self.value_by_name(name))
            .map_or(Value::Null, |v| v.value.clone())
    }

    /// Maps an enum literal to its internal value.
    pub fn parse_literal(&self, literal: &InputValue) -> Value {
        literal
            .as_enum_value()
            .and_then(|name| self.value_by_name(name))
            .map_or(Value::Null, |v| v.value.clone())
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{EnumConfig, EnumType, EnumValue};
    use crate::{ast::InputValue, value::Value};

    fn color() -> std::sync::Arc<EnumType> {
        EnumType::new(
            EnumConfig::new("Color")
                .value(EnumValue::new("RED").value(0))
                .value(EnumValue::new("GREEN").value(1))
                .value(EnumValue::new("BLUE")),
        )
    }

    #[test]
    fn serializes_internal_values() {
        let color = color();

        assert_eq!(color.serialize(&Value::Int(1)), Value::from("GREEN"));
        assert_eq!(color.serialize(&Value::from("BLUE")), Value::from("BLUE"));
        assert_eq!(color.serialize(&Value::Int(9)), Value::Null);
    }

    #[test]
    fn parses_names() {
        let color = color();

        assert_eq!(color.parse_value(&Value::from("RED")), Value::Int(0));
        assert_eq!(color.parse_value(&Value::Int(0)), Value::Null);
        assert_eq!(color.parse_literal(&InputValue::Enum("GREEN".into())), Value::Int(1));
        assert_eq!(color.parse_literal(&InputValue::String("GREEN".into())), Value::Null);
    }

    #[test]
    fn rejects_invalid_value_names() {
        let broken = EnumType::new(EnumConfig::new("Broken").value(EnumValue::new("not-ok")));

        assert_eq!(
            broken.error(),
            Some("Names must match /^[_a-zA-Z][_a-zA-Z0-9]*$/ but \"not-ok\" does not."),
        );
    }
}
