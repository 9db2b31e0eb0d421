use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use arcstr::ArcStr;

use crate::{ast::InputValue, types::assert_valid_name, value::Value};

/// Turns an internal value into its wire form.
pub type SerializeFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Turns a variable value into an internal value.
pub type ParseValueFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Turns a query literal into an internal value.
pub type ParseLiteralFn = Arc<dyn Fn(&InputValue) -> Value + Send + Sync>;

/// Largest integer that survives a round trip through an IEEE 754 double.
pub const MAX_INT: i64 = 9_007_199_254_740_991;

/// Smallest integer that survives a round trip through an IEEE 754 double.
pub const MIN_INT: i64 = -9_007_199_254_740_991;

/// Definition of a custom scalar.
///
/// Every coercion function returns [`Value::Null`] when it cannot coerce its
/// input.
#[derive(Default)]
pub struct ScalarConfig {
    name: ArcStr,
    description: Option<ArcStr>,
    serialize: Option<SerializeFn>,
    parse_value: Option<ParseValueFn>,
    parse_literal: Option<ParseLiteralFn>,
}

impl ScalarConfig {
    /// Starts the definition of a scalar named `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description of the scalar.
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the output coercion.
    pub fn serialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(f));
        self
    }

    /// Sets the coercion applied to variable values.
    pub fn parse_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.parse_value = Some(Arc::new(f));
        self
    }

    /// Sets the coercion applied to literals in the query.
    pub fn parse_literal<F>(mut self, f: F) -> Self
    where
        F: Fn(&InputValue) -> Value + Send + Sync + 'static,
    {
        self.parse_literal = Some(Arc::new(f));
        self
    }
}

/// Scalar type
pub struct ScalarType {
    name: ArcStr,
    description: Option<ArcStr>,
    serialize: Option<SerializeFn>,
    parse_value: Option<ParseValueFn>,
    parse_literal: Option<ParseLiteralFn>,
    error: Option<String>,
}

impl ScalarType {
    /// Builds a scalar from its definition.
    ///
    /// Definition problems are kept on the type and reported when it is
    /// added to a schema.
    pub fn new(config: ScalarConfig) -> Arc<Self> {
        let error = Self::check(&config).err();
        Arc::new(Self {
            name: config.name,
            description: config.description,
            serialize: config.serialize,
            parse_value: config.parse_value,
            parse_literal: config.parse_literal,
            error,
        })
    }

    fn check(config: &ScalarConfig) -> Result<(), String> {
        assert_valid_name(&config.name)?;
        if config.serialize.is_none() {
            return Err(format!(
                "{} must provide \"serialize\" function. If this custom Scalar is also used as an \
                 input type, ensure \"parseValue\" and \"parseLiteral\" functions are also \
                 provided.",
                config.name,
            ));
        }
        if config.parse_value.is_some() != config.parse_literal.is_some() {
            return Err(format!(
                "{} must provide both \"parseValue\" and \"parseLiteral\" functions.",
                config.name,
            ));
        }
        Ok(())
    }

    /// The name of the scalar.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description of the scalar.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The definition problem found at construction, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Coerces an internal value for the response.
    pub fn serialize(&self, value: &Value) -> Value {
        self.serialize.as_ref().map_or(Value::Null, |f| f(value))
    }

    /// Coerces a variable value.
    pub fn parse_value(&self, value: &Value) -> Value {
        self.parse_value.as_ref().map_or(Value::Null, |f| f(value))
    }

    /// Coerces a query literal.
    pub fn parse_literal(&self, literal: &InputValue) -> Value {
        self.parse_literal.as_ref().map_or(Value::Null, |f| f(literal))
    }
}

impl fmt::Debug for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn int_or_null(i: i64) -> Value {
    if (MIN_INT..=MAX_INT).contains(&i) {
        Value::Int(i)
    } else {
        Value::Null
    }
}

fn float_to_int(f: f64) -> Value {
    if f.fract() == 0.0 && f >= MIN_INT as f64 && f <= MAX_INT as f64 {
        Value::Int(f as i64)
    } else {
        Value::Null
    }
}

fn serialize_int(value: &Value) -> Value {
    match value {
        Value::Int(i) => int_or_null(*i),
        Value::Float(f) => float_to_int(*f),
        Value::Boolean(b) => Value::Int(i64::from(*b)),
        Value::String(s) => s.trim().parse::<f64>().map_or(Value::Null, float_to_int),
        _ => Value::Null,
    }
}

fn parse_int(value: &Value) -> Value {
    match value {
        Value::Int(i) => int_or_null(*i),
        Value::Float(f) => float_to_int(*f),
        _ => Value::Null,
    }
}

fn serialize_float(value: &Value) -> Value {
    match value {
        Value::Int(i) => Value::Float(*i as f64),
        Value::Float(f) => Value::Float(*f),
        Value::Boolean(b) => Value::Float(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().map_or(Value::Null, Value::Float),
        _ => Value::Null,
    }
}

fn parse_float(value: &Value) -> Value {
    match value {
        Value::Int(i) => Value::Float(*i as f64),
        Value::Float(f) => Value::Float(*f),
        _ => Value::Null,
    }
}

fn serialize_string(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.clone()),
        Value::Int(i) => Value::String(i.to_string()),
        Value::Float(f) => Value::String(f.to_string()),
        Value::Boolean(b) => Value::String(b.to_string()),
        _ => Value::Null,
    }
}

fn parse_string(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.clone()),
        _ => Value::Null,
    }
}

fn serialize_boolean(value: &Value) -> Value {
    match value {
        Value::Boolean(b) => Value::Boolean(*b),
        Value::Int(i) => Value::Boolean(*i != 0),
        Value::Float(f) => Value::Boolean(*f != 0.0),
        Value::String(s) => Value::Boolean(!(s.is_empty() || s == "false")),
        _ => Value::Null,
    }
}

fn parse_boolean(value: &Value) -> Value {
    match value {
        Value::Boolean(b) => Value::Boolean(*b),
        _ => Value::Null,
    }
}

fn parse_id(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.clone()),
        Value::Int(i) => Value::String(i.to_string()),
        _ => Value::Null,
    }
}

macro_rules! builtin_scalar {
    ($fn_name:ident, $name:literal, $description:literal, $serialize:expr, $parse_value:expr, $parse_literal:expr $(,)?) => {
        #[doc = concat!("The built-in `", $name, "` scalar.")]
        pub fn $fn_name() -> Arc<ScalarType> {
            static TYPE: OnceLock<Arc<ScalarType>> = OnceLock::new();
            TYPE.get_or_init(|| {
                ScalarType::new(
                    ScalarConfig::new($name)
                        .description($description)
                        .serialize($serialize)
                        .parse_value($parse_value)
                        .parse_literal($parse_literal),
                )
            })
            .clone()
        }
    };
}

builtin_scalar!(
    int,
    "Int",
    "The `Int` scalar type represents non-fractional signed whole numeric values. \
     Int can represent values between -(2^53 - 1) and 2^53 - 1.",
    serialize_int,
    parse_int,
    |lit: &InputValue| match lit {
        InputValue::Int(i) => int_or_null(*i),
        _ => Value::Null,
    },
);

builtin_scalar!(
    float,
    "Float",
    "The `Float` scalar type represents signed double-precision fractional values \
     as specified by [IEEE 754](http://en.wikipedia.org/wiki/IEEE_floating_point).",
    serialize_float,
    parse_float,
    |lit: &InputValue| match lit {
        InputValue::Float(f) => Value::Float(*f),
        InputValue::Int(i) => Value::Float(*i as f64),
        _ => Value::Null,
    },
);

builtin_scalar!(
    string,
    "String",
    "The `String` scalar type represents textual data, represented as UTF-8 \
     character sequences. The String type is most often used by GraphQL to \
     represent free-form human-readable text.",
    serialize_string,
    parse_string,
    |lit: &InputValue| match lit {
        InputValue::String(s) => Value::String(s.clone()),
        _ => Value::Null,
    },
);

builtin_scalar!(
    boolean,
    "Boolean",
    "The `Boolean` scalar type represents `true` or `false`.",
    serialize_boolean,
    parse_boolean,
    |lit: &InputValue| match lit {
        InputValue::Boolean(b) => Value::Boolean(*b),
        _ => Value::Null,
    },
);

builtin_scalar!(
    id,
    "ID",
    "The `ID` scalar type represents a unique identifier, often used to refetch \
     an object or as key for a cache. The ID type appears in a JSON response as a \
     String; however, it is not intended to be human-readable. When expected as an \
     input type, any string (such as `\"4\"`) or integer (such as `4`) input value \
     will be accepted as an ID.",
    serialize_string,
    parse_id,
    |lit: &InputValue| match lit {
        InputValue::String(s) => Value::String(s.clone()),
        InputValue::Int(i) => Value::String(i.to_string()),
        _ => Value::Null,
    },
);
