//! Query execution
//!
//! The executor selects the operation, coerces the variables and resolves the
//! selection set against the root value. Sibling fields and list elements are
//! resolved concurrently on the schema's [`ResolveManager`]; mutation root
//! fields run one after another in document order.

mod complete;
mod fields;
mod manager;
mod values;

use std::{any::Any, cmp::Ordering, fmt, sync::Arc};

use arcstr::ArcStr;
use fnv::FnvHashMap;
use parking_lot::Mutex;
use serde::{
    ser::{SerializeMap as _, Serializer},
    Serialize,
};
use tracing::{debug, debug_span};

use crate::{
    ast::{Definition, Document, Field, Fragment, Operation, OperationType},
    parser::{SourcePosition, Spanning},
    schema::Schema,
    tracer::Tracer,
    types::{ObjectType, Type},
    value::{Object, Value},
    GraphQLError,
};

pub(crate) use self::{
    manager::{run_catching, JobKind},
    values::variable_values,
};
pub use self::{
    manager::{ResolveManager, ResolveManagerConfig},
    values::{coerce_value, is_valid_input_value, value_from_ast},
};

/// Per-request data handed to every resolver.
///
/// Resolvers downcast it to the type the host passed in.
pub type Context = Arc<dyn Any + Send + Sync>;

/// Coerced variable values of a request
pub type Variables = FnvHashMap<String, Value>;

/// Error type for errors that occur during field resolution
///
/// Field errors are represented by a human-readable error message and an
/// optional `Value` structure containing additional information.
///
/// They can be converted to from any type that implements `std::fmt::Display`,
/// which makes error chaining with the `?` operator a breeze:
///
/// ```rust
/// # use graphql_runtime::FieldError;
/// fn get_string(data: Vec<u8>) -> Result<String, FieldError> {
///     let s = String::from_utf8(data)?;
///     Ok(s)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: Value,
}

impl<T: fmt::Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            extensions: Value::null(),
        }
    }
}

impl FieldError {
    /// Construct a new error with additional data
    ///
    /// The `extensions` are added to the `"extensions"` field of the error
    /// object in the JSON response:
    ///
    /// ```json
    /// {
    ///   "errors": [
    ///     "message": "Could not open connection to the database",
    ///     "locations": [{"line": 2, "column": 4}],
    ///     "extensions": {
    ///       "internal_error": "Connection refused"
    ///     }
    ///   ]
    /// }
    /// ```
    ///
    /// If the argument is `Value::null()`, no extra data will be included.
    pub fn new<T: fmt::Display>(e: T, extensions: Value) -> Self {
        Self {
            message: e.to_string(),
            extensions,
        }
    }

    /// Returns the `"message"` field of this [`FieldError`].
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `"extensions"` field of this [`FieldError`].
    ///
    /// If there are no `"extensions"`, then `Value::Null` will be returned.
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

/// The result of resolving the value of a field of type `T`
pub type FieldResult<T> = Result<T, FieldError>;

/// Segment of the response path of a field.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Response key of an object field.
    Key(String),
    /// Position in a list.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Error type for errors that occur during query execution
///
/// All execution errors contain the source position in the query of the field
/// that failed to resolve. It also contains the field stack.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionError {
    location: SourcePosition,
    path: Vec<PathSegment>,
    error: FieldError,
}

impl Eq for ExecutionError {}

impl PartialOrd for ExecutionError {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExecutionError {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.location, &self.path, &self.error.message).cmp(&(
            &other.location,
            &other.path,
            &other.error.message,
        ))
    }
}

impl ExecutionError {
    /// Construct a new execution error occuring at the beginning of the query
    pub fn at_origin(error: FieldError) -> Self {
        Self::new(SourcePosition::new_origin(), vec![], error)
    }

    #[doc(hidden)]
    pub fn new(location: SourcePosition, path: Vec<PathSegment>, error: FieldError) -> Self {
        Self {
            location,
            path,
            error,
        }
    }

    /// The error message
    pub fn error(&self) -> &FieldError {
        &self.error
    }

    /// The source location _in the query_ of the field that failed to resolve
    pub fn location(&self) -> &SourcePosition {
        &self.location
    }

    /// The path of fields leading to the field that generated this error
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }
}

impl Serialize for ExecutionError {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        let mut map = ser.serialize_map(Some(4))?;

        map.serialize_entry("message", self.error.message())?;
        map.serialize_entry("locations", &[self.location])?;
        map.serialize_entry("path", &self.path)?;
        if !self.error.extensions().is_null() {
            map.serialize_entry("extensions", self.error.extensions())?;
        }

        map.end()
    }
}

/// Arguments of a field resolver.
pub struct ResolveParams {
    /// The value of the parent object.
    pub source: Value,
    /// Coerced arguments; absent arguments without a default are left out.
    pub args: Object,
    /// Information about the field being resolved.
    pub info: ResolveInfo,
    /// The request context.
    pub context: Context,
}

impl ResolveParams {
    /// Looks up a coerced argument.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get_field_value(name)
    }
}

impl fmt::Debug for ResolveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveParams")
            .field("source", &self.source)
            .field("args", &self.args)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Information about the field being resolved and the running execution.
#[derive(Clone)]
pub struct ResolveInfo {
    field_name: ArcStr,
    field_asts: Vec<Arc<Spanning<Field>>>,
    return_type: Type,
    parent_type: Arc<ObjectType>,
    path: Vec<PathSegment>,
    exec: Arc<ExecutionState>,
}

impl ResolveInfo {
    /// Name of the field, not its alias.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Every selection of the field merged under the response key.
    pub fn field_asts(&self) -> &[Arc<Spanning<Field>>] {
        &self.field_asts
    }

    /// Declared type of the field.
    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    /// Object type the field is selected on.
    pub fn parent_type(&self) -> &Arc<ObjectType> {
        &self.parent_type
    }

    /// Response path of the field.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// The schema being executed.
    pub fn schema(&self) -> &Schema {
        &self.exec.schema
    }

    /// Looks up a fragment definition of the document.
    pub fn fragment_by_name(&self, name: &str) -> Option<&Fragment> {
        self.exec.fragments.get(name).map(|f| &f.item)
    }

    /// The root value the operation executes against.
    pub fn root_value(&self) -> &Value {
        &self.exec.root_value
    }

    /// The operation being executed.
    pub fn operation(&self) -> &Operation {
        &self.exec.operation.item
    }

    /// Coerced variable values.
    pub fn variable_values(&self) -> &Variables {
        &self.exec.variables
    }

    /// The request context.
    pub fn context(&self) -> &Context {
        &self.exec.context
    }

    fn location(&self) -> SourcePosition {
        self.field_asts
            .first()
            .map_or_else(SourcePosition::new_origin, |f| f.span.start)
    }
}

impl fmt::Debug for ResolveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveInfo")
            .field("field_name", &self.field_name)
            .field("return_type", &self.return_type)
            .field("parent_type", &self.parent_type.name())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// State shared by every field of one execution.
pub(crate) struct ExecutionState {
    schema: Schema,
    fragments: FnvHashMap<String, Arc<Spanning<Fragment>>>,
    operation: Arc<Spanning<Operation>>,
    variables: Variables,
    root_value: Value,
    context: Context,
    errors: Mutex<Vec<ExecutionError>>,
    manager: ResolveManager,
    tracer: Arc<dyn Tracer>,
}

impl ExecutionState {
    fn push_error(&self, location: SourcePosition, path: Vec<PathSegment>, error: FieldError) {
        self.errors
            .lock()
            .push(ExecutionError::new(location, path, error));
    }
}

/// Picks the operation to run.
pub(crate) fn select_operation<'d>(
    document: &'d Document,
    operation_name: Option<&str>,
) -> Result<&'d Arc<Spanning<Operation>>, GraphQLError> {
    let mut operation = None;
    for def in document {
        if let Definition::Operation(op) = def {
            let name = op.item.name.as_ref().map(|n| n.item.as_str());
            match operation_name {
                Some(wanted) if name == Some(wanted) => return Ok(op),
                Some(_) => {}
                None if operation.is_some() => {
                    return Err(GraphQLError::MultipleOperationsProvided);
                }
                None => operation = Some(op),
            }
        }
    }

    match (operation, operation_name) {
        (Some(op), _) => Ok(op),
        (None, Some(name)) => Err(GraphQLError::UnknownOperationName(name.into())),
        (None, None) => Err(GraphQLError::NoOperationProvided),
    }
}

/// Root object type of the operation.
pub(crate) fn operation_root_type(
    schema: &Schema,
    operation: &Operation,
) -> Result<Arc<ObjectType>, GraphQLError> {
    match operation.operation_type {
        OperationType::Query => Ok(schema.query_type().clone()),
        OperationType::Mutation => schema
            .mutation_type()
            .cloned()
            .ok_or(GraphQLError::NotConfiguredForMutations),
        OperationType::Subscription => Err(GraphQLError::IsSubscription),
    }
}

/// Executes a document that already passed validation.
pub(crate) fn execute_validated_query(
    document: &Document,
    operation_name: Option<&str>,
    schema: &Schema,
    variables: &Variables,
    root_value: Value,
    context: Context,
    tracer: Arc<dyn Tracer>,
) -> Result<(Value, Vec<ExecutionError>), GraphQLError> {
    let operation = select_operation(document, operation_name)?;
    let root_type = operation_root_type(schema, &operation.item)?;
    debug!(
        operation = operation_name.unwrap_or_default(),
        kind = ?operation.item.operation_type,
        "selected operation",
    );

    let variables =
        variable_values(schema, &operation.item.variable_definitions, variables)
            .map_err(GraphQLError::ValidationError)?;

    let fragments = document
        .iter()
        .filter_map(|def| match def {
            Definition::Fragment(f) => Some((f.item.name.item.clone(), f.clone())),
            Definition::Operation(_) => None,
        })
        .collect();

    let state = Arc::new(ExecutionState {
        schema: schema.clone(),
        fragments,
        operation: operation.clone(),
        variables,
        root_value: root_value.clone(),
        context,
        errors: Mutex::new(vec![]),
        manager: schema.manager().clone(),
        tracer,
    });

    let span = debug_span!("execute", root = root_type.name());
    let data = span.in_scope(|| {
        let fields = fields::collect_root_fields(&state, &root_type, &operation.item.selection_set);
        let serial = operation.item.operation_type == OperationType::Mutation;
        complete::execute_fields(&state, &root_type, &root_value, fields, &[], serial)
    });

    let mut errors = std::mem::take(&mut *state.errors.lock());
    errors.sort();

    Ok((data.map_or(Value::Null, Value::Object), errors))
}
