//! A GraphQL runtime for schemas declared in code.
//!
//! A host builds its named types ([`ObjectType`], [`InterfaceType`],
//! [`UnionType`], [`EnumType`], [`InputObjectType`], [`ScalarType`]) as shared
//! handles, assembles them into a [`Schema`] and hands query text to
//! [`graphql`]. The query is parsed, checked against the schema by the
//! validation rules and executed, with sibling fields resolved concurrently on
//! the schema's resolve manager.
//!
//! ```rust
//! use graphql_runtime::{graphql, Field, ObjectConfig, ObjectType, Params, Schema, SchemaConfig, Type};
//!
//! let query = ObjectType::new(
//!     ObjectConfig::new("Query")
//!         .field(Field::new("hello", Type::string()).resolve(|_| Ok("world".into()))),
//! );
//! let schema = Schema::new(SchemaConfig::new(query)).unwrap();
//!
//! let response = graphql(&schema, Params::new("{ hello }"));
//! assert_eq!(
//!     serde_json::to_string(&response).unwrap(),
//!     r#"{"data":{"hello":"world"}}"#,
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod complexity;
pub mod executor;
pub mod http;
pub mod parser;
pub mod schema;
pub mod tracer;
mod types;
pub mod validation;
mod value;

#[cfg(test)]
mod executor_tests;

use std::{error::Error as StdError, sync::Arc};

use derive_more::with_trait::Display;
use itertools::Itertools as _;
use serde::{ser::Serializer, Serialize};
use tracing::debug;

use crate::{executor::execute_validated_query, parser::parse_document_source};

pub use crate::{
    ast::{
        Definition, Directive, Document, Field as FieldNode, Fragment, FragmentSpread,
        InlineFragment, InputValue, Operation, OperationType, OwnedDocument, Selection,
        Type as TypeNode, VariableDefinition,
    },
    complexity::query_complexity,
    executor::{
        coerce_value, is_valid_input_value, Context, ExecutionError, FieldError, FieldResult,
        PathSegment, ResolveInfo, ResolveManagerConfig, ResolveParams, Variables,
    },
    http::{GraphQLBatchRequest, GraphQLBatchResponse, GraphQLRequest, GraphQLResponse},
    parser::{ParseError, SourcePosition, Span, Spanning},
    schema::{DirectiveLocation, DirectiveType, Schema, SchemaBuildError, SchemaConfig},
    tracer::{LogTracer, NoopTracer, Tracer},
    types::{
        is_valid_name, Argument, DeprecationStatus, EnumConfig, EnumType, EnumValue, Field,
        FieldMap, InputObjectConfig, InputObjectType, InterfaceConfig, InterfaceType,
        IsTypeOfFn, ObjectConfig, ObjectType, ResolveFn, ResolveTypeFn, ScalarConfig,
        ScalarType, Thunk, Type, TypeKind, UnionConfig, UnionType,
    },
    validation::{validate, RuleError},
    value::{HostValue, Object, Value},
};

/// An error that prevented query execution
#[allow(missing_docs)]
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum GraphQLError {
    #[display("{_0}")]
    ParseError(ParseError),
    #[display("{}", _0.iter().join("\n"))]
    ValidationError(Vec<RuleError>),
    #[display("Must provide an operation.")]
    NoOperationProvided,
    #[display("Must provide operation name if query contains multiple operations.")]
    MultipleOperationsProvided,
    #[display("Unknown operation named \"{_0}\".")]
    UnknownOperationName(String),
    #[display("Schema is not configured for mutations")]
    NotConfiguredForMutations,
    #[display("Schema is not configured to execute subscription operation.")]
    IsSubscription,
    #[display("{}", _0.join("\n"))]
    SchemaError(Vec<String>),
}

impl StdError for GraphQLError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::ParseError(e) => Some(e),
            Self::ValidationError(errs) => Some(errs.first()?),
            Self::NoOperationProvided
            | Self::MultipleOperationsProvided
            | Self::UnknownOperationName(_)
            | Self::NotConfiguredForMutations
            | Self::IsSubscription
            | Self::SchemaError(_) => None,
        }
    }
}

impl From<ParseError> for GraphQLError {
    fn from(err: ParseError) -> Self {
        Self::ParseError(err)
    }
}

impl Serialize for GraphQLError {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Helper<'m> {
            message: &'m str,
        }

        match self {
            Self::ValidationError(errs) => errs.serialize(ser),
            Self::SchemaError(messages) => ser.collect_seq(
                messages
                    .iter()
                    .map(|message| Helper { message }),
            ),
            Self::ParseError(_)
            | Self::NoOperationProvided
            | Self::MultipleOperationsProvided
            | Self::UnknownOperationName(_)
            | Self::NotConfiguredForMutations
            | Self::IsSubscription => [Helper {
                message: &self.to_string(),
            }]
            .serialize(ser),
        }
    }
}

/// Data and field errors of an executed operation, or the request-level error
/// that prevented execution.
pub type ExecutionResult = Result<(Value, Vec<ExecutionError>), GraphQLError>;

/// Everything [`graphql`] needs besides the schema.
#[derive(Clone)]
pub struct Params {
    /// Query document text.
    pub request_string: String,
    /// Raw variable values, coerced against the operation's definitions.
    pub variable_values: Variables,
    /// Operation to run when the document holds more than one.
    pub operation_name: Option<String>,
    /// Source value of the root fields.
    pub root_value: Value,
    /// Request context handed to every resolver.
    pub context: Context,
    /// Observer of the query and its fields.
    pub tracer: Arc<dyn Tracer>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            request_string: String::new(),
            variable_values: Variables::default(),
            operation_name: None,
            root_value: Value::Null,
            context: Arc::new(()),
            tracer: Arc::new(NoopTracer),
        }
    }
}

impl Params {
    /// Parameters running `request_string` with everything else defaulted.
    pub fn new(request_string: impl Into<String>) -> Self {
        Self {
            request_string: request_string.into(),
            ..Self::default()
        }
    }
}

/// Parses, validates and executes a request.
///
/// Request-level failures end up in the response's error list with `data`
/// set to `null`.
pub fn graphql(schema: &Schema, params: Params) -> GraphQLResponse {
    let trace = params
        .tracer
        .trace_query(&params.request_string, params.operation_name.as_deref());

    let result = parse_validate_execute(schema, &params);

    match &result {
        Ok((_, errors)) => trace.finish(errors),
        Err(e) => {
            debug!(error = %e, "request failed before execution");
            trace.finish(&[]);
        }
    }

    GraphQLResponse::from_result(result)
}

fn parse_validate_execute(schema: &Schema, params: &Params) -> ExecutionResult {
    check_schema(schema)?;

    let document = parse_document_source(&params.request_string)?;

    let errors = validate(schema, &document);
    if !errors.is_empty() {
        return Err(GraphQLError::ValidationError(errors));
    }

    execute_validated_query(
        &document,
        params.operation_name.as_deref(),
        schema,
        &params.variable_values,
        params.root_value.clone(),
        params.context.clone(),
        params.tracer.clone(),
    )
}

/// Executes an already validated document.
///
/// Use [`validate`] first: fields the schema does not know are skipped
/// silently rather than reported.
pub fn execute(
    schema: &Schema,
    document: &Document,
    operation_name: Option<&str>,
    variables: &Variables,
    root_value: Value,
    context: Context,
) -> ExecutionResult {
    check_schema(schema)?;

    execute_validated_query(
        document,
        operation_name,
        schema,
        variables,
        root_value,
        context,
        Arc::new(NoopTracer),
    )
}

fn check_schema(schema: &Schema) -> Result<(), GraphQLError> {
    if schema.errors().is_empty() {
        Ok(())
    } else {
        Err(GraphQLError::SchemaError(schema.errors().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{GraphQLError, ParseError};

    #[test]
    fn request_errors_serialize_as_message_lists() {
        assert_eq!(
            serde_json::to_value(GraphQLError::MultipleOperationsProvided).unwrap(),
            json!([{
                "message": "Must provide operation name if query contains multiple operations.",
            }]),
        );
        assert_eq!(
            serde_json::to_value(GraphQLError::UnknownOperationName("Foo".into())).unwrap(),
            json!([{"message": "Unknown operation named \"Foo\"."}]),
        );
        assert_eq!(
            serde_json::to_value(GraphQLError::SchemaError(vec!["a".into(), "b".into()]))
                .unwrap(),
            json!([{"message": "a"}, {"message": "b"}]),
        );
    }

    #[test]
    fn parse_errors_convert() {
        let err: GraphQLError = ParseError::new("Unexpected end of input").into();

        assert_eq!(err.to_string(), "Unexpected end of input");
    }
}
