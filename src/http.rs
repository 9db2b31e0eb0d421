//! Utilities for building HTTP endpoints in a library-agnostic manner

use std::sync::Arc;

use serde::{
    de,
    ser::{self, SerializeMap as _},
    Deserialize, Serialize,
};

use crate::{
    executor::{Context, ExecutionError, FieldError, Variables},
    schema::Schema,
    tracer::{NoopTracer, Tracer},
    value::Value,
    ExecutionResult, Params,
};

/// The expected structure of the decoded JSON document for either POST or GET requests.
///
/// For POST, you can use Serde to deserialize the incoming JSON data directly
/// into this struct - it derives Deserialize for exactly this reason.
///
/// For GET, you will need to parse the query string and extract "query",
/// "operationName", and "variables" manually.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GraphQLRequest {
    /// GraphQL query representing this request.
    pub query: String,

    /// Optional name of the operation associated with this request.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables to execute the GraphQL operation with.
    pub variables: Option<Value>,
}

impl GraphQLRequest {
    /// Construct a new GraphQL request from parts
    pub fn new(query: String, operation_name: Option<String>, variables: Option<Value>) -> Self {
        Self {
            query,
            operation_name,
            variables,
        }
    }

    /// Returns the variables of this request; anything but an object counts
    /// as no variables.
    pub fn variables(&self) -> Variables {
        self.variables
            .as_ref()
            .and_then(Value::as_object)
            .map(|o| o.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    /// Execute the request against `schema` without tracing.
    ///
    /// This is a simple wrapper around the [`graphql`](crate::graphql)
    /// function exposed at the top level of this crate.
    pub fn execute(&self, schema: &Schema, root_value: Value, context: Context) -> GraphQLResponse {
        self.execute_traced(schema, root_value, context, Arc::new(NoopTracer))
    }

    /// Execute the request against `schema`, reporting to `tracer`.
    pub fn execute_traced(
        &self,
        schema: &Schema,
        root_value: Value,
        context: Context,
        tracer: Arc<dyn Tracer>,
    ) -> GraphQLResponse {
        crate::graphql(
            schema,
            Params {
                request_string: self.query.clone(),
                variable_values: self.variables(),
                operation_name: self.operation_name.clone(),
                root_value,
                context,
                tracer,
            },
        )
    }
}

/// Simple wrapper around the result from executing a GraphQL query
///
/// This struct implements Serialize, so you can simply serialize this
/// to JSON and send it over the wire. Use the `is_ok` method to determine
/// whether to send a 200 or 400 HTTP status code.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphQLResponse(ExecutionResult);

impl GraphQLResponse {
    /// Constructs new `GraphQLResponse` using the given result
    pub fn from_result(r: ExecutionResult) -> Self {
        Self(r)
    }

    /// Constructs an error response outside of the normal execution flow
    pub fn error(error: FieldError) -> Self {
        Self(Ok((Value::null(), vec![ExecutionError::at_origin(error)])))
    }

    /// Was the request successful or not?
    ///
    /// Note that there still might be errors in the response even though it's
    /// considered OK. This is by design in GraphQL.
    pub fn is_ok(&self) -> bool {
        self.0.is_ok()
    }

    /// The underlying execution result.
    pub fn result(&self) -> &ExecutionResult {
        &self.0
    }

    /// Takes the underlying execution result.
    pub fn into_result(self) -> ExecutionResult {
        self.0
    }
}

impl Serialize for GraphQLResponse {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Ok((res, err)) => {
                let mut map = serializer.serialize_map(None)?;

                map.serialize_entry("data", res)?;
                if !err.is_empty() {
                    map.serialize_entry("errors", err)?;
                }

                map.end()
            }
            Err(err) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("data", &Value::Null)?;
                map.serialize_entry("errors", err)?;
                map.end()
            }
        }
    }
}

/// Simple wrapper around GraphQLRequest to allow the handling of Batch requests.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GraphQLBatchRequest {
    /// A single operation request.
    Single(GraphQLRequest),

    /// A batch operation request.
    ///
    /// Empty batch is considered as invalid value, so cannot be deserialized.
    #[serde(deserialize_with = "deserialize_non_empty_batch")]
    Batch(Vec<GraphQLRequest>),
}

fn deserialize_non_empty_batch<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: de::Deserializer<'de>,
    T: Deserialize<'de>,
{
    use de::Error as _;

    let v = Vec::<T>::deserialize(deserializer)?;
    if v.is_empty() {
        Err(D::Error::invalid_length(
            0,
            &"non-empty batch of GraphQL requests",
        ))
    } else {
        Ok(v)
    }
}

impl GraphQLBatchRequest {
    /// Executes every request of the batch in order.
    pub fn execute(
        &self,
        schema: &Schema,
        root_value: Value,
        context: Context,
    ) -> GraphQLBatchResponse {
        match self {
            Self::Single(req) => {
                GraphQLBatchResponse::Single(req.execute(schema, root_value, context))
            }
            Self::Batch(reqs) => GraphQLBatchResponse::Batch(
                reqs.iter()
                    .map(|req| req.execute(schema, root_value.clone(), context.clone()))
                    .collect(),
            ),
        }
    }

    /// The operation names of the request.
    pub fn operation_names(&self) -> Vec<Option<&str>> {
        match self {
            Self::Single(req) => vec![req.operation_name.as_deref()],
            Self::Batch(reqs) => reqs.iter().map(|r| r.operation_name.as_deref()).collect(),
        }
    }
}

/// Simple wrapper around the result (GraphQLResponse) from executing a GraphQLBatchRequest
///
/// This struct implements Serialize, so you can simply serialize this
/// to JSON and send it over the wire. use the `is_ok` to determine
/// wheter to send a 200 or 400 HTTP status code.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GraphQLBatchResponse {
    /// Result of a single operation in a GraphQL request.
    Single(GraphQLResponse),
    /// Result of a batch operation in a GraphQL request.
    Batch(Vec<GraphQLResponse>),
}

impl GraphQLBatchResponse {
    /// Returns if all the GraphQLResponse in this operation are ok,
    /// you can use it to determine wheter to send a 200 or 400 HTTP status code.
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Single(resp) => resp.is_ok(),
            Self::Batch(resps) => resps.iter().all(GraphQLResponse::is_ok),
        }
    }
}
