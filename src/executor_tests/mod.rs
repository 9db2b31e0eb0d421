mod directives;
mod executor;
mod interfaces_unions;
mod introspection;
mod variables;

use serde_json::Value as Json;

use crate::{graphql, Params, Schema};

/// Runs `params` against `schema` and returns the serialized response.
fn run(schema: &Schema, params: Params) -> Json {
    let response = graphql(schema, params);
    serde_json::to_value(&response).expect("response serializes")
}

fn run_query(schema: &Schema, query: &str) -> Json {
    run(schema, Params::new(query))
}
