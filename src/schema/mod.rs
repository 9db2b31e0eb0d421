//! Schema assembly and introspection

pub(crate) mod build;
pub(crate) mod introspection;
pub(crate) mod model;

pub use self::model::{DirectiveLocation, DirectiveType, Schema, SchemaBuildError, SchemaConfig};
