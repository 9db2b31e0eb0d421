//! Query document parsing
//!
//! Lexing and parsing is delegated to [`graphql_parser`]. This module converts
//! its query AST into this crate's [`ast`](crate::ast), attaching
//! [`SourcePosition`]s to every located node.

mod document;
mod utils;

use derive_more::with_trait::{Display, Error};

pub use self::{
    document::parse_document_source,
    utils::{SourcePosition, Span, Spanning},
};

/// Error raised when a query document cannot be parsed.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
#[display("{message}")]
pub struct ParseError {
    #[error(not(source))]
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human readable description of the syntax error.
    pub fn message(&self) -> &str {
        &self.message
    }
}
