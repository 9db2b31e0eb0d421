//! Query validation related methods and data structures

mod context;
mod input_value;
mod multi_visitor;
mod rules;
mod traits;
mod visitor;

#[cfg(test)]
pub(crate) mod test_harness;

use tracing::debug;

use crate::{ast::Document, schema::Schema};

pub use self::{
    context::{RuleError, ValidatorContext},
    input_value::is_valid_literal_value,
    multi_visitor::MultiVisitor,
    rules::visit_all_rules,
    traits::Visitor,
    visitor::visit,
};

/// Checks a parsed document against the schema with every validation rule.
///
/// Returns all problems found, ordered by their first location.
pub fn validate(schema: &Schema, document: &Document) -> Vec<RuleError> {
    let _span = tracing::debug_span!("validate").entered();

    let mut ctx = ValidatorContext::new(schema, document);
    visit_all_rules(&mut ctx, document);
    let errors = ctx.into_errors();

    debug!(errors = errors.len(), "validated document");
    errors
}
