//! Static cost estimation of operations

use fnv::FnvHashMap;

use crate::{
    ast::{Definition, Document, Fragment, Selection},
    executor::{operation_root_type, select_operation, variable_values, Variables},
    schema::Schema,
    types::Type,
    GraphQLError,
};

/// Sums the [`cost`](crate::Field::cost) of every field an operation selects.
///
/// Every selected field counts once, whatever number of list items it
/// produces at runtime. An inline fragment counts towards its type condition
/// when that type can overlap with the enclosing type and is skipped
/// otherwise. Fields unknown to the schema cost nothing.
///
/// Fails like execution would when the operation cannot be selected or the
/// variables do not coerce.
pub fn query_complexity(
    schema: &Schema,
    document: &Document,
    operation_name: Option<&str>,
    variables: &Variables,
) -> Result<usize, GraphQLError> {
    let operation = select_operation(document, operation_name)?;
    let root_type = operation_root_type(schema, &operation.item)?;
    variable_values(schema, &operation.item.variable_definitions, variables)
        .map_err(GraphQLError::ValidationError)?;

    let fragments = document
        .iter()
        .filter_map(|def| match def {
            Definition::Fragment(f) => Some((f.item.name.item.as_str(), &f.item)),
            Definition::Operation(_) => None,
        })
        .collect();

    let cost = CostCounter { schema, fragments }.selection_set_cost(
        &operation.item.selection_set,
        &Type::Object(root_type),
        &mut vec![],
    );
    Ok(cost)
}

struct CostCounter<'a> {
    schema: &'a Schema,
    fragments: FnvHashMap<&'a str, &'a Fragment>,
}

impl<'a> CostCounter<'a> {
    /// `visiting` holds the fragments being expanded, so a cyclic spread is
    /// counted once.
    fn selection_set_cost(
        &self,
        selection_set: &'a [Selection],
        parent: &Type,
        visiting: &mut Vec<&'a str>,
    ) -> usize {
        let mut cost = 0;

        for selection in selection_set {
            match selection {
                Selection::Field(field) => {
                    let Some(def) = self.schema.field_def(parent, &field.item.name.item) else {
                        continue;
                    };
                    cost += def.cost;
                    if let Some(set) = &field.item.selection_set {
                        cost += self.selection_set_cost(set, def.field_type.named_type(), visiting);
                    }
                }
                Selection::InlineFragment(inline) => {
                    let narrowed = match &inline.item.type_condition {
                        None => Some(parent),
                        Some(cond) => self
                            .schema
                            .type_by_name(&cond.item)
                            .filter(|t| self.schema.type_overlap(parent, t)),
                    };
                    if let Some(t) = narrowed {
                        cost += self.selection_set_cost(&inline.item.selection_set, t, visiting);
                    }
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.item.name.item.as_str();
                    if visiting.contains(&name) {
                        continue;
                    }
                    let Some(fragment) = self.fragments.get(name) else {
                        continue;
                    };
                    let Some(t) = self.schema.type_by_name(&fragment.type_condition.item) else {
                        continue;
                    };

                    visiting.push(name);
                    cost += self.selection_set_cost(&fragment.selection_set, t, visiting);
                    visiting.pop();
                }
            }
        }

        cost
    }
}
