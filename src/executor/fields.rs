//! Field collection: merging a selection set into response keys.

use std::sync::Arc;

use fnv::FnvHashSet;
use indexmap::IndexMap;

use crate::{
    ast::{Directive, Field, Selection},
    executor::{values, ExecutionState},
    parser::Spanning,
    types::{ObjectType, Type},
};

/// Field selections grouped by response key, in first-seen order.
pub(super) type FieldGroups = IndexMap<String, Vec<Arc<Spanning<Field>>>>;

/// Collects the fields of the operation's selection set.
pub(super) fn collect_root_fields(
    state: &ExecutionState,
    root_type: &Arc<ObjectType>,
    selection_set: &[Selection],
) -> FieldGroups {
    let mut fields = FieldGroups::default();
    collect_fields(
        state,
        root_type,
        selection_set,
        &mut fields,
        &mut FnvHashSet::default(),
    );
    fields
}

/// Collects the sub-selections of every merged field AST on `object`.
pub(super) fn collect_subfields(
    state: &ExecutionState,
    object: &Arc<ObjectType>,
    field_asts: &[Arc<Spanning<Field>>],
) -> FieldGroups {
    let mut fields = FieldGroups::default();
    let mut visited = FnvHashSet::default();
    for selection_set in field_asts
        .iter()
        .filter_map(|f| f.item.selection_set.as_deref())
    {
        collect_fields(state, object, selection_set, &mut fields, &mut visited);
    }
    fields
}

fn collect_fields(
    state: &ExecutionState,
    object: &Arc<ObjectType>,
    selection_set: &[Selection],
    fields: &mut FieldGroups,
    visited_fragments: &mut FnvHashSet<String>,
) {
    for selection in selection_set {
        match selection {
            Selection::Field(f) => {
                if !should_include(state, &f.item.directives) {
                    continue;
                }
                fields
                    .entry(f.item.response_key().to_owned())
                    .or_default()
                    .push(f.clone());
            }
            Selection::InlineFragment(frag) => {
                let frag = &frag.item;
                if !should_include(state, &frag.directives)
                    || !does_fragment_condition_match(
                        state,
                        frag.type_condition.as_ref().map(|c| c.item.as_str()),
                        object,
                    )
                {
                    continue;
                }
                collect_fields(state, object, &frag.selection_set, fields, visited_fragments);
            }
            Selection::FragmentSpread(spread) => {
                let name = &spread.item.name.item;
                if visited_fragments.contains(name)
                    || !should_include(state, &spread.item.directives)
                {
                    continue;
                }
                visited_fragments.insert(name.clone());

                let Some(fragment) = state.fragments.get(name) else {
                    continue;
                };
                let fragment = &fragment.item;
                if !should_include(state, &fragment.directives)
                    || !does_fragment_condition_match(
                        state,
                        Some(&fragment.type_condition.item),
                        object,
                    )
                {
                    continue;
                }
                collect_fields(
                    state,
                    object,
                    &fragment.selection_set,
                    fields,
                    visited_fragments,
                );
            }
        }
    }
}

/// Evaluates `@skip` and `@include`; `@skip` wins when both are present.
fn should_include(state: &ExecutionState, directives: &[Spanning<Directive>]) -> bool {
    let condition = |name: &str| {
        let directive = directives.iter().find(|d| d.item.name.item == name)?;
        let definition = state.schema.directive_by_name(name)?;
        let args = values::argument_values(
            &definition.arguments,
            &directive.item.arguments,
            &state.variables,
        );
        args.get_field_value("if").and_then(|v| v.as_bool())
    };

    if let Some(skip) = condition("skip") {
        return !skip;
    }
    condition("include").unwrap_or(true)
}

fn does_fragment_condition_match(
    state: &ExecutionState,
    type_condition: Option<&str>,
    object: &Arc<ObjectType>,
) -> bool {
    let Some(condition) = type_condition else {
        return true;
    };
    match state.schema.type_by_name(condition) {
        Some(Type::Object(o)) => o.name() == object.name(),
        Some(t) if t.is_abstract() => state.schema.is_possible_type(t, object.name()),
        _ => false,
    }
}
