//! Field resolution and value completion.
//!
//! Completion functions return `None` when a non-null position ended up
//! null. The error causing it is recorded exactly once, at the field or list
//! element that failed; every enclosing non-null position then passes the
//! `None` up until a nullable one turns it into `null`.

use std::{slice, sync::Arc};

use tracing::trace;

use crate::{
    ast::Field as FieldAst,
    executor::{
        fields::{self, FieldGroups},
        run_catching, values, ExecutionError, ExecutionState, FieldError, JobKind, PathSegment,
        ResolveInfo, ResolveParams,
    },
    parser::{SourcePosition, Spanning},
    types::{Field, ObjectType, Type},
    value::{Object, Value},
};

/// Lists up to this length are completed on the calling thread.
const INLINE_LIST_LEN: usize = 4;

/// A field error or a null bubbled up from a non-null position below.
type Completion = Result<Option<Value>, FieldError>;

fn null_or_bubble(t: &Type) -> Option<Value> {
    (!t.is_non_null()).then_some(Value::Null)
}

fn child_path(path: &[PathSegment], segment: PathSegment) -> Vec<PathSegment> {
    let mut child = Vec::with_capacity(path.len() + 1);
    child.extend_from_slice(path);
    child.push(segment);
    child
}

struct PlannedField {
    key: String,
    definition: Field,
    asts: Vec<Arc<Spanning<FieldAst>>>,
    location: SourcePosition,
}

/// Executes a merged selection set against `source`.
///
/// Fields unknown to `object` are skipped. With `serial` set, fields run one
/// after another in document order; otherwise they run concurrently.
pub(super) fn execute_fields(
    state: &Arc<ExecutionState>,
    object: &Arc<ObjectType>,
    source: &Value,
    fields: FieldGroups,
    path: &[PathSegment],
    serial: bool,
) -> Option<Object> {
    let parent = Type::Object(object.clone());
    let planned = fields
        .into_iter()
        .filter_map(|(key, asts)| {
            let first = asts.first()?;
            let location = first.span.start;
            let definition = state.schema.field_def(&parent, &first.item.name.item)?;
            Some(PlannedField {
                key,
                definition,
                asts,
                location,
            })
        })
        .collect::<Vec<_>>();

    let results = if serial || planned.len() <= 1 {
        planned
            .into_iter()
            .map(|field| {
                let field_path = child_path(path, PathSegment::Key(field.key.clone()));
                let outcome = run_catching(|| {
                    resolve_field(
                        state,
                        object,
                        source.clone(),
                        &field.definition,
                        field.asts.clone(),
                        field_path.clone(),
                    )
                });
                (field, field_path, outcome)
            })
            .collect::<Vec<_>>()
    } else {
        planned
            .into_iter()
            .map(|field| {
                let field_path = child_path(path, PathSegment::Key(field.key.clone()));
                let pending = {
                    let state = state.clone();
                    let object = object.clone();
                    let source = source.clone();
                    let definition = field.definition.clone();
                    let asts = field.asts.clone();
                    let field_path = field_path.clone();
                    state.manager.clone().spawn(JobKind::Resolve, move || {
                        resolve_field(&state, &object, source, &definition, asts, field_path)
                    })
                };
                (field, field_path, pending)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|(field, field_path, pending)| (field, field_path, pending.wait()))
            .collect()
    };

    let mut data = Object::with_capacity(results.len());
    let mut bubbled = false;
    for (field, field_path, outcome) in results {
        let value = outcome.unwrap_or_else(|e| {
            state.push_error(field.location, field_path, e);
            null_or_bubble(&field.definition.field_type)
        });
        match value {
            Some(v) => {
                data.add_field(field.key, v);
            }
            None => bubbled = true,
        }
    }

    (!bubbled).then_some(data)
}

/// Resolves one field of `source` and completes its value.
fn resolve_field(
    state: &Arc<ExecutionState>,
    parent: &Arc<ObjectType>,
    source: Value,
    definition: &Field,
    field_asts: Vec<Arc<Spanning<FieldAst>>>,
    path: Vec<PathSegment>,
) -> Option<Value> {
    let first = field_asts.first()?.clone();
    let args = values::argument_values(
        &definition.arguments,
        &first.item.arguments,
        &state.variables,
    );
    let info = ResolveInfo {
        field_name: definition.name.clone(),
        field_asts,
        return_type: definition.field_type.clone(),
        parent_type: parent.clone(),
        path: path.clone(),
        exec: state.clone(),
    };

    trace!(field = %definition.name, parent = parent.name(), "resolving field");
    let field_trace = state.tracer.trace_field(&definition.name, parent.name());
    let resolved = match &definition.resolve {
        Some(resolve) => {
            let params = ResolveParams {
                source,
                args,
                info: info.clone(),
                context: state.context.clone(),
            };
            run_catching(|| resolve(params)).and_then(|r| r)
        }
        None => Ok(source.property(&definition.name).unwrap_or(Value::Null)),
    };

    match resolved {
        Ok(value) => {
            field_trace.finish(&[]);
            complete_value_catching_error(state, &definition.field_type, &info, &path, value)
        }
        Err(e) => {
            let error = ExecutionError::new(first.span.start, path, e);
            field_trace.finish(slice::from_ref(&error));
            state.errors.lock().push(error);
            null_or_bubble(&definition.field_type)
        }
    }
}

/// Completes `value`, recording a completion error at `path`.
fn complete_value_catching_error(
    state: &Arc<ExecutionState>,
    return_type: &Type,
    info: &ResolveInfo,
    path: &[PathSegment],
    value: Value,
) -> Option<Value> {
    match complete_value(state, return_type, info, path, value) {
        Ok(Some(v)) => Some(v),
        Ok(None) => null_or_bubble(return_type),
        Err(e) => {
            state.push_error(info.location(), path.to_vec(), e);
            null_or_bubble(return_type)
        }
    }
}

fn complete_value(
    state: &Arc<ExecutionState>,
    return_type: &Type,
    info: &ResolveInfo,
    path: &[PathSegment],
    value: Value,
) -> Completion {
    if let Type::NonNull(inner) = return_type {
        return match complete_value(state, inner, info, path, value)? {
            Some(Value::Null) => Err(FieldError::from(format!(
                "Cannot return null for non-nullable field {}.{}.",
                info.parent_type().name(),
                info.field_name(),
            ))),
            completed => Ok(completed),
        };
    }

    if value.is_null() {
        return Ok(Some(Value::Null));
    }

    match return_type {
        Type::List(item_type) => complete_list(state, item_type, info, path, &value),
        Type::Scalar(s) => Ok(Some(s.serialize(&value))),
        Type::Enum(e) => Ok(Some(e.serialize(&value))),
        Type::Object(object) => complete_object(state, object, info, path, value),
        Type::Interface(_) | Type::Union(_) => {
            let object = resolve_runtime_type(state, return_type, info, &value)?;
            complete_object(state, &object, info, path, value)
        }
        Type::InputObject(_) | Type::NonNull(_) => Ok(Some(Value::Null)),
    }
}

fn complete_list(
    state: &Arc<ExecutionState>,
    item_type: &Type,
    info: &ResolveInfo,
    path: &[PathSegment],
    value: &Value,
) -> Completion {
    let Some(items) = value.items() else {
        return Err(FieldError::from(format!(
            "User Error: expected iterable, but did not find one for field {}.{}.",
            info.parent_type().name(),
            info.field_name(),
        )));
    };

    let completed = if items.len() <= INLINE_LIST_LEN {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let item_path = child_path(path, PathSegment::Index(i));
                complete_value_catching_error(state, item_type, info, &item_path, item)
            })
            .collect::<Vec<_>>()
    } else {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let item_path = child_path(path, PathSegment::Index(i));
                let pending = {
                    let state = state.clone();
                    let item_type = item_type.clone();
                    let info = info.clone();
                    let item_path = item_path.clone();
                    state.manager.clone().spawn(JobKind::Complete, move || {
                        complete_value_catching_error(&state, &item_type, &info, &item_path, item)
                    })
                };
                (item_path, pending)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|(item_path, pending)| {
                pending.wait().unwrap_or_else(|e| {
                    state.push_error(info.location(), item_path, e);
                    null_or_bubble(item_type)
                })
            })
            .collect()
    };

    Ok(completed
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .map(Value::list))
}

fn resolve_runtime_type(
    state: &ExecutionState,
    abstract_type: &Type,
    info: &ResolveInfo,
    value: &Value,
) -> Result<Arc<ObjectType>, FieldError> {
    let resolve_type = match abstract_type {
        Type::Interface(i) => i.resolve_type(),
        Type::Union(u) => u.resolve_type(),
        _ => None,
    };
    let object = match resolve_type {
        Some(resolve) => resolve(value, info),
        None => state
            .schema
            .possible_types(abstract_type)
            .into_iter()
            .find(|o| o.is_type_of().is_some_and(|is_type_of| is_type_of(value, info))),
    };

    let Some(object) = object else {
        return Err(FieldError::from(format!(
            "Abstract type {abstract_type} must resolve to an Object type at runtime for field \
             {}.{}.",
            info.parent_type().name(),
            info.field_name(),
        )));
    };
    if !state.schema.is_possible_type(abstract_type, object.name()) {
        return Err(FieldError::from(format!(
            "Runtime Object type \"{}\" is not a possible type for \"{abstract_type}\".",
            object.name(),
        )));
    }
    Ok(object)
}

fn complete_object(
    state: &Arc<ExecutionState>,
    object: &Arc<ObjectType>,
    info: &ResolveInfo,
    path: &[PathSegment],
    value: Value,
) -> Completion {
    if let Some(is_type_of) = object.is_type_of() {
        if !is_type_of(&value, info) {
            return Err(FieldError::from(format!(
                "Expected value of type \"{}\" but got: {value}.",
                object.name(),
            )));
        }
    }

    let subfields = fields::collect_subfields(state, object, info.field_asts());
    Ok(execute_fields(state, object, &value, subfields, path, false).map(Value::Object))
}
