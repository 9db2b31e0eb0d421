//! Schema assembly: the type map walk and the checks run over its result.

use std::{
    collections::VecDeque,
    sync::{Arc, OnceLock},
};

use arcstr::ArcStr;
use indexmap::IndexMap;
use tracing::debug;

use crate::{
    schema::{
        introspection,
        model::{DirectiveType, SchemaConfig, SchemaInner},
    },
    types::{assert_valid_name, FieldMap, InterfaceType, ObjectType, Type},
};

/// Walks the type graph breadth-first and checks the resulting type map.
pub(crate) fn assemble(config: SchemaConfig) -> SchemaInner {
    let mut walk = TypeMapWalk::default();

    walk.enqueue(Type::Object(config.query.clone()));
    if let Some(mutation) = &config.mutation {
        walk.enqueue(Type::Object(mutation.clone()));
    }
    for t in config.types {
        walk.enqueue(t);
    }
    for t in introspection::types() {
        walk.enqueue(t);
    }
    walk.run();

    let TypeMapWalk {
        types, mut errors, ..
    } = walk;

    for t in types.values() {
        match t {
            Type::Object(object) => {
                for iface in object.interfaces().iter() {
                    iface.register_implementation(object);
                    if let Err(e) = assert_object_implements_interface(object, iface) {
                        errors.push(e);
                    }
                }
            }
            Type::Interface(iface) if iface.resolve_type().is_none() => {
                for object in implementations_in(&types, iface) {
                    if object.is_type_of().is_none() {
                        errors.push(format!(
                            "Interface Type {} does not provide a \"resolveType\" function and \
                             implementing Type {} does not provide a \"isTypeOf\" function. \
                             There is no way to resolve this implementing type during \
                             execution.",
                            iface.name(),
                            object.name(),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    let mut directives = IndexMap::new();
    for directive in [
        DirectiveType::new_include(),
        DirectiveType::new_skip(),
        DirectiveType::new_deprecated(),
    ]
    .into_iter()
    .chain(config.directives)
    {
        if let Err(e) = assert_valid_name(&directive.name) {
            errors.push(e);
        }
        directives.insert(directive.name.clone(), Arc::new(directive));
    }

    debug!(
        query = config.query.name(),
        types = types.len(),
        errors = errors.len(),
        "assembled schema",
    );

    SchemaInner {
        query_type: config.query,
        mutation_type: config.mutation,
        types,
        directives,
        errors,
        manager_config: config.resolve_manager,
        manager: OnceLock::new(),
    }
}

#[derive(Default)]
struct TypeMapWalk {
    queue: VecDeque<Type>,
    types: IndexMap<ArcStr, Type>,
    errors: Vec<String>,
}

impl TypeMapWalk {
    fn enqueue(&mut self, t: Type) {
        self.queue.push_back(t);
    }

    fn run(&mut self) {
        while let Some(t) = self.queue.pop_front() {
            self.reduce(t);
        }
    }

    fn reduce(&mut self, t: Type) {
        if let Err(e) = check_modifiers(&t) {
            self.errors.push(e);
        }

        let named = t.named_type().clone();
        let Some(name) = named.name().map(ArcStr::from) else {
            return;
        };

        if let Some(known) = self.types.get(&name) {
            if !same_handle(known, &named) {
                self.errors.push(format!(
                    "Schema must contain unique named types but contains multiple types named \
                     \"{name}\".",
                ));
            }
            return;
        }

        if let Some(e) = named.error() {
            self.errors.push(e.to_owned());
        }
        self.types.insert(name, named.clone());

        match &named {
            Type::Object(object) => {
                for iface in object.interfaces().iter() {
                    self.enqueue(Type::Interface(iface.clone()));
                }
                self.fields(object.name(), &object.fields());
            }
            Type::Interface(iface) => {
                self.fields(iface.name(), &iface.fields());
            }
            Type::Union(union) => {
                for member in union.types() {
                    self.enqueue(Type::Object(member.clone()));
                }
            }
            Type::InputObject(input) => {
                let fields = input.fields();
                if fields.is_empty() {
                    self.errors.push(missing_fields_message(input.name()));
                }
                for field in fields.iter() {
                    if let Err(e) = assert_valid_name(&field.name) {
                        self.errors.push(e);
                    }
                    if !field.arg_type.is_input() {
                        self.errors.push(format!(
                            "{}.{} field type must be Input Type but got: {}.",
                            input.name(),
                            field.name,
                            field.arg_type,
                        ));
                    }
                    self.enqueue(field.arg_type.clone());
                }
            }
            Type::Scalar(_) | Type::Enum(_) | Type::List(_) | Type::NonNull(_) => {}
        }
    }

    fn fields(&mut self, parent: &str, fields: &FieldMap) {
        if fields.is_empty() {
            self.errors.push(missing_fields_message(parent));
        }
        for field in fields.iter() {
            if let Err(e) = assert_valid_name(&field.name) {
                self.errors.push(e);
            }
            if !field.field_type.is_output() {
                self.errors.push(format!(
                    "{parent}.{} field type must be Output Type but got: {}.",
                    field.name, field.field_type,
                ));
            }
            for arg in &field.arguments {
                if let Err(e) = assert_valid_name(&arg.name) {
                    self.errors.push(e);
                }
                if !arg.arg_type.is_input() {
                    self.errors.push(format!(
                        "{parent}.{}({}:) argument type must be Input Type but got: {}.",
                        field.name, arg.name, arg.arg_type,
                    ));
                }
                self.enqueue(arg.arg_type.clone());
            }
            self.enqueue(field.field_type.clone());
        }
    }
}

fn missing_fields_message(type_name: &str) -> String {
    format!(
        "{type_name} fields must be an object with field names as keys or a function which \
         return such an object.",
    )
}

fn check_modifiers(t: &Type) -> Result<(), String> {
    match t {
        Type::NonNull(inner) if inner.is_non_null() => Err(format!(
            "Can only create NonNull of a Nullable Type but got: {inner}.",
        )),
        Type::NonNull(inner) | Type::List(inner) => check_modifiers(inner),
        _ => Ok(()),
    }
}

fn same_handle(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Scalar(a), Type::Scalar(b)) => Arc::ptr_eq(a, b),
        (Type::Object(a), Type::Object(b)) => Arc::ptr_eq(a, b),
        (Type::Interface(a), Type::Interface(b)) => Arc::ptr_eq(a, b),
        (Type::Union(a), Type::Union(b)) => Arc::ptr_eq(a, b),
        (Type::Enum(a), Type::Enum(b)) => Arc::ptr_eq(a, b),
        (Type::InputObject(a), Type::InputObject(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

fn implementations_in<'t>(
    types: &'t IndexMap<ArcStr, Type>,
    iface: &'t Arc<InterfaceType>,
) -> impl Iterator<Item = &'t Arc<ObjectType>> {
    types.values().filter_map(move |t| match t {
        Type::Object(o) if o.implements(iface.name()) => Some(o),
        _ => None,
    })
}

fn assert_object_implements_interface(
    object: &ObjectType,
    iface: &InterfaceType,
) -> Result<(), String> {
    let object_fields = object.fields();
    let (o, i) = (object.name(), iface.name());

    for iface_field in iface.fields().iter() {
        let f = &iface_field.name;
        let Some(object_field) = object_fields.get(f) else {
            return Err(format!(
                "\"{i}\" expects field \"{f}\" but \"{o}\" does not provide it.",
            ));
        };

        if iface_field.field_type != object_field.field_type {
            return Err(format!(
                "{i}.{f} expects type \"{}\" but {o}.{f} provides type \"{}\".",
                iface_field.field_type, object_field.field_type,
            ));
        }

        for iface_arg in &iface_field.arguments {
            let a = &iface_arg.name;
            let Some(object_arg) = object_field.argument_by_name(a) else {
                return Err(format!(
                    "{i}.{f} expects argument \"{a}\" but {o}.{f} does not provide it.",
                ));
            };
            if iface_arg.arg_type != object_arg.arg_type {
                return Err(format!(
                    "{i}.{f}({a}:) expects type \"{}\" but {o}.{f}({a}:) provides type \"{}\".",
                    iface_arg.arg_type, object_arg.arg_type,
                ));
            }
        }

        for object_arg in &object_field.arguments {
            let a = &object_arg.name;
            if iface_field.argument_by_name(a).is_none() && object_arg.arg_type.is_non_null() {
                return Err(format!(
                    "{o}.{f}({a}:) is of required type \"{}\" but is not also provided by the \
                     interface {i}.{f}.",
                    object_arg.arg_type,
                ));
            }
        }
    }
    Ok(())
}
