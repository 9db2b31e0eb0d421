use std::{cell::RefCell, hash::Hash};

use fnv::{FnvHashMap, FnvHashSet};
use indexmap::IndexMap;
use itertools::Itertools as _;

use crate::{
    ast::{Arguments, Directive, Field, Fragment, Selection},
    parser::{SourcePosition, Spanning},
    types::Type,
    validation::{ValidatorContext, Visitor},
};

#[derive(Debug)]
struct Conflict(ConflictReason, Vec<SourcePosition>, Vec<SourcePosition>);

#[derive(Clone, Debug, Eq, PartialEq)]
struct ConflictReason(String, ConflictReasonMessage);

#[derive(Clone, Debug, Eq, PartialEq)]
enum ConflictReasonMessage {
    Message(String),
    Nested(Vec<ConflictReason>),
}

/// A selected field together with the type it was selected on and its
/// declared return type, when both are known to the schema.
struct AstAndDef<'a>(Option<Type>, &'a Spanning<Field>, Option<Type>);

type AstAndDefCollection<'a> = IndexMap<&'a str, Vec<AstAndDef<'a>>>;

/// Unordered pairs, each remembered with whether its parents were mutually
/// exclusive at the time of comparison.
struct PairSet<K> {
    data: FnvHashMap<K, FnvHashMap<K, bool>>,
}

impl<K: Copy + Eq + Hash> PairSet<K> {
    fn new() -> Self {
        Self {
            data: FnvHashMap::default(),
        }
    }

    fn contains(&self, a: K, b: K, mutex: bool) -> bool {
        match self.data.get(&a).and_then(|s| s.get(&b)) {
            // A pair compared under exclusive parents skipped the name and
            // argument checks, so it only counts for exclusive lookups.
            Some(&was_mutex) => mutex || !was_mutex,
            None => false,
        }
    }

    fn insert(&mut self, a: K, b: K, mutex: bool) {
        self.data.entry(a).or_default().insert(b, mutex);
        self.data.entry(b).or_default().insert(a, mutex);
    }
}

pub struct OverlappingFieldsCanBeMerged<'a> {
    compared_fragments: RefCell<PairSet<&'a str>>,
    compared_fields: RefCell<PairSet<SourcePosition>>,
}

pub fn factory<'a>() -> OverlappingFieldsCanBeMerged<'a> {
    OverlappingFieldsCanBeMerged {
        compared_fragments: RefCell::new(PairSet::new()),
        compared_fields: RefCell::new(PairSet::new()),
    }
}

impl<'a> OverlappingFieldsCanBeMerged<'a> {
    fn find_conflicts_within_selection_set(
        &self,
        parent_type: Option<&Type>,
        selection_set: &'a [Selection],
        ctx: &ValidatorContext<'a>,
    ) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        let (field_map, fragment_names) =
            self.get_fields_and_fragment_names(parent_type, selection_set, ctx);

        self.collect_conflicts_within(&mut conflicts, &field_map, ctx);

        for (i, &frag_name1) in fragment_names.iter().enumerate() {
            self.collect_conflicts_between_fields_and_fragment(
                &mut conflicts,
                &field_map,
                frag_name1,
                false,
                ctx,
                &mut FnvHashSet::default(),
            );

            for &frag_name2 in &fragment_names[i + 1..] {
                self.collect_conflicts_between_fragments(
                    &mut conflicts,
                    frag_name1,
                    frag_name2,
                    false,
                    ctx,
                );
            }
        }

        conflicts
    }

    fn collect_conflicts_between_fragments(
        &self,
        conflicts: &mut Vec<Conflict>,
        fragment_name1: &'a str,
        fragment_name2: &'a str,
        mutually_exclusive: bool,
        ctx: &ValidatorContext<'a>,
    ) {
        if fragment_name1 == fragment_name2 {
            return;
        }
        let (Some(fragment1), Some(fragment2)) =
            (ctx.fragment(fragment_name1), ctx.fragment(fragment_name2))
        else {
            return;
        };

        if self.compared_fragments.borrow().contains(
            fragment_name1,
            fragment_name2,
            mutually_exclusive,
        ) {
            return;
        }
        self.compared_fragments.borrow_mut().insert(
            fragment_name1,
            fragment_name2,
            mutually_exclusive,
        );

        let (field_map1, fragment_names1) =
            self.get_referenced_fields_and_fragment_names(fragment1, ctx);
        let (field_map2, fragment_names2) =
            self.get_referenced_fields_and_fragment_names(fragment2, ctx);

        self.collect_conflicts_between(
            conflicts,
            mutually_exclusive,
            &field_map1,
            &field_map2,
            ctx,
        );

        for &fragment_name2 in &fragment_names2 {
            self.collect_conflicts_between_fragments(
                conflicts,
                fragment_name1,
                fragment_name2,
                mutually_exclusive,
                ctx,
            );
        }

        for &fragment_name1 in &fragment_names1 {
            self.collect_conflicts_between_fragments(
                conflicts,
                fragment_name1,
                fragment_name2,
                mutually_exclusive,
                ctx,
            );
        }
    }

    fn collect_conflicts_between_fields_and_fragment(
        &self,
        conflicts: &mut Vec<Conflict>,
        field_map: &AstAndDefCollection<'a>,
        fragment_name: &'a str,
        mutually_exclusive: bool,
        ctx: &ValidatorContext<'a>,
        visited: &mut FnvHashSet<&'a str>,
    ) {
        if !visited.insert(fragment_name) {
            return;
        }
        let Some(fragment) = ctx.fragment(fragment_name) else {
            return;
        };

        let (field_map2, fragment_names2) =
            self.get_referenced_fields_and_fragment_names(fragment, ctx);

        self.collect_conflicts_between(conflicts, mutually_exclusive, field_map, &field_map2, ctx);

        for fragment_name2 in fragment_names2 {
            self.collect_conflicts_between_fields_and_fragment(
                conflicts,
                field_map,
                fragment_name2,
                mutually_exclusive,
                ctx,
                visited,
            );
        }
    }

    fn collect_conflicts_between(
        &self,
        conflicts: &mut Vec<Conflict>,
        mutually_exclusive: bool,
        field_map1: &AstAndDefCollection<'a>,
        field_map2: &AstAndDefCollection<'a>,
        ctx: &ValidatorContext<'a>,
    ) {
        for (response_name, fields1) in field_map1 {
            let Some(fields2) = field_map2.get(response_name) else {
                continue;
            };
            for field1 in fields1 {
                for field2 in fields2 {
                    if let Some(conflict) =
                        self.find_conflict(response_name, field1, field2, mutually_exclusive, ctx)
                    {
                        conflicts.push(conflict);
                    }
                }
            }
        }
    }

    fn collect_conflicts_within(
        &self,
        conflicts: &mut Vec<Conflict>,
        field_map: &AstAndDefCollection<'a>,
        ctx: &ValidatorContext<'a>,
    ) {
        for (response_name, fields) in field_map {
            for (i, field1) in fields.iter().enumerate() {
                for field2 in &fields[i + 1..] {
                    if let Some(conflict) =
                        self.find_conflict(response_name, field1, field2, false, ctx)
                    {
                        conflicts.push(conflict);
                    }
                }
            }
        }
    }

    fn find_conflict(
        &self,
        response_name: &str,
        field1: &AstAndDef<'a>,
        field2: &AstAndDef<'a>,
        parents_mutually_exclusive: bool,
        ctx: &ValidatorContext<'a>,
    ) -> Option<Conflict> {
        let AstAndDef(parent_type1, ast1, def_type1) = field1;
        let AstAndDef(parent_type2, ast2, def_type2) = field2;

        if std::ptr::eq(*ast1, *ast2) {
            return None;
        }

        let mutually_exclusive = parents_mutually_exclusive
            || (parent_type1 != parent_type2
                && is_object_type(parent_type1.as_ref())
                && is_object_type(parent_type2.as_ref()));

        if self
            .compared_fields
            .borrow()
            .contains(ast1.start(), ast2.start(), mutually_exclusive)
        {
            return None;
        }
        self.compared_fields
            .borrow_mut()
            .insert(ast1.start(), ast2.start(), mutually_exclusive);

        let conflict = |reason: String| {
            Some(Conflict(
                ConflictReason(
                    response_name.into(),
                    ConflictReasonMessage::Message(reason),
                ),
                vec![ast1.start()],
                vec![ast2.start()],
            ))
        };

        let name1 = &ast1.item.name.item;
        let name2 = &ast2.item.name.item;
        if !mutually_exclusive && name1 != name2 {
            return conflict(format!("{name1} and {name2} are different fields"));
        }

        if let (Some(t1), Some(t2)) = (def_type1, def_type2) {
            if is_type_conflict(t1, t2) {
                return conflict(format!("they return differing types {t1} and {t2}"));
            }
        }

        if !mutually_exclusive {
            if !is_same_arguments(&ast1.item.arguments, &ast2.item.arguments) {
                return conflict("they have differing arguments".into());
            }
            if !is_same_directives(&ast1.item.directives, &ast2.item.directives) {
                return conflict("they have differing directives".into());
            }
        }

        if let (Some(s1), Some(s2)) = (&ast1.item.selection_set, &ast2.item.selection_set) {
            let conflicts = self.find_conflicts_between_sub_selection_sets(
                mutually_exclusive,
                def_type1.as_ref().map(Type::named_type),
                s1,
                def_type2.as_ref().map(Type::named_type),
                s2,
                ctx,
            );

            return subfield_conflicts(&conflicts, response_name, ast1.start(), ast2.start());
        }

        None
    }

    fn find_conflicts_between_sub_selection_sets(
        &self,
        mutually_exclusive: bool,
        parent_type1: Option<&Type>,
        selection_set1: &'a [Selection],
        parent_type2: Option<&Type>,
        selection_set2: &'a [Selection],
        ctx: &ValidatorContext<'a>,
    ) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        let (field_map1, fragment_names1) =
            self.get_fields_and_fragment_names(parent_type1, selection_set1, ctx);
        let (field_map2, fragment_names2) =
            self.get_fields_and_fragment_names(parent_type2, selection_set2, ctx);

        self.collect_conflicts_between(
            &mut conflicts,
            mutually_exclusive,
            &field_map1,
            &field_map2,
            ctx,
        );

        for &fragment_name in &fragment_names2 {
            self.collect_conflicts_between_fields_and_fragment(
                &mut conflicts,
                &field_map1,
                fragment_name,
                mutually_exclusive,
                ctx,
                &mut FnvHashSet::default(),
            );
        }

        for &fragment_name in &fragment_names1 {
            self.collect_conflicts_between_fields_and_fragment(
                &mut conflicts,
                &field_map2,
                fragment_name,
                mutually_exclusive,
                ctx,
                &mut FnvHashSet::default(),
            );
        }

        for &fragment_name1 in &fragment_names1 {
            for &fragment_name2 in &fragment_names2 {
                self.collect_conflicts_between_fragments(
                    &mut conflicts,
                    fragment_name1,
                    fragment_name2,
                    mutually_exclusive,
                    ctx,
                );
            }
        }

        conflicts
    }

    fn get_referenced_fields_and_fragment_names(
        &self,
        fragment: &'a Spanning<Fragment>,
        ctx: &ValidatorContext<'a>,
    ) -> (AstAndDefCollection<'a>, Vec<&'a str>) {
        let fragment_type = ctx.schema.type_by_name(&fragment.item.type_condition.item);

        self.get_fields_and_fragment_names(fragment_type, &fragment.item.selection_set, ctx)
    }

    fn get_fields_and_fragment_names(
        &self,
        parent_type: Option<&Type>,
        selection_set: &'a [Selection],
        ctx: &ValidatorContext<'a>,
    ) -> (AstAndDefCollection<'a>, Vec<&'a str>) {
        let mut field_map = IndexMap::new();
        let mut fragment_names = Vec::new();

        Self::collect_fields_and_fragment_names(
            parent_type,
            selection_set,
            ctx,
            &mut field_map,
            &mut fragment_names,
        );

        (field_map, fragment_names)
    }

    fn collect_fields_and_fragment_names(
        parent_type: Option<&Type>,
        selection_set: &'a [Selection],
        ctx: &ValidatorContext<'a>,
        field_map: &mut AstAndDefCollection<'a>,
        fragment_names: &mut Vec<&'a str>,
    ) {
        for selection in selection_set {
            match selection {
                Selection::Field(field) => {
                    let field: &'a Spanning<Field> = field;
                    let def_type = parent_type
                        .and_then(|t| ctx.schema.field_def(t, &field.item.name.item))
                        .map(|f| f.field_type);

                    field_map
                        .entry(field.item.response_key())
                        .or_default()
                        .push(AstAndDef(parent_type.cloned(), field, def_type));
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.item.name.item.as_str();
                    if !fragment_names.contains(&name) {
                        fragment_names.push(name);
                    }
                }
                Selection::InlineFragment(inline) => {
                    let inline_type = inline
                        .item
                        .type_condition
                        .as_ref()
                        .and_then(|cond| ctx.schema.type_by_name(&cond.item));

                    Self::collect_fields_and_fragment_names(
                        inline_type.or(parent_type),
                        &inline.item.selection_set,
                        ctx,
                        field_map,
                        fragment_names,
                    );
                }
            }
        }
    }
}

impl<'a> Visitor<'a> for OverlappingFieldsCanBeMerged<'a> {
    fn enter_selection_set(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        selection_set: &'a [Selection],
    ) {
        let parent_type = ctx.parent_type().cloned();
        let conflicts =
            self.find_conflicts_within_selection_set(parent_type.as_ref(), selection_set, ctx);

        for Conflict(ConflictReason(reason_name, reason_msg), mut p1, mut p2) in conflicts {
            p1.append(&mut p2);
            ctx.report_error(&error_message(&reason_name, &reason_msg), &p1);
        }
    }
}

fn subfield_conflicts(
    conflicts: &[Conflict],
    response_name: &str,
    pos1: SourcePosition,
    pos2: SourcePosition,
) -> Option<Conflict> {
    if conflicts.is_empty() {
        return None;
    }

    Some(Conflict(
        ConflictReason(
            response_name.into(),
            ConflictReasonMessage::Nested(conflicts.iter().map(|c| c.0.clone()).collect()),
        ),
        std::iter::once(pos1)
            .chain(conflicts.iter().flat_map(|c| c.1.iter().copied()))
            .collect(),
        std::iter::once(pos2)
            .chain(conflicts.iter().flat_map(|c| c.2.iter().copied()))
            .collect(),
    ))
}

/// Two return types conflict when their list/non-null shapes differ, or when
/// either side is a leaf and the named types differ.
fn is_type_conflict(t1: &Type, t2: &Type) -> bool {
    match (t1, t2) {
        (Type::List(inner1), Type::List(inner2))
        | (Type::NonNull(inner1), Type::NonNull(inner2)) => is_type_conflict(inner1, inner2),
        (Type::List(_) | Type::NonNull(_), _) | (_, Type::List(_) | Type::NonNull(_)) => true,
        _ => (t1.is_leaf() || t2.is_leaf()) && t1 != t2,
    }
}

fn is_same_arguments(args1: &Arguments, args2: &Arguments) -> bool {
    args1.len() == args2.len()
        && args1.iter().all(|(name1, value1)| {
            args2
                .iter()
                .find(|(name2, _)| name2.item == name1.item)
                .is_some_and(|(_, value2)| value1.item.unlocated_eq(&value2.item))
        })
}

fn is_same_directives(dirs1: &[Spanning<Directive>], dirs2: &[Spanning<Directive>]) -> bool {
    dirs1.len() == dirs2.len()
        && dirs1.iter().all(|d1| {
            dirs2.iter().any(|d2| {
                d1.item.name.item == d2.item.name.item
                    && is_same_arguments(&d1.item.arguments, &d2.item.arguments)
            })
        })
}

fn is_object_type(t: Option<&Type>) -> bool {
    matches!(t, Some(Type::Object(_)))
}

fn error_message(reason_name: &str, reason: &ConflictReasonMessage) -> String {
    format!(
        "Fields \"{reason_name}\" conflict because {}.",
        format_reason(reason),
    )
}

fn format_reason(reason: &ConflictReasonMessage) -> String {
    match reason {
        ConflictReasonMessage::Message(name) => name.clone(),
        ConflictReasonMessage::Nested(nested) => nested
            .iter()
            .map(|ConflictReason(name, subreason)| {
                format!(
                    "subfields \"{name}\" conflict because {}",
                    format_reason(subreason),
                )
            })
            .join(" and "),
    }
}
