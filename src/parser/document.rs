use std::{collections::BTreeMap, sync::Arc};

use fnv::FnvHashSet;
use graphql_parser::{query as gql, Pos};

use crate::{
    ast::{
        Arguments, Definition, Directive, Field, Fragment, FragmentSpread, InlineFragment,
        InputValue, Operation, OperationType, OwnedDocument, Selection, Type, VariableDefinition,
        VariableDefinitions,
    },
    parser::{ParseError, SourcePosition, Spanning},
};

/// Parses a query document into the crate's AST.
pub fn parse_document_source(source: &str) -> Result<OwnedDocument, ParseError> {
    let document =
        gql::parse_query::<String>(source).map_err(|e| ParseError::new(e.to_string()))?;
    let locator = Locator::new(source);

    Ok(document
        .definitions
        .into_iter()
        .map(|def| locator.definition(def))
        .collect())
}

/// Locates AST nodes in the source text.
///
/// The parser only reports positions for definitions, selections, variable
/// definitions and directives. Everything else (names, type conditions,
/// arguments, values) is found by scanning forward from the nearest reported
/// position. The document has already been parsed successfully at that point,
/// so the scanner only needs to skip tokens, never to validate them.
struct Locator<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> Locator<'s> {
    fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Byte offset of a one-based parser position.
    ///
    /// Mirrors the tokenizer's column counting: tabs advance eight columns,
    /// carriage returns and byte order marks none.
    fn offset(&self, pos: Pos) -> usize {
        let Some(&line_start) = self.line_starts.get(pos.line.saturating_sub(1)) else {
            return self.source.len();
        };
        let mut column = 1;
        for (i, c) in self.source[line_start..].char_indices() {
            if column >= pos.column || c == '\n' {
                return line_start + i;
            }
            column += match c {
                '\t' => 8,
                '\r' | '\u{feff}' => 0,
                _ => 1,
            };
        }
        self.source.len()
    }

    /// Zero-based line and character column of a byte offset.
    fn at(&self, index: usize) -> SourcePosition {
        let index = index.min(self.source.len());
        let line = match self.line_starts.binary_search(&index) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or_default();
        let col = self
            .source
            .get(line_start..index)
            .map_or(0, |s| s.chars().count());
        SourcePosition::new(index, line, col)
    }

    fn spanning<T>(&self, index: usize, item: T) -> Spanning<T> {
        Spanning::zero_width(&self.at(index), item)
    }

    fn byte(&self, index: usize) -> Option<u8> {
        self.source.as_bytes().get(index).copied()
    }

    /// Skips whitespace, commas and comments.
    fn skip_ignored(&self, mut i: usize) -> usize {
        let bytes = self.source.as_bytes();
        while let Some(b) = self.byte(i) {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' | b',' => i += 1,
                0xEF if bytes.get(i..i + 3) == Some(&b"\xEF\xBB\xBF"[..]) => i += 3,
                b'#' => {
                    while !matches!(self.byte(i), None | Some(b'\n' | b'\r')) {
                        i += 1;
                    }
                }
                _ => break,
            }
        }
        i
    }

    fn skip_name(&self, mut i: usize) -> usize {
        while matches!(self.byte(i), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            i += 1;
        }
        i
    }

    /// Start of the token following the name starting at `i`.
    fn after_name(&self, i: usize) -> usize {
        self.skip_ignored(self.skip_name(i))
    }

    /// Start of the token following `punct`, if `punct` is at `i`.
    fn after_punct(&self, i: usize, punct: u8) -> usize {
        if self.byte(i) == Some(punct) {
            self.skip_ignored(i + 1)
        } else {
            i
        }
    }

    /// End of the type literal starting at `i`.
    fn skip_type(&self, i: usize) -> usize {
        let end = if self.byte(i) == Some(b'[') {
            let inner_end = self.skip_type(self.skip_ignored(i + 1));
            let close = self.skip_ignored(inner_end);
            if self.byte(close) == Some(b']') {
                close + 1
            } else {
                close
            }
        } else {
            self.skip_name(i)
        };
        let bang = self.skip_ignored(end);
        if self.byte(bang) == Some(b'!') {
            bang + 1
        } else {
            end
        }
    }

    /// End of the value literal starting at `i`.
    fn skip_value(&self, i: usize) -> usize {
        let bytes = self.source.as_bytes();
        match self.byte(i) {
            Some(b'"') if bytes.get(i..i + 3) == Some(&b"\"\"\""[..]) => {
                let mut j = i + 3;
                while j < bytes.len() {
                    if bytes.get(j..j + 4) == Some(&b"\\\"\"\""[..]) {
                        j += 4;
                    } else if bytes.get(j..j + 3) == Some(&b"\"\"\""[..]) {
                        return j + 3;
                    } else {
                        j += 1;
                    }
                }
                bytes.len()
            }
            Some(b'"') => {
                let mut j = i + 1;
                while let Some(b) = self.byte(j) {
                    match b {
                        b'\\' => j += 2,
                        b'"' => return j + 1,
                        b'\n' => return j,
                        _ => j += 1,
                    }
                }
                bytes.len()
            }
            Some(b'[') => {
                let mut j = self.skip_ignored(i + 1);
                loop {
                    match self.byte(j) {
                        Some(b']') => return j + 1,
                        None => return j,
                        Some(_) => {}
                    }
                    let end = self.skip_value(j);
                    if end == j {
                        return j;
                    }
                    j = self.skip_ignored(end);
                }
            }
            Some(b'{') => {
                let mut j = self.skip_ignored(i + 1);
                loop {
                    match self.byte(j) {
                        Some(b'}') => return j + 1,
                        None => return j,
                        Some(_) => {}
                    }
                    let name_end = self.skip_name(j);
                    if name_end == j {
                        return j;
                    }
                    let value_at = self.after_punct(self.skip_ignored(name_end), b':');
                    j = self.skip_ignored(self.skip_value(value_at));
                }
            }
            Some(b'$') => self.skip_name(self.skip_ignored(i + 1)),
            Some(b) if b == b'-' || b.is_ascii_digit() => {
                let mut j = i + 1;
                while matches!(
                    self.byte(j),
                    Some(b) if b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')
                ) {
                    j += 1;
                }
                j
            }
            Some(_) => self.skip_name(i),
            None => i,
        }
    }

    /// Start of the `...` preceding the token at `i`.
    fn spread_start(&self, i: usize) -> usize {
        let bytes = self.source.as_bytes();
        let mut j = i;
        while j > 0 && matches!(bytes.get(j - 1), Some(b' ' | b'\t' | b'\r' | b'\n' | b',')) {
            j -= 1;
        }
        if j >= 3 && bytes.get(j - 3..j) == Some(&b"..."[..]) {
            j - 3
        } else {
            i
        }
    }

    fn definition(&self, def: gql::Definition<'_, String>) -> Definition {
        match def {
            gql::Definition::Operation(op) => Definition::Operation(Arc::new(self.operation(op))),
            gql::Definition::Fragment(frag) => {
                let gql::TypeCondition::On(type_name) = frag.type_condition;
                let start = self.offset(frag.position);
                let name_at = self.after_name(start);
                let type_at = self.after_name(self.after_name(name_at));
                Definition::Fragment(Arc::new(self.spanning(
                    start,
                    Fragment {
                        name: self.spanning(name_at, frag.name),
                        type_condition: self.spanning(type_at, type_name),
                        directives: self.directives(frag.directives),
                        selection_set: self.selection_set(frag.selection_set),
                    },
                )))
            }
        }
    }

    fn operation(&self, op: gql::OperationDefinition<'_, String>) -> Spanning<Operation> {
        let (operation_type, position, name, variables, directives, selection_set) = match op {
            gql::OperationDefinition::SelectionSet(set) => {
                let position = set.span.0;
                (
                    OperationType::Query,
                    position,
                    None,
                    vec![],
                    vec![],
                    set,
                )
            }
            gql::OperationDefinition::Query(q) => (
                OperationType::Query,
                q.position,
                q.name,
                q.variable_definitions,
                q.directives,
                q.selection_set,
            ),
            gql::OperationDefinition::Mutation(m) => (
                OperationType::Mutation,
                m.position,
                m.name,
                m.variable_definitions,
                m.directives,
                m.selection_set,
            ),
            gql::OperationDefinition::Subscription(s) => (
                OperationType::Subscription,
                s.position,
                s.name,
                s.variable_definitions,
                s.directives,
                s.selection_set,
            ),
        };

        let start = self.offset(position);
        let name_at = self.after_name(start);
        self.spanning(
            start,
            Operation {
                operation_type,
                name: name.map(|n| self.spanning(name_at, n)),
                variable_definitions: self.variable_definitions(variables),
                directives: self.directives(directives),
                selection_set: self.selection_set(selection_set),
            },
        )
    }

    /// Variable names are located at their `$`.
    fn variable_definitions(
        &self,
        variables: Vec<gql::VariableDefinition<'_, String>>,
    ) -> VariableDefinitions {
        variables
            .into_iter()
            .map(|var| {
                let start = self.offset(var.position);
                let name_at = self.skip_ignored(start + 1);
                let type_at = self.after_punct(self.after_name(name_at), b':');
                let default_at = self.after_punct(self.skip_ignored(self.skip_type(type_at)), b'=');
                (
                    self.spanning(start, var.name),
                    VariableDefinition {
                        var_type: self.spanning(type_at, Self::type_literal(var.var_type)),
                        default_value: var
                            .default_value
                            .map(|v| self.input_value(default_at, v)),
                    },
                )
            })
            .collect()
    }

    fn selection_set(&self, set: gql::SelectionSet<'_, String>) -> Vec<Selection> {
        set.items
            .into_iter()
            .map(|selection| self.selection(selection))
            .collect()
    }

    fn selection(&self, selection: gql::Selection<'_, String>) -> Selection {
        match selection {
            gql::Selection::Field(field) => {
                let start = self.offset(field.position);
                let name_at = if field.alias.is_some() {
                    self.after_punct(self.after_name(start), b':')
                } else {
                    start
                };
                let selection_set = if field.selection_set.items.is_empty() {
                    None
                } else {
                    Some(self.selection_set(field.selection_set))
                };
                Selection::Field(Arc::new(self.spanning(
                    start,
                    Field {
                        alias: field.alias.map(|a| self.spanning(start, a)),
                        name: self.spanning(name_at, field.name),
                        arguments: self.arguments(self.after_name(name_at), field.arguments),
                        directives: self.directives(field.directives),
                        selection_set,
                    },
                )))
            }
            gql::Selection::FragmentSpread(spread) => {
                let name_at = self.offset(spread.position);
                Selection::FragmentSpread(self.spanning(
                    self.spread_start(name_at),
                    FragmentSpread {
                        name: self.spanning(name_at, spread.fragment_name),
                        directives: self.directives(spread.directives),
                    },
                ))
            }
            gql::Selection::InlineFragment(fragment) => {
                let after_dots = self.offset(fragment.position);
                let type_at = self.after_name(after_dots);
                Selection::InlineFragment(self.spanning(
                    self.spread_start(after_dots),
                    InlineFragment {
                        type_condition: fragment
                            .type_condition
                            .map(|gql::TypeCondition::On(name)| self.spanning(type_at, name)),
                        directives: self.directives(fragment.directives),
                        selection_set: self.selection_set(fragment.selection_set),
                    },
                ))
            }
        }
    }

    fn directives(&self, directives: Vec<gql::Directive<'_, String>>) -> Vec<Spanning<Directive>> {
        directives
            .into_iter()
            .map(|d| {
                let start = self.offset(d.position);
                let name_at = self.skip_ignored(start + 1);
                self.spanning(
                    start,
                    Directive {
                        name: self.spanning(name_at, d.name),
                        arguments: self.arguments(self.after_name(name_at), d.arguments),
                    },
                )
            })
            .collect()
    }

    /// Arguments starting at the `(` found at `open`, in document order.
    fn arguments(&self, open: usize, arguments: Vec<(String, gql::Value<'_, String>)>) -> Arguments {
        let mut at = self.after_punct(open, b'(');
        arguments
            .into_iter()
            .map(|(name, value)| {
                let name_at = at;
                let value_at = self.after_punct(self.after_name(name_at), b':');
                at = self.skip_ignored(self.skip_value(value_at));
                (
                    self.spanning(name_at, name),
                    self.input_value(value_at, value),
                )
            })
            .collect()
    }

    fn input_value(&self, at: usize, value: gql::Value<'_, String>) -> Spanning<InputValue> {
        let item = match value {
            gql::Value::Variable(name) => InputValue::Variable(name),
            gql::Value::Int(n) => match n.as_i64() {
                Some(i) => InputValue::Int(i),
                None => InputValue::Null,
            },
            gql::Value::Float(f) => InputValue::Float(f),
            gql::Value::String(s) => InputValue::String(s),
            gql::Value::Boolean(b) => InputValue::Boolean(b),
            gql::Value::Null => InputValue::Null,
            gql::Value::Enum(e) => InputValue::Enum(e),
            gql::Value::List(items) => {
                let mut item_at = self.after_punct(at, b'[');
                InputValue::List(
                    items
                        .into_iter()
                        .map(|v| {
                            let start = item_at;
                            item_at = self.skip_ignored(self.skip_value(start));
                            self.input_value(start, v)
                        })
                        .collect(),
                )
            }
            gql::Value::Object(fields) => InputValue::Object(self.object_fields(at, fields)),
        };
        self.spanning(at, item)
    }

    /// Object fields in document order.
    ///
    /// The parser collects fields into a map, so their order and any repeated
    /// names are recovered from the source. A repeated name is kept every time
    /// it occurs, carrying the value the parser kept for it.
    fn object_fields(
        &self,
        at: usize,
        fields: BTreeMap<String, gql::Value<'_, String>>,
    ) -> Vec<(Spanning<String>, Spanning<InputValue>)> {
        let mut located = vec![];
        let mut seen = FnvHashSet::default();

        if self.byte(at) == Some(b'{') {
            let mut key_at = self.skip_ignored(at + 1);
            while !matches!(self.byte(key_at), None | Some(b'}')) {
                let key_end = self.skip_name(key_at);
                let Some(key) = self.source.get(key_at..key_end).filter(|k| !k.is_empty()) else {
                    break;
                };
                let value_at = self.after_punct(self.skip_ignored(key_end), b':');
                let value_end = self.skip_value(value_at);
                if let Some(value) = fields.get(key) {
                    seen.insert(key);
                    located.push((
                        self.spanning(key_at, key.to_owned()),
                        self.input_value(value_at, value.clone()),
                    ));
                }
                if value_end == value_at {
                    break;
                }
                key_at = self.skip_ignored(value_end);
            }
        }

        for (key, value) in &fields {
            if !seen.contains(key.as_str()) {
                located.push((
                    self.spanning(at, key.clone()),
                    self.input_value(at, value.clone()),
                ));
            }
        }
        located
    }

    fn type_literal(t: gql::Type<'_, String>) -> Type {
        match t {
            gql::Type::NamedType(name) => Type::Named(name),
            gql::Type::ListType(inner) => Type::List(Box::new(Self::type_literal(*inner))),
            gql::Type::NonNullType(inner) => Type::NonNull(Box::new(Self::type_literal(*inner))),
        }
    }
}
