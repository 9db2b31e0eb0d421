use fnv::{FnvHashMap, FnvHashSet};

use crate::{
    ast::{Definition, Document, Fragment, FragmentSpread, Operation},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Scope<'a> {
    Operation(Option<&'a str>),
    Fragment(&'a str),
}

pub struct NoUnusedFragments<'a> {
    spreads: FnvHashMap<Scope<'a>, Vec<&'a str>>,
    current_scope: Option<Scope<'a>>,
}

pub fn factory<'a>() -> NoUnusedFragments<'a> {
    NoUnusedFragments {
        spreads: FnvHashMap::default(),
        current_scope: None,
    }
}

impl<'a> NoUnusedFragments<'a> {
    fn find_reachable_fragments(&self, from: Scope<'a>, result: &mut FnvHashSet<&'a str>) {
        if let Scope::Fragment(name) = from {
            if !result.insert(name) {
                return;
            }
        }

        if let Some(spreads) = self.spreads.get(&from) {
            for spread in spreads {
                self.find_reachable_fragments(Scope::Fragment(spread), result)
            }
        }
    }
}

impl<'a> Visitor<'a> for NoUnusedFragments<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, defs: &'a Document) {
        let mut reachable = FnvHashSet::default();

        for def in defs {
            if let Definition::Operation(op) = def {
                let op_name = op.item.name.as_ref().map(|s| s.item.as_str());
                self.find_reachable_fragments(Scope::Operation(op_name), &mut reachable);
            }
        }

        for def in defs {
            if let Definition::Fragment(fragment) = def {
                let name = &fragment.item.name;
                if !reachable.contains(name.item.as_str()) {
                    ctx.report_error(&error_message(&name.item), &[fragment.start()]);
                }
            }
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        let op_name = op.item.name.as_ref().map(|s| s.item.as_str());
        self.current_scope = Some(Scope::Operation(op_name));
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment>,
    ) {
        self.current_scope = Some(Scope::Fragment(&f.item.name.item));
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread>,
    ) {
        if let Some(scope) = self.current_scope {
            self.spreads
                .entry(scope)
                .or_default()
                .push(&spread.item.name.item);
        }
    }
}

fn error_message(frag_name: &str) -> String {
    format!("Fragment \"{frag_name}\" is never used.")
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        parser::SourcePosition,
        validation::{
            test_harness::{expect_fails_rule, expect_passes_rule},
            RuleError,
        },
    };

    #[test]
    fn all_fragment_names_are_used() {
        expect_passes_rule(
            factory,
            r#"
          {
            human(id: 4) {
              ...HumanFields1
              ... on Human {
                ...HumanFields2
              }
            }
          }
          fragment HumanFields1 on Human {
            name
            ...HumanFields3
          }
          fragment HumanFields2 on Human {
            name
          }
          fragment HumanFields3 on Human {
            name
          }
        "#,
        );
    }

    #[test]
    fn all_fragment_names_are_used_by_multiple_operations() {
        expect_passes_rule(
            factory,
            r#"
          query Foo {
            human(id: 4) {
              ...HumanFields1
            }
          }
          query Bar {
            human(id: 4) {
              ...HumanFields2
            }
          }
          fragment HumanFields1 on Human {
            name
            ...HumanFields3
          }
          fragment HumanFields2 on Human {
            name
          }
          fragment HumanFields3 on Human {
            name
          }
        "#,
        );
    }

    #[test]
    fn contains_unknown_and_undef_fragments() {
        expect_fails_rule(
            factory,
            r#"
          query Foo {
            human(id: 4) {
              ...HumanFields1
            }
          }
          fragment HumanFields1 on Human {
            name
            ...HumanFields3
          }
          fragment HumanFields2 on Human {
            name
          }
          fragment HumanFields3 on Human {
            name
          }
          fragment Unused1 on Human {
            name
          }
          fragment Unused2 on Human {
            ...Unused1
          }
        "#,
            &[
                RuleError::new(
                    &error_message("HumanFields2"),
                    &[SourcePosition::new(216, 10, 10)],
                ),
                RuleError::new(&error_message("Unused1"), &[SourcePosition::new(360, 16, 10)]),
                RuleError::new(&error_message("Unused2"), &[SourcePosition::new(427, 19, 10)]),
            ],
        );
    }

    #[test]
    fn contains_unknown_fragments_with_ref_cycle() {
        expect_fails_rule(
            factory,
            r#"
          {
            dog {
              ...Used
            }
          }
          fragment Used on Dog {
            name
          }
          fragment CycleA on Dog {
            ...CycleB
          }
          fragment CycleB on Dog {
            ...CycleA
          }
        "#,
            &[
                RuleError::new(&error_message("CycleA"), &[SourcePosition::new(151, 9, 10)]),
                RuleError::new(&error_message("CycleB"), &[SourcePosition::new(220, 12, 10)]),
            ],
        );
    }
}
