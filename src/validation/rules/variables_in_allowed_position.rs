use fnv::FnvHashMap;

use crate::{
    ast::{Operation, VariableDefinition},
    parser::{SourcePosition, Spanning},
    types::Type,
    validation::{ValidatorContext, Visitor},
};

struct DefinedVariable {
    location: SourcePosition,
    var_type: Type,
    /// The declared type, upgraded to non-null when a default is given.
    effective_type: Type,
}

pub struct VariablesInAllowedPosition<'a> {
    in_operation: bool,
    variable_defs: FnvHashMap<&'a str, Option<DefinedVariable>>,
}

pub fn factory<'a>() -> VariablesInAllowedPosition<'a> {
    VariablesInAllowedPosition {
        in_operation: false,
        variable_defs: FnvHashMap::default(),
    }
}

impl<'a> Visitor<'a> for VariablesInAllowedPosition<'a> {
    fn follows_fragment_spreads(&self) -> bool {
        true
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation>,
    ) {
        self.in_operation = true;
        self.variable_defs.clear();
    }

    fn exit_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation>,
    ) {
        self.in_operation = false;
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (var_name, var_def): &'a (Spanning<String>, VariableDefinition),
    ) {
        let defined = ctx
            .schema
            .type_from_ast(&var_def.var_type.item)
            .map(|var_type| {
                let effective_type = match (&var_def.default_value, &var_type) {
                    (Some(_), t) if !t.is_non_null() => Type::non_null(t.clone()),
                    _ => var_type.clone(),
                };
                DefinedVariable {
                    location: var_name.start(),
                    var_type,
                    effective_type,
                }
            });

        self.variable_defs.insert(&var_name.item, defined);
    }

    fn enter_variable_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        var_name: Spanning<&'a String>,
    ) {
        if !self.in_operation {
            return;
        }
        let Some(Some(defined)) = self.variable_defs.get(var_name.item.as_str()) else {
            return;
        };
        let Some(expected_type) = ctx.current_input_type() else {
            return;
        };

        if !ctx.schema.is_subtype(&defined.effective_type, expected_type) {
            let message = error_message(
                var_name.item,
                &defined.var_type.to_string(),
                &expected_type.to_string(),
            );
            ctx.report_error(&message, &[defined.location, var_name.start()]);
        }
    }
}

fn error_message(var_name: &str, type_name: &str, expected_type_name: &str) -> String {
    format!(
        "Variable \"${var_name}\" of type \"{type_name}\" used in position expecting type \
         \"{expected_type_name}\".",
    )
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
    fn boolean_into_boolean() {
        expect_passes_rule(
            factory,
            r#"
          query Query($booleanArg: Boolean)
          {
            complicatedArgs {
              booleanArgField(booleanArg: $booleanArg)
            }
          }
        "#,
        );
    }

    #[test]
    fn boolean_into_boolean_within_fragment() {
        expect_passes_rule(
            factory,
            r#"
          fragment booleanArgFrag on ComplicatedArgs {
            booleanArgField(booleanArg: $booleanArg)
          }
          query Query($booleanArg: Boolean)
          {
            complicatedArgs {
              ...booleanArgFrag
            }
          }
        "#,
        );

        expect_passes_rule(
            factory,
            r#"
          query Query($booleanArg: Boolean)
          {
            complicatedArgs {
              ...booleanArgFrag
            }
          }
          fragment booleanArgFrag on ComplicatedArgs {
            booleanArgField(booleanArg: $booleanArg)
          }
        "#,
        );
    }

    #[test]
    fn non_null_boolean_into_boolean() {
        expect_passes_rule(
            factory,
            r#"
          query Query($nonNullBooleanArg: Boolean!)
          {
            complicatedArgs {
              booleanArgField(booleanArg: $nonNullBooleanArg)
            }
          }
        "#,
        );
    }

    #[test]
    fn int_into_non_null_int_with_default() {
        expect_passes_rule(
            factory,
            r#"
          query Query($intArg: Int = 1)
          {
            complicatedArgs {
              nonNullIntArgField(nonNullIntArg: $intArg)
            }
          }
        "#,
        );
    }

    #[test]
    fn string_list_into_string_list() {
        expect_passes_rule(
            factory,
            r#"
          query Query($stringListVar: [String])
          {
            complicatedArgs {
              stringListArgField(stringListArg: $stringListVar)
            }
          }
        "#,
        );
    }

    #[test]
    fn non_null_string_list_into_string_list() {
        expect_passes_rule(
            factory,
            r#"
          query Query($stringListVar: [String!])
          {
            complicatedArgs {
              stringListArgField(stringListArg: $stringListVar)
            }
          }
        "#,
        );
    }

    #[test]
    fn string_into_string_list_in_item_position() {
        expect_passes_rule(
            factory,
            r#"
          query Query($stringVar: String)
          {
            complicatedArgs {
              stringListArgField(stringListArg: [$stringVar])
            }
          }
        "#,
        );
    }

    #[test]
    fn non_null_string_into_string_list_in_item_position() {
        expect_passes_rule(
            factory,
            r#"
          query Query($stringVar: String!)
          {
            complicatedArgs {
              stringListArgField(stringListArg: [$stringVar])
            }
          }
        "#,
        );
    }

    #[test]
    fn complex_input_into_complex_input() {
        expect_passes_rule(
            factory,
            r#"
          query Query($complexVar: ComplexInput)
          {
            complicatedArgs {
              complexArgField(complexArg: $complexVar)
            }
          }
        "#,
        );
    }

    #[test]
    fn boolean_with_default_into_non_null_input_field() {
        expect_passes_rule(
            factory,
            r#"
          query Query($boolVar: Boolean = false)
          {
            complicatedArgs {
              complexArgField(complexArg: {requiredField: $boolVar})
            }
          }
        "#,
        );
    }

    #[test]
    fn non_null_boolean_into_non_null_boolean_in_directive() {
        expect_passes_rule(
            factory,
            r#"
          query Query($boolVar: Boolean!)
          {
            dog @include(if: $boolVar)
          }
        "#,
        );
    }

    #[test]
    fn boolean_with_default_into_non_null_boolean_in_directive() {
        expect_passes_rule(
            factory,
            r#"
          query Query($boolVar: Boolean = false)
          {
            dog @include(if: $boolVar)
          }
        "#,
        );
    }

    #[test]
    fn int_into_non_null_int() {
        expect_fails_rule(
            factory,
            r#"
          query Query($intArg: Int) {
            complicatedArgs {
              nonNullIntArgField(nonNullIntArg: $intArg)
            }
          }
        "#,
            &[RuleError::new(
                &error_message("intArg", "Int", "Int!"),
                &[SourcePosition::new(23, 1, 22), SourcePosition::new(117, 3, 48)],
            )],
        );
    }

    #[test]
    fn int_into_non_null_int_within_fragment() {
        expect_fails_rule(
            factory,
            r#"
          fragment nonNullIntArgFieldFrag on ComplicatedArgs {
            nonNullIntArgField(nonNullIntArg: $intArg)
          }

          query Query($intArg: Int) {
            complicatedArgs {
              ...nonNullIntArgFieldFrag
            }
          }
        "#,
            &[RuleError::new(
                &error_message("intArg", "Int", "Int!"),
                &[SourcePosition::new(154, 5, 22), SourcePosition::new(110, 2, 46)],
            )],
        );
    }

    #[test]
    fn string_over_boolean() {
        expect_fails_rule(
            factory,
            r#"
          query Query($stringVar: String) {
            complicatedArgs {
              booleanArgField(booleanArg: $stringVar)
            }
          }
        "#,
            &[RuleError::new(
                &error_message("stringVar", "String", "Boolean"),
                &[SourcePosition::new(23, 1, 22), SourcePosition::new(117, 3, 42)],
            )],
        );
    }

    #[test]
    fn string_into_string_list() {
        expect_fails_rule(
            factory,
            r#"
          query Query($stringVar: String) {
            complicatedArgs {
              stringListArgField(stringListArg: $stringVar)
            }
          }
        "#,
            &[RuleError::new(
                &error_message("stringVar", "String", "[String]"),
                &[SourcePosition::new(23, 1, 22), SourcePosition::new(123, 3, 48)],
            )],
        );
    }

    #[test]
    fn boolean_into_non_null_boolean_in_directive() {
        expect_fails_rule(
            factory,
            r#"
          query Query($boolVar: Boolean) {
            dog @include(if: $boolVar)
          }
        "#,
            &[RuleError::new(
                &error_message("boolVar", "Boolean", "Boolean!"),
                &[SourcePosition::new(23, 1, 22), SourcePosition::new(73, 2, 29)],
            )],
        );
    }

    #[test]
    fn string_into_non_null_boolean_in_directive() {
        expect_fails_rule(
            factory,
            r#"
          query Query($stringVar: String) {
            dog @include(if: $stringVar)
          }
        "#,
            &[RuleError::new(
                &error_message("stringVar", "String", "Boolean!"),
                &[SourcePosition::new(23, 1, 22), SourcePosition::new(74, 2, 29)],
            )],
        );
    }
}
