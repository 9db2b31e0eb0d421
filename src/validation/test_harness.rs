use std::sync::Arc;

use crate::{
    ast::OwnedDocument,
    parser::parse_document_source,
    schema::{DirectiveLocation, DirectiveType, Schema, SchemaConfig},
    types::{
        Argument, EnumConfig, EnumType, EnumValue, Field, InputObjectConfig, InputObjectType,
        InterfaceConfig, InterfaceType, ObjectConfig, ObjectType, Type, UnionConfig, UnionType,
    },
    validation::{visit, MultiVisitor, RuleError, ValidatorContext, Visitor},
};

fn name_field() -> Field {
    Field::new("name", Type::string()).argument(Argument::new("surname", Type::boolean()))
}

fn named_interface(name: &str) -> Arc<InterfaceType> {
    InterfaceType::new(
        InterfaceConfig::new(name)
            .field(name_field())
            .resolve_type(|_, _| None),
    )
}

fn union_of(name: &str, members: &[&Arc<ObjectType>]) -> Arc<UnionType> {
    UnionType::new(
        members
            .iter()
            .fold(UnionConfig::new(name), |config, &m| config.member(m.clone()))
            .resolve_type(|_, _| None),
    )
}

fn enum_of(name: &str, values: &[&str]) -> Arc<EnumType> {
    EnumType::new(
        values
            .iter()
            .fold(EnumConfig::new(name), |config, &v| config.value(EnumValue::new(v))),
    )
}

/// The schema the validation rules are tested against.
pub fn test_schema() -> Schema {
    let being = named_interface("Being");
    let pet = named_interface("Pet");
    let canine = named_interface("Canine");
    let intelligent = InterfaceType::new(
        InterfaceConfig::new("Intelligent")
            .field(Field::new("iq", Type::int()))
            .resolve_type(|_, _| None),
    );

    let dog_command = enum_of("DogCommand", &["SIT", "HEEL", "DOWN"]);
    let fur_color = enum_of("FurColor", &["BROWN", "BLACK", "TAN", "SPOTTED"]);

    let dog = ObjectType::new(
        ObjectConfig::new("Dog")
            .field(name_field())
            .field(Field::new("nickname", Type::string()))
            .field(Field::new("barkVolume", Type::int()))
            .field(Field::new("barks", Type::boolean()))
            .field(
                Field::new("doesKnowCommand", Type::boolean())
                    .argument(Argument::new("dogCommand", &dog_command)),
            )
            .field(
                Field::new("isHousetrained", Type::boolean())
                    .argument(Argument::new("atOtherHomes", Type::boolean()).default_value(true)),
            )
            .field(
                Field::new("isAtLocation", Type::boolean())
                    .argument(Argument::new("x", Type::int()))
                    .argument(Argument::new("y", Type::int())),
            )
            .interface(being.clone())
            .interface(pet.clone())
            .interface(canine.clone()),
    );

    let cat = ObjectType::new(
        ObjectConfig::new("Cat")
            .field(name_field())
            .field(Field::new("nickname", Type::string()))
            .field(Field::new("meows", Type::boolean()))
            .field(Field::new("meowVolume", Type::int()))
            .field(Field::new("furColor", &fur_color))
            .interface(being.clone())
            .interface(pet.clone()),
    );

    let human = ObjectType::new(
        ObjectConfig::new("Human")
            .field(name_field())
            .field(Field::new("pets", Type::list(&pet)))
            .field(Field::new("iq", Type::int()))
            .interface(being.clone())
            .interface(intelligent.clone()),
    );
    human.add_field_config(
        "relatives",
        Field::new("relatives", Type::list(Type::non_null(&human))),
    );

    let alien = ObjectType::new(
        ObjectConfig::new("Alien")
            .field(name_field())
            .field(Field::new("iq", Type::int()))
            .field(Field::new("numEyes", Type::int()))
            .interface(being.clone())
            .interface(intelligent.clone()),
    );

    let cat_or_dog = union_of("CatOrDog", &[&cat, &dog]);
    let dog_or_human = union_of("DogOrHuman", &[&dog, &human]);
    let human_or_alien = union_of("HumanOrAlien", &[&human, &alien]);

    let complex_input = InputObjectType::new(
        InputObjectConfig::new("ComplexInput")
            .field(Argument::new("requiredField", Type::non_null(Type::boolean())))
            .field(Argument::new("intField", Type::int()))
            .field(Argument::new("stringField", Type::string()))
            .field(Argument::new("booleanField", Type::boolean()))
            .field(Argument::new("stringListField", Type::list(Type::string()))),
    );

    let string_arg_field =
        |name: &str, arg: Argument| Field::new(name, Type::string()).argument(arg);
    let complicated_args = ObjectType::new(
        ObjectConfig::new("ComplicatedArgs")
            .field(string_arg_field("intArgField", Argument::new("intArg", Type::int())))
            .field(string_arg_field(
                "nonNullIntArgField",
                Argument::new("nonNullIntArg", Type::non_null(Type::int())),
            ))
            .field(string_arg_field(
                "stringArgField",
                Argument::new("stringArg", Type::string()),
            ))
            .field(string_arg_field(
                "booleanArgField",
                Argument::new("booleanArg", Type::boolean()),
            ))
            .field(string_arg_field("enumArgField", Argument::new("enumArg", &fur_color)))
            .field(string_arg_field("floatArgField", Argument::new("floatArg", Type::float())))
            .field(string_arg_field("idArgField", Argument::new("idArg", Type::id())))
            .field(string_arg_field(
                "stringListArgField",
                Argument::new("stringListArg", Type::list(Type::string())),
            ))
            .field(string_arg_field(
                "complexArgField",
                Argument::new("complexArg", &complex_input),
            ))
            .field(
                Field::new("multipleReqs", Type::string())
                    .argument(Argument::new("req1", Type::non_null(Type::int())))
                    .argument(Argument::new("req2", Type::non_null(Type::int()))),
            )
            .field(
                Field::new("multipleOpts", Type::string())
                    .argument(Argument::new("opt1", Type::int()).default_value(0))
                    .argument(Argument::new("opt2", Type::int()).default_value(0)),
            )
            .field(
                Field::new("multipleOptAndReq", Type::string())
                    .argument(Argument::new("req1", Type::non_null(Type::int())))
                    .argument(Argument::new("req2", Type::non_null(Type::int())))
                    .argument(Argument::new("opt1", Type::int()).default_value(0))
                    .argument(Argument::new("opt2", Type::int()).default_value(0)),
            ),
    );

    let query_root = ObjectType::new(
        ObjectConfig::new("QueryRoot")
            .field(Field::new("human", &human).argument(Argument::new("id", Type::id())))
            .field(Field::new("alien", &alien))
            .field(Field::new("dog", &dog))
            .field(Field::new("cat", &cat))
            .field(Field::new("pet", &pet))
            .field(Field::new("being", &being))
            .field(Field::new("catOrDog", &cat_or_dog))
            .field(Field::new("dogOrHuman", &dog_or_human))
            .field(Field::new("humanOrAlien", &human_or_alien))
            .field(Field::new("complicatedArgs", &complicated_args)),
    );

    let mutation_root = ObjectType::new(
        ObjectConfig::new("MutationRoot").field(
            Field::new("testInput", Type::string())
                .argument(Argument::new("input", &complex_input)),
        ),
    );

    let directive =
        |name: &str, location: DirectiveLocation| DirectiveType::new(name, &[location]);

    let config = SchemaConfig::new(query_root)
        .mutation(mutation_root)
        .types([Type::from(&canine)])
        .directive(directive("onQuery", DirectiveLocation::Query))
        .directive(directive("onMutation", DirectiveLocation::Mutation))
        .directive(directive("onField", DirectiveLocation::Field))
        .directive(directive(
            "onFragmentDefinition",
            DirectiveLocation::FragmentDefinition,
        ))
        .directive(directive("onFragmentSpread", DirectiveLocation::FragmentSpread))
        .directive(directive("onInlineFragment", DirectiveLocation::InlineFragment));

    Schema::new(config).unwrap_or_else(|e| panic!("invalid test schema: {e}"))
}

/// Runs a single rule over `q`.
///
/// The schema and the parsed document are leaked, so the rule can borrow
/// from them for `'static`.
pub fn validate<V, F>(schema: Schema, q: &str, factory: F) -> Vec<RuleError>
where
    V: Visitor<'static> + 'static,
    F: Fn() -> V,
{
    let doc = parse_document_source(q)
        .unwrap_or_else(|e| panic!("Parse error on input {q:#?}: {e}"));

    let schema: &'static Schema = Box::leak(Box::new(schema));
    let doc: &'static OwnedDocument = Box::leak(Box::new(doc));

    let mut ctx = ValidatorContext::new(schema, doc);
    let mut mv = MultiVisitor::new(vec![Box::new(factory())]);
    visit(&mut mv, &mut ctx, doc);

    ctx.into_errors()
}

pub fn expect_passes_rule<V, F>(factory: F, q: &str)
where
    V: Visitor<'static> + 'static,
    F: Fn() -> V,
{
    expect_passes_rule_with_schema(test_schema(), factory, q);
}

pub fn expect_passes_rule_with_schema<V, F>(schema: Schema, factory: F, q: &str)
where
    V: Visitor<'static> + 'static,
    F: Fn() -> V,
{
    let errs = validate(schema, q, factory);

    if !errs.is_empty() {
        print_errors(&errs);
        panic!("Expected rule to pass, but errors found");
    }
}

pub fn expect_fails_rule<V, F>(factory: F, q: &str, expected_errors: &[RuleError])
where
    V: Visitor<'static> + 'static,
    F: Fn() -> V,
{
    expect_fails_rule_with_schema(test_schema(), factory, q, expected_errors);
}

pub fn expect_fails_rule_with_schema<V, F>(
    schema: Schema,
    factory: F,
    q: &str,
    expected_errors: &[RuleError],
) where
    V: Visitor<'static> + 'static,
    F: Fn() -> V,
{
    let errs = validate(schema, q, factory);

    if errs.is_empty() {
        panic!("Expected rule to fail, but no errors were found");
    } else if errs != expected_errors {
        println!("==> Expected errors:");
        print_errors(expected_errors);

        println!("\n==> Actual errors:");
        print_errors(&errs);

        panic!("Unexpected set of errors found");
    }
}

fn print_errors(errs: &[RuleError]) {
    for err in errs {
        for p in err.locations() {
            print!("[{:>3},{:>3},{:>3}]  ", p.index(), p.line(), p.column());
        }
        println!("{}", err.message());
    }
}
