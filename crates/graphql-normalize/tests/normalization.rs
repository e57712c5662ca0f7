use expect_test::{expect, Expect};
use graphql_normalize::report::ExternalErrorKind;
use graphql_normalize::{normalize_named_operation, Parser, Report};

fn assert_normalized(schema: &str, operation: &str, operation_name: &str, expected: Expect) {
    let mut definition = Parser::new().parse_schema(schema).unwrap();
    let mut operation = Parser::new().parse_operation(operation).unwrap();
    let mut report = Report::new();
    normalize_named_operation(&mut operation, &mut definition, operation_name, &mut report);
    assert!(!report.has_errors(), "{report}");
    expected.assert_eq(&operation.serialize().to_string());
}

const HERO_SCHEMA: &str = r#"
type Query {
  hero: Character
  droid(id: ID!): Droid
}
interface Character {
  name: String
}
type Droid implements Character {
  name: String
}
"#;

#[test]
fn fragment_spread_is_inlined_and_equal_fields_merge() {
    assert_normalized(
        HERO_SCHEMA,
        r#"
        query Hero {
          hero {
            name: name
            ...heroDetails
          }
          hero {
            name
          }
        }
        fragment heroDetails on Character {
          name
        }
        "#,
        "Hero",
        expect![[r#"
            query Hero {
              hero {
                name
              }
            }
        "#]],
    );
}

#[test]
fn fragment_into_subscription_root_collapses() {
    assert_normalized(
        r#"
        type Query { ok: String }
        type Subscription { newMessage: Message }
        type Message { body: String sender: String }
        "#,
        r#"
        subscription Sub {
          ...multipleSubscriptions
        }
        fragment multipleSubscriptions on Subscription {
          newMessage { body sender }
          newMessage { body }
        }
        "#,
        "Sub",
        expect![[r#"
            subscription Sub {
              newMessage {
                body
                sender
              }
            }
        "#]],
    );
}

const PET_SCHEMA: &str = r#"
type Query { pet: Pet }
interface Pet { name: String }
type Dog implements Pet { name: String barkVolume: Int }
"#;

#[test]
fn matching_inline_fragment_is_flattened() {
    assert_normalized(
        PET_SCHEMA,
        r#"
        query Q {
          pet {
            ... on Pet { name }
            ... on Dog { barkVolume }
          }
        }
        "#,
        "Q",
        expect![[r#"
            query Q {
              pet {
                name
                ... on Dog {
                  barkVolume
                }
              }
            }
        "#]],
    );
}

#[test]
fn same_condition_inline_fragments_merge() {
    assert_normalized(
        PET_SCHEMA,
        r#"
        query Q {
          pet {
            ... on Dog { barkVolume }
            ... on Dog { name }
          }
        }
        "#,
        "Q",
        expect![[r#"
            query Q {
              pet {
                ... on Dog {
                  barkVolume
                  name
                }
              }
            }
        "#]],
    );
}

const CAT_OR_DOG_SCHEMA: &str = r#"
type Query { dog: Dog catOrDog: CatOrDog }
interface Pet { name: String }
interface Sentient { name: String }
type Dog implements Pet { name: String barkVolume: Int }
type Cat implements Pet { name: String meowVolume: Int }
union CatOrDog = Cat | Dog
"#;

#[test]
fn disjoint_fragment_spread_is_left_untouched() {
    // Dog does not implement Sentient, so the spread can never match and
    // must survive for validation to report.
    assert_normalized(
        CAT_OR_DOG_SCHEMA,
        r#"
        query Q {
          dog {
            ...sentientFragment
          }
        }
        fragment sentientFragment on Sentient { name }
        "#,
        "Q",
        expect![[r#"
            query Q {
              dog {
                ...sentientFragment
              }
            }
        "#]],
    );
}

#[test]
fn interface_wrapper_dissolves_around_a_disjoint_spread() {
    assert_normalized(
        CAT_OR_DOG_SCHEMA,
        r#"
        query Q {
          dog {
            ...nonIntersecting
          }
        }
        fragment nonIntersecting on Pet { ...sentientFragment }
        fragment sentientFragment on Sentient { name }
        "#,
        "Q",
        expect![[r#"
            query Q {
              dog {
                ...sentientFragment
              }
            }
        "#]],
    );
}

#[test]
fn union_fragment_keeps_its_wrapper_inside_a_member_type() {
    assert_normalized(
        CAT_OR_DOG_SCHEMA,
        r#"
        query Q {
          dog {
            ...unionFragment
          }
        }
        fragment unionFragment on CatOrDog {
          ... on Cat { meowVolume }
        }
        "#,
        "Q",
        expect![[r#"
            query Q {
              dog {
                ... on CatOrDog {
                  ... on Cat {
                    meowVolume
                  }
                }
              }
            }
        "#]],
    );
}

#[test]
fn interface_fragment_with_a_disjoint_nested_fragment_stays_wrapped() {
    assert_normalized(
        CAT_OR_DOG_SCHEMA,
        r#"
        query Q {
          dog {
            ... on Pet {
              ... on Cat { meowVolume }
            }
          }
        }
        "#,
        "Q",
        expect![[r#"
            query Q {
              dog {
                ... on Pet {
                  ... on Cat {
                    meowVolume
                  }
                }
              }
            }
        "#]],
    );
}

#[test]
fn exact_union_fragment_flattens_and_members_stay_wrapped() {
    assert_normalized(
        CAT_OR_DOG_SCHEMA,
        r#"
        query Q {
          catOrDog {
            ...catDogFragment
          }
        }
        fragment catDogFragment on CatOrDog {
          ... on Cat { meowVolume }
          ... on Dog { barkVolume }
        }
        "#,
        "Q",
        expect![[r#"
            query Q {
              catOrDog {
                ... on Cat {
                  meowVolume
                }
                ... on Dog {
                  barkVolume
                }
              }
            }
        "#]],
    );
}

#[test]
fn other_operations_are_removed() {
    assert_normalized(
        HERO_SCHEMA,
        r#"
        query First { hero { name } }
        query Second { droid(id: $id) { name } }
        "#,
        "First",
        expect![[r#"
            query First {
              hero {
                name
              }
            }
        "#]],
    );
}

#[test]
fn skip_and_include_resolve_against_literals_and_variables() {
    let mut definition = Parser::new()
        .parse_schema("type Query { a: String b: String c: String }")
        .unwrap();
    let variables = serde_json::from_str(r#"{"flag": true}"#).unwrap();
    let mut operation = Parser::new()
        .parse_operation_with_variables(
            r#"
            query Q($flag: Boolean!) {
              a @include(if: $flag)
              b @skip(if: true)
              c
            }
            "#,
            variables,
        )
        .unwrap();
    let mut report = Report::new();
    normalize_named_operation(&mut operation, &mut definition, "Q", &mut report);
    assert!(!report.has_errors(), "{report}");

    // The resolved condition strips the directive, so `$flag` loses its
    // last usage and is pruned together with its value.
    expect![[r#"
        query Q {
          a
          c
        }
    "#]]
    .assert_eq(&operation.serialize().to_string());
    expect![[r#"{}"#]]
        .assert_eq(&serde_json::to_string(&operation.input.variables).unwrap());
}

#[test]
fn include_conditions_resolve_per_variable() {
    let mut definition = Parser::new()
        .parse_schema(
            r#"
            type Query { person: Person }
            type Person { name: String age: Int }
            "#,
        )
        .unwrap();
    let variables = serde_json::from_str(r#"{"withName": true, "withAge": false}"#).unwrap();
    let mut operation = Parser::new()
        .parse_operation_with_variables(
            r#"
            query Q($withName: Boolean!, $withAge: Boolean!) {
              person {
                name @include(if: $withName)
                age @include(if: $withAge)
              }
            }
            "#,
            variables,
        )
        .unwrap();
    let mut report = Report::new();
    normalize_named_operation(&mut operation, &mut definition, "Q", &mut report);
    assert!(!report.has_errors(), "{report}");

    expect![[r#"
        query Q {
          person {
            name
          }
        }
    "#]]
    .assert_eq(&operation.serialize().to_string());
    expect![[r#"{}"#]]
        .assert_eq(&serde_json::to_string(&operation.input.variables).unwrap());
}

#[test]
fn conditional_fragment_spreads_collapse_to_the_included_content() {
    let mut definition = Parser::new()
        .parse_schema(
            r#"
            type Query { hero: Hero }
            type Hero { name: String age: Int }
            "#,
        )
        .unwrap();
    let variables = serde_json::from_str(r#"{"withAge": true, "withName": false}"#).unwrap();
    let mut operation = Parser::new()
        .parse_operation_with_variables(
            r#"
            query Game($withAge: Boolean!, $withName: Boolean!) {
              hero {
                ...N @include(if: $withName)
                ...A @include(if: $withAge)
              }
            }
            fragment N on Hero { name }
            fragment A on Hero { age }
            "#,
            variables,
        )
        .unwrap();
    let mut report = Report::new();
    normalize_named_operation(&mut operation, &mut definition, "Game", &mut report);
    assert!(!report.has_errors(), "{report}");

    expect![[r#"
        query Game {
          hero {
            age
          }
        }
    "#]]
    .assert_eq(&operation.serialize().to_string());
    expect![[r#"{}"#]]
        .assert_eq(&serde_json::to_string(&operation.input.variables).unwrap());
}

#[test]
fn removing_the_last_selection_leaves_a_typename_placeholder() {
    assert_normalized(
        HERO_SCHEMA,
        r#"
        query Q {
          hero @include(if: false) {
            name
          }
        }
        "#,
        "Q",
        expect![[r#"
            query Q {
              __internal__typename_placeholder: __typename
            }
        "#]],
    );
}

#[test]
fn undefined_fragment_is_reported() {
    let mut definition = Parser::new().parse_schema(HERO_SCHEMA).unwrap();
    let mut operation = Parser::new()
        .parse_operation("query Q { hero { ...missing } }")
        .unwrap();
    let mut report = Report::new();
    normalize_named_operation(&mut operation, &mut definition, "Q", &mut report);
    assert_eq!(
        report.external_errors[0].kind,
        ExternalErrorKind::FragmentUndefined("missing".to_owned())
    );
}

#[test]
fn undefined_field_is_reported() {
    let mut definition = Parser::new().parse_schema(HERO_SCHEMA).unwrap();
    let mut operation = Parser::new()
        .parse_operation("query Q { hero { friends { name } } }")
        .unwrap();
    let mut report = Report::new();
    normalize_named_operation(&mut operation, &mut definition, "Q", &mut report);
    assert_eq!(
        report.external_errors[0].kind,
        ExternalErrorKind::FieldUndefinedOnType {
            field_name: "friends".to_owned(),
            type_name: "Character".to_owned(),
        }
    );
}

#[test]
fn fragment_cycle_is_reported() {
    let mut definition = Parser::new().parse_schema(HERO_SCHEMA).unwrap();
    let mut operation = Parser::new()
        .parse_operation(
            r#"
            query Q { hero { ...a } }
            fragment a on Character { ...b }
            fragment b on Character { ...a }
            "#,
        )
        .unwrap();
    let mut report = Report::new();
    normalize_named_operation(&mut operation, &mut definition, "Q", &mut report);
    assert_eq!(
        report.external_errors[0].kind,
        ExternalErrorKind::FragmentSpreadFormsCycle("a".to_owned())
    );
}
