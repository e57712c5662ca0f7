use expect_test::{expect, Expect};
use graphql_normalize::ast::Document;
use graphql_normalize::normalization::{UploadPathMapping, VariablesOutcome};
use graphql_normalize::{normalize_named_operation, Parser, Report, VariablesNormalizer};

fn normalize(
    schema: &str,
    operation: &str,
    operation_name: &str,
    variables: &str,
) -> (Document, VariablesOutcome) {
    let mut definition = Parser::new().parse_schema(schema).unwrap();
    let variables = serde_json::from_str(variables).unwrap();
    let mut operation = Parser::new()
        .parse_operation_with_variables(operation, variables)
        .unwrap();
    let mut report = Report::new();
    let outcome =
        normalize_named_operation(&mut operation, &mut definition, operation_name, &mut report);
    assert!(!report.has_errors(), "{report}");
    (operation, outcome)
}

fn assert_normalized(
    schema: &str,
    operation: &str,
    operation_name: &str,
    variables: &str,
    expected: Expect,
    expected_variables: Expect,
) -> VariablesOutcome {
    let (operation, outcome) = normalize(schema, operation, operation_name, variables);
    expected.assert_eq(&operation.serialize().to_string());
    expected_variables.assert_eq(&serde_json::to_string(&operation.input.variables).unwrap());
    outcome
}

const HTTP_BIN_SCHEMA: &str = r#"
type Query { ok: String }
type Mutation { httpBinPost(input: HttpBinPostInput): HttpBinPostResponse }
input HttpBinPostInput { foo: String! }
type HttpBinPostResponse { headers: Headers data: HttpBinPostResponseData }
type Headers { userAgent: String! }
type HttpBinPostResponseData { foo: String }
"#;

#[test]
fn literal_argument_becomes_a_variable() {
    let outcome = assert_normalized(
        HTTP_BIN_SCHEMA,
        r#"
        mutation HttpBinPost {
          httpBinPost(input: {foo: "bar"}) {
            headers { userAgent }
            data { foo }
          }
        }
        "#,
        "HttpBinPost",
        "{}",
        expect![[r#"
            mutation HttpBinPost($a: HttpBinPostInput) {
              httpBinPost(input: $a) {
                headers {
                  userAgent
                }
                data {
                  foo
                }
              }
            }
        "#]],
        expect![[r#"{"a":{"foo":"bar"}}"#]],
    );
    assert_eq!(
        outcome.field_argument_mapping.get("httpBinPost.input"),
        Some(&"a".to_owned())
    );
}

#[test]
fn normalization_is_idempotent() {
    let (first, _) = normalize(
        HTTP_BIN_SCHEMA,
        r#"
        mutation HttpBinPost {
          httpBinPost(input: {foo: "bar"}) {
            headers { userAgent }
          }
        }
        "#,
        "HttpBinPost",
        "{}",
    );
    let printed = first.serialize().to_string();
    let variables = serde_json::to_string(&first.input.variables).unwrap();

    let (second, _) = normalize(HTTP_BIN_SCHEMA, &printed, "HttpBinPost", &variables);
    assert_eq!(second.serialize().to_string(), printed);
    assert_eq!(
        serde_json::to_string(&second.input.variables).unwrap(),
        variables
    );
}

#[test]
fn equal_literals_of_equal_type_share_one_variable() {
    let outcome = assert_normalized(
        r#"
        type Query { q(in: InputX): String }
        input InputX { x: Int }
        "#,
        r#"
        query Q {
          first: q(in: {x: 1})
          second: q(in: {x: 1})
        }
        "#,
        "Q",
        "{}",
        expect![[r#"
            query Q($a: InputX) {
              first: q(in: $a)
              second: q(in: $a)
            }
        "#]],
        expect![[r#"{"a":{"x":1}}"#]],
    );
    assert_eq!(outcome.field_argument_mapping.get("first.in"), Some(&"a".to_owned()));
    assert_eq!(outcome.field_argument_mapping.get("second.in"), Some(&"a".to_owned()));
}

#[test]
fn literals_of_different_types_get_distinct_variables() {
    assert_normalized(
        r#"
        type Query { q(a: InputA, b: InputB): String }
        input InputA { stringList: [String] }
        input InputB { intList: [Int] }
        "#,
        r#"
        query Q {
          q(a: {stringList: "str"}, b: {intList: 1})
        }
        "#,
        "Q",
        "{}",
        expect![[r#"
            query Q($a: InputA, $b: InputB) {
              q(a: $a, b: $b)
            }
        "#]],
        expect![[r#"{"a":{"stringList":["str"]},"b":{"intList":[1]}}"#]],
    );
}

const EPISODE_SCHEMA: &str = r#"
type Query { hero(episode: Episode): Character droid(id: ID!): Character }
enum Episode { NEWHOPE EMPIRE JEDI }
interface Character { name: String }
"#;

#[test]
fn variable_default_moves_into_the_variables_object() {
    assert_normalized(
        EPISODE_SCHEMA,
        r#"
        query Q($episode: Episode = JEDI) {
          hero(episode: $episode) { name }
        }
        "#,
        "Q",
        "{}",
        expect![[r#"
            query Q($episode: Episode) {
              hero(episode: $episode) {
                name
              }
            }
        "#]],
        expect![[r#"{"episode":"JEDI"}"#]],
    );
}

#[test]
fn caller_supplied_value_wins_over_the_default() {
    assert_normalized(
        EPISODE_SCHEMA,
        r#"
        query Q($episode: Episode = JEDI) {
          hero(episode: $episode) { name }
        }
        "#,
        "Q",
        r#"{"episode":"EMPIRE"}"#,
        expect![[r#"
            query Q($episode: Episode) {
              hero(episode: $episode) {
                name
              }
            }
        "#]],
        expect![[r#"{"episode":"EMPIRE"}"#]],
    );
}

#[test]
fn defaulted_variable_in_non_null_position_is_promoted() {
    assert_normalized(
        EPISODE_SCHEMA,
        r#"
        query Q($id: ID = "1") {
          droid(id: $id) { name }
        }
        "#,
        "Q",
        "{}",
        expect![[r#"
            query Q($id: ID!) {
              droid(id: $id) {
                name
              }
            }
        "#]],
        expect![[r#"{"id":"1"}"#]],
    );
}

#[test]
fn omitted_argument_with_schema_default_is_materialized() {
    assert_normalized(
        r#"
        type Query { hero(episode: Episode = JEDI): Character }
        enum Episode { NEWHOPE EMPIRE JEDI }
        interface Character { name: String }
        "#,
        "query Q { hero { name } }",
        "Q",
        "{}",
        expect![[r#"
            query Q($a: Episode) {
              hero(episode: $a) {
                name
              }
            }
        "#]],
        expect![[r#"{"a":"JEDI"}"#]],
    );
}

#[test]
fn unused_variable_and_its_value_are_removed() {
    assert_normalized(
        EPISODE_SCHEMA,
        r#"
        query Q($unused: String) {
          hero { name }
        }
        "#,
        "Q",
        r#"{"unused":"foo"}"#,
        expect![[r#"
            query Q {
              hero {
                name
              }
            }
        "#]],
        expect![[r#"{}"#]],
    );
}

#[test]
fn single_value_is_coerced_to_the_declared_list_depth() {
    assert_normalized(
        r#"type Query { strings(list: [String]): String }"#,
        r#"
        query Q($a: [String]) {
          strings(list: $a)
        }
        "#,
        "Q",
        r#"{"a":"str"}"#,
        expect![[r#"
            query Q($a: [String]) {
              strings(list: $a)
            }
        "#]],
        expect![[r#"{"a":["str"]}"#]],
    );
}

#[test]
fn list_coercion_descends_into_nested_input_objects() {
    assert_normalized(
        r#"
        type Query { q(a: InputA): String }
        input InputA { nested: [[[[[InputB]]]]] }
        input InputB { stringList: [String] }
        "#,
        r#"
        query Q($a: InputA) {
          q(a: $a)
        }
        "#,
        "Q",
        r#"{"a":{"nested":{"stringList":"str"}}}"#,
        expect![[r#"
            query Q($a: InputA) {
              q(a: $a)
            }
        "#]],
        expect![[r#"{"a":{"nested":[[[[[{"stringList":["str"]}]]]]]}}"#]],
    );
}

#[test]
fn input_object_field_defaults_are_injected() {
    assert_normalized(
        r#"
        type Query { q(in: InputA): String }
        input InputA { fieldA: EnumVal = VALUE_A fieldB: String }
        enum EnumVal { VALUE_A VALUE_B }
        "#,
        r#"
        query Q($a: InputA) {
          q(in: $a)
        }
        "#,
        "Q",
        r#"{"a":{"fieldB":"dupa"}}"#,
        expect![[r#"
            query Q($a: InputA) {
              q(in: $a)
            }
        "#]],
        expect![[r#"{"a":{"fieldB":"dupa","fieldA":"VALUE_A"}}"#]],
    );
}

const UPLOAD_SCHEMA: &str = r#"
type Query { ok: String }
scalar Upload
type Mutation {
  upload(file: Upload): String
  multi(input: FileInput): String
}
input FileInput { file: Upload files: [Upload] }
"#;

#[test]
fn direct_upload_variable_keeps_its_path() {
    let (_, outcome) = normalize(
        UPLOAD_SCHEMA,
        r#"
        mutation M($file: Upload) {
          upload(file: $file)
        }
        "#,
        "M",
        r#"{"file":null}"#,
    );
    assert_eq!(
        outcome.upload_path_mappings,
        [UploadPathMapping {
            variable_name: "file".to_owned(),
            original_upload_path: "variables.file".to_owned(),
            new_upload_path: String::new(),
        }]
    );
}

#[test]
fn upload_nested_in_an_extracted_value_is_repathed() {
    let (operation, outcome) = normalize(
        UPLOAD_SCHEMA,
        r#"
        mutation M($f: Upload) {
          multi(input: {file: $f})
        }
        "#,
        "M",
        r#"{"f":null}"#,
    );
    expect![[r#"
        mutation M($f: Upload, $a: FileInput) {
          multi(input: $a)
        }
    "#]]
    .assert_eq(&operation.serialize().to_string());
    expect![[r#"{"f":null,"a":{"file":null}}"#]]
        .assert_eq(&serde_json::to_string(&operation.input.variables).unwrap());
    assert_eq!(
        outcome.upload_path_mappings,
        [UploadPathMapping {
            variable_name: "a".to_owned(),
            original_upload_path: "variables.f".to_owned(),
            new_upload_path: "variables.a.file".to_owned(),
        }]
    );
}

#[test]
fn variables_normalizer_runs_the_variable_stages_alone() {
    let definition = Parser::new()
        .parse_schema(r#"type Query { droid(id: ID!): Droid } type Droid { name: String }"#)
        .unwrap();
    let variables = serde_json::from_str(r#"{"unused":"x"}"#).unwrap();
    let mut operation = Parser::new()
        .parse_operation_with_variables(
            r#"query Q($unused: String) { droid(id: "1") { name } }"#,
            variables,
        )
        .unwrap();
    let mut report = Report::new();
    VariablesNormalizer::new().normalize(&mut operation, Some(&definition), &mut report);
    assert!(!report.has_errors(), "{report}");

    expect![[r#"
        query Q($a: ID!) {
          droid(id: $a) {
            name
          }
        }
    "#]]
    .assert_eq(&operation.serialize().to_string());
    expect![[r#"{"a":"1"}"#]]
        .assert_eq(&serde_json::to_string(&operation.input.variables).unwrap());
}
