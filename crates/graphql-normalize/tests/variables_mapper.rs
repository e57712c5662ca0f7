use expect_test::expect;
use graphql_normalize::{Parser, Report, VariablesMapper};
use pretty_assertions::assert_eq;

const SCHEMA: &str = r#"
type Query {
  a(x: String): String
  b(x: String): String
}
"#;

#[test]
fn variables_are_renamed_in_first_use_order() {
    let definition = Parser::new().parse_schema(SCHEMA).unwrap();
    let mut operation = Parser::new()
        .parse_operation(
            r#"
            query Q($foo: String, $bar: String) {
              a(x: $bar)
              b(x: $foo)
            }
            "#,
        )
        .unwrap();
    let mut report = Report::new();
    let mapping = VariablesMapper::new().normalize(&mut operation, Some(&definition), &mut report);
    assert!(!report.has_errors(), "{report}");

    let mapping: Vec<(&str, &str)> = mapping
        .iter()
        .map(|(new, old)| (new.as_str(), old.as_str()))
        .collect();
    assert_eq!(mapping, [("a", "bar"), ("b", "foo")]);

    // Definitions end up sorted by their new names.
    expect![[r#"
        query Q($a: String, $b: String) {
          a(x: $a)
          b(x: $b)
        }
    "#]]
    .assert_eq(&operation.serialize().to_string());
}

#[test]
fn repeated_usages_share_one_new_name() {
    let definition = Parser::new().parse_schema(SCHEMA).unwrap();
    let mut operation = Parser::new()
        .parse_operation(
            r#"
            query Q($value: String) {
              a(x: $value)
              b(x: $value)
            }
            "#,
        )
        .unwrap();
    let mut report = Report::new();
    let mapping = VariablesMapper::new().normalize(&mut operation, Some(&definition), &mut report);
    assert!(!report.has_errors(), "{report}");

    assert_eq!(mapping.get("a"), Some(&"value".to_owned()));
    assert_eq!(mapping.len(), 1);
    expect![[r#"
        query Q($a: String) {
          a(x: $a)
          b(x: $a)
        }
    "#]]
    .assert_eq(&operation.serialize().to_string());
}
