use graphql_normalize::ast::{Document, NodeKind, OperationType, Ref};
use graphql_normalize::{DefinitionNormalizer, Parser, Report};
use pretty_assertions::assert_eq;

fn normalize_schema(source: &str) -> Document {
    let mut definition = Parser::new().parse_schema(source).unwrap();
    let mut report = Report::new();
    DefinitionNormalizer::new().normalize(&mut definition, &mut report);
    assert!(!report.has_errors(), "{report}");
    definition
}

#[test]
fn extensions_of_every_kind_fold_into_their_base() {
    let doc = normalize_schema(
        r#"
        type Query { a: String }
        extend type Query { b: String }

        interface I { a: String }
        extend interface I { b: String }

        union U = A
        extend union U = B
        type A { id: ID }
        type B { id: ID }

        enum E { A }
        extend enum E { B }

        scalar Date
        extend scalar Date @specifiedBy(url: "x")

        input In { a: String }
        extend input In { b: String }
        "#,
    );

    for name in ["Query", "I", "U", "E", "Date", "In"] {
        assert_eq!(doc.index.nodes_by_name(name).len(), 1, "{name}");
        assert!(!doc.index.nodes_by_name(name)[0].is_extension(), "{name}");
    }

    let query = doc.index.first_non_extension_node_by_name("Query").unwrap();
    assert!(doc.field_definition_by_node_and_name(query, "a").is_some());
    assert!(doc.field_definition_by_node_and_name(query, "b").is_some());

    let interface = doc.index.first_non_extension_node_by_name("I").unwrap();
    assert!(doc.field_definition_by_node_and_name(interface, "b").is_some());

    assert!(doc.union_has_member("U", "A"));
    assert!(doc.union_has_member("U", "B"));

    let e = doc.index.first_non_extension_node_by_name("E").unwrap();
    assert_eq!(e.kind, NodeKind::EnumTypeDefinition);
    let values: Vec<&str> = doc.enum_type_definitions[Ref::new(e.index)]
        .values
        .iter()
        .map(|&v| doc.slice(doc.enum_value_definitions[v].name))
        .collect();
    assert_eq!(values, ["A", "B"]);

    let date = doc.index.first_non_extension_node_by_name("Date").unwrap();
    assert_eq!(date.kind, NodeKind::ScalarTypeDefinition);
    assert_eq!(
        doc.scalar_type_definitions[Ref::new(date.index)].directives.len(),
        1
    );

    let input = doc.index.first_non_extension_node_by_name("In").unwrap();
    assert!(doc.input_object_field_by_name(input, "a").is_some());
    assert!(doc.input_object_field_by_name(input, "b").is_some());
}

#[test]
fn extends_directive_turns_a_definition_into_an_extension() {
    let doc = normalize_schema(
        r#"
        type Query { ok: String }
        type Product @extends { id: ID }
        "#,
    );

    // No base definition exists for Product, so the rewritten extension
    // stays in place.
    assert!(doc.index.first_non_extension_node_by_name("Product").is_none());
    let nodes = doc.index.nodes_by_name("Product");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].kind, NodeKind::ObjectTypeExtension);
    assert!(doc.field_definition_by_node_and_name(nodes[0], "id").is_some());
}

#[test]
fn extending_an_undeclared_root_operation_type_creates_its_base() {
    let doc = normalize_schema(
        r#"
        type Query { ok: String }
        extend type Mutation { m: String }
        "#,
    );

    let mutation = doc
        .index
        .first_non_extension_node_by_name("Mutation")
        .unwrap();
    assert_eq!(mutation.kind, NodeKind::ObjectTypeDefinition);
    assert!(doc.field_definition_by_node_and_name(mutation, "m").is_some());
    assert_eq!(
        doc.index.root_operation_type_name(OperationType::Mutation),
        Some("Mutation")
    );
}
