//! Injects input object field defaults into the variables JSON.
//!
//! When a variable holds an input object, fields the caller omitted but
//! the schema defaults are filled in, recursively through nested input
//! objects and lists. Values already present are kept as supplied.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json_bytes::ByteString;

use crate::ast::{
    Document, JsonMap, JsonValue, Node, NodeKind, Ref, Type, TypeKind, VariableDefinition,
};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn inject_input_field_defaults(
    walker: &mut Walker,
) -> Rc<RefCell<InjectInputFieldDefaults>> {
    let visitor = Rc::new(RefCell::new(InjectInputFieldDefaults));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct InjectInputFieldDefaults;

impl Visitor for InjectInputFieldDefaults {
    fn enter_variable_definition(
        &mut self,
        walk: &mut Walk<'_>,
        variable: Ref<VariableDefinition>,
    ) {
        let Some(definition) = walk.definition else {
            return;
        };
        let name = walk.operation.variable_definition_name(variable).to_owned();
        let Some(json) = walk.operation.input.variable(&name).cloned() else {
            return;
        };
        let ty = walk.operation.variable_definitions[variable].ty;
        // Scalars and enums carry no input fields; nothing to inject.
        let type_name = walk.operation.type_name(ty);
        if let Some(node) = definition.index.first_non_extension_node_by_name(type_name) {
            if matches!(
                node.kind,
                NodeKind::ScalarTypeDefinition | NodeKind::EnumTypeDefinition
            ) {
                return;
            }
        }
        match process_value(walk.operation, definition, ty, json) {
            Ok(injected) => walk.operation.input.set_variable(&name, injected),
            Err(error) => walk.stop_with_internal_error(error),
        }
    }
}

/// Rebuilds a JSON value with schema defaults injected. `types_doc` owns
/// the type chain being unwrapped; named types resolve in the definition.
fn process_value(
    types_doc: &Document,
    definition: &Document,
    ty: Ref<Type>,
    json: JsonValue,
) -> Result<JsonValue, String> {
    match types_doc.types[ty].kind {
        TypeKind::NonNull => match types_doc.types[ty].of_type {
            Some(inner) => process_value(types_doc, definition, inner, json),
            None => Ok(json),
        },
        TypeKind::List => {
            let Some(item_type) = types_doc.types[ty].of_type else {
                return Ok(json);
            };
            match json {
                JsonValue::Null => Ok(JsonValue::Null),
                JsonValue::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(process_value(types_doc, definition, item_type, item)?);
                    }
                    Ok(JsonValue::Array(out))
                }
                _ => Err(format!(
                    "mismatched input value: expected a list for type {}",
                    types_doc.type_name(ty)
                )),
            }
        }
        TypeKind::Named => {
            let type_name = types_doc.type_name(ty);
            let Some(node) = definition.index.first_non_extension_node_by_name(type_name) else {
                return Ok(json);
            };
            if node.kind != NodeKind::InputObjectTypeDefinition {
                return Ok(json);
            }
            match json {
                JsonValue::Null => Ok(JsonValue::Null),
                JsonValue::Object(mut map) => {
                    inject_fields(definition, node, &mut map)?;
                    Ok(JsonValue::Object(map))
                }
                _ => Err(format!(
                    "mismatched input value: expected an object for type {type_name}"
                )),
            }
        }
    }
}

fn inject_fields(
    definition: &Document,
    node: Node,
    map: &mut JsonMap,
) -> Result<(), String> {
    let Some(type_name) = definition.node_name(node) else {
        return Ok(());
    };
    // Base definition first, then extensions of the same name.
    let candidates: Vec<Node> = definition.index.nodes_by_name(type_name).to_vec();
    for candidate in candidates {
        let input_fields = match candidate.kind {
            NodeKind::InputObjectTypeDefinition => definition.input_object_type_definitions
                [Ref::new(candidate.index)]
            .input_fields
            .clone(),
            NodeKind::InputObjectTypeExtension => definition.input_object_type_extensions
                [Ref::new(candidate.index)]
            .input_fields
            .clone(),
            _ => continue,
        };
        for ivd in input_fields {
            let field_name = definition.input_value_definition_name(ivd);
            let field_type = definition.input_value_definitions[ivd].ty;
            let default = definition.input_value_definitions[ivd].default_value;

            if field_type_is_leaf(definition, field_type) {
                if map.get(field_name).is_none() {
                    if let Some(default) = default {
                        map.insert(
                            ByteString::from(field_name.to_owned()),
                            definition.value_to_json(default),
                        );
                    }
                }
                continue;
            }

            let value = match map.get(field_name) {
                Some(value) => value.clone(),
                None => match default {
                    Some(default) => definition.value_to_json(default),
                    None => continue,
                },
            };
            let injected = process_value(definition, definition, field_type, value)?;
            map.insert(ByteString::from(field_name.to_owned()), injected);
        }
    }
    Ok(())
}

/// Whether a field's named type is a scalar or enum, or is not defined in
/// the schema at all, as builtin scalars are not.
fn field_type_is_leaf(definition: &Document, ty: Ref<Type>) -> bool {
    if matches!(
        definition.types[definition.type_skip_non_null(ty)].kind,
        TypeKind::List
    ) {
        return false;
    }
    let type_name = definition.type_name(ty);
    match definition.index.first_non_extension_node_by_name(type_name) {
        Some(node) => matches!(
            node.kind,
            NodeKind::ScalarTypeDefinition | NodeKind::EnumTypeDefinition
        ),
        None => true,
    }
}
