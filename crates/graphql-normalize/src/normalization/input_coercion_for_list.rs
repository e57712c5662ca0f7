//! List input coercion over the variables JSON.
//!
//! GraphQL coerces a single value supplied where a list is expected into a
//! one-element list, at every nesting level. Once values live in the
//! variables object that coercion has to be materialized, so each variable
//! value is wrapped to the list depth its declared type demands, including
//! inside nested input-object fields. `null` is a valid list value and is
//! never wrapped.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Document, JsonValue, NodeKind, Ref, Type, TypeKind, VariableDefinition};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn input_coercion_for_list(walker: &mut Walker) -> Rc<RefCell<InputCoercionForList>> {
    let visitor = Rc::new(RefCell::new(InputCoercionForList));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct InputCoercionForList;

impl Visitor for InputCoercionForList {
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
        let coerced = coerce_value(walk.operation, definition, json, ty);
        walk.operation.input.set_variable(&name, coerced);
    }
}

/// Coerces a JSON value to the shape of a type. `types_doc` owns the type
/// chain being unwrapped; named types always resolve in the definition.
fn coerce_value(
    types_doc: &Document,
    definition: &Document,
    json: JsonValue,
    ty: Ref<Type>,
) -> JsonValue {
    match types_doc.types[ty].kind {
        TypeKind::NonNull => match types_doc.types[ty].of_type {
            Some(inner) => coerce_value(types_doc, definition, json, inner),
            None => json,
        },
        TypeKind::List => {
            if json.is_null() {
                return json;
            }
            let Some(item_type) = types_doc.types[ty].of_type else {
                return json;
            };
            match json {
                JsonValue::Array(items) => JsonValue::Array(
                    items
                        .into_iter()
                        .map(|item| coerce_value(types_doc, definition, item, item_type))
                        .collect(),
                ),
                other => JsonValue::Array(vec![coerce_value(
                    types_doc, definition, other, item_type,
                )]),
            }
        }
        TypeKind::Named => {
            let type_name = types_doc.type_name(ty);
            let Some(node) = definition.index.first_non_extension_node_by_name(type_name) else {
                return json;
            };
            if node.kind != NodeKind::InputObjectTypeDefinition {
                return json;
            }
            let JsonValue::Object(mut map) = json else {
                return json;
            };
            let keys: Vec<String> = map.keys().map(|k| k.as_str().to_owned()).collect();
            for key in keys {
                let Some(ivd) = definition.input_object_field_by_name(node, &key) else {
                    continue;
                };
                let field_type = definition.input_value_definitions[ivd].ty;
                if let Some(value) = map.get_mut(key.as_str()) {
                    let taken = std::mem::replace(value, JsonValue::Null);
                    let coerced = coerce_value(definition, definition, taken, field_type);
                    *value = coerced;
                }
            }
            JsonValue::Object(map)
        }
    }
}
