//! Discovery of file-upload positions in argument values.
//!
//! Multipart upload requests pass files as variables whose JSON value is
//! `null`; the client-side file map addresses them by a dotted path such as
//! `variables.input.files.0`. When variable extraction moves an inline
//! value into a fresh variable those paths shift, so the finder records,
//! per upload, the path before extraction and the path relative to the
//! extracted argument.

use crate::ast::{
    Argument, Document, InputValueDefinition, JsonValue, NodeKind, OperationDefinition, Ref, Type,
    TypeKind, Value, VariableValue,
};

const UPLOAD_SCALAR_NAME: &str = "Upload";

/// One discovered upload position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPathMapping {
    /// Variable holding the upload, directly or nested inside its value.
    pub variable_name: String,
    /// Dotted path to the upload relative to the variables object, for
    /// example `variables.f`.
    pub original_upload_path: String,
    /// When the variable sat inside an inline object value, the path of the
    /// upload relative to the extracted argument. Empty when the variable
    /// was the argument value itself and the path did not change.
    pub new_upload_path: String,
}

/// Finds uploads reachable from a single argument. Returns an empty list
/// when the schema has no scalar named `Upload`.
pub(crate) fn find_uploads(
    operation: &Document,
    definition: &Document,
    current_operation: Ref<OperationDefinition>,
    argument: Ref<Argument>,
    input_value_definition: Ref<InputValueDefinition>,
) -> Vec<UploadPathMapping> {
    let upload_scalar = definition
        .index
        .first_non_extension_node_by_name(UPLOAD_SCALAR_NAME);
    match upload_scalar {
        Some(node) if node.kind == NodeKind::ScalarTypeDefinition => {}
        _ => return Vec::new(),
    }

    let mut finder = Finder {
        operation,
        definition,
        current_operation,
        arg_path: Vec::new(),
        variable_path: Vec::new(),
        current_variable_name: String::new(),
        variable_used_directly: false,
        mappings: Vec::new(),
    };
    let value = operation.arguments[argument].value;
    let argument_type = definition.input_value_definitions[input_value_definition].ty;
    finder.traverse_value(value, argument_type);
    finder.mappings
}

struct Finder<'a> {
    operation: &'a Document,
    definition: &'a Document,
    current_operation: Ref<OperationDefinition>,
    /// Path inside the argument value, tracked while traversing the AST.
    arg_path: Vec<String>,
    /// Path inside the variables object, tracked while traversing JSON.
    variable_path: Vec<String>,
    current_variable_name: String,
    variable_used_directly: bool,
    mappings: Vec<UploadPathMapping>,
}

impl Finder<'_> {
    /// Walks the argument's AST value alongside its declared input type.
    fn traverse_value(&mut self, value: Value, definition_type: Ref<Type>) {
        match value {
            Value::Variable(variable) => {
                self.variable_used_directly = self.arg_path.is_empty();
                self.traverse_variable(variable, definition_type);
            }
            Value::List(list) => {
                let item_type = self.definition.type_skip_non_null(definition_type);
                let Some(item_type) = self.definition.types[item_type].of_type else {
                    return;
                };
                let items = self.operation.list_values[list].refs.clone();
                for (i, item) in items.into_iter().enumerate() {
                    self.arg_path.push(i.to_string());
                    self.traverse_value(item, item_type);
                    self.arg_path.pop();
                }
            }
            Value::Object(object) => {
                let type_name = self.definition.type_name(definition_type);
                let Some(node) = self
                    .definition
                    .index
                    .first_non_extension_node_by_name(type_name)
                else {
                    return;
                };
                if node.kind != NodeKind::InputObjectTypeDefinition {
                    return;
                }
                let field_refs = self.operation.object_values[object].refs.clone();
                for field_ref in field_refs {
                    let field = self.operation.object_fields[field_ref];
                    let field_name = self.operation.slice(field.name).to_owned();
                    let Some(ivd) = self
                        .definition
                        .input_object_field_by_name(node, &field_name)
                    else {
                        continue;
                    };
                    self.arg_path.push(field_name);
                    self.traverse_value(field.value, self.definition.input_value_definitions[ivd].ty);
                    self.arg_path.pop();
                }
            }
            Value::Null => {
                if self.definition.type_name(definition_type) == UPLOAD_SCALAR_NAME {
                    self.add_upload_path();
                }
            }
            _ => {}
        }
    }

    /// Switches from the AST value to the variable's JSON value, guided by
    /// the variable's declared type in the operation.
    fn traverse_variable(&mut self, variable: Ref<VariableValue>, definition_type: Ref<Type>) {
        let name = self.operation.variable_value_name(variable).to_owned();
        self.current_variable_name = name.clone();

        let Some(variable_definition) = self
            .operation
            .variable_definition_by_name(self.current_operation, &name)
        else {
            return;
        };
        let variable_type = self.operation.variable_definitions[variable_definition].ty;
        if self.operation.type_name(variable_type) != self.definition.type_name(definition_type) {
            return;
        }

        let Some(json) = self.operation.input.variable(&name) else {
            return;
        };
        self.variable_path.push("variables".to_owned());
        self.variable_path.push(name);
        self.traverse_variable_type(json, variable_type);
        self.variable_path.pop();
        self.variable_path.pop();
    }

    /// Walks a JSON value alongside a type from the operation document.
    fn traverse_variable_type(&mut self, json: &JsonValue, variable_type: Ref<Type>) {
        let ty = &self.operation.types[variable_type];
        match ty.kind {
            TypeKind::NonNull => {
                if let Some(inner) = ty.of_type {
                    self.traverse_variable_type(json, inner);
                }
            }
            TypeKind::List => {
                let Some(inner) = ty.of_type else { return };
                let JsonValue::Array(items) = json else { return };
                for (i, item) in items.iter().enumerate() {
                    self.arg_path.push(i.to_string());
                    self.variable_path.push(i.to_string());
                    self.traverse_variable_type(item, inner);
                    self.arg_path.pop();
                    self.variable_path.pop();
                }
            }
            TypeKind::Named => {
                let type_name = self.operation.slice(ty.name).to_owned();
                if json.is_null() && type_name == UPLOAD_SCALAR_NAME {
                    self.add_upload_path();
                    return;
                }
                self.traverse_named_type(json, &type_name);
            }
        }
    }

    /// Walks a JSON value alongside a named type from the definition
    /// document, descending into input object fields that are present.
    fn traverse_named_type(&mut self, json: &JsonValue, type_name: &str) {
        let Some(node) = self.definition.index.first_non_extension_node_by_name(type_name) else {
            return;
        };
        match node.kind {
            NodeKind::InputObjectTypeDefinition => {
                let JsonValue::Object(map) = json else { return };
                let input_fields = self.definition.input_object_type_definitions
                    [Ref::new(node.index)]
                .input_fields
                .clone();
                for ivd in input_fields {
                    let field_name = self.definition.input_value_definition_name(ivd).to_owned();
                    let Some(field_json) = map.get(field_name.as_str()) else {
                        continue;
                    };
                    let field_type = self.definition.input_value_definitions[ivd].ty;
                    self.arg_path.push(field_name.clone());
                    self.variable_path.push(field_name);
                    self.traverse_definition_type(field_json, field_type);
                    self.arg_path.pop();
                    self.variable_path.pop();
                }
            }
            NodeKind::ScalarTypeDefinition => {
                if type_name == UPLOAD_SCALAR_NAME && json.is_null() {
                    self.add_upload_path();
                }
            }
            _ => {}
        }
    }

    /// Walks a JSON value alongside a type from the definition document.
    fn traverse_definition_type(&mut self, json: &JsonValue, definition_type: Ref<Type>) {
        let ty = &self.definition.types[definition_type];
        match ty.kind {
            TypeKind::NonNull => {
                if let Some(inner) = ty.of_type {
                    self.traverse_definition_type(json, inner);
                }
            }
            TypeKind::List => {
                let Some(inner) = ty.of_type else { return };
                let JsonValue::Array(items) = json else { return };
                for (i, item) in items.iter().enumerate() {
                    self.arg_path.push(i.to_string());
                    self.variable_path.push(i.to_string());
                    self.traverse_definition_type(item, inner);
                    self.arg_path.pop();
                    self.variable_path.pop();
                }
            }
            TypeKind::Named => {
                let type_name = self.definition.slice(ty.name).to_owned();
                self.traverse_named_type(json, &type_name);
            }
        }
    }

    fn add_upload_path(&mut self) {
        let new_upload_path = if self.variable_used_directly {
            String::new()
        } else {
            self.arg_path.join(".")
        };
        self.mappings.push(UploadPathMapping {
            variable_name: self.current_variable_name.clone(),
            original_upload_path: self.variable_path.join("."),
            new_upload_path,
        });
    }
}
