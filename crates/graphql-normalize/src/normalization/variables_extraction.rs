//! Moves inline argument values into generated variables.
//!
//! Every literal argument inside an operation is replaced by a fresh
//! variable (`a`, `b`, ...) whose value lands in the variables object, so
//! that operations differing only in argument literals normalize to the
//! same document. Arguments that already hold a variable are left alone.
//! Directive arguments are never extracted; `@skip`/`@include` conditions
//! must stay visible to later evaluation.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{
    Argument, InputValueDefinition, JsonValue, NodeKind, Ref, Value, VariableDefinition,
};
use crate::normalization::uploads::{find_uploads, UploadPathMapping};
use crate::walker::{Visitor, Walk, Walker};

/// Maps `fieldPath.argumentName` keys, for example `user.posts.limit`, to
/// the name of the variable now supplying that argument.
pub type FieldArgumentMapping = IndexMap<String, String>;

pub(crate) fn extract_variables(walker: &mut Walker) -> Rc<RefCell<VariablesExtraction>> {
    let visitor = Rc::new(RefCell::new(VariablesExtraction::default()));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

#[derive(Default)]
pub(crate) struct VariablesExtraction {
    /// Names and definition-document types of the variables this pass
    /// created, the only ones deduplication may reuse.
    extracted: Vec<(String, Ref<crate::ast::Type>)>,
    uploads: Vec<UploadPathMapping>,
    field_argument_mapping: FieldArgumentMapping,
}

impl VariablesExtraction {
    pub(crate) fn upload_path_mappings(&self) -> Vec<UploadPathMapping> {
        self.uploads.clone()
    }

    pub(crate) fn field_argument_mapping(&self) -> FieldArgumentMapping {
        self.field_argument_mapping.clone()
    }
}

impl Visitor for VariablesExtraction {
    fn enter_document(&mut self, _walk: &mut Walk<'_>) {
        self.extracted.clear();
        self.uploads.clear();
        self.field_argument_mapping.clear();
    }

    fn enter_argument(&mut self, walk: &mut Walk<'_>, argument: Ref<Argument>) {
        let Some(&first) = walk.ancestors.first() else {
            return;
        };
        if first.kind != NodeKind::OperationDefinition {
            return;
        }
        if walk.ancestors.iter().any(|a| a.kind == NodeKind::Directive) {
            return;
        }
        let operation_ref: Ref<crate::ast::OperationDefinition> = Ref::new(first.index);

        let Some(definition) = walk.definition else {
            return;
        };
        let Some(input_value_definition) = argument_input_value_definition(walk, argument) else {
            return;
        };

        let mut uploads_mapping = find_uploads(
            walk.operation,
            definition,
            operation_ref,
            argument,
            input_value_definition,
        );

        if let Value::Variable(variable) = walk.operation.arguments[argument].value {
            self.uploads.append(&mut uploads_mapping);
            let variable_name = walk.operation.variable_value_name(variable).to_owned();
            self.record_field_argument_mapping(walk, argument, variable_name);
            return;
        }

        let value_json = walk
            .operation
            .value_to_json(walk.operation.arguments[argument].value);

        if let Some(existing) =
            self.reusable_variable(walk, operation_ref, input_value_definition, &value_json)
        {
            let variable = walk.operation.add_variable_value(&existing);
            walk.operation.arguments[argument].value = Value::Variable(variable);
            self.record_field_argument_mapping(walk, argument, existing);
            return;
        }

        let variable_name = walk.operation.generate_unused_variable_name(operation_ref);
        walk.operation.input.set_variable(&variable_name, value_json);

        // Uploads found inside the extracted value move with it; their file
        // map paths must point into the new variable.
        for mut mapping in uploads_mapping {
            if !mapping.new_upload_path.is_empty() {
                mapping.new_upload_path =
                    format!("variables.{}.{}", variable_name, mapping.new_upload_path);
                mapping.variable_name = variable_name.clone();
            }
            self.uploads.push(mapping);
        }

        let definition_type = definition.input_value_definitions[input_value_definition].ty;
        self.extracted.push((variable_name.clone(), definition_type));

        let variable = walk.operation.add_variable_value(&variable_name);
        walk.operation.arguments[argument].value = Value::Variable(variable);

        let imported_type = walk.operation.import_type(definition, definition_type);
        let variable_definition = walk.operation.variable_definitions.push(VariableDefinition {
            variable_value: variable,
            ty: imported_type,
            default_value: None,
            directives: Vec::new(),
        });
        walk.operation.operation_definitions[operation_ref]
            .variable_definitions
            .push(variable_definition);

        self.record_field_argument_mapping(walk, argument, variable_name);
    }
}

impl VariablesExtraction {
    /// A previously extracted variable can be reused when its declared type
    /// and JSON value both match. User-supplied variables are never reused.
    fn reusable_variable(
        &self,
        walk: &Walk<'_>,
        operation: Ref<crate::ast::OperationDefinition>,
        input_value_definition: Ref<InputValueDefinition>,
        value_json: &JsonValue,
    ) -> Option<String> {
        let definition = walk.definition?;
        let wanted_type = definition.input_value_definitions[input_value_definition].ty;
        for (name, extracted_type) in &self.extracted {
            if !definition.types_are_equal_deep(*extracted_type, wanted_type) {
                continue;
            }
            if walk.operation.input.variable(name) != Some(value_json) {
                continue;
            }
            if walk
                .operation
                .variable_definition_by_name(operation, name)
                .is_some()
            {
                return Some(name.clone());
            }
        }
        None
    }

    fn record_field_argument_mapping(
        &mut self,
        walk: &Walk<'_>,
        argument: Ref<Argument>,
        variable_name: String,
    ) {
        let field_path = walk
            .ancestors
            .iter()
            .filter(|a| a.kind == NodeKind::Field)
            .map(|a| walk.operation.field_alias_or_name(Ref::new(a.index)).to_owned())
            .collect::<Vec<_>>()
            .join(".");
        if field_path.is_empty() {
            return;
        }
        let argument_name = walk.operation.argument_name(argument);
        let key = format!("{field_path}.{argument_name}");
        self.field_argument_mapping.insert(key, variable_name);
    }
}

/// Resolves the input value definition an argument is bound to: the
/// matching argument on the field definition of the enclosing field.
fn argument_input_value_definition(
    walk: &Walk<'_>,
    argument: Ref<Argument>,
) -> Option<Ref<InputValueDefinition>> {
    let ancestor = walk.ancestor();
    if ancestor.kind != NodeKind::Field {
        return None;
    }
    let definition = walk.definition?;
    let field_definition = walk.field_definition(Ref::new(ancestor.index))?;
    let argument_name = walk.operation.argument_name(argument);
    definition.field_definitions[field_definition]
        .arguments
        .iter()
        .copied()
        .find(|&ivd| definition.input_value_definition_name(ivd) == argument_name)
}
