//! Moves default values off variable definitions and into the variables
//! object, and materializes schema-side argument defaults as variables.
//!
//! A `$v: T = default` definition loses its default; the JSON value lands
//! under `v` in the variables object unless the caller already supplied
//! one. Field arguments that were omitted but declare a default in the
//! schema get a generated variable carrying that default.
//!
//! Removing a default changes what the variable's type may be: a nullable
//! variable with a default is valid in a non-null position, but without
//! the default it no longer is. Variables observed in non-null positions
//! are therefore promoted to non-null when the operation is left.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{
    Argument, Field, NodeKind, OperationDefinition, Ref, Type, Value, VariableDefinition,
};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn extract_variables_default_value(
    walker: &mut Walker,
    operation_name: Option<&str>,
) -> Rc<RefCell<VariablesDefaultValueExtraction>> {
    let visitor = Rc::new(RefCell::new(VariablesDefaultValueExtraction {
        operation_name: operation_name.map(str::to_owned),
        skip: false,
        non_null_variable_names: Vec::new(),
        variables_with_defaults: Vec::new(),
    }));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct VariablesDefaultValueExtraction {
    operation_name: Option<String>,
    skip: bool,
    /// Variables seen in value positions whose declared input type is
    /// non-null.
    non_null_variable_names: Vec<String>,
    /// Definitions whose default this pass removed.
    variables_with_defaults: Vec<Ref<VariableDefinition>>,
}

impl Visitor for VariablesDefaultValueExtraction {
    fn enter_operation_definition(
        &mut self,
        walk: &mut Walk<'_>,
        operation: Ref<OperationDefinition>,
    ) {
        self.skip = match &self.operation_name {
            Some(name) => {
                walk.operation.operation_definition_name(operation) != Some(name.as_str())
            }
            None => false,
        };
        self.non_null_variable_names.clear();
        self.variables_with_defaults.clear();
    }

    fn enter_variable_definition(
        &mut self,
        walk: &mut Walk<'_>,
        variable: Ref<VariableDefinition>,
    ) {
        if self.skip {
            return;
        }
        let Some(default) = walk.operation.variable_definitions[variable].default_value.take()
        else {
            return;
        };
        self.variables_with_defaults.push(variable);

        let name = walk.operation.variable_definition_name(variable).to_owned();
        // A caller-supplied value wins, even an explicit null.
        if walk.operation.input.variable(&name).is_some() {
            return;
        }
        let json = walk.operation.value_to_json(default);
        walk.operation.input.set_variable(&name, json);
    }

    fn enter_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {
        if self.skip {
            return;
        }
        let Some(definition) = walk.definition else {
            return;
        };
        let Some(field_definition) = walk.field_definition(field) else {
            return;
        };
        let argument_definitions = definition.field_definitions[field_definition]
            .arguments
            .clone();
        for ivd in argument_definitions {
            let argument_name = definition.input_value_definition_name(ivd).to_owned();
            let supplied = walk
                .operation
                .argument_by_name(&walk.operation.fields[field].arguments, &argument_name);
            match supplied {
                Some(argument) => {
                    let value = walk.operation.arguments[argument].value;
                    if walk.operation.value_contains_variable(value) {
                        let definition_type = definition.input_value_definitions[ivd].ty;
                        self.mark_non_null_variables(walk, value, definition_type);
                    }
                }
                None => self.add_default_argument(walk, field, ivd),
            }
        }
    }

    fn enter_argument(&mut self, walk: &mut Walk<'_>, argument: Ref<Argument>) {
        // Only directive arguments; field arguments are handled per-field
        // so omitted ones can be defaulted too.
        if self.skip {
            return;
        }
        let Some(&first) = walk.ancestors.first() else {
            return;
        };
        if first.kind != NodeKind::OperationDefinition {
            return;
        }
        let ancestor = walk.ancestor();
        if ancestor.kind != NodeKind::Directive {
            return;
        }
        let value = walk.operation.arguments[argument].value;
        if !walk.operation.value_contains_variable(value) {
            return;
        }
        let Some(definition) = walk.definition else {
            return;
        };
        let directive_name = walk
            .operation
            .directive_name(Ref::new(ancestor.index))
            .to_owned();
        let argument_name = walk.operation.argument_name(argument).to_owned();
        let Some(ivd) =
            definition.directive_argument_definition_by_name(&directive_name, &argument_name)
        else {
            return;
        };
        let definition_type = definition.input_value_definitions[ivd].ty;
        self.mark_non_null_variables(walk, value, definition_type);
    }

    fn leave_operation_definition(
        &mut self,
        walk: &mut Walk<'_>,
        _operation: Ref<OperationDefinition>,
    ) {
        if self.skip {
            return;
        }
        for &variable in &self.variables_with_defaults {
            let ty = walk.operation.variable_definitions[variable].ty;
            if walk.operation.type_is_non_null(ty) {
                continue;
            }
            let name = walk.operation.variable_definition_name(variable).to_owned();
            if self.non_null_variable_names.iter().any(|n| *n == name) {
                let promoted = walk.operation.add_non_null_type(ty);
                walk.operation.variable_definitions[variable].ty = promoted;
            }
        }
    }
}

impl VariablesDefaultValueExtraction {
    /// Records variables sitting in non-null positions of `value`, walking
    /// the value alongside its declared input type.
    fn mark_non_null_variables(&mut self, walk: &Walk<'_>, value: Value, definition_type: Ref<Type>) {
        let Some(definition) = walk.definition else {
            return;
        };
        match value {
            Value::Variable(variable) => {
                if definition.type_is_non_null(definition_type) {
                    self.non_null_variable_names
                        .push(walk.operation.variable_value_name(variable).to_owned());
                }
            }
            Value::List(list) => {
                let list_type = definition.type_skip_non_null(definition_type);
                let Some(item_type) = definition.types[list_type].of_type else {
                    return;
                };
                let items = walk.operation.list_values[list].refs.clone();
                for item in items {
                    if walk.operation.value_contains_variable(item) {
                        self.mark_non_null_variables(walk, item, item_type);
                    }
                }
            }
            Value::Object(object) => {
                let type_name = definition.type_name(definition_type);
                let Some(node) = definition.index.first_node_by_name(type_name) else {
                    return;
                };
                let fields = walk.operation.object_values[object].refs.clone();
                for field_ref in fields {
                    let field = walk.operation.object_fields[field_ref];
                    if !walk.operation.value_contains_variable(field.value) {
                        continue;
                    }
                    let field_name = walk.operation.slice(field.name).to_owned();
                    let Some(ivd) = definition.input_object_field_by_name(node, &field_name)
                    else {
                        continue;
                    };
                    let field_type = definition.input_value_definitions[ivd].ty;
                    self.mark_non_null_variables(walk, field.value, field_type);
                }
            }
            _ => {}
        }
    }

    /// Synthesizes `arg: $generated` with the schema default's JSON value
    /// for an argument the operation omitted.
    fn add_default_argument(
        &mut self,
        walk: &mut Walk<'_>,
        field: Ref<Field>,
        ivd: Ref<crate::ast::InputValueDefinition>,
    ) {
        let Some(operation_ref) = walk.current_operation() else {
            return;
        };
        let Some(definition) = walk.definition else {
            return;
        };
        let Some(default) = definition.input_value_definitions[ivd].default_value else {
            return;
        };

        let variable_name = walk.operation.generate_unused_variable_name(operation_ref);
        let json = definition.value_to_json(default);
        let argument_name = definition.input_value_definition_name(ivd).to_owned();
        let definition_type = definition.input_value_definitions[ivd].ty;
        let imported_type = walk.operation.import_type(definition, definition_type);

        walk.operation.input.set_variable(&variable_name, json);

        let variable = walk.operation.add_variable_value(&variable_name);
        let name_span = walk.operation.input.append(&argument_name);
        let argument = walk.operation.arguments.push(Argument {
            name: name_span,
            value: Value::Variable(variable),
        });
        walk.operation.fields[field].arguments.push(argument);

        let variable_definition = walk.operation.variable_definitions.push(VariableDefinition {
            variable_value: variable,
            ty: imported_type,
            default_value: None,
            directives: Vec::new(),
        });
        walk.operation.operation_definitions[operation_ref]
            .variable_definitions
            .push(variable_definition);
    }
}
