//! Canonical variable renaming.
//!
//! After normalization two operations of the same shape can still differ
//! in variable names. This pass renames every variable used in an argument
//! to the next free name in the sequence `a`, `b`, ..., `z`, `aa`, `bb`,
//! following first use in depth-first order, and sorts the operation's
//! variable definitions by name. The returned mapping leads from the new
//! name back to the original one so callers can rename their variables
//! JSON accordingly.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{
    Argument, NodeKind, OperationDefinition, Ref, Value, VariableDefinition, VariableValue,
};
use crate::report::ExternalErrorKind;
use crate::walker::{Visitor, Walk, Walker};

/// New variable name to the name it replaced.
pub type VariablesMapping = IndexMap<String, String>;

pub(crate) fn remap_variables(walker: &mut Walker) -> Rc<RefCell<VariablesMappingVisitor>> {
    let visitor = Rc::new(RefCell::new(VariablesMappingVisitor::default()));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

struct VariableItem {
    name: String,
    /// Every `$name` value occurrence, in depth-first discovery order.
    value_refs: Vec<Ref<VariableValue>>,
    definition: Ref<VariableDefinition>,
}

#[derive(Default)]
pub(crate) struct VariablesMappingVisitor {
    mapping: VariablesMapping,
    variables: Vec<VariableItem>,
    operation_ref: Option<Ref<OperationDefinition>>,
}

impl VariablesMappingVisitor {
    pub(crate) fn mapping(&self) -> VariablesMapping {
        self.mapping.clone()
    }

    fn next_mapping_name(&self) -> String {
        for length in 1usize.. {
            for letter in 'a'..='z' {
                let candidate: String = std::iter::repeat(letter).take(length).collect();
                if !self.mapping.contains_key(candidate.as_str()) {
                    return candidate;
                }
            }
        }
        unreachable!()
    }
}

impl Visitor for VariablesMappingVisitor {
    fn enter_document(&mut self, _walk: &mut Walk<'_>) {
        self.mapping.clear();
        self.variables.clear();
        self.operation_ref = None;
    }

    fn enter_operation_definition(
        &mut self,
        _walk: &mut Walk<'_>,
        operation: Ref<OperationDefinition>,
    ) {
        self.operation_ref = Some(operation);
    }

    fn enter_argument(&mut self, walk: &mut Walk<'_>, argument: Ref<Argument>) {
        let Value::Variable(value_ref) = walk.operation.arguments[argument].value else {
            return;
        };
        let Some(&first) = walk.ancestors.first() else {
            return;
        };
        if first.kind != NodeKind::OperationDefinition {
            return;
        }
        let operation_ref: Ref<OperationDefinition> = Ref::new(first.index);
        let name = walk.operation.variable_value_name(value_ref).to_owned();
        let Some(definition) = walk.operation.variable_definition_by_name(operation_ref, &name)
        else {
            walk.stop_with_external_error(ExternalErrorKind::VariableUndefined(name));
            return;
        };
        match self.variables.iter_mut().find(|item| item.name == name) {
            Some(item) => item.value_refs.push(value_ref),
            None => self.variables.push(VariableItem {
                name,
                value_refs: vec![value_ref],
                definition,
            }),
        }
    }

    fn leave_document(&mut self, walk: &mut Walk<'_>) {
        let items = std::mem::take(&mut self.variables);
        for item in &items {
            let new_name = self.next_mapping_name();
            self.mapping.insert(new_name.clone(), item.name.clone());

            let span = walk.operation.input.append(&new_name);
            for &value_ref in &item.value_refs {
                walk.operation.variable_values[value_ref].name = span;
            }
            let definition_value = walk.operation.variable_definitions[item.definition].variable_value;
            walk.operation.variable_values[definition_value].name = span;
        }

        if let Some(operation) = self.operation_ref {
            let mut definitions = walk.operation.operation_definitions[operation]
                .variable_definitions
                .clone();
            definitions.sort_by(|&l, &r| {
                walk.operation
                    .variable_definition_name(l)
                    .cmp(walk.operation.variable_definition_name(r))
            });
            walk.operation.operation_definitions[operation].variable_definitions = definitions;
        }
    }
}
