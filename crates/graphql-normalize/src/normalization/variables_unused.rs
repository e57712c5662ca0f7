//! Two-phase removal of unused variables.
//!
//! Usage detection and pruning run in different pipeline stages: detection
//! starts alongside `@skip`/`@include` evaluation, so usages that only
//! existed before later rewrites still count, and the pruning visitor keeps
//! collecting usages during its own walk, which catches variables
//! introduced by extraction in between. Pruning must never run before
//! every detection source has been walked.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Argument, OperationDefinition, Ref};
use crate::walker::{Visitor, Walk, Walker};

/// Variable names seen in argument position, shared between the detection
/// and pruning visitors.
#[derive(Default)]
pub(crate) struct UsedVariables {
    names: Vec<String>,
}

impl UsedVariables {
    fn add(&mut self, name: String) {
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

pub(crate) fn delete_unused_variables(walker: &mut Walker) -> Rc<RefCell<DeleteUnusedVariables>> {
    let visitor = Rc::new(RefCell::new(DeleteUnusedVariables {
        used: Rc::new(RefCell::new(UsedVariables::default())),
    }));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) fn detect_variable_usage(
    walker: &mut Walker,
    delete: &Rc<RefCell<DeleteUnusedVariables>>,
) {
    let visitor = Rc::new(RefCell::new(DetectVariableUsage {
        used: Rc::clone(&delete.borrow().used),
    }));
    walker.register_visitor(visitor);
}

pub(crate) struct DetectVariableUsage {
    used: Rc<RefCell<UsedVariables>>,
}

impl Visitor for DetectVariableUsage {
    fn enter_argument(&mut self, walk: &mut Walk<'_>, argument: Ref<Argument>) {
        record_argument_variables(walk, argument, &self.used);
    }
}

pub(crate) struct DeleteUnusedVariables {
    used: Rc<RefCell<UsedVariables>>,
}

impl Visitor for DeleteUnusedVariables {
    fn enter_argument(&mut self, walk: &mut Walk<'_>, argument: Ref<Argument>) {
        record_argument_variables(walk, argument, &self.used);
    }

    fn leave_operation_definition(
        &mut self,
        walk: &mut Walk<'_>,
        operation: Ref<OperationDefinition>,
    ) {
        let used = self.used.borrow();
        let definitions = walk.operation.operation_definitions[operation]
            .variable_definitions
            .clone();
        let mut kept = Vec::with_capacity(definitions.len());
        for vd in definitions {
            let name = walk.operation.variable_definition_name(vd).to_owned();
            if used.contains(&name) {
                kept.push(vd);
            } else {
                walk.operation.input.delete_variable(&name);
            }
        }
        walk.operation.operation_definitions[operation].variable_definitions = kept;
    }
}

fn record_argument_variables(
    walk: &Walk<'_>,
    argument: Ref<Argument>,
    used: &Rc<RefCell<UsedVariables>>,
) {
    let mut names = Vec::new();
    walk.operation
        .collect_value_variables(walk.operation.arguments[argument].value, &mut names);
    let mut used = used.borrow_mut();
    for name in names {
        used.add(name);
    }
}
