//! Removes operation definitions whose name does not match the target.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Node, NodeKind, OperationDefinition, Ref};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn remove_operation_definitions(
    walker: &mut Walker,
    operation_name: &str,
) -> Rc<RefCell<RemoveOperationDefinitions>> {
    let visitor = Rc::new(RefCell::new(RemoveOperationDefinitions {
        operation_name: operation_name.to_owned(),
    }));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct RemoveOperationDefinitions {
    operation_name: String,
}

impl Visitor for RemoveOperationDefinitions {
    fn enter_operation_definition(
        &mut self,
        walk: &mut Walk<'_>,
        operation: Ref<OperationDefinition>,
    ) {
        let matches = walk.operation.operation_definition_name(operation)
            == Some(self.operation_name.as_str());
        if !matches {
            walk.remove_root_node(Node::new(NodeKind::OperationDefinition, operation.idx()));
            walk.skip_node();
        }
    }
}
