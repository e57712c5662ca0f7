//! Removes fragment definitions once every spread has been inlined.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{FragmentDefinition, Node, NodeKind, Ref};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn remove_fragment_definitions(
    walker: &mut Walker,
) -> Rc<RefCell<RemoveFragmentDefinitions>> {
    let visitor = Rc::new(RefCell::new(RemoveFragmentDefinitions));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct RemoveFragmentDefinitions;

impl Visitor for RemoveFragmentDefinitions {
    fn enter_fragment_definition(
        &mut self,
        walk: &mut Walk<'_>,
        fragment: Ref<FragmentDefinition>,
    ) {
        walk.remove_root_node(Node::new(NodeKind::FragmentDefinition, fragment.idx()));
        walk.skip_node();
    }
}
