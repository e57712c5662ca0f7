//! Deterministic selection ordering.
//!
//! Sorts every selection set so that two equivalent operations written
//! with selections in different order print identically. Fields come
//! first ordered by response name, then inline fragments by type
//! condition, then fragment spreads by fragment name. The sort is stable,
//! so equal keys keep their document order.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Ref, Selection, SelectionSet};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn sort_selection_sets(walker: &mut Walker) -> Rc<RefCell<SortSelectionSets>> {
    let visitor = Rc::new(RefCell::new(SortSelectionSets));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct SortSelectionSets;

impl Visitor for SortSelectionSets {
    fn leave_selection_set(&mut self, walk: &mut Walk<'_>, set: Ref<SelectionSet>) {
        let mut refs = walk.operation.selection_sets[set].selection_refs.clone();
        refs.sort_by(|&l, &r| {
            let l = sort_key(walk, l);
            let r = sort_key(walk, r);
            l.cmp(&r)
        });
        walk.operation.selection_sets[set].selection_refs = refs;
    }
}

fn sort_key(walk: &Walk<'_>, selection: Ref<Selection>) -> (u8, String) {
    match walk.operation.selections[selection] {
        Selection::Field(field) => (0, walk.operation.field_alias_or_name(field).to_owned()),
        Selection::InlineFragment(inline) => (
            1,
            walk.operation
                .inline_fragment_type_condition(inline)
                .unwrap_or("")
                .to_owned(),
        ),
        Selection::FragmentSpread(spread) => {
            (2, walk.operation.fragment_spread_name(spread).to_owned())
        }
    }
}
