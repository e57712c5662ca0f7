//! Rewrites fragment spreads into equivalent inline fragments.
//!
//! A spread whose type condition can intersect the enclosing type is
//! replaced by an inline fragment carrying the same type condition, the
//! spread's directives, and a copy of the fragment's selections; the
//! flattening pass later dissolves the wrapper where the condition is
//! trivially satisfied. A spread on a provably disjoint type is left in
//! place for validation to report. Fragment definitions stay in the
//! document; a later pass drops them.
//!
//! Nested spreads need no special handling: the replacement diverges from
//! the walker's snapshot, the set is re-walked, and the spreads inside the
//! new wrapper are visited in turn.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{FragmentSpread, InlineFragment, NodeKind, Ref, Selection, SelectionSet};
use crate::report::ExternalErrorKind;
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn fragment_spread_inline(walker: &mut Walker) -> Rc<RefCell<FragmentSpreadInline>> {
    let visitor = Rc::new(RefCell::new(FragmentSpreadInline));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct FragmentSpreadInline;

impl Visitor for FragmentSpreadInline {
    fn enter_fragment_spread(&mut self, walk: &mut Walk<'_>, spread: Ref<FragmentSpread>) {
        let name = walk.operation.fragment_spread_name(spread).to_owned();
        let Some(fragment) = walk.operation.fragment_definition_by_name(&name) else {
            walk.stop_with_external_error(ExternalErrorKind::FragmentUndefined(name));
            return;
        };

        let ancestor = walk.ancestor();
        if ancestor.kind != NodeKind::SelectionSet {
            return;
        }
        let set: Ref<SelectionSet> = Ref::new(ancestor.index);
        let Some(position) = walk.operation.selection_sets[set]
            .selection_refs
            .iter()
            .position(|&r| walk.operation.selections[r] == Selection::FragmentSpread(spread))
        else {
            return;
        };

        let condition = walk.operation.fragment_definitions[fragment].type_condition;
        let fragment_set = walk.operation.fragment_definitions[fragment].selection_set;

        // A spread whose condition can never match here stays as it is;
        // rewriting it would hide the mistake from validation.
        if let (Some(definition), Some(enclosing)) = (walk.definition, walk.enclosing_type_name()) {
            let condition_name = walk.operation.slice(condition);
            if !definition.type_conditions_intersect(enclosing, condition_name) {
                return;
            }
        }

        let spread_directives = walk.operation.fragment_spreads[spread].directives.clone();
        let directives = walk.operation.copy_directives(&spread_directives);
        let selection_set = fragment_set.map(|s| walk.operation.copy_selection_set(s));
        let inline = walk.operation.inline_fragments.push(InlineFragment {
            type_condition: Some(condition),
            directives,
            selection_set,
        });
        walk.operation
            .replace_selection_at(set, position, vec![Selection::InlineFragment(inline)]);

        walk.skip_node();
    }
}
