//! Merges sibling inline fragments with the same type condition.
//!
//! Two inline fragments in one selection set collapse into the first when
//! their type conditions name the same type and their directive sets are
//! equal. Selections are concatenated in order; duplicate fields inside the
//! merged set are the deduplication pass's concern.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Document, InlineFragment, Ref, Selection, SelectionSet};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn merge_inline_fragment_selections(
    walker: &mut Walker,
) -> Rc<RefCell<MergeInlineFragmentSelections>> {
    let visitor = Rc::new(RefCell::new(MergeInlineFragmentSelections));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct MergeInlineFragmentSelections;

impl Visitor for MergeInlineFragmentSelections {
    fn enter_selection_set(&mut self, walk: &mut Walk<'_>, set: Ref<SelectionSet>) {
        // Restart the scan after every merge, indices shift.
        'merge: loop {
            let refs = walk.operation.selection_sets[set].selection_refs.clone();
            for i in 0..refs.len() {
                let Selection::InlineFragment(first) = walk.operation.selections[refs[i]] else {
                    continue;
                };
                for j in (i + 1)..refs.len() {
                    let Selection::InlineFragment(second) = walk.operation.selections[refs[j]]
                    else {
                        continue;
                    };
                    if !fragments_can_merge(walk.operation, first, second) {
                        continue;
                    }
                    merge_into(walk.operation, first, second);
                    walk.operation.remove_selection_at(set, j);
                    continue 'merge;
                }
            }
            break;
        }
    }
}

fn fragments_can_merge(
    doc: &Document,
    left: Ref<InlineFragment>,
    right: Ref<InlineFragment>,
) -> bool {
    let conditions_match = match (
        doc.inline_fragments[left].type_condition,
        doc.inline_fragments[right].type_condition,
    ) {
        (Some(l), Some(r)) => doc.slice(l) == doc.slice(r),
        (None, None) => true,
        _ => false,
    };
    conditions_match
        && doc.directive_sets_are_equal(
            &doc.inline_fragments[left].directives,
            &doc.inline_fragments[right].directives,
        )
}

fn merge_into(doc: &mut Document, target: Ref<InlineFragment>, source: Ref<InlineFragment>) {
    let Some(source_set) = doc.inline_fragments[source].selection_set else {
        return;
    };
    let target_set = match doc.inline_fragments[target].selection_set {
        Some(set) => set,
        None => {
            let set = doc.add_selection_set();
            doc.inline_fragments[target].selection_set = Some(set);
            set
        }
    };
    let moved = doc.selection_sets[source_set].selection_refs.clone();
    doc.selection_sets[target_set].selection_refs.extend(moved);
}
