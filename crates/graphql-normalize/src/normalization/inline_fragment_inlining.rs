//! Flattens inline fragments whose type condition always applies.
//!
//! An undirected inline fragment selecting on its enclosing type, or on an
//! interface the enclosing type implements, adds nothing; its selections
//! move into the parent set, provided every inline fragment nested
//! directly inside it can itself match the enclosing type. A union
//! condition keeps its wrapper: it narrows the selection to the union's
//! members, not to the enclosing type. Fragments with directives,
//! `@defer` included, are left in place.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Document, InlineFragment, NodeKind, Ref, Selection, SelectionSet};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn inline_selections_from_inline_fragments(
    walker: &mut Walker,
) -> Rc<RefCell<InlineSelectionsFromInlineFragments>> {
    let visitor = Rc::new(RefCell::new(InlineSelectionsFromInlineFragments));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct InlineSelectionsFromInlineFragments;

impl Visitor for InlineSelectionsFromInlineFragments {
    fn enter_inline_fragment(&mut self, walk: &mut Walk<'_>, inline: Ref<InlineFragment>) {
        if !walk.operation.inline_fragments[inline].directives.is_empty() {
            return;
        }

        let applies = match walk.operation.inline_fragments[inline].type_condition {
            None => true,
            Some(condition) => match (walk.definition, walk.enclosing_type_name()) {
                (Some(definition), Some(enclosing)) => {
                    let condition_name = walk.operation.slice(condition);
                    definition.type_condition_always_applies(enclosing, condition_name)
                        && nested_conditions_intersect(walk.operation, definition, enclosing, inline)
                }
                _ => false,
            },
        };
        if !applies {
            return;
        }

        let ancestor = walk.ancestor();
        if ancestor.kind != NodeKind::SelectionSet {
            return;
        }
        let set: Ref<SelectionSet> = Ref::new(ancestor.index);
        let Some(position) = walk.operation.selection_sets[set]
            .selection_refs
            .iter()
            .position(|&r| walk.operation.selections[r] == Selection::InlineFragment(inline))
        else {
            return;
        };

        // The fragment node is discarded, its selections move as-is.
        let replacements: Vec<Selection> = match walk.operation.inline_fragments[inline]
            .selection_set
        {
            Some(inner) => walk.operation.selection_sets[inner]
                .selection_refs
                .iter()
                .map(|&r| walk.operation.selections[r])
                .collect(),
            None => Vec::new(),
        };
        if replacements.is_empty() {
            walk.operation.remove_selection_at(set, position);
        } else {
            walk.operation.replace_selection_at(set, position, replacements);
        }
        walk.skip_node();
    }
}

/// Flattening moves the fragment's selections into a set typed by the
/// enclosing type. Any inline fragment directly inside must be able to
/// match that type, or it would be stranded in a set it never applies to.
fn nested_conditions_intersect(
    operation: &Document,
    definition: &Document,
    enclosing: &str,
    inline: Ref<InlineFragment>,
) -> bool {
    let Some(set) = operation.inline_fragments[inline].selection_set else {
        return true;
    };
    operation.selection_sets[set]
        .selection_refs
        .iter()
        .all(|&r| match operation.selections[r] {
            Selection::InlineFragment(nested) => {
                match operation.inline_fragments[nested].type_condition {
                    Some(condition) => definition
                        .type_conditions_intersect(enclosing, operation.slice(condition)),
                    None => true,
                }
            }
            _ => true,
        })
}
