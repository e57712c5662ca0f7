//! Detects fragment spreads that directly or transitively spread their own
//! enclosing fragment definition.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Document, FragmentDefinition, Ref, Selection, SelectionSet};
use crate::report::ExternalErrorKind;
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn prevent_fragment_cycles(walker: &mut Walker) -> Rc<RefCell<PreventFragmentCycles>> {
    let visitor = Rc::new(RefCell::new(PreventFragmentCycles::default()));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

#[derive(Default)]
pub(crate) struct PreventFragmentCycles;

impl Visitor for PreventFragmentCycles {
    fn enter_fragment_definition(
        &mut self,
        walk: &mut Walk<'_>,
        fragment: Ref<FragmentDefinition>,
    ) {
        let name = walk.operation.fragment_definition_name(fragment).to_owned();
        let mut trail = vec![name.clone()];
        if let Some(set) = walk.operation.fragment_definitions[fragment].selection_set {
            if spreads_any_of(walk.operation, set, &mut trail) {
                walk.stop_with_external_error(ExternalErrorKind::FragmentSpreadFormsCycle(name));
            }
        }
    }
}

/// Depth-first search through spreads. `trail` holds the fragment names on
/// the current path; seeing one of them again is a cycle.
fn spreads_any_of(doc: &Document, set: Ref<SelectionSet>, trail: &mut Vec<String>) -> bool {
    for &selection_ref in &doc.selection_sets[set].selection_refs {
        let nested = match doc.selections[selection_ref] {
            Selection::Field(field) => doc.fields[field].selection_set,
            Selection::InlineFragment(inline) => doc.inline_fragments[inline].selection_set,
            Selection::FragmentSpread(spread) => {
                let spread_name = doc.fragment_spread_name(spread);
                if trail.iter().any(|n| n == spread_name) {
                    return true;
                }
                let Some(target) = doc.fragment_definition_by_name(spread_name) else {
                    // Undefined spreads are reported by the inlining pass.
                    continue;
                };
                trail.push(spread_name.to_owned());
                let cyclic = match doc.fragment_definitions[target].selection_set {
                    Some(inner) => spreads_any_of(doc, inner, trail),
                    None => false,
                };
                trail.pop();
                if cyclic {
                    return true;
                }
                continue;
            }
        };
        if let Some(inner) = nested {
            if spreads_any_of(doc, inner, trail) {
                return true;
            }
        }
    }
    false
}
