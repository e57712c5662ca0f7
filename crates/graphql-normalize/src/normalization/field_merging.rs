//! Merging and deduplication of equal fields within one selection set.
//!
//! Two fields are interchangeable when response name, field name,
//! arguments and directive sets all match structurally. When both carry
//! sub-selections the second field's selections are appended to the first
//! and the second is dropped; equal leaf fields are simply dropped. The
//! scan restarts after every edit because positions shift.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Document, Field, Ref, Selection, SelectionSet};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn field_selection_merging(walker: &mut Walker) -> Rc<RefCell<FieldSelectionMerging>> {
    let visitor = Rc::new(RefCell::new(FieldSelectionMerging));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct FieldSelectionMerging;

impl Visitor for FieldSelectionMerging {
    fn enter_selection_set(&mut self, walk: &mut Walk<'_>, set: Ref<SelectionSet>) {
        'merge: loop {
            let refs = walk.operation.selection_sets[set].selection_refs.clone();
            for i in 0..refs.len() {
                let Selection::Field(first) = walk.operation.selections[refs[i]] else {
                    continue;
                };
                if walk.operation.fields[first].selection_set.is_none() {
                    continue;
                }
                for j in (i + 1)..refs.len() {
                    let Selection::Field(second) = walk.operation.selections[refs[j]] else {
                        continue;
                    };
                    if walk.operation.fields[second].selection_set.is_none() {
                        continue;
                    }
                    if !walk.operation.fields_are_equal_flat(first, second) {
                        continue;
                    }
                    merge_field_selections(walk.operation, first, second);
                    walk.operation.remove_selection_at(set, j);
                    continue 'merge;
                }
            }
            break;
        }
    }
}

fn merge_field_selections(doc: &mut Document, target: Ref<Field>, source: Ref<Field>) {
    let (Some(target_set), Some(source_set)) = (
        doc.fields[target].selection_set,
        doc.fields[source].selection_set,
    ) else {
        return;
    };
    let moved = doc.selection_sets[source_set].selection_refs.clone();
    doc.selection_sets[target_set].selection_refs.extend(moved);
}

pub(crate) fn deduplicate_fields(walker: &mut Walker) -> Rc<RefCell<DeduplicateFields>> {
    let visitor = Rc::new(RefCell::new(DeduplicateFields));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct DeduplicateFields;

impl Visitor for DeduplicateFields {
    fn enter_selection_set(&mut self, walk: &mut Walk<'_>, set: Ref<SelectionSet>) {
        'dedup: loop {
            let refs = walk.operation.selection_sets[set].selection_refs.clone();
            for i in 0..refs.len() {
                let Selection::Field(first) = walk.operation.selections[refs[i]] else {
                    continue;
                };
                if walk.operation.fields[first].selection_set.is_some() {
                    continue;
                }
                for j in (i + 1)..refs.len() {
                    let Selection::Field(second) = walk.operation.selections[refs[j]] else {
                        continue;
                    };
                    if walk.operation.fields[second].selection_set.is_some() {
                        continue;
                    }
                    if !walk.operation.fields_are_equal_flat(first, second) {
                        continue;
                    }
                    walk.operation.remove_selection_at(set, j);
                    continue 'dedup;
                }
            }
            break;
        }
    }
}
