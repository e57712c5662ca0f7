use std::cell::RefCell;
use std::rc::Rc;

use graphql_normalize::ast::{Document, Field, NodeKind, Ref, Selection, SelectionSet};
use graphql_normalize::walker::{Visitor, VisitorFilter, VisitorId, Walk, Walker};
use graphql_normalize::{Parser, Report};
use pretty_assertions::assert_eq;

fn parse(source: &str) -> Document {
    Parser::new().parse_operation(source).unwrap()
}

fn walk_with<V: Visitor + 'static>(doc: &mut Document, visitor: V) -> Rc<RefCell<V>> {
    let visitor = Rc::new(RefCell::new(visitor));
    let mut walker = Walker::new();
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    let mut report = Report::new();
    walker.walk(doc, None, &mut report);
    assert!(!report.has_errors(), "{report}");
    visitor
}

#[derive(Default)]
struct FieldRecorder {
    names: Vec<String>,
}

impl Visitor for FieldRecorder {
    fn enter_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {
        self.names.push(walk.operation.field_name(field).to_owned());
    }
}

#[test]
fn fields_are_entered_in_document_order() {
    let mut doc = parse("{ a { b } c }");
    let recorder = walk_with(&mut doc, FieldRecorder::default());
    assert_eq!(recorder.borrow().names, ["a", "b", "c"]);
}

#[derive(Default)]
struct SkipUnder {
    skip_below: &'static str,
    names: Vec<String>,
}

impl Visitor for SkipUnder {
    fn enter_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {
        let name = walk.operation.field_name(field).to_owned();
        if name == self.skip_below {
            walk.skip_node();
        }
        self.names.push(name);
    }
}

#[test]
fn skip_node_suppresses_children_only() {
    let mut doc = parse("{ a { b } c }");
    let visitor = walk_with(
        &mut doc,
        SkipUnder {
            skip_below: "a",
            names: Vec::new(),
        },
    );
    assert_eq!(visitor.borrow().names, ["a", "c"]);
}

#[derive(Default)]
struct StopAt {
    stop_at: &'static str,
    names: Vec<String>,
}

impl Visitor for StopAt {
    fn enter_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {
        let name = walk.operation.field_name(field).to_owned();
        self.names.push(name.clone());
        if name == self.stop_at {
            walk.stop();
        }
    }
}

#[test]
fn stop_aborts_the_walk() {
    let mut doc = parse("{ a { b } c }");
    let visitor = walk_with(
        &mut doc,
        StopAt {
            stop_at: "b",
            names: Vec::new(),
        },
    );
    assert_eq!(visitor.borrow().names, ["a", "b"]);
}

/// Replaces the field named `old` with two fresh leaf fields. The live
/// selection list then diverges from the walker's snapshot, which must
/// re-walk the whole set and visit the replacements.
struct ReplaceOld;

impl ReplaceOld {
    fn leaf(doc: &mut Document, name: &str) -> Selection {
        let name = doc.input.append(name);
        Selection::Field(doc.fields.push(Field {
            alias: None,
            name,
            arguments: Vec::new(),
            directives: Vec::new(),
            selection_set: None,
        }))
    }
}

impl Visitor for ReplaceOld {
    fn enter_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {
        if walk.operation.field_name(field) != "old" {
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
            .position(|&r| walk.operation.selections[r] == Selection::Field(field))
        else {
            return;
        };
        let first = Self::leaf(walk.operation, "first");
        let second = Self::leaf(walk.operation, "second");
        walk.operation
            .replace_selection_at(set, position, vec![first, second]);
        walk.skip_node();
    }
}

#[test]
fn mutated_selection_set_is_rewalked_from_a_fresh_snapshot() {
    let mut doc = parse("{ old tail }");

    let replacer = Rc::new(RefCell::new(ReplaceOld));
    let recorder = Rc::new(RefCell::new(FieldRecorder::default()));
    let mut walker = Walker::new();
    walker.register_visitor(Rc::clone(&replacer) as Rc<RefCell<dyn Visitor>>);
    walker.register_visitor(Rc::clone(&recorder) as Rc<RefCell<dyn Visitor>>);
    let mut report = Report::new();
    walker.walk(&mut doc, None, &mut report);
    assert!(!report.has_errors(), "{report}");

    // `old` is entered once before the restart, then the new snapshot is
    // walked in full.
    assert_eq!(recorder.borrow().names, ["old", "first", "second", "tail"]);
    assert_eq!(doc.serialize().no_indent().to_string(), "{first second tail}");
}

/// Requests one revisit while entering the field named `a`, and counts
/// selection-set leaves to show the revisit stays within the enter batch.
#[derive(Default)]
struct RevisitOnce {
    revisited: bool,
    set_leaves: usize,
}

impl Visitor for RevisitOnce {
    fn enter_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {
        if walk.operation.field_name(field) == "a" && !self.revisited {
            self.revisited = true;
            walk.revisit_node();
        }
    }

    fn leave_selection_set(&mut self, _walk: &mut Walk<'_>, _set: Ref<SelectionSet>) {
        self.set_leaves += 1;
    }
}

#[test]
fn revisit_node_reruns_the_enter_batch_from_the_first_visitor() {
    let mut doc = parse("{ a b }");

    let recorder = Rc::new(RefCell::new(FieldRecorder::default()));
    let revisitor = Rc::new(RefCell::new(RevisitOnce::default()));
    let mut walker = Walker::new();
    walker.register_visitor(Rc::clone(&recorder) as Rc<RefCell<dyn Visitor>>);
    walker.register_visitor(Rc::clone(&revisitor) as Rc<RefCell<dyn Visitor>>);
    let mut report = Report::new();
    walker.walk(&mut doc, None, &mut report);
    assert!(!report.has_errors(), "{report}");

    // The second visitor's revisit reruns the batch for `a` from the
    // first visitor; the rest of the walk is dispatched once.
    assert_eq!(recorder.borrow().names, ["a", "a", "b"]);
    assert_eq!(revisitor.borrow().set_leaves, 1);
}

struct DenyFieldsFor {
    target: VisitorId,
}

impl VisitorFilter for DenyFieldsFor {
    fn allow_visitor(&self, visitor: VisitorId, kind: NodeKind, _index: usize) -> bool {
        visitor != self.target || kind != NodeKind::Field
    }
}

#[test]
fn visitor_filter_suppresses_only_the_denied_visitor() {
    let mut doc = parse("{ a { b } c }");

    let filtered = Rc::new(RefCell::new(FieldRecorder::default()));
    let unfiltered = Rc::new(RefCell::new(FieldRecorder::default()));
    let mut walker = Walker::new();
    let filtered_id = walker.register_visitor(Rc::clone(&filtered) as Rc<RefCell<dyn Visitor>>);
    walker.register_visitor(Rc::clone(&unfiltered) as Rc<RefCell<dyn Visitor>>);
    walker.set_visitor_filter(Rc::new(DenyFieldsFor {
        target: filtered_id,
    }));
    let mut report = Report::new();
    walker.walk(&mut doc, None, &mut report);
    assert!(!report.has_errors(), "{report}");

    assert_eq!(filtered.borrow().names, Vec::<String>::new());
    assert_eq!(unfiltered.borrow().names, ["a", "b", "c"]);
}
