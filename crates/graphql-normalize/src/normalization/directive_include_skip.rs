//! Static evaluation of the `@skip` and `@include` directives.
//!
//! Conditions given as boolean literals, or as variables whose value is
//! present in the variables object, are resolved at normalization time:
//! the directive disappears and the annotated selection is either kept or
//! removed. Conditions that cannot be resolved are left untouched.
//!
//! Removing the last selection of a set would produce an invalid document,
//! so a placeholder `__typename` selection is injected in that case.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{
    Directive, Field, FragmentSpread, InlineFragment, JsonValue, Node, NodeKind, Ref, Selection,
    SelectionSet, Value,
};
use crate::walker::{Visitor, Walk, Walker};

/// Alias given to the `__typename` selection left behind when every other
/// selection of a set was removed.
pub const TYPENAME_PLACEHOLDER: &str = "__internal__typename_placeholder";

pub(crate) fn directive_include_skip(
    walker: &mut Walker,
    ignore: bool,
) -> Rc<RefCell<DirectiveIncludeSkip>> {
    let visitor = Rc::new(RefCell::new(DirectiveIncludeSkip { ignore }));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct DirectiveIncludeSkip {
    /// Leaves every `@skip`/`@include` in place when set, for callers that
    /// resolve the conditions downstream.
    ignore: bool,
}

impl Visitor for DirectiveIncludeSkip {
    fn enter_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {
        if self.ignore {
            return;
        }
        let directives = walk.operation.fields[field].directives.clone();
        match evaluate(walk, &directives) {
            Evaluation::Unchanged => {}
            Evaluation::Keep(remaining) => {
                walk.operation.fields[field].directives = remaining;
            }
            Evaluation::Remove => remove_selection(walk, Selection::Field(field)),
        }
    }

    fn enter_inline_fragment(&mut self, walk: &mut Walk<'_>, inline: Ref<InlineFragment>) {
        if self.ignore {
            return;
        }
        let directives = walk.operation.inline_fragments[inline].directives.clone();
        match evaluate(walk, &directives) {
            Evaluation::Unchanged => {}
            Evaluation::Keep(remaining) => {
                walk.operation.inline_fragments[inline].directives = remaining;
            }
            Evaluation::Remove => remove_selection(walk, Selection::InlineFragment(inline)),
        }
    }

    fn enter_fragment_spread(&mut self, walk: &mut Walk<'_>, spread: Ref<FragmentSpread>) {
        if self.ignore {
            return;
        }
        let directives = walk.operation.fragment_spreads[spread].directives.clone();
        match evaluate(walk, &directives) {
            Evaluation::Unchanged => {}
            Evaluation::Keep(remaining) => {
                walk.operation.fragment_spreads[spread].directives = remaining;
            }
            Evaluation::Remove => remove_selection(walk, Selection::FragmentSpread(spread)),
        }
    }
}

enum Evaluation {
    /// No resolvable `@skip`/`@include` found.
    Unchanged,
    /// Node stays, with the resolved directives stripped.
    Keep(Vec<Ref<Directive>>),
    Remove,
}

fn evaluate(walk: &Walk<'_>, directives: &[Ref<Directive>]) -> Evaluation {
    let mut remaining = Vec::with_capacity(directives.len());
    let mut resolved_any = false;
    let mut removed = false;

    for &directive in directives {
        let name = walk.operation.directive_name(directive);
        let is_include = name == "include";
        let is_skip = name == "skip";
        if !is_include && !is_skip {
            remaining.push(directive);
            continue;
        }
        match condition(walk, directive) {
            Some(condition) => {
                resolved_any = true;
                if (is_include && !condition) || (is_skip && condition) {
                    removed = true;
                }
            }
            None => remaining.push(directive),
        }
    }

    if removed {
        Evaluation::Remove
    } else if resolved_any {
        Evaluation::Keep(remaining)
    } else {
        Evaluation::Unchanged
    }
}

/// Resolves the `if` argument to a boolean, through the variables object
/// if the condition is a variable. `None` means not statically known.
fn condition(walk: &Walk<'_>, directive: Ref<Directive>) -> Option<bool> {
    let argument = walk
        .operation
        .argument_by_name(&walk.operation.directives[directive].arguments, "if")?;
    match walk.operation.arguments[argument].value {
        Value::Boolean(b) => Some(b),
        Value::Variable(variable) => {
            let name = walk.operation.variable_value_name(variable);
            match walk.operation.input.variable(name) {
                Some(&JsonValue::Bool(b)) => Some(b),
                _ => None,
            }
        }
        _ => None,
    }
}

fn remove_selection(walk: &mut Walk<'_>, selection: Selection) {
    let ancestor = walk.ancestor();
    if ancestor.kind != NodeKind::SelectionSet {
        return;
    }
    let set: Ref<SelectionSet> = Ref::new(ancestor.index);
    let position = walk.operation.selection_sets[set]
        .selection_refs
        .iter()
        .position(|&r| walk.operation.selections[r] == selection);
    if let Some(position) = position {
        walk.operation.remove_selection_at(set, position);
    }
    if walk.operation.selection_set_is_empty(set) {
        inject_typename_placeholder(walk, set);
    }
    walk.skip_node();
}

fn inject_typename_placeholder(walk: &mut Walk<'_>, set: Ref<SelectionSet>) {
    let alias = walk.operation.input.append(TYPENAME_PLACEHOLDER);
    let name = walk.operation.input.append("__typename");
    let field = walk.operation.fields.push(crate::ast::Field {
        alias: Some(alias),
        name,
        arguments: Vec::new(),
        directives: Vec::new(),
        selection_set: None,
    });
    walk.operation.add_selection(set, Selection::Field(field));
}
