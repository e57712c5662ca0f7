//! Drops aliases that repeat the field name, `field: field` becomes `field`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Field, Ref};
use crate::walker::{Visitor, Walk, Walker};

pub(crate) fn remove_self_aliasing(walker: &mut Walker) -> Rc<RefCell<RemoveSelfAliasing>> {
    let visitor = Rc::new(RefCell::new(RemoveSelfAliasing));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct RemoveSelfAliasing;

impl Visitor for RemoveSelfAliasing {
    fn enter_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {
        match walk.operation.field_alias(field) {
            Some(alias) if alias == walk.operation.field_name(field) => {
                walk.operation.fields[field].alias = None;
            }
            _ => {}
        }
    }
}
