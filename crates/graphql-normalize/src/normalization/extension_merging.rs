//! Schema extension handling.
//!
//! Three passes prepare a schema for lookups that only consult base
//! definitions: `extends_directive` rewrites `type X @extends` into a
//! proper `extend type X`, `implicit_extend_root_operation` materializes
//! an empty base definition for a root operation type that is only ever
//! extended, and `merge_type_extensions` folds every extension into its
//! base definition and drops the extension node.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{
    EnumTypeExtension, InputObjectTypeExtension, InterfaceTypeDefinition, InterfaceTypeExtension,
    Node, NodeKind, ObjectTypeDefinition, ObjectTypeExtension, OperationType, Ref,
    ScalarTypeExtension, UnionTypeExtension,
};
use crate::walker::{Visitor, Walk, Walker};

const EXTENDS_DIRECTIVE: &str = "extends";

pub(crate) fn extends_directive(walker: &mut Walker) -> Rc<RefCell<ExtendsDirective>> {
    let visitor = Rc::new(RefCell::new(ExtendsDirective));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct ExtendsDirective;

impl Visitor for ExtendsDirective {
    fn enter_object_type_definition(
        &mut self,
        walk: &mut Walk<'_>,
        definition: Ref<ObjectTypeDefinition>,
    ) {
        let mut cloned = walk.operation.object_type_definitions[definition].clone();
        if !strip_extends_directive(walk, &mut cloned.directives) {
            return;
        }
        let name = walk.operation.slice(cloned.name).to_owned();
        let extension = walk
            .operation
            .object_type_extensions
            .push(ObjectTypeExtension(cloned));
        let old = Node::new(NodeKind::ObjectTypeDefinition, definition.idx());
        let new = Node::new(NodeKind::ObjectTypeExtension, extension.idx());
        replace_root_node(walk, &name, old, new);
    }

    fn enter_interface_type_definition(
        &mut self,
        walk: &mut Walk<'_>,
        definition: Ref<InterfaceTypeDefinition>,
    ) {
        let mut cloned = walk.operation.interface_type_definitions[definition].clone();
        if !strip_extends_directive(walk, &mut cloned.directives) {
            return;
        }
        let name = walk.operation.slice(cloned.name).to_owned();
        let extension = walk
            .operation
            .interface_type_extensions
            .push(InterfaceTypeExtension(cloned));
        let old = Node::new(NodeKind::InterfaceTypeDefinition, definition.idx());
        let new = Node::new(NodeKind::InterfaceTypeExtension, extension.idx());
        replace_root_node(walk, &name, old, new);
    }
}

/// Drops `@extends` from the directive list, reporting whether it was there.
fn strip_extends_directive(
    walk: &Walk<'_>,
    directives: &mut Vec<Ref<crate::ast::Directive>>,
) -> bool {
    let before = directives.len();
    directives.retain(|&d| walk.operation.directive_name(d) != EXTENDS_DIRECTIVE);
    directives.len() != before
}

fn replace_root_node(walk: &mut Walk<'_>, name: &str, old: Node, new: Node) {
    if let Some(position) = walk.operation.root_nodes.iter().position(|&n| n == old) {
        walk.operation.update_root_node(position, new);
    }
    walk.operation.index.remove(name, old);
    walk.operation.index.add(name, new);
}

pub(crate) fn implicit_extend_root_operation(
    walker: &mut Walker,
) -> Rc<RefCell<ImplicitExtendRootOperation>> {
    let visitor = Rc::new(RefCell::new(ImplicitExtendRootOperation));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct ImplicitExtendRootOperation;

impl Visitor for ImplicitExtendRootOperation {
    fn enter_object_type_extension(
        &mut self,
        walk: &mut Walk<'_>,
        extension: Ref<ObjectTypeExtension>,
    ) {
        let name_span = walk.operation.object_type_extensions[extension].name;
        let name = walk.operation.slice(name_span).to_owned();
        if !is_root_operation_type_name(walk, &name) {
            return;
        }
        if walk
            .operation
            .index
            .first_non_extension_node_by_name(&name)
            .is_some()
        {
            return;
        }
        let base = walk
            .operation
            .object_type_definitions
            .push(ObjectTypeDefinition {
                description: None,
                name: name_span,
                implements_interfaces: Vec::new(),
                directives: Vec::new(),
                field_definitions: Vec::new(),
            });
        let node = Node::new(NodeKind::ObjectTypeDefinition, base.idx());
        walk.operation.add_root_node(node);
        // Base definitions resolve before extensions, so the new node goes
        // in front of the extension entries under this name.
        walk.operation.index.add(&name, node);
        let nodes = walk
            .operation
            .index
            .nodes
            .get_mut(&name)
            .map(Vec::as_mut_slice);
        if let Some(nodes) = nodes {
            nodes.rotate_right(1);
        }
    }
}

fn is_root_operation_type_name(walk: &Walk<'_>, name: &str) -> bool {
    walk.operation.index.is_root_operation_type_name(name)
        || [
            OperationType::Query,
            OperationType::Mutation,
            OperationType::Subscription,
        ]
        .iter()
        .any(|op| op.default_type_name() == name)
}

pub(crate) fn merge_type_extensions(walker: &mut Walker) -> Rc<RefCell<ExtensionMerging>> {
    let visitor = Rc::new(RefCell::new(ExtensionMerging));
    walker.register_visitor(Rc::clone(&visitor) as Rc<RefCell<dyn Visitor>>);
    visitor
}

pub(crate) struct ExtensionMerging;

impl ExtensionMerging {
    /// Looks up the base definition the extension folds into, requiring the
    /// matching definition kind. Extensions without a base stay in place.
    fn base_node(walk: &Walk<'_>, name: &str, kind: NodeKind) -> Option<Node> {
        let node = walk.operation.index.first_non_extension_node_by_name(name)?;
        (node.kind == kind).then_some(node)
    }

    fn drop_extension(walk: &mut Walk<'_>, name: &str, node: Node) {
        walk.remove_root_node(node);
        walk.operation.index.remove(name, node);
    }
}

impl Visitor for ExtensionMerging {
    fn enter_object_type_extension(
        &mut self,
        walk: &mut Walk<'_>,
        extension: Ref<ObjectTypeExtension>,
    ) {
        let ext = walk.operation.object_type_extensions[extension].clone();
        let name = walk.operation.slice(ext.name).to_owned();
        let Some(base) = Self::base_node(walk, &name, NodeKind::ObjectTypeDefinition) else {
            return;
        };
        let base_ref: Ref<ObjectTypeDefinition> = Ref::new(base.index);
        let target = &mut walk.operation.object_type_definitions[base_ref];
        target.directives.extend(ext.directives.iter().copied());
        target
            .field_definitions
            .extend(ext.field_definitions.iter().copied());
        target
            .implements_interfaces
            .extend(ext.implements_interfaces.iter().copied());
        let node = Node::new(NodeKind::ObjectTypeExtension, extension.idx());
        Self::drop_extension(walk, &name, node);
    }

    fn enter_interface_type_extension(
        &mut self,
        walk: &mut Walk<'_>,
        extension: Ref<InterfaceTypeExtension>,
    ) {
        let ext = walk.operation.interface_type_extensions[extension].clone();
        let name = walk.operation.slice(ext.name).to_owned();
        let Some(base) = Self::base_node(walk, &name, NodeKind::InterfaceTypeDefinition) else {
            return;
        };
        let base_ref: Ref<InterfaceTypeDefinition> = Ref::new(base.index);
        let target = &mut walk.operation.interface_type_definitions[base_ref];
        target.directives.extend(ext.directives.iter().copied());
        target
            .field_definitions
            .extend(ext.field_definitions.iter().copied());
        target
            .implements_interfaces
            .extend(ext.implements_interfaces.iter().copied());
        let node = Node::new(NodeKind::InterfaceTypeExtension, extension.idx());
        Self::drop_extension(walk, &name, node);
    }

    fn enter_scalar_type_extension(
        &mut self,
        walk: &mut Walk<'_>,
        extension: Ref<ScalarTypeExtension>,
    ) {
        let ext = walk.operation.scalar_type_extensions[extension].clone();
        let name = walk.operation.slice(ext.name).to_owned();
        let Some(base) = Self::base_node(walk, &name, NodeKind::ScalarTypeDefinition) else {
            return;
        };
        let base_ref: Ref<crate::ast::ScalarTypeDefinition> = Ref::new(base.index);
        walk.operation.scalar_type_definitions[base_ref]
            .directives
            .extend(ext.directives.iter().copied());
        let node = Node::new(NodeKind::ScalarTypeExtension, extension.idx());
        Self::drop_extension(walk, &name, node);
    }

    fn enter_enum_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<EnumTypeExtension>) {
        let ext = walk.operation.enum_type_extensions[extension].clone();
        let name = walk.operation.slice(ext.name).to_owned();
        let Some(base) = Self::base_node(walk, &name, NodeKind::EnumTypeDefinition) else {
            return;
        };
        let base_ref: Ref<crate::ast::EnumTypeDefinition> = Ref::new(base.index);
        let target = &mut walk.operation.enum_type_definitions[base_ref];
        target.directives.extend(ext.directives.iter().copied());
        target.values.extend(ext.values.iter().copied());
        let node = Node::new(NodeKind::EnumTypeExtension, extension.idx());
        Self::drop_extension(walk, &name, node);
    }

    fn enter_union_type_extension(
        &mut self,
        walk: &mut Walk<'_>,
        extension: Ref<UnionTypeExtension>,
    ) {
        let ext = walk.operation.union_type_extensions[extension].clone();
        let name = walk.operation.slice(ext.name).to_owned();
        let Some(base) = Self::base_node(walk, &name, NodeKind::UnionTypeDefinition) else {
            return;
        };
        let base_ref: Ref<crate::ast::UnionTypeDefinition> = Ref::new(base.index);
        let target = &mut walk.operation.union_type_definitions[base_ref];
        target.directives.extend(ext.directives.iter().copied());
        target.member_types.extend(ext.member_types.iter().copied());
        let node = Node::new(NodeKind::UnionTypeExtension, extension.idx());
        Self::drop_extension(walk, &name, node);
    }

    fn enter_input_object_type_extension(
        &mut self,
        walk: &mut Walk<'_>,
        extension: Ref<InputObjectTypeExtension>,
    ) {
        let ext = walk.operation.input_object_type_extensions[extension].clone();
        let name = walk.operation.slice(ext.name).to_owned();
        let Some(base) = Self::base_node(walk, &name, NodeKind::InputObjectTypeDefinition) else {
            return;
        };
        let base_ref: Ref<crate::ast::InputObjectTypeDefinition> = Ref::new(base.index);
        let target = &mut walk.operation.input_object_type_definitions[base_ref];
        target.directives.extend(ext.directives.iter().copied());
        target.input_fields.extend(ext.input_fields.iter().copied());
        let node = Node::new(NodeKind::InputObjectTypeExtension, extension.idx());
        Self::drop_extension(walk, &name, node);
    }
}
