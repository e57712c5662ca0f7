//! Navigation over type-system definitions.
//!
//! These helpers run against the *definition* document (the schema) while
//! an operation document is being walked or rewritten.

use super::{
    Document, FieldDefinition, InputValueDefinition, Node, NodeKind, Ref,
};

impl Document {
    /// Field definitions declared directly on a type node. Extensions carry
    /// their own lists until extension merging folds them into the base.
    pub fn node_field_definitions(&self, node: Node) -> &[Ref<FieldDefinition>] {
        match node.kind {
            NodeKind::ObjectTypeDefinition => {
                &self.object_type_definitions[Ref::new(node.index)].field_definitions
            }
            NodeKind::ObjectTypeExtension => {
                &self.object_type_extensions[Ref::new(node.index)].field_definitions
            }
            NodeKind::InterfaceTypeDefinition => {
                &self.interface_type_definitions[Ref::new(node.index)].field_definitions
            }
            NodeKind::InterfaceTypeExtension => {
                &self.interface_type_extensions[Ref::new(node.index)].field_definitions
            }
            _ => &[],
        }
    }

    /// Finds a field definition on a type, searching the base definition
    /// and any same-named extensions. `__typename` resolves on every
    /// composite type and yields `None` here; callers treat it specially.
    pub fn field_definition_by_node_and_name(
        &self,
        node: Node,
        field_name: &str,
    ) -> Option<Ref<FieldDefinition>> {
        let type_name = self.node_name(node)?;
        for candidate in self.index.nodes_by_name(type_name) {
            let found = self
                .node_field_definitions(*candidate)
                .iter()
                .copied()
                .find(|&fd| self.field_definition_name(fd) == field_name);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    pub fn input_object_field_by_name(
        &self,
        node: Node,
        field_name: &str,
    ) -> Option<Ref<InputValueDefinition>> {
        let type_name = self.node_name(node)?;
        for candidate in self.index.nodes_by_name(type_name) {
            let input_fields = match candidate.kind {
                NodeKind::InputObjectTypeDefinition => {
                    &self.input_object_type_definitions[Ref::new(candidate.index)].input_fields
                }
                NodeKind::InputObjectTypeExtension => {
                    &self.input_object_type_extensions[Ref::new(candidate.index)].input_fields
                }
                _ => continue,
            };
            let found = input_fields
                .iter()
                .copied()
                .find(|&ivd| self.input_value_definition_name(ivd) == field_name);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    pub fn directive_argument_definition_by_name(
        &self,
        directive_name: &str,
        argument_name: &str,
    ) -> Option<Ref<InputValueDefinition>> {
        let directive = self.directive_definition_by_name(directive_name)?;
        self.directive_definitions[directive]
            .arguments
            .iter()
            .copied()
            .find(|&ivd| self.input_value_definition_name(ivd) == argument_name)
    }

    pub fn node_is_composite_type(&self, node: Node) -> bool {
        matches!(
            node.kind,
            NodeKind::ObjectTypeDefinition
                | NodeKind::InterfaceTypeDefinition
                | NodeKind::UnionTypeDefinition
        )
    }

    /// Interfaces a type declares, across base definition and extensions.
    pub fn node_implements_interfaces(&self, type_name: &str) -> Vec<&str> {
        let mut out = Vec::new();
        for node in self.index.nodes_by_name(type_name) {
            let interfaces = match node.kind {
                NodeKind::ObjectTypeDefinition => {
                    &self.object_type_definitions[Ref::new(node.index)].implements_interfaces
                }
                NodeKind::ObjectTypeExtension => {
                    &self.object_type_extensions[Ref::new(node.index)].implements_interfaces
                }
                NodeKind::InterfaceTypeDefinition => {
                    &self.interface_type_definitions[Ref::new(node.index)].implements_interfaces
                }
                NodeKind::InterfaceTypeExtension => {
                    &self.interface_type_extensions[Ref::new(node.index)].implements_interfaces
                }
                _ => continue,
            };
            out.extend(interfaces.iter().map(|&span| self.slice(span)));
        }
        out
    }

    /// Member types a union declares, across base definition and extensions.
    pub fn union_member_names(&self, union_name: &str) -> Vec<&str> {
        let mut out = Vec::new();
        for node in self.index.nodes_by_name(union_name) {
            let members = match node.kind {
                NodeKind::UnionTypeDefinition => {
                    &self.union_type_definitions[Ref::new(node.index)].member_types
                }
                NodeKind::UnionTypeExtension => {
                    &self.union_type_extensions[Ref::new(node.index)].member_types
                }
                _ => continue,
            };
            out.extend(members.iter().map(|&m| self.type_name(m)));
        }
        out
    }

    /// Whether a union contains the given member, across base and extensions.
    pub fn union_has_member(&self, union_name: &str, member_name: &str) -> bool {
        self.union_member_names(union_name).contains(&member_name)
    }

    /// The concrete object types a composite type can resolve to: the type
    /// itself for objects, declared implementors for interfaces, members
    /// for unions. Unknown and non-composite names resolve to nothing.
    pub fn concrete_type_names<'a>(&'a self, type_name: &'a str) -> Vec<&'a str> {
        let Some(node) = self.index.first_non_extension_node_by_name(type_name) else {
            return Vec::new();
        };
        match node.kind {
            NodeKind::ObjectTypeDefinition => vec![type_name],
            NodeKind::InterfaceTypeDefinition => self
                .index
                .nodes
                .iter()
                .filter(|(_, nodes)| {
                    nodes
                        .iter()
                        .any(|n| n.kind == NodeKind::ObjectTypeDefinition)
                })
                .map(|(name, _)| name.as_str())
                .filter(|name| self.node_implements_interfaces(name).contains(&type_name))
                .collect(),
            NodeKind::UnionTypeDefinition => self.union_member_names(type_name),
            _ => Vec::new(),
        }
    }

    /// Whether two type conditions can be satisfied by one concrete type
    /// at the same time. Either name failing to resolve counts as no
    /// intersection.
    pub fn type_conditions_intersect(&self, left: &str, right: &str) -> bool {
        if left == right {
            return true;
        }
        let right = self.concrete_type_names(right);
        self.concrete_type_names(left)
            .iter()
            .any(|name| right.contains(name))
    }

    /// Whether a selection constrained to `type_condition` always applies
    /// when the enclosing type is `enclosing_type_name`: the names match,
    /// or the condition is an interface the enclosing type implements. A
    /// union condition never qualifies; it narrows the selection to the
    /// union's members, not to the enclosing type.
    pub fn type_condition_always_applies(
        &self,
        enclosing_type_name: &str,
        type_condition: &str,
    ) -> bool {
        enclosing_type_name == type_condition
            || self
                .node_implements_interfaces(enclosing_type_name)
                .contains(&type_condition)
    }
}
