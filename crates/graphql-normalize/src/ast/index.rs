//! Name index over a document's type-system definitions.

use indexmap::IndexMap;

use super::{Document, Node, NodeKind, OperationType, Ref};

/// Maps definition names to the nodes carrying them, and records the root
/// operation type names declared by `schema` definitions and extensions.
///
/// A name maps to *several* nodes when a base definition coexists with
/// extensions of the same name. Nodes are kept in document order, so the
/// base definition is found first when it exists.
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    pub nodes: IndexMap<String, Vec<Node>>,
    pub query_type_name: Option<String>,
    pub mutation_type_name: Option<String>,
    pub subscription_type_name: Option<String>,
}

impl DocumentIndex {
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.query_type_name = None;
        self.mutation_type_name = None;
        self.subscription_type_name = None;
    }

    pub fn add(&mut self, name: &str, node: Node) {
        self.nodes.entry(name.to_owned()).or_default().push(node);
    }

    pub fn remove(&mut self, name: &str, node: Node) {
        if let Some(nodes) = self.nodes.get_mut(name) {
            nodes.retain(|&n| n != node);
        }
    }

    pub fn first_node_by_name(&self, name: &str) -> Option<Node> {
        self.nodes.get(name)?.first().copied()
    }

    pub fn first_non_extension_node_by_name(&self, name: &str) -> Option<Node> {
        self.nodes
            .get(name)?
            .iter()
            .copied()
            .find(|n| !n.is_extension())
    }

    pub fn nodes_by_name(&self, name: &str) -> &[Node] {
        self.nodes.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn root_operation_type_name(&self, operation_type: OperationType) -> Option<&str> {
        match operation_type {
            OperationType::Query => self.query_type_name.as_deref(),
            OperationType::Mutation => self.mutation_type_name.as_deref(),
            OperationType::Subscription => self.subscription_type_name.as_deref(),
        }
    }

    pub fn is_root_operation_type_name(&self, name: &str) -> bool {
        self.query_type_name.as_deref() == Some(name)
            || self.mutation_type_name.as_deref() == Some(name)
            || self.subscription_type_name.as_deref() == Some(name)
    }
}

impl Document {
    /// Rebuilds the name index from the current root nodes.
    ///
    /// Called after parsing a type-system document and again after passes
    /// that add or remove definitions wholesale, such as extension merging.
    pub fn rebuild_index(&mut self) {
        let mut index = std::mem::take(&mut self.index);
        index.reset();

        for node in &self.root_nodes {
            match node.kind {
                NodeKind::SchemaDefinition => {
                    let schema = &self.schema_definitions[Ref::new(node.index)];
                    for &root in &schema.root_operation_type_definitions {
                        let root = &self.root_operation_type_definitions[root];
                        let name = self.slice(root.named_type).to_owned();
                        match root.operation_type {
                            OperationType::Query => index.query_type_name = Some(name),
                            OperationType::Mutation => index.mutation_type_name = Some(name),
                            OperationType::Subscription => {
                                index.subscription_type_name = Some(name)
                            }
                        }
                    }
                }
                NodeKind::SchemaExtension => {
                    let schema = &self.schema_extensions[Ref::new(node.index)];
                    for &root in &schema.root_operation_type_definitions {
                        let root = &self.root_operation_type_definitions[root];
                        let name = self.slice(root.named_type).to_owned();
                        match root.operation_type {
                            OperationType::Query => index.query_type_name = Some(name),
                            OperationType::Mutation => index.mutation_type_name = Some(name),
                            OperationType::Subscription => {
                                index.subscription_type_name = Some(name)
                            }
                        }
                    }
                }
                NodeKind::ObjectTypeDefinition
                | NodeKind::ObjectTypeExtension
                | NodeKind::InterfaceTypeDefinition
                | NodeKind::InterfaceTypeExtension
                | NodeKind::UnionTypeDefinition
                | NodeKind::UnionTypeExtension
                | NodeKind::EnumTypeDefinition
                | NodeKind::EnumTypeExtension
                | NodeKind::ScalarTypeDefinition
                | NodeKind::ScalarTypeExtension
                | NodeKind::InputObjectTypeDefinition
                | NodeKind::InputObjectTypeExtension
                | NodeKind::DirectiveDefinition => {
                    if let Some(name) = self.node_name(*node) {
                        index.add(name, *node);
                    }
                }
                _ => {}
            }
        }

        // No explicit root type declarations: fall back to the conventional
        // names for the types that actually exist.
        for op in [
            OperationType::Query,
            OperationType::Mutation,
            OperationType::Subscription,
        ] {
            if index.root_operation_type_name(op).is_none()
                && index
                    .first_non_extension_node_by_name(op.default_type_name())
                    .is_some()
            {
                let name = Some(op.default_type_name().to_owned());
                match op {
                    OperationType::Query => index.query_type_name = name,
                    OperationType::Mutation => index.mutation_type_name = name,
                    OperationType::Subscription => index.subscription_type_name = name,
                }
            }
        }

        self.index = index;
    }
}
