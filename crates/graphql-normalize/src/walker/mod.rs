//! Schema-aware document traversal with multiple registered visitors.
//!
//! A [`Walker`] owns an ordered list of visitors and drives them over an
//! operation document, resolving enclosing types against an optional
//! definition document as it descends. Visitors receive a [`Walk`] handle
//! through which they may mutate the document *while it is being walked*:
//! after every child visit the walker compares the live selection list
//! against the snapshot it is iterating and restarts the surrounding
//! selection set when they diverge, so newly spliced-in selections are
//! themselves visited.
//!
//! Enter callbacks run in registration order, leave callbacks in reverse
//! registration order. Each visitor gets a stable [`VisitorId`] at
//! registration, which a [`VisitorFilter`] can use to suppress single
//! visitors for a subtree without affecting the others.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast;
use crate::ast::{
    Argument, Directive, Document, Field, FragmentDefinition, FragmentSpread, InlineFragment,
    Node, NodeKind, OperationDefinition, Ref, Selection, SelectionSet, VariableDefinition,
};
use crate::report::{ExternalError, ExternalErrorKind, PathItem, Report};

/// Stable identity of a registered visitor, assigned in registration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VisitorId(usize);

impl VisitorId {
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Receives callbacks during a walk. Every method defaults to a no-op, so
/// implementations only override the events they care about.
#[allow(unused_variables)]
pub trait Visitor {
    fn enter_document(&mut self, walk: &mut Walk<'_>) {}
    fn leave_document(&mut self, walk: &mut Walk<'_>) {}

    fn enter_operation_definition(&mut self, walk: &mut Walk<'_>, operation: Ref<OperationDefinition>) {}
    fn leave_operation_definition(&mut self, walk: &mut Walk<'_>, operation: Ref<OperationDefinition>) {}

    fn enter_fragment_definition(&mut self, walk: &mut Walk<'_>, fragment: Ref<FragmentDefinition>) {}
    fn leave_fragment_definition(&mut self, walk: &mut Walk<'_>, fragment: Ref<FragmentDefinition>) {}

    fn enter_variable_definition(&mut self, walk: &mut Walk<'_>, variable: Ref<VariableDefinition>) {}
    fn leave_variable_definition(&mut self, walk: &mut Walk<'_>, variable: Ref<VariableDefinition>) {}

    fn enter_selection_set(&mut self, walk: &mut Walk<'_>, set: Ref<SelectionSet>) {}
    fn leave_selection_set(&mut self, walk: &mut Walk<'_>, set: Ref<SelectionSet>) {}

    fn enter_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {}
    fn leave_field(&mut self, walk: &mut Walk<'_>, field: Ref<Field>) {}

    fn enter_fragment_spread(&mut self, walk: &mut Walk<'_>, spread: Ref<FragmentSpread>) {}
    fn leave_fragment_spread(&mut self, walk: &mut Walk<'_>, spread: Ref<FragmentSpread>) {}

    fn enter_inline_fragment(&mut self, walk: &mut Walk<'_>, inline: Ref<InlineFragment>) {}
    fn leave_inline_fragment(&mut self, walk: &mut Walk<'_>, inline: Ref<InlineFragment>) {}

    fn enter_argument(&mut self, walk: &mut Walk<'_>, argument: Ref<Argument>) {}
    fn leave_argument(&mut self, walk: &mut Walk<'_>, argument: Ref<Argument>) {}

    fn enter_directive(&mut self, walk: &mut Walk<'_>, directive: Ref<Directive>) {}
    fn leave_directive(&mut self, walk: &mut Walk<'_>, directive: Ref<Directive>) {}

    // Type-system definitions are dispatched flat, at the root level.

    fn enter_schema_definition(&mut self, walk: &mut Walk<'_>, schema: Ref<ast::SchemaDefinition>) {}
    fn leave_schema_definition(&mut self, walk: &mut Walk<'_>, schema: Ref<ast::SchemaDefinition>) {}

    fn enter_schema_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::SchemaExtension>) {}
    fn leave_schema_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::SchemaExtension>) {}

    fn enter_object_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::ObjectTypeDefinition>) {}
    fn leave_object_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::ObjectTypeDefinition>) {}

    fn enter_object_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::ObjectTypeExtension>) {}
    fn leave_object_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::ObjectTypeExtension>) {}

    fn enter_interface_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::InterfaceTypeDefinition>) {}
    fn leave_interface_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::InterfaceTypeDefinition>) {}

    fn enter_interface_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::InterfaceTypeExtension>) {}
    fn leave_interface_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::InterfaceTypeExtension>) {}

    fn enter_union_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::UnionTypeDefinition>) {}
    fn leave_union_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::UnionTypeDefinition>) {}

    fn enter_union_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::UnionTypeExtension>) {}
    fn leave_union_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::UnionTypeExtension>) {}

    fn enter_enum_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::EnumTypeDefinition>) {}
    fn leave_enum_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::EnumTypeDefinition>) {}

    fn enter_enum_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::EnumTypeExtension>) {}
    fn leave_enum_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::EnumTypeExtension>) {}

    fn enter_scalar_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::ScalarTypeDefinition>) {}
    fn leave_scalar_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::ScalarTypeDefinition>) {}

    fn enter_scalar_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::ScalarTypeExtension>) {}
    fn leave_scalar_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::ScalarTypeExtension>) {}

    fn enter_input_object_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::InputObjectTypeDefinition>) {}
    fn leave_input_object_type_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::InputObjectTypeDefinition>) {}

    fn enter_input_object_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::InputObjectTypeExtension>) {}
    fn leave_input_object_type_extension(&mut self, walk: &mut Walk<'_>, extension: Ref<ast::InputObjectTypeExtension>) {}

    fn enter_directive_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::DirectiveDefinition>) {}
    fn leave_directive_definition(&mut self, walk: &mut Walk<'_>, definition: Ref<ast::DirectiveDefinition>) {}
}

/// Decides, per callback site, whether a visitor is allowed to run. A
/// denied visitor is also suppressed for the subtree below that site.
pub trait VisitorFilter {
    fn allow_visitor(&self, visitor: VisitorId, kind: NodeKind, index: usize) -> bool;
}

/// Visitors suppressed for the current subtree.
#[derive(Debug, Clone, Default)]
struct SkipVisitors(Vec<VisitorId>);

impl SkipVisitors {
    fn contains(&self, id: VisitorId) -> bool {
        self.0.contains(&id)
    }

    fn add(&mut self, id: VisitorId) {
        if !self.contains(id) {
            self.0.push(id);
        }
    }
}

type DeferredAction = Box<dyn for<'w> FnOnce(&mut Walk<'w>)>;

/// The mutable traversal state handed to every visitor callback.
pub struct Walk<'a> {
    /// The document being walked, open for mutation.
    pub operation: &'a mut Document,
    /// The schema the walk resolves types against, when one is available.
    pub definition: Option<&'a Document>,
    pub report: &'a mut Report,
    /// Chain of nodes from the document root down to the parent of the
    /// node currently being visited.
    pub ancestors: Vec<Node>,
    /// Response path to the current location.
    pub path: Vec<PathItem>,
    type_definitions: Vec<Node>,
    current_operation: Option<Ref<OperationDefinition>>,
    stop: bool,
    skip: bool,
    revisit: bool,
    deferred: Vec<DeferredAction>,
}

impl<'a> Walk<'a> {
    /// Aborts the walk entirely.
    pub fn stop(&mut self) {
        self.stop = true;
    }

    /// Skips the children of the node currently being entered. Leave
    /// callbacks for the node itself still run.
    pub fn skip_node(&mut self) {
        self.skip = true;
    }

    /// Restarts the running batch of enter callbacks for the current node
    /// from the first registered visitor, so every visitor sees the node
    /// again after a mutation. Only meaningful inside an enter callback;
    /// leave batches ignore it.
    pub fn revisit_node(&mut self) {
        self.revisit = true;
    }

    pub fn stop_with_internal_error(&mut self, error: impl std::fmt::Display) {
        self.report.add_internal_error(error);
        self.stop = true;
    }

    pub fn stop_with_external_error(&mut self, kind: ExternalErrorKind) {
        self.report.add_external_error(ExternalError {
            kind,
            path: self.path.clone(),
        });
        self.stop = true;
    }

    /// Queues an action to run after the current `enter_field` batch has
    /// finished, before the field's children are walked.
    pub fn defer_on_enter_field(&mut self, action: impl for<'w> FnOnce(&mut Walk<'w>) + 'static) {
        self.deferred.push(Box::new(action));
    }

    /// The operation definition currently being walked, if any.
    pub fn current_operation(&self) -> Option<Ref<OperationDefinition>> {
        self.current_operation
    }

    /// The immediate parent of the node currently being visited.
    pub fn ancestor(&self) -> Node {
        self.ancestors.last().copied().unwrap_or(Node::INVALID)
    }

    /// The type-system node enclosing the current selection set, resolved
    /// in the definition document.
    pub fn enclosing_type(&self) -> Node {
        self.type_definitions
            .last()
            .copied()
            .unwrap_or(Node::INVALID)
    }

    pub fn enclosing_type_name(&self) -> Option<&str> {
        self.definition?.node_name(self.enclosing_type())
    }

    /// The definition of a field on the current enclosing type.
    pub fn field_definition(
        &self,
        field: Ref<Field>,
    ) -> Option<Ref<crate::ast::FieldDefinition>> {
        let definition = self.definition?;
        definition
            .field_definition_by_node_and_name(self.enclosing_type(), self.operation.field_name(field))
    }

    /// Tombstones the root node carrying the given `(kind, index)` pair.
    pub fn remove_root_node(&mut self, node: Node) {
        if let Some(position) = self.operation.root_nodes.iter().position(|&n| n == node) {
            self.operation.remove_root_node(position);
        }
    }

    fn stop_requested(&self) -> bool {
        self.stop
    }
}

struct RegisteredVisitor {
    id: VisitorId,
    visitor: Rc<RefCell<dyn Visitor>>,
}

/// Drives registered visitors over a document.
#[derive(Default)]
pub struct Walker {
    visitors: Vec<RegisteredVisitor>,
    filter: Option<Rc<dyn VisitorFilter>>,
}

impl Walker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a visitor and returns its stable id. Visitors run in
    /// registration order on enter and in reverse order on leave.
    pub fn register_visitor(&mut self, visitor: Rc<RefCell<dyn Visitor>>) -> VisitorId {
        let id = VisitorId(self.visitors.len());
        self.visitors.push(RegisteredVisitor { id, visitor });
        id
    }

    pub fn set_visitor_filter(&mut self, filter: Rc<dyn VisitorFilter>) {
        self.filter = Some(filter);
    }

    /// Drops every registered visitor and the filter, so the walker can be
    /// reused for an unrelated set of passes. Previously returned ids are
    /// invalid afterwards.
    pub fn reset_visitors(&mut self) {
        self.visitors.clear();
        self.filter = None;
    }

    /// Walks the operation document, resolving types against the optional
    /// definition document. Errors land in `report` and abort the walk.
    pub fn walk(
        &self,
        operation: &mut Document,
        definition: Option<&Document>,
        report: &mut Report,
    ) {
        let mut traverse = Traverse {
            visitors: &self.visitors,
            filter: self.filter.clone(),
            walk: Walk {
                operation,
                definition,
                report,
                ancestors: Vec::new(),
                path: Vec::new(),
                type_definitions: Vec::new(),
                current_operation: None,
                stop: false,
                skip: false,
                revisit: false,
                deferred: Vec::new(),
            },
        };
        traverse.walk_document();
    }
}

struct Traverse<'a, 'w> {
    visitors: &'a [RegisteredVisitor],
    filter: Option<Rc<dyn VisitorFilter>>,
    walk: Walk<'w>,
}

/// Runs one callback on every non-suppressed visitor. `enter` iterates in
/// registration order and honors `revisit_node` by restarting the batch
/// at the first visitor; `leave` iterates in reverse and discards a stray
/// revisit request. A filter denial suppresses the visitor for the rest
/// of the subtree via the local `SkipVisitors`.
macro_rules! dispatch {
    ($self:ident, $skip_for:expr, enter, $kind:ident, $index:expr, $method:ident $(, $arg:expr)*) => {
        let mut i = 0;
        while i < $self.visitors.len() {
            let id = $self.visitors[i].id;
            if $skip_for.contains(id) {
                i += 1;
                continue;
            }
            if let Some(filter) = &$self.filter {
                if !filter.allow_visitor(id, NodeKind::$kind, $index) {
                    $skip_for.add(id);
                    i += 1;
                    continue;
                }
            }
            let visitor = Rc::clone(&$self.visitors[i].visitor);
            visitor.borrow_mut().$method(&mut $self.walk $(, $arg)*);
            if $self.walk.stop_requested() {
                return;
            }
            if std::mem::take(&mut $self.walk.revisit) {
                i = 0;
                continue;
            }
            i += 1;
        }
    };
    ($self:ident, $skip_for:expr, leave, $kind:ident, $index:expr, $method:ident $(, $arg:expr)*) => {
        for i in (0..$self.visitors.len()).rev() {
            let id = $self.visitors[i].id;
            if $skip_for.contains(id) {
                continue;
            }
            if let Some(filter) = &$self.filter {
                if !filter.allow_visitor(id, NodeKind::$kind, $index) {
                    $skip_for.add(id);
                    continue;
                }
            }
            let visitor = Rc::clone(&$self.visitors[i].visitor);
            visitor.borrow_mut().$method(&mut $self.walk $(, $arg)*);
            $self.walk.revisit = false;
            if $self.walk.stop_requested() {
                return;
            }
        }
    };
}

impl Traverse<'_, '_> {
    fn walk_document(&mut self) {
        let mut skip_for = SkipVisitors::default();
        dispatch!(self, skip_for, enter, Unknown, 0, enter_document);

        if !std::mem::take(&mut self.walk.skip) {
            // Root nodes may be tombstoned mid-walk; re-check each entry
            // right before descending into it.
            for root_index in 0..self.walk.operation.root_nodes.len() {
                let node = self.walk.operation.root_nodes[root_index];
                match node.kind {
                    NodeKind::OperationDefinition => {
                        self.walk_operation_definition(Ref::new(node.index), &skip_for)
                    }
                    NodeKind::FragmentDefinition => {
                        self.walk_fragment_definition(Ref::new(node.index), &skip_for)
                    }
                    _ => self.walk_type_system_node(node, &skip_for),
                }
                if self.walk.stop_requested() {
                    return;
                }
            }
        }

        dispatch!(self, skip_for, leave, Unknown, 0, leave_document);
    }

    /// Type-system definitions are dispatched flat: enter, then leave,
    /// without descending into field or value definitions.
    fn walk_type_system_node(&mut self, node: Node, skip_for: &SkipVisitors) {
        let mut skip_for = skip_for.clone();
        macro_rules! flat {
            ($kind:ident, $enter:ident, $leave:ident) => {{
                let r = Ref::new(node.index);
                dispatch!(self, skip_for, enter, $kind, node.index, $enter, r);
                self.walk.skip = false;
                dispatch!(self, skip_for, leave, $kind, node.index, $leave, r);
            }};
        }
        match node.kind {
            NodeKind::SchemaDefinition => {
                flat!(SchemaDefinition, enter_schema_definition, leave_schema_definition)
            }
            NodeKind::SchemaExtension => {
                flat!(SchemaExtension, enter_schema_extension, leave_schema_extension)
            }
            NodeKind::ObjectTypeDefinition => flat!(
                ObjectTypeDefinition,
                enter_object_type_definition,
                leave_object_type_definition
            ),
            NodeKind::ObjectTypeExtension => flat!(
                ObjectTypeExtension,
                enter_object_type_extension,
                leave_object_type_extension
            ),
            NodeKind::InterfaceTypeDefinition => flat!(
                InterfaceTypeDefinition,
                enter_interface_type_definition,
                leave_interface_type_definition
            ),
            NodeKind::InterfaceTypeExtension => flat!(
                InterfaceTypeExtension,
                enter_interface_type_extension,
                leave_interface_type_extension
            ),
            NodeKind::UnionTypeDefinition => flat!(
                UnionTypeDefinition,
                enter_union_type_definition,
                leave_union_type_definition
            ),
            NodeKind::UnionTypeExtension => flat!(
                UnionTypeExtension,
                enter_union_type_extension,
                leave_union_type_extension
            ),
            NodeKind::EnumTypeDefinition => flat!(
                EnumTypeDefinition,
                enter_enum_type_definition,
                leave_enum_type_definition
            ),
            NodeKind::EnumTypeExtension => flat!(
                EnumTypeExtension,
                enter_enum_type_extension,
                leave_enum_type_extension
            ),
            NodeKind::ScalarTypeDefinition => flat!(
                ScalarTypeDefinition,
                enter_scalar_type_definition,
                leave_scalar_type_definition
            ),
            NodeKind::ScalarTypeExtension => flat!(
                ScalarTypeExtension,
                enter_scalar_type_extension,
                leave_scalar_type_extension
            ),
            NodeKind::InputObjectTypeDefinition => flat!(
                InputObjectTypeDefinition,
                enter_input_object_type_definition,
                leave_input_object_type_definition
            ),
            NodeKind::InputObjectTypeExtension => flat!(
                InputObjectTypeExtension,
                enter_input_object_type_extension,
                leave_input_object_type_extension
            ),
            NodeKind::DirectiveDefinition => flat!(
                DirectiveDefinition,
                enter_directive_definition,
                leave_directive_definition
            ),
            _ => {}
        }
    }

    fn walk_operation_definition(
        &mut self,
        operation: Ref<OperationDefinition>,
        skip_for: &SkipVisitors,
    ) {
        let mut skip_for = skip_for.clone();
        self.walk.current_operation = Some(operation);
        dispatch!(
            self,
            skip_for,
            enter,
            OperationDefinition,
            operation.idx(),
            enter_operation_definition,
            operation
        );

        if !std::mem::take(&mut self.walk.skip) {
            self.walk
                .ancestors
                .push(Node::new(NodeKind::OperationDefinition, operation.idx()));

            let variable_definitions =
                self.walk.operation.operation_definitions[operation].variable_definitions.clone();
            for vd in variable_definitions {
                self.walk_variable_definition(vd, &skip_for);
                if self.walk.stop_requested() {
                    return;
                }
            }

            let directives = self.walk.operation.operation_definitions[operation].directives.clone();
            for directive in directives {
                self.walk_directive(directive, &skip_for);
                if self.walk.stop_requested() {
                    return;
                }
            }

            let operation_type = self.walk.operation.operation_definitions[operation].operation_type;
            let root_type = self.resolve_root_type(operation_type);
            if self.walk.stop_requested() {
                return;
            }
            if let Some(set) = self.walk.operation.operation_definitions[operation].selection_set {
                self.walk
                    .path
                    .push(PathItem::FieldName(operation_type.name().to_owned()));
                self.walk.type_definitions.push(root_type);
                self.walk_selection_set(set, &skip_for);
                self.walk.type_definitions.pop();
                self.walk.path.pop();
                if self.walk.stop_requested() {
                    return;
                }
            }

            self.walk.ancestors.pop();
        }

        dispatch!(
            self,
            skip_for,
            leave,
            OperationDefinition,
            operation.idx(),
            leave_operation_definition,
            operation
        );
        self.walk.current_operation = None;
    }

    /// Looks up the root type node for an operation type. Without a
    /// definition document every type resolves to the invalid node and
    /// schema-dependent callbacks see `None` from the lookup helpers.
    fn resolve_root_type(&mut self, operation_type: crate::ast::OperationType) -> Node {
        let Some(definition) = self.walk.definition else {
            return Node::INVALID;
        };
        let root_type_name = definition
            .index
            .root_operation_type_name(operation_type)
            .map(str::to_owned)
            .or_else(|| {
                definition
                    .index
                    .first_non_extension_node_by_name(operation_type.default_type_name())
                    .map(|_| operation_type.default_type_name().to_owned())
            });
        let node = root_type_name
            .as_deref()
            .and_then(|name| definition.index.first_non_extension_node_by_name(name));
        match node {
            Some(node) => node,
            None => {
                self.walk.stop_with_external_error(
                    ExternalErrorKind::OperationTypeUndefined(operation_type.name()),
                );
                Node::INVALID
            }
        }
    }

    fn walk_fragment_definition(
        &mut self,
        fragment: Ref<FragmentDefinition>,
        skip_for: &SkipVisitors,
    ) {
        let mut skip_for = skip_for.clone();
        dispatch!(
            self,
            skip_for,
            enter,
            FragmentDefinition,
            fragment.idx(),
            enter_fragment_definition,
            fragment
        );

        if !std::mem::take(&mut self.walk.skip) {
            self.walk
                .ancestors
                .push(Node::new(NodeKind::FragmentDefinition, fragment.idx()));

            let directives = self.walk.operation.fragment_definitions[fragment].directives.clone();
            for directive in directives {
                self.walk_directive(directive, &skip_for);
                if self.walk.stop_requested() {
                    return;
                }
            }

            let type_condition = self.walk.operation.fragment_definitions[fragment].type_condition;
            let condition_name = self.walk.operation.slice(type_condition).to_owned();
            let condition_type = self
                .walk
                .definition
                .and_then(|d| d.index.first_non_extension_node_by_name(&condition_name))
                .unwrap_or(Node::INVALID);
            if self.walk.definition.is_some() && condition_type == Node::INVALID {
                self.walk
                    .stop_with_external_error(ExternalErrorKind::TypeUndefined(condition_name));
                return;
            }

            if let Some(set) = self.walk.operation.fragment_definitions[fragment].selection_set {
                let name = self.walk.operation.fragment_definition_name(fragment).to_owned();
                self.walk.path.push(PathItem::FieldName(name));
                self.walk.type_definitions.push(condition_type);
                self.walk_selection_set(set, &skip_for);
                self.walk.type_definitions.pop();
                self.walk.path.pop();
                if self.walk.stop_requested() {
                    return;
                }
            }

            self.walk.ancestors.pop();
        }

        dispatch!(
            self,
            skip_for,
            leave,
            FragmentDefinition,
            fragment.idx(),
            leave_fragment_definition,
            fragment
        );
    }

    fn walk_variable_definition(
        &mut self,
        variable: Ref<VariableDefinition>,
        skip_for: &SkipVisitors,
    ) {
        let mut skip_for = skip_for.clone();
        dispatch!(
            self,
            skip_for,
            enter,
            VariableDefinition,
            variable.idx(),
            enter_variable_definition,
            variable
        );

        if !std::mem::take(&mut self.walk.skip) {
            self.walk
                .ancestors
                .push(Node::new(NodeKind::VariableDefinition, variable.idx()));
            let directives = self.walk.operation.variable_definitions[variable].directives.clone();
            for directive in directives {
                self.walk_directive(directive, &skip_for);
                if self.walk.stop_requested() {
                    return;
                }
            }
            self.walk.ancestors.pop();
        }

        dispatch!(
            self,
            skip_for,
            leave,
            VariableDefinition,
            variable.idx(),
            leave_variable_definition,
            variable
        );
    }

    fn walk_selection_set(&mut self, set: Ref<SelectionSet>, skip_for: &SkipVisitors) {
        let mut skip_for = skip_for.clone();
        dispatch!(
            self,
            skip_for,
            enter,
            SelectionSet,
            set.idx(),
            enter_selection_set,
            set
        );

        if !std::mem::take(&mut self.walk.skip) {
            self.walk
                .ancestors
                .push(Node::new(NodeKind::SelectionSet, set.idx()));

            // Visitors may splice the live list while we iterate a
            // snapshot of it. When the two diverge the whole set is
            // re-walked from a fresh snapshot, so replacement
            // selections are visited too.
            'snapshot: loop {
                let snapshot = self.walk.operation.selection_sets[set].selection_refs.clone();
                for &selection_ref in &snapshot {
                    match self.walk.operation.selections[selection_ref] {
                        Selection::Field(field) => self.walk_field(field, &skip_for),
                        Selection::FragmentSpread(spread) => {
                            self.walk_fragment_spread(spread, &skip_for)
                        }
                        Selection::InlineFragment(inline) => {
                            self.walk_inline_fragment(inline, &skip_for)
                        }
                    }
                    if self.walk.stop_requested() {
                        return;
                    }
                    if self.walk.operation.selection_sets[set].selection_refs != snapshot {
                        continue 'snapshot;
                    }
                }
                break;
            }

            self.walk.ancestors.pop();
        }

        dispatch!(
            self,
            skip_for,
            leave,
            SelectionSet,
            set.idx(),
            leave_selection_set,
            set
        );
    }

    fn walk_field(&mut self, field: Ref<Field>, skip_for: &SkipVisitors) {
        let mut skip_for = skip_for.clone();
        dispatch!(self, skip_for, enter, Field, field.idx(), enter_field, field);

        let deferred: Vec<DeferredAction> = self.walk.deferred.drain(..).collect();
        for action in deferred {
            action(&mut self.walk);
            if self.walk.stop_requested() {
                return;
            }
        }

        if !std::mem::take(&mut self.walk.skip) {
            self.walk.ancestors.push(Node::new(NodeKind::Field, field.idx()));

            let arguments = self.walk.operation.fields[field].arguments.clone();
            for argument in arguments {
                self.walk_argument(argument, &skip_for);
                if self.walk.stop_requested() {
                    return;
                }
            }

            let directives = self.walk.operation.fields[field].directives.clone();
            for directive in directives {
                self.walk_directive(directive, &skip_for);
                if self.walk.stop_requested() {
                    return;
                }
            }

            if let Some(set) = self.walk.operation.fields[field].selection_set {
                let field_type = self.resolve_field_type(field);
                if self.walk.stop_requested() {
                    return;
                }
                let response_name = self.walk.operation.field_alias_or_name(field).to_owned();
                self.walk.path.push(PathItem::FieldName(response_name));
                self.walk.type_definitions.push(field_type);
                self.walk_selection_set(set, &skip_for);
                self.walk.type_definitions.pop();
                self.walk.path.pop();
                if self.walk.stop_requested() {
                    return;
                }
            }

            self.walk.ancestors.pop();
        }

        dispatch!(self, skip_for, leave, Field, field.idx(), leave_field, field);
    }

    /// Resolves the type a field's sub-selections are made against.
    /// `__typename` has no field definition and yields the invalid node,
    /// as does any lookup without a definition document.
    fn resolve_field_type(&mut self, field: Ref<Field>) -> Node {
        let Some(definition) = self.walk.definition else {
            return Node::INVALID;
        };
        let field_name = self.walk.operation.field_name(field);
        if field_name == "__typename" {
            return Node::INVALID;
        }
        let enclosing = self.walk.enclosing_type();
        if enclosing == Node::INVALID {
            return Node::INVALID;
        }
        match definition.field_definition_by_node_and_name(enclosing, field_name) {
            Some(fd) => {
                let type_name = definition.type_name(definition.field_definitions[fd].ty);
                definition
                    .index
                    .first_non_extension_node_by_name(type_name)
                    .unwrap_or(Node::INVALID)
            }
            None => {
                let field_name = field_name.to_owned();
                let type_name = definition.node_name(enclosing).unwrap_or_default().to_owned();
                self.walk
                    .stop_with_external_error(ExternalErrorKind::FieldUndefinedOnType {
                        field_name,
                        type_name,
                    });
                Node::INVALID
            }
        }
    }

    fn walk_fragment_spread(&mut self, spread: Ref<FragmentSpread>, skip_for: &SkipVisitors) {
        let mut skip_for = skip_for.clone();
        dispatch!(
            self,
            skip_for,
            enter,
            FragmentSpread,
            spread.idx(),
            enter_fragment_spread,
            spread
        );

        if !std::mem::take(&mut self.walk.skip) {
            self.walk
                .ancestors
                .push(Node::new(NodeKind::FragmentSpread, spread.idx()));
            let directives = self.walk.operation.fragment_spreads[spread].directives.clone();
            for directive in directives {
                self.walk_directive(directive, &skip_for);
                if self.walk.stop_requested() {
                    return;
                }
            }
            self.walk.ancestors.pop();
        }

        dispatch!(
            self,
            skip_for,
            leave,
            FragmentSpread,
            spread.idx(),
            leave_fragment_spread,
            spread
        );
    }

    fn walk_inline_fragment(&mut self, inline: Ref<InlineFragment>, skip_for: &SkipVisitors) {
        let mut skip_for = skip_for.clone();
        dispatch!(
            self,
            skip_for,
            enter,
            InlineFragment,
            inline.idx(),
            enter_inline_fragment,
            inline
        );

        if !std::mem::take(&mut self.walk.skip) {
            self.walk
                .ancestors
                .push(Node::new(NodeKind::InlineFragment, inline.idx()));

            let directives = self.walk.operation.inline_fragments[inline].directives.clone();
            for directive in directives {
                self.walk_directive(directive, &skip_for);
                if self.walk.stop_requested() {
                    return;
                }
            }

            if let Some(set) = self.walk.operation.inline_fragments[inline].selection_set {
                // Without a type condition the fragment selects on the
                // enclosing type.
                let (condition_type, condition_name) =
                    match self.walk.operation.inline_fragments[inline].type_condition {
                        Some(condition) => {
                            let name = self.walk.operation.slice(condition).to_owned();
                            let node = self
                                .walk
                                .definition
                                .and_then(|d| d.index.first_non_extension_node_by_name(&name));
                            if self.walk.definition.is_some() && node.is_none() {
                                self.walk.stop_with_external_error(
                                    ExternalErrorKind::TypeUndefined(name),
                                );
                                return;
                            }
                            (node.unwrap_or(Node::INVALID), name)
                        }
                        None => (
                            self.walk.enclosing_type(),
                            self.walk.enclosing_type_name().unwrap_or_default().to_owned(),
                        ),
                    };
                self.walk.path.push(PathItem::InlineFragmentName(condition_name));
                self.walk.type_definitions.push(condition_type);
                self.walk_selection_set(set, &skip_for);
                self.walk.type_definitions.pop();
                self.walk.path.pop();
                if self.walk.stop_requested() {
                    return;
                }
            }

            self.walk.ancestors.pop();
        }

        dispatch!(
            self,
            skip_for,
            leave,
            InlineFragment,
            inline.idx(),
            leave_inline_fragment,
            inline
        );
    }

    fn walk_argument(&mut self, argument: Ref<Argument>, skip_for: &SkipVisitors) {
        let mut skip_for = skip_for.clone();
        dispatch!(
            self,
            skip_for,
            enter,
            Argument,
            argument.idx(),
            enter_argument,
            argument
        );
        dispatch!(
            self,
            skip_for,
            leave,
            Argument,
            argument.idx(),
            leave_argument,
            argument
        );
    }

    fn walk_directive(&mut self, directive: Ref<Directive>, skip_for: &SkipVisitors) {
        let mut skip_for = skip_for.clone();
        dispatch!(
            self,
            skip_for,
            enter,
            Directive,
            directive.idx(),
            enter_directive,
            directive
        );

        if !std::mem::take(&mut self.walk.skip) {
            self.walk
                .ancestors
                .push(Node::new(NodeKind::Directive, directive.idx()));
            let arguments = self.walk.operation.directives[directive].arguments.clone();
            for argument in arguments {
                self.walk_argument(argument, &skip_for);
                if self.walk.stop_requested() {
                    return;
                }
            }
            self.walk.ancestors.pop();
        }

        dispatch!(
            self,
            skip_for,
            leave,
            Directive,
            directive.idx(),
            leave_directive,
            directive
        );
    }
}
