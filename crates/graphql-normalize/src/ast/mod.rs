//! Arena representation of GraphQL documents.
//!
//! A [`Document`] owns one append-only arena per node kind. Nodes refer to
//! each other exclusively through typed integer references ([`Ref`]) into
//! the arenas of the *same* document, never through pointers. Arenas may
//! reallocate as they grow; references stay valid because they are indices.
//!
//! Mutation follows an append-mostly, mark-don't-free discipline: arena
//! slots are never freed or reused. "Deleting" a node means marking its
//! root-node entry [`NodeKind::Unknown`], shrinking a reference list, or
//! clearing an `Option` reference. Reference lists snapshotted before a
//! mutation therefore keep indexing live arena slots, which is what makes
//! in-place rewrites during traversal safe.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index, IndexMut};

pub(crate) mod from_cst;
pub mod index;
pub mod input;
pub mod selections;
pub mod serialize;
pub mod type_system;
pub mod types;
pub mod values;

pub use self::index::DocumentIndex;
pub use self::input::{ByteSpan, Input, JsonMap, JsonValue};
pub use self::serialize::Serialize;

/// A typed index into one of a document's arenas.
///
/// `Ref<Field>` can only index the field arena, and so on. References are
/// plain integers: copying one never clones a subtree, and holding one
/// across arena growth is always valid.
pub struct Ref<T> {
    idx: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
    pub fn new(idx: usize) -> Self {
        Self {
            idx,
            _marker: PhantomData,
        }
    }

    pub fn idx(self) -> usize {
        self.idx
    }
}

// Manual impls: `derive` would needlessly bound `T`.
impl<T> Copy for Ref<T> {}
impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx
    }
}
impl<T> Eq for Ref<T> {}
impl<T> std::hash::Hash for Ref<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.idx.hash(state)
    }
}
impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref({})", self.idx)
    }
}

/// An append-only arena of nodes of one kind.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    nodes: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn push(&mut self, node: T) -> Ref<T> {
        self.nodes.push(node);
        Ref::new(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ref<T>, &T)> {
        self.nodes.iter().enumerate().map(|(i, n)| (Ref::new(i), n))
    }

    pub fn refs(&self) -> impl Iterator<Item = Ref<T>> {
        (0..self.nodes.len()).map(Ref::new)
    }
}

impl<T> Index<Ref<T>> for Arena<T> {
    type Output = T;

    fn index(&self, r: Ref<T>) -> &T {
        &self.nodes[r.idx]
    }
}

impl<T> IndexMut<Ref<T>> for Arena<T> {
    fn index_mut(&mut self, r: Ref<T>) -> &mut T {
        &mut self.nodes[r.idx]
    }
}

/// Discriminates which arena a [`Node`] reference points into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Unknown,
    OperationDefinition,
    FragmentDefinition,
    SelectionSet,
    Field,
    FragmentSpread,
    InlineFragment,
    Argument,
    Directive,
    VariableDefinition,
    SchemaDefinition,
    SchemaExtension,
    ObjectTypeDefinition,
    ObjectTypeExtension,
    InterfaceTypeDefinition,
    InterfaceTypeExtension,
    UnionTypeDefinition,
    UnionTypeExtension,
    EnumTypeDefinition,
    EnumTypeExtension,
    ScalarTypeDefinition,
    ScalarTypeExtension,
    InputObjectTypeDefinition,
    InputObjectTypeExtension,
    DirectiveDefinition,
    FieldDefinition,
    InputValueDefinition,
    EnumValueDefinition,
    RootOperationTypeDefinition,
}

impl NodeKind {
    pub fn is_extension(self) -> bool {
        matches!(
            self,
            NodeKind::SchemaExtension
                | NodeKind::ObjectTypeExtension
                | NodeKind::InterfaceTypeExtension
                | NodeKind::UnionTypeExtension
                | NodeKind::EnumTypeExtension
                | NodeKind::ScalarTypeExtension
                | NodeKind::InputObjectTypeExtension
        )
    }
}

/// An untyped `(kind, index)` reference, used where a single value must be
/// able to point into any arena: root nodes, ancestors, the name index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    pub kind: NodeKind,
    pub index: usize,
}

impl Node {
    pub const INVALID: Node = Node {
        kind: NodeKind::Unknown,
        index: usize::MAX,
    };

    pub fn new(kind: NodeKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub fn is_extension(self) -> bool {
        self.kind.is_extension()
    }
}

/// `query`, `mutation` or `subscription`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    pub fn name(self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }

    /// The root type name used when a schema does not declare one explicitly.
    pub fn default_type_name(self) -> &'static str {
        match self {
            OperationType::Query => "Query",
            OperationType::Mutation => "Mutation",
            OperationType::Subscription => "Subscription",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    pub fn name(self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
            DirectiveLocation::Schema => "SCHEMA",
            DirectiveLocation::Scalar => "SCALAR",
            DirectiveLocation::Object => "OBJECT",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::Interface => "INTERFACE",
            DirectiveLocation::Union => "UNION",
            DirectiveLocation::Enum => "ENUM",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
            DirectiveLocation::InputObject => "INPUT_OBJECT",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }
}

// ---------------------------------------------------------------------------
// Executable nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<ByteSpan>,
    pub variable_definitions: Vec<Ref<VariableDefinition>>,
    pub directives: Vec<Ref<Directive>>,
    pub selection_set: Option<Ref<SelectionSet>>,
}

#[derive(Debug, Clone)]
pub struct FragmentDefinition {
    pub name: ByteSpan,
    pub type_condition: ByteSpan,
    pub directives: Vec<Ref<Directive>>,
    pub selection_set: Option<Ref<SelectionSet>>,
}

#[derive(Debug, Clone)]
pub struct VariableDefinition {
    pub variable_value: Ref<VariableValue>,
    pub ty: Ref<Type>,
    pub default_value: Option<Value>,
    pub directives: Vec<Ref<Directive>>,
}

/// A `$name` occurrence, either in a variable definition or a value position.
#[derive(Debug, Clone)]
pub struct VariableValue {
    pub name: ByteSpan,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    pub selection_refs: Vec<Ref<Selection>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    Field(Ref<Field>),
    FragmentSpread(Ref<FragmentSpread>),
    InlineFragment(Ref<InlineFragment>),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub alias: Option<ByteSpan>,
    pub name: ByteSpan,
    pub arguments: Vec<Ref<Argument>>,
    pub directives: Vec<Ref<Directive>>,
    pub selection_set: Option<Ref<SelectionSet>>,
}

#[derive(Debug, Clone)]
pub struct FragmentSpread {
    pub fragment_name: ByteSpan,
    pub directives: Vec<Ref<Directive>>,
}

#[derive(Debug, Clone)]
pub struct InlineFragment {
    pub type_condition: Option<ByteSpan>,
    pub directives: Vec<Ref<Directive>>,
    pub selection_set: Option<Ref<SelectionSet>>,
}

#[derive(Debug, Copy, Clone)]
pub struct Argument {
    pub name: ByteSpan,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct Directive {
    pub name: ByteSpan,
    pub arguments: Vec<Ref<Argument>>,
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// The tagged `(kind, ref)` union over input values.
///
/// Scalars that need storage point into a dedicated arena; `null` and
/// booleans are carried inline. A `Value` is `Copy`, so values travel
/// freely between arguments, defaults and object fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(Ref<IntValue>),
    Float(Ref<FloatValue>),
    String(Ref<StringValue>),
    Enum(Ref<EnumValue>),
    Variable(Ref<VariableValue>),
    List(Ref<ListValue>),
    Object(Ref<ObjectValue>),
}

/// Raw integer text, sign preserved as written.
#[derive(Debug, Clone)]
pub struct IntValue {
    pub raw: ByteSpan,
}

#[derive(Debug, Clone)]
pub struct FloatValue {
    pub raw: ByteSpan,
}

/// Stores the *decoded* string content; escaping is re-applied on print.
#[derive(Debug, Clone)]
pub struct StringValue {
    pub content: ByteSpan,
    pub block: bool,
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: ByteSpan,
}

#[derive(Debug, Clone, Default)]
pub struct ListValue {
    pub refs: Vec<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectValue {
    pub refs: Vec<Ref<ObjectField>>,
}

#[derive(Debug, Copy, Clone)]
pub struct ObjectField {
    pub name: ByteSpan,
    pub value: Value,
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Named,
    List,
    NonNull,
}

/// A recursive type reference: `Named`, `List(of_type)` or `NonNull(of_type)`.
///
/// `name` is only meaningful for `Named`; `of_type` only for the wrappers.
/// Equality between types is structural, see
/// [`Document::types_are_equal_deep`].
#[derive(Debug, Clone)]
pub struct Type {
    pub kind: TypeKind,
    pub name: ByteSpan,
    pub of_type: Option<Ref<Type>>,
}

// ---------------------------------------------------------------------------
// Type system nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ObjectTypeDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub implements_interfaces: Vec<ByteSpan>,
    pub directives: Vec<Ref<Directive>>,
    pub field_definitions: Vec<Ref<FieldDefinition>>,
}

#[derive(Debug, Clone)]
pub struct InterfaceTypeDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub implements_interfaces: Vec<ByteSpan>,
    pub directives: Vec<Ref<Directive>>,
    pub field_definitions: Vec<Ref<FieldDefinition>>,
}

#[derive(Debug, Clone)]
pub struct UnionTypeDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub directives: Vec<Ref<Directive>>,
    /// References to `Named` types in the type arena.
    pub member_types: Vec<Ref<Type>>,
}

#[derive(Debug, Clone)]
pub struct EnumTypeDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub directives: Vec<Ref<Directive>>,
    pub values: Vec<Ref<EnumValueDefinition>>,
}

#[derive(Debug, Clone)]
pub struct EnumValueDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub directives: Vec<Ref<Directive>>,
}

#[derive(Debug, Clone)]
pub struct ScalarTypeDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub directives: Vec<Ref<Directive>>,
}

#[derive(Debug, Clone)]
pub struct InputObjectTypeDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub directives: Vec<Ref<Directive>>,
    pub input_fields: Vec<Ref<InputValueDefinition>>,
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub arguments: Vec<Ref<InputValueDefinition>>,
    pub ty: Ref<Type>,
    pub directives: Vec<Ref<Directive>>,
}

#[derive(Debug, Clone)]
pub struct InputValueDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub ty: Ref<Type>,
    pub default_value: Option<Value>,
    pub directives: Vec<Ref<Directive>>,
}

#[derive(Debug, Clone)]
pub struct DirectiveDefinition {
    pub description: Option<ByteSpan>,
    pub name: ByteSpan,
    pub arguments: Vec<Ref<InputValueDefinition>>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
}

#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    pub directives: Vec<Ref<Directive>>,
    pub root_operation_type_definitions: Vec<Ref<RootOperationTypeDefinition>>,
}

#[derive(Debug, Clone)]
pub struct RootOperationTypeDefinition {
    pub operation_type: OperationType,
    pub named_type: ByteSpan,
}

macro_rules! extension_wrapper {
    ($(#[$doc:meta])* $name:ident wraps $inner:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(pub $inner);

        impl Deref for $name {
            type Target = $inner;
            fn deref(&self) -> &$inner {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut $inner {
                &mut self.0
            }
        }
    };
}

extension_wrapper!(
    /// `extend type` — same shape as the base definition.
    ObjectTypeExtension wraps ObjectTypeDefinition
);
extension_wrapper!(InterfaceTypeExtension wraps InterfaceTypeDefinition);
extension_wrapper!(UnionTypeExtension wraps UnionTypeDefinition);
extension_wrapper!(EnumTypeExtension wraps EnumTypeDefinition);
extension_wrapper!(ScalarTypeExtension wraps ScalarTypeDefinition);
extension_wrapper!(InputObjectTypeExtension wraps InputObjectTypeDefinition);
extension_wrapper!(SchemaExtension wraps SchemaDefinition);

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// One GraphQL document, either an operation or a schema, stored as a set
/// of parallel arenas plus an ordered root-node list.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub input: Input,

    /// Ordered top-level definitions. Entries are tombstoned with
    /// [`NodeKind::Unknown`] instead of being removed, so indices of other
    /// root nodes never shift.
    pub root_nodes: Vec<Node>,

    pub operation_definitions: Arena<OperationDefinition>,
    pub fragment_definitions: Arena<FragmentDefinition>,
    pub variable_definitions: Arena<VariableDefinition>,
    pub variable_values: Arena<VariableValue>,
    pub selection_sets: Arena<SelectionSet>,
    pub selections: Arena<Selection>,
    pub fields: Arena<Field>,
    pub fragment_spreads: Arena<FragmentSpread>,
    pub inline_fragments: Arena<InlineFragment>,
    pub arguments: Arena<Argument>,
    pub directives: Arena<Directive>,
    pub types: Arena<Type>,

    pub int_values: Arena<IntValue>,
    pub float_values: Arena<FloatValue>,
    pub string_values: Arena<StringValue>,
    pub enum_values: Arena<EnumValue>,
    pub list_values: Arena<ListValue>,
    pub object_values: Arena<ObjectValue>,
    pub object_fields: Arena<ObjectField>,

    pub object_type_definitions: Arena<ObjectTypeDefinition>,
    pub object_type_extensions: Arena<ObjectTypeExtension>,
    pub interface_type_definitions: Arena<InterfaceTypeDefinition>,
    pub interface_type_extensions: Arena<InterfaceTypeExtension>,
    pub union_type_definitions: Arena<UnionTypeDefinition>,
    pub union_type_extensions: Arena<UnionTypeExtension>,
    pub enum_type_definitions: Arena<EnumTypeDefinition>,
    pub enum_type_extensions: Arena<EnumTypeExtension>,
    pub scalar_type_definitions: Arena<ScalarTypeDefinition>,
    pub scalar_type_extensions: Arena<ScalarTypeExtension>,
    pub input_object_type_definitions: Arena<InputObjectTypeDefinition>,
    pub input_object_type_extensions: Arena<InputObjectTypeExtension>,
    pub enum_value_definitions: Arena<EnumValueDefinition>,
    pub field_definitions: Arena<FieldDefinition>,
    pub input_value_definitions: Arena<InputValueDefinition>,
    pub directive_definitions: Arena<DirectiveDefinition>,
    pub schema_definitions: Arena<SchemaDefinition>,
    pub schema_extensions: Arena<SchemaExtension>,
    pub root_operation_type_definitions: Arena<RootOperationTypeDefinition>,

    pub index: DocumentIndex,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a span against this document's input store.
    pub fn slice(&self, span: ByteSpan) -> &str {
        self.input.slice(span)
    }

    pub fn add_root_node(&mut self, node: Node) {
        self.root_nodes.push(node);
    }

    /// Tombstones a root node; all other root-node indices stay stable.
    pub fn remove_root_node(&mut self, root_index: usize) {
        self.root_nodes[root_index] = Node::new(NodeKind::Unknown, self.root_nodes[root_index].index);
    }

    /// Replaces a root-node entry in place.
    pub fn update_root_node(&mut self, root_index: usize, node: Node) {
        self.root_nodes[root_index] = node;
    }

    // -- names ------------------------------------------------------------

    pub fn operation_definition_name(&self, r: Ref<OperationDefinition>) -> Option<&str> {
        self.operation_definitions[r].name.map(|s| self.slice(s))
    }

    pub fn fragment_definition_name(&self, r: Ref<FragmentDefinition>) -> &str {
        self.slice(self.fragment_definitions[r].name)
    }

    pub fn fragment_definition_by_name(&self, name: &str) -> Option<Ref<FragmentDefinition>> {
        self.root_nodes.iter().find_map(|node| {
            if node.kind != NodeKind::FragmentDefinition {
                return None;
            }
            let r = Ref::<FragmentDefinition>::new(node.index);
            (self.fragment_definition_name(r) == name).then_some(r)
        })
    }

    pub fn field_name(&self, r: Ref<Field>) -> &str {
        self.slice(self.fields[r].name)
    }

    pub fn field_alias(&self, r: Ref<Field>) -> Option<&str> {
        self.fields[r].alias.map(|s| self.slice(s))
    }

    /// The response name of a field: its alias when present, its name otherwise.
    pub fn field_alias_or_name(&self, r: Ref<Field>) -> &str {
        match self.fields[r].alias {
            Some(alias) => self.slice(alias),
            None => self.field_name(r),
        }
    }

    pub fn fragment_spread_name(&self, r: Ref<FragmentSpread>) -> &str {
        self.slice(self.fragment_spreads[r].fragment_name)
    }

    pub fn inline_fragment_type_condition(&self, r: Ref<InlineFragment>) -> Option<&str> {
        self.inline_fragments[r].type_condition.map(|s| self.slice(s))
    }

    pub fn argument_name(&self, r: Ref<Argument>) -> &str {
        self.slice(self.arguments[r].name)
    }

    pub fn directive_name(&self, r: Ref<Directive>) -> &str {
        self.slice(self.directives[r].name)
    }

    pub fn variable_value_name(&self, r: Ref<VariableValue>) -> &str {
        self.slice(self.variable_values[r].name)
    }

    pub fn variable_definition_name(&self, r: Ref<VariableDefinition>) -> &str {
        self.variable_value_name(self.variable_definitions[r].variable_value)
    }

    pub fn field_definition_name(&self, r: Ref<FieldDefinition>) -> &str {
        self.slice(self.field_definitions[r].name)
    }

    pub fn input_value_definition_name(&self, r: Ref<InputValueDefinition>) -> &str {
        self.slice(self.input_value_definitions[r].name)
    }

    pub fn directive_definition_by_name(&self, name: &str) -> Option<Ref<DirectiveDefinition>> {
        self.directive_definitions
            .refs()
            .find(|&r| self.slice(self.directive_definitions[r].name) == name)
    }

    /// The name of an arbitrary node, resolved against the arena its kind
    /// selects. Returns `None` for kinds without a name (selection sets,
    /// schema definitions, …).
    pub fn node_name(&self, node: Node) -> Option<&str> {
        let span = match node.kind {
            NodeKind::ObjectTypeDefinition => self.object_type_definitions[Ref::new(node.index)].name,
            NodeKind::ObjectTypeExtension => self.object_type_extensions[Ref::new(node.index)].name,
            NodeKind::InterfaceTypeDefinition => {
                self.interface_type_definitions[Ref::new(node.index)].name
            }
            NodeKind::InterfaceTypeExtension => {
                self.interface_type_extensions[Ref::new(node.index)].name
            }
            NodeKind::UnionTypeDefinition => self.union_type_definitions[Ref::new(node.index)].name,
            NodeKind::UnionTypeExtension => self.union_type_extensions[Ref::new(node.index)].name,
            NodeKind::EnumTypeDefinition => self.enum_type_definitions[Ref::new(node.index)].name,
            NodeKind::EnumTypeExtension => self.enum_type_extensions[Ref::new(node.index)].name,
            NodeKind::ScalarTypeDefinition => self.scalar_type_definitions[Ref::new(node.index)].name,
            NodeKind::ScalarTypeExtension => self.scalar_type_extensions[Ref::new(node.index)].name,
            NodeKind::InputObjectTypeDefinition => {
                self.input_object_type_definitions[Ref::new(node.index)].name
            }
            NodeKind::InputObjectTypeExtension => {
                self.input_object_type_extensions[Ref::new(node.index)].name
            }
            NodeKind::DirectiveDefinition => self.directive_definitions[Ref::new(node.index)].name,
            NodeKind::Field => self.fields[Ref::new(node.index)].name,
            NodeKind::Directive => self.directives[Ref::new(node.index)].name,
            NodeKind::FragmentDefinition => self.fragment_definitions[Ref::new(node.index)].name,
            _ => return None,
        };
        Some(self.slice(span))
    }

    // -- directives on arbitrary nodes ------------------------------------

    pub fn node_directives(&self, node: Node) -> &[Ref<Directive>] {
        match node.kind {
            NodeKind::Field => &self.fields[Ref::new(node.index)].directives,
            NodeKind::FragmentSpread => &self.fragment_spreads[Ref::new(node.index)].directives,
            NodeKind::InlineFragment => &self.inline_fragments[Ref::new(node.index)].directives,
            NodeKind::OperationDefinition => {
                &self.operation_definitions[Ref::new(node.index)].directives
            }
            NodeKind::FragmentDefinition => {
                &self.fragment_definitions[Ref::new(node.index)].directives
            }
            NodeKind::VariableDefinition => {
                &self.variable_definitions[Ref::new(node.index)].directives
            }
            NodeKind::ObjectTypeDefinition => {
                &self.object_type_definitions[Ref::new(node.index)].directives
            }
            NodeKind::ObjectTypeExtension => {
                &self.object_type_extensions[Ref::new(node.index)].directives
            }
            NodeKind::InterfaceTypeDefinition => {
                &self.interface_type_definitions[Ref::new(node.index)].directives
            }
            NodeKind::InterfaceTypeExtension => {
                &self.interface_type_extensions[Ref::new(node.index)].directives
            }
            NodeKind::UnionTypeDefinition => {
                &self.union_type_definitions[Ref::new(node.index)].directives
            }
            NodeKind::UnionTypeExtension => {
                &self.union_type_extensions[Ref::new(node.index)].directives
            }
            NodeKind::EnumTypeDefinition => {
                &self.enum_type_definitions[Ref::new(node.index)].directives
            }
            NodeKind::EnumTypeExtension => &self.enum_type_extensions[Ref::new(node.index)].directives,
            NodeKind::ScalarTypeDefinition => {
                &self.scalar_type_definitions[Ref::new(node.index)].directives
            }
            NodeKind::ScalarTypeExtension => {
                &self.scalar_type_extensions[Ref::new(node.index)].directives
            }
            NodeKind::InputObjectTypeDefinition => {
                &self.input_object_type_definitions[Ref::new(node.index)].directives
            }
            NodeKind::InputObjectTypeExtension => {
                &self.input_object_type_extensions[Ref::new(node.index)].directives
            }
            NodeKind::SchemaDefinition => &self.schema_definitions[Ref::new(node.index)].directives,
            NodeKind::SchemaExtension => &self.schema_extensions[Ref::new(node.index)].directives,
            _ => &[],
        }
    }

    pub fn node_has_directive_by_name(&self, node: Node, directive_name: &str) -> bool {
        self.node_directives(node)
            .iter()
            .any(|&d| self.directive_name(d) == directive_name)
    }

    // -- misc helpers used across passes ----------------------------------

    pub fn add_variable_value(&mut self, name: &str) -> Ref<VariableValue> {
        let name = self.input.append(name);
        self.variable_values.push(VariableValue { name })
    }

    /// Generates a variable name not yet used by the given operation
    /// definition: `a`, `b`, …, `z`, `aa`, `bb`, ….
    pub fn generate_unused_variable_name(&self, operation: Ref<OperationDefinition>) -> String {
        for length in 1usize.. {
            for letter in 'a'..='z' {
                let candidate: String = std::iter::repeat(letter).take(length).collect();
                let taken = self.operation_definitions[operation]
                    .variable_definitions
                    .iter()
                    .any(|&vd| self.variable_definition_name(vd) == candidate);
                if !taken {
                    return candidate;
                }
            }
        }
        unreachable!()
    }

    pub fn variable_definition_by_name(
        &self,
        operation: Ref<OperationDefinition>,
        name: &str,
    ) -> Option<Ref<VariableDefinition>> {
        self.operation_definitions[operation]
            .variable_definitions
            .iter()
            .copied()
            .find(|&vd| self.variable_definition_name(vd) == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_node_tombstoning_keeps_indices_stable() {
        let mut doc = Document::new();
        doc.add_root_node(Node::new(NodeKind::OperationDefinition, 0));
        doc.add_root_node(Node::new(NodeKind::FragmentDefinition, 0));
        doc.add_root_node(Node::new(NodeKind::FragmentDefinition, 1));

        doc.remove_root_node(1);

        assert_eq!(doc.root_nodes[1].kind, NodeKind::Unknown);
        assert_eq!(doc.root_nodes[2], Node::new(NodeKind::FragmentDefinition, 1));
    }

    #[test]
    fn unused_variable_name_walks_the_alphabet() {
        let mut doc = Document::new();
        let op = doc.operation_definitions.push(OperationDefinition {
            operation_type: OperationType::Query,
            name: None,
            variable_definitions: Vec::new(),
            directives: Vec::new(),
            selection_set: None,
        });
        assert_eq!(doc.generate_unused_variable_name(op), "a");

        for taken in ["a", "b"] {
            let var = doc.add_variable_value(taken);
            let ty = doc.types.push(Type {
                kind: TypeKind::Named,
                name: doc.input.append("String"),
                of_type: None,
            });
            let vd = doc.variable_definitions.push(VariableDefinition {
                variable_value: var,
                ty,
                default_value: None,
                directives: Vec::new(),
            });
            doc.operation_definitions[op].variable_definitions.push(vd);
        }
        assert_eq!(doc.generate_unused_variable_name(op), "c");
    }
}
