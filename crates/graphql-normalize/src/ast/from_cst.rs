//! Lowering from the `apollo-parser` CST into the arena document.

use apollo_parser::cst;
use apollo_parser::cst::CstNode;
use apollo_parser::S;

use super::{ByteSpan, Document, Node, NodeKind, Ref, Selection, Value};
use super::{
    Argument, Directive, DirectiveDefinition, DirectiveLocation, EnumTypeDefinition,
    EnumTypeExtension, EnumValue, EnumValueDefinition, Field, FieldDefinition, FloatValue,
    FragmentDefinition, FragmentSpread, InlineFragment, InputObjectTypeDefinition,
    InputObjectTypeExtension, InputValueDefinition, IntValue, InterfaceTypeDefinition,
    InterfaceTypeExtension, ListValue, ObjectField, ObjectTypeDefinition, ObjectTypeExtension,
    ObjectValue, OperationDefinition, OperationType, RootOperationTypeDefinition,
    ScalarTypeDefinition, ScalarTypeExtension, SchemaDefinition, SchemaExtension, SelectionSet,
    StringValue, Type, TypeKind, UnionTypeDefinition, UnionTypeExtension, VariableDefinition,
    VariableValue,
};

impl Document {
    pub(crate) fn lower_cst(&mut self, document: cst::Document) {
        for definition in document.definitions() {
            // A definition that fails to convert has a corresponding entry
            // in the syntax tree's error list; skip it here.
            if let Some(node) = definition.convert(self) {
                self.add_root_node(node);
            }
        }
    }
}

/// Similar to `TryFrom`, with an `Option` return type because a partially
/// parsed CST reports `None` all over its accessors.
trait Convert {
    type Target;
    fn convert(&self, doc: &mut Document) -> Option<Self::Target>;
}

fn collect<CstType, AstType>(
    doc: &mut Document,
    iter: impl IntoIterator<Item = CstType>,
) -> Vec<AstType>
where
    CstType: Convert<Target = AstType>,
{
    iter.into_iter()
        .filter_map(|value| value.convert(doc))
        .collect()
}

fn collect_opt<CstType1, CstType2, AstType, F, I>(
    doc: &mut Document,
    opt: Option<CstType1>,
    inner: F,
) -> Vec<AstType>
where
    F: FnOnce(CstType1) -> I,
    I: IntoIterator<Item = CstType2>,
    CstType2: Convert<Target = AstType>,
{
    if let Some(cst) = opt {
        collect(doc, inner(cst))
    } else {
        Vec::new()
    }
}

impl<T: Convert> Convert for Option<T> {
    type Target = Option<T::Target>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        Some(if let Some(inner) = self {
            Some(inner.convert(doc)?)
        } else {
            None
        })
    }
}

impl Convert for cst::Definition {
    type Target = Node;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        use cst::Definition as C;
        macro_rules! node {
            ($def:ident, $kind:ident) => {
                Node::new(NodeKind::$kind, $def.convert(doc)?.idx())
            };
        }
        Some(match self {
            C::OperationDefinition(def) => node!(def, OperationDefinition),
            C::FragmentDefinition(def) => node!(def, FragmentDefinition),
            C::DirectiveDefinition(def) => node!(def, DirectiveDefinition),
            C::SchemaDefinition(def) => node!(def, SchemaDefinition),
            C::ScalarTypeDefinition(def) => node!(def, ScalarTypeDefinition),
            C::ObjectTypeDefinition(def) => node!(def, ObjectTypeDefinition),
            C::InterfaceTypeDefinition(def) => node!(def, InterfaceTypeDefinition),
            C::UnionTypeDefinition(def) => node!(def, UnionTypeDefinition),
            C::EnumTypeDefinition(def) => node!(def, EnumTypeDefinition),
            C::InputObjectTypeDefinition(def) => node!(def, InputObjectTypeDefinition),
            C::SchemaExtension(def) => node!(def, SchemaExtension),
            C::ScalarTypeExtension(def) => node!(def, ScalarTypeExtension),
            C::ObjectTypeExtension(def) => node!(def, ObjectTypeExtension),
            C::InterfaceTypeExtension(def) => node!(def, InterfaceTypeExtension),
            C::UnionTypeExtension(def) => node!(def, UnionTypeExtension),
            C::EnumTypeExtension(def) => node!(def, EnumTypeExtension),
            C::InputObjectTypeExtension(def) => node!(def, InputObjectTypeExtension),
        })
    }
}

impl Convert for cst::Name {
    type Target = ByteSpan;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        Some(doc.input.append(self.text().as_str()))
    }
}

impl Convert for cst::Alias {
    type Target = ByteSpan;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        self.name()?.convert(doc)
    }
}

impl Convert for cst::Description {
    type Target = ByteSpan;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let text = String::from(self.string_value()?);
        Some(doc.input.append(&text))
    }
}

impl Convert for cst::TypeCondition {
    type Target = ByteSpan;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        self.named_type()?.name()?.convert(doc)
    }
}

impl Convert for cst::OperationType {
    type Target = OperationType;

    fn convert(&self, _doc: &mut Document) -> Option<Self::Target> {
        let token = self.syntax().first_token()?;
        match token.kind() {
            S![query] => Some(OperationType::Query),
            S![mutation] => Some(OperationType::Mutation),
            S![subscription] => Some(OperationType::Subscription),
            _ => None,
        }
    }
}

impl Convert for cst::OperationDefinition {
    type Target = Ref<OperationDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let operation_type = if let Some(ty) = self.operation_type() {
            ty.convert(doc)?
        } else {
            OperationType::Query
        };
        let name = self.name().convert(doc)?;
        let variable_definitions = collect_opt(doc, self.variable_definitions(), |x| {
            x.variable_definitions()
        });
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let selection_set = self.selection_set()?.convert(doc)?;
        Some(doc.operation_definitions.push(OperationDefinition {
            operation_type,
            name,
            variable_definitions,
            directives,
            selection_set: Some(selection_set),
        }))
    }
}

impl Convert for cst::FragmentDefinition {
    type Target = Ref<FragmentDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.fragment_name()?.name()?.convert(doc)?;
        let type_condition = self.type_condition()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let selection_set = self.selection_set()?.convert(doc)?;
        Some(doc.fragment_definitions.push(FragmentDefinition {
            name,
            type_condition,
            directives,
            selection_set: Some(selection_set),
        }))
    }
}

impl Convert for cst::VariableDefinition {
    type Target = Ref<VariableDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.variable()?.name()?.convert(doc)?;
        let variable_value = doc.variable_values.push(VariableValue { name });
        let ty = self.ty()?.convert(doc)?;
        let default_value = if let Some(default) = self.default_value() {
            Some(default.value()?.convert(doc)?)
        } else {
            None
        };
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        Some(doc.variable_definitions.push(VariableDefinition {
            variable_value,
            ty,
            default_value,
            directives,
        }))
    }
}

impl Convert for cst::Type {
    type Target = Ref<Type>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        use cst::Type as C;
        match self {
            C::NamedType(name) => {
                let name = name.name()?.convert(doc)?;
                Some(doc.types.push(Type {
                    kind: TypeKind::Named,
                    name,
                    of_type: None,
                }))
            }
            C::ListType(inner) => {
                let of_type = inner.ty()?.convert(doc)?;
                Some(doc.add_list_type(of_type))
            }
            C::NonNullType(inner) => {
                let of_type = if let Some(named) = inner.named_type() {
                    let name = named.name()?.convert(doc)?;
                    doc.types.push(Type {
                        kind: TypeKind::Named,
                        name,
                        of_type: None,
                    })
                } else if let Some(list) = inner.list_type() {
                    let of_type = list.ty()?.convert(doc)?;
                    doc.add_list_type(of_type)
                } else {
                    return None;
                };
                Some(doc.add_non_null_type(of_type))
            }
        }
    }
}

impl Convert for cst::SelectionSet {
    type Target = Ref<SelectionSet>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let set = doc.add_selection_set();
        for selection in self.selections() {
            if let Some(selection) = selection.convert(doc) {
                doc.add_selection(set, selection);
            }
        }
        Some(set)
    }
}

impl Convert for cst::Selection {
    type Target = Selection;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        use cst::Selection as C;
        Some(match self {
            C::Field(x) => Selection::Field(x.convert(doc)?),
            C::FragmentSpread(x) => Selection::FragmentSpread(x.convert(doc)?),
            C::InlineFragment(x) => Selection::InlineFragment(x.convert(doc)?),
        })
    }
}

impl Convert for cst::Field {
    type Target = Ref<Field>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let alias = self.alias().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let arguments = collect_opt(doc, self.arguments(), |x| x.arguments());
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let selection_set = self.selection_set().convert(doc)?;
        Some(doc.fields.push(Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        }))
    }
}

impl Convert for cst::FragmentSpread {
    type Target = Ref<FragmentSpread>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let fragment_name = self.fragment_name()?.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        Some(doc.fragment_spreads.push(FragmentSpread {
            fragment_name,
            directives,
        }))
    }
}

impl Convert for cst::InlineFragment {
    type Target = Ref<InlineFragment>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let type_condition = self.type_condition().convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let selection_set = self.selection_set()?.convert(doc)?;
        Some(doc.inline_fragments.push(InlineFragment {
            type_condition,
            directives,
            selection_set: Some(selection_set),
        }))
    }
}

impl Convert for cst::Directive {
    type Target = Ref<Directive>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.name()?.convert(doc)?;
        let arguments = collect_opt(doc, self.arguments(), |x| x.arguments());
        Some(doc.directives.push(Directive { name, arguments }))
    }
}

impl Convert for cst::Argument {
    type Target = Ref<Argument>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.name()?.convert(doc)?;
        let value = self.value()?.convert(doc)?;
        Some(doc.arguments.push(Argument { name, value }))
    }
}

impl Convert for cst::Value {
    type Target = Value;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        use cst::Value as C;
        Some(match self {
            C::Variable(v) => {
                let name = v.name()?.convert(doc)?;
                Value::Variable(doc.variable_values.push(VariableValue { name }))
            }
            C::StringValue(v) => {
                let token = v.syntax().first_token()?;
                let block = token.text().starts_with("\"\"\"");
                let content = String::from(v);
                let content = doc.input.append(&content);
                Value::String(doc.string_values.push(StringValue { content, block }))
            }
            C::FloatValue(v) => {
                let raw = doc.input.append(v.syntax().first_token()?.text());
                Value::Float(doc.float_values.push(FloatValue { raw }))
            }
            C::IntValue(v) => {
                let raw = doc.input.append(v.syntax().first_token()?.text());
                Value::Int(doc.int_values.push(IntValue { raw }))
            }
            C::BooleanValue(v) => Value::Boolean(bool::try_from(v).ok()?),
            C::NullValue(_) => Value::Null,
            C::EnumValue(v) => {
                let name = v.name()?.convert(doc)?;
                Value::Enum(doc.enum_values.push(EnumValue { name }))
            }
            C::ListValue(v) => {
                let refs = collect(doc, v.values());
                Value::List(doc.list_values.push(ListValue { refs }))
            }
            C::ObjectValue(v) => {
                let refs = collect(doc, v.object_fields());
                Value::Object(doc.object_values.push(ObjectValue { refs }))
            }
        })
    }
}

impl Convert for cst::ObjectField {
    type Target = Ref<ObjectField>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.name()?.convert(doc)?;
        let value = self.value()?.convert(doc)?;
        Some(doc.object_fields.push(ObjectField { name, value }))
    }
}

// -- type system -----------------------------------------------------------

impl Convert for cst::SchemaDefinition {
    type Target = Ref<SchemaDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let root_operation_type_definitions =
            collect(doc, self.root_operation_type_definitions());
        Some(doc.schema_definitions.push(SchemaDefinition {
            directives,
            root_operation_type_definitions,
        }))
    }
}

impl Convert for cst::SchemaExtension {
    type Target = Ref<SchemaExtension>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let root_operation_type_definitions =
            collect(doc, self.root_operation_type_definitions());
        Some(doc.schema_extensions.push(SchemaExtension(SchemaDefinition {
            directives,
            root_operation_type_definitions,
        })))
    }
}

impl Convert for cst::RootOperationTypeDefinition {
    type Target = Ref<RootOperationTypeDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let operation_type = self.operation_type()?.convert(doc)?;
        let named_type = self.named_type()?.name()?.convert(doc)?;
        Some(doc
            .root_operation_type_definitions
            .push(RootOperationTypeDefinition {
                operation_type,
                named_type,
            }))
    }
}

impl Convert for Option<cst::ImplementsInterfaces> {
    type Target = Vec<ByteSpan>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        Some(if let Some(inner) = self {
            inner
                .named_types()
                .filter_map(|n| n.name()?.convert(doc))
                .collect()
        } else {
            Vec::new()
        })
    }
}

impl Convert for cst::ObjectTypeDefinition {
    type Target = Ref<ObjectTypeDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let implements_interfaces = self.implements_interfaces().convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let field_definitions =
            collect_opt(doc, self.fields_definition(), |x| x.field_definitions());
        Some(doc.object_type_definitions.push(ObjectTypeDefinition {
            description,
            name,
            implements_interfaces,
            directives,
            field_definitions,
        }))
    }
}

impl Convert for cst::ObjectTypeExtension {
    type Target = Ref<ObjectTypeExtension>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.name()?.convert(doc)?;
        let implements_interfaces = self.implements_interfaces().convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let field_definitions =
            collect_opt(doc, self.fields_definition(), |x| x.field_definitions());
        Some(doc
            .object_type_extensions
            .push(ObjectTypeExtension(ObjectTypeDefinition {
                description: None,
                name,
                implements_interfaces,
                directives,
                field_definitions,
            })))
    }
}

impl Convert for cst::InterfaceTypeDefinition {
    type Target = Ref<InterfaceTypeDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let implements_interfaces = self.implements_interfaces().convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let field_definitions =
            collect_opt(doc, self.fields_definition(), |x| x.field_definitions());
        Some(doc.interface_type_definitions.push(InterfaceTypeDefinition {
            description,
            name,
            implements_interfaces,
            directives,
            field_definitions,
        }))
    }
}

impl Convert for cst::InterfaceTypeExtension {
    type Target = Ref<InterfaceTypeExtension>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.name()?.convert(doc)?;
        let implements_interfaces = self.implements_interfaces().convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let field_definitions =
            collect_opt(doc, self.fields_definition(), |x| x.field_definitions());
        Some(doc
            .interface_type_extensions
            .push(InterfaceTypeExtension(InterfaceTypeDefinition {
                description: None,
                name,
                implements_interfaces,
                directives,
                field_definitions,
            })))
    }
}

impl Convert for cst::UnionTypeDefinition {
    type Target = Ref<UnionTypeDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let member_types = convert_union_members(self.union_member_types(), doc);
        Some(doc.union_type_definitions.push(UnionTypeDefinition {
            description,
            name,
            directives,
            member_types,
        }))
    }
}

impl Convert for cst::UnionTypeExtension {
    type Target = Ref<UnionTypeExtension>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let member_types = convert_union_members(self.union_member_types(), doc);
        Some(doc
            .union_type_extensions
            .push(UnionTypeExtension(UnionTypeDefinition {
                description: None,
                name,
                directives,
                member_types,
            })))
    }
}

fn convert_union_members(
    members: Option<cst::UnionMemberTypes>,
    doc: &mut Document,
) -> Vec<Ref<Type>> {
    let Some(members) = members else {
        return Vec::new();
    };
    members
        .named_types()
        .filter_map(|n| {
            let name = n.name()?.convert(doc)?;
            Some(doc.types.push(Type {
                kind: TypeKind::Named,
                name,
                of_type: None,
            }))
        })
        .collect()
}

impl Convert for cst::EnumTypeDefinition {
    type Target = Ref<EnumTypeDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let values = collect_opt(doc, self.enum_values_definition(), |x| {
            x.enum_value_definitions()
        });
        Some(doc.enum_type_definitions.push(EnumTypeDefinition {
            description,
            name,
            directives,
            values,
        }))
    }
}

impl Convert for cst::EnumTypeExtension {
    type Target = Ref<EnumTypeExtension>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let values = collect_opt(doc, self.enum_values_definition(), |x| {
            x.enum_value_definitions()
        });
        Some(doc
            .enum_type_extensions
            .push(EnumTypeExtension(EnumTypeDefinition {
                description: None,
                name,
                directives,
                values,
            })))
    }
}

impl Convert for cst::EnumValueDefinition {
    type Target = Ref<EnumValueDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.enum_value()?.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        Some(doc.enum_value_definitions.push(EnumValueDefinition {
            description,
            name,
            directives,
        }))
    }
}

impl Convert for cst::ScalarTypeDefinition {
    type Target = Ref<ScalarTypeDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        Some(doc.scalar_type_definitions.push(ScalarTypeDefinition {
            description,
            name,
            directives,
        }))
    }
}

impl Convert for cst::ScalarTypeExtension {
    type Target = Ref<ScalarTypeExtension>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        Some(doc
            .scalar_type_extensions
            .push(ScalarTypeExtension(ScalarTypeDefinition {
                description: None,
                name,
                directives,
            })))
    }
}

impl Convert for cst::InputObjectTypeDefinition {
    type Target = Ref<InputObjectTypeDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let input_fields = collect_opt(doc, self.input_fields_definition(), |x| {
            x.input_value_definitions()
        });
        Some(doc
            .input_object_type_definitions
            .push(InputObjectTypeDefinition {
                description,
                name,
                directives,
                input_fields,
            }))
    }
}

impl Convert for cst::InputObjectTypeExtension {
    type Target = Ref<InputObjectTypeExtension>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let name = self.name()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        let input_fields = collect_opt(doc, self.input_fields_definition(), |x| {
            x.input_value_definitions()
        });
        Some(doc
            .input_object_type_extensions
            .push(InputObjectTypeExtension(InputObjectTypeDefinition {
                description: None,
                name,
                directives,
                input_fields,
            })))
    }
}

impl Convert for cst::FieldDefinition {
    type Target = Ref<FieldDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let arguments = collect_opt(doc, self.arguments_definition(), |x| {
            x.input_value_definitions()
        });
        let ty = self.ty()?.convert(doc)?;
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        Some(doc.field_definitions.push(FieldDefinition {
            description,
            name,
            arguments,
            ty,
            directives,
        }))
    }
}

impl Convert for cst::InputValueDefinition {
    type Target = Ref<InputValueDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let ty = self.ty()?.convert(doc)?;
        let default_value = if let Some(default) = self.default_value() {
            Some(default.value()?.convert(doc)?)
        } else {
            None
        };
        let directives = collect_opt(doc, self.directives(), |x| x.directives());
        Some(doc.input_value_definitions.push(InputValueDefinition {
            description,
            name,
            ty,
            default_value,
            directives,
        }))
    }
}

impl Convert for cst::DirectiveDefinition {
    type Target = Ref<DirectiveDefinition>;

    fn convert(&self, doc: &mut Document) -> Option<Self::Target> {
        let description = self.description().convert(doc)?;
        let name = self.name()?.convert(doc)?;
        let arguments = collect_opt(doc, self.arguments_definition(), |x| {
            x.input_value_definitions()
        });
        let repeatable = self.repeatable_token().is_some();
        let locations = self
            .directive_locations()
            .map(|x| {
                x.directive_locations()
                    .filter_map(|location| location.convert(doc))
                    .collect()
            })
            .unwrap_or_default();
        Some(doc.directive_definitions.push(DirectiveDefinition {
            description,
            name,
            arguments,
            repeatable,
            locations,
        }))
    }
}

impl Convert for cst::DirectiveLocation {
    type Target = DirectiveLocation;

    fn convert(&self, _doc: &mut Document) -> Option<Self::Target> {
        let token = self.syntax().first_token()?;
        match token.kind() {
            S![QUERY] => Some(DirectiveLocation::Query),
            S![MUTATION] => Some(DirectiveLocation::Mutation),
            S![SUBSCRIPTION] => Some(DirectiveLocation::Subscription),
            S![FIELD] => Some(DirectiveLocation::Field),
            S![FRAGMENT_DEFINITION] => Some(DirectiveLocation::FragmentDefinition),
            S![FRAGMENT_SPREAD] => Some(DirectiveLocation::FragmentSpread),
            S![INLINE_FRAGMENT] => Some(DirectiveLocation::InlineFragment),
            S![VARIABLE_DEFINITION] => Some(DirectiveLocation::VariableDefinition),
            S![SCHEMA] => Some(DirectiveLocation::Schema),
            S![SCALAR] => Some(DirectiveLocation::Scalar),
            S![OBJECT] => Some(DirectiveLocation::Object),
            S![FIELD_DEFINITION] => Some(DirectiveLocation::FieldDefinition),
            S![ARGUMENT_DEFINITION] => Some(DirectiveLocation::ArgumentDefinition),
            S![INTERFACE] => Some(DirectiveLocation::Interface),
            S![UNION] => Some(DirectiveLocation::Union),
            S![ENUM] => Some(DirectiveLocation::Enum),
            S![ENUM_VALUE] => Some(DirectiveLocation::EnumValue),
            S![INPUT_OBJECT] => Some(DirectiveLocation::InputObject),
            S![INPUT_FIELD_DEFINITION] => Some(DirectiveLocation::InputFieldDefinition),
            _ => None,
        }
    }
}
