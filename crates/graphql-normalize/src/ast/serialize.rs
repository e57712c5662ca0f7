//! Serialization of arena documents back to GraphQL source text.

use std::fmt;

use super::{
    Document, Node, NodeKind, OperationType, Ref, Selection, SelectionSet, Value,
};

impl Document {
    /// Returns a builder for serializing this document, with two-space
    /// indentation by default.
    pub fn serialize(&self) -> Serialize<'_> {
        Serialize {
            doc: self,
            indent: Some("  "),
        }
    }
}

/// Display implementation for a document, configurable before formatting.
pub struct Serialize<'a> {
    doc: &'a Document,
    indent: Option<&'a str>,
}

impl<'a> Serialize<'a> {
    /// Serialize everything on a single line, with minimal whitespace.
    pub fn no_indent(mut self) -> Self {
        self.indent = None;
        self
    }
}

impl fmt::Display for Serialize<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut state = State {
            doc: self.doc,
            out: f,
            indent: self.indent,
            level: 0,
        };
        state.document()
    }
}

struct State<'doc, 'out, 'fmt> {
    doc: &'doc Document,
    out: &'out mut fmt::Formatter<'fmt>,
    indent: Option<&'doc str>,
    level: usize,
}

impl State<'_, '_, '_> {
    fn document(&mut self) -> fmt::Result {
        let live: Vec<Node> = self
            .doc
            .root_nodes
            .iter()
            .copied()
            .filter(|node| node.kind != NodeKind::Unknown)
            .collect();
        for (i, node) in live.iter().enumerate() {
            if i != 0 {
                match self.indent {
                    Some(_) => self.out.write_str("\n\n")?,
                    None => self.out.write_str(" ")?,
                }
            }
            self.definition(*node)?;
        }
        if self.indent.is_some() && !live.is_empty() {
            self.out.write_str("\n")?;
        }
        Ok(())
    }

    fn definition(&mut self, node: Node) -> fmt::Result {
        match node.kind {
            NodeKind::OperationDefinition => self.operation_definition(Ref::new(node.index)),
            NodeKind::FragmentDefinition => self.fragment_definition(Ref::new(node.index)),
            // Type-system definitions are not printed; normalization
            // emits executable documents only.
            _ => Ok(()),
        }
    }

    fn operation_definition(&mut self, r: Ref<super::OperationDefinition>) -> fmt::Result {
        let op = &self.doc.operation_definitions[r];
        let shorthand = op.operation_type == OperationType::Query
            && op.name.is_none()
            && op.variable_definitions.is_empty()
            && op.directives.is_empty();
        if !shorthand {
            self.out.write_str(op.operation_type.name())?;
            if let Some(name) = op.name {
                write!(self.out, " {}", self.doc.slice(name))?;
            }
            if !op.variable_definitions.is_empty() {
                self.out.write_str("(")?;
                for (i, &vd) in op.variable_definitions.iter().enumerate() {
                    if i != 0 {
                        self.out.write_str(", ")?;
                    }
                    self.variable_definition(vd)?;
                }
                self.out.write_str(")")?;
            }
            self.directives(&op.directives)?;
            self.out.write_str(" ")?;
        }
        match op.selection_set {
            Some(set) => self.selection_set(set),
            None => self.out.write_str("{}"),
        }
    }

    fn fragment_definition(&mut self, r: Ref<super::FragmentDefinition>) -> fmt::Result {
        let fragment = &self.doc.fragment_definitions[r];
        write!(
            self.out,
            "fragment {} on {}",
            self.doc.slice(fragment.name),
            self.doc.slice(fragment.type_condition),
        )?;
        self.directives(&fragment.directives)?;
        self.out.write_str(" ")?;
        match fragment.selection_set {
            Some(set) => self.selection_set(set),
            None => self.out.write_str("{}"),
        }
    }

    fn variable_definition(&mut self, r: Ref<super::VariableDefinition>) -> fmt::Result {
        let vd = &self.doc.variable_definitions[r];
        write!(
            self.out,
            "${}: {}",
            self.doc.variable_value_name(vd.variable_value),
            self.doc.type_to_string(vd.ty),
        )?;
        if let Some(default) = vd.default_value {
            self.out.write_str(" = ")?;
            self.value(default)?;
        }
        self.directives(&vd.directives)
    }

    fn selection_set(&mut self, set: Ref<SelectionSet>) -> fmt::Result {
        let refs = &self.doc.selection_sets[set].selection_refs;
        if refs.is_empty() {
            return self.out.write_str("{}");
        }
        self.out.write_str("{")?;
        self.level += 1;
        for (i, &selection) in refs.iter().enumerate() {
            match self.indent {
                Some(_) => self.newline_indent()?,
                None => {
                    if i != 0 {
                        self.out.write_str(" ")?;
                    }
                }
            }
            self.selection(self.doc.selections[selection])?;
        }
        self.level -= 1;
        if self.indent.is_some() {
            self.newline_indent()?;
        }
        self.out.write_str("}")
    }

    fn newline_indent(&mut self) -> fmt::Result {
        if let Some(indent) = self.indent {
            self.out.write_str("\n")?;
            for _ in 0..self.level {
                self.out.write_str(indent)?;
            }
        }
        Ok(())
    }

    fn selection(&mut self, selection: Selection) -> fmt::Result {
        match selection {
            Selection::Field(field) => self.field(field),
            Selection::FragmentSpread(spread) => {
                write!(self.out, "...{}", self.doc.fragment_spread_name(spread))?;
                self.directives(&self.doc.fragment_spreads[spread].directives)
            }
            Selection::InlineFragment(inline) => {
                self.out.write_str("...")?;
                if let Some(condition) = self.doc.inline_fragments[inline].type_condition {
                    write!(self.out, " on {}", self.doc.slice(condition))?;
                }
                self.directives(&self.doc.inline_fragments[inline].directives)?;
                self.out.write_str(" ")?;
                match self.doc.inline_fragments[inline].selection_set {
                    Some(set) => self.selection_set(set),
                    None => self.out.write_str("{}"),
                }
            }
        }
    }

    fn field(&mut self, r: Ref<super::Field>) -> fmt::Result {
        let field = &self.doc.fields[r];
        if let Some(alias) = field.alias {
            write!(self.out, "{}: ", self.doc.slice(alias))?;
        }
        self.out.write_str(self.doc.slice(field.name))?;
        self.arguments(&field.arguments)?;
        self.directives(&field.directives)?;
        if let Some(set) = field.selection_set {
            if !self.doc.selection_set_is_empty(set) {
                self.out.write_str(" ")?;
                self.selection_set(set)?;
            }
        }
        Ok(())
    }

    fn arguments(&mut self, arguments: &[Ref<super::Argument>]) -> fmt::Result {
        if arguments.is_empty() {
            return Ok(());
        }
        self.out.write_str("(")?;
        for (i, &argument) in arguments.iter().enumerate() {
            if i != 0 {
                self.out.write_str(", ")?;
            }
            write!(self.out, "{}: ", self.doc.argument_name(argument))?;
            self.value(self.doc.arguments[argument].value)?;
        }
        self.out.write_str(")")
    }

    fn directives(&mut self, directives: &[Ref<super::Directive>]) -> fmt::Result {
        for &directive in directives {
            write!(self.out, " @{}", self.doc.directive_name(directive))?;
            self.arguments(&self.doc.directives[directive].arguments)?;
        }
        Ok(())
    }

    fn value(&mut self, value: Value) -> fmt::Result {
        match value {
            Value::Null => self.out.write_str("null"),
            Value::Boolean(true) => self.out.write_str("true"),
            Value::Boolean(false) => self.out.write_str("false"),
            Value::Int(r) => self.out.write_str(self.doc.slice(self.doc.int_values[r].raw)),
            Value::Float(r) => self
                .out
                .write_str(self.doc.slice(self.doc.float_values[r].raw)),
            Value::Enum(r) => self.out.write_str(self.doc.slice(self.doc.enum_values[r].name)),
            Value::Variable(r) => write!(self.out, "${}", self.doc.variable_value_name(r)),
            Value::String(r) => {
                let string = &self.doc.string_values[r];
                let content = self.doc.slice(string.content);
                if string.block {
                    write!(self.out, "\"\"\"{content}\"\"\"")
                } else {
                    self.out.write_str("\"")?;
                    for c in content.chars() {
                        match c {
                            '"' => self.out.write_str("\\\"")?,
                            '\\' => self.out.write_str("\\\\")?,
                            '\n' => self.out.write_str("\\n")?,
                            '\r' => self.out.write_str("\\r")?,
                            '\t' => self.out.write_str("\\t")?,
                            _ => write!(self.out, "{c}")?,
                        }
                    }
                    self.out.write_str("\"")
                }
            }
            Value::List(r) => {
                self.out.write_str("[")?;
                let items = &self.doc.list_values[r].refs;
                for (i, &item) in items.iter().enumerate() {
                    if i != 0 {
                        self.out.write_str(", ")?;
                    }
                    self.value(item)?;
                }
                self.out.write_str("]")
            }
            Value::Object(r) => {
                self.out.write_str("{")?;
                let fields = &self.doc.object_values[r].refs;
                for (i, &field) in fields.iter().enumerate() {
                    if i != 0 {
                        self.out.write_str(", ")?;
                    }
                    let object_field = self.doc.object_fields[field];
                    write!(self.out, "{}: ", self.doc.slice(object_field.name))?;
                    self.value(object_field.value)?;
                }
                self.out.write_str("}")
            }
        }
    }
}
