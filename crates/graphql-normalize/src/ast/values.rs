//! Value comparison and the bridge between AST values and JSON.

use serde_json_bytes::ByteString;

use super::input::{JsonMap, JsonValue};
use super::{Argument, Directive, Document, Field, ObjectField, Ref, Value};

impl Document {
    /// Deep structural equality of two values in this document.
    pub fn values_are_equal(&self, left: Value, right: Value) -> bool {
        match (left, right) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::Int(l), Value::Int(r)) => {
                self.slice(self.int_values[l].raw) == self.slice(self.int_values[r].raw)
            }
            (Value::Float(l), Value::Float(r)) => {
                self.slice(self.float_values[l].raw) == self.slice(self.float_values[r].raw)
            }
            (Value::String(l), Value::String(r)) => {
                self.slice(self.string_values[l].content) == self.slice(self.string_values[r].content)
            }
            (Value::Enum(l), Value::Enum(r)) => {
                self.slice(self.enum_values[l].name) == self.slice(self.enum_values[r].name)
            }
            (Value::Variable(l), Value::Variable(r)) => {
                self.variable_value_name(l) == self.variable_value_name(r)
            }
            (Value::List(l), Value::List(r)) => {
                let (l, r) = (&self.list_values[l].refs, &self.list_values[r].refs);
                l.len() == r.len()
                    && l.iter()
                        .zip(r.iter())
                        .all(|(&lv, &rv)| self.values_are_equal(lv, rv))
            }
            (Value::Object(l), Value::Object(r)) => {
                let (l, r) = (&self.object_values[l].refs, &self.object_values[r].refs);
                l.len() == r.len()
                    && l.iter().all(|&lf| {
                        let name = self.slice(self.object_fields[lf].name);
                        r.iter().any(|&rf| {
                            self.slice(self.object_fields[rf].name) == name
                                && self.values_are_equal(
                                    self.object_fields[lf].value,
                                    self.object_fields[rf].value,
                                )
                        })
                    })
            }
            _ => false,
        }
    }

    /// Order-insensitive equality of two argument sets.
    pub fn arguments_are_equal(&self, left: &[Ref<Argument>], right: &[Ref<Argument>]) -> bool {
        left.len() == right.len()
            && left.iter().all(|&la| {
                let name = self.argument_name(la);
                right.iter().any(|&ra| {
                    self.argument_name(ra) == name
                        && self.values_are_equal(self.arguments[la].value, self.arguments[ra].value)
                })
            })
    }

    /// Order-insensitive equality of two directive sets.
    pub fn directive_sets_are_equal(
        &self,
        left: &[Ref<Directive>],
        right: &[Ref<Directive>],
    ) -> bool {
        left.len() == right.len()
            && left.iter().all(|&ld| {
                let name = self.directive_name(ld);
                right.iter().any(|&rd| {
                    self.directive_name(rd) == name
                        && self.arguments_are_equal(
                            &self.directives[ld].arguments,
                            &self.directives[rd].arguments,
                        )
                })
            })
    }

    /// Whether two fields resolve identically: same response name and field
    /// name, equal arguments, equal directives. Selection sets are not
    /// compared; merging recurses into them instead.
    pub fn fields_are_equal_flat(&self, left: Ref<Field>, right: Ref<Field>) -> bool {
        self.field_alias_or_name(left) == self.field_alias_or_name(right)
            && self.field_name(left) == self.field_name(right)
            && self.arguments_are_equal(&self.fields[left].arguments, &self.fields[right].arguments)
            && self.directive_sets_are_equal(
                &self.fields[left].directives,
                &self.fields[right].directives,
            )
    }

    pub fn argument_by_name(&self, arguments: &[Ref<Argument>], name: &str) -> Option<Ref<Argument>> {
        arguments
            .iter()
            .copied()
            .find(|&a| self.argument_name(a) == name)
    }

    /// Converts an AST value into JSON. Variables are resolved against the
    /// operation's variables object; an unset variable becomes `null`.
    pub fn value_to_json(&self, value: Value) -> JsonValue {
        match value {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(b),
            Value::Int(r) => {
                let raw = self.slice(self.int_values[r].raw);
                match raw.parse::<i64>() {
                    Ok(n) => JsonValue::from(n),
                    Err(_) => JsonValue::String(ByteString::from(raw.to_owned())),
                }
            }
            Value::Float(r) => {
                let raw = self.slice(self.float_values[r].raw);
                match raw.parse::<f64>() {
                    Ok(n) => JsonValue::from(n),
                    Err(_) => JsonValue::String(ByteString::from(raw.to_owned())),
                }
            }
            Value::String(r) => {
                JsonValue::String(ByteString::from(self.slice(self.string_values[r].content).to_owned()))
            }
            Value::Enum(r) => {
                JsonValue::String(ByteString::from(self.slice(self.enum_values[r].name).to_owned()))
            }
            Value::Variable(r) => {
                let name = self.variable_value_name(r);
                self.input.variable(name).cloned().unwrap_or(JsonValue::Null)
            }
            Value::List(r) => JsonValue::Array(
                self.list_values[r]
                    .refs
                    .iter()
                    .map(|&v| self.value_to_json(v))
                    .collect(),
            ),
            Value::Object(r) => {
                let mut map = JsonMap::new();
                for &field in &self.object_values[r].refs {
                    let ObjectField { name, value } = self.object_fields[field];
                    map.insert(
                        ByteString::from(self.slice(name).to_owned()),
                        self.value_to_json(value),
                    );
                }
                JsonValue::Object(map)
            }
        }
    }

    pub fn value_contains_variable(&self, value: Value) -> bool {
        match value {
            Value::Variable(_) => true,
            Value::List(r) => self.list_values[r]
                .refs
                .iter()
                .any(|&v| self.value_contains_variable(v)),
            Value::Object(r) => self.object_values[r]
                .refs
                .iter()
                .any(|&f| self.value_contains_variable(self.object_fields[f].value)),
            _ => false,
        }
    }

    /// Collects the names of all variables referenced inside a value.
    pub fn collect_value_variables(&self, value: Value, out: &mut Vec<String>) {
        match value {
            Value::Variable(r) => out.push(self.variable_value_name(r).to_owned()),
            Value::List(r) => {
                for &v in &self.list_values[r].refs {
                    self.collect_value_variables(v, out);
                }
            }
            Value::Object(r) => {
                for &field in &self.object_values[r].refs {
                    self.collect_value_variables(self.object_fields[field].value, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{IntValue, StringValue};
    use super::*;

    fn string_value(doc: &mut Document, text: &str) -> Value {
        let content = doc.input.append(text);
        Value::String(doc.string_values.push(StringValue {
            content,
            block: false,
        }))
    }

    #[test]
    fn string_values_compare_by_content() {
        let mut doc = Document::new();
        let a = string_value(&mut doc, "droid");
        let b = string_value(&mut doc, "droid");
        let c = string_value(&mut doc, "hero");
        assert!(doc.values_are_equal(a, b));
        assert!(!doc.values_are_equal(a, c));
    }

    #[test]
    fn int_value_to_json() {
        let mut doc = Document::new();
        let raw = doc.input.append("42");
        let v = Value::Int(doc.int_values.push(IntValue { raw }));
        assert_eq!(doc.value_to_json(v), JsonValue::from(42));
    }

    #[test]
    fn variable_value_resolves_against_input() {
        let mut doc = Document::new();
        doc.input
            .set_variable("episode", JsonValue::String(ByteString::from("JEDI")));
        let var = doc.add_variable_value("episode");
        assert_eq!(
            doc.value_to_json(Value::Variable(var)),
            JsonValue::String(ByteString::from("JEDI"))
        );
    }
}
