//! Backing storage for a document's raw text and its JSON variables.
//!
//! All names and scalar literals in the AST are [`ByteSpan`]s into a single
//! append-only string store. The store starts out holding the original
//! source text; rewrite passes that synthesize new names or literals append
//! them at the end, so existing spans are never displaced.

use serde_json_bytes::ByteString;

/// A JSON value, used for operation variables.
pub type JsonValue = serde_json_bytes::Value;
/// A JSON object, with insertion order preserved.
pub type JsonMap = serde_json_bytes::Map<ByteString, JsonValue>;

/// A `(start, len)` slice of a document's input store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ByteSpan {
    pub start: usize,
    pub len: usize,
}

impl ByteSpan {
    pub const EMPTY: ByteSpan = ByteSpan { start: 0, len: 0 };

    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// The raw text a document was parsed from, plus appended synthetic text,
/// plus the operation's JSON variables.
#[derive(Debug, Clone)]
pub struct Input {
    store: String,
    /// Variables sent alongside the operation. Always a JSON object;
    /// rewrite passes add, rewrite and delete keys here.
    pub variables: JsonValue,
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    pub fn new() -> Self {
        Self {
            store: String::new(),
            variables: JsonValue::Object(JsonMap::new()),
        }
    }

    /// Appends text to the store and returns the span covering it. An
    /// existing occurrence is never reused; spans stay independent.
    pub fn append(&mut self, text: &str) -> ByteSpan {
        let start = self.store.len();
        self.store.push_str(text);
        ByteSpan::new(start, text.len())
    }

    pub fn slice(&self, span: ByteSpan) -> &str {
        &self.store[span.start..span.start + span.len]
    }

    pub fn variables_object(&self) -> Option<&JsonMap> {
        self.variables.as_object()
    }

    pub fn variables_object_mut(&mut self) -> Option<&mut JsonMap> {
        self.variables.as_object_mut()
    }

    pub fn variable(&self, name: &str) -> Option<&JsonValue> {
        self.variables.as_object()?.get(name)
    }

    pub fn set_variable(&mut self, name: &str, value: JsonValue) {
        if let JsonValue::Object(map) = &mut self.variables {
            map.insert(ByteString::from(name.to_owned()), value);
        }
    }

    /// Removes a variable. The map is rebuilt so the remaining keys keep
    /// their relative order.
    pub fn delete_variable(&mut self, name: &str) {
        if let JsonValue::Object(map) = &mut self.variables {
            let retained: JsonMap = std::mem::take(map)
                .into_iter()
                .filter(|(key, _)| key.as_str() != name)
                .collect();
            *map = retained;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_extends_the_store_without_moving_spans() {
        let mut input = Input::new();
        let a = input.append("hero");
        let b = input.append("hero");
        assert_ne!(a, b);
        assert_eq!(input.slice(a), "hero");
        assert_eq!(input.slice(b), "hero");
    }

    #[test]
    fn delete_variable_keeps_remaining_order() {
        let mut input = Input::new();
        input.set_variable("a", JsonValue::from(1));
        input.set_variable("b", JsonValue::from(2));
        input.set_variable("c", JsonValue::from(3));
        input.delete_variable("b");

        let keys: Vec<&str> = input
            .variables_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys, ["a", "c"]);
    }
}
