//! Helpers for working with type references.

use super::{Document, Ref, Type, TypeKind};

impl Document {
    pub fn add_named_type(&mut self, name: &str) -> Ref<Type> {
        let name = self.input.append(name);
        self.types.push(Type {
            kind: TypeKind::Named,
            name,
            of_type: None,
        })
    }

    pub fn add_list_type(&mut self, of_type: Ref<Type>) -> Ref<Type> {
        self.types.push(Type {
            kind: TypeKind::List,
            name: super::ByteSpan::EMPTY,
            of_type: Some(of_type),
        })
    }

    pub fn add_non_null_type(&mut self, of_type: Ref<Type>) -> Ref<Type> {
        self.types.push(Type {
            kind: TypeKind::NonNull,
            name: super::ByteSpan::EMPTY,
            of_type: Some(of_type),
        })
    }

    /// The name of the named type at the bottom of a wrapper chain.
    pub fn type_name(&self, mut r: Ref<Type>) -> &str {
        loop {
            let ty = &self.types[r];
            match ty.kind {
                TypeKind::Named => return self.slice(ty.name),
                TypeKind::List | TypeKind::NonNull => match ty.of_type {
                    Some(inner) => r = inner,
                    None => return "",
                },
            }
        }
    }

    pub fn type_is_non_null(&self, r: Ref<Type>) -> bool {
        self.types[r].kind == TypeKind::NonNull
    }

    /// Whether the type is a list after unwrapping an outer non-null.
    pub fn type_is_list(&self, r: Ref<Type>) -> bool {
        match self.types[r].kind {
            TypeKind::List => true,
            TypeKind::NonNull => self.types[r]
                .of_type
                .map(|inner| self.types[inner].kind == TypeKind::List)
                .unwrap_or(false),
            TypeKind::Named => false,
        }
    }

    /// Strips one outer non-null wrapper, if present.
    pub fn type_skip_non_null(&self, r: Ref<Type>) -> Ref<Type> {
        match self.types[r] {
            Type {
                kind: TypeKind::NonNull,
                of_type: Some(inner),
                ..
            } => inner,
            _ => r,
        }
    }

    /// Structural equality: same wrapper chain, same named type.
    pub fn types_are_equal_deep(&self, left: Ref<Type>, right: Ref<Type>) -> bool {
        let (l, r) = (&self.types[left], &self.types[right]);
        if l.kind != r.kind {
            return false;
        }
        match l.kind {
            TypeKind::Named => self.slice(l.name) == self.slice(r.name),
            TypeKind::List | TypeKind::NonNull => match (l.of_type, r.of_type) {
                (Some(li), Some(ri)) => self.types_are_equal_deep(li, ri),
                (None, None) => true,
                _ => false,
            },
        }
    }

    /// Structural equality across two documents, used when an operation
    /// type must be compared against a schema type.
    pub fn types_are_equal_deep_with(
        &self,
        left: Ref<Type>,
        other: &Document,
        right: Ref<Type>,
    ) -> bool {
        let (l, r) = (&self.types[left], &other.types[right]);
        if l.kind != r.kind {
            return false;
        }
        match l.kind {
            TypeKind::Named => self.slice(l.name) == other.slice(r.name),
            TypeKind::List | TypeKind::NonNull => match (l.of_type, r.of_type) {
                (Some(li), Some(ri)) => self.types_are_equal_deep_with(li, other, ri),
                (None, None) => true,
                _ => false,
            },
        }
    }

    /// Copies a type (with its whole wrapper chain) from another document
    /// into this one and returns the new reference.
    pub fn import_type(&mut self, other: &Document, r: Ref<Type>) -> Ref<Type> {
        let ty = &other.types[r];
        match ty.kind {
            TypeKind::Named => {
                let name = other.slice(ty.name).to_owned();
                self.add_named_type(&name)
            }
            TypeKind::List => {
                let inner = ty.of_type.map(|inner| self.import_type(other, inner));
                self.types.push(Type {
                    kind: TypeKind::List,
                    name: super::ByteSpan::EMPTY,
                    of_type: inner,
                })
            }
            TypeKind::NonNull => {
                let inner = ty.of_type.map(|inner| self.import_type(other, inner));
                self.types.push(Type {
                    kind: TypeKind::NonNull,
                    name: super::ByteSpan::EMPTY,
                    of_type: inner,
                })
            }
        }
    }

    /// Renders a type reference as GraphQL text, e.g. `[Episode!]!`.
    pub fn type_to_string(&self, r: Ref<Type>) -> String {
        let mut out = String::new();
        self.write_type(r, &mut out);
        out
    }

    pub(crate) fn write_type(&self, r: Ref<Type>, out: &mut String) {
        let ty = &self.types[r];
        match ty.kind {
            TypeKind::Named => out.push_str(self.slice(ty.name)),
            TypeKind::List => {
                out.push('[');
                if let Some(inner) = ty.of_type {
                    self.write_type(inner, out);
                }
                out.push(']');
            }
            TypeKind::NonNull => {
                if let Some(inner) = ty.of_type {
                    self.write_type(inner, out);
                }
                out.push('!');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_equality_sees_through_wrappers() {
        let mut doc = Document::new();
        let a = doc.add_named_type("String");
        let a = doc.add_list_type(a);
        let a = doc.add_non_null_type(a);

        let b = doc.add_named_type("String");
        let b = doc.add_list_type(b);
        let b = doc.add_non_null_type(b);

        let c = doc.add_named_type("Int");
        let c = doc.add_list_type(c);
        let c = doc.add_non_null_type(c);

        assert!(doc.types_are_equal_deep(a, b));
        assert!(!doc.types_are_equal_deep(a, c));
    }

    #[test]
    fn type_rendering() {
        let mut doc = Document::new();
        let t = doc.add_named_type("Episode");
        let t = doc.add_non_null_type(t);
        let t = doc.add_list_type(t);
        let t = doc.add_non_null_type(t);
        assert_eq!(doc.type_to_string(t), "[Episode!]!");
    }
}
