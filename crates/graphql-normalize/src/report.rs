//! Shared error report accumulated while walking and rewriting documents.
//!
//! Two classes of errors are collected:
//!
//! * *internal* errors indicate a broken invariant and are addressed to the
//!   maintainer of the calling code,
//! * *external* errors describe a problem with the GraphQL document itself
//!   and carry the selection path at which the problem was found.
//!
//! Both classes abort the walk that reported them. A document for which
//! [`Report::has_errors`] returns `true` must be considered unusable.

use std::fmt;

/// One step of the GraphQL selection path leading to an error location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathItem {
    /// A field name or alias, or the operation root (`query`, `mutation`,
    /// `subscription`).
    FieldName(String),
    /// An inline fragment type condition.
    InlineFragmentName(String),
    /// An index into a list value.
    ArrayIndex(usize),
}

impl fmt::Display for PathItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathItem::FieldName(name) => write!(f, "{name}"),
            PathItem::InlineFragmentName(name) => write!(f, "$inline:{name}"),
            PathItem::ArrayIndex(i) => write!(f, "{i}"),
        }
    }
}

/// Spec-level errors addressed to the author of the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExternalErrorKind {
    #[error("type `{0}` is undefined")]
    TypeUndefined(String),
    #[error("field `{field_name}` is undefined on type `{type_name}`")]
    FieldUndefinedOnType {
        field_name: String,
        type_name: String,
    },
    #[error("fragment `{0}` is undefined")]
    FragmentUndefined(String),
    #[error("fragment `{0}` spread forms a cycle")]
    FragmentSpreadFormsCycle(String),
    #[error("operation type is invalid")]
    InvalidOperationType,
    #[error("the root type for {0} operations is undefined")]
    OperationTypeUndefined(&'static str),
    #[error("directive `{0}` is undefined")]
    DirectiveUndefined(String),
    #[error("variable `{0}` is undefined")]
    VariableUndefined(String),
}

/// An external error together with the selection path where it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalError {
    pub kind: ExternalErrorKind,
    pub path: Vec<PathItem>,
}

impl fmt::Display for ExternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)?;
        if !self.path.is_empty() {
            f.write_str(" (at ")?;
            for (i, item) in self.path.iter().enumerate() {
                if i != 0 {
                    f.write_str(".")?;
                }
                item.fmt(f)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Invariant violations addressed to the maintainer of the calling code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InternalError(pub String);

impl InternalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Accumulates errors across the stages of a pipeline.
///
/// A single `Report` is shared by every stage of a normalization run;
/// the first stage to record an error halts the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub internal_errors: Vec<InternalError>,
    pub external_errors: Vec<ExternalError>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.internal_errors.is_empty() || !self.external_errors.is_empty()
    }

    pub fn add_internal_error(&mut self, error: impl fmt::Display) {
        self.internal_errors.push(InternalError(error.to_string()));
    }

    pub fn add_external_error(&mut self, error: ExternalError) {
        self.external_errors.push(error);
    }

    pub fn reset(&mut self) {
        self.internal_errors.clear();
        self.external_errors.clear();
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.internal_errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "internal: {err}")?;
            first = false;
        }
        for err in &self.external_errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "external: {err}")?;
            first = false;
        }
        if first {
            f.write_str("no errors")?;
        }
        Ok(())
    }
}
