//! Arena-based GraphQL AST with a generic multi-visitor walker
//! and an operation normalization pipeline built on top of it.
//!
//! * [`ast`] stores a parsed document as per-kind arenas addressed by
//!   integer references, so rewrites never invalidate other references.
//! * [`walker`] traverses a document in schema-aware order and dispatches
//!   to any number of registered visitors, which may mutate the document
//!   while it is being walked.
//! * [`normalization`] is a pipeline of rewrite passes: fragment inlining,
//!   selection merging, `@skip`/`@include` evaluation, variable extraction
//!   and coercion, type-extension merging.
//!
//! Parsing is delegated to [`apollo-parser`]; printing back to GraphQL
//! text is available through [`ast::Document::serialize`].
//!
//! [`apollo-parser`]: https://crates.io/crates/apollo-parser

pub mod ast;
pub mod normalization;
pub mod parser;
pub mod report;
pub mod walker;

pub use self::ast::Document;
pub use self::normalization::normalize_named_operation;
pub use self::normalization::normalize_operation;
pub use self::normalization::DefinitionNormalizer;
pub use self::normalization::NormalizationOptions;
pub use self::normalization::OperationNormalizer;
pub use self::normalization::VariablesMapper;
pub use self::normalization::VariablesNormalizer;
pub use self::parser::Parser;
pub use self::report::Report;

/// Version of this crate, for reporting surfaces that want it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
