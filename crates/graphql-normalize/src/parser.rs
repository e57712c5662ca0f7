//! Parsing source text into arena documents, on top of `apollo-parser`.

use crate::ast::{Document, JsonValue};

/// Configuration for parsing an input string as GraphQL syntax.
#[derive(Default, Debug, Clone)]
pub struct Parser {
    recursion_limit: Option<usize>,
    token_limit: Option<usize>,
    recursion_reached: usize,
    tokens_reached: usize,
}

/// A syntax error reported by the underlying parser, with the byte offset
/// at which it occurred.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at offset {index}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub index: usize,
}

/// All syntax errors found in one input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ParseError {
    pub errors: Vec<SyntaxError>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i != 0 {
                f.write_str("; ")?;
            }
            error.fmt(f)?;
        }
        Ok(())
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the recursion limit to use while parsing.
    pub fn recursion_limit(mut self, value: usize) -> Self {
        self.recursion_limit = Some(value);
        self
    }

    /// Configure the limit on the number of tokens to parse. If an input
    /// document is too big, parsing is aborted. By default there is no limit.
    pub fn token_limit(mut self, value: usize) -> Self {
        self.token_limit = Some(value);
        self
    }

    /// Parse executable source text into a document.
    pub fn parse_operation(&mut self, source_text: &str) -> Result<Document, ParseError> {
        self.parse_document(source_text)
    }

    /// Parse executable source text together with its JSON variables.
    pub fn parse_operation_with_variables(
        &mut self,
        source_text: &str,
        variables: JsonValue,
    ) -> Result<Document, ParseError> {
        let mut document = self.parse_document(source_text)?;
        if variables.is_object() {
            document.input.variables = variables;
        }
        Ok(document)
    }

    /// Parse type-system source text into a document and build its name
    /// index, so that the result is usable as a definition document.
    pub fn parse_schema(&mut self, source_text: &str) -> Result<Document, ParseError> {
        let mut document = self.parse_document(source_text)?;
        document.rebuild_index();
        Ok(document)
    }

    fn parse_document(&mut self, source_text: &str) -> Result<Document, ParseError> {
        let mut parser = apollo_parser::Parser::new(source_text);
        if let Some(value) = self.recursion_limit {
            parser = parser.recursion_limit(value)
        }
        if let Some(value) = self.token_limit {
            parser = parser.token_limit(value)
        }
        let tree = parser.parse();
        self.recursion_reached = tree.recursion_limit().high;
        self.tokens_reached = tree.token_limit().high;

        let errors: Vec<SyntaxError> = tree
            .errors()
            .map(|parser_error| SyntaxError {
                message: parser_error.message().to_owned(),
                index: parser_error.index(),
            })
            .collect();
        if !errors.is_empty() {
            return Err(ParseError { errors });
        }

        let mut document = Document::new();
        document.lower_cst(tree.document());
        Ok(document)
    }

    /// What level of recursion the parser reached while parsing the most
    /// recent input.
    pub fn recursion_reached(&self) -> usize {
        self.recursion_reached
    }

    /// How many tokens the parser created while parsing the most recent input.
    pub fn tokens_reached(&self) -> usize {
        self.tokens_reached
    }
}
