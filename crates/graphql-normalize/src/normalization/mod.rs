//! The normalization pipeline.
//!
//! A pipeline is a sequence of *stages*; each stage is one [`Walker`] run
//! with one or more passes registered on it. Stage boundaries matter:
//! a pass may rely on every earlier stage having seen the whole document,
//! and several passes share state across stages through their `Rc`
//! handles. The pipeline halts as soon as the shared [`Report`] records
//! an error.
//!
//! Four pipelines are provided:
//!
//! * [`OperationNormalizer`] rewrites an executable document into its
//!   canonical form against a schema,
//! * [`VariablesNormalizer`] runs only the variable-related passes, for
//!   callers that normalize the selection shape separately,
//! * [`VariablesMapper`] renames variables to canonical names and reports
//!   the renaming,
//! * [`DefinitionNormalizer`] folds schema extensions into their base
//!   definitions so that the other pipelines only ever consult bases.

mod directive_include_skip;
mod extension_merging;
mod field_merging;
mod fragment_cycles;
mod fragment_spread_inlining;
mod inject_input_default_values;
mod inline_fragment_inlining;
mod inline_fragment_merging;
mod input_coercion_for_list;
mod remove_fragment_definitions;
mod remove_operation_definitions;
mod remove_self_aliasing;
mod sort_selection_sets;
mod uploads;
mod variables_default_value_extraction;
mod variables_extraction;
mod variables_mapping;
mod variables_unused;

pub use self::directive_include_skip::TYPENAME_PLACEHOLDER;
pub use self::uploads::UploadPathMapping;
pub use self::variables_extraction::FieldArgumentMapping;
pub use self::variables_mapping::VariablesMapping;

use crate::ast::Document;
use crate::report::Report;
use crate::walker::Walker;

/// Which rewrites a normalization run performs.
///
/// The defaults produce a fully normalized operation; the `with_*`
/// constructors switch individual rewrites off or on for callers that
/// handle them elsewhere.
#[derive(Debug, Clone)]
pub struct NormalizationOptions {
    pub remove_fragment_definitions: bool,
    pub inline_fragment_spreads: bool,
    pub extract_variables: bool,
    pub remove_unused_variables: bool,
    /// Only meaningful for [`OperationNormalizer::normalize_named`]: drop
    /// operations other than the requested one.
    pub remove_not_matching_operation_definitions: bool,
    /// Run the [`DefinitionNormalizer`] over the schema before the
    /// operation stages.
    pub normalize_definition: bool,
    /// Leave `@skip`/`@include` unevaluated.
    pub ignore_skip_include: bool,
    pub sort_selection_sets: bool,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self {
            remove_fragment_definitions: true,
            inline_fragment_spreads: true,
            extract_variables: true,
            remove_unused_variables: true,
            remove_not_matching_operation_definitions: false,
            normalize_definition: false,
            ignore_skip_include: false,
            sort_selection_sets: false,
        }
    }
}

impl NormalizationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remove_fragment_definitions(mut self, on: bool) -> Self {
        self.remove_fragment_definitions = on;
        self
    }

    pub fn with_inline_fragment_spreads(mut self, on: bool) -> Self {
        self.inline_fragment_spreads = on;
        self
    }

    pub fn with_extract_variables(mut self, on: bool) -> Self {
        self.extract_variables = on;
        self
    }

    pub fn with_remove_unused_variables(mut self, on: bool) -> Self {
        self.remove_unused_variables = on;
        self
    }

    pub fn with_remove_not_matching_operation_definitions(mut self, on: bool) -> Self {
        self.remove_not_matching_operation_definitions = on;
        self
    }

    pub fn with_normalize_definition(mut self, on: bool) -> Self {
        self.normalize_definition = on;
        self
    }

    pub fn with_ignore_skip_include(mut self, on: bool) -> Self {
        self.ignore_skip_include = on;
        self
    }

    pub fn with_sort_selection_sets(mut self, on: bool) -> Self {
        self.sort_selection_sets = on;
        self
    }
}

/// What a normalization run discovered about the operation's variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariablesOutcome {
    /// Upload scalar locations, old path to new path.
    pub upload_path_mappings: Vec<UploadPathMapping>,
    /// `fieldPath.argumentName` to the variable the argument now reads.
    pub field_argument_mapping: FieldArgumentMapping,
}

/// The full operation pipeline.
pub struct OperationNormalizer {
    options: NormalizationOptions,
}

impl Default for OperationNormalizer {
    fn default() -> Self {
        Self::new(NormalizationOptions::default())
    }
}

impl OperationNormalizer {
    pub fn new(options: NormalizationOptions) -> Self {
        Self { options }
    }

    /// Normalizes every operation in the document.
    pub fn normalize(
        &self,
        operation: &mut Document,
        definition: Option<&Document>,
        report: &mut Report,
    ) -> VariablesOutcome {
        self.run(operation, definition, None, report)
    }

    /// Normalizes the named operation, dropping the others when the
    /// options ask for it.
    pub fn normalize_named(
        &self,
        operation: &mut Document,
        definition: Option<&Document>,
        operation_name: &str,
        report: &mut Report,
    ) -> VariablesOutcome {
        self.run(operation, definition, Some(operation_name), report)
    }

    fn run(
        &self,
        operation: &mut Document,
        definition: Option<&Document>,
        operation_name: Option<&str>,
        report: &mut Report,
    ) -> VariablesOutcome {
        let mut outcome = VariablesOutcome::default();

        macro_rules! stage {
            ($walker:expr) => {
                $walker.walk(operation, definition, report);
                if report.has_errors() {
                    return outcome;
                }
            };
        }

        if self.options.remove_not_matching_operation_definitions {
            if let Some(name) = operation_name {
                let mut walker = Walker::new();
                remove_operation_definitions::remove_operation_definitions(&mut walker, name);
                stage!(walker);
            }
        }

        // The cleanup walker is built up front: its pruning visitor has to
        // start collecting variable usages in the first stage, before
        // rewrites remove them.
        let mut cleanup = Walker::new();
        field_merging::field_selection_merging(&mut cleanup);
        field_merging::deduplicate_fields(&mut cleanup);
        let delete_unused = if self.options.remove_unused_variables {
            Some(variables_unused::delete_unused_variables(&mut cleanup))
        } else {
            None
        };

        let mut early = Walker::new();
        fragment_cycles::prevent_fragment_cycles(&mut early);
        directive_include_skip::directive_include_skip(&mut early, self.options.ignore_skip_include);
        if let Some(delete) = &delete_unused {
            variables_unused::detect_variable_usage(&mut early, delete);
        }
        stage!(early);

        if self.options.inline_fragment_spreads {
            let mut walker = Walker::new();
            fragment_spread_inlining::fragment_spread_inline(&mut walker);
            stage!(walker);
        }

        let extraction = if self.options.extract_variables {
            let mut walker = Walker::new();
            let extraction = variables_extraction::extract_variables(&mut walker);
            stage!(walker);
            Some(extraction)
        } else {
            None
        };

        let mut flattening = Walker::new();
        remove_self_aliasing::remove_self_aliasing(&mut flattening);
        inline_fragment_inlining::inline_selections_from_inline_fragments(&mut flattening);
        stage!(flattening);

        let mut merging = Walker::new();
        inline_fragment_merging::merge_inline_fragment_selections(&mut merging);
        stage!(merging);

        if self.options.remove_fragment_definitions {
            let mut walker = Walker::new();
            remove_fragment_definitions::remove_fragment_definitions(&mut walker);
            stage!(walker);
        }

        stage!(cleanup);

        if self.options.extract_variables {
            let mut walker = Walker::new();
            input_coercion_for_list::input_coercion_for_list(&mut walker);
            variables_default_value_extraction::extract_variables_default_value(
                &mut walker,
                operation_name,
            );
            inject_input_default_values::inject_input_field_defaults(&mut walker);
            stage!(walker);
        }

        if self.options.sort_selection_sets {
            let mut walker = Walker::new();
            sort_selection_sets::sort_selection_sets(&mut walker);
            stage!(walker);
        }

        if let Some(extraction) = extraction {
            let extraction = extraction.borrow();
            outcome.upload_path_mappings = extraction.upload_path_mappings();
            outcome.field_argument_mapping = extraction.field_argument_mapping();
        }
        outcome
    }
}

/// Normalizes every operation in the document with the default options.
pub fn normalize_operation(
    operation: &mut Document,
    definition: Option<&Document>,
    report: &mut Report,
) -> VariablesOutcome {
    OperationNormalizer::default().normalize(operation, definition, report)
}

/// Normalizes one named operation against a schema, dropping the other
/// operations. The schema is extension-merged first, so lookups during
/// the operation stages only consult base definitions.
pub fn normalize_named_operation(
    operation: &mut Document,
    definition: &mut Document,
    operation_name: &str,
    report: &mut Report,
) -> VariablesOutcome {
    let options = NormalizationOptions::default()
        .with_remove_not_matching_operation_definitions(true)
        .with_normalize_definition(true);
    if options.normalize_definition {
        DefinitionNormalizer::new().normalize(definition, report);
        if report.has_errors() {
            return VariablesOutcome::default();
        }
    }
    OperationNormalizer::new(options).normalize_named(operation, Some(definition), operation_name, report)
}

/// The variable-only pipeline: usage detection, extraction with default
/// lifting, unused pruning, list coercion and input defaults, in four
/// stages over the same document.
#[derive(Default)]
pub struct VariablesNormalizer;

impl VariablesNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(
        &self,
        operation: &mut Document,
        definition: Option<&Document>,
        report: &mut Report,
    ) -> VariablesOutcome {
        let mut outcome = VariablesOutcome::default();

        let mut pruning = Walker::new();
        let delete = variables_unused::delete_unused_variables(&mut pruning);

        let mut detection = Walker::new();
        variables_unused::detect_variable_usage(&mut detection, &delete);
        detection.walk(operation, definition, report);
        if report.has_errors() {
            return outcome;
        }

        let mut extraction_walker = Walker::new();
        let extraction = variables_extraction::extract_variables(&mut extraction_walker);
        variables_default_value_extraction::extract_variables_default_value(
            &mut extraction_walker,
            None,
        );
        extraction_walker.walk(operation, definition, report);
        if report.has_errors() {
            return outcome;
        }

        pruning.walk(operation, definition, report);
        if report.has_errors() {
            return outcome;
        }

        let mut coercion = Walker::new();
        input_coercion_for_list::input_coercion_for_list(&mut coercion);
        inject_input_default_values::inject_input_field_defaults(&mut coercion);
        coercion.walk(operation, definition, report);
        if report.has_errors() {
            return outcome;
        }

        let extraction = extraction.borrow();
        outcome.upload_path_mappings = extraction.upload_path_mappings();
        outcome.field_argument_mapping = extraction.field_argument_mapping();
        outcome
    }
}

/// Renames variables to the canonical `a`, `b`, ... sequence in first-use
/// order and sorts the variable definitions.
///
/// Runs after [`OperationNormalizer`] and [`VariablesNormalizer`]; the
/// returned mapping leads from each new name to the one it replaced. The
/// variables JSON object is left untouched, callers rename its keys with
/// the mapping.
#[derive(Default)]
pub struct VariablesMapper;

impl VariablesMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(
        &self,
        operation: &mut Document,
        definition: Option<&Document>,
        report: &mut Report,
    ) -> VariablesMapping {
        let mut walker = Walker::new();
        let mapper = variables_mapping::remap_variables(&mut walker);
        walker.walk(operation, definition, report);
        if report.has_errors() {
            return VariablesMapping::new();
        }
        let mapping = mapper.borrow().mapping();
        mapping
    }
}

/// Folds schema extensions into their base definitions.
///
/// Two stages: the first rewrites `@extends`-annotated definitions into
/// extension nodes, the second materializes missing root operation bases
/// and merges every extension into its base. The name index is rebuilt
/// after each stage so later lookups see the rewritten roots.
#[derive(Default)]
pub struct DefinitionNormalizer;

impl DefinitionNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, definition: &mut Document, report: &mut Report) {
        let mut extends = Walker::new();
        extension_merging::extends_directive(&mut extends);
        extends.walk(definition, None, report);
        if report.has_errors() {
            return;
        }
        definition.rebuild_index();

        let mut merging = Walker::new();
        extension_merging::implicit_extend_root_operation(&mut merging);
        extension_merging::merge_type_extensions(&mut merging);
        merging.walk(definition, None, report);
        if report.has_errors() {
            return;
        }
        definition.rebuild_index();
    }
}
