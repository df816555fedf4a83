#![deny(missing_docs)]
//! Editor features for Markdown slide decks: diagnostics, hover, completion,
//! and directive annotations. Each feature drives its own parse pass.

/// Directive range annotations.
pub mod annotations;
/// Parallel diagnostics over many documents.
pub mod batch;
/// Key and value completion.
pub mod completion;
/// Diagnostic rules.
pub mod diagnostics;
/// Hover help.
pub mod hover;
/// Language service options.
pub mod options;

pub use annotations::{Annotation, AnnotationKind, annotate};
pub use batch::{
    BatchInput, BatchOptions, BatchProcessingResult, BatchResult, BatchStats, diagnose_batch,
};
pub use completion::{CompletionItem, CompletionKind, complete};
pub use diagnostics::{Diagnostic, DiagnosticRule, Severity, diagnose, run_rules};
pub use hover::{Hover, hover};
pub use options::{
    BUILTIN_SIZES, BUILTIN_THEMES, LanguageOptions, MathTypesetting, OptionsCache,
    ResolvedOptions,
};
