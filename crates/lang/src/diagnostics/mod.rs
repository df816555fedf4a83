//! Diagnostic rules.
//!
//! Every rule is a [`DirectiveListener`]. [`diagnose`] subscribes all of them
//! to a single parse pass and collects what they report once it ends.

mod define_math_global_directive;
mod deprecated_color_setting_shorthand;
mod deprecated_dollar_prefix;
mod ignored_math_global_directive;
mod overloading_global_directive;
mod unknown_size;
mod unknown_theme;

pub use define_math_global_directive::DefineMathGlobalDirective;
pub use deprecated_color_setting_shorthand::{DeprecatedColorSettingShorthand, is_css_color};
pub use deprecated_dollar_prefix::DeprecatedDollarPrefix;
pub use ignored_math_global_directive::IgnoredMathGlobalDirective;
pub use overloading_global_directive::OverloadingGlobalDirective;
pub use unknown_size::UnknownSize;
pub use unknown_theme::UnknownTheme;

use crate::options::ResolvedOptions;
use deckscan_core::{
    DeckError, DirectiveListener, DirectiveParser, ParseEvent, SourceRange, TextDocument,
};
use serde::Serialize;

/// How loudly a diagnostic is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Error.
    Error,
    /// Warning.
    Warning,
    /// Information.
    Information,
    /// Hint.
    Hint,
}

/// A problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Rule identifier.
    pub code: &'static str,
    /// Severity.
    pub severity: Severity,
    /// Human readable message.
    pub message: String,
    /// Where the problem is.
    pub range: SourceRange,
}

/// A listener that turns parse events into diagnostics.
pub trait DiagnosticRule: DirectiveListener {
    /// Identifier reported as [`Diagnostic::code`].
    fn code(&self) -> &'static str;

    /// Moves the diagnostics found during the last pass into `out`.
    fn finish(&mut self, out: &mut Vec<Diagnostic>);
}

/// All built-in rules, configured from `options`.
pub fn rules(options: &ResolvedOptions) -> Vec<Box<dyn DiagnosticRule + '_>> {
    vec![
        Box::new(OverloadingGlobalDirective::default()),
        Box::new(UnknownTheme::new(options)),
        Box::new(UnknownSize::new(options)),
        Box::new(DeprecatedDollarPrefix::default()),
        Box::new(DeprecatedColorSettingShorthand::default()),
        Box::new(IgnoredMathGlobalDirective::new(options.math_typesetting)),
        Box::new(DefineMathGlobalDirective::new(options.math_typesetting)),
    ]
}

/// Forwards one pass to several rules.
struct RuleSet<'r> {
    rules: Vec<Box<dyn DiagnosticRule + 'r>>,
}

impl DirectiveListener for RuleSet<'_> {
    fn on_event(&mut self, event: &ParseEvent) {
        for rule in &mut self.rules {
            rule.on_event(event);
        }
    }
}

/// Runs every rule over `document` in one parse pass.
///
/// Returns diagnostics sorted by range. Nothing is reported when
/// diagnostics are switched off.
pub fn diagnose<D>(document: &D, options: &ResolvedOptions) -> Result<Vec<Diagnostic>, DeckError>
where
    D: TextDocument + ?Sized,
{
    if !options.diagnostics {
        return Ok(Vec::new());
    }
    run_rules(document, rules(options))
}

/// Runs the given rules over `document` in one parse pass.
pub fn run_rules<'r, D>(
    document: &D,
    rules: Vec<Box<dyn DiagnosticRule + 'r>>,
) -> Result<Vec<Diagnostic>, DeckError>
where
    D: TextDocument + ?Sized,
{
    let mut set = RuleSet { rules };
    let mut parser = DirectiveParser::new();
    parser.subscribe(&mut set);
    parser.parse(document)?;

    let mut diagnostics = Vec::new();
    for rule in &mut set.rules {
        let before = diagnostics.len();
        rule.finish(&mut diagnostics);
        log::trace!("{}: {} diagnostics", rule.code(), diagnostics.len() - before);
    }
    diagnostics.sort_by(|a, b| {
        (a.range.start, a.range.end, a.code).cmp(&(b.range.start, b.range.end, b.code))
    });
    Ok(diagnostics)
}
