use super::{Diagnostic, DiagnosticRule, Severity};
use crate::options::ResolvedOptions;
use deckscan_core::{DirectiveEvent, DirectiveListener};

const CODE: &str = "unknown-theme";

/// Flags `theme` values that name no built-in or configured theme.
#[derive(Debug)]
pub struct UnknownTheme<'a> {
    options: &'a ResolvedOptions,
    found: Vec<Diagnostic>,
}

impl<'a> UnknownTheme<'a> {
    /// Rule checking against the themes in `options`.
    pub fn new(options: &'a ResolvedOptions) -> Self {
        Self {
            options,
            found: Vec::new(),
        }
    }
}

impl DirectiveListener for UnknownTheme<'_> {
    fn start_parse(&mut self) {
        self.found.clear();
    }

    fn directive(&mut self, event: &DirectiveEvent) {
        if event.name() != Some("theme") {
            return;
        }
        let Some(value) = &event.value else {
            return;
        };
        let theme = value.text.trim();
        if theme.is_empty() || self.options.has_theme(theme) {
            return;
        }
        self.found.push(Diagnostic {
            code: CODE,
            severity: Severity::Warning,
            message: format!("The specified theme \"{theme}\" is not recognized."),
            range: value.range,
        });
    }
}

impl DiagnosticRule for UnknownTheme<'_> {
    fn code(&self) -> &'static str {
        CODE
    }

    fn finish(&mut self, out: &mut Vec<Diagnostic>) {
        out.append(&mut self.found);
    }
}
