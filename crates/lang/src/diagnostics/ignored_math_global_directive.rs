use super::{Diagnostic, DiagnosticRule, Severity};
use crate::options::MathTypesetting;
use deckscan_core::{DirectiveEvent, DirectiveListener};

const CODE: &str = "ignored-math-global-directive";

/// Flags `math` directives while math typesetting is switched off.
#[derive(Debug)]
pub struct IgnoredMathGlobalDirective {
    typesetting: MathTypesetting,
    found: Vec<Diagnostic>,
}

impl IgnoredMathGlobalDirective {
    /// Rule for the given typesetting mode.
    pub fn new(typesetting: MathTypesetting) -> Self {
        Self {
            typesetting,
            found: Vec::new(),
        }
    }
}

impl DirectiveListener for IgnoredMathGlobalDirective {
    fn start_parse(&mut self) {
        self.found.clear();
    }

    fn directive(&mut self, event: &DirectiveEvent) {
        if self.typesetting != MathTypesetting::Off || event.name() != Some("math") {
            return;
        }
        self.found.push(Diagnostic {
            code: CODE,
            severity: Severity::Warning,
            message: "The math global directive is ignored because math typesetting is disabled."
                .to_string(),
            range: event.full_range(),
        });
    }
}

impl DiagnosticRule for IgnoredMathGlobalDirective {
    fn code(&self) -> &'static str {
        CODE
    }

    fn finish(&mut self, out: &mut Vec<Diagnostic>) {
        out.append(&mut self.found);
    }
}
