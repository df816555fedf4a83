use super::{Diagnostic, DiagnosticRule, Severity};
use crate::options::MathTypesetting;
use deckscan_core::{DirectiveEvent, DirectiveListener, MathEvent, SourceRange};

const CODE: &str = "define-math-global-directive";

/// Suggests pinning the math library once a deck uses math syntax.
///
/// Reported at most once, on the first math span, and only when no `math`
/// directive appears anywhere in the document.
#[derive(Debug)]
pub struct DefineMathGlobalDirective {
    typesetting: MathTypesetting,
    has_math_directive: bool,
    first_math: Option<SourceRange>,
}

impl DefineMathGlobalDirective {
    /// Rule for the given typesetting mode.
    pub fn new(typesetting: MathTypesetting) -> Self {
        Self {
            typesetting,
            has_math_directive: false,
            first_math: None,
        }
    }
}

impl DirectiveListener for DefineMathGlobalDirective {
    fn start_parse(&mut self) {
        self.has_math_directive = false;
        self.first_math = None;
    }

    fn directive(&mut self, event: &DirectiveEvent) {
        if event.name() == Some("math") {
            self.has_math_directive = true;
        }
    }

    fn maybe_math(&mut self, event: &MathEvent) {
        self.first_math.get_or_insert(event.range);
    }
}

impl DiagnosticRule for DefineMathGlobalDirective {
    fn code(&self) -> &'static str {
        CODE
    }

    fn finish(&mut self, out: &mut Vec<Diagnostic>) {
        let first_math = self.first_math.take();
        if self.typesetting == MathTypesetting::Off || self.has_math_directive {
            return;
        }
        let Some(range) = first_math else {
            return;
        };
        out.push(Diagnostic {
            code: CODE,
            severity: Severity::Information,
            message: "Math syntax is used without a math global directive. Define \"math\" to pin the typesetting library."
                .to_string(),
            range,
        });
    }
}
