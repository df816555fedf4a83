use super::{Diagnostic, DiagnosticRule, Severity};
use deckscan_core::{DirectiveEvent, DirectiveListener, Registry};

const CODE: &str = "deprecated-dollar-prefix";

/// Flags the legacy `$name` spelling of global directives.
#[derive(Debug, Default)]
pub struct DeprecatedDollarPrefix {
    found: Vec<Diagnostic>,
}

impl DirectiveListener for DeprecatedDollarPrefix {
    fn start_parse(&mut self) {
        self.found.clear();
    }

    fn directive(&mut self, event: &DirectiveEvent) {
        if event.definition.is_some() {
            return;
        }
        let Some(name) = event.key.text.strip_prefix('$') else {
            return;
        };
        let Some(definition) = Registry::builtin().get(name) else {
            return;
        };
        if !definition.is_global() {
            return;
        }
        self.found.push(Diagnostic {
            code: CODE,
            severity: Severity::Warning,
            message: format!(
                "The dollar prefix of global directive \"${name}\" is deprecated. Use \"{name}\" instead."
            ),
            range: event.key.range,
        });
    }
}

impl DiagnosticRule for DeprecatedDollarPrefix {
    fn code(&self) -> &'static str {
        CODE
    }

    fn finish(&mut self, out: &mut Vec<Diagnostic>) {
        out.append(&mut self.found);
    }
}
