use super::{Diagnostic, DiagnosticRule, Severity};
use crate::options::ResolvedOptions;
use deckscan_core::{DirectiveEvent, DirectiveListener};

const CODE: &str = "unknown-size";

/// Flags `size` values that are not a known preset.
#[derive(Debug)]
pub struct UnknownSize<'a> {
    options: &'a ResolvedOptions,
    found: Vec<Diagnostic>,
}

impl<'a> UnknownSize<'a> {
    /// Rule checking against the presets in `options`.
    pub fn new(options: &'a ResolvedOptions) -> Self {
        Self {
            options,
            found: Vec::new(),
        }
    }
}

impl DirectiveListener for UnknownSize<'_> {
    fn start_parse(&mut self) {
        self.found.clear();
    }

    fn directive(&mut self, event: &DirectiveEvent) {
        if event.name() != Some("size") {
            return;
        }
        let Some(value) = &event.value else {
            return;
        };
        let size = value.text.trim();
        if size.is_empty() || self.options.has_size(size) {
            return;
        }
        let known: Vec<_> = self.options.sizes().map(|s| format!("\"{s}\"")).collect();
        self.found.push(Diagnostic {
            code: CODE,
            severity: Severity::Warning,
            message: format!(
                "\"{size}\" is not a known size preset. Available presets: {}.",
                known.join(", ")
            ),
            range: value.range,
        });
    }
}

impl DiagnosticRule for UnknownSize<'_> {
    fn code(&self) -> &'static str {
        CODE
    }

    fn finish(&mut self, out: &mut Vec<Diagnostic>) {
        out.append(&mut self.found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::test_support::{run, starts};
    use crate::options::LanguageOptions;

    #[test]
    fn flags_unknown_preset() {
        let options = ResolvedOptions::default();
        let found = run("---\nsize: 21:9\n---\n", UnknownSize::new(&options));
        assert_eq!(starts(&found), [(1, 6)]);
        assert_eq!(
            found[0].message,
            "\"21:9\" is not a known size preset. Available presets: \"16:9\", \"4:3\"."
        );
    }

    #[test]
    fn accepts_builtin_and_configured_presets() {
        let options = LanguageOptions {
            sizes: vec!["A4".into()],
            ..LanguageOptions::default()
        }
        .resolve();
        let text = "<!-- size: 4:3 -->\n\n<!-- size: \"16:9\" -->\n\n<!-- size: A4 -->\n";
        assert!(run(text, UnknownSize::new(&options)).is_empty());
    }
}
