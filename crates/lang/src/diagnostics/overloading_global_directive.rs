use super::{Diagnostic, DiagnosticRule, Severity};
use deckscan_core::{DirectiveEvent, DirectiveListener, SourceRange};
use std::collections::HashMap;

const CODE: &str = "overloading-global-directive";

/// Flags global directives that a later assignment overrides.
///
/// Only the last assignment of a global directive takes effect, so every
/// earlier one is reported.
#[derive(Debug, Default)]
pub struct OverloadingGlobalDirective {
    assignments: HashMap<&'static str, Vec<SourceRange>>,
}

impl DirectiveListener for OverloadingGlobalDirective {
    fn start_parse(&mut self) {
        self.assignments.clear();
    }

    fn directive(&mut self, event: &DirectiveEvent) {
        if let Some(definition) = event.definition
            && definition.is_global()
        {
            self.assignments
                .entry(definition.name)
                .or_default()
                .push(event.full_range());
        }
    }
}

impl DiagnosticRule for OverloadingGlobalDirective {
    fn code(&self) -> &'static str {
        CODE
    }

    fn finish(&mut self, out: &mut Vec<Diagnostic>) {
        for (name, ranges) in self.assignments.drain() {
            let Some((_, overloaded)) = ranges.split_last() else {
                continue;
            };
            out.extend(overloaded.iter().map(|range| Diagnostic {
                code: CODE,
                severity: Severity::Warning,
                message: format!(
                    "The global directive \"{name}\" is overloaded by a later definition. This value is ignored."
                ),
                range: *range,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::test_support::{run, starts};

    #[test]
    fn flags_front_matter_overloaded_by_comment() {
        let found = run(
            "---\ntheme: default\n---\n\n<!-- theme: gaia -->\n",
            OverloadingGlobalDirective::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(starts(&found), [(1, 0)]);
        assert_eq!(found[0].range.end.character, 14);
        assert!(found[0].message.contains("\"theme\""));
    }

    #[test]
    fn flags_every_occurrence_but_the_last() {
        let found = run(
            "<!-- size: 4:3 -->\n\n<!-- size: 16:9 -->\n\n<!-- size: 4:3 -->\n",
            OverloadingGlobalDirective::default(),
        );
        assert_eq!(starts(&found), [(0, 5), (2, 5)]);
    }

    #[test]
    fn flags_key_repeated_in_one_comment() {
        let found = run(
            "<!--\ntheme: nope\ntheme: gaia\n-->\n",
            OverloadingGlobalDirective::default(),
        );
        assert_eq!(starts(&found), [(1, 0)]);
        assert_eq!(found[0].range.end.character, 11);
    }

    #[test]
    fn ignores_local_and_single_assignments() {
        let found = run(
            "---\ntheme: gaia\npaginate: true\n---\n\n<!-- paginate: false -->\n<!-- _paginate: true -->\n",
            OverloadingGlobalDirective::default(),
        );
        assert!(found.is_empty());
    }
}
