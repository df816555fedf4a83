//! Editor decorations for recognised directives.

use deckscan_core::{
    DeckError, DirectiveEvent, DirectiveListener, DirectiveParser, DirectiveScope, SourceRange,
    TextDocument,
};
use serde::Serialize;

/// How a directive applies, for choosing a decoration style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationKind {
    /// Whole deck.
    Global,
    /// Current and following slides.
    Local,
    /// Current slide only.
    Scoped,
}

/// A recognised directive and the range to decorate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Directive name.
    pub name: &'static str,
    /// How it applies.
    pub kind: AnnotationKind,
    /// Key start through value end.
    pub range: SourceRange,
}

#[derive(Default)]
struct Annotator {
    annotations: Vec<Annotation>,
}

impl DirectiveListener for Annotator {
    fn directive(&mut self, event: &DirectiveEvent) {
        let Some(definition) = event.definition else {
            return;
        };
        let kind = match (definition.scope, event.scoped) {
            (DirectiveScope::Global, _) => AnnotationKind::Global,
            (DirectiveScope::Local, true) => AnnotationKind::Scoped,
            (DirectiveScope::Local, false) => AnnotationKind::Local,
        };
        self.annotations.push(Annotation {
            name: definition.name,
            kind,
            range: event.full_range(),
        });
    }
}

/// Annotates every recognised directive in document order.
pub fn annotate<D>(document: &D) -> Result<Vec<Annotation>, DeckError>
where
    D: TextDocument + ?Sized,
{
    let mut annotator = Annotator::default();
    let mut parser = DirectiveParser::new();
    parser.subscribe(&mut annotator);
    parser.parse(document)?;
    Ok(annotator.annotations)
}
