//! Parse pass events and the listener contract.
//!
//! A pass emits `StartParse`, then front matter, comments, directives,
//! images and math in document order, then `EndParse`. Listeners see each
//! event once, synchronously, while the pass runs.

use crate::document::SourceRange;
use crate::math::MathKind;
use crate::registry::{DefinedIn, DirectiveDefinition};
use serde::Serialize;

/// Text with its document range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangedText {
    /// Decoded text.
    pub text: String,
    /// Range of the raw text in the document.
    pub range: SourceRange,
}

/// Front matter block found at the start of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatterEvent {
    /// Opening fence through closing fence.
    pub range: SourceRange,
    /// YAML between the fences.
    pub body: String,
    /// Range of the YAML between the fences.
    pub body_range: SourceRange,
}

/// An HTML comment in the Markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEvent {
    /// `<!--` through `-->`.
    pub range: SourceRange,
    /// Everything between the delimiters.
    pub content_range: SourceRange,
    /// Candidate YAML body with dash/whitespace padding removed.
    pub body: String,
    /// Range of the candidate YAML body.
    pub body_range: SourceRange,
}

/// A top-level YAML key/value pair in front matter or a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveEvent {
    /// Matched definition; `None` for keys the registry does not know.
    pub definition: Option<&'static DirectiveDefinition>,
    /// Key as written.
    pub key: RangedText,
    /// Value, absent when nothing follows the key.
    pub value: Option<RangedText>,
    /// Whether the key used the `_` scoped alias.
    pub scoped: bool,
    /// Where the pair was written.
    pub defined_in: DefinedIn,
}

impl DirectiveEvent {
    /// Directive name when recognised.
    pub fn name(&self) -> Option<&'static str> {
        self.definition.map(|definition| definition.name)
    }

    /// Whether this assigns a global directive.
    pub fn is_global(&self) -> bool {
        self.definition.is_some_and(|definition| definition.is_global())
    }

    /// Range from the key start to the value end (or key end).
    pub fn full_range(&self) -> SourceRange {
        let end = self.value.as_ref().map_or(self.key.range, |value| value.range);
        SourceRange {
            start: self.key.range.start,
            end: end.end,
            span: crate::Span::new(self.key.range.span.start, end.span.end),
        }
    }

    /// Trimmed value text, empty when absent.
    pub fn value_text(&self) -> &str {
        self.value.as_ref().map_or("", |value| value.text.trim())
    }
}

/// A Markdown image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEvent {
    /// Image URL.
    pub url: String,
    /// Alternative text.
    pub alt: String,
    /// Optional title.
    pub title: Option<String>,
    /// Raw Markdown source of the image.
    pub body: String,
    /// Range of the image syntax.
    pub range: SourceRange,
}

/// A span the renderer will typeset as math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MathEvent {
    /// Inline or block.
    pub kind: MathKind,
    /// Raw source including delimiters.
    pub body: String,
    /// Range of the span.
    pub range: SourceRange,
}

/// One event of a parse pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ParseEvent {
    /// Pass started.
    StartParse,
    /// Front matter found.
    FrontMatter(FrontMatterEvent),
    /// HTML comment found.
    Comment(CommentEvent),
    /// YAML pair found in front matter or a comment.
    Directive(DirectiveEvent),
    /// Image found.
    Image(ImageEvent),
    /// Math span accepted by the math heuristic.
    MaybeMath(MathEvent),
    /// Pass finished.
    EndParse,
}

/// Receives the events of a parse pass.
///
/// Implement the per-kind methods you care about; [`on_event`](Self::on_event)
/// dispatches to them.
pub trait DirectiveListener {
    /// Pass started.
    fn start_parse(&mut self) {}
    /// Front matter found.
    fn front_matter(&mut self, _event: &FrontMatterEvent) {}
    /// HTML comment found.
    fn comment(&mut self, _event: &CommentEvent) {}
    /// YAML pair found.
    fn directive(&mut self, _event: &DirectiveEvent) {}
    /// Image found.
    fn image(&mut self, _event: &ImageEvent) {}
    /// Math span found.
    fn maybe_math(&mut self, _event: &MathEvent) {}
    /// Pass finished.
    fn end_parse(&mut self) {}

    /// Entry point used by the parser.
    fn on_event(&mut self, event: &ParseEvent) {
        match event {
            ParseEvent::StartParse => self.start_parse(),
            ParseEvent::FrontMatter(event) => self.front_matter(event),
            ParseEvent::Comment(event) => self.comment(event),
            ParseEvent::Directive(event) => self.directive(event),
            ParseEvent::Image(event) => self.image(event),
            ParseEvent::MaybeMath(event) => self.maybe_math(event),
            ParseEvent::EndParse => self.end_parse(),
        }
    }
}

/// Records every event of a pass.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<ParseEvent>,
    sealed: bool,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[ParseEvent] {
        &self.events
    }

    /// Whether `EndParse` was seen.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Consumes the log.
    pub fn into_events(self) -> Vec<ParseEvent> {
        self.events
    }

    /// Directive events only.
    pub fn directives(&self) -> impl Iterator<Item = &DirectiveEvent> {
        self.events.iter().filter_map(|event| match event {
            ParseEvent::Directive(directive) => Some(directive),
            _ => None,
        })
    }
}

impl DirectiveListener for EventLog {
    fn on_event(&mut self, event: &ParseEvent) {
        if matches!(event, ParseEvent::StartParse) {
            self.events.clear();
            self.sealed = false;
        }
        self.events.push(event.clone());
        if matches!(event, ParseEvent::EndParse) {
            self.sealed = true;
        }
    }
}
