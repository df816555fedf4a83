//! Directive parser: one synchronous pass over a document.
//!
//! The document is split into front matter and body, the body goes through
//! markdown-rs, HTML nodes through lol_html, and comment or front matter
//! bodies through the failsafe YAML adapter. Each sub-parser reports offsets
//! relative to the slice it was given; those are summed back into document
//! offsets before anything is resolved to a position:
//!
//! ```text
//! document offset = body offset + node offset + comment offset + padding + YAML offset
//! ```

use crate::DeckError;
use crate::document::{SourceRange, Span, TextDocument};
use crate::events::{
    CommentEvent, DirectiveEvent, DirectiveListener, EventLog, FrontMatterEvent, ImageEvent,
    MathEvent, ParseEvent, RangedText,
};
use crate::frontmatter::find_front_matter;
use crate::html::{find_comments, strip_comment_padding};
use crate::math::{MathKind, classify_math_span};
use crate::parse::{ParseOptions, parse_mdast};
use crate::registry::{DefinedIn, Registry};
use crate::yaml::{YamlItem, YamlNode, parse_failsafe};
use markdown::mdast::Node;

/// Drives a single parse pass and fans its events out to listeners.
///
/// A parser is used once: subscribe listeners, call [`parse`](Self::parse),
/// then read results from the listeners.
pub struct DirectiveParser<'l> {
    registry: &'l Registry,
    options: ParseOptions,
    listeners: Vec<&'l mut dyn DirectiveListener>,
}

impl<'l> DirectiveParser<'l> {
    /// Parser over the built-in registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::builtin())
    }

    /// Parser over a custom registry.
    pub fn with_registry(registry: &'l Registry) -> Self {
        Self {
            registry,
            options: ParseOptions::slide_deck(),
            listeners: Vec::new(),
        }
    }

    /// Adds a listener for the pass.
    pub fn subscribe(&mut self, listener: &'l mut dyn DirectiveListener) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    /// Runs the pass over `document`.
    ///
    /// Malformed YAML is not an error; Markdown or HTML parser failures are.
    pub fn parse<D>(mut self, document: &D) -> Result<(), DeckError>
    where
        D: TextDocument + ?Sized,
    {
        let mut pass = Pass {
            document,
            text: document.text(),
            registry: self.registry,
            options: self.options,
            listeners: &mut self.listeners,
        };
        pass.run()
    }
}

impl Default for DirectiveParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `document` and returns every event of the pass.
pub fn collect_events<D>(document: &D) -> Result<Vec<ParseEvent>, DeckError>
where
    D: TextDocument + ?Sized,
{
    let mut log = EventLog::new();
    let mut parser = DirectiveParser::new();
    parser.subscribe(&mut log);
    parser.parse(document)?;
    Ok(log.into_events())
}

struct Pass<'p, 'l, D: ?Sized> {
    document: &'p D,
    text: &'p str,
    registry: &'l Registry,
    options: ParseOptions,
    listeners: &'p mut Vec<&'l mut dyn DirectiveListener>,
}

impl<D> Pass<'_, '_, D>
where
    D: TextDocument + ?Sized,
{
    fn run(&mut self) -> Result<(), DeckError> {
        self.emit(ParseEvent::StartParse);

        let text = self.text;
        let mut body_offset = 0;
        if let Some(block) = find_front_matter(text) {
            let body = &text[block.body.start..block.body.end];
            self.emit(ParseEvent::FrontMatter(FrontMatterEvent {
                range: self.range(block.span),
                body: body.to_string(),
                body_range: self.range(block.body),
            }));
            self.emit_directives(block.body.start, body, DefinedIn::FrontMatter);
            body_offset = block.span.end;
        }

        let body = &text[body_offset..];
        let root = parse_mdast(body, &self.options)?;
        self.visit(&root, body_offset)?;

        self.emit(ParseEvent::EndParse);
        Ok(())
    }

    fn visit(&mut self, node: &Node, body_offset: usize) -> Result<(), DeckError> {
        let text = self.text;
        let span = node.position().map(|position| {
            Span::new(position.start.offset, position.end.offset).shift(body_offset)
        });

        match (node, span) {
            (Node::Html(_), Some(span)) => self.visit_html(span)?,
            (Node::Image(image), Some(span)) => {
                self.emit(ParseEvent::Image(ImageEvent {
                    url: image.url.clone(),
                    alt: image.alt.clone(),
                    title: image.title.clone(),
                    body: text[span.start..span.end].to_string(),
                    range: self.range(span),
                }));
            }
            (Node::Math(_), Some(span)) => self.emit_math(MathKind::Block, span),
            (Node::InlineMath(_), Some(span)) => {
                let raw = &text[span.start..span.end];
                match classify_math_span(raw, &text[span.end..]) {
                    Some(kind) => self.emit_math(kind, span),
                    None => log::debug!("rejected math span {raw:?}"),
                }
            }
            _ => {}
        }

        for child in node.children().into_iter().flatten() {
            self.visit(child, body_offset)?;
        }
        Ok(())
    }

    fn visit_html(&mut self, node_span: Span) -> Result<(), DeckError> {
        let text = self.text;
        let fragment = &text[node_span.start..node_span.end];
        for comment in find_comments(fragment)? {
            let content_span = comment.content.shift(node_span.start);
            let content = &text[content_span.start..content_span.end];
            let (padding, body) = strip_comment_padding(content);
            let body_start = content_span.start + padding;
            let body_span = Span::new(body_start, body_start + body.len());

            self.emit(ParseEvent::Comment(CommentEvent {
                range: self.range(comment.span.shift(node_span.start)),
                content_range: self.range(content_span),
                body: body.to_string(),
                body_range: self.range(body_span),
            }));
            self.emit_directives(body_start, body, DefinedIn::Comment);
        }
        Ok(())
    }

    fn emit_directives(&mut self, offset: usize, source: &str, context: DefinedIn) {
        let pairs = match parse_failsafe(source) {
            YamlNode::Mapping(pairs) => pairs,
            YamlNode::Scalar(_) | YamlNode::Sequence(_) => {
                log::debug!("{context:?} body is not a mapping; no directives");
                return;
            }
            YamlNode::Error(err) => {
                log::debug!("{context:?} body is not valid YAML: {err}");
                return;
            }
        };

        for pair in pairs {
            let found = self.registry.lookup(&pair.key.text, context);
            let event = DirectiveEvent {
                definition: found.map(|m| m.definition),
                key: self.ranged(pair.key, offset),
                value: pair.value.map(|value| self.ranged(value, offset)),
                scoped: found.is_some_and(|m| m.scoped),
                defined_in: context,
            };
            self.emit(ParseEvent::Directive(event));
        }
    }

    fn emit_math(&mut self, kind: MathKind, span: Span) {
        let text = self.text;
        self.emit(ParseEvent::MaybeMath(MathEvent {
            kind,
            body: text[span.start..span.end].to_string(),
            range: self.range(span),
        }));
    }

    fn ranged(&self, item: YamlItem, offset: usize) -> RangedText {
        RangedText {
            text: item.text,
            range: self.range(item.span.shift(offset)),
        }
    }

    fn range(&self, span: Span) -> SourceRange {
        let len = self.text.len();
        debug_assert!(
            span.start <= span.end && span.end <= len,
            "span {span:?} outside document of length {len}"
        );
        if span.end > len || span.start > span.end {
            log::warn!("clamping span {span:?} to document length {len}");
        }
        let end = span.end.min(len);
        self.document.range_of(Span::new(span.start.min(end), end))
    }

    fn emit(&mut self, event: ParseEvent) {
        log::trace!("emit {event:?}");
        for listener in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Position, SourceDocument};

    fn events(text: &str) -> Vec<ParseEvent> {
        collect_events(&SourceDocument::new(text)).unwrap()
    }

    fn directives(text: &str) -> Vec<DirectiveEvent> {
        events(text)
            .into_iter()
            .filter_map(|event| match event {
                ParseEvent::Directive(directive) => Some(directive),
                _ => None,
            })
            .collect()
    }

    fn kinds(text: &str) -> Vec<&'static str> {
        events(text)
            .iter()
            .map(|event| match event {
                ParseEvent::StartParse => "start",
                ParseEvent::FrontMatter(_) => "frontMatter",
                ParseEvent::Comment(_) => "comment",
                ParseEvent::Directive(_) => "directive",
                ParseEvent::Image(_) => "image",
                ParseEvent::MaybeMath(_) => "math",
                ParseEvent::EndParse => "end",
            })
            .collect()
    }

    #[test]
    fn empty_document_emits_start_and_end() {
        assert_eq!(kinds(""), ["start", "end"]);
    }

    #[test]
    fn emits_events_in_document_order() {
        let text = "---\nmarp: true\n---\n\n<!-- _class: lead -->\n\n![bg](a.png) $x$\n";
        assert_eq!(
            kinds(text),
            ["start", "frontMatter", "directive", "comment", "directive", "image", "math", "end"]
        );
    }

    #[test]
    fn front_matter_directive_ranges() {
        let found = directives("---\ntheme: gaia\n---\n");
        assert_eq!(found.len(), 1);
        let theme = &found[0];
        assert_eq!(theme.name(), Some("theme"));
        assert_eq!(theme.defined_in, DefinedIn::FrontMatter);
        assert_eq!(theme.key.range.start, Position::new(1, 0));
        assert_eq!(theme.key.range.end, Position::new(1, 5));
        let value = theme.value.as_ref().unwrap();
        assert_eq!(value.text, "gaia");
        assert_eq!(value.range.start, Position::new(1, 7));
        assert_eq!(value.range.end, Position::new(1, 11));
    }

    #[test]
    fn unknown_keys_are_still_reported() {
        let found = directives("<!-- foo: bar -->");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].definition, None);
        assert_eq!(found[0].key.text, "foo");
        assert!(!found[0].scoped);
    }

    #[test]
    fn scoped_alias_is_flagged() {
        let found = directives("<!-- _paginate: false -->");
        assert_eq!(found[0].name(), Some("paginate"));
        assert!(found[0].scoped);
        assert_eq!(found[0].key.text, "_paginate");
    }

    #[test]
    fn non_mapping_comments_yield_no_directives() {
        assert_eq!(kinds("<!-- just a note -->"), ["start", "comment", "end"]);
        assert_eq!(kinds("<!-- a: [broken -->"), ["start", "comment", "end"]);
        assert_eq!(kinds("<!-- - a\n- b -->"), ["start", "comment", "end"]);
    }

    #[test]
    fn comment_event_carries_stripped_body() {
        let text = "<!--\n  theme: gaia\n-->";
        let comment = events(text)
            .into_iter()
            .find_map(|event| match event {
                ParseEvent::Comment(comment) => Some(comment),
                _ => None,
            })
            .unwrap();
        assert_eq!(comment.body, "theme: gaia");
        assert_eq!(comment.range.start, Position::new(0, 0));
        assert_eq!(comment.range.end, Position::new(2, 3));
        assert_eq!(comment.body_range.start, Position::new(1, 2));

        let theme = &directives(text)[0];
        assert_eq!(theme.key.range.start, Position::new(1, 2));
        assert_eq!(theme.key.range.end, Position::new(1, 7));
    }

    #[test]
    fn marp_is_not_recognised_in_comments() {
        let found = directives("<!-- marp: true -->");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].definition, None);
    }

    #[test]
    fn image_event_payload() {
        let found: Vec<_> = events("![bg](red \"Title\")")
            .into_iter()
            .filter_map(|event| match event {
                ParseEvent::Image(image) => Some(image),
                _ => None,
            })
            .collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "red");
        assert_eq!(found[0].alt, "bg");
        assert_eq!(found[0].title.as_deref(), Some("Title"));
        assert_eq!(found[0].body, "![bg](red \"Title\")");
    }

    #[test]
    fn propagates_listener_to_every_subscriber() {
        let doc = SourceDocument::new("<!-- theme: gaia -->");
        let mut first = EventLog::new();
        let mut second = EventLog::new();
        let mut parser = DirectiveParser::new();
        parser.subscribe(&mut first).subscribe(&mut second);
        parser.parse(&doc).unwrap();
        assert!(first.is_sealed());
        assert_eq!(first.events(), second.events());
    }
}
