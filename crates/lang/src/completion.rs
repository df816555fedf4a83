//! Directive key and value completion.
//!
//! Completion only runs inside front matter or an HTML comment. The text
//! between the start of the line (or the region, whichever is later) and the
//! cursor decides what is offered: a bare word completes keys, `key: ...`
//! completes values of completable directives.

use crate::options::{MATH_LIBRARIES, ResolvedOptions};
use deckscan_core::{
    DeckError, DefinedIn, DirectiveDefinition, DirectiveParser, DirectiveScope, EventLog,
    ParseEvent, Position, Registry, SourceRange, Span, TextDocument,
};
use serde::Serialize;

/// What a completion item inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionKind {
    /// A directive key.
    Property,
    /// A directive value.
    Value,
}

/// One completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    /// Text shown in the list.
    pub label: String,
    /// Key or value.
    pub kind: CompletionKind,
    /// Short annotation next to the label.
    pub detail: Option<String>,
    /// Markdown documentation.
    pub documentation: Option<String>,
    /// Text inserted on accept.
    pub insert_text: String,
    /// Range replaced on accept.
    pub range: SourceRange,
}

const PAGINATE_VALUES: &[&str] = &["true", "false", "hold", "skip"];
const BOOLEAN_VALUES: &[&str] = &["true", "false"];

/// Suggestions for `position`, empty outside front matter and comments.
pub fn complete<D>(
    document: &D,
    position: Position,
    options: &ResolvedOptions,
) -> Result<Vec<CompletionItem>, DeckError>
where
    D: TextDocument + ?Sized,
{
    let mut log = EventLog::new();
    let mut parser = DirectiveParser::new();
    parser.subscribe(&mut log);
    parser.parse(document)?;

    let Some((context, region)) = region_at(log.events(), position) else {
        return Ok(Vec::new());
    };

    let text = document.text();
    let offset = document.offset_at(position);
    let line_start = document
        .offset_at(Position::new(position.line, 0))
        .max(region.start);
    if line_start > offset {
        return Ok(Vec::new());
    }
    let prefix = text[line_start..offset].trim_start();

    let items = match prefix.split_once(':') {
        Some((key, value)) => {
            let value = value.trim_start();
            let range = document.range_of(Span::new(offset - value.len(), offset));
            value_items(key.trim(), context, options, range)
        }
        None if prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') => {
            let range = document.range_of(Span::new(offset - prefix.len(), offset));
            key_items(context, range)
        }
        None => Vec::new(),
    };
    log::trace!("{} completion items at {:?}", items.len(), position);
    Ok(items)
}

fn region_at(events: &[ParseEvent], position: Position) -> Option<(DefinedIn, Span)> {
    events.iter().find_map(|event| match event {
        ParseEvent::FrontMatter(fm) if fm.body_range.contains(position) => {
            Some((DefinedIn::FrontMatter, fm.body_range.span))
        }
        ParseEvent::Comment(comment) if comment.content_range.contains(position) => {
            Some((DefinedIn::Comment, comment.content_range.span))
        }
        _ => None,
    })
}

fn key_items(context: DefinedIn, range: SourceRange) -> Vec<CompletionItem> {
    let definitions = Registry::builtin()
        .definitions()
        .iter()
        .filter(|definition| definition.allows(context));

    let mut items: Vec<_> = definitions
        .clone()
        .map(|definition| key_item(definition, definition.name.to_string(), range))
        .collect();
    items.extend(
        definitions
            .filter(|definition| definition.scope == DirectiveScope::Local)
            .map(|definition| key_item(definition, format!("_{}", definition.name), range)),
    );
    items
}

fn key_item(definition: &DirectiveDefinition, label: String, range: SourceRange) -> CompletionItem {
    let scoped = label.starts_with('_');
    CompletionItem {
        insert_text: format!("{label}: "),
        label,
        kind: CompletionKind::Property,
        detail: Some(if scoped {
            "local directive (scoped)".to_string()
        } else {
            format!("{} directive", definition.scope.label())
        }),
        documentation: Some(definition.description.to_string()),
        range,
    }
}

fn value_items(
    key: &str,
    context: DefinedIn,
    options: &ResolvedOptions,
    range: SourceRange,
) -> Vec<CompletionItem> {
    let Some(found) = Registry::builtin().lookup(key, context) else {
        return Vec::new();
    };
    if !found.definition.completable {
        return Vec::new();
    }

    let values: Vec<&str> = match found.definition.name {
        "theme" => options.themes().collect(),
        "size" => options.sizes().collect(),
        "math" => MATH_LIBRARIES.to_vec(),
        "paginate" => PAGINATE_VALUES.to_vec(),
        "marp" => BOOLEAN_VALUES.to_vec(),
        _ => Vec::new(),
    };
    values
        .into_iter()
        .map(|value| CompletionItem {
            label: value.to_string(),
            kind: CompletionKind::Value,
            detail: Some(found.definition.name.to_string()),
            documentation: None,
            insert_text: value.to_string(),
            range,
        })
        .collect()
}
