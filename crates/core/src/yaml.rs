//! Failsafe YAML adapter.
//!
//! serde_yaml decides whether a block is a mapping and yields the decoded
//! string values. It carries no source positions, so key and value spans
//! come from a scan of the top-level block mapping in the original text.
//! Scalars are never type-resolved: `true` or `1.0` are reported with the
//! text they were written as.

use crate::document::Span;
use serde_yaml::Value;
use std::borrow::Cow;

/// A scalar with its span relative to the parsed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlItem {
    /// Decoded text (quotes removed, block scalars folded).
    pub text: String,
    /// Span of the raw scalar in the source.
    pub span: Span,
}

/// A top-level mapping entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlPair {
    /// Mapping key.
    pub key: YamlItem,
    /// Mapping value; `None` when nothing was written after the key.
    pub value: Option<YamlItem>,
}

/// Shape of a parsed YAML block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlNode {
    /// Block mapping, with every entry whose position could be located.
    Mapping(Vec<YamlPair>),
    /// A lone scalar; empty for blank or comment-only input.
    Scalar(String),
    /// A sequence with this many items.
    Sequence(usize),
    /// The block is not valid YAML.
    Error(String),
}

/// Parses `source` without implicit typing.
///
/// Carriage returns before line breaks are removed before handing the text
/// to serde_yaml; reported spans still index into `source` as given. A key
/// repeated at the top level yields one pair per occurrence.
pub fn parse_failsafe(source: &str) -> YamlNode {
    let cleaned = strip_carriage_returns(source);
    if cleaned.trim().is_empty() {
        return YamlNode::Scalar(String::new());
    }

    let value: Value = match serde_yaml::from_str(&cleaned) {
        Ok(value) => value,
        Err(err) if is_duplicate_key(&err) => return locate_each_entry(source, err),
        Err(err) => return YamlNode::Error(err.to_string()),
    };

    classify(source, value)
}

fn is_duplicate_key(err: &serde_yaml::Error) -> bool {
    err.to_string().starts_with("duplicate entry")
}

/// Parses every top-level entry on its own, so a key written twice yields
/// one pair per occurrence with the later one last.
fn locate_each_entry(source: &str, duplicate: serde_yaml::Error) -> YamlNode {
    log::debug!("{duplicate}; parsing top-level entries one at a time");
    let mut pairs = Vec::new();
    for entry in scan_entries(source) {
        let chunk = strip_carriage_returns(&source[entry.key.start..entry.end]);
        match serde_yaml::from_str::<Value>(&chunk) {
            Ok(Value::Mapping(mapping)) => {
                pairs.extend(locate_pairs(source, vec![entry], &mapping));
            }
            Ok(other) => log::debug!("YAML entry parsed as {other:?}, not a mapping"),
            Err(err) => return YamlNode::Error(err.to_string()),
        }
    }
    if pairs.is_empty() {
        return YamlNode::Error(duplicate.to_string());
    }
    YamlNode::Mapping(pairs)
}

fn classify(source: &str, value: Value) -> YamlNode {
    match value {
        Value::Mapping(mapping) => {
            YamlNode::Mapping(locate_pairs(source, scan_entries(source), &mapping))
        }
        Value::Sequence(items) => YamlNode::Sequence(items.len()),
        Value::Tagged(tagged) => classify(source, tagged.value),
        Value::Null => YamlNode::Scalar(String::new()),
        Value::String(text) => YamlNode::Scalar(text),
        Value::Bool(_) | Value::Number(_) => YamlNode::Scalar(source.trim().to_string()),
    }
}

fn strip_carriage_returns(source: &str) -> Cow<'_, str> {
    if !source.contains('\r') {
        return Cow::Borrowed(source);
    }
    let stripped = source.replace("\r\n", "\n");
    Cow::Owned(stripped.strip_suffix('\r').unwrap_or(&stripped).to_string())
}

/// Raw position of a top-level entry found by [`scan_entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawEntry {
    key: Span,
    value: Option<Span>,
    /// End of the last line belonging to the entry, trailing comment included.
    end: usize,
}

fn locate_pairs(
    source: &str,
    entries: Vec<RawEntry>,
    mapping: &serde_yaml::Mapping,
) -> Vec<YamlPair> {
    let mut used = vec![false; mapping.len()];
    let mut pairs = Vec::with_capacity(mapping.len());

    for entry in entries {
        let key_raw = &source[entry.key.start..entry.key.end];
        let key_text = unquote(key_raw);
        // Keys are compared as resolved values; the reported text stays as written.
        let resolved = serde_yaml::from_str::<Value>(key_raw).ok();

        let Some((index, (_, value))) = mapping.iter().enumerate().find(|(i, (key, _))| {
            !used[*i]
                && match &resolved {
                    Some(resolved) => resolved == *key,
                    None => scalar_text(key) == key_text,
                }
        }) else {
            log::debug!("YAML key {key_raw:?} has no decoded counterpart");
            continue;
        };
        used[index] = true;

        let value = entry.value.map(|span| {
            let raw = &source[span.start..span.end];
            let text = match value {
                Value::String(text) => text.clone(),
                _ => raw.to_string(),
            };
            YamlItem { text, span }
        });

        pairs.push(YamlPair {
            key: YamlItem {
                text: key_text,
                span: entry.key,
            },
            value,
        });
    }

    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Null => String::new(),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => String::new(),
    }
}

fn unquote(raw: &str) -> String {
    if raw.starts_with(['"', '\''])
        && let Ok(text) = serde_yaml::from_str::<String>(raw)
    {
        return text;
    }
    raw.to_string()
}

/// Finds the key and value spans of every top-level block mapping entry.
fn scan_entries(source: &str) -> Vec<RawEntry> {
    let mut entries: Vec<RawEntry> = Vec::new();
    let mut line_start = 0;

    for raw_line in source.split_inclusive('\n') {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let content_end = line_start + line.trim_end().len();

        if line.trim().is_empty() {
            // blank
        } else if line.starts_with([' ', '\t']) {
            if let Some(entry) = entries.last_mut()
                && (is_block_scalar(source, entry) || !line.trim_start().starts_with('#'))
            {
                let indent = line.len() - line.trim_start().len();
                let start = entry.value.map_or(line_start + indent, |span| span.start);
                entry.value = Some(Span::new(start, content_end));
                entry.end = content_end;
            }
        } else if !is_structural_line(line) {
            if let Some(entry) = scan_entry_line(line) {
                entries.push(RawEntry {
                    key: entry.key.shift(line_start),
                    value: entry.value.map(|span| span.shift(line_start)),
                    end: line_start + entry.end,
                });
            }
        }

        line_start += raw_line.len();
    }

    entries
}

/// Whether the entry's value is a `|` or `>` block scalar, whose indented
/// lines are content even when they start with `#`.
fn is_block_scalar(source: &str, entry: &RawEntry) -> bool {
    entry
        .value
        .is_some_and(|span| source[span.start..span.end].starts_with(['|', '>']))
}

fn is_structural_line(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("---") || line.starts_with("...")
}

/// Parses `key: value` on a single unindented line. Spans are line-relative.
fn scan_entry_line(line: &str) -> Option<RawEntry> {
    let key_end = match *line.as_bytes().first()? {
        b'"' | b'\'' => closing_quote(line)?,
        b'[' | b'{' | b'?' | b'&' | b'*' | b'!' | b'|' | b'>' | b'%' | b'@' | b'`' => return None,
        b'-' if line.len() == 1 || line[1..].starts_with([' ', '\t']) => return None,
        _ => plain_key_end(line)?,
    };

    let after_key = &line[key_end..];
    let colon = key_end + (after_key.len() - after_key.trim_start_matches([' ', '\t']).len());
    if line.as_bytes().get(colon) != Some(&b':') {
        return None;
    }

    let key_text_end = line[..key_end].trim_end().len();
    if key_text_end == 0 {
        return None;
    }

    let rest = &line[colon + 1..];
    let value_start = colon + 1 + (rest.len() - rest.trim_start_matches([' ', '\t']).len());
    let value = value_end(&line[value_start..]).map(|len| Span::new(value_start, value_start + len));

    Some(RawEntry {
        key: Span::new(0, key_text_end),
        value,
        end: line.trim_end().len(),
    })
}

/// End of a plain key: the first `:` followed by whitespace or end of line.
fn plain_key_end(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    bytes.iter().enumerate().find_map(|(i, b)| {
        let separates = *b == b':' && matches!(bytes.get(i + 1), None | Some(b' ' | b'\t'));
        separates.then_some(i)
    })
}

/// Index just past the quote closing the scalar that starts `text`.
fn closing_quote(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let quote = *bytes.first()?;
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote == b'"' => i += 2,
            b'\'' if quote == b'\'' && bytes.get(i + 1) == Some(&b'\'') => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Length of the same-line value at the start of `text`, without a
/// trailing comment. `None` when nothing but a comment follows the key.
fn value_end(text: &str) -> Option<usize> {
    if text.is_empty() || text.starts_with('#') {
        return None;
    }
    if text.starts_with(['"', '\'']) {
        return Some(closing_quote(text).unwrap_or(text.len()));
    }

    let bytes = text.as_bytes();
    let comment = (1..bytes.len())
        .find(|&i| bytes[i] == b'#' && matches!(bytes[i - 1], b' ' | b'\t'))
        .unwrap_or(bytes.len());
    Some(text[..comment].trim_end().len())
}
