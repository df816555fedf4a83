//! Document coordinates and the host document contract.
//!
//! The parser works on byte offsets into the full document text and only
//! turns them into line/character positions through [`TextDocument::position_at`],
//! so every reported range is expressed in the host's own coordinates.

use serde::Serialize;

/// A zero-based line/character position. `character` counts UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    /// Zero-based line.
    pub line: usize,
    /// Zero-based UTF-16 column.
    pub character: usize,
}

impl Position {
    /// Creates a position.
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Half-open byte range into the full document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a span.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the span moved right by `offset` bytes.
    pub const fn shift(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Length in bytes.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is zero-length.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the span; the end offset counts as inside.
    pub const fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// A document range: resolved positions plus the byte span they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceRange {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
    /// Byte span in the document text.
    #[serde(skip)]
    pub span: Span,
}

impl SourceRange {
    /// Whether `position` lies within the range (end inclusive).
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Host document contract consumed by the parser.
pub trait TextDocument {
    /// Full document text.
    fn text(&self) -> &str;

    /// Converts a byte offset into a line/character position.
    fn position_at(&self, offset: usize) -> Position;

    /// Converts a line/character position back into a byte offset.
    fn offset_at(&self, position: Position) -> usize;

    /// Text covered by `span`.
    fn text_in(&self, span: Span) -> &str {
        &self.text()[span.start..span.end]
    }

    /// Resolves a byte span into a document range.
    fn range_of(&self, span: Span) -> SourceRange {
        SourceRange {
            start: self.position_at(span.start),
            end: self.position_at(span.end),
            span,
        }
    }
}

/// Byte offsets of every line start, used to resolve positions.
///
/// Lines are split on `\n` only; a `\r` before it belongs to the line content.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Indexes `text`.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where `line` starts, if the line exists.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Resolves `offset` against `text`, which must be the indexed text.
    pub fn position_at(&self, text: &str, offset: usize) -> Position {
        let offset = floor_char_boundary(text, offset.min(text.len()));
        let line = self.line_starts.partition_point(|start| *start <= offset) - 1;
        let line_start = self.line_starts[line];
        let character = text[line_start..offset].encode_utf16().count();
        Position { line, character }
    }

    /// Inverse of [`LineIndex::position_at`], clamped to the end of the line.
    pub fn offset_at(&self, text: &str, position: Position) -> usize {
        let Some(line_start) = self.line_start(position.line) else {
            return text.len();
        };
        let line_end = self
            .line_start(position.line + 1)
            .map(|next| next - 1)
            .unwrap_or(text.len());

        let mut units = 0;
        for (index, ch) in text[line_start..line_end].char_indices() {
            if units >= position.character {
                return line_start + index;
            }
            units += ch.len_utf16();
        }
        line_end
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// An owned text snapshot implementing [`TextDocument`].
#[derive(Debug, Clone)]
pub struct SourceDocument {
    text: String,
    index: LineIndex,
}

impl SourceDocument {
    /// Snapshots `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let index = LineIndex::new(&text);
        Self { text, index }
    }

    /// Line index of the snapshot.
    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }
}

impl TextDocument for SourceDocument {
    fn text(&self) -> &str {
        &self.text
    }

    fn position_at(&self, offset: usize) -> Position {
        self.index.position_at(&self.text, offset)
    }

    fn offset_at(&self, position: Position) -> usize {
        self.index.offset_at(&self.text, position)
    }
}
