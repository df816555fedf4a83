use thiserror::Error;

/// Source location reported by a sub-parser failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that abort a parse pass.
///
/// Malformed YAML never shows up here: a comment or front matter that does
/// not hold a mapping is simply not directive content.
#[derive(Debug, Error)]
pub enum DeckError {
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Markdown parse error at {location}: {message}")]
    Markdown {
        /// Error message
        message: String,
        /// Location relative to the slice handed to the Markdown parser
        location: SourceLocation,
    },
    /// lol_html failed while scanning an HTML fragment for comments.
    #[error("HTML parse error: {0}")]
    Html(String),
    /// Internal logic error (unexpected state).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeckError {
    /// Create a Markdown error with location
    pub fn markdown(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Markdown {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }
}

impl From<lol_html::errors::RewritingError> for DeckError {
    fn from(err: lol_html::errors::RewritingError) -> Self {
        Self::Html(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_error_displays_location() {
        let err = DeckError::markdown("unexpected end", 3, 7);
        assert_eq!(
            err.to_string(),
            "Markdown parse error at 3:7: unexpected end"
        );
    }
}
