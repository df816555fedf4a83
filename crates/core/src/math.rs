//! Math span validation.
//!
//! markdown-rs accepts any `$...$` pair as inline math. The slide renderer
//! follows Pandoc's stricter dialect, so inline spans are filtered here:
//!
//! - no whitespace right after the opening `$`
//! - no whitespace right before the closing `$`
//! - no digit right after the closing `$`, unless that `$` is escaped
//!
//! `$$` spans are display math and always accepted.

use serde::Serialize;

/// Inline or display math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MathKind {
    /// Single-dollar span.
    Inline,
    /// Double-dollar span or math block.
    Block,
}

/// Classifies a math span written as `raw`.
///
/// `following` is the document text right after the span. Returns `None`
/// when the renderer would not treat the span as math.
pub fn classify_math_span(raw: &str, following: &str) -> Option<MathKind> {
    let mut chars = raw.chars();
    if chars.next() != Some('$') {
        return None;
    }
    if chars.next() == Some('$') {
        return Some(MathKind::Block);
    }

    let inner = raw.strip_prefix('$')?.strip_suffix('$')?;
    let first = inner.chars().next()?;
    let last = inner.chars().next_back()?;

    if first.is_whitespace() || last.is_whitespace() {
        return None;
    }
    if last != '\\' && following.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some(MathKind::Inline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_inline_math() {
        assert_eq!(classify_math_span("$a=1+2$", ""), Some(MathKind::Inline));
        assert_eq!(classify_math_span("$1 *i* 1$", " bar"), Some(MathKind::Inline));
    }

    #[test]
    fn rejects_padding_inside_delimiters() {
        assert_eq!(classify_math_span("$ a$", ""), None);
        assert_eq!(classify_math_span("$a $", ""), None);
        assert_eq!(classify_math_span("$a\n$", ""), None);
    }

    #[test]
    fn rejects_trailing_digit() {
        assert_eq!(classify_math_span("$20,000 and USD$", "30,000"), None);
        assert_eq!(classify_math_span("$a$", "1"), None);
        assert_eq!(classify_math_span("$a$", "x1"), Some(MathKind::Inline));
    }

    #[test]
    fn escaped_closing_allows_trailing_digit() {
        assert_eq!(classify_math_span("$a\\$", "1"), Some(MathKind::Inline));
    }

    #[test]
    fn double_dollar_is_never_rejected() {
        assert_eq!(classify_math_span("$$ a $$", "1"), Some(MathKind::Block));
        assert_eq!(classify_math_span("$$\n1+1 = 2\n$$", ""), Some(MathKind::Block));
    }

    #[test]
    fn rejects_non_math_text() {
        assert_eq!(classify_math_span("a$", ""), None);
        assert_eq!(classify_math_span("$", ""), None);
    }
}
