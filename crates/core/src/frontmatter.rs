use crate::document::Span;
use crate::yaml::{YamlNode, parse_failsafe};

/// Front matter located at the very start of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatterBlock {
    /// Opening fence through the closing fence, excluding the closing newline.
    pub span: Span,
    /// YAML body between the fences.
    pub body: Span,
}

impl FrontMatterBlock {
    /// Length of the opening fence line including its newline.
    pub fn open_marker_len(&self) -> usize {
        self.body.start - self.span.start
    }
}

/// Locates front matter.
///
/// The document must start at offset 0 with a line of three or more dashes.
/// The body runs up to the first line consisting of exactly three dashes
/// (surrounding whitespace allowed). Without a closing fence there is no
/// front matter.
pub fn find_front_matter(input: &str) -> Option<FrontMatterBlock> {
    let (opening, body_start) = next_line(input, 0)?;
    if !is_opening_fence(opening) {
        return None;
    }

    let mut cursor = body_start;
    while let Some((line, next_cursor)) = next_line(input, cursor) {
        if is_closing_fence(line) {
            let fence_end = cursor + line.len();
            return Some(FrontMatterBlock {
                span: Span::new(0, fence_end),
                body: Span::new(body_start, cursor),
            });
        }
        cursor = next_cursor;
    }

    None
}

/// Whether the document opts into slide deck features with `marp: true`.
pub fn is_marp_document(input: &str) -> bool {
    let Some(block) = find_front_matter(input) else {
        return false;
    };

    match parse_failsafe(&input[block.body.start..block.body.end]) {
        YamlNode::Mapping(pairs) => pairs.iter().any(|pair| {
            pair.key.text == "marp"
                && pair
                    .value
                    .as_ref()
                    .is_some_and(|value| value.text.trim() == "true")
        }),
        YamlNode::Scalar(_) | YamlNode::Sequence(_) | YamlNode::Error(_) => false,
    }
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let bytes = &input.as_bytes()[start..];
    if let Some(pos) = bytes.iter().position(|b| *b == b'\n') {
        let line_end = start + pos;
        Some((&input[start..line_end], line_end + 1))
    } else {
        Some((&input[start..], input.len()))
    }
}

fn is_opening_fence(line: &str) -> bool {
    let fence = line.trim_end();
    fence.len() >= 3 && fence.bytes().all(|b| b == b'-')
}

fn is_closing_fence(line: &str) -> bool {
    line.trim() == "---"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(input: &str, span: Span) -> &str {
        &input[span.start..span.end]
    }

    #[test]
    fn returns_none_without_front_matter() {
        assert_eq!(find_front_matter("# Title\nBody"), None);
        assert_eq!(find_front_matter(""), None);
    }

    #[test]
    fn finds_basic_block() {
        let input = "---\ntheme: gaia\npaginate: true\n---\n# Content";
        let block = find_front_matter(input).unwrap();
        assert_eq!(slice(input, block.span), "---\ntheme: gaia\npaginate: true\n---");
        assert_eq!(slice(input, block.body), "theme: gaia\npaginate: true\n");
        assert_eq!(block.open_marker_len(), 4);
    }

    #[test]
    fn must_start_at_offset_zero() {
        assert_eq!(find_front_matter("\n---\ntheme: gaia\n---\n"), None);
        assert_eq!(find_front_matter(" ---\ntheme: gaia\n---\n"), None);
    }

    #[test]
    fn opening_fence_may_be_longer() {
        let input = "-----\ntheme: gaia\n---";
        let block = find_front_matter(input).unwrap();
        assert_eq!(block.open_marker_len(), 6);
        assert_eq!(slice(input, block.body), "theme: gaia\n");
    }

    #[test]
    fn closing_fence_is_exactly_three_dashes() {
        let input = "---\na: b\n----\nc: d\n---\nbody";
        let block = find_front_matter(input).unwrap();
        assert_eq!(slice(input, block.body), "a: b\n----\nc: d\n");
    }

    #[test]
    fn closes_at_first_fence() {
        let input = "---\na: b\n---\n---\n";
        let block = find_front_matter(input).unwrap();
        assert_eq!(slice(input, block.body), "a: b\n");
    }

    #[test]
    fn handles_empty_block() {
        let input = "---\n---\n# Body";
        let block = find_front_matter(input).unwrap();
        assert!(block.body.is_empty());
        assert_eq!(block.span, Span::new(0, 7));
    }

    #[test]
    fn handles_crlf() {
        let input = "---\r\ntheme: gaia\r\n---\r\nBody";
        let block = find_front_matter(input).unwrap();
        assert_eq!(block.open_marker_len(), 5);
        assert_eq!(slice(input, block.body), "theme: gaia\r\n");
        assert_eq!(slice(input, block.span), "---\r\ntheme: gaia\r\n---\r");
    }

    #[test]
    fn unterminated_block_is_not_front_matter() {
        assert_eq!(find_front_matter("---\ntheme: gaia"), None);
    }

    #[test]
    fn detects_marp_flag() {
        assert!(is_marp_document("---\nmarp: true\n---\n# Slide"));
        assert!(is_marp_document("---\ntheme: gaia\nmarp: true\n---"));
        assert!(!is_marp_document("---\nmarp: false\n---\n"));
        assert!(!is_marp_document("# marp: true"));
        assert!(!is_marp_document("---\nmarp: [true\n---\n"));
    }
}
