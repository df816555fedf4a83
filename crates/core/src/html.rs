//! HTML fragment scanning for comments.
//!
//! lol_html tokenizes the fragment and reports comment text in document
//! order; each comment is then located in the fragment by walking forward
//! from the previous one, which yields spans relative to the fragment.

use crate::DeckError;
use crate::document::Span;
use lol_html::{RewriteStrSettings, doc_comments, rewrite_str};

const COMMENT_OPEN: &str = "<!--";

/// A comment found in an HTML fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlComment {
    /// `<!--` through `-->`, relative to the fragment.
    pub span: Span,
    /// Text between the delimiters, relative to the fragment.
    pub content: Span,
}

/// Finds every comment in `fragment`.
///
/// Comments inside raw text elements such as `<script>` are not comments
/// and are skipped by the tokenizer.
pub fn find_comments(fragment: &str) -> Result<Vec<HtmlComment>, DeckError> {
    if !fragment.contains(COMMENT_OPEN) {
        return Ok(Vec::new());
    }

    let mut texts: Vec<String> = Vec::new();
    rewrite_str(
        fragment,
        RewriteStrSettings {
            document_content_handlers: vec![doc_comments!(|comment| {
                texts.push(comment.text());
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;

    let mut comments = Vec::with_capacity(texts.len());
    let mut cursor = 0;
    for text in texts {
        match locate(fragment, cursor, &text) {
            Some(comment) => {
                cursor = comment.span.end;
                comments.push(comment);
            }
            None => log::warn!("could not locate HTML comment {text:?} in fragment"),
        }
    }

    Ok(comments)
}

fn locate(fragment: &str, cursor: usize, text: &str) -> Option<HtmlComment> {
    let mut search = cursor;
    loop {
        let start = search + fragment[search..].find(COMMENT_OPEN)?;
        let content_start = start + COMMENT_OPEN.len();
        if let Some(len) = matched_len(&fragment[content_start..], text) {
            let content_end = content_start + len;
            let end = content_end + closing_len(&fragment[content_end..], text.is_empty());
            return Some(HtmlComment {
                span: Span::new(start, end),
                content: Span::new(content_start, content_end),
            });
        }
        search = content_start;
    }
}

/// Length of the prefix of `haystack` equal to `text`. Carriage returns the
/// tokenizer normalized away are skipped in `haystack`.
fn matched_len(haystack: &str, text: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let mut i = 0;
    for &byte in text.as_bytes() {
        while byte != b'\r' && hay.get(i) == Some(&b'\r') {
            i += 1;
        }
        if hay.get(i) != Some(&byte) {
            return None;
        }
        i += 1;
    }
    Some(i)
}

/// Length of the delimiter closing a comment whose text ended at `rest`.
fn closing_len(rest: &str, empty: bool) -> usize {
    if rest.starts_with("-->") {
        3
    } else if rest.starts_with("--!>") {
        4
    } else if empty && rest.starts_with("->") {
        2
    } else if empty && rest.starts_with('>') {
        1
    } else {
        // unterminated: the comment runs to the end of the fragment
        rest.len()
    }
}

/// Strips the padding around a comment's text that is not part of a
/// directive body: leading dashes then whitespace, trailing whitespace then
/// dashes. Returns the number of leading bytes removed and the body.
pub fn strip_comment_padding(content: &str) -> (usize, &str) {
    let left = content.trim_start_matches('-').trim_start();
    let body = left.trim_end_matches('-').trim_end();
    (content.len() - left.len(), body)
}
