//! Hover help for directive keys.

use deckscan_core::{
    DeckError, DirectiveEvent, DirectiveListener, DirectiveParser, Position, SourceRange,
    TextDocument,
};
use serde::Serialize;

/// Hover content for a directive key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    /// Markdown shown to the user.
    pub contents: String,
    /// Range of the hovered key.
    pub range: SourceRange,
}

struct KeyAt {
    position: Position,
    found: Option<DirectiveEvent>,
}

impl DirectiveListener for KeyAt {
    fn directive(&mut self, event: &DirectiveEvent) {
        if self.found.is_none()
            && event.definition.is_some()
            && event.key.range.contains(self.position)
        {
            self.found = Some(event.clone());
        }
    }
}

/// Describes the directive whose key is at `position`, if any.
pub fn hover<D>(document: &D, position: Position) -> Result<Option<Hover>, DeckError>
where
    D: TextDocument + ?Sized,
{
    let mut key_at = KeyAt {
        position,
        found: None,
    };
    let mut parser = DirectiveParser::new();
    parser.subscribe(&mut key_at);
    parser.parse(document)?;

    Ok(key_at.found.and_then(|event| {
        let contents = render(&event)?;
        Some(Hover {
            contents,
            range: event.key.range,
        })
    }))
}

fn render(event: &DirectiveEvent) -> Option<String> {
    let definition = event.definition?;
    let mut out = format!("**{}**: {} directive", event.key.text, definition.scope.label());
    if event.scoped {
        out.push_str(" (scoped to the current slide)");
    }
    out.push_str("\n\n");
    out.push_str(definition.description);
    out.push_str(&format!(
        "\n\nProvided by {}. [Reference]({})",
        definition.provided_by.label(),
        definition.details_url
    ));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckscan_core::SourceDocument;

    fn hover_at(text: &str, line: usize, character: usize) -> Option<Hover> {
        hover(&SourceDocument::new(text), Position::new(line, character)).unwrap()
    }

    #[test]
    fn describes_global_directive() {
        let found = hover_at("---\ntitle: Deck\n---\n", 1, 2).unwrap();
        assert_eq!(found.range.start, Position::new(1, 0));
        assert_eq!(found.range.end, Position::new(1, 5));
        insta::assert_snapshot!(found.contents, @r"
        **title**: global directive

        Set a title of the slide deck.

        Provided by Marp CLI. [Reference](https://github.com/marp-team/marp-cli#metadata)
        ");
    }

    #[test]
    fn describes_scoped_local_directive() {
        let found = hover_at("<!-- _header: Intro -->", 0, 7).unwrap();
        insta::assert_snapshot!(found.contents, @r"
        **_header**: local directive (scoped to the current slide)

        Specify the content of slide header.

        Provided by Marpit. [Reference](https://marpit.marp.app/directives?id=header-and-footer)
        ");
    }

    #[test]
    fn nothing_outside_known_keys() {
        let text = "<!-- theme: gaia -->\n\n<!-- custom: 1 -->\n";
        assert!(hover_at(text, 0, 13).is_none());
        assert!(hover_at(text, 2, 6).is_none());
        assert!(hover_at(text, 1, 0).is_none());
    }

    #[test]
    fn key_end_is_inclusive() {
        assert!(hover_at("<!-- theme: gaia -->", 0, 10).is_some());
        assert!(hover_at("<!-- theme: gaia -->", 0, 4).is_none());
    }
}
