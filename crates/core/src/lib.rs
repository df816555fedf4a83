#![deny(missing_docs)]
//! deckscan core: directive discovery and range mapping for Markdown slide decks.

/// Document coordinates and the host document contract.
pub mod document;
/// Core error types.
pub mod error;
/// Parse pass events and listeners.
pub mod events;
/// Front matter detection.
pub mod frontmatter;
/// HTML comment scanning.
pub mod html;
/// Math span validation.
pub mod math;
/// Markdown parsing adapter.
pub mod parse;
/// The directive parser.
pub mod parser;
/// Directive definitions and lookup.
pub mod registry;
/// Failsafe YAML adapter.
pub mod yaml;

pub use document::{LineIndex, Position, SourceDocument, SourceRange, Span, TextDocument};
pub use error::{DeckError, SourceLocation};
pub use events::{
    CommentEvent, DirectiveEvent, DirectiveListener, EventLog, FrontMatterEvent, ImageEvent,
    MathEvent, ParseEvent, RangedText,
};
pub use frontmatter::{FrontMatterBlock, find_front_matter, is_marp_document};
pub use math::{MathKind, classify_math_span};
pub use parse::{ParseOptions, parse_mdast};
pub use parser::{DirectiveParser, collect_events};
pub use registry::{
    BUILTIN_DIRECTIVES, DefinedIn, DirectiveDefinition, DirectiveScope, ProvidedBy, Registry,
    RegistryMatch,
};
pub use yaml::{YamlItem, YamlNode, YamlPair, parse_failsafe};
