//! Catalogue of known directives.
//!
//! Entries are immutable `'static` records. Whether an occurrence used the
//! scoped `_` alias is reported in a separate [`RegistryMatch`] rather than
//! on the definition itself.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Whether a directive applies to the whole deck or to individual slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectiveScope {
    /// Applies to the whole document.
    Global,
    /// Applies per slide; accepts the scoped `_` alias.
    Local,
}

impl DirectiveScope {
    /// Lowercase label used in user-facing text.
    pub fn label(self) -> &'static str {
        match self {
            DirectiveScope::Global => "global",
            DirectiveScope::Local => "local",
        }
    }
}

/// Where a directive assignment was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DefinedIn {
    /// YAML front matter at the top of the document.
    FrontMatter,
    /// An HTML comment in the Markdown body.
    Comment,
}

/// Who implements a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProvidedBy {
    /// The Marpit framework.
    Marpit,
    /// Marp Core, on top of Marpit.
    #[serde(rename = "Marp Core")]
    MarpCore,
    /// Metadata options understood by Marp CLI.
    #[serde(rename = "Marp CLI")]
    MarpCli,
    /// The editor integration itself.
    #[serde(rename = "Marp for VS Code")]
    Editor,
}

impl ProvidedBy {
    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            ProvidedBy::Marpit => "Marpit",
            ProvidedBy::MarpCore => "Marp Core",
            ProvidedBy::MarpCli => "Marp CLI",
            ProvidedBy::Editor => "Marp for VS Code",
        }
    }
}

/// A known directive.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveDefinition {
    /// Directive name as written in YAML.
    pub name: &'static str,
    /// Global or local.
    pub scope: DirectiveScope,
    /// Contexts the directive may be defined in.
    pub allowed: &'static [DefinedIn],
    /// Attribution.
    pub provided_by: ProvidedBy,
    /// Markdown description shown on hover.
    pub description: &'static str,
    /// Link to the reference documentation.
    pub details_url: &'static str,
    /// Whether values are offered by completion.
    pub completable: bool,
}

impl DirectiveDefinition {
    /// Whether the directive may be defined in `context`.
    pub fn allows(&self, context: DefinedIn) -> bool {
        self.allowed.contains(&context)
    }

    /// Whether the directive is global.
    pub fn is_global(&self) -> bool {
        self.scope == DirectiveScope::Global
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryMatch {
    /// Matched definition.
    pub definition: &'static DirectiveDefinition,
    /// Whether the key used the `_` scoped alias.
    pub scoped: bool,
}

const ANYWHERE: &[DefinedIn] = &[DefinedIn::FrontMatter, DefinedIn::Comment];
const FRONT_MATTER_ONLY: &[DefinedIn] = &[DefinedIn::FrontMatter];

const MARPIT_GLOBAL: &str = "https://marpit.marp.app/directives?id=global-directives";
const MARPIT_LOCAL: &str = "https://marpit.marp.app/directives?id=local-directives";
const MARPIT_BACKGROUNDS: &str = "https://marpit.marp.app/directives?id=backgrounds";
const MARP_CLI_METADATA: &str = "https://github.com/marp-team/marp-cli#metadata";

const fn global(
    name: &'static str,
    provided_by: ProvidedBy,
    description: &'static str,
    details_url: &'static str,
) -> DirectiveDefinition {
    DirectiveDefinition {
        name,
        scope: DirectiveScope::Global,
        allowed: ANYWHERE,
        provided_by,
        description,
        details_url,
        completable: false,
    }
}

const fn local(
    name: &'static str,
    description: &'static str,
    details_url: &'static str,
) -> DirectiveDefinition {
    DirectiveDefinition {
        name,
        scope: DirectiveScope::Local,
        allowed: ANYWHERE,
        provided_by: ProvidedBy::Marpit,
        description,
        details_url,
        completable: false,
    }
}

const fn completable(mut definition: DirectiveDefinition) -> DirectiveDefinition {
    definition.completable = true;
    definition
}

/// Built-in directive definitions.
pub static BUILTIN_DIRECTIVES: &[DirectiveDefinition] = &[
    DirectiveDefinition {
        name: "marp",
        scope: DirectiveScope::Global,
        allowed: FRONT_MATTER_ONLY,
        provided_by: ProvidedBy::Editor,
        description: "Set whether or not to enable slide deck features for the Markdown document.",
        details_url: "https://github.com/marp-team/marp-vscode#usage",
        completable: true,
    },
    completable(global(
        "theme",
        ProvidedBy::Marpit,
        "Set a theme name of the slide deck.\n\nYou can choose from built-in themes (`default`, `gaia`, `uncover`) or custom themes.",
        "https://marpit.marp.app/directives?id=theme",
    )),
    global(
        "style",
        ProvidedBy::Marpit,
        "Specify CSS for tweaking theme.",
        "https://marpit.marp.app/theme-css?id=tweak-style-through-markdown",
    ),
    global(
        "headingDivider",
        ProvidedBy::Marpit,
        "Specify heading divider option.\n\nYou may split slides by headings at the beginning of the specified level or higher.",
        "https://marpit.marp.app/directives?id=heading-divider",
    ),
    global(
        "lang",
        ProvidedBy::Marpit,
        "Set the value of `lang` attribute for each slide.",
        MARPIT_GLOBAL,
    ),
    completable(global(
        "size",
        ProvidedBy::MarpCore,
        "Choose the slide size preset provided by theme.\n\nBuilt-in themes provide `16:9` and `4:3`.",
        "https://github.com/marp-team/marp-core#size-global-directive",
    )),
    completable(global(
        "math",
        ProvidedBy::MarpCore,
        "Choose a library to render math typesetting in the current Markdown: `mathjax` or `katex`.",
        "https://github.com/marp-team/marp-core#math-global-directive",
    )),
    global(
        "title",
        ProvidedBy::MarpCli,
        "Set a title of the slide deck.",
        MARP_CLI_METADATA,
    ),
    global(
        "description",
        ProvidedBy::MarpCli,
        "Set a description of the slide deck.",
        MARP_CLI_METADATA,
    ),
    global(
        "author",
        ProvidedBy::MarpCli,
        "Set an author of the slide deck.",
        MARP_CLI_METADATA,
    ),
    global(
        "keywords",
        ProvidedBy::MarpCli,
        "Set comma-separated keywords for the slide deck.",
        MARP_CLI_METADATA,
    ),
    global(
        "url",
        ProvidedBy::MarpCli,
        "Set canonical URL for the slide deck.",
        MARP_CLI_METADATA,
    ),
    global(
        "image",
        ProvidedBy::MarpCli,
        "Set Open Graph image URL.",
        MARP_CLI_METADATA,
    ),
    completable(local(
        "paginate",
        "Show page number on the slide if set `true`. `hold` and `skip` keep or skip incrementing the page number.",
        "https://marpit.marp.app/directives?id=pagination",
    )),
    local(
        "header",
        "Specify the content of slide header.",
        "https://marpit.marp.app/directives?id=header-and-footer",
    ),
    local(
        "footer",
        "Specify the content of slide footer.",
        "https://marpit.marp.app/directives?id=header-and-footer",
    ),
    local(
        "class",
        "Specify HTML class of the slide element.",
        MARPIT_LOCAL,
    ),
    local(
        "backgroundColor",
        "Set `background-color` style of the slide.",
        MARPIT_BACKGROUNDS,
    ),
    local(
        "backgroundImage",
        "Set `background-image` style of the slide.",
        MARPIT_BACKGROUNDS,
    ),
    local(
        "backgroundPosition",
        "Set `background-position` style of the slide.",
        MARPIT_BACKGROUNDS,
    ),
    local(
        "backgroundRepeat",
        "Set `background-repeat` style of the slide.",
        MARPIT_BACKGROUNDS,
    ),
    local(
        "backgroundSize",
        "Set `background-size` style of the slide.",
        MARPIT_BACKGROUNDS,
    ),
    local("color", "Set `color` style of the slide.", MARPIT_LOCAL),
];

/// Read-only lookup table over a set of directive definitions.
#[derive(Debug)]
pub struct Registry {
    definitions: &'static [DirectiveDefinition],
    by_name: HashMap<&'static str, &'static DirectiveDefinition>,
}

static BUILTIN: Lazy<Registry> = Lazy::new(|| Registry::new(BUILTIN_DIRECTIVES));

impl Registry {
    /// Builds a registry. Definition names must be unique.
    pub fn new(definitions: &'static [DirectiveDefinition]) -> Self {
        let by_name: HashMap<_, _> = definitions.iter().map(|def| (def.name, def)).collect();
        debug_assert_eq!(
            by_name.len(),
            definitions.len(),
            "duplicate directive names in registry"
        );
        Self {
            definitions,
            by_name,
        }
    }

    /// The built-in registry.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    /// All definitions in declaration order.
    pub fn definitions(&self) -> &'static [DirectiveDefinition] {
        self.definitions
    }

    /// Finds a definition by exact name, ignoring context.
    pub fn get(&self, name: &str) -> Option<&'static DirectiveDefinition> {
        self.by_name.get(name).copied()
    }

    /// Matches a YAML key written in `context`.
    ///
    /// An exact name wins; otherwise a local directive matches its `_` alias
    /// and the match is marked scoped.
    pub fn lookup(&self, candidate: &str, context: DefinedIn) -> Option<RegistryMatch> {
        if let Some(definition) = self.get(candidate)
            && definition.allows(context)
        {
            return Some(RegistryMatch {
                definition,
                scoped: false,
            });
        }

        let name = candidate.strip_prefix('_')?;
        let definition = self.get(name)?;
        (definition.scope == DirectiveScope::Local && definition.allows(context)).then_some(
            RegistryMatch {
                definition,
                scoped: true,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_names_are_unique() {
        let names: HashSet<_> = BUILTIN_DIRECTIVES.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), BUILTIN_DIRECTIVES.len());
    }

    #[test]
    fn exact_match_is_not_scoped() {
        let found = Registry::builtin()
            .lookup("paginate", DefinedIn::Comment)
            .unwrap();
        assert_eq!(found.definition.name, "paginate");
        assert!(!found.scoped);
    }

    #[test]
    fn local_directive_matches_scoped_alias() {
        let found = Registry::builtin()
            .lookup("_paginate", DefinedIn::Comment)
            .unwrap();
        assert_eq!(found.definition.name, "paginate");
        assert!(found.scoped);

        let found = Registry::builtin()
            .lookup("_backgroundColor", DefinedIn::FrontMatter)
            .unwrap();
        assert!(found.scoped);
    }

    #[test]
    fn global_directive_never_matches_scoped_alias() {
        assert!(Registry::builtin().lookup("_theme", DefinedIn::Comment).is_none());
        assert!(
            Registry::builtin()
                .lookup("_size", DefinedIn::FrontMatter)
                .is_none()
        );
    }

    #[test]
    fn respects_allowed_contexts() {
        let registry = Registry::builtin();
        assert!(registry.lookup("marp", DefinedIn::FrontMatter).is_some());
        assert!(registry.lookup("marp", DefinedIn::Comment).is_none());
    }

    #[test]
    fn only_one_underscore_is_stripped() {
        assert!(Registry::builtin().lookup("__class", DefinedIn::Comment).is_none());
    }

    #[test]
    fn unknown_names_do_not_match() {
        assert!(Registry::builtin().lookup("themes", DefinedIn::Comment).is_none());
        assert!(Registry::builtin().lookup("", DefinedIn::Comment).is_none());
    }

    #[test]
    fn completable_flags() {
        let completable: Vec<_> = BUILTIN_DIRECTIVES
            .iter()
            .filter(|d| d.completable)
            .map(|d| d.name)
            .collect();
        assert_eq!(completable, ["marp", "theme", "size", "math", "paginate"]);
    }
}
