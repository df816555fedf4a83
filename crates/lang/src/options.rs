//! Language service configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Themes bundled with the slide renderer.
pub const BUILTIN_THEMES: &[&str] = &["default", "gaia", "uncover"];

/// Slide size presets every built-in theme provides.
pub const BUILTIN_SIZES: &[&str] = &["16:9", "4:3"];

/// Values accepted by the `math` global directive.
pub const MATH_LIBRARIES: &[&str] = &["katex", "mathjax"];

/// Which math typesetter the renderer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathTypesetting {
    /// Math syntax is left as plain text.
    Off,
    /// KaTeX.
    #[default]
    Katex,
    /// MathJax.
    Mathjax,
}

/// Options supplied by the editor host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOptions {
    /// Custom theme names on top of the built-ins.
    #[serde(default)]
    pub themes: Vec<String>,
    /// Custom size presets on top of the built-ins.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Math typesetting mode.
    #[serde(default)]
    pub math_typesetting: MathTypesetting,
    /// Master switch for diagnostics.
    #[serde(default = "default_diagnostics")]
    pub diagnostics: bool,
}

fn default_diagnostics() -> bool {
    true
}

impl Default for LanguageOptions {
    fn default() -> Self {
        Self {
            themes: Vec::new(),
            sizes: Vec::new(),
            math_typesetting: MathTypesetting::default(),
            diagnostics: default_diagnostics(),
        }
    }
}

impl LanguageOptions {
    /// Derives the lookup sets consumers work with.
    pub fn resolve(&self) -> ResolvedOptions {
        let themes = BUILTIN_THEMES
            .iter()
            .map(|theme| theme.to_string())
            .chain(self.themes.iter().map(|theme| theme.trim().to_string()))
            .filter(|theme| !theme.is_empty())
            .collect();
        let sizes = BUILTIN_SIZES
            .iter()
            .map(|size| size.to_string())
            .chain(self.sizes.iter().map(|size| size.trim().to_string()))
            .filter(|size| !size.is_empty())
            .collect();

        ResolvedOptions {
            themes,
            sizes,
            math_typesetting: self.math_typesetting,
            diagnostics: self.diagnostics,
        }
    }
}

/// Options with theme and size sets materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    themes: BTreeSet<String>,
    sizes: BTreeSet<String>,
    /// Math typesetting mode.
    pub math_typesetting: MathTypesetting,
    /// Master switch for diagnostics.
    pub diagnostics: bool,
}

impl ResolvedOptions {
    /// Whether `name` is a known theme.
    pub fn has_theme(&self, name: &str) -> bool {
        self.themes.contains(name)
    }

    /// Whether `name` is a known size preset.
    pub fn has_size(&self, name: &str) -> bool {
        self.sizes.contains(name)
    }

    /// Known themes in sorted order.
    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(String::as_str)
    }

    /// Known size presets in sorted order.
    pub fn sizes(&self) -> impl Iterator<Item = &str> {
        self.sizes.iter().map(String::as_str)
    }
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        LanguageOptions::default().resolve()
    }
}

/// Memoizes [`ResolvedOptions`] until the options change.
///
/// Every change bumps the generation; the resolved value is rebuilt lazily
/// the next time it is requested.
#[derive(Debug, Default)]
pub struct OptionsCache {
    options: LanguageOptions,
    generation: u64,
    resolved: Option<(u64, Arc<ResolvedOptions>)>,
}

impl OptionsCache {
    /// Cache over `options`.
    pub fn new(options: LanguageOptions) -> Self {
        Self {
            options,
            generation: 0,
            resolved: None,
        }
    }

    /// Current raw options.
    pub fn options(&self) -> &LanguageOptions {
        &self.options
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the options.
    pub fn set(&mut self, options: LanguageOptions) {
        self.options = options;
        self.invalidate();
    }

    /// Drops the memoized value, e.g. after a theme file was added.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        log::debug!("options cache invalidated (generation {})", self.generation);
    }

    /// Resolved options for the current generation.
    pub fn resolved(&mut self) -> Arc<ResolvedOptions> {
        if let Some((generation, resolved)) = &self.resolved
            && *generation == self.generation
        {
            return Arc::clone(resolved);
        }
        let resolved = Arc::new(self.options.resolve());
        self.resolved = Some((self.generation, Arc::clone(&resolved)));
        resolved
    }
}
