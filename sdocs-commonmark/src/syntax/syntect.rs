//! Syntect-based syntax highlighting backend enhanced with two-face.
//!
//! Syntax definitions come from two-face's extended set (TOML, Dockerfile,
//! HCL and friends on top of syntect's defaults). Themes are looked up in
//! syntect's bundled set first, then in two-face's embedded themes.

use syntect::{
  highlighting::Theme,
  html::highlighted_html_for_string,
  parsing::SyntaxSet,
};
use two_face::{
  re_exports::syntect::highlighting::ThemeSet,
  theme::{EmbeddedLazyThemeSet, EmbeddedThemeName},
};

use super::{
  error::{SyntaxError, SyntaxResult},
  types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager},
};

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntect-based syntax highlighter.
///
/// Loading the syntax and theme sets is the expensive part; construct one
/// highlighter and share it (see [`HighlighterHandle`](super::HighlighterHandle)).
pub struct SyntectHighlighter {
  theme_name:      String,
  syntax_set:      SyntaxSet,
  themes:          ThemeSet,
  embedded_themes: EmbeddedLazyThemeSet,
}

impl SyntectHighlighter {
  /// Create a new Syntect highlighter with the specified theme.
  #[must_use]
  pub fn new(theme_name: Option<String>) -> Self {
    Self {
      theme_name:      theme_name.unwrap_or_else(|| DEFAULT_THEME.to_string()),
      syntax_set:      two_face::syntax::extra_newlines(),
      themes:          ThemeSet::load_defaults(),
      embedded_themes: two_face::theme::extra(),
    }
  }

  /// Get the theme by name, falling back to the configured theme and then to
  /// [`DEFAULT_THEME`].
  fn get_theme(&self, theme_name: Option<&str>) -> SyntaxResult<&Theme> {
    let name = theme_name.unwrap_or(&self.theme_name);
    if let Some(theme) = self.lookup_theme(name) {
      return Ok(theme);
    }

    log::debug!("Theme '{name}' not found, using {DEFAULT_THEME}");
    self
      .lookup_theme(DEFAULT_THEME)
      .ok_or_else(|| SyntaxError::ThemeNotFound(name.to_string()))
  }

  fn lookup_theme(&self, name: &str) -> Option<&Theme> {
    if let Some(theme) = self.themes.themes.get(name) {
      return Some(theme);
    }

    let embedded = EmbeddedLazyThemeSet::theme_names()
      .iter()
      .copied()
      .find(|theme| theme.as_name() == name)?;
    Some(self.embedded_themes.get(embedded))
  }
}

impl Default for SyntectHighlighter {
  fn default() -> Self {
    Self::new(None)
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "Syntect"
  }

  fn supports_language(&self, language: &str) -> bool {
    self.syntax_set.find_syntax_by_token(language).is_some()
  }

  fn highlight(
    &self,
    code: &str,
    language: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<String> {
    let syntax = self
      .syntax_set
      .find_syntax_by_token(language)
      .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

    let theme = self.get_theme(theme)?;

    // syntect expects every line to end in a newline
    let mut source = code.to_string();
    if !source.ends_with('\n') {
      source.push('\n');
    }

    highlighted_html_for_string(&source, &self.syntax_set, syntax, theme)
      .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))
  }
}

/// Create a Syntect-based syntax manager using `theme`, or [`DEFAULT_THEME`].
#[must_use]
pub fn create_syntect_manager(theme: Option<&str>) -> SyntaxManager {
  let theme = theme.unwrap_or(DEFAULT_THEME).to_string();
  let highlighter = Box::new(SyntectHighlighter::new(Some(theme.clone())));
  let config = SyntaxConfig {
    default_theme: Some(theme),
    ..SyntaxConfig::default()
  };
  SyntaxManager::new(highlighter, config)
}
