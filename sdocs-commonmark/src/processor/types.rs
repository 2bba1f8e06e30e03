//! Type definitions for the Markdown processor.
//!
//! # Examples
//!
//! ```
//! use sdocs_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   highlight_code: false,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! let result = processor.render("## Usage\n\nRun it.");
//! assert_eq!(result.toc[0].id, "usage");
//! ```

use crate::syntax::HighlighterHandle;

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown extensions (tables, strikethrough,
  /// autolinks, task lists, footnotes).
  pub gfm: bool,

  /// Enable syntax highlighting for fenced code blocks.
  pub highlight_code: bool,

  /// Optional: Custom syntax highlighting theme name.
  pub highlight_theme: Option<String>,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:             true,
      highlight_code:  true,
      highlight_theme: None,
    }
  }
}

/// Main Markdown processor.
///
/// Cheap to clone: clones share the same highlighting engine.
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:     MarkdownOptions,
  pub(crate) highlighter: HighlighterHandle,
}
