//! Types for sdocs-commonmark public API and internal use.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An entry in a document's table of contents.
///
/// `id` is the exact `id` attribute written onto the matching heading element
/// in the rendered HTML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TocItem {
  /// Anchor id of the heading.
  pub id:    String,
  /// Visible heading text, without markup.
  pub text:  String,
  /// Heading level, either 2 or 3.
  pub level: u8,
}

/// Result of rendering a markdown body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML output.
  pub html: String,

  /// Level 2 and 3 headings, in document order.
  pub toc: Vec<TocItem>,

  /// Text of the first level 1 heading, if any.
  pub title: Option<String>,
}

/// A fully rendered document: HTML body, table of contents, frontmatter and
/// resolved title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedDoc {
  pub html:  String,
  pub toc:   Vec<TocItem>,
  pub meta:  Map<String, Value>,
  pub title: String,
}
