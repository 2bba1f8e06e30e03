//! Markdown processing: the [`MarkdownProcessor`] and its options.
mod anchors;
mod core;
mod types;

pub use self::{
  anchors::{AnchorRegistry, AnchoredHtml, render_anchored},
  core::FALLBACK_TITLE,
  types::{MarkdownOptions, MarkdownProcessor},
};
