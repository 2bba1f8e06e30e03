//! # sdocs-commonmark
//!
//! Markdown rendering for the sdocs documentation site. A document's raw text
//! goes in; HTML with highlighted code, anchored headings, a table of contents
//! and a resolved title come out.
//!
//! ## Quick Start
//!
//! ```rust
//! use sdocs_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions {
//!   highlight_code: false,
//!   ..Default::default()
//! });
//! let doc = processor.render_document(
//!   "---\ntitle: Run\n---\n## Flags\n\nUse `--env`.",
//!   &["commands".to_string(), "run".to_string()],
//! );
//!
//! assert_eq!(doc.title, "Run");
//! assert_eq!(doc.toc[0].id, "flags");
//! assert!(doc.html.contains("<h2 id=\"flags\">"));
//! ```
//!
//! ## Features
//!
//! - **Frontmatter** parsed as YAML metadata, tolerant of malformed blocks
//! - **Syntax highlighting** for fenced code via syntect, with a lazily built,
//!   shareable engine ([`HighlighterHandle`])
//! - **GFM** tables, strikethrough, autolinks, task lists and footnotes
//! - **Heading anchors** with collision-free ids and a matching TOC
//! - **Plain text extraction** for search indexing ([`utils::strip_markdown`])

pub mod frontmatter;
pub mod processor;
pub mod syntax;
mod types;
pub mod utils;

pub use crate::{
  frontmatter::FrontmatterError,
  processor::{FALLBACK_TITLE, MarkdownOptions, MarkdownProcessor},
  syntax::{HighlighterHandle, SyntaxError, SyntaxManager},
  types::{MarkdownResult, RenderedDoc, TocItem},
};
