//! Core implementation of the Markdown processor.
//!
//! The pipeline runs in a fixed order: fenced code blocks are replaced with
//! highlighted HTML in the markdown source, then comrak parses the result and
//! formats it, anchoring headings and collecting the table of contents as it
//! writes them.
use comrak::{Arena, options::Options, parse_document};

use super::{
  anchors::{AnchoredHtml, render_anchored},
  types::{MarkdownOptions, MarkdownProcessor},
};
use crate::{
  frontmatter,
  syntax::{HighlighterHandle, PLAIN_TEXT},
  types::{MarkdownResult, RenderedDoc},
  utils::codeblock::{FencedBlock, fenced_blocks},
};

/// Title used when neither metadata, a heading, nor the slug provide one.
pub const FALLBACK_TITLE: &str = "Docs";

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  ///
  /// When highlighting is enabled the engine is built lazily, on the first
  /// document that contains a fenced code block.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let highlighter = if options.highlight_code {
      HighlighterHandle::lazy(options.highlight_theme.clone())
    } else {
      HighlighterHandle::disabled()
    };

    Self {
      options,
      highlighter,
    }
  }

  /// Replace the highlighting engine, e.g. to share one across processors.
  #[must_use]
  pub fn with_highlighter(mut self, highlighter: HighlighterHandle) -> Self {
    self.highlighter = highlighter;
    self
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// The highlighting engine handle used by this processor.
  #[must_use]
  pub const fn highlighter(&self) -> &HighlighterHandle {
    &self.highlighter
  }

  /// Render a markdown body (without frontmatter) to HTML, extracting the
  /// table of contents and the first level 1 heading.
  #[must_use]
  pub fn render(&self, markdown: &str) -> MarkdownResult {
    let source = if self.options.highlight_code {
      self.highlight_fences(markdown)
    } else {
      markdown.to_string()
    };

    let anchored = self.convert_to_html(&source);

    MarkdownResult {
      html:  anchored.html,
      toc:   anchored.toc,
      title: anchored.title,
    }
  }

  /// Render a complete document: split frontmatter, render the body and
  /// resolve its title.
  ///
  /// The title is the frontmatter `title`, else the first level 1 heading,
  /// else the last slug segment, else [`FALLBACK_TITLE`].
  #[must_use]
  pub fn render_document(&self, raw: &str, slug: &[String]) -> RenderedDoc {
    let document = frontmatter::split(raw);
    let rendered = self.render(document.body);

    let title = document
      .title()
      .or(rendered.title)
      .or_else(|| slug.last().filter(|s| !s.is_empty()).cloned())
      .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    log::debug!(
      "Rendered '{}' ({} headings, {} bytes)",
      slug.join("/"),
      rendered.toc.len(),
      rendered.html.len()
    );

    RenderedDoc {
      html: rendered.html,
      toc: rendered.toc,
      meta: document.meta,
      title,
    }
  }

  /// Replace every fenced code block in `markdown` with highlighted HTML.
  ///
  /// Replacements are computed in source order and applied from the last
  /// block to the first so that earlier offsets stay valid. A block that fails
  /// to highlight is left as markdown and renders unstyled.
  #[must_use]
  pub fn highlight_fences(&self, markdown: &str) -> String {
    let blocks = fenced_blocks(markdown);
    if blocks.is_empty() {
      return markdown.to_string();
    }

    let Some(manager) = self.highlighter.acquire() else {
      return markdown.to_string();
    };

    let replacements: Vec<(&FencedBlock, String)> = blocks
      .iter()
      .filter_map(|block| {
        let language = block.language.as_deref().unwrap_or(PLAIN_TEXT);
        match manager.highlight_code(
          &block.code,
          language,
          self.options.highlight_theme.as_deref(),
        ) {
          Ok(html) => {
            Some((block, wrap_highlighted(&html, language, block.indent)))
          },
          Err(e) => {
            log::warn!("Failed to highlight '{language}' code block: {e}");
            None
          },
        }
      })
      .collect();

    let mut output = markdown.to_string();
    for (block, html) in replacements.iter().rev() {
      output.replace_range(block.start..block.end, html);
    }
    output
  }

  /// Convert markdown to HTML using comrak and configured options.
  fn convert_to_html(&self, content: &str) -> AnchoredHtml {
    let options = self.comrak_options();
    let arena = Arena::new();
    let root = parse_document(&arena, content, &options);
    render_anchored(root, &options).unwrap_or_else(|e| {
      log::error!("Failed to format markdown as HTML: {e}");
      AnchoredHtml::default()
    })
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    // Highlighted blocks are injected as raw HTML.
    options.render.r#unsafe = true;
    options
  }
}

/// Tag highlighted output with `highlight language-*` classes and fold it onto
/// a single line.
///
/// Newlines inside the `<pre>` become `&#10;`, so the fence's indent only pads
/// the opening tag. The block stays inside a list item and code lines keep
/// their own leading whitespace.
fn wrap_highlighted(html: &str, language: &str, indent: usize) -> String {
  let class = format!(
    "highlight language-{}",
    html_escape::encode_double_quoted_attribute(language)
  );
  let html = html.trim_end();
  let tagged = match html.strip_prefix("<pre") {
    Some(rest) => format!("<pre class=\"{class}\"{rest}"),
    None => format!("<pre class=\"{class}\">{html}</pre>"),
  };

  let (open, body) = match tagged.find('>') {
    Some(end) => tagged.split_at(end + 1),
    None => (tagged.as_str(), ""),
  };
  let body = body.strip_prefix('\n').unwrap_or(body);
  format!(
    "{}{open}{}",
    " ".repeat(indent),
    body.replace("\r\n", "&#10;").replace('\n', "&#10;")
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_wrap_highlighted_adds_classes() {
    assert_eq!(
      wrap_highlighted("<pre style=\"x\">code</pre>\n", "rust", 0),
      "<pre class=\"highlight language-rust\" style=\"x\">code</pre>"
    );
  }

  #[test]
  fn test_wrap_highlighted_wraps_bare_output() {
    assert_eq!(
      wrap_highlighted("<span>x</span>", "sh", 0),
      "<pre class=\"highlight language-sh\"><span>x</span></pre>"
    );
  }

  #[test]
  fn test_wrap_highlighted_folds_lines_and_pads_only_the_tag() {
    assert_eq!(
      wrap_highlighted("<pre>\na\n  b\n</pre>\n", "sh", 2),
      "  <pre class=\"highlight language-sh\">a&#10;  b&#10;</pre>"
    );
  }

  #[test]
  fn test_disabled_highlighting_keeps_fences() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      ..Default::default()
    });
    let md = "```rust\nfn main() {}\n```";
    assert_eq!(processor.highlight_fences(md), md);
    assert!(processor.highlighter().acquire().is_none());
  }
}
