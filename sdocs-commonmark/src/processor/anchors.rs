//! Heading anchors and table of contents.
//!
//! Ids are assigned while comrak formats the document: every `<h2>`/`<h3>`
//! heading node is written with its `id` and the matching [`TocItem`] is
//! recorded from the same value, so a TOC link always targets a rendered
//! anchor. Raw HTML and comments never reach the heading formatter.
use std::{collections::HashSet, fmt::Write};

use comrak::{
  create_formatter,
  html::{collect_text, format_node_default},
  nodes::{AstNode, NodeValue},
  options::Options,
};

use crate::{types::TocItem, utils::slugify};

/// Id given to a heading whose text slugifies to nothing.
const EMPTY_SLUG_ID: &str = "section";

/// Ids already handed out within one document.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
  taken: HashSet<String>,
}

impl AnchorRegistry {
  /// Claim an id derived from `base`.
  ///
  /// The first claim of a base gets it unchanged; later claims get `-1`,
  /// `-2`, ... appended, skipping any suffix already taken.
  pub fn claim(&mut self, base: &str) -> String {
    let base = if base.is_empty() { EMPTY_SLUG_ID } else { base };
    if self.taken.insert(base.to_string()) {
      return base.to_string();
    }

    let mut n = 1usize;
    loop {
      let candidate = format!("{base}-{n}");
      if self.taken.insert(candidate.clone()) {
        return candidate;
      }
      n += 1;
    }
  }
}

/// Output of rendering with heading anchors.
#[derive(Debug, Default)]
pub struct AnchoredHtml {
  pub html:  String,
  pub toc:   Vec<TocItem>,
  /// Visible text of the first non-empty level 1 heading.
  pub title: Option<String>,
}

/// State threaded through the formatter for one document.
#[derive(Debug, Default)]
pub struct HeadingState {
  registry: AnchorRegistry,
  toc:      Vec<TocItem>,
  title:    Option<String>,
}

/// Visible text of a heading: text, code and line breaks, no inline HTML.
fn heading_text<'a>(node: &'a AstNode<'a>) -> String {
  collect_text(node)
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

create_formatter!(AnchorFormatter<HeadingState>, {
  NodeValue::Heading(ref heading) => |context, node, entering| {
    let level = heading.level;
    if level == 1 {
      if entering && context.user.title.is_none() {
        let text = heading_text(node);
        if !text.is_empty() {
          context.user.title = Some(text);
        }
      }
      return format_node_default(context, node, entering);
    }
    if level > 3 {
      return format_node_default(context, node, entering);
    }

    if entering {
      let text = heading_text(node);
      let id = context.user.registry.claim(&slugify(&text));
      context.cr()?;
      write!(context, "<h{level} id=\"")?;
      context.escape(&id)?;
      context.write_str("\">")?;
      context.user.toc.push(TocItem { id, text, level });
    } else {
      write!(context, "</h{level}>")?;
      context.lf()?;
    }
  },
});

/// Format the document rooted at `root`, anchoring `<h2>`/`<h3>` headings and
/// collecting the table of contents and title.
pub fn render_anchored<'a>(
  root: &'a AstNode<'a>,
  options: &Options,
) -> Result<AnchoredHtml, std::fmt::Error> {
  let mut html = String::new();
  let state = AnchorFormatter::format_document(
    root,
    options,
    &mut html,
    HeadingState::default(),
  )?;

  Ok(AnchoredHtml {
    html,
    toc: state.toc,
    title: state.title,
  })
}
