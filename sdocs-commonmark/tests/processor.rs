#![allow(clippy::expect_used, reason = "Fine in tests")]

use sdocs_commonmark::{
  HighlighterHandle,
  MarkdownOptions,
  MarkdownProcessor,
  SyntaxManager,
  syntax::{SyntaxError, SyntaxHighlighter, SyntaxResult},
};
use serde_json::Value;

/// Deterministic highlighter: `short` shrinks a block, `long` grows it and
/// `broken` fails.
struct FakeHighlighter;

impl SyntaxHighlighter for FakeHighlighter {
  fn name(&self) -> &'static str {
    "Fake"
  }

  fn supports_language(&self, language: &str) -> bool {
    matches!(language, "short" | "long" | "broken")
  }

  fn highlight(
    &self,
    code: &str,
    language: &str,
    _theme: Option<&str>,
  ) -> SyntaxResult<String> {
    match language {
      "short" => Ok("<pre>S</pre>".to_string()),
      "long" => Ok(format!("<pre>{}</pre>", "L".repeat(200))),
      "broken" => Err(SyntaxError::HighlightingFailed("boom".to_string())),
      _ => Ok(format!("<pre>{code}</pre>")),
    }
  }
}

fn fake_processor() -> MarkdownProcessor {
  let manager = SyntaxManager::with_highlighter(Box::new(FakeHighlighter));
  MarkdownProcessor::new(MarkdownOptions::default())
    .with_highlighter(HighlighterHandle::from_manager(manager))
}

fn plain_processor() -> MarkdownProcessor {
  MarkdownProcessor::new(MarkdownOptions {
    highlight_code: false,
    ..Default::default()
  })
}

fn slug(parts: &[&str]) -> Vec<String> {
  parts.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_replacements_keep_positions_when_lengths_change() {
  let md = "Before\n\n```short\nthis source is longer than its \
            output\n```\n\nMiddle\n\n```long\nx\n```\n\nAfter\n";

  let replaced = fake_processor().highlight_fences(md);
  let expected = format!(
    "Before\n\n<pre class=\"highlight language-short\">S</pre>\n\nMiddle\n\n<pre \
     class=\"highlight language-long\">{}</pre>\n\nAfter\n",
    "L".repeat(200)
  );
  assert_eq!(replaced, expected);

  let html = fake_processor().render(md).html;
  let positions: Vec<usize> = [
    "<p>Before</p>",
    "language-short\">S</pre>",
    "<p>Middle</p>",
    "language-long\">LLL",
    "<p>After</p>",
  ]
  .iter()
  .map(|needle| html.find(needle).expect("fragment should be rendered"))
  .collect();
  assert!(
    positions.windows(2).all(|w| w[0] < w[1]),
    "fragments out of order in: {html}"
  );
}

#[test]
fn test_failed_block_renders_unstyled() {
  let md = "```broken\nlet x = 1;\n```\n\n```short\nok\n```\n";
  let html = fake_processor().render(md).html;

  assert!(html.contains("<code class=\"language-broken\">let x = 1;"));
  assert!(!html.contains("highlight language-broken"));
  assert!(html.contains("<pre class=\"highlight language-short\">S</pre>"));
}

#[test]
fn test_fence_without_language_uses_plain_text() {
  let md = "```\nraw\n```\n";
  let html = fake_processor().render(md).html;
  assert!(html.contains("highlight language-plaintext"));
}

#[test]
fn test_indented_top_level_fence_keeps_code_columns() {
  let md = " ```sh\n echo one\n   echo two\n ```\n";
  let html = fake_processor().render(md).html;
  assert!(
    html.contains(
      "<pre class=\"highlight language-sh\">echo one&#10;  echo two</pre>"
    ),
    "code lines shifted in: {html}"
  );
}

#[test]
fn test_toc_ids_match_heading_ids() {
  let md = "# Guide\n\n## Install `sreq`\n\ntext\n\n### From source\n\n## \
            Configure & Run\n\n#### Not in toc\n";
  let result = plain_processor().render(md);

  assert_eq!(result.toc.len(), 3);
  for item in &result.toc {
    let tag = format!("<h{} id=\"{}\">", item.level, item.id);
    assert!(result.html.contains(&tag), "missing {tag} in {}", result.html);
  }
  assert_eq!(result.toc[0].id, "install-sreq");
  assert_eq!(result.toc[0].text, "Install sreq");
  assert_eq!(result.toc[1].level, 3);
  assert_eq!(result.toc[2].id, "configure-run");
  assert!(result.html.contains("<h4>Not in toc</h4>"));
}

#[test]
fn test_toc_skips_headings_that_are_not_rendered() {
  let md = "<!-- ## Draft -->\n\n<!--\n<h2>Old</h2>\n-->\n\n## Kept <b \
            title=\"x>y\">now</b>\n";
  let result = plain_processor().render(md);

  assert_eq!(result.toc.len(), 1);
  assert_eq!(result.toc[0].id, "kept-now");
  assert_eq!(result.toc[0].text, "Kept now");
  assert!(result.html.contains("<h2 id=\"kept-now\">"));
  assert!(!result.html.contains("id=\"old\""));
}

#[test]
fn test_h1_has_no_generated_anchor() {
  let result = plain_processor().render("# Title\n");
  assert_eq!(result.html, "<h1>Title</h1>\n");
  assert_eq!(result.title.as_deref(), Some("Title"));
}

#[test]
fn test_duplicate_headings_get_suffixes() {
  let md = "## Setup\n\n## Setup\n\n### Setup\n";
  let result = plain_processor().render(md);
  let ids: Vec<&str> = result.toc.iter().map(|t| t.id.as_str()).collect();
  assert_eq!(ids, ["setup", "setup-1", "setup-2"]);
  assert!(result.html.contains("<h3 id=\"setup-2\">Setup</h3>"));
}

#[test]
fn test_punctuation_only_heading_gets_fallback_id() {
  let result = plain_processor().render("## ???\n");
  assert_eq!(result.toc[0].id, "section");
  assert!(result.html.contains("<h2 id=\"section\">"));
}

#[test]
fn test_title_prefers_frontmatter() {
  let doc = plain_processor().render_document(
    "---\ntitle: From Meta\norder: 3\n---\n# From Heading\n",
    &slug(&["commands", "run"]),
  );
  assert_eq!(doc.title, "From Meta");
  assert_eq!(doc.meta.get("order"), Some(&Value::from(3)));
  assert!(!doc.html.contains("From Meta"));
}

#[test]
fn test_title_falls_back_to_heading_then_slug_then_label() {
  let processor = plain_processor();

  let doc = processor.render_document("# From Heading\n", &slug(&["run"]));
  assert_eq!(doc.title, "From Heading");

  let doc = processor.render_document("text only", &slug(&["commands", "run"]));
  assert_eq!(doc.title, "run");

  let doc = processor.render_document("text only", &[]);
  assert_eq!(doc.title, "Docs");
}

#[test]
fn test_gfm_extensions() {
  let md = "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~ and \
            https://example.com\n\n- [x] done\n";
  let html = plain_processor().render(md).html;
  assert!(html.contains("<table>"));
  assert!(html.contains("<del>old</del>"));
  assert!(html.contains("<a href=\"https://example.com\">"));
  assert!(html.contains("type=\"checkbox\""));
}

#[test]
fn test_raw_html_passes_through() {
  let md = "<div class=\"note\">careful</div>\n\ntext";
  let html = plain_processor().render(md).html;
  assert!(html.contains("<div class=\"note\">careful</div>"));
}

#[test]
fn test_rendering_is_deterministic() {
  let md = "---\ntitle: Same\n---\n## A\n\n## A\n\n```rust\nfn x() {}\n```\n";
  let processor = MarkdownProcessor::new(MarkdownOptions::default());
  let first = processor.render_document(md, &slug(&["a"]));
  let second = processor.render_document(md, &slug(&["a"]));
  assert_eq!(first, second);
}

#[test]
fn test_syntect_highlights_fences() {
  let processor = MarkdownProcessor::new(MarkdownOptions::default());
  assert!(!processor.highlighter().is_initialized());

  let html = processor
    .render("```rust\nfn main() {}\n```\n\n```klingon\nqapla\n```\n")
    .html;
  assert!(processor.highlighter().is_initialized());
  assert!(html.contains("<pre class=\"highlight language-rust\""));
  assert!(html.contains("<pre class=\"highlight language-klingon\""));
  assert!(html.contains("qapla"));
}

#[test]
fn test_highlighted_fence_inside_list_item() {
  let processor = MarkdownProcessor::new(MarkdownOptions::default());
  let html = processor
    .render("- step one\n\n  ```sh\n  sreq run\n  ```\n\n- step two\n")
    .html;
  let item = html.find("<li>").expect("list item");
  let block = html
    .find("highlight language-sh")
    .expect("highlighted block");
  let close = html.find("</ul>").expect("list close");
  assert!(item < block && block < close, "block escaped the list: {html}");
}

#[test]
fn test_clones_share_one_engine() {
  let processor = MarkdownProcessor::new(MarkdownOptions::default());
  let clone = processor.clone();
  let _ = clone.render("```rust\nlet a = 1;\n```");
  assert!(processor.highlighter().is_initialized());
}
