use sdocs_commonmark::utils::strip_markdown;

#[test]
fn test_strip_markdown_headings_links_and_emphasis() {
  let md = "# Title\n\nSome **bold** and [a link](/docs/run) text.";
  assert_eq!(strip_markdown(md), "Title Some bold and a link text.");
}

#[test]
fn test_strip_markdown_removes_code_entirely() {
  let md = "Intro\n\n```sh\nsreq run secret\n```\n\nUse `--env` flag.";
  let result = strip_markdown(md);
  assert!(
    !result.contains("secret"),
    "Fenced code should be dropped, got: {result}"
  );
  assert!(
    !result.contains("--env"),
    "Inline code should be dropped, got: {result}"
  );
  assert_eq!(result, "Intro Use flag.");
}

#[test]
fn test_strip_markdown_drops_table_rows() {
  let md = "| Flag | Meaning |\n|------|---------|\n| -v | verbose |\nafter";
  assert_eq!(strip_markdown(md), "after");
}

#[test]
fn test_strip_markdown_rules_and_quotes() {
  let md = "above\n\n---\n\n> quoted\n> text\n\nbelow";
  assert_eq!(strip_markdown(md), "above quoted text below");
}

#[test]
fn test_strip_markdown_collapses_whitespace() {
  let md = "  one\n\n\ttwo   three \n";
  assert_eq!(strip_markdown(md), "one two three");
}

#[test]
fn test_strip_markdown_keeps_single_hyphens() {
  let result = strip_markdown("a well-known - value");
  assert_eq!(result, "a well-known - value");
}

#[test]
fn test_strip_markdown_fence_before_inline_code() {
  // A fenced block containing inline-code-like text must vanish whole.
  let md = "start\n```\nlet s = `x`;\n```\nend";
  assert_eq!(strip_markdown(md), "start end");
}
