//! Fenced code block detection over raw markdown.
//!
//! Blocks are located by byte offset so they can be replaced in the source
//! text before the markdown transform runs.

/// A closed fenced code block found in markdown source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
  /// Byte offset of the start of the opening fence line.
  pub start:    usize,
  /// Byte offset just past the closing fence (its line break excluded).
  pub end:      usize,
  /// Number of spaces the opening fence is indented by.
  pub indent:   usize,
  /// First word of the info string, if any.
  pub language: Option<String>,
  /// Block content with the fence indentation removed and trailing
  /// whitespace trimmed.
  pub code:     String,
}

/// A parsed fence line: indentation, fence character, run length and the
/// text following the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FenceMarker<'a> {
  indent: usize,
  ch:     char,
  count:  usize,
  rest:   &'a str,
}

impl<'a> FenceMarker<'a> {
  fn parse(line: &'a str) -> Option<Self> {
    let line = line.trim_end_matches(['\n', '\r']);
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
      return None;
    }

    let body = &line[indent..];
    let ch = body.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let count = body.chars().take_while(|c| *c == ch).count();
    if count < 3 {
      return None;
    }

    Some(Self {
      indent,
      ch,
      count,
      rest: &body[count..],
    })
  }

  fn opens(&self) -> bool {
    // Backtick fences may not carry backticks in their info string.
    self.ch != '`' || !self.rest.contains('`')
  }

  fn closes(&self, open: &Self) -> bool {
    self.ch == open.ch && self.count >= open.count && self.rest.trim().is_empty()
  }
}

/// State tracking while inside an open fence.
struct OpenFence<'a> {
  marker:  FenceMarker<'a>,
  start:   usize,
  content: Vec<&'a str>,
}

/// Find every closed fenced code block in `markdown`, in source order.
///
/// An unclosed fence at end of input is not reported; the markdown transform
/// renders it as a plain code block.
#[must_use]
pub fn fenced_blocks(markdown: &str) -> Vec<FencedBlock> {
  let mut blocks = Vec::new();
  let mut open: Option<OpenFence<'_>> = None;
  let mut offset = 0;

  for line in markdown.split_inclusive('\n') {
    let line_start = offset;
    offset += line.len();
    let marker = FenceMarker::parse(line);

    match open.take() {
      None => {
        if let Some(marker) = marker.filter(FenceMarker::opens) {
          open = Some(OpenFence {
            marker,
            start: line_start,
            content: Vec::new(),
          });
        }
      },
      Some(mut fence) => {
        if marker.is_some_and(|m| m.closes(&fence.marker)) {
          let closing = line.trim_end_matches(['\n', '\r']);
          blocks.push(FencedBlock {
            start:    fence.start,
            end:      line_start + closing.len(),
            indent:   fence.marker.indent,
            language: fence
              .marker
              .rest
              .split_whitespace()
              .next()
              .map(str::to_string),
            code:     fence.content.concat().trim_end().to_string(),
          });
        } else {
          fence.content.push(dedent(line, fence.marker.indent));
          open = Some(fence);
        }
      },
    }
  }

  blocks
}

/// Remove up to `indent` leading spaces from a content line.
fn dedent(line: &str, indent: usize) -> &str {
  let spaces = line.len() - line.trim_start_matches(' ').len();
  &line[spaces.min(indent)..]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_single_block_offsets() {
    let md = "intro\n```rust\nfn main() {}\n```\noutro\n";
    let blocks = fenced_blocks(md);
    assert_eq!(blocks.len(), 1);

    let block = &blocks[0];
    assert_eq!(&md[block.start..block.end], "```rust\nfn main() {}\n```");
    assert_eq!(block.language.as_deref(), Some("rust"));
    assert_eq!(block.code, "fn main() {}");
  }

  #[test]
  fn test_tilde_fence_and_info_words() {
    let md = "~~~ yaml title=\"x\"\nkey: value\n~~~\n";
    let blocks = fenced_blocks(md);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].language.as_deref(), Some("yaml"));
  }

  #[test]
  fn test_mismatched_fence_does_not_close() {
    let md = "```\n~~~\ninner\n```\n";
    let blocks = fenced_blocks(md);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].code, "~~~\ninner");
  }

  #[test]
  fn test_shorter_fence_does_not_close() {
    let md = "````md\n```\nnested\n```\n````\n";
    let blocks = fenced_blocks(md);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].code, "```\nnested\n```");
  }

  #[test]
  fn test_unclosed_fence_is_ignored() {
    assert!(fenced_blocks("```sh\necho hi\n").is_empty());
  }

  #[test]
  fn test_four_space_indent_is_not_a_fence() {
    assert!(fenced_blocks("    ```\n    code\n    ```\n").is_empty());
  }

  #[test]
  fn test_indented_fence_strips_content_indent() {
    let md = "- item\n\n  ```sh\n  sreq run\n  ```\n";
    let blocks = fenced_blocks(md);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].indent, 2);
    assert_eq!(blocks[0].code, "sreq run");
  }

  #[test]
  fn test_backtick_info_with_backtick_is_not_a_fence() {
    assert!(fenced_blocks("``` a`b\ncode\n```\n").is_empty());
  }

  #[test]
  fn test_multiple_blocks_in_order() {
    let md = "```a\n1\n```\n\ntext\n\n```b\n2\n```";
    let blocks = fenced_blocks(md);
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].end <= blocks[1].start);
    assert_eq!(blocks[1].end, md.len());
    assert_eq!(blocks[1].language.as_deref(), Some("b"));
  }

  #[test]
  fn test_crlf_line_endings() {
    let md = "```sh\r\necho hi\r\n```\r\n";
    let blocks = fenced_blocks(md);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].code, "echo hi");
    assert_eq!(&md[blocks[0].start..blocks[0].end], "```sh\r\necho hi\r\n```");
  }
}
