use std::sync::LazyLock;
pub mod codeblock;

use regex::Regex;

/// Slugify heading text for use as an anchor id.
///
/// Lowercases the text, drops every character that is not a word character
/// (letter, digit or `_`), whitespace or `-`, then turns each run of
/// whitespace into a single `-`. Applying it twice yields the same result as
/// applying it once.
#[must_use]
pub fn slugify(text: &str) -> String {
  let lowered = text.to_lowercase();
  let mut slug = String::with_capacity(lowered.len());
  let mut pending_space = false;

  for c in lowered.chars() {
    if c.is_whitespace() {
      pending_space = true;
    } else if c.is_alphanumeric() || c == '_' || c == '-' {
      if pending_space {
        slug.push('-');
        pending_space = false;
      }
      slug.push(c);
    }
  }
  if pending_space {
    slug.push('-');
  }

  slug
}

/// Ordered eliminations turning markdown into searchable plain text.
///
/// Order matters: fenced blocks go before inline code so their backticks are
/// gone, and links are reduced to their text before emphasis markers are
/// dropped.
static MARKDOWN_ELIMINATIONS: LazyLock<Vec<(Regex, &'static str)>> =
  LazyLock::new(|| {
    [
      (r"(?s)```.*?```", ""),
      (r"`[^`]+`", ""),
      (r"#{1,6}\s+", ""),
      (r"\[([^\]]+)\]\([^)]+\)", "$1"),
      (r"[*_~]+", ""),
      (r"\|[^\n]+", ""),
      (r"-{3,}", ""),
      (r">\s+", ""),
      (r"\s+", " "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
      let re = Regex::new(pattern).unwrap_or_else(|e| {
        log::error!("Failed to compile markdown elimination {pattern}: {e}");
        never_matching_regex()
      });
      (re, replacement)
    })
    .collect()
  });

/// Strip markdown syntax and return whitespace-collapsed plain text.
///
/// Code (fenced and inline) is removed entirely, link syntax is reduced to the
/// link text, and table rows are dropped.
#[must_use]
pub fn strip_markdown(content: &str) -> String {
  let mut text = content.to_string();
  for (re, replacement) in MARKDOWN_ELIMINATIONS.iter() {
    if let std::borrow::Cow::Owned(replaced) =
      re.replace_all(&text, *replacement)
    {
      text = replaced;
    }
  }
  text.trim().to_string()
}

/// Truncate `text` to at most `max_chars` characters.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((byte_index, _)) => &text[..byte_index],
    None => text,
  }
}

/// Create a regex that never matches anything.
///
/// Used as a fallback pattern when a regex fails to compile.
///
/// # Panics
///
/// Panics if the fallback regex pattern `r"^\b$"` fails to compile, which
/// should never happen.
#[must_use]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(clippy::unwrap_used, reason = "Pattern is statically valid")]
    let fallback = Regex::new(r"^\b$").unwrap();
    fallback
  })
}
