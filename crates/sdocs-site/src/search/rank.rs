//! Ranking search entries against a query.
//!
//! Scoring per entry, case-insensitively:
//!
//! | match                         | score |
//! |-------------------------------|-------|
//! | title equals query            | 100   |
//! | else title starts with query  | 50    |
//! | else title contains query     | 30    |
//! | content contains query (also) | +10   |
//!
//! Entries scoring zero are dropped; the rest are ordered by descending score,
//! ties keeping index order.
use serde::{Deserialize, Serialize};

use super::index::SearchEntry;

const EXACT_TITLE_SCORE: u32 = 100;
const TITLE_PREFIX_SCORE: u32 = 50;
const TITLE_SUBSTRING_SCORE: u32 = 30;
const CONTENT_SCORE: u32 = 10;

/// Characters of context kept before a content match.
const SNIPPET_BEFORE: usize = 40;
/// Characters of context kept after a content match.
const SNIPPET_AFTER: usize = 80;
const ELLIPSIS: &str = "...";

/// Default cap on the number of results.
pub const MAX_RESULTS: usize = 10;

/// A ranked match, produced per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
  pub title:   String,
  pub href:    String,
  pub section: String,
  /// Excerpt around the content match; empty for title-only matches.
  pub snippet: String,
  pub score:   u32,
}

/// Fold text for case-insensitive matching.
///
/// Each character maps to exactly one character, so an index into the folded
/// text is a character index into the original.
fn fold(text: &str) -> Vec<char> {
  text
    .chars()
    .map(|c| c.to_lowercase().next().unwrap_or(c))
    .collect()
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
  if needle.is_empty() {
    return Some(0);
  }
  haystack
    .windows(needle.len())
    .position(|window| window == needle)
}

fn title_score(title: &[char], query: &[char]) -> u32 {
  if title == query {
    EXACT_TITLE_SCORE
  } else if title.starts_with(query) {
    TITLE_PREFIX_SCORE
  } else if find(title, query).is_some() {
    TITLE_SUBSTRING_SCORE
  } else {
    0
  }
}

/// Excerpt of `content` around a match at character `index`.
fn snippet(content: &[char], index: usize, query_len: usize) -> String {
  let start = index.saturating_sub(SNIPPET_BEFORE);
  let end = content.len().min(index + query_len + SNIPPET_AFTER);

  let window: String = content[start..end].iter().collect();
  let mut snippet = String::with_capacity(window.len() + 2 * ELLIPSIS.len());
  if start > 0 {
    snippet.push_str(ELLIPSIS);
  }
  snippet.push_str(window.trim());
  if end < content.len() {
    snippet.push_str(ELLIPSIS);
  }
  snippet
}

/// Rank `entries` against `query`, returning at most `max_results` results.
///
/// An empty query matches nothing.
#[must_use]
pub fn rank(
  entries: &[SearchEntry],
  query: &str,
  max_results: usize,
) -> Vec<SearchResult> {
  let query = fold(query);
  if query.is_empty() {
    return Vec::new();
  }

  let mut scored: Vec<SearchResult> = entries
    .iter()
    .filter_map(|entry| {
      let title = fold(&entry.title);
      let content = fold(&entry.content);
      let content_index = find(&content, &query);

      let score = title_score(&title, &query)
        + content_index.map_or(0, |_| CONTENT_SCORE);
      if score == 0 {
        return None;
      }

      let snippet = content_index
        .map(|index| {
          let original: Vec<char> = entry.content.chars().collect();
          snippet(&original, index, query.len())
        })
        .unwrap_or_default();

      Some(SearchResult {
        title: entry.title.clone(),
        href: entry.href.clone(),
        section: entry.section.clone(),
        snippet,
        score,
      })
    })
    .collect();

  // Stable: equal scores keep index order.
  scored.sort_by(|a, b| b.score.cmp(&a.score));
  scored.truncate(max_results);
  scored
}
