use serde::{Deserialize, Serialize};

/// Configuration for the search index and the search session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  /// Whether the search index is built.
  pub enable: bool,

  /// Maximum number of characters of plain text stored per entry.
  pub max_content_chars: usize,

  /// Maximum number of results a query returns.
  pub max_results: usize,

  /// Queries shorter than this (in characters) do not run.
  pub min_query_chars: usize,

  /// Section label for documents linked before the first sidebar heading.
  pub default_section: String,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      enable:            true,
      max_content_chars: 500,
      max_results:       10,
      min_query_chars:   2,
      default_section:   "Getting Started".to_string(),
    }
  }
}
