//! Interactive search session.
//!
//! The session is a small state machine driven by modal events. Every query
//! runs synchronously against the prebuilt index; its cost is bounded by the
//! index size, so there is nothing to debounce or cancel.
use sdocs_config::SearchConfig;
use serde::Serialize;

use super::{
  index::SearchIndex,
  rank::{MAX_RESULTS, SearchResult, rank},
};

/// Minimum query length, in characters, before a search runs.
pub const MIN_QUERY_CHARS: usize = 2;

/// What the modal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
  /// The modal is not shown.
  Closed,
  /// Open with a query too short to search ("type more").
  OpenEmpty,
  /// Open with at least one result.
  OpenResults,
  /// Open with a searchable query that matched nothing.
  OpenNoMatch,
}

/// Input to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
  Open,
  /// The query text changed to this value.
  Input(String),
  ArrowDown,
  ArrowUp,
  Enter,
  Escape,
  /// The pointer moved over result `i`.
  Hover(usize),
  /// Result `i` was clicked.
  Click(usize),
}

/// Side effect requested by handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
  /// Nothing beyond a possible redraw.
  None,
  /// Navigate to this href; the session has closed.
  Navigate(String),
  /// The session closed without navigating.
  Closed,
}

/// Search modal state over a borrowed index.
#[derive(Debug)]
pub struct SearchSession<'a> {
  index:           &'a SearchIndex,
  max_results:     usize,
  min_query_chars: usize,
  open:            bool,
  query:           String,
  results:         Vec<SearchResult>,
  active:          usize,
}

impl<'a> SearchSession<'a> {
  /// A closed session with the default limits.
  #[must_use]
  pub const fn new(index: &'a SearchIndex) -> Self {
    Self {
      index,
      max_results: MAX_RESULTS,
      min_query_chars: MIN_QUERY_CHARS,
      open: false,
      query: String::new(),
      results: Vec::new(),
      active: 0,
    }
  }

  /// A closed session using the limits from `config`.
  #[must_use]
  pub fn with_config(index: &'a SearchIndex, config: &SearchConfig) -> Self {
    Self {
      max_results: config.max_results,
      min_query_chars: config.min_query_chars,
      ..Self::new(index)
    }
  }

  #[must_use]
  pub fn state(&self) -> SessionState {
    if !self.open {
      SessionState::Closed
    } else if !self.query_is_searchable() {
      SessionState::OpenEmpty
    } else if self.results.is_empty() {
      SessionState::OpenNoMatch
    } else {
      SessionState::OpenResults
    }
  }

  #[must_use]
  pub fn query(&self) -> &str {
    &self.query
  }

  #[must_use]
  pub fn results(&self) -> &[SearchResult] {
    &self.results
  }

  /// Index of the highlighted result.
  #[must_use]
  pub const fn active_index(&self) -> usize {
    self.active
  }

  /// The highlighted result, if any.
  #[must_use]
  pub fn active_result(&self) -> Option<&SearchResult> {
    self.results.get(self.active)
  }

  /// Apply one event.
  pub fn handle(&mut self, event: SessionEvent) -> SessionOutcome {
    if !self.open && event != SessionEvent::Open {
      return SessionOutcome::None;
    }

    match event {
      SessionEvent::Open => {
        self.reset();
        self.open = true;
        SessionOutcome::None
      },
      SessionEvent::Input(query) => {
        self.set_query(query);
        SessionOutcome::None
      },
      SessionEvent::ArrowDown => {
        self.active = (self.active + 1).min(self.last_index());
        SessionOutcome::None
      },
      SessionEvent::ArrowUp => {
        self.active = self.active.saturating_sub(1);
        SessionOutcome::None
      },
      SessionEvent::Hover(i) => {
        self.active = i.min(self.last_index());
        SessionOutcome::None
      },
      SessionEvent::Enter => self.activate(self.active),
      SessionEvent::Click(i) => self.activate(i),
      SessionEvent::Escape => {
        self.close();
        SessionOutcome::Closed
      },
    }
  }

  fn query_is_searchable(&self) -> bool {
    self.query.chars().count() >= self.min_query_chars
  }

  fn set_query(&mut self, query: String) {
    self.query = query;
    self.active = 0;
    self.results = if self.query_is_searchable() {
      rank(self.index.entries(), &self.query, self.max_results)
    } else {
      Vec::new()
    };
  }

  fn last_index(&self) -> usize {
    self.results.len().saturating_sub(1)
  }

  fn activate(&mut self, i: usize) -> SessionOutcome {
    let Some(href) = self.results.get(i).map(|r| r.href.clone()) else {
      return SessionOutcome::None;
    };
    self.close();
    SessionOutcome::Navigate(href)
  }

  fn close(&mut self) {
    self.reset();
    self.open = false;
  }

  fn reset(&mut self) {
    self.query.clear();
    self.results.clear();
    self.active = 0;
  }
}
