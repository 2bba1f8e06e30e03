//! Search: the index built from the sidebar, ranking, and the interactive
//! session that consumes both.
mod index;
mod rank;
mod session;

pub use self::{
  index::{SearchEntry, SearchIndex, SearchIndexBuilder},
  rank::{MAX_RESULTS, SearchResult, rank},
  session::{
    MIN_QUERY_CHARS,
    SearchSession,
    SessionEvent,
    SessionOutcome,
    SessionState,
  },
};
