use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type for sdocs-site operations.
pub type SiteResult<T> = Result<T, SiteError>;

/// Error type for sdocs-site operations
#[derive(Debug, Error)]
pub enum SiteError {
  /// The slug names no document. Surfaced to readers as a "not found" page.
  #[error("No document found for '{slug}'")]
  NotFound { slug: String },

  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to walk documents: {0}")]
  Walk(#[from] walkdir::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),
}

impl SiteError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  /// Whether this error means the requested document does not exist.
  #[must_use]
  pub const fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }
}
