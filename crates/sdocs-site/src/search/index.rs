//! Building, storing and loading the search index.
use std::{fs, path::Path};

use rayon::prelude::*;
use sdocs_commonmark::{
  frontmatter,
  utils::{strip_markdown, truncate_chars},
};
use sdocs_config::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::{
  error::{SiteError, SiteResult},
  navigation::{SidebarLink, SidebarSection},
  resolver::DocResolver,
};

/// One searchable document summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
  /// The sidebar label of the document.
  pub title:   String,
  pub href:    String,
  pub section: String,
  /// Plain text of the document body, length-bounded.
  pub content: String,
}

/// The prebuilt search index: one entry per resolvable sidebar link, in
/// navigation order.
///
/// Serializes as a bare JSON array of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchIndex {
  entries: Vec<SearchEntry>,
}

impl SearchIndex {
  #[must_use]
  pub const fn new(entries: Vec<SearchEntry>) -> Self {
    Self { entries }
  }

  #[must_use]
  pub fn entries(&self) -> &[SearchEntry] {
    &self.entries
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Load an index bundle written by [`SearchIndex::write`].
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or is not a valid bundle.
  pub fn load(path: &Path) -> SiteResult<Self> {
    let json = fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
  }

  /// Write the index as JSON to `path`, creating parent directories.
  ///
  /// # Errors
  ///
  /// Returns an error if the file or its directory cannot be written.
  pub fn write(&self, path: &Path) -> SiteResult<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
    }
    let json = serde_json::to_string(self)?;
    fs::write(path, json).map_err(|e| SiteError::io(path, e))
  }
}

/// Builds a [`SearchIndex`] from the sidebar.
#[derive(Debug, Clone)]
pub struct SearchIndexBuilder<'a> {
  resolver:          &'a DocResolver,
  max_content_chars: usize,
  default_section:   String,
}

impl<'a> SearchIndexBuilder<'a> {
  #[must_use]
  pub fn new(resolver: &'a DocResolver, config: &SearchConfig) -> Self {
    Self {
      resolver,
      max_content_chars: config.max_content_chars,
      default_section: config.default_section.clone(),
    }
  }

  /// Index every sidebar link whose document exists.
  ///
  /// Documents are read in parallel; the entries keep navigation order. Links
  /// without a backing document are skipped.
  #[must_use]
  pub fn build(&self, sections: &[SidebarSection]) -> SearchIndex {
    let links: Vec<(&str, &SidebarLink)> = sections
      .iter()
      .flat_map(|section| {
        let label = if section.heading.is_empty() {
          self.default_section.as_str()
        } else {
          section.heading.as_str()
        };
        section.links.iter().map(move |link| (label, link))
      })
      .collect();

    let entries: Vec<SearchEntry> = links
      .par_iter()
      .filter_map(|(section, link)| self.entry_for(section, link))
      .collect();

    log::info!(
      "Indexed {} of {} sidebar documents",
      entries.len(),
      links.len()
    );
    SearchIndex::new(entries)
  }

  fn entry_for(&self, section: &str, link: &SidebarLink) -> Option<SearchEntry> {
    let Some(slug) = self.resolver.slug_from_href(&link.href) else {
      log::debug!("Skipping '{}': outside the docs root", link.href);
      return None;
    };

    let raw = match self.resolver.resolve(&slug).and_then(|source| source.read())
    {
      Ok(raw) => raw,
      Err(e) if e.is_not_found() => {
        log::debug!("Skipping '{}': no backing document", link.href);
        return None;
      },
      Err(e) => {
        log::warn!("Skipping '{}': {e}", link.href);
        return None;
      },
    };

    let body = frontmatter::split(&raw).body;
    let text = strip_markdown(body);

    Some(SearchEntry {
      title:   link.label.clone(),
      href:    link.href.clone(),
      section: section.to_string(),
      content: truncate_chars(&text, self.max_content_chars).to_string(),
    })
  }
}
