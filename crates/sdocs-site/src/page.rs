//! Page assembly: the rendered document plus everything the layout around it
//! needs.
use std::path::PathBuf;

use sdocs_commonmark::{MarkdownOptions, MarkdownProcessor, RenderedDoc};
use sdocs_config::Config;
use serde::Serialize;

use crate::{
  error::{SiteError, SiteResult},
  navigation::{FlatNavigation, PageLinks, SidebarSection, load_navigation},
  resolver::DocResolver,
  search::{SearchIndex, SearchIndexBuilder},
};

/// Title shown for a slug that resolves to no document.
pub const NOT_FOUND_TITLE: &str = "Not Found";

/// One step of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
  pub label:   String,
  pub href:    String,
  /// Whether this crumb is the page itself.
  pub current: bool,
}

/// A fully assembled documentation page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
  pub slug:        Vec<String>,
  pub href:        String,
  #[serde(flatten)]
  pub doc:         RenderedDoc,
  #[serde(flatten)]
  pub links:       PageLinks,
  pub breadcrumbs: Vec<Breadcrumb>,
}

/// Breadcrumb label for a slug segment: first letter uppercased, dashes
/// turned into spaces.
fn crumb_label(segment: &str) -> String {
  let mut chars = segment.chars();
  let mut label = String::with_capacity(segment.len());
  if let Some(first) = chars.next() {
    label.extend(first.to_uppercase());
  }
  label.extend(chars);
  label.replace('-', " ")
}

/// Breadcrumbs for `slug` under `base_href`. The docs root itself is not
/// included.
#[must_use]
pub fn breadcrumbs(base_href: &str, slug: &[String]) -> Vec<Breadcrumb> {
  let mut href = base_href.to_string();
  slug
    .iter()
    .enumerate()
    .map(|(i, segment)| {
      href.push('/');
      href.push_str(segment);
      Breadcrumb {
        label:   crumb_label(segment),
        href:    href.clone(),
        current: i + 1 == slug.len(),
      }
    })
    .collect()
}

/// The documentation site: resolver, renderer and navigation, loaded once.
#[derive(Debug, Clone)]
pub struct Site {
  config:     Config,
  resolver:   DocResolver,
  processor:  MarkdownProcessor,
  sections:   Vec<SidebarSection>,
  navigation: FlatNavigation,
}

impl Site {
  /// Load the site described by `config`.
  ///
  /// # Errors
  ///
  /// Returns an error if the navigation file exists but cannot be read.
  pub fn open(config: Config) -> SiteResult<Self> {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      gfm:             true,
      highlight_code:  config.highlight_code,
      highlight_theme: config.highlight_theme.clone(),
    });
    Self::with_processor(config, processor)
  }

  /// Load the site with a caller-provided processor, e.g. one sharing a
  /// highlighting engine with another site.
  ///
  /// # Errors
  ///
  /// Returns an error if the navigation file exists but cannot be read.
  pub fn with_processor(
    config: Config,
    processor: MarkdownProcessor,
  ) -> SiteResult<Self> {
    let resolver = DocResolver::from_config(&config);
    let sections = load_navigation(&config.sidebar_path(), &config.base_href)?;
    let navigation = FlatNavigation::new(&sections);
    log::debug!(
      "Loaded {} sidebar sections ({} links)",
      sections.len(),
      navigation.links().len()
    );

    Ok(Self {
      config,
      resolver,
      processor,
      sections,
      navigation,
    })
  }

  #[must_use]
  pub const fn config(&self) -> &Config {
    &self.config
  }

  #[must_use]
  pub const fn resolver(&self) -> &DocResolver {
    &self.resolver
  }

  #[must_use]
  pub fn sections(&self) -> &[SidebarSection] {
    &self.sections
  }

  #[must_use]
  pub const fn navigation(&self) -> &FlatNavigation {
    &self.navigation
  }

  /// Render the document at `slug` to a [`RenderedDoc`].
  ///
  /// # Errors
  ///
  /// Returns [`SiteError::NotFound`] if the slug does not resolve, or an I/O
  /// error if the document cannot be read.
  pub fn render(&self, slug: &[String]) -> SiteResult<RenderedDoc> {
    let source = self.resolver.resolve(slug)?;
    let raw = source.read()?;
    Ok(self.processor.render_document(&raw, slug))
  }

  /// Assemble the page at `slug`.
  ///
  /// # Errors
  ///
  /// Returns [`SiteError::NotFound`] if the slug does not resolve, or an I/O
  /// error if the document cannot be read.
  pub fn page(&self, slug: &[String]) -> SiteResult<Page> {
    let doc = self.render(slug)?;
    let href = self.resolver.href_for(slug);

    Ok(Page {
      slug: slug.to_vec(),
      links: self.navigation.neighbors(&href),
      breadcrumbs: breadcrumbs(&self.config.base_href, slug),
      href,
      doc,
    })
  }

  /// Browser title for `slug`: `"{title} — {site_title}"`, or
  /// [`NOT_FOUND_TITLE`].
  #[must_use]
  pub fn page_title(&self, slug: &[String]) -> String {
    match self.render(slug) {
      Ok(doc) => format!("{} — {}", doc.title, self.config.site_title),
      Err(SiteError::NotFound { .. }) => NOT_FOUND_TITLE.to_string(),
      Err(e) => {
        log::warn!("Failed to load '{}': {e}", slug.join("/"));
        NOT_FOUND_TITLE.to_string()
      },
    }
  }

  /// Every renderable slug.
  ///
  /// # Errors
  ///
  /// Returns an error if the docs directory cannot be walked.
  pub fn all_slugs(&self) -> SiteResult<Vec<Vec<String>>> {
    self.resolver.all_slugs()
  }

  /// Build the search index over the sidebar.
  #[must_use]
  pub fn search_index(&self) -> SearchIndex {
    SearchIndexBuilder::new(&self.resolver, &self.config.search)
      .build(&self.sections)
  }

  /// Build the search index and write it to the configured output directory.
  ///
  /// # Errors
  ///
  /// Returns an error if the bundle cannot be written.
  pub fn write_search_index(&self) -> SiteResult<(PathBuf, SearchIndex)> {
    let path = self.config.search_index_path();
    let index = self.search_index();
    index.write(&path)?;
    log::info!("Wrote search index to {}", path.display());
    Ok((path, index))
  }
}
