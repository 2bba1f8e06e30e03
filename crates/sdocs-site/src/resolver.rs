//! Mapping slugs to document files and hrefs.
use std::{
  fs,
  path::{Path, PathBuf},
};

use sdocs_config::Config;
use walkdir::WalkDir;

use crate::error::{SiteError, SiteResult};

/// A slug resolved to the one file that backs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
  pub slug: Vec<String>,
  pub path: PathBuf,
}

impl DocumentSource {
  /// Read the raw document text.
  ///
  /// # Errors
  ///
  /// Returns [`SiteError::Io`] if the file cannot be read.
  pub fn read(&self) -> SiteResult<String> {
    fs::read_to_string(&self.path).map_err(|e| SiteError::io(&self.path, e))
  }
}

/// Resolves slugs against a docs directory.
///
/// A slug `["commands", "run"]` resolves to `commands/run.md` if that file
/// exists, otherwise to `commands/run/README.md`. Nothing else matches.
#[derive(Debug, Clone)]
pub struct DocResolver {
  docs_dir:   PathBuf,
  extension:  String,
  index_name: String,
  base_href:  String,
}

impl DocResolver {
  #[must_use]
  pub fn new(
    docs_dir: impl Into<PathBuf>,
    extension: &str,
    index_name: &str,
    base_href: &str,
  ) -> Self {
    Self {
      docs_dir:   docs_dir.into(),
      extension:  extension.trim_start_matches('.').to_string(),
      index_name: index_name.to_string(),
      base_href:  base_href.to_string(),
    }
  }

  #[must_use]
  pub fn from_config(config: &Config) -> Self {
    Self::new(
      &config.docs_dir,
      &config.extension,
      &config.index_name,
      &config.base_href,
    )
  }

  #[must_use]
  pub fn docs_dir(&self) -> &Path {
    &self.docs_dir
  }

  #[must_use]
  pub fn base_href(&self) -> &str {
    &self.base_href
  }

  /// Resolve `slug` to its document file.
  ///
  /// # Errors
  ///
  /// Returns [`SiteError::NotFound`] if neither the direct file nor the
  /// directory index exists, or if any segment is not a plain name.
  pub fn resolve(&self, slug: &[String]) -> SiteResult<DocumentSource> {
    let not_found = || {
      SiteError::NotFound {
        slug: slug.join("/"),
      }
    };

    if !slug.iter().all(|segment| is_plain_segment(segment)) {
      return Err(not_found());
    }

    let mut dir = self.docs_dir.clone();
    dir.extend(slug);

    let direct = slug.split_last().map(|(last, parents)| {
      let mut file = self.docs_dir.clone();
      file.extend(parents);
      file.push(format!("{last}.{}", self.extension));
      file
    });
    let index = dir.join(format!("{}.{}", self.index_name, self.extension));

    for path in direct.into_iter().chain([index]) {
      if path.is_file() {
        return Ok(DocumentSource {
          slug: slug.to_vec(),
          path,
        });
      }
    }

    Err(not_found())
  }

  /// Site-rooted href of `slug`.
  #[must_use]
  pub fn href_for(&self, slug: &[String]) -> String {
    if slug.is_empty() {
      self.base_href.clone()
    } else {
      format!("{}/{}", self.base_href, slug.join("/"))
    }
  }

  /// Slug of a site-rooted href, or `None` if the href lies outside the docs
  /// root.
  #[must_use]
  pub fn slug_from_href(&self, href: &str) -> Option<Vec<String>> {
    let rest = href.strip_prefix(&self.base_href)?;
    if !rest.is_empty() && !rest.starts_with('/') {
      return None;
    }

    Some(
      rest
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect(),
    )
  }

  /// Every renderable slug under the docs directory, sorted.
  ///
  /// Entries whose name starts with `_` are skipped along with everything
  /// beneath them. A directory index yields the directory's slug.
  ///
  /// # Errors
  ///
  /// Returns an error if the docs directory cannot be walked.
  pub fn all_slugs(&self) -> SiteResult<Vec<Vec<String>>> {
    let walker = WalkDir::new(&self.docs_dir)
      .follow_links(true)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|e| {
        e.depth() == 0
          || e.file_name().to_str().is_some_and(|s| !s.starts_with('_'))
      });

    let mut slugs = Vec::new();
    for entry in walker {
      let entry = entry?;
      if !entry.file_type().is_file() {
        continue;
      }

      let path = entry.path();
      if path.extension().and_then(|e| e.to_str())
        != Some(self.extension.as_str())
      {
        continue;
      }
      let Ok(relative) = path.strip_prefix(&self.docs_dir) else {
        continue;
      };

      let mut slug: Vec<String> = relative
        .iter()
        .map(|part| part.to_string_lossy().into_owned())
        .collect();
      let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
      slug.pop();
      if stem != self.index_name {
        slug.push(stem);
      }
      slugs.push(slug);
    }

    slugs.sort();
    slugs.dedup();
    log::debug!(
      "Found {} documents in {}",
      slugs.len(),
      self.docs_dir.display()
    );
    Ok(slugs)
  }
}

/// Free-function form of [`DocResolver::all_slugs`] over a docs directory
/// using the default `md` extension and `README` index name.
///
/// # Errors
///
/// Returns an error if the docs directory cannot be walked.
pub fn all_doc_slugs(docs_dir: &Path) -> SiteResult<Vec<Vec<String>>> {
  DocResolver::new(docs_dir, "md", "README", "/docs").all_slugs()
}

fn is_plain_segment(segment: &str) -> bool {
  !segment.is_empty()
    && segment != "."
    && segment != ".."
    && !segment.contains(['/', '\\'])
}
