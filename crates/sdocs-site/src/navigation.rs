//! Sidebar navigation.
//!
//! The navigation file is a markdown bullet list:
//!
//! ```markdown
//! - [Introduction](/)
//!
//! - **Commands**
//! - [Run](/commands/run)
//! - [GitHub](https://github.com/sreq/sreq)
//! ```
//!
//! Parsing classifies each line, turns the classification into an event and
//! folds the events into sections. Only bold bullets and link bullets carry
//! meaning; every other line is ignored.
use std::{fs, io, path::Path, sync::LazyLock};

use regex::Regex;
use sdocs_commonmark::utils::never_matching_regex;
use serde::{Deserialize, Serialize};

use crate::error::{SiteError, SiteResult};

static HEADING_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^-\s+\*\*(.+?)\*\*$").unwrap_or_else(|e| {
    log::error!("Failed to compile HEADING_LINE_RE regex: {e}");
    never_matching_regex()
  })
});

static LINK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^-\s+\[(.+?)\]\((.+?)\)$").unwrap_or_else(|e| {
    log::error!("Failed to compile LINK_LINE_RE regex: {e}");
    never_matching_regex()
  })
});

static URI_SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap_or_else(|e| {
    log::error!("Failed to compile URI_SCHEME_RE regex: {e}");
    never_matching_regex()
  })
});

/// A sidebar entry pointing at a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarLink {
  pub label: String,
  /// Site-rooted href, e.g. `/docs/commands/run`.
  pub href:  String,
}

/// A group of sidebar links under an optional heading.
///
/// The heading is empty for links that precede the first heading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarSection {
  pub heading: String,
  pub links:   Vec<SidebarLink>,
}

impl SidebarSection {
  fn is_empty(&self) -> bool {
    self.heading.is_empty() && self.links.is_empty()
  }
}

/// Classification of one navigation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavLine<'a> {
  Heading(&'a str),
  Link { label: &'a str, target: &'a str },
  Other,
}

impl<'a> NavLine<'a> {
  fn classify(line: &'a str) -> Self {
    let line = line.trim();
    if let Some(caps) = HEADING_LINE_RE.captures(line) {
      if let Some(heading) = caps.get(1) {
        return Self::Heading(heading.as_str());
      }
    }
    if let Some(caps) = LINK_LINE_RE.captures(line) {
      if let (Some(label), Some(target)) = (caps.get(1), caps.get(2)) {
        return Self::Link {
          label:  label.as_str(),
          target: target.as_str(),
        };
      }
    }
    Self::Other
  }
}

/// What a classified line does to the section being built.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NavEvent {
  StartSection(String),
  AddLink(SidebarLink),
  Skip,
}

impl NavEvent {
  fn from_line(line: NavLine<'_>, base_href: &str) -> Self {
    match line {
      NavLine::Heading(heading) => Self::StartSection(heading.to_string()),
      NavLine::Link { label, target } => {
        if is_external(target) {
          log::trace!("Dropping external sidebar link '{target}'");
          return Self::Skip;
        }
        Self::AddLink(SidebarLink {
          label: label.to_string(),
          href:  site_href(base_href, target),
        })
      },
      NavLine::Other => Self::Skip,
    }
  }
}

/// Folds navigation events into sections.
#[derive(Debug, Default)]
struct SectionAccumulator {
  sections: Vec<SidebarSection>,
  current:  SidebarSection,
}

impl SectionAccumulator {
  fn apply(&mut self, event: NavEvent) {
    match event {
      NavEvent::StartSection(heading) => {
        let previous = std::mem::replace(&mut self.current, SidebarSection {
          heading,
          links: Vec::new(),
        });
        if !previous.is_empty() {
          self.sections.push(previous);
        }
      },
      NavEvent::AddLink(link) => self.current.links.push(link),
      NavEvent::Skip => {},
    }
  }

  fn finish(mut self) -> Vec<SidebarSection> {
    if !self.current.is_empty() {
      self.sections.push(self.current);
    }
    self.sections
  }
}

/// Whether a link target points off-site.
fn is_external(target: &str) -> bool {
  target.starts_with("//") || URI_SCHEME_RE.is_match(target)
}

/// Rewrite a navigation target to a site-rooted href under `base_href`.
fn site_href(base_href: &str, target: &str) -> String {
  let path = target.strip_prefix('/').unwrap_or(target);
  let path = path.strip_suffix('/').unwrap_or(path);
  if path.is_empty() {
    base_href.to_string()
  } else {
    format!("{base_href}/{path}")
  }
}

/// Parse navigation source into sections, in source order.
#[must_use]
pub fn parse_navigation(source: &str, base_href: &str) -> Vec<SidebarSection> {
  let mut accumulator = SectionAccumulator::default();
  for line in source.lines() {
    accumulator.apply(NavEvent::from_line(NavLine::classify(line), base_href));
  }
  accumulator.finish()
}

/// Read and parse the navigation file at `path`.
///
/// A missing file yields no sections.
///
/// # Errors
///
/// Returns [`SiteError::Io`] if the file exists but cannot be read.
pub fn load_navigation(
  path: &Path,
  base_href: &str,
) -> SiteResult<Vec<SidebarSection>> {
  match fs::read_to_string(path) {
    Ok(source) => Ok(parse_navigation(&source, base_href)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      log::debug!(
        "Navigation file {} not found, sidebar is empty",
        path.display()
      );
      Ok(Vec::new())
    },
    Err(e) => Err(SiteError::io(path, e)),
  }
}

/// Neighbours of a page in navigation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
  pub prev: Option<SidebarLink>,
  pub next: Option<SidebarLink>,
}

/// All sidebar links in one sequence, section boundaries dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatNavigation {
  links: Vec<SidebarLink>,
}

impl FlatNavigation {
  #[must_use]
  pub fn new(sections: &[SidebarSection]) -> Self {
    Self {
      links: sections
        .iter()
        .flat_map(|section| section.links.iter().cloned())
        .collect(),
    }
  }

  #[must_use]
  pub fn links(&self) -> &[SidebarLink] {
    &self.links
  }

  /// The links immediately before and after `href`.
  ///
  /// A page that is not in the navigation has neither.
  #[must_use]
  pub fn neighbors(&self, href: &str) -> PageLinks {
    let Some(position) = self.links.iter().position(|link| link.href == href)
    else {
      return PageLinks::default();
    };

    PageLinks {
      prev: position
        .checked_sub(1)
        .and_then(|i| self.links.get(i))
        .cloned(),
      next: self.links.get(position + 1).cloned(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn link(label: &str, href: &str) -> SidebarLink {
    SidebarLink {
      label: label.to_string(),
      href:  href.to_string(),
    }
  }

  #[test]
  fn test_heading_link_and_external() {
    let sections = parse_navigation(
      "- **Commands**\n- [Run](/commands/run)\n- [External](https://example.com)",
      "/docs",
    );
    assert_eq!(sections, vec![SidebarSection {
      heading: "Commands".to_string(),
      links:   vec![link("Run", "/docs/commands/run")],
    }]);
  }

  #[test]
  fn test_unheaded_leading_section() {
    let sections = parse_navigation(
      "- [Introduction](/)\n- [Install](installation/)\n\n- **Guides**\n- \
       [Auth](/guides/auth)\n",
      "/docs",
    );
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].heading, "");
    assert_eq!(sections[0].links, vec![
      link("Introduction", "/docs"),
      link("Install", "/docs/installation"),
    ]);
    assert_eq!(sections[1].heading, "Guides");
  }

  #[test]
  fn test_empty_headed_section_is_kept() {
    let sections = parse_navigation("- **Empty**\n- **Next**\n- [A](/a)", "/docs");
    assert_eq!(sections.len(), 2);
    assert!(sections[0].links.is_empty());
    assert_eq!(sections[1].links, vec![link("A", "/docs/a")]);
  }

  #[test]
  fn test_other_lines_are_ignored() {
    let source = "# Sidebar\n\nSome prose.\n* [Star](/star)\n-[NoSpace](/x)\n  \
                  - [Indented](/indented)\n- **Bold** trailing\n";
    let sections = parse_navigation(source, "/docs");
    assert_eq!(sections, vec![SidebarSection {
      heading: String::new(),
      links:   vec![link("Indented", "/docs/indented")],
    }]);
  }

  #[test]
  fn test_external_link_forms() {
    for target in [
      "http://a.b",
      "https://a.b",
      "mailto:me@a.b",
      "//cdn.a.b/x",
      "ftp://a.b",
    ] {
      assert!(is_external(target), "{target}");
    }
    for target in ["/commands/run", "commands/run", "", "/"] {
      assert!(!is_external(target), "{target}");
    }
  }

  #[test]
  fn test_empty_source() {
    assert!(parse_navigation("", "/docs").is_empty());
    assert!(parse_navigation("\n\n   \n", "/docs").is_empty());
  }

  #[test]
  fn test_crlf_lines() {
    let sections =
      parse_navigation("- **Commands**\r\n- [Run](/commands/run)\r\n", "/docs");
    assert_eq!(sections[0].heading, "Commands");
    assert_eq!(sections[0].links, vec![link("Run", "/docs/commands/run")]);
  }

  #[test]
  fn test_flat_navigation_neighbors() {
    let sections = parse_navigation(
      "- [A](/a)\n- **S**\n- [B](/b)\n- [C](/c)",
      "/docs",
    );
    let flat = FlatNavigation::new(&sections);
    assert_eq!(flat.links().len(), 3);

    let first = flat.neighbors("/docs/a");
    assert_eq!(first.prev, None);
    assert_eq!(first.next, Some(link("B", "/docs/b")));

    let middle = flat.neighbors("/docs/b");
    assert_eq!(middle.prev, Some(link("A", "/docs/a")));
    assert_eq!(middle.next, Some(link("C", "/docs/c")));

    let last = flat.neighbors("/docs/c");
    assert_eq!(last.prev, Some(link("B", "/docs/b")));
    assert_eq!(last.next, None);

    assert_eq!(flat.neighbors("/docs/unlisted"), PageLinks::default());
  }
}
