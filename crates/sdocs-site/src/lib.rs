//! # sdocs-site
//!
//! The site layer of sdocs: maps URL slugs to markdown files, parses the
//! sidebar, derives prev/next links and breadcrumbs, and builds and queries the
//! search index.
//!
//! ```no_run
//! use sdocs_config::Config;
//! use sdocs_site::Site;
//!
//! let site = Site::open(Config::default())?;
//! let page = site.page(&["commands".to_string(), "run".to_string()])?;
//! println!("{}: next is {:?}", page.doc.title, page.links.next);
//! # Ok::<(), sdocs_site::SiteError>(())
//! ```

pub mod error;
pub mod navigation;
pub mod page;
pub mod resolver;
pub mod search;

pub use crate::{
  error::{SiteError, SiteResult},
  navigation::{
    FlatNavigation,
    PageLinks,
    SidebarLink,
    SidebarSection,
    load_navigation,
    parse_navigation,
  },
  page::{Breadcrumb, NOT_FOUND_TITLE, Page, Site, breadcrumbs},
  resolver::{DocResolver, DocumentSource, all_doc_slugs},
  search::{
    MAX_RESULTS,
    MIN_QUERY_CHARS,
    SearchEntry,
    SearchIndex,
    SearchIndexBuilder,
    SearchResult,
    SearchSession,
    SessionEvent,
    SessionOutcome,
    SessionState,
    rank,
  },
};
