use std::{
  io::{self, Write},
  path::PathBuf,
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use rayon::prelude::*;
use sdocs_config::Config;
use sdocs_site::{
  Page,
  SearchIndex,
  SearchResult,
  SearchSession,
  SessionEvent,
  SessionOutcome,
  SessionState,
  Site,
};
use serde::Serialize;

mod cli;

use cli::{Cli, Commands, parse_slug};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let config = Config::load(cli.config_file.as_deref(), &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;

  let thread_count = config.jobs.unwrap_or_else(num_cpus::get);
  rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build_global()?;

  let site = Site::open(config).wrap_err("Failed to load the docs site")?;
  let mut out = io::stdout().lock();

  match cli.command {
    Commands::Render { slugs, all, html } => {
      render(&site, &mut out, &slugs, all, html)
    },
    Commands::Nav { flat } => {
      if flat {
        print_json(&mut out, site.navigation().links())
      } else {
        print_json(&mut out, site.sections())
      }
    },
    Commands::Slugs => {
      for slug in site.all_slugs()? {
        writeln!(out, "{}", site.resolver().href_for(&slug))?;
      }
      Ok(())
    },
    Commands::Index { output } => {
      if !site.config().is_search_enabled() {
        log::warn!("Search is disabled, not writing an index");
        return Ok(());
      }
      let path = if let Some(output) = output {
        let index = site.search_index();
        index.write(&output)?;
        output
      } else {
        site.write_search_index()?.0
      };
      info!("Search index written to {}", path.display());
      Ok(())
    },
    Commands::Search {
      query,
      index,
      select,
    } => search(&site, &mut out, index, &query, select),
  }
}

fn print_json<T: Serialize + ?Sized>(
  out: &mut impl Write,
  value: &T,
) -> Result<()> {
  serde_json::to_writer_pretty(&mut *out, value)?;
  writeln!(out)?;
  Ok(())
}

fn render(
  site: &Site,
  out: &mut impl Write,
  slugs: &[String],
  all: bool,
  html_only: bool,
) -> Result<()> {
  let slugs: Vec<Vec<String>> = if all {
    site.all_slugs()?
  } else if slugs.is_empty() {
    vec![Vec::new()]
  } else {
    slugs.iter().map(|arg| parse_slug(arg)).collect()
  };

  let pages: Vec<Page> = slugs
    .par_iter()
    .map(|slug| {
      site
        .page(slug)
        .wrap_err_with(|| format!("Failed to render '/{}'", slug.join("/")))
    })
    .collect::<Result<_>>()?;

  if html_only {
    for page in &pages {
      writeln!(out, "{}", page.doc.html)?;
    }
    return Ok(());
  }

  match pages.as_slice() {
    [page] => print_json(out, page),
    pages => print_json(out, pages),
  }
}

#[derive(Serialize)]
struct SearchReport<'a> {
  query:   &'a str,
  state:   SessionState,
  results: &'a [SearchResult],
}

/// Load the index at `path`, or the configured one, falling back to an index
/// built in memory.
fn load_index(site: &Site, path: Option<PathBuf>) -> Result<SearchIndex> {
  let path = path.unwrap_or_else(|| site.config().search_index_path());
  if path.is_file() {
    return SearchIndex::load(&path)
      .wrap_err_with(|| format!("Failed to load {}", path.display()));
  }
  info!("No index at {}, building one from the sidebar", path.display());
  Ok(site.search_index())
}

fn search(
  site: &Site,
  out: &mut impl Write,
  index: Option<PathBuf>,
  query: &str,
  select: Option<usize>,
) -> Result<()> {
  let index = load_index(site, index)?;
  let mut session = SearchSession::with_config(&index, &site.config().search);
  session.handle(SessionEvent::Open);
  session.handle(SessionEvent::Input(query.to_string()));

  let Some(steps) = select else {
    return print_json(out, &SearchReport {
      query,
      state: session.state(),
      results: session.results(),
    });
  };

  for _ in 0..steps {
    session.handle(SessionEvent::ArrowDown);
  }
  match session.handle(SessionEvent::Enter) {
    SessionOutcome::Navigate(href) => {
      writeln!(out, "{href}")?;
      Ok(())
    },
    SessionOutcome::None | SessionOutcome::Closed
      if session.state() == SessionState::OpenEmpty =>
    {
      bail!(
        "Query '{query}' is too short, type at least {} characters",
        site.config().search.min_query_chars
      )
    },
    SessionOutcome::None | SessionOutcome::Closed => {
      bail!("No results for '{query}'")
    },
  }
}
