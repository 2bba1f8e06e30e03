use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for sdocs
#[derive(Parser, Debug)]
#[command(author, version, about = "sdocs: render, navigate and search a docs tree")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to a configuration file (TOML or JSON). Discovered from the
  /// working directory when omitted.
  #[arg(short = 'c', long = "config-file", global = true)]
  pub config_file: Option<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the sdocs CLI.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
  /// Render pages and print them as JSON.
  Render {
    /// Slugs to render, e.g. `commands/run`. Renders the docs root when
    /// omitted.
    slugs: Vec<String>,

    /// Render every document under the docs directory.
    #[arg(short, long, conflicts_with = "slugs")]
    all: bool,

    /// Print only the HTML body.
    #[arg(long)]
    html: bool,
  },

  /// Print the parsed sidebar as JSON.
  Nav {
    /// Print the links in reading order, without sections.
    #[arg(short, long)]
    flat: bool,
  },

  /// Print the href of every renderable document.
  Slugs,

  /// Build the search index and write it to disk.
  Index {
    /// Where to write the index. Defaults to `<output_dir>/search-data.json`.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Run a search session against the index.
  Search {
    /// Text typed into the search box.
    query: String,

    /// Index to search. Built from the sidebar when omitted and no index has
    /// been written.
    #[arg(short, long)]
    index: Option<PathBuf>,

    /// Move the selection down N times and activate it.
    #[arg(short, long, value_name = "N")]
    select: Option<usize>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

/// Split a `/`-separated slug argument into segments.
///
/// Leading, trailing and repeated slashes are ignored, so `/`, `` and
/// `commands//run/` are all accepted.
#[must_use]
pub fn parse_slug(arg: &str) -> Vec<String> {
  arg
    .split('/')
    .filter(|segment| !segment.is_empty())
    .map(str::to_string)
    .collect()
}
