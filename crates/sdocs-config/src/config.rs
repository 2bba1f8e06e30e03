use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, search::SearchConfig};

/// File name of the search index bundle written to the output directory.
pub const SEARCH_INDEX_FILE: &str = "search-data.json";

/// Config file names tried, in order, when none is given explicitly.
const CONFIG_FILENAMES: [&str; 5] = [
  "sdocs.toml",
  "sdocs.json",
  ".sdocs.toml",
  ".sdocs.json",
  ".config/sdocs.toml",
];

/// Configuration for the sdocs documentation site.
///
/// [`Config`] describes where documents live, how hrefs are formed, how code
/// is highlighted and how the search index is built. Fields are typically
/// loaded from a TOML or JSON config file, but can also be set with
/// `--config KEY=VALUE` overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Directory containing the markdown documents.
  pub docs_dir: PathBuf,

  /// Navigation file, relative to `docs_dir`.
  pub sidebar_file: String,

  /// Extension of document files, without the dot.
  pub extension: String,

  /// File stem of a directory's landing page.
  pub index_name: String,

  /// Site-rooted prefix of every document href.
  pub base_href: String,

  /// Site title appended to page titles.
  pub site_title: String,

  /// Directory build artifacts are written to.
  pub output_dir: PathBuf,

  /// Number of threads used to build the search index. Defaults to the
  /// number of CPUs.
  pub jobs: Option<usize>,

  /// Whether fenced code blocks are syntax highlighted.
  pub highlight_code: bool,

  /// Syntax highlighting theme name.
  pub highlight_theme: Option<String>,

  /// Search configuration.
  pub search: SearchConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      docs_dir:        PathBuf::from("docs/content"),
      sidebar_file:    "_sidebar.md".to_string(),
      extension:       "md".to_string(),
      index_name:      "README".to_string(),
      base_href:       "/docs".to_string(),
      site_title:      "sreq docs".to_string(),
      output_dir:      PathBuf::from("build"),
      jobs:            None,
      highlight_code:  true,
      highlight_theme: None,
      search:          SearchConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let ext = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match ext.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from an explicit file or a discovered one, apply
  /// `--config` overrides and validate the result.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be loaded, an override is invalid,
  /// or the resulting configuration fails validation.
  pub fn load(
    config_file: Option<&Path>,
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some(path) = config_file {
      Self::from_file(path)?
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// Nested search keys use a `search.` prefix, e.g. `search.max_results=5`.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, a key is not
  /// recognized, or a value cannot be parsed as the expected type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value does not parse.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "docs_dir" => self.docs_dir = PathBuf::from(value),
      "sidebar_file" => self.sidebar_file = value.to_string(),
      "extension" => self.extension = value.trim_start_matches('.').to_string(),
      "index_name" => self.index_name = value.to_string(),
      "base_href" => self.base_href = value.to_string(),
      "site_title" => self.site_title = value.to_string(),
      "output_dir" => self.output_dir = PathBuf::from(value),
      "jobs" => {
        self.jobs = if value.is_empty() {
          None
        } else {
          Some(parse_usize(key, value)?)
        };
      },
      "highlight_code" => self.highlight_code = parse_bool(key, value)?,
      "highlight_theme" => {
        self.highlight_theme =
          (!value.is_empty()).then(|| value.to_string());
      },
      "search.enable" => self.search.enable = parse_bool(key, value)?,
      "search.max_content_chars" => {
        self.search.max_content_chars = parse_usize(key, value)?;
      },
      "search.max_results" => {
        self.search.max_results = parse_usize(key, value)?;
      },
      "search.min_query_chars" => {
        self.search.min_query_chars = parse_usize(key, value)?;
      },
      "search.default_section" => {
        self.search.default_section = value.to_string();
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }

    Ok(())
  }

  /// Check that the configuration is usable.
  ///
  /// # Errors
  ///
  /// Returns an error listing every problem found.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if !self.base_href.starts_with('/') {
      errors.push(format!(
        "base_href must start with '/', got '{}'",
        self.base_href
      ));
    }
    if self.extension.is_empty() {
      errors.push("extension must not be empty".to_string());
    }
    if self.index_name.is_empty() {
      errors.push("index_name must not be empty".to_string());
    }
    if self.jobs == Some(0) {
      errors.push("jobs must be at least 1".to_string());
    }
    for (name, value) in [
      ("search.max_content_chars", self.search.max_content_chars),
      ("search.max_results", self.search.max_results),
      ("search.min_query_chars", self.search.min_query_chars),
    ] {
      if value == 0 {
        errors.push(format!("{name} must be greater than zero"));
      }
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Config(format!(
        "Invalid configuration:\n  {}",
        errors.join("\n  ")
      )))
    }
  }

  /// Path of the navigation file.
  #[must_use]
  pub fn sidebar_path(&self) -> PathBuf {
    self.docs_dir.join(&self.sidebar_file)
  }

  /// Path the search index bundle is written to.
  #[must_use]
  pub fn search_index_path(&self) -> PathBuf {
    self.output_dir.join(SEARCH_INDEX_FILE)
  }

  /// Whether the search index should be built.
  #[must_use]
  pub const fn is_search_enabled(&self) -> bool {
    self.search.enable
  }

  /// Search for a config file in the current directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let current_dir = std::env::current_dir().ok()?;
        Self::find_config_file_in(&current_dir)
      })
      .clone()
  }

  /// Search for a config file in `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
  value.parse().map_err(|_| {
    ConfigError::Config(format!(
      "Invalid value for '{key}': '{value}'. Expected a positive integer"
    ))
  })
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.docs_dir, PathBuf::from("docs/content"));
    assert_eq!(config.base_href, "/docs");
    assert_eq!(config.search.max_content_chars, 500);
    assert_eq!(config.search.max_results, 10);
    assert_eq!(config.search.min_query_chars, 2);
    assert_eq!(config.search.default_section, "Getting Started");
    assert_eq!(
      config.sidebar_path(),
      PathBuf::from("docs/content/_sidebar.md")
    );
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_from_toml_file_with_nested_search() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sdocs.toml");
    fs::write(
      &path,
      "docs_dir = \"content\"\nsite_title = \"Manual\"\n\n[search]\nmax_results \
       = 5\n",
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.docs_dir, PathBuf::from("content"));
    assert_eq!(config.site_title, "Manual");
    assert_eq!(config.search.max_results, 5);
    // Unset fields keep their defaults.
    assert_eq!(config.search.min_query_chars, 2);
    assert_eq!(config.extension, "md");
  }

  #[test]
  fn test_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sdocs.json");
    fs::write(&path, r#"{"base_href": "/manual", "highlight_code": false}"#)
      .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.base_href, "/manual");
    assert!(!config.highlight_code);
  }

  #[test]
  fn test_from_file_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sdocs.yaml");
    fs::write(&path, "docs_dir: x").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Unsupported config file format"));
  }

  #[test]
  fn test_from_file_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sdocs.toml");
    fs::write(&path, "docs_dir = [").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML config"));
  }

  #[test]
  fn test_apply_overrides() {
    let mut config = Config::default();
    config
      .apply_overrides(&[
        "site_title=My Docs".to_string(),
        "jobs=4".to_string(),
        "highlight_code=no".to_string(),
        "highlight_theme=Nord".to_string(),
        "search.max_results = 3".to_string(),
        "search.default_section=Intro".to_string(),
        "extension=.markdown".to_string(),
      ])
      .unwrap();

    assert_eq!(config.site_title, "My Docs");
    assert_eq!(config.jobs, Some(4));
    assert!(!config.highlight_code);
    assert_eq!(config.highlight_theme.as_deref(), Some("Nord"));
    assert_eq!(config.search.max_results, 3);
    assert_eq!(config.search.default_section, "Intro");
    assert_eq!(config.extension, "markdown");
  }

  #[test]
  fn test_empty_override_clears_optional_fields() {
    let mut config = Config {
      jobs: Some(2),
      highlight_theme: Some("Nord".to_string()),
      ..Config::default()
    };
    config.apply_override("jobs", "").unwrap();
    config.apply_override("highlight_theme", "").unwrap();
    assert_eq!(config.jobs, None);
    assert_eq!(config.highlight_theme, None);
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();
    let err = config
      .apply_overrides(&["no_equals_sign".to_string()])
      .unwrap_err();
    assert!(err.to_string().contains("Expected KEY=VALUE"));
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();
    let err = config
      .apply_overrides(&["unknown_key=value".to_string()])
      .unwrap_err();
    assert!(err.to_string().contains("Unknown configuration key"));
  }

  #[test]
  fn test_apply_overrides_invalid_values() {
    let mut config = Config::default();
    let err = config.apply_override("search.enable", "maybe").unwrap_err();
    assert!(err.to_string().contains("Invalid boolean"));

    let err = config.apply_override("jobs", "many").unwrap_err();
    assert!(err.to_string().contains("Invalid value"));
  }

  #[test]
  fn test_validate_rejects_bad_values() {
    let config = Config {
      base_href: "docs".to_string(),
      search: SearchConfig {
        max_results: 0,
        ..SearchConfig::default()
      },
      ..Config::default()
    };

    let message = config.validate().unwrap_err().to_string();
    assert!(message.contains("base_href must start with '/'"));
    assert!(message.contains("search.max_results must be greater than zero"));
  }

  #[test]
  fn test_find_config_file_in_prefers_first_name() {
    let dir = TempDir::new().unwrap();
    assert_eq!(Config::find_config_file_in(dir.path()), None);

    fs::create_dir(dir.path().join(".config")).unwrap();
    fs::write(dir.path().join(".config/sdocs.toml"), "").unwrap();
    assert_eq!(
      Config::find_config_file_in(dir.path()),
      Some(dir.path().join(".config/sdocs.toml"))
    );

    fs::write(dir.path().join("sdocs.toml"), "").unwrap();
    assert_eq!(
      Config::find_config_file_in(dir.path()),
      Some(dir.path().join("sdocs.toml"))
    );
  }

  #[test]
  fn test_load_applies_overrides_and_validates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sdocs.toml");
    fs::write(&path, "site_title = \"From File\"\n").unwrap();

    let config =
      Config::load(Some(&path), &["output_dir=dist".to_string()]).unwrap();
    assert_eq!(config.site_title, "From File");
    assert_eq!(
      config.search_index_path(),
      PathBuf::from("dist/search-data.json")
    );

    let err =
      Config::load(Some(&path), &["base_href=docs".to_string()]).unwrap_err();
    assert!(err.to_string().contains("base_href"));
  }
}
