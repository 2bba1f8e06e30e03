//! Frontmatter separation.
//!
//! A document may open with a block of `key: value` metadata delimited by
//! `---` lines:
//!
//! ```text
//! ---
//! title: Running requests
//! ---
//! # Body starts here
//! ```
//!
//! The block is parsed as YAML. Malformed metadata never fails a render: the
//! block is still removed from the body and the metadata is reported empty.
use serde_json::{Map, Value};

const DELIMITER: &str = "---";

/// Errors raised while parsing a frontmatter block.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
  #[error("Invalid frontmatter: {0}")]
  Yaml(#[from] serde_yaml::Error),
  #[error("Frontmatter must be a mapping of keys to values")]
  NotAMapping,
}

/// A document split into its metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter<'a> {
  pub meta: Map<String, Value>,
  pub body: &'a str,
}

impl Frontmatter<'_> {
  /// The `title` key, if it holds a non-empty string or number.
  #[must_use]
  pub fn title(&self) -> Option<String> {
    match self.meta.get("title")? {
      Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
      Value::Number(n) => Some(n.to_string()),
      _ => None,
    }
  }
}

/// Split `raw` into frontmatter metadata and body content.
///
/// Documents without a leading delimiter line, or with an unterminated block,
/// are returned unchanged with empty metadata.
#[must_use]
pub fn split(raw: &str) -> Frontmatter<'_> {
  let Some((block, body)) = locate(raw) else {
    return Frontmatter {
      meta: Map::new(),
      body: raw,
    };
  };

  let meta = parse_block(block).unwrap_or_else(|e| {
    log::warn!("Ignoring frontmatter: {e}");
    Map::new()
  });

  Frontmatter { meta, body }
}

/// Parse the text between the delimiters into a metadata map.
///
/// # Errors
///
/// Returns an error if the block is not valid YAML or is not a mapping.
pub fn parse_block(block: &str) -> Result<Map<String, Value>, FrontmatterError> {
  if block.trim().is_empty() {
    return Ok(Map::new());
  }
  match serde_yaml::from_str::<Value>(block)? {
    Value::Object(map) => Ok(map),
    Value::Null => Ok(Map::new()),
    _ => Err(FrontmatterError::NotAMapping),
  }
}

/// Find the metadata block and the body that follows it.
fn locate(raw: &str) -> Option<(&str, &str)> {
  let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
  let mut lines = raw.split_inclusive('\n');
  let first = lines.next()?;
  if first.trim_end() != DELIMITER {
    return None;
  }

  let block_start = first.len();
  let mut offset = block_start;
  for line in lines {
    if line.trim_end() == DELIMITER {
      let block = &raw[block_start..offset];
      let body = &raw[offset + line.len()..];
      return Some((block, body));
    }
    offset += line.len();
  }

  None
}
