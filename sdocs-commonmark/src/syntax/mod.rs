//! Syntax highlighting for fenced code blocks.
//!
//! The [`SyntaxHighlighter`] trait is the backend seam; [`SyntaxManager`]
//! layers alias resolution and plain text fallback on top of a backend; and
//! [`HighlighterHandle`] owns the one manager a process builds, constructing it
//! on first use.

pub mod error;
mod syntect;
pub mod types;

use std::sync::{Arc, OnceLock};

pub use error::{SyntaxError, SyntaxResult};
pub use self::syntect::{DEFAULT_THEME, SyntectHighlighter, create_syntect_manager};
pub use types::{PLAIN_TEXT, SyntaxConfig, SyntaxHighlighter, SyntaxManager};

type ManagerFactory = dyn Fn() -> Option<SyntaxManager> + Send + Sync;

/// Shared, lazily-initialized highlighting engine.
///
/// Cloning a handle shares the same engine. The engine is built at most once:
/// callers racing on first use block until the single in-flight
/// initialization finishes and then all observe its result. A handle whose
/// initialization yields no engine leaves highlighting off for good.
#[derive(Clone)]
pub struct HighlighterHandle {
  engine:  Arc<OnceLock<Option<SyntaxManager>>>,
  factory: Arc<ManagerFactory>,
}

impl HighlighterHandle {
  /// A handle that builds the syntect engine with `theme` on first use.
  ///
  /// A failed build is logged and leaves highlighting off.
  #[must_use]
  pub fn lazy(theme: Option<String>) -> Self {
    Self::with_factory(move || {
      log::debug!("Initializing syntax highlighting engine");
      build_engine(|| create_syntect_manager(theme.as_deref()))
        .map_err(|e| log::error!("{e}"))
        .ok()
    })
  }

  /// A handle that builds its engine with `factory` on first use.
  #[must_use]
  pub fn with_factory<F>(factory: F) -> Self
  where
    F: Fn() -> Option<SyntaxManager> + Send + Sync + 'static,
  {
    Self {
      engine:  Arc::new(OnceLock::new()),
      factory: Arc::new(factory),
    }
  }

  /// A handle wrapping an already constructed engine.
  #[must_use]
  pub fn from_manager(manager: SyntaxManager) -> Self {
    let engine = OnceLock::new();
    let _ = engine.set(Some(manager));
    Self {
      engine:  Arc::new(engine),
      factory: Arc::new(|| None),
    }
  }

  /// A handle that never highlights.
  #[must_use]
  pub fn disabled() -> Self {
    let engine = OnceLock::new();
    let _ = engine.set(None);
    Self {
      engine:  Arc::new(engine),
      factory: Arc::new(|| None),
    }
  }

  /// Get the engine, building it if this is the first request.
  #[must_use]
  pub fn acquire(&self) -> Option<&SyntaxManager> {
    self
      .engine
      .get_or_init(|| {
        let manager = (self.factory)();
        if manager.is_none() {
          log::warn!(
            "Syntax highlighting engine unavailable, code blocks will be \
             rendered unstyled"
          );
        }
        manager
      })
      .as_ref()
  }

  /// Whether the engine has been built (or its construction attempted).
  #[must_use]
  pub fn is_initialized(&self) -> bool {
    self.engine.get().is_some()
  }
}

/// Run an engine constructor, turning a panic while loading syntax or theme
/// dumps into [`SyntaxError::BackendError`].
pub fn build_engine<F>(build: F) -> SyntaxResult<SyntaxManager>
where
  F: FnOnce() -> SyntaxManager,
{
  std::panic::catch_unwind(std::panic::AssertUnwindSafe(build)).map_err(
    |panic_err| {
      let reason = panic_err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic_err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
      SyntaxError::BackendError(reason.to_string())
    },
  )
}

impl Default for HighlighterHandle {
  fn default() -> Self {
    Self::lazy(None)
  }
}

impl std::fmt::Debug for HighlighterHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HighlighterHandle")
      .field("initialized", &self.is_initialized())
      .finish_non_exhaustive()
  }
}
