//! Teisearch: a terminal search screen for tracked entities.
//!
//! Teisearch is a TUI application that provides:
//! - A dynamic attribute form scoped to the selected program
//! - Program selection with an all-programs placeholder
//! - Paged search over a local JSON store with inline previews for small
//!   result sets
//! - A modal date picker for date-typed attributes
//! - Asynchronous search execution on a background worker thread
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal Runtime (main.rs)                         │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │  ← Presenter
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - Rendering   │   │ - JSON I/O    │   │ - Async search│
//! │ - Theming     │   │ - Querying    │   │ - Catalog load│
//! │ - Components  │   │ - Backend API │   │ - mpsc bridge │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Entity model (domain/entity, domain/query)       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber setup                         │
//! │  - Rotating log file under the data directory       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model and the
//!   search presenter
//! - [`domain`]: Core domain types (attributes, programs, instances, errors)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`storage`]: JSON file persistence layer with query execution
//! - [`worker`]: Background worker for async search execution
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: File-based tracing setup
//!
//! # Configuration
//!
//! The application is configured via a TOML file, overridden by CLI flags:
//!
//! ```toml
//! # ~/.config/teisearch/config.toml
//! data_path = "~/.local/share/teisearch/entities.json"
//! theme = "catppuccin-mocha"
//! trace_level = "info"
//! page_size = 50
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Startup** (`main.rs`):
//!    - Parse CLI flags and merge them over the TOML file via
//!      [`Config::load`]
//!    - Initialize tracing (optional)
//!    - Open the JSON store, or seed it when the `seed` subcommand runs
//!    - Spawn the search worker thread
//!
//! 2. **Resume**:
//!    - The event loop emits `Event::Resumed`, the handler returns
//!      `Action::InitPresenter`, and the presenter loads the catalog and
//!      dispatches the first search
//!
//! 3. **Interaction**:
//!    - Terminal keys become [`Event`]s; `handle_event` mutates view state
//!      and emits [`Action`]s the runtime routes to the presenter
//!    - The presenter pushes complete models back through the
//!      [`app::SearchView`] trait
//!
//! 4. **Search**:
//!    - Dispatches are stamped with a generation; the worker answers over a
//!      channel and stale generations are dropped on receipt
//!
//! # Examples
//!
//! ## Basic Usage (Library)
//!
//! ```rust
//! use teisearch::{handle_event, initialize, Config, Event};
//!
//! let config = Config::default();
//! let mut state = initialize(&config)?;
//!
//! let (should_render, actions) = handle_event(&mut state, &Event::Resumed)?;
//! assert!(should_render);
//! assert!(!actions.is_empty());
//! # Ok::<(), teisearch::TeiSearchError>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## Presenter-Owned Filter State
//!
//! The view never aggregates its own widget state back into a query. The
//! presenter owns the authoritative attribute values, program scope, and
//! query text, and pushes complete models into the view after every change.
//!
//! ## Generation-Stamped Searches
//!
//! Every search dispatch carries a monotonically increasing generation.
//! Responses carrying an older generation are dropped on receipt, so a
//! newer search supersedes anything still in flight without cancellation
//! plumbing.
//!
//! ## Inline Preview Policy
//!
//! The result list stays scannable by only materializing preview rows for
//! small result sets; larger totals render the counter alone and a hint to
//! narrow the search.

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, Focus, SearchPresenter, SearchView};
pub use domain::{Program, Result, TeiSearchError};
pub use ui::Theme;

use std::path::PathBuf;

use crate::infrastructure::paths::{expand_tilde, get_config_file, get_data_dir};

/// Default number of instances per result page.
const DEFAULT_PAGE_SIZE: usize = 50;

/// Application configuration merged from defaults, the TOML config file,
/// and CLI flags.
///
/// Values resolve in that order: every field starts at its default, the
/// config file overrides the defaults, and CLI flags override the file.
///
/// # Example
///
/// ```toml
/// # ~/.config/teisearch/config.toml
/// data_path = "~/.local/share/teisearch/entities.json"
/// theme = "catppuccin-mocha"
/// theme_file = "/path/to/theme.toml"
/// trace_level = "debug"
/// page_size = 50
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON store file.
    ///
    /// Default: `~/.local/share/teisearch/entities.json`. The trace log
    /// lives in the same directory.
    pub data_path: PathBuf,

    /// Path the file configuration was read from, if any.
    pub config_path: Option<PathBuf>,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for the format.
    pub theme_file: Option<PathBuf>,

    /// Tracing level for the log file.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any
    /// `EnvFilter` directive. Unset leaves tracing disabled.
    pub trace_level: Option<String>,

    /// Number of instances requested per result page. Default: 50
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: get_data_dir().join("entities.json"),
            config_path: None,
            theme_name: None,
            theme_file: None,
            trace_level: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// CLI-provided configuration values layered over the config file.
///
/// Every field is optional; `None` leaves the file value (or the default)
/// in place. The binary fills this from clap and hands it to
/// [`Config::load`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--data <path>`: JSON store location.
    pub data_path: Option<String>,

    /// `--config <path>`: config file location. When set, the file must
    /// exist.
    pub config_path: Option<String>,

    /// `--theme <name>`: built-in theme name.
    pub theme_name: Option<String>,

    /// `--theme-file <path>`: custom TOML theme.
    pub theme_file: Option<String>,

    /// `--trace-level <level>`: tracing filter directive.
    pub trace_level: Option<String>,

    /// `--page-size <n>`: instances per result page.
    pub page_size: Option<usize>,
}

/// Raw deserialization target for the TOML config file.
///
/// Unknown keys are ignored so configs survive version skew.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    data_path: Option<String>,
    theme: Option<String>,
    theme_file: Option<String>,
    trace_level: Option<String>,
    page_size: Option<usize>,
}

impl Config {
    /// Loads configuration by merging defaults, the TOML file, and CLI
    /// overrides.
    ///
    /// The config file is taken from `overrides.config_path` when given and
    /// from `~/.config/teisearch/config.toml` otherwise. A missing default
    /// file is treated as empty; a missing explicitly-passed file is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`TeiSearchError::Config`] when the file cannot be read
    /// (other than the default file being absent) or does not parse as
    /// TOML.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let (path, explicit) = match &overrides.config_path {
            Some(raw) => (PathBuf::from(expand_tilde(raw)), true),
            None => (get_config_file(), false),
        };
        Self::load_from(path, explicit, overrides)
    }

    fn load_from(path: PathBuf, explicit: bool, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = Self::default();

        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let file: ConfigFile = toml::from_str(&raw).map_err(|e| {
                    TeiSearchError::Config(format!("{}: {e}", path.display()))
                })?;
                config.apply_file(file);
                config.config_path = Some(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {}
            Err(e) => {
                return Err(TeiSearchError::Config(format!("{}: {e}", path.display())));
            }
        }

        config.apply_overrides(overrides);
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(data_path) = file.data_path {
            self.data_path = PathBuf::from(expand_tilde(&data_path));
        }
        if let Some(theme) = file.theme {
            self.theme_name = Some(theme);
        }
        if let Some(theme_file) = file.theme_file {
            self.theme_file = Some(PathBuf::from(expand_tilde(&theme_file)));
        }
        if let Some(trace_level) = file.trace_level {
            self.trace_level = Some(trace_level);
        }
        if let Some(page_size) = file.page_size {
            self.page_size = page_size.max(1);
        }
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(data_path) = &overrides.data_path {
            self.data_path = PathBuf::from(expand_tilde(data_path));
        }
        if let Some(theme) = &overrides.theme_name {
            self.theme_name = Some(theme.clone());
        }
        if let Some(theme_file) = &overrides.theme_file {
            self.theme_file = Some(PathBuf::from(expand_tilde(theme_file)));
        }
        if let Some(trace_level) = &overrides.trace_level {
            self.trace_level = Some(trace_level.clone());
        }
        if let Some(page_size) = overrides.page_size {
            self.page_size = page_size.max(1);
        }
    }
}

/// Initializes application state from configuration.
///
/// Resolves the theme (custom file, then built-in name, then default) and
/// creates an [`AppState`] ready for event processing. The catalog and
/// result panels stay empty until the presenter's first pushes arrive.
///
/// # Errors
///
/// Returns [`TeiSearchError::Theme`] when an explicitly-configured theme
/// cannot be loaded.
///
/// # Example
///
/// ```rust
/// use teisearch::{initialize, Config};
///
/// let config = Config {
///     theme_name: Some("catppuccin-mocha".to_string()),
///     ..Default::default()
/// };
///
/// let state = initialize(&config)?;
/// assert!(!state.has_catalog());
/// # Ok::<(), teisearch::TeiSearchError>(())
/// ```
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!(data_path = %config.data_path.display(), "initializing teisearch");

    let theme = Theme::resolve(config.theme_name.as_deref(), config.theme_file.as_deref())?;
    Ok(AppState::new(theme))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_fill_every_field() {
        let config = Config::default();

        assert!(config.data_path.ends_with("entities.json"));
        assert_eq!(config.page_size, 50);
        assert!(config.theme_name.is_none());
        assert!(config.trace_level.is_none());
    }

    #[test]
    fn the_file_overrides_defaults_and_the_cli_overrides_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "theme = \"catppuccin-latte\"\npage_size = 25\ntrace_level = \"debug\"\n",
        );

        let overrides = ConfigOverrides {
            theme_name: Some("catppuccin-frappe".to_string()),
            ..Default::default()
        };
        let config = Config::load_from(path.clone(), true, &overrides).unwrap();

        assert_eq!(config.theme_name.as_deref(), Some("catppuccin-frappe"));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn a_missing_explicit_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let result = Config::load_from(missing, true, &ConfigOverrides::default());

        assert!(matches!(result, Err(TeiSearchError::Config(_))));
    }

    #[test]
    fn a_missing_default_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");

        let config = Config::load_from(missing, false, &ConfigOverrides::default()).unwrap();

        assert_eq!(config.page_size, 50);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "theme = [not toml");

        let result = Config::load_from(path, true, &ConfigOverrides::default());

        assert!(matches!(result, Err(TeiSearchError::Config(_))));
    }

    #[test]
    fn tilde_paths_expand_in_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "data_path = \"~/records/entities.json\"\n");

        let config = Config::load_from(path, true, &ConfigOverrides::default()).unwrap();

        assert!(!config.data_path.to_string_lossy().starts_with('~'));
        assert!(config.data_path.ends_with("records/entities.json"));
    }

    #[test]
    fn a_zero_page_size_is_clamped() {
        let overrides = ConfigOverrides {
            page_size: Some(0),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let config =
            Config::load_from(dir.path().join("config.toml"), false, &overrides).unwrap();

        assert_eq!(config.page_size, 1);
    }
}
