//! Configuration loading for the ledger.
//!
//! Settings resolve in layers, later layers overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. User file: `<config_dir>/todo-ledger/config.toml`
//! 3. Project file: `<project>/todo-ledger.toml`
//! 4. Command-line flags (applied by the binary)
//!
//! # Example todo-ledger.toml
//!
//! ```toml
//! file = "docs/TODO.md"
//! default_section = "Backlog"
//! title = "Project TODOs"
//! lock = true
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::codec::{HEADING_PREFIX, SEPARATOR};
use crate::document::Document;
use crate::error::{LedgerError, Result};

/// Project-level configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "todo-ledger.toml";

/// Default ledger file name, relative to the project directory.
pub const DEFAULT_LEDGER_FILE: &str = "TODO.md";

/// Section used when an insert names none.
pub const DEFAULT_SECTION: &str = "General";

const DEFAULT_TITLE: &str = "TODOs";

const DEFAULT_PREAMBLE: &str = "This file tracks actionable TODOs. Each entry carries a unique ID \
and, where useful, the code location it refers to. Check items off as you address them.";

/// Effective ledger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Ledger file; relative paths resolve against the project directory.
    pub file: PathBuf,
    /// Section used when an insert does not name one.
    pub default_section: String,
    /// Title written when a new ledger is created.
    pub title: String,
    /// Prose written under the title of a new ledger.
    pub preamble: String,
    /// Take an advisory lock around every mutation.
    pub lock: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LEDGER_FILE),
            default_section: DEFAULT_SECTION.to_string(),
            title: DEFAULT_TITLE.to_string(),
            preamble: DEFAULT_PREAMBLE.to_string(),
            lock: true,
        }
    }
}

/// One configuration file; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    file: Option<PathBuf>,
    default_section: Option<String>,
    title: Option<String>,
    preamble: Option<String>,
    lock: Option<bool>,
}

impl LedgerConfig {
    /// Load configuration for a project directory.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        if let Some(user) = Self::user_config_path() {
            paths.push(user);
        }
        paths.push(Self::project_config_path(project_dir));
        Self::load_from(&paths)
    }

    /// Apply the given files in order over the defaults. Missing files are
    /// skipped.
    pub fn load_from(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Self::default();
        for path in paths {
            if let Some(layer) = read_layer(path)? {
                debug!("Applying config layer {}", path.display());
                config.apply(layer);
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// User-level configuration file, if the platform has a config dir.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("todo-ledger").join("config.toml"))
    }

    /// Project-level configuration file.
    #[must_use]
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_CONFIG_FILE)
    }

    /// Resolve the ledger file against the project directory.
    #[must_use]
    pub fn ledger_path(&self, project_dir: &Path) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            project_dir.join(&self.file)
        }
    }

    /// Skeleton written when a ledger is created.
    #[must_use]
    pub fn template(&self) -> Document {
        let mut lines = vec![format!("# {}", self.title.trim()), String::new()];
        if !self.preamble.trim().is_empty() {
            lines.extend(self.preamble.trim().lines().map(str::to_string));
            lines.push(String::new());
        }
        lines.push(SEPARATOR.to_string());
        lines.push(String::new());
        Document::from_lines(lines)
    }

    /// Check values that would produce an unreadable ledger.
    pub fn validate(&self) -> Result<()> {
        let section = self.default_section.trim();
        if section.is_empty() {
            return Err(LedgerError::config("default_section must not be empty"));
        }
        if section.contains('\n') || section.starts_with(HEADING_PREFIX.trim_end()) {
            return Err(LedgerError::config(format!(
                "default_section '{section}' is not a valid section name"
            )));
        }
        if self.title.contains('\n') {
            return Err(LedgerError::config("title must be a single line"));
        }
        if self.file.as_os_str().is_empty() {
            return Err(LedgerError::config("file must not be empty"));
        }
        Ok(())
    }

    fn apply(&mut self, layer: ConfigLayer) {
        if let Some(file) = layer.file {
            self.file = file;
        }
        if let Some(section) = layer.default_section {
            self.default_section = section;
        }
        if let Some(title) = layer.title {
            self.title = title;
        }
        if let Some(preamble) = layer.preamble {
            self.preamble = preamble;
        }
        if let Some(lock) = layer.lock {
            self.lock = lock;
        }
    }
}

fn read_layer(path: &Path) -> Result<Option<ConfigLayer>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(LedgerError::config_with_path(
                format!("cannot read {}: {e}", path.display()),
                path.to_path_buf(),
            ))
        }
    };
    toml::from_str(&content).map(Some).map_err(|e| {
        LedgerError::config_with_path(
            format!("cannot parse {}: {e}", path.display()),
            path.to_path_buf(),
        )
    })
}
