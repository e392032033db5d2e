//! Well-known per-user locations under `~/.edlaunch/`.

use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::types::LauncherConfig;

/// Env var that replaces the config file location.
pub const CONFIG_FILE_ENV: &str = "EDLAUNCH_CONFIG";

/// Env var that replaces the editors document location. Wins over `store.path`.
pub const EDITORS_FILE_ENV: &str = "EDLAUNCH_EDITORS_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherPaths {
    root: PathBuf,
}

impl LauncherPaths {
    /// Resolve `~/.edlaunch`.
    pub fn resolve() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        Ok(Self::from_dir(home.join(".edlaunch")))
    }

    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn default_editors_file(&self) -> PathBuf {
        self.root.join("editors.json")
    }

    /// Location of the editors document.
    ///
    /// Priority: `EDLAUNCH_EDITORS_FILE` > `store.path` > `~/.edlaunch/editors.json`.
    pub fn editors_file(&self, config: &LauncherConfig) -> PathBuf {
        if let Some(path) = env_path(EDITORS_FILE_ENV) {
            return path;
        }

        match &config.store.path {
            Some(path) => expand_home(path),
            None => self.default_editors_file(),
        }
    }
}

/// Read a path from an env var, treating an empty value as unset.
pub(crate) fn env_path(name: &str) -> Option<PathBuf> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => {
                tracing::warn!(
                    event = "config.paths.home_dir_not_found",
                    path = %path.display(),
                    "Could not expand '~' - using path as written"
                );
                path.to_path_buf()
            }
        },
        Err(_) => path.to_path_buf(),
    }
}
