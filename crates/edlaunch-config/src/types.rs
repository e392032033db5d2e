use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default lifetime of a cached path resolution.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Upper bound accepted for `resolver.cache_ttl_secs` (one week).
pub const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Top-level configuration loaded from `~/.edlaunch/config.toml`.
///
/// Every section is optional; a missing file yields `LauncherConfig::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub store: StoreConfig,
    pub resolver: ResolverConfig,
    pub launch: LaunchConfig,
}

/// Where editor descriptors are persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Explicit editors document path. `~/` is expanded against the home directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Seconds a successful resolution is reused. `0` disables caching.
    pub cache_ttl_secs: u64,
    /// Probe candidate paths on worker threads.
    pub parallel_probes: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            parallel_probes: true,
        }
    }
}

impl ResolverConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Editor id used when the caller does not name one.
    pub default_editor: Option<String>,
}

impl LaunchConfig {
    /// Pick the editor id to launch.
    ///
    /// Priority: explicit override > configured default.
    pub fn resolve_editor_id(&self, cli_override: Option<&str>) -> Option<String> {
        cli_override
            .map(str::to_string)
            .or_else(|| self.default_editor.clone())
    }
}
