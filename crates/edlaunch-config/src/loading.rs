use std::path::Path;

use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::paths::{CONFIG_FILE_ENV, LauncherPaths, env_path};
use crate::types::{LauncherConfig, MAX_CACHE_TTL_SECS};

/// Load the user configuration.
///
/// `EDLAUNCH_CONFIG` names an explicit file that must exist. Otherwise
/// `~/.edlaunch/config.toml` is read if present, and defaults are used if not.
pub fn load_config(paths: &LauncherPaths) -> Result<LauncherConfig, ConfigError> {
    if let Some(explicit) = env_path(CONFIG_FILE_ENV) {
        if !explicit.exists() {
            return Err(ConfigError::ConfigNotFound {
                path: explicit.display().to_string(),
            });
        }
        return load_config_from(&explicit);
    }

    let path = paths.config_file();
    if !path.exists() {
        debug!(
            event = "config.load_defaults",
            path = %path.display(),
            reason = "file not found"
        );
        return Ok(LauncherConfig::default());
    }

    load_config_from(&path)
}

/// Read, parse, and validate a config file.
pub fn load_config_from(path: &Path) -> Result<LauncherConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    info!(
        event = "config.load_completed",
        path = %path.display(),
        cache_ttl_secs = config.resolver.cache_ttl_secs,
        parallel_probes = config.resolver.parallel_probes,
        default_editor = ?config.launch.default_editor
    );

    Ok(config)
}

pub fn parse_config(content: &str) -> Result<LauncherConfig, ConfigError> {
    let config: LauncherConfig =
        toml::from_str(content).map_err(|e| ConfigError::ConfigParseError {
            message: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &LauncherConfig) -> Result<(), ConfigError> {
    if config.resolver.cache_ttl_secs > MAX_CACHE_TTL_SECS {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "resolver.cache_ttl_secs must be at most {} (got {})",
                MAX_CACHE_TTL_SECS, config.resolver.cache_ttl_secs
            ),
        });
    }

    if let Some(editor) = &config.launch.default_editor
        && editor.trim().is_empty()
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "launch.default_editor cannot be empty".to_string(),
        });
    }

    if let Some(path) = &config.store.path
        && path.as_os_str().is_empty()
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "store.path cannot be empty".to_string(),
        });
    }

    Ok(())
}
