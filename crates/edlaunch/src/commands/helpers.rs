use clap::ArgMatches;
use tracing::{error, warn};

use edlaunch_config::{LauncherConfig, LauncherPaths, load_config};
use edlaunch_core::{CandidatePath, EditorError, Platform, Registry, events};

use crate::color;

/// Load config, falling back to defaults with a warning when it is unusable.
pub(crate) fn load_config_with_warning(paths: &LauncherPaths) -> LauncherConfig {
    match load_config(paths) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{}",
                color::warning(&format!("Warning: could not load config: {}", e))
            );
            eprintln!("{}", color::hint("  Using default settings."));
            warn!(event = "cli.config_load_failed", error = %e);
            events::log_app_error(&e);
            LauncherConfig::default()
        }
    }
}

pub(crate) fn open_registry() -> Result<(Registry, LauncherConfig), Box<dyn std::error::Error>> {
    let paths = LauncherPaths::resolve()?;
    let config = load_config_with_warning(&paths);

    match Registry::open(&config, &paths) {
        Ok(registry) => Ok((registry, config)),
        Err(e) => {
            report_failure("Failed to open editor registry", &e);
            Err(e.into())
        }
    }
}

/// Print and log an editor error the same way for every command.
pub(crate) fn report_failure(context: &str, e: &EditorError) {
    eprintln!("{}", color::error(&format!("{}: {}", context, e)));
    if let EditorError::ExecutableNotFound { id, .. } = e {
        eprintln!(
            "{}",
            color::hint(&format!(
                "  Hint: set one with 'edlaunch update {} --path <executable>'",
                id
            ))
        );
    }
    error!(event = "cli.command_failed", context = context, error = %e);
    events::log_app_error(e);
}

/// `linux@/usr/bin/code` is scoped to one platform; anything else applies everywhere.
pub(crate) fn parse_candidate(raw: &str) -> CandidatePath {
    if let Some((prefix, pattern)) = raw.split_once('@')
        && let Ok(platform) = prefix.parse::<Platform>()
    {
        return CandidatePath::on(pattern, platform);
    }
    CandidatePath::any(raw)
}

pub(crate) fn candidates_from(matches: &ArgMatches) -> Option<Vec<CandidatePath>> {
    matches
        .get_many::<String>("candidate")
        .map(|values| values.map(|raw| parse_candidate(raw)).collect())
}

pub(crate) fn templates_from(matches: &ArgMatches) -> Option<Vec<String>> {
    matches
        .get_many::<String>("arg")
        .map(|values| values.cloned().collect())
}
