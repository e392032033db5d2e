use clap::ArgMatches;
use tracing::{info, warn};

use edlaunch_core::EditorPatch;

use super::helpers::{candidates_from, open_registry, report_failure, templates_from};
use crate::color;

pub(crate) fn handle_update_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let id = matches.get_one::<String>("id").ok_or("Editor id is required")?;
    let patch = patch_from(matches)?;

    if patch.is_empty() {
        eprintln!("{}", color::warning("Nothing to update."));
        eprintln!(
            "{}",
            color::hint("  Pass --name, --candidate, --arg, --path, --clear-path, --enable or --disable.")
        );
        warn!(event = "cli.update_empty", id = id);
        return Err("Nothing to update".into());
    }

    info!(event = "cli.update_started", id = id, patch = ?patch);

    let (registry, _config) = open_registry()?;
    match registry.update_editor(id, patch) {
        Ok(updated) => {
            println!(
                "Updated editor '{}' (enabled: {}, explicit path: {})",
                color::accent(&updated.id),
                color::enabled(updated.enabled),
                updated
                    .override_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| color::muted("-"))
            );
            info!(event = "cli.update_completed", id = id);
            Ok(())
        }
        Err(e) => {
            report_failure(&format!("Failed to update editor '{}'", id), &e);
            Err(e.into())
        }
    }
}

fn patch_from(matches: &ArgMatches) -> Result<EditorPatch, std::io::Error> {
    let enabled = if matches.get_flag("enable") {
        Some(true)
    } else if matches.get_flag("disable") {
        Some(false)
    } else {
        None
    };

    let override_path = if matches.get_flag("clear-path") {
        Some(None)
    } else {
        matches
            .get_one::<String>("path")
            .map(std::path::absolute)
            .transpose()?
            .map(Some)
    };

    Ok(EditorPatch {
        name: matches.get_one::<String>("name").cloned(),
        candidates: candidates_from(matches),
        args: templates_from(matches),
        enabled,
        override_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_cli;

    fn patch_for(args: &[&str]) -> EditorPatch {
        let mut argv = vec!["edlaunch", "update", "cursor"];
        argv.extend_from_slice(args);
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        patch_from(matches.subcommand_matches("update").unwrap()).unwrap()
    }

    #[test]
    fn test_patch_disable() {
        assert_eq!(patch_for(&["--disable"]), EditorPatch::enable(false));
    }

    #[test]
    fn test_patch_set_and_clear_path() {
        assert_eq!(
            patch_for(&["--path", "/opt/cursor/cursor"]),
            EditorPatch::set_override_path("/opt/cursor/cursor")
        );
        assert_eq!(patch_for(&["--clear-path"]), EditorPatch::clear_override_path());
    }

    #[test]
    fn test_patch_relative_path_made_absolute() {
        let patch = patch_for(&["--path", "tools/cursor"]);
        let path = patch.override_path.flatten().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("tools/cursor"));
    }

    #[test]
    fn test_patch_definition_fields() {
        let patch = patch_for(&["--name", "Cursor Nightly", "--arg", "{file}"]);
        assert!(patch.touches_definition());
        assert_eq!(patch.args, Some(vec!["{file}".to_string()]));
        assert!(patch.candidates.is_none());
    }

    #[test]
    fn test_empty_patch() {
        assert!(patch_for(&[]).is_empty());
    }
}
