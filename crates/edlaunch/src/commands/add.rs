use clap::ArgMatches;
use tracing::info;

use edlaunch_core::EditorDescriptor;

use super::helpers::{candidates_from, open_registry, report_failure, templates_from};
use crate::color;

pub(crate) fn handle_add_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = descriptor_from(matches)?;

    info!(
        event = "cli.add_started",
        id = %descriptor.id,
        candidates = descriptor.candidates.len(),
        args = descriptor.args.len()
    );

    let (registry, _config) = open_registry()?;
    let id = descriptor.id.clone();

    match registry.add_editor(descriptor) {
        Ok(()) => {
            println!("Added editor '{}'", color::accent(&id));
            info!(event = "cli.add_completed", id = %id);
            Ok(())
        }
        Err(e) => {
            report_failure(&format!("Failed to add editor '{}'", id), &e);
            Err(e.into())
        }
    }
}

fn descriptor_from(matches: &ArgMatches) -> Result<EditorDescriptor, Box<dyn std::error::Error>> {
    let id = matches.get_one::<String>("id").ok_or("Editor id is required")?;
    let name = matches.get_one::<String>("name").ok_or("--name is required")?;

    let mut descriptor = EditorDescriptor::custom(id, name);
    if let Some(candidates) = candidates_from(matches) {
        descriptor.candidates = candidates;
    }
    if let Some(args) = templates_from(matches) {
        descriptor.args = args;
    }
    if let Some(path) = matches.get_one::<String>("path") {
        descriptor = descriptor.with_override_path(std::path::absolute(path)?);
    }
    descriptor.enabled = !matches.get_flag("disabled");
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_cli;
    use edlaunch_core::{CandidatePath, Platform};
    use std::path::PathBuf;

    #[test]
    fn test_descriptor_from_matches() {
        let matches = build_cli()
            .try_get_matches_from([
                "edlaunch",
                "add",
                "zed",
                "--name",
                "Zed",
                "--candidate",
                "macos@/Applications/Zed.app/Contents/MacOS/cli",
                "--candidate",
                "zed",
                "--arg",
                "{file}:{line}:{column}",
                "--path",
                "/opt/zed/bin/zed",
                "--disabled",
            ])
            .unwrap();
        let descriptor = descriptor_from(matches.subcommand_matches("add").unwrap()).unwrap();

        assert_eq!(descriptor.id, "zed");
        assert_eq!(descriptor.name, "Zed");
        assert!(!descriptor.is_builtin());
        assert!(!descriptor.enabled);
        assert_eq!(
            descriptor.candidates,
            vec![
                CandidatePath::on("/Applications/Zed.app/Contents/MacOS/cli", Platform::MacOs),
                CandidatePath::any("zed"),
            ]
        );
        assert_eq!(descriptor.args, vec!["{file}:{line}:{column}"]);
        assert_eq!(descriptor.override_path, Some(PathBuf::from("/opt/zed/bin/zed")));
    }

    #[test]
    fn test_relative_path_made_absolute() {
        let matches = build_cli()
            .try_get_matches_from(["edlaunch", "add", "hx", "--name", "Helix", "--path", "bin/hx"])
            .unwrap();
        let descriptor = descriptor_from(matches.subcommand_matches("add").unwrap()).unwrap();

        let path = descriptor.override_path.unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("bin/hx"));
    }
}
