use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{error, info};

use edlaunch_core::{EditorError, LaunchOutcome, LaunchRequest};

use super::helpers::{open_registry, report_failure};
use crate::color;

pub(crate) fn handle_open_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let target = matches
        .get_one::<String>("target")
        .ok_or("Target argument is required")?;
    let editor_override = matches.get_one::<String>("editor").map(String::as_str);
    let dry_run = matches.get_flag("dry-run");
    let json_output = matches.get_flag("json");

    let (registry, config) = open_registry()?;

    let Some(id) = config.launch.resolve_editor_id(editor_override) else {
        eprintln!("{}", color::error("No editor given."));
        eprintln!(
            "{}",
            color::hint("  Pass --editor <id> or set launch.default_editor in ~/.edlaunch/config.toml")
        );
        error!(event = "cli.open_no_editor");
        return Err("No editor given and no launch.default_editor configured".into());
    };

    let request = request_from(matches, target)?;

    info!(
        event = "cli.open_started",
        id = %id,
        target = %request.target.display(),
        dry_run = dry_run
    );

    let command = match registry.launch(&id, request) {
        Ok(command) => command,
        Err(e) => {
            report_failure(&format!("Failed to open with '{}'", id), &e);
            return Err(e.into());
        }
    };

    if dry_run {
        if json_output {
            println!("{}", serde_json::to_string_pretty(&command)?);
        } else {
            println!("{}", command.display_line());
        }
        info!(event = "cli.open_completed", id = %id, dry_run = true);
        return Ok(());
    }

    match command.to_command().spawn() {
        Ok(child) => {
            registry.report_launch_result(&id, LaunchOutcome::Success)?;
            println!(
                "Opened {} in {}",
                color::accent(target),
                color::bold(&id)
            );
            info!(
                event = "cli.open_completed",
                id = %id,
                pid = child.id(),
                command = %command.display_line()
            );
            Ok(())
        }
        Err(spawn_error) => {
            let message = spawn_error.to_string();
            registry.report_launch_result(
                &id,
                LaunchOutcome::Failure {
                    message: message.clone(),
                },
            )?;
            let e = EditorError::LaunchFailure {
                id: id.clone(),
                message,
            };
            report_failure(&format!("Failed to open with '{}'", id), &e);
            Err(e.into())
        }
    }
}

fn request_from(matches: &ArgMatches, target: &str) -> Result<LaunchRequest, std::io::Error> {
    let mut request = LaunchRequest::new(std::path::absolute(target)?);
    if let Some(line) = matches.get_one::<u32>("line") {
        request = request.at_line(*line);
    }
    if let Some(column) = matches.get_one::<u32>("column") {
        request = request.at_column(*column);
    }
    if let Some(project) = matches.get_one::<String>("project") {
        request = request.with_project_root(std::path::absolute(PathBuf::from(project))?);
    }
    Ok(request)
}
