use clap::ArgMatches;
use tracing::info;

use super::helpers::{open_registry, report_failure};
use crate::color;

pub(crate) fn handle_remove_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let id = matches.get_one::<String>("id").ok_or("Editor id is required")?;

    info!(event = "cli.remove_started", id = id);

    let (registry, _config) = open_registry()?;
    match registry.remove_editor(id) {
        Ok(removed) => {
            println!(
                "Removed editor '{}' ({})",
                color::accent(&removed.id),
                removed.name
            );
            info!(event = "cli.remove_completed", id = id);
            Ok(())
        }
        Err(e) => {
            report_failure(&format!("Failed to remove editor '{}'", id), &e);
            Err(e.into())
        }
    }
}
