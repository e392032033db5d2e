use clap::ArgMatches;
use tracing::info;

use super::helpers::{open_registry, report_failure};
use crate::color;

pub(crate) fn handle_resolve_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let id = matches.get_one::<String>("id").ok_or("Editor id is required")?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.resolve_started", id = id, json_output = json_output);

    let (registry, _config) = open_registry()?;
    let resolved = match registry.resolve(id) {
        Ok(resolved) => resolved,
        Err(e) => {
            report_failure(&format!("Failed to resolve editor '{}'", id), &e);
            return Err(e.into());
        }
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        println!("{}", color::bold(&resolved.id));
        println!("  Executable: {}", color::accent(&resolved.executable.display().to_string()));
        println!("  Source:     {}", color::source(resolved.source.as_str()));
        println!("  Resolved:   {}", color::muted(&resolved.resolved_at.to_rfc3339()));
    }

    info!(
        event = "cli.resolve_completed",
        id = id,
        executable = %resolved.executable.display(),
        source = %resolved.source
    );
    Ok(())
}
