use clap::ArgMatches;
use tracing::error;

mod add;
mod helpers;
mod list;
mod open;
mod remove;
mod resolve;
mod update;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("list", sub_matches)) => list::handle_list_command(sub_matches),
        Some(("add", sub_matches)) => add::handle_add_command(sub_matches),
        Some(("remove", sub_matches)) => remove::handle_remove_command(sub_matches),
        Some(("update", sub_matches)) => update::handle_update_command(sub_matches),
        Some(("resolve", sub_matches)) => resolve::handle_resolve_command(sub_matches),
        Some(("open", sub_matches)) => open::handle_open_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
