use clap::ArgMatches;
use tracing::info;

use edlaunch_core::EditorDescriptor;

use super::helpers::open_registry;
use crate::color;
use crate::table::Table;

pub(crate) fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let only_enabled = matches.get_flag("enabled");

    info!(
        event = "cli.list_started",
        json_output = json_output,
        only_enabled = only_enabled
    );

    let (registry, _config) = open_registry()?;
    let editors = registry.list_editors();
    let shown: Vec<&EditorDescriptor> = if only_enabled {
        editors.enabled().collect()
    } else {
        editors.iter().collect()
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else if shown.is_empty() {
        println!("No editors registered.");
    } else {
        print_editor_table(&shown);
    }

    info!(event = "cli.list_completed", count = shown.len());
    Ok(())
}

fn print_editor_table(editors: &[&EditorDescriptor]) {
    let rows = editors.iter().map(|editor| editor_row(editor)).collect();
    let table = Table::new(
        &["ID", "Name", "Kind", "Enabled", "Explicit path"],
        rows,
        &[20, 24, 7, 7, 48],
    );

    table.print(|column, cell| match column {
        0 => color::accent(cell),
        2 if cell.trim() == "builtin" => color::muted(cell),
        3 => {
            if cell.trim() == "yes" {
                color::success(cell)
            } else {
                color::caution(cell)
            }
        }
        4 if cell.trim() == "-" => color::muted(cell),
        _ => cell.to_string(),
    });
}

fn editor_row(editor: &EditorDescriptor) -> Vec<String> {
    vec![
        editor.id.clone(),
        editor.name.clone(),
        editor.kind.to_string(),
        if editor.enabled { "yes" } else { "no" }.to_string(),
        editor
            .override_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]
}
