use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("edlaunch")
        .about("Open files in external editors at a given line and column")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("list")
                .about("List registered editors")
                .arg(json_flag("Output as JSON"))
                .arg(
                    Arg::new("enabled")
                        .long("enabled")
                        .help("Only show enabled editors")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Register a custom editor")
                .arg(id_arg("Unique editor id (letters, digits, '-', '_', '.')"))
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Display name")
                        .required(true),
                )
                .arg(candidate_arg())
                .arg(template_arg())
                .arg(path_arg())
                .arg(
                    Arg::new("disabled")
                        .long("disabled")
                        .help("Register the editor disabled")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a custom editor (built-in editors can only be disabled)")
                .arg(id_arg("Editor id")),
        )
        .subcommand(
            Command::new("update")
                .about("Change an editor's definition, explicit path or enabled state")
                .arg(id_arg("Editor id"))
                .arg(Arg::new("name").long("name").help("New display name"))
                .arg(candidate_arg())
                .arg(template_arg())
                .arg(path_arg().conflicts_with("clear-path"))
                .arg(
                    Arg::new("clear-path")
                        .long("clear-path")
                        .help("Forget the explicit executable path")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("enable")
                        .long("enable")
                        .help("Enable the editor")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("disable"),
                )
                .arg(
                    Arg::new("disable")
                        .long("disable")
                        .help("Disable the editor")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Find the executable for an editor")
                .arg(id_arg("Editor id"))
                .arg(json_flag("Output as JSON")),
        )
        .subcommand(
            Command::new("open")
                .about("Open a file in an editor")
                .arg(
                    Arg::new("target")
                        .help("File or directory to open")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("editor")
                        .short('e')
                        .long("editor")
                        .help("Editor id (defaults to launch.default_editor from config)"),
                )
                .arg(
                    Arg::new("line")
                        .short('l')
                        .long("line")
                        .help("1-based line to jump to")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new("column")
                        .short('c')
                        .long("column")
                        .help("1-based column to jump to (needs --line)")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new("project")
                        .short('p')
                        .long("project")
                        .help("Project root (detected from the target when omitted)"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Print the command instead of running it")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_flag("With --dry-run, print the command as JSON").requires("dry-run")),
        )
}

fn json_flag(help: &'static str) -> Arg {
    Arg::new("json")
        .long("json")
        .help(help)
        .action(ArgAction::SetTrue)
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id").help(help).required(true).index(1)
}

fn candidate_arg() -> Arg {
    Arg::new("candidate")
        .long("candidate")
        .help("Candidate install path or command; prefix with 'linux@', 'macos@' or 'windows@' to scope it. Repeatable, tried in order")
        .action(ArgAction::Append)
}

fn template_arg() -> Arg {
    Arg::new("arg")
        .long("arg")
        .help("Argument template, e.g. '{file}:{line}:{column}'. Repeatable, kept in order")
        .action(ArgAction::Append)
        .allow_hyphen_values(true)
}

fn path_arg() -> Arg {
    Arg::new("path")
        .long("path")
        .help("Explicit executable path, checked before any candidate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_verbose_is_global() {
        let matches = build_cli()
            .try_get_matches_from(["edlaunch", "list", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_open_args() {
        let matches = build_cli()
            .try_get_matches_from([
                "edlaunch", "open", "/tmp/f.ts", "-e", "cursor", "--line", "10", "--column", "3",
                "--dry-run",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "open");
        assert_eq!(sub.get_one::<String>("target").unwrap(), "/tmp/f.ts");
        assert_eq!(sub.get_one::<String>("editor").unwrap(), "cursor");
        assert_eq!(sub.get_one::<u32>("line"), Some(&10));
        assert_eq!(sub.get_one::<u32>("column"), Some(&3));
        assert!(sub.get_flag("dry-run"));
    }

    #[test]
    fn test_open_rejects_line_zero() {
        let result = build_cli().try_get_matches_from(["edlaunch", "open", "f.ts", "--line", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_open_json_requires_dry_run() {
        let result = build_cli().try_get_matches_from(["edlaunch", "open", "f.ts", "--json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_repeated_templates_keep_order() {
        let matches = build_cli()
            .try_get_matches_from([
                "edlaunch", "add", "helix", "--name", "Helix", "--candidate", "hx", "--arg",
                "--goto", "--arg", "{file}:{line}",
            ])
            .unwrap();
        let sub = matches.subcommand_matches("add").unwrap();
        let args: Vec<&String> = sub.get_many::<String>("arg").unwrap().collect();
        assert_eq!(args, ["--goto", "{file}:{line}"]);
    }

    #[test]
    fn test_update_enable_conflicts_with_disable() {
        let result = build_cli().try_get_matches_from([
            "edlaunch", "update", "cursor", "--enable", "--disable",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_path_conflicts_with_clear() {
        let result = build_cli().try_get_matches_from([
            "edlaunch", "update", "cursor", "--path", "/opt/cursor", "--clear-path",
        ]);
        assert!(result.is_err());
    }
}
