//! Editors shipped with edlaunch.
//!
//! All of them are VS Code derivatives and share its CLI: `-r` reuses a window,
//! a folder argument opens the project tree, and `-g file:line:column` jumps
//! to a location.

use crate::platform::Platform;

use super::types::{CandidatePath, EditorDescriptor};

/// Argument template shared by the VS Code family.
pub const VSCODE_FAMILY_ARGS: &[&str] = &["-r", "{project}", "-g", "{file}:{line}:{column}"];

struct BuiltinEditor {
    id: &'static str,
    name: &'static str,
    command: &'static str,
    /// Install directory name under `Programs\` on Windows.
    windows_dir: &'static str,
    /// Executable name inside `windows_dir` for the GUI binary.
    windows_exe: &'static str,
    /// Whether a machine-wide `Program Files` install exists.
    windows_machine_wide: bool,
    /// macOS bundle name without the `.app` suffix.
    macos_app: &'static str,
}

const BUILTIN_EDITORS: &[BuiltinEditor] = &[
    BuiltinEditor {
        id: "vscode",
        name: "VS Code",
        command: "code",
        windows_dir: "Microsoft VS Code",
        windows_exe: "Code.exe",
        windows_machine_wide: true,
        macos_app: "Visual Studio Code",
    },
    BuiltinEditor {
        id: "cursor",
        name: "Cursor",
        command: "cursor",
        windows_dir: "cursor",
        windows_exe: "Cursor.exe",
        windows_machine_wide: false,
        macos_app: "Cursor",
    },
    BuiltinEditor {
        id: "antigravity",
        name: "Antigravity",
        command: "antigravity",
        windows_dir: "Antigravity",
        windows_exe: "Antigravity.exe",
        windows_machine_wide: true,
        macos_app: "Antigravity",
    },
    BuiltinEditor {
        id: "windsurf",
        name: "Windsurf",
        command: "windsurf",
        windows_dir: "Windsurf",
        windows_exe: "Windsurf.exe",
        windows_machine_wide: true,
        macos_app: "Windsurf",
    },
    BuiltinEditor {
        id: "trae",
        name: "Trae",
        command: "trae",
        windows_dir: "Trae",
        windows_exe: "Trae.exe",
        windows_machine_wide: false,
        macos_app: "Trae",
    },
    BuiltinEditor {
        id: "trae-cn",
        name: "Trae CN",
        command: "trae-cn",
        windows_dir: "Trae CN",
        windows_exe: "Trae CN.exe",
        windows_machine_wide: false,
        macos_app: "Trae CN",
    },
    BuiltinEditor {
        id: "codebuddy",
        name: "CodeBuddy",
        command: "buddy",
        windows_dir: "CodeBuddy",
        windows_exe: "CodeBuddy.exe",
        windows_machine_wide: false,
        macos_app: "CodeBuddy",
    },
    BuiltinEditor {
        id: "qoder",
        name: "Qoder",
        command: "qoder",
        windows_dir: "Qoder",
        windows_exe: "Qoder.exe",
        windows_machine_wide: false,
        macos_app: "Qoder",
    },
];

impl BuiltinEditor {
    fn candidates(&self) -> Vec<CandidatePath> {
        let mut candidates = vec![
            CandidatePath::on(
                format!(
                    r"%LOCALAPPDATA%\Programs\{}\bin\{}.cmd",
                    self.windows_dir, self.command
                ),
                Platform::Windows,
            ),
            CandidatePath::on(
                format!(
                    r"%LOCALAPPDATA%\Programs\{}\{}",
                    self.windows_dir, self.windows_exe
                ),
                Platform::Windows,
            ),
        ];

        if self.windows_machine_wide {
            candidates.push(CandidatePath::on(
                format!(
                    r"%ProgramFiles%\{}\bin\{}.cmd",
                    self.windows_dir, self.command
                ),
                Platform::Windows,
            ));
        }

        let bundle_cli = format!(
            "{}.app/Contents/Resources/app/bin/{}",
            self.macos_app, self.command
        );
        candidates.push(CandidatePath::on(
            format!("/Applications/{}", bundle_cli),
            Platform::MacOs,
        ));
        candidates.push(CandidatePath::on(
            format!("~/Applications/{}", bundle_cli),
            Platform::MacOs,
        ));
        candidates.push(CandidatePath::on(
            format!("/opt/homebrew/bin/{}", self.command),
            Platform::MacOs,
        ));

        candidates.push(CandidatePath::on(
            format!("/usr/bin/{}", self.command),
            Platform::Linux,
        ));
        candidates.push(CandidatePath::on(
            format!("/snap/bin/{}", self.command),
            Platform::Linux,
        ));
        candidates.push(CandidatePath::on(
            format!("~/.local/bin/{}", self.command),
            Platform::Linux,
        ));

        candidates.push(CandidatePath::any(self.command));
        candidates
    }

    fn descriptor(&self) -> EditorDescriptor {
        EditorDescriptor::builtin(self.id, self.name)
            .with_candidates(self.candidates())
            .with_args(VSCODE_FAMILY_ARGS.iter().copied())
    }
}

/// Descriptors for every shipped editor, in menu order.
pub fn builtin_descriptors() -> Vec<EditorDescriptor> {
    BUILTIN_EDITORS.iter().map(BuiltinEditor::descriptor).collect()
}
