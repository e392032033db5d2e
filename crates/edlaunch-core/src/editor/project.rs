use std::path::{Path, PathBuf};

use tracing::debug;

use crate::platform::SystemProbe;

/// Files or directories whose presence marks a project root.
pub const PROJECT_MARKERS: &[&str] = &[
    ".git",
    ".idea",
    ".vscode",
    "Cargo.toml",
    "package.json",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "pyproject.toml",
    "requirements.txt",
    ".project",
    "CMakeLists.txt",
    "Makefile",
];

/// Nearest ancestor of `target` holding a project marker.
///
/// Falls back to the target's parent directory, or `None` for a bare name.
pub fn find_project_root(target: &Path, probe: &dyn SystemProbe) -> Option<PathBuf> {
    let start = target.parent().filter(|dir| !dir.as_os_str().is_empty())?;

    for dir in start.ancestors() {
        if let Some(marker) = PROJECT_MARKERS
            .iter()
            .find(|marker| probe.file_exists(&dir.join(marker)))
        {
            debug!(
                event = "core.editor.project_root_found",
                root = %dir.display(),
                marker = marker
            );
            return Some(dir.to_path_buf());
        }
    }

    debug!(
        event = "core.editor.project_root_fallback",
        root = %start.display()
    );
    Some(start.to_path_buf())
}
