use std::io;
use std::path::{Path, PathBuf};

use super::{Platform, expand};

/// Read-only view of the filesystem and environment used during resolution.
///
/// Every probe is independent and side-effect free, so implementations must
/// be safe to call from several threads at once.
pub trait SystemProbe: Send + Sync {
    /// Whether anything exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;

    /// Whether `path` is a file the current user can execute.
    ///
    /// Errors are transient probe failures; callers treat them as "not found".
    fn is_executable(&self, path: &Path) -> io::Result<bool>;

    /// Value of an environment variable, `None` if unset.
    fn env_var(&self, name: &str) -> Option<String>;

    /// The current user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Locate a bare command name on `PATH`.
    fn find_on_path(&self, command: &str) -> Option<PathBuf>;

    /// Expand variables in a candidate pattern using this probe's environment.
    ///
    /// The home variable falls back to `home_dir()` when it is not set.
    fn expand_env_vars(&self, pattern: &str, platform: Platform) -> Option<String> {
        let lookup = |name: &str| {
            self.env_var(name).or_else(|| {
                if name == platform.home_var() {
                    self.home_dir().map(|home| home.to_string_lossy().into_owned())
                } else {
                    None
                }
            })
        };
        expand::expand_env_vars(pattern, platform, &lookup)
    }
}

/// The real operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl SystemProbe for HostProbe {
    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_executable(&self, path: &Path) -> io::Result<bool> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };

        if !metadata.is_file() {
            return Ok(false);
        }

        Ok(has_execute_permission(path, &metadata))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn find_on_path(&self, command: &str) -> Option<PathBuf> {
        match which::which(command) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!(
                    event = "core.platform.path_lookup_missed",
                    command = command,
                    error = %e
                );
                None
            }
        }
    }
}

#[cfg(unix)]
fn has_execute_permission(_path: &Path, metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(windows)]
fn has_execute_permission(path: &Path, _metadata: &std::fs::Metadata) -> bool {
    const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "cmd", "bat", "com"];
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            EXECUTABLE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

#[cfg(not(any(unix, windows)))]
fn has_execute_permission(_path: &Path, _metadata: &std::fs::Metadata) -> bool {
    true
}
