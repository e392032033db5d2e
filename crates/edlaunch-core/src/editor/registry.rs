use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use edlaunch_config::{LauncherConfig, LauncherPaths};

use crate::platform::{HostProbe, Platform};

use super::builtins::builtin_descriptors;
use super::composer::{EditorCommand, LaunchComposer};
use super::errors::EditorError;
use super::project::find_project_root;
use super::resolver::PathResolver;
use super::store::{EditorList, EditorStore};
use super::types::{
    CancelFlag, EditorDescriptor, EditorPatch, EditorStatus, LaunchOutcome, LaunchRequest,
    ResolutionSource, ResolvedEditor,
};

/// Orchestrates the store, resolver and composer for a host.
///
/// Tracks a status per editor:
/// `Unconfigured -> Resolving -> Resolved | Unresolved`, and
/// `Resolved -> Launching -> Resolved` (with `last_error` on failure).
///
/// The registry never spawns processes; `launch` hands back a command.
pub struct Registry {
    store: EditorStore,
    resolver: PathResolver,
    composer: LaunchComposer,
    statuses: Mutex<HashMap<String, EditorStatus>>,
}

impl Registry {
    pub fn new(store: EditorStore, resolver: PathResolver, composer: LaunchComposer) -> Self {
        Self {
            store,
            resolver,
            composer,
            statuses: Mutex::new(HashMap::new()),
        }
    }

    /// Open the registry for the current machine.
    pub fn open(config: &LauncherConfig, paths: &LauncherPaths) -> Result<Self, EditorError> {
        let platform = Platform::current();
        let store = EditorStore::open(paths.editors_file(config), &builtin_descriptors())?;
        let resolver = PathResolver::from_config(Arc::new(HostProbe), platform, &config.resolver);

        info!(
            event = "core.editor.registry_opened",
            path = %store.path().display(),
            platform = %platform,
            editors = store.list().len()
        );

        Ok(Self::new(store, resolver, LaunchComposer::new(platform)))
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn add_editor(&self, descriptor: EditorDescriptor) -> Result<(), EditorError> {
        let id = descriptor.id.clone();
        self.store.add(descriptor)?;
        self.forget(&id);
        Ok(())
    }

    pub fn remove_editor(&self, id: &str) -> Result<EditorDescriptor, EditorError> {
        let removed = self.store.remove(id)?;
        self.forget(id);
        Ok(removed)
    }

    pub fn update_editor(&self, id: &str, patch: EditorPatch) -> Result<EditorDescriptor, EditorError> {
        let updated = self.store.update(id, patch)?;
        self.forget(id);
        Ok(updated)
    }

    pub fn list_editors(&self) -> EditorList {
        self.store.list()
    }

    pub fn get_editor(&self, id: &str) -> Result<EditorDescriptor, EditorError> {
        self.store.get(id).ok_or_else(|| EditorError::NotFound { id: id.to_string() })
    }

    /// Current status, or `None` for an unknown id.
    pub fn status(&self, id: &str) -> Option<EditorStatus> {
        self.store.get(id)?;
        let statuses = self.statuses.lock().unwrap_or_else(|e| e.into_inner());
        Some(statuses.get(id).cloned().unwrap_or(EditorStatus::Unconfigured))
    }

    /// Drop the cached resolution for `id`. Idempotent.
    pub fn invalidate(&self, id: &str) {
        self.resolver.invalidate(id);
    }

    pub fn resolve(&self, id: &str) -> Result<ResolvedEditor, EditorError> {
        let descriptor = self.get_editor(id)?;
        self.resolve_descriptor(&descriptor)
    }

    /// Resolve and compose a command for `request`.
    pub fn launch(&self, id: &str, request: LaunchRequest) -> Result<EditorCommand, EditorError> {
        self.launch_cancellable(id, request, &CancelFlag::new())
    }

    /// Like `launch`, checking `cancel` before resolution, before composition
    /// and right before returning the command.
    pub fn launch_cancellable(
        &self,
        id: &str,
        mut request: LaunchRequest,
        cancel: &CancelFlag,
    ) -> Result<EditorCommand, EditorError> {
        info!(
            event = "core.editor.launch_started",
            id = id,
            target = %request.target.display(),
            line = ?request.line,
            column = ?request.column
        );

        self.check_cancelled(id, cancel, None)?;

        let descriptor = self.get_editor(id)?;
        if !descriptor.enabled {
            return Err(EditorError::EditorDisabled { id: id.to_string() });
        }

        let resolved = self.resolve_descriptor(&descriptor)?;
        self.check_cancelled(id, cancel, Some(&resolved))?;

        if request.project_root.is_none() {
            request.project_root = find_project_root(&request.target, self.resolver.probe());
        }

        self.set_status(
            id,
            EditorStatus::Launching {
                executable: resolved.executable.clone(),
                source: resolved.source,
            },
        );

        let command = match self.composer.compose(&resolved, &descriptor, &request) {
            Ok(command) => command,
            Err(e) => {
                warn!(event = "core.editor.launch_failed", id = id, error = %e);
                self.set_status(id, resolved_status(&resolved, Some(e.to_string())));
                return Err(e);
            }
        };

        self.check_cancelled(id, cancel, Some(&resolved))?;

        info!(
            event = "core.editor.launch_completed",
            id = id,
            command = %command.display_line()
        );
        Ok(command)
    }

    /// Record what happened when the host ran a command from `launch`.
    pub fn report_launch_result(&self, id: &str, outcome: LaunchOutcome) -> Result<(), EditorError> {
        self.get_editor(id)?;

        let last_error = match outcome {
            LaunchOutcome::Success => {
                info!(event = "core.editor.launch_reported", id = id, success = true);
                None
            }
            LaunchOutcome::Failure { message } => {
                warn!(
                    event = "core.editor.launch_reported",
                    id = id,
                    success = false,
                    error = %message
                );
                Some(message)
            }
        };

        match self.last_executable(id) {
            Some((executable, source)) => {
                self.set_status(
                    id,
                    EditorStatus::Resolved {
                        executable,
                        source,
                        last_error,
                    },
                );
            }
            None => {
                debug!(event = "core.editor.launch_report_without_resolution", id = id);
            }
        }
        Ok(())
    }

    fn resolve_descriptor(&self, descriptor: &EditorDescriptor) -> Result<ResolvedEditor, EditorError> {
        self.set_status(&descriptor.id, EditorStatus::Resolving);

        match self.resolver.resolve(descriptor) {
            Ok(resolved) => {
                self.set_status(&descriptor.id, resolved_status(&resolved, None));
                Ok(resolved)
            }
            Err(e) => {
                self.set_status(
                    &descriptor.id,
                    EditorStatus::Unresolved {
                        error: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    fn check_cancelled(
        &self,
        id: &str,
        cancel: &CancelFlag,
        resolved: Option<&ResolvedEditor>,
    ) -> Result<(), EditorError> {
        if !cancel.is_cancelled() {
            return Ok(());
        }

        info!(event = "core.editor.launch_cancelled", id = id);
        if let Some(resolved) = resolved {
            self.set_status(id, resolved_status(resolved, None));
        }
        Err(EditorError::Cancelled { id: id.to_string() })
    }

    fn last_executable(&self, id: &str) -> Option<(PathBuf, ResolutionSource)> {
        let from_status = {
            let statuses = self.statuses.lock().unwrap_or_else(|e| e.into_inner());
            match statuses.get(id) {
                Some(EditorStatus::Launching { executable, source })
                | Some(EditorStatus::Resolved {
                    executable, source, ..
                }) => Some((executable.clone(), *source)),
                _ => None,
            }
        };

        from_status.or_else(|| {
            self.resolver
                .cached(id)
                .map(|resolved| (resolved.executable, resolved.source))
        })
    }

    fn set_status(&self, id: &str, status: EditorStatus) {
        debug!(
            event = "core.editor.status_changed",
            id = id,
            status = status.as_str()
        );
        self.statuses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), status);
    }

    /// Reset cache and status after the descriptor changed.
    fn forget(&self, id: &str) {
        self.resolver.invalidate(id);
        self.statuses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
    }
}

fn resolved_status(resolved: &ResolvedEditor, last_error: Option<String>) -> EditorStatus {
    EditorStatus::Resolved {
        executable: resolved.executable.clone(),
        source: resolved.source,
        last_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::builtins::VSCODE_FAMILY_ARGS;
    use crate::editor::resolver::test_support::FakeProbe;
    use crate::platform::SystemProbe;
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    fn registry_with(temp_dir: &TempDir, probe: impl SystemProbe + 'static, builtins: &[EditorDescriptor]) -> Registry {
        let store = EditorStore::open(temp_dir.path().join("editors.json"), builtins).unwrap();
        let resolver = PathResolver::new(Arc::new(probe), Platform::Linux);
        Registry::new(store, resolver, LaunchComposer::new(Platform::Linux))
    }

    fn code_editor() -> EditorDescriptor {
        EditorDescriptor::custom("code", "Code")
            .with_candidates(["/usr/bin/code", "/usr/local/bin/code"])
            .with_args(["--goto", "{file}:{line}:{column}"])
    }

    #[test]
    fn test_resolve_discovers_second_candidate() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(
            &temp_dir,
            FakeProbe::with_executables(&["/usr/local/bin/code"]),
            &[],
        );
        registry.add_editor(code_editor()).unwrap();

        let resolved = registry.resolve("code").unwrap();
        assert_eq!(resolved.executable, PathBuf::from("/usr/local/bin/code"));
        assert_eq!(resolved.source, ResolutionSource::Discovered);
        assert!(matches!(
            registry.status("code"),
            Some(EditorStatus::Resolved { last_error: None, .. })
        ));
    }

    #[test]
    fn test_launch_goto_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(
            &temp_dir,
            FakeProbe::with_executables(&["/usr/local/bin/code"]),
            &[],
        );
        registry.add_editor(code_editor()).unwrap();

        let request = LaunchRequest::new("/tmp/f.ts").at_line(10).at_column(3);
        let command = registry.launch("code", request).unwrap();

        assert_eq!(command.program, PathBuf::from("/usr/local/bin/code"));
        assert_eq!(command.args, vec!["--goto", "/tmp/f.ts:10:3"]);
        assert!(matches!(
            registry.status("code"),
            Some(EditorStatus::Launching { .. })
        ));
    }

    #[test]
    fn test_unresolvable_editor_is_unresolved() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(&temp_dir, FakeProbe::default(), &[]);
        registry.add_editor(code_editor()).unwrap();

        assert_eq!(registry.status("code"), Some(EditorStatus::Unconfigured));
        let err = registry.resolve("code").unwrap_err();
        assert!(matches!(err, EditorError::ExecutableNotFound { .. }));
        assert!(matches!(
            registry.status("code"),
            Some(EditorStatus::Unresolved { .. })
        ));

        let err = registry
            .launch("code", LaunchRequest::new("/tmp/f.ts"))
            .unwrap_err();
        assert!(matches!(err, EditorError::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_launch_report_success_and_failure() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(
            &temp_dir,
            FakeProbe::with_executables(&["/usr/bin/code"]),
            &[],
        );
        registry.add_editor(code_editor()).unwrap();

        registry
            .launch("code", LaunchRequest::new("/tmp/f.ts"))
            .unwrap();
        registry
            .report_launch_result(
                "code",
                LaunchOutcome::Failure {
                    message: "exit status 1".to_string(),
                },
            )
            .unwrap();
        assert_eq!(
            registry.status("code"),
            Some(EditorStatus::Resolved {
                executable: PathBuf::from("/usr/bin/code"),
                source: ResolutionSource::Discovered,
                last_error: Some("exit status 1".to_string()),
            })
        );

        registry
            .launch("code", LaunchRequest::new("/tmp/f.ts"))
            .unwrap();
        registry
            .report_launch_result("code", LaunchOutcome::Success)
            .unwrap();
        assert!(matches!(
            registry.status("code"),
            Some(EditorStatus::Resolved {
                source: ResolutionSource::Cached,
                last_error: None,
                ..
            })
        ));
    }

    #[test]
    fn test_report_for_unknown_editor() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(&temp_dir, FakeProbe::default(), &[]);
        let err = registry
            .report_launch_result("ghost", LaunchOutcome::Success)
            .unwrap_err();
        assert!(matches!(err, EditorError::NotFound { .. }));
        assert_eq!(registry.status("ghost"), None);
    }

    #[test]
    fn test_compose_error_keeps_resolution_with_last_error() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(
            &temp_dir,
            FakeProbe::with_executables(&["/usr/bin/code"]),
            &[],
        );
        registry
            .add_editor(code_editor().with_args(["{workspace}"]))
            .unwrap();

        let err = registry
            .launch("code", LaunchRequest::new("/tmp/f.ts"))
            .unwrap_err();
        assert!(matches!(err, EditorError::UnresolvedPlaceholder { .. }));
        assert!(matches!(
            registry.status("code"),
            Some(EditorStatus::Resolved {
                last_error: Some(_),
                ..
            })
        ));
    }

    #[test]
    fn test_launch_fills_project_root() {
        let temp_dir = TempDir::new().unwrap();
        let mut probe = FakeProbe::with_executables(&["/usr/bin/code"]);
        probe.plain_files.insert(PathBuf::from("/work/app/Cargo.toml"));
        let registry = registry_with(&temp_dir, probe, &[]);
        registry
            .add_editor(code_editor().with_args(VSCODE_FAMILY_ARGS.iter().copied()))
            .unwrap();

        let request = LaunchRequest::new("/work/app/src/lib.rs").at_line(3);
        let command = registry.launch("code", request).unwrap();
        assert_eq!(
            command.args,
            vec!["-r", "/work/app", "-g", "/work/app/src/lib.rs:3"]
        );
        assert_eq!(command.working_dir, Some(PathBuf::from("/work/app")));
    }

    #[test]
    fn test_explicit_project_root_kept() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(
            &temp_dir,
            FakeProbe::with_executables(&["/usr/bin/code"]),
            &[],
        );
        registry
            .add_editor(code_editor().with_args(["{project}"]))
            .unwrap();

        let request = LaunchRequest::new("/work/app/src/lib.rs").with_project_root("/elsewhere");
        let command = registry.launch("code", request).unwrap();
        assert_eq!(command.args, vec!["/elsewhere"]);
    }

    #[test]
    fn test_disabled_editor_cannot_launch() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(
            &temp_dir,
            FakeProbe::with_executables(&["/usr/bin/code"]),
            &[],
        );
        registry.add_editor(code_editor()).unwrap();
        registry.update_editor("code", EditorPatch::enable(false)).unwrap();

        let err = registry
            .launch("code", LaunchRequest::new("/tmp/f.ts"))
            .unwrap_err();
        assert!(matches!(err, EditorError::EditorDisabled { .. }));
        assert_eq!(registry.status("code"), Some(EditorStatus::Unconfigured));
    }

    #[test]
    fn test_cancelled_before_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let probe = Arc::new(FakeProbe::with_executables(&["/usr/bin/code"]));
        let store = EditorStore::open(temp_dir.path().join("editors.json"), &[]).unwrap();
        let registry = Registry::new(
            store,
            PathResolver::new(probe.clone(), Platform::Linux),
            LaunchComposer::new(Platform::Linux),
        );
        registry.add_editor(code_editor()).unwrap();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = registry
            .launch_cancellable("code", LaunchRequest::new("/tmp/f.ts"), &cancel)
            .unwrap_err();

        assert!(matches!(err, EditorError::Cancelled { .. }));
        assert!(probe.checked().is_empty());
        assert_eq!(registry.status("code"), Some(EditorStatus::Unconfigured));
    }

    /// Cancels the launch while the resolver is probing.
    struct CancellingProbe {
        inner: FakeProbe,
        cancel: CancelFlag,
    }

    impl SystemProbe for CancellingProbe {
        fn file_exists(&self, path: &Path) -> bool {
            self.cancel.cancel();
            self.inner.file_exists(path)
        }
        fn is_executable(&self, path: &Path) -> io::Result<bool> {
            self.inner.is_executable(path)
        }
        fn env_var(&self, name: &str) -> Option<String> {
            self.inner.env_var(name)
        }
        fn home_dir(&self) -> Option<PathBuf> {
            self.inner.home_dir()
        }
        fn find_on_path(&self, command: &str) -> Option<PathBuf> {
            self.inner.find_on_path(command)
        }
    }

    #[test]
    fn test_cancelled_during_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let cancel = CancelFlag::new();
        let probe = CancellingProbe {
            inner: FakeProbe::with_executables(&["/usr/bin/code"]),
            cancel: cancel.clone(),
        };
        let registry = registry_with(&temp_dir, probe, &[]);
        registry.add_editor(code_editor()).unwrap();

        let err = registry
            .launch_cancellable("code", LaunchRequest::new("/tmp/f.ts"), &cancel)
            .unwrap_err();
        assert!(matches!(err, EditorError::Cancelled { .. }));
        assert!(matches!(
            registry.status("code"),
            Some(EditorStatus::Resolved { last_error: None, .. })
        ));
    }

    #[test]
    fn test_mutations_reset_cache_and_status() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(
            &temp_dir,
            FakeProbe::with_executables(&["/usr/bin/code", "/opt/code"]),
            &[],
        );
        registry.add_editor(code_editor()).unwrap();
        registry.resolve("code").unwrap();
        assert!(registry.resolver().cached("code").is_some());

        registry
            .update_editor("code", EditorPatch::set_override_path("/opt/code"))
            .unwrap();
        assert!(registry.resolver().cached("code").is_none());
        assert_eq!(registry.status("code"), Some(EditorStatus::Unconfigured));

        let resolved = registry.resolve("code").unwrap();
        assert_eq!(resolved.source, ResolutionSource::ExplicitOverride);
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(
            &temp_dir,
            FakeProbe::with_executables(&["/usr/bin/code"]),
            &[],
        );
        registry.add_editor(code_editor()).unwrap();
        registry.resolve("code").unwrap();

        registry.invalidate("code");
        registry.invalidate("code");
        registry.invalidate("never-added");
        assert_eq!(
            registry.resolve("code").unwrap().source,
            ResolutionSource::Discovered
        );
    }

    #[test]
    fn test_builtin_not_removable() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(&temp_dir, FakeProbe::default(), &builtin_descriptors());

        let err = registry.remove_editor("vscode").unwrap_err();
        assert!(matches!(err, EditorError::NotRemovable { ref id } if id == "vscode"));
        assert!(registry.get_editor("vscode").is_ok());
    }

    #[test]
    fn test_builtin_resolves_through_path_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let mut probe = FakeProbe::default();
        probe
            .on_path
            .insert("cursor".to_string(), PathBuf::from("/home/ada/.bin/cursor"));
        let registry = registry_with(&temp_dir, probe, &builtin_descriptors());

        let resolved = registry.resolve("cursor").unwrap();
        assert_eq!(resolved.executable, PathBuf::from("/home/ada/.bin/cursor"));
    }

    #[test]
    fn test_added_editor_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let registry = registry_with(&temp_dir, FakeProbe::default(), &builtin_descriptors());
            registry.add_editor(code_editor()).unwrap();
            registry
                .update_editor("cursor", EditorPatch::enable(false))
                .unwrap();
        }

        let registry = registry_with(&temp_dir, FakeProbe::default(), &builtin_descriptors());
        assert_eq!(registry.get_editor("code").unwrap(), code_editor());
        assert!(!registry.get_editor("cursor").unwrap().enabled);
        assert_eq!(registry.list_editors().len(), builtin_descriptors().len() + 1);
    }

    #[test]
    fn test_open_uses_configured_store_path() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LauncherPaths::from_dir(temp_dir.path());
        let config = LauncherConfig::default();

        temp_env::with_var(edlaunch_config::EDITORS_FILE_ENV, None::<&str>, || {
            let registry = Registry::open(&config, &paths).unwrap();
            assert_eq!(registry.store().path(), paths.default_editors_file());
            assert!(registry.get_editor("vscode").is_ok());
        });
    }

    #[test]
    fn test_registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
