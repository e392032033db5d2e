//! Core library for edlaunch.
//!
//! Keeps a persistent registry of external editors, resolves each one to an
//! executable on the current machine and composes the command that opens a
//! file at a given line and column. Spawning the command is left to the host.

pub mod editor;
pub mod errors;
pub mod events;
pub mod logging;
pub mod platform;

pub use editor::{
    CancelFlag, CandidatePath, EditorCommand, EditorDescriptor, EditorError, EditorKind,
    EditorList, EditorPatch, EditorStatus, EditorStore, LaunchComposer, LaunchOutcome,
    LaunchRequest, PathResolver, Registry, ResolutionSource, ResolvedEditor,
};
pub use errors::LauncherError;
pub use logging::init_logging;
pub use platform::{HostProbe, Platform, SystemProbe};

pub use edlaunch_config::{LauncherConfig, LauncherPaths, load_config};
