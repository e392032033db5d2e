pub mod builtins;
pub mod composer;
pub mod errors;
pub mod escape;
pub mod project;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod types;

// Re-export public API
pub use builtins::{VSCODE_FAMILY_ARGS, builtin_descriptors};
pub use composer::{EditorCommand, LaunchComposer};
pub use errors::EditorError;
pub use project::{PROJECT_MARKERS, find_project_root};
pub use registry::Registry;
pub use resolver::PathResolver;
pub use store::{DOCUMENT_VERSION, EditorList, EditorStore, EditorsDocument};
pub use types::{
    CancelFlag, CandidatePath, EditorDescriptor, EditorKind, EditorPatch, EditorStatus,
    LaunchOutcome, LaunchRequest, ResolutionSource, ResolvedEditor,
};
