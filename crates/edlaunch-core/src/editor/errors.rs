use crate::errors::LauncherError;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Editor '{id}' already exists")]
    DuplicateId { id: String },

    #[error("Editor '{id}' is built-in and cannot be removed (disable it instead)")]
    NotRemovable { id: String },

    #[error("Editor '{id}' not found")]
    NotFound { id: String },

    #[error(
        "No executable found for editor '{id}' ({tried} candidate path(s) checked). Set an explicit path for it."
    )]
    ExecutableNotFound { id: String, tried: usize },

    #[error("Argument template references '{{{placeholder}}}' but no value was supplied")]
    UnresolvedPlaceholder { placeholder: String },

    #[error("Failed to persist editors to '{path}': {message}")]
    PersistenceFailure { path: String, message: String },

    #[error("Editors file '{path}' is corrupted: {message}. Fix or delete it to reset.")]
    StoreCorrupted { path: String, message: String },

    #[error("Editor '{id}' failed to launch: {message}")]
    LaunchFailure { id: String, message: String },

    #[error("Invalid editor definition: {message}")]
    InvalidDescriptor { message: String },

    #[error("Editor '{id}' is built-in; only 'enabled' and the explicit path can be changed")]
    BuiltinImmutable { id: String },

    #[error("Editor '{id}' is disabled")]
    EditorDisabled { id: String },

    #[error("Launch of editor '{id}' was cancelled")]
    Cancelled { id: String },
}

impl LauncherError for EditorError {
    fn error_code(&self) -> &'static str {
        match self {
            EditorError::DuplicateId { .. } => "EDITOR_DUPLICATE_ID",
            EditorError::NotRemovable { .. } => "EDITOR_NOT_REMOVABLE",
            EditorError::NotFound { .. } => "EDITOR_NOT_FOUND",
            EditorError::ExecutableNotFound { .. } => "EDITOR_EXECUTABLE_NOT_FOUND",
            EditorError::UnresolvedPlaceholder { .. } => "EDITOR_UNRESOLVED_PLACEHOLDER",
            EditorError::PersistenceFailure { .. } => "EDITOR_PERSISTENCE_FAILURE",
            EditorError::StoreCorrupted { .. } => "EDITOR_STORE_CORRUPTED",
            EditorError::LaunchFailure { .. } => "EDITOR_LAUNCH_FAILURE",
            EditorError::InvalidDescriptor { .. } => "EDITOR_INVALID_DESCRIPTOR",
            EditorError::BuiltinImmutable { .. } => "EDITOR_BUILTIN_IMMUTABLE",
            EditorError::EditorDisabled { .. } => "EDITOR_DISABLED",
            EditorError::Cancelled { .. } => "EDITOR_LAUNCH_CANCELLED",
        }
    }

    fn is_user_error(&self) -> bool {
        !matches!(
            self,
            EditorError::PersistenceFailure { .. }
                | EditorError::StoreCorrupted { .. }
                | EditorError::LaunchFailure { .. }
        )
    }
}
