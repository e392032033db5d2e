use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Whether a descriptor ships with edlaunch or was added by the user.
///
/// Built-in descriptors can be disabled or given an explicit path, never removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    Builtin,
    #[default]
    Custom,
}

impl EditorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorKind::Builtin => "builtin",
            EditorKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for EditorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One guess at where an editor is installed.
///
/// Serialized as a plain string when it applies to every platform, otherwise
/// as `{ "pattern": ..., "platforms": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CandidateRepr", into = "CandidateRepr")]
pub struct CandidatePath {
    pub pattern: String,
    /// Empty means "all platforms".
    pub platforms: Vec<Platform>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CandidateRepr {
    Any(String),
    Scoped {
        pattern: String,
        #[serde(default)]
        platforms: Vec<Platform>,
    },
}

impl From<CandidateRepr> for CandidatePath {
    fn from(repr: CandidateRepr) -> Self {
        match repr {
            CandidateRepr::Any(pattern) => CandidatePath::any(pattern),
            CandidateRepr::Scoped { pattern, platforms } => CandidatePath { pattern, platforms },
        }
    }
}

impl From<CandidatePath> for CandidateRepr {
    fn from(candidate: CandidatePath) -> Self {
        if candidate.platforms.is_empty() {
            CandidateRepr::Any(candidate.pattern)
        } else {
            CandidateRepr::Scoped {
                pattern: candidate.pattern,
                platforms: candidate.platforms,
            }
        }
    }
}

impl CandidatePath {
    pub fn any(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            platforms: Vec::new(),
        }
    }

    pub fn on(pattern: impl Into<String>, platform: Platform) -> Self {
        Self {
            pattern: pattern.into(),
            platforms: vec![platform],
        }
    }

    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }

    /// A pattern with no separators or variables is a command looked up on `PATH`.
    pub fn is_bare_command(&self) -> bool {
        !self.pattern.is_empty()
            && !self
                .pattern
                .contains(|c: char| matches!(c, '/' | '\\' | '~' | '$' | '%'))
    }
}

impl From<&str> for CandidatePath {
    fn from(pattern: &str) -> Self {
        CandidatePath::any(pattern)
    }
}

fn default_enabled() -> bool {
    true
}

/// Persisted definition of one editor.
///
/// Fields this version does not know about are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: EditorKind,
    #[serde(default)]
    pub candidates: Vec<CandidatePath>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_path: Option<PathBuf>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EditorDescriptor {
    pub fn custom(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: EditorKind::Custom,
            candidates: Vec::new(),
            args: Vec::new(),
            enabled: true,
            override_path: None,
            extra: serde_json::Map::new(),
        }
    }

    pub(crate) fn builtin(id: &str, name: &str) -> Self {
        Self {
            kind: EditorKind::Builtin,
            ..Self::custom(id, name)
        }
    }

    pub fn with_candidates<I, C>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CandidatePath>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn is_builtin(&self) -> bool {
        self.kind == EditorKind::Builtin
    }
}

/// How a `ResolvedEditor` was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    ExplicitOverride,
    Discovered,
    Cached,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::ExplicitOverride => "explicit_override",
            ResolutionSource::Discovered => "discovered",
            ResolutionSource::Cached => "cached",
        }
    }
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A descriptor turned into a verified executable. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEditor {
    pub id: String,
    pub executable: PathBuf,
    pub resolved_at: DateTime<Utc>,
    pub source: ResolutionSource,
}

/// What to open. Built per invocation and consumed by `Registry::launch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub target: PathBuf,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub project_root: Option<PathBuf>,
}

impl LaunchRequest {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            line: None,
            column: None,
            project_root: None,
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn at_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}

/// Partial update for `EditorStore::update`. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorPatch {
    pub name: Option<String>,
    pub candidates: Option<Vec<CandidatePath>>,
    pub args: Option<Vec<String>>,
    pub enabled: Option<bool>,
    /// `Some(None)` clears the explicit path.
    pub override_path: Option<Option<PathBuf>>,
}

impl EditorPatch {
    pub fn enable(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn set_override_path(path: impl Into<PathBuf>) -> Self {
        Self {
            override_path: Some(Some(path.into())),
            ..Default::default()
        }
    }

    pub fn clear_override_path() -> Self {
        Self {
            override_path: Some(None),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the patch changes what a built-in editor is, rather than how it is used.
    pub fn touches_definition(&self) -> bool {
        self.name.is_some() || self.candidates.is_some() || self.args.is_some()
    }

    pub(crate) fn apply_to(self, descriptor: &mut EditorDescriptor) {
        if let Some(name) = self.name {
            descriptor.name = name;
        }
        if let Some(candidates) = self.candidates {
            descriptor.candidates = candidates;
        }
        if let Some(args) = self.args {
            descriptor.args = args;
        }
        if let Some(enabled) = self.enabled {
            descriptor.enabled = enabled;
        }
        if let Some(override_path) = self.override_path {
            descriptor.override_path = override_path;
        }
    }
}

/// Per-editor state tracked by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditorStatus {
    Unconfigured,
    Resolving,
    Resolved {
        executable: PathBuf,
        source: ResolutionSource,
        last_error: Option<String>,
    },
    Unresolved {
        error: String,
    },
    Launching {
        executable: PathBuf,
        source: ResolutionSource,
    },
}

impl EditorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorStatus::Unconfigured => "unconfigured",
            EditorStatus::Resolving => "resolving",
            EditorStatus::Resolved { .. } => "resolved",
            EditorStatus::Unresolved { .. } => "unresolved",
            EditorStatus::Launching { .. } => "launching",
        }
    }
}

/// Outcome reported back by the host after executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Success,
    Failure { message: String },
}

/// Cancels a launch before its command is handed to the caller.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
