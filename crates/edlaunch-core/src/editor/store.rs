//! Persisted set of editor descriptors.
//!
//! Readers work on an immutable snapshot; writers serialize on a mutex, write
//! the next document to a temp file beside the target, fsync it, and rename it
//! into place. The in-memory snapshot only advances after the rename.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::errors::EditorError;
use super::types::{EditorDescriptor, EditorKind, EditorPatch};

pub const DOCUMENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// On-disk layout of the editors file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorsDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub editors: Vec<EditorDescriptor>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for EditorsDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            editors: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl EditorsDocument {
    fn position(&self, id: &str) -> Option<usize> {
        self.editors.iter().position(|d| d.id == id)
    }
}

/// Point-in-time view of the store, iterable as many times as needed.
#[derive(Debug, Clone)]
pub struct EditorList {
    document: Arc<EditorsDocument>,
}

impl EditorList {
    pub fn iter(&self) -> std::slice::Iter<'_, EditorDescriptor> {
        self.document.editors.iter()
    }

    pub fn enabled(&self) -> impl Iterator<Item = &EditorDescriptor> {
        self.iter().filter(|d| d.enabled)
    }

    pub fn get(&self, id: &str) -> Option<&EditorDescriptor> {
        self.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.document.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.editors.is_empty()
    }
}

impl<'a> IntoIterator for &'a EditorList {
    type Item = &'a EditorDescriptor;
    type IntoIter = std::slice::Iter<'a, EditorDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct EditorStore {
    path: PathBuf,
    snapshot: RwLock<Arc<EditorsDocument>>,
    writer: Mutex<()>,
}

impl EditorStore {
    /// Open the store at `path`, seeding any missing built-ins.
    ///
    /// A missing file is not an error; it is created on the first mutation.
    /// A file that fails to parse is reported and left untouched.
    pub fn open(path: impl Into<PathBuf>, builtins: &[EditorDescriptor]) -> Result<Self, EditorError> {
        let path = path.into();
        let mut document = load_document(&path)?;
        merge_builtins(&mut document, builtins);

        info!(
            event = "core.editor.store_opened",
            path = %path.display(),
            count = document.editors.len()
        );

        Ok(Self {
            path,
            snapshot: RwLock::new(Arc::new(document)),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Descriptors in insertion order.
    pub fn list(&self) -> EditorList {
        EditorList {
            document: self.snapshot(),
        }
    }

    pub fn get(&self, id: &str) -> Option<EditorDescriptor> {
        self.snapshot().editors.iter().find(|d| d.id == id).cloned()
    }

    pub fn add(&self, descriptor: EditorDescriptor) -> Result<(), EditorError> {
        validate_descriptor(&descriptor)?;
        if descriptor.kind == EditorKind::Builtin {
            return Err(EditorError::InvalidDescriptor {
                message: format!(
                    "'{}' is marked built-in; only custom editors can be added",
                    descriptor.id
                ),
            });
        }

        let id = descriptor.id.clone();
        self.mutate(|document| {
            if document.position(&descriptor.id).is_some() {
                return Err(EditorError::DuplicateId {
                    id: descriptor.id.clone(),
                });
            }
            document.editors.push(descriptor);
            Ok(())
        })?;

        info!(event = "core.editor.store_added", id = %id);
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<EditorDescriptor, EditorError> {
        let removed = self.mutate(|document| {
            let index = document.position(id).ok_or_else(|| EditorError::NotFound {
                id: id.to_string(),
            })?;
            if document.editors[index].is_builtin() {
                return Err(EditorError::NotRemovable { id: id.to_string() });
            }
            Ok(document.editors.remove(index))
        })?;

        info!(event = "core.editor.store_removed", id = id);
        Ok(removed)
    }

    pub fn update(&self, id: &str, patch: EditorPatch) -> Result<EditorDescriptor, EditorError> {
        if let Some(name) = &patch.name
            && name.trim().is_empty()
        {
            return Err(EditorError::InvalidDescriptor {
                message: "editor name cannot be empty".to_string(),
            });
        }

        let updated = self.mutate(|document| {
            let index = document.position(id).ok_or_else(|| EditorError::NotFound {
                id: id.to_string(),
            })?;
            let descriptor = &mut document.editors[index];
            if descriptor.is_builtin() && patch.touches_definition() {
                return Err(EditorError::BuiltinImmutable { id: id.to_string() });
            }
            patch.apply_to(descriptor);
            Ok(descriptor.clone())
        })?;

        info!(
            event = "core.editor.store_updated",
            id = id,
            enabled = updated.enabled,
            override_path = ?updated.override_path
        );
        Ok(updated)
    }

    fn snapshot(&self) -> Arc<EditorsDocument> {
        let guard = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Apply `change` to a copy of the current document and persist it.
    ///
    /// Nothing is published if `change` fails or the write fails.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut EditorsDocument) -> Result<T, EditorError>,
    ) -> Result<T, EditorError> {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        let mut next = (*self.snapshot()).clone();
        let output = change(&mut next)?;
        write_document(&self.path, &next)?;

        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(next);
        Ok(output)
    }
}

fn load_document(path: &Path) -> Result<EditorsDocument, EditorError> {
    if !path.exists() {
        debug!(
            event = "core.editor.store_missing",
            path = %path.display(),
            "Editors file not found - starting from built-ins"
        );
        return Ok(EditorsDocument::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| EditorError::PersistenceFailure {
        path: path.display().to_string(),
        message: format!("read failed: {}", e),
    })?;

    let mut document: EditorsDocument =
        serde_json::from_str(&content).map_err(|e| {
            tracing::error!(
                event = "core.editor.store_parse_failed",
                path = %path.display(),
                error = %e
            );
            EditorError::StoreCorrupted {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

    if document.version > DOCUMENT_VERSION {
        warn!(
            event = "core.editor.store_newer_version",
            path = %path.display(),
            version = document.version,
            supported = DOCUMENT_VERSION,
            "Editors file was written by a newer version; unknown fields are preserved"
        );
    }

    dedupe_ids(&mut document, path);
    Ok(document)
}

/// Keep the first descriptor for each id.
fn dedupe_ids(document: &mut EditorsDocument, path: &Path) {
    let mut seen = std::collections::HashSet::new();
    document.editors.retain(|descriptor| {
        let first = seen.insert(descriptor.id.clone());
        if !first {
            warn!(
                event = "core.editor.store_duplicate_dropped",
                path = %path.display(),
                id = %descriptor.id
            );
        }
        first
    });
}

/// Append missing built-ins and refresh the shipped definition of existing ones.
///
/// User choices (`enabled`, `override_path`, unknown fields) are kept. A custom
/// editor that shares a shipped id wins; a stored built-in that is no longer
/// shipped becomes custom so it can be edited or removed.
fn merge_builtins(document: &mut EditorsDocument, builtins: &[EditorDescriptor]) {
    for existing in document.editors.iter_mut().filter(|d| d.is_builtin()) {
        if !builtins.iter().any(|b| b.id == existing.id) {
            warn!(
                event = "core.editor.builtin_retired",
                id = %existing.id,
                "Stored built-in is no longer shipped - keeping it as a custom editor"
            );
            existing.kind = EditorKind::Custom;
        }
    }

    for builtin in builtins {
        match document.position(&builtin.id) {
            Some(index) if !document.editors[index].is_builtin() => {
                warn!(
                    event = "core.editor.builtin_shadowed",
                    id = %builtin.id,
                    "Custom editor uses a built-in id - the custom definition is kept"
                );
            }
            Some(index) => {
                let existing = &mut document.editors[index];
                existing.name = builtin.name.clone();
                existing.candidates = builtin.candidates.clone();
                existing.args = builtin.args.clone();
            }
            None => {
                debug!(event = "core.editor.builtin_seeded", id = %builtin.id);
                document.editors.push(builtin.clone());
            }
        }
    }
}

fn validate_descriptor(descriptor: &EditorDescriptor) -> Result<(), EditorError> {
    let id = &descriptor.id;
    if id.is_empty() {
        return Err(EditorError::InvalidDescriptor {
            message: "editor id cannot be empty".to_string(),
        });
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(EditorError::InvalidDescriptor {
            message: format!(
                "editor id '{}' may only contain letters, digits, '-', '_' and '.'",
                id
            ),
        });
    }
    if descriptor.name.trim().is_empty() {
        return Err(EditorError::InvalidDescriptor {
            message: format!("editor '{}' needs a display name", id),
        });
    }
    Ok(())
}

/// Write `document` to `path` via temp file + rename.
///
/// The temp file is deleted on every failure path, leaving the previous file intact.
fn write_document(path: &Path, document: &EditorsDocument) -> Result<(), EditorError> {
    let failure = |message: String| EditorError::PersistenceFailure {
        path: path.display().to_string(),
        message,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .map_err(|e| failure(format!("failed to create {}: {}", parent.display(), e)))?;

    let mut json = serde_json::to_string_pretty(document)
        .map_err(|e| failure(format!("failed to serialize editors: {}", e)))?;
    json.push('\n');

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| failure(format!("failed to create temp file: {}", e)))?;
    write_synced(&mut temp, json.as_bytes())
        .map_err(|e| failure(format!("failed to write temp file: {}", e)))?;

    temp.persist(path)
        .map_err(|e| failure(format!("failed to replace editors file: {}", e.error)))?;

    debug!(
        event = "core.editor.store_saved",
        path = %path.display(),
        count = document.editors.len()
    );
    Ok(())
}

fn write_synced(temp: &mut tempfile::NamedTempFile, bytes: &[u8]) -> std::io::Result<()> {
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()
}
