use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, info, warn};

use edlaunch_config::ResolverConfig;

use crate::platform::{Platform, SystemProbe};

use super::errors::EditorError;
use super::types::{CandidatePath, EditorDescriptor, ResolutionSource, ResolvedEditor};

/// Cached resolution plus the inputs it was computed from.
///
/// A hit requires the descriptor's override and candidates to be unchanged.
#[derive(Debug, Clone)]
struct CacheEntry {
    resolved: ResolvedEditor,
    override_path: Option<PathBuf>,
    candidates: Vec<CandidatePath>,
}

/// Turns descriptors into verified executable paths.
pub struct PathResolver {
    probe: Arc<dyn SystemProbe>,
    platform: Platform,
    cache_ttl: chrono::Duration,
    parallel_probes: bool,
    cache: RwLock<HashMap<String, CacheEntry>>,
}

impl PathResolver {
    pub fn new(probe: Arc<dyn SystemProbe>, platform: Platform) -> Self {
        Self::from_config(probe, platform, &ResolverConfig::default())
    }

    pub fn from_config(
        probe: Arc<dyn SystemProbe>,
        platform: Platform,
        config: &ResolverConfig,
    ) -> Self {
        let cache_ttl = chrono::Duration::from_std(config.cache_ttl())
            .unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            probe,
            platform,
            cache_ttl,
            parallel_probes: config.parallel_probes,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn probe(&self) -> &dyn SystemProbe {
        self.probe.as_ref()
    }

    /// Resolve a descriptor to an executable.
    ///
    /// Order: explicit override > candidates in declared order. A cached
    /// result is returned while it is fresh and its inputs are unchanged.
    pub fn resolve(&self, descriptor: &EditorDescriptor) -> Result<ResolvedEditor, EditorError> {
        if let Some(hit) = self.cached_for(descriptor) {
            debug!(
                event = "core.editor.resolve_cache_hit",
                id = %descriptor.id,
                executable = %hit.executable.display()
            );
            return Ok(hit);
        }

        debug!(
            event = "core.editor.resolve_started",
            id = %descriptor.id,
            platform = %self.platform,
            candidates = descriptor.candidates.len()
        );

        if let Some(path) = &descriptor.override_path {
            match self.check_override(path) {
                Some(executable) => {
                    return Ok(self.remember(descriptor, executable, ResolutionSource::ExplicitOverride));
                }
                None => {
                    warn!(
                        event = "core.editor.override_unusable",
                        id = %descriptor.id,
                        path = %path.display(),
                        "Explicit path is missing or not executable - searching candidates"
                    );
                }
            }
        }

        let candidates: Vec<&CandidatePath> = descriptor
            .candidates
            .iter()
            .filter(|candidate| candidate.applies_to(self.platform))
            .collect();

        match self.first_match(&candidates) {
            Some(executable) => Ok(self.remember(descriptor, executable, ResolutionSource::Discovered)),
            None => {
                info!(
                    event = "core.editor.resolve_failed",
                    id = %descriptor.id,
                    tried = candidates.len()
                );
                Err(EditorError::ExecutableNotFound {
                    id: descriptor.id.clone(),
                    tried: candidates.len(),
                })
            }
        }
    }

    /// Drop the cached resolution for `id`. Calling it again is a no-op.
    pub fn invalidate(&self, id: &str) {
        let removed = self
            .cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .is_some();
        debug!(event = "core.editor.cache_invalidated", id = id, removed = removed);
    }

    pub fn invalidate_all(&self) {
        self.cache.write().unwrap_or_else(|e| e.into_inner()).clear();
        debug!(event = "core.editor.cache_cleared");
    }

    /// The cached resolution for `id`, if any, regardless of freshness.
    pub fn cached(&self, id: &str) -> Option<ResolvedEditor> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .map(|entry| entry.resolved.clone())
    }

    fn cached_for(&self, descriptor: &EditorDescriptor) -> Option<ResolvedEditor> {
        if self.cache_ttl <= chrono::Duration::zero() {
            return None;
        }

        let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
        let entry = cache.get(&descriptor.id)?;

        let fresh = Utc::now() - entry.resolved.resolved_at < self.cache_ttl;
        let same_inputs = entry.override_path == descriptor.override_path
            && entry.candidates == descriptor.candidates;
        if !fresh || !same_inputs {
            return None;
        }

        Some(ResolvedEditor {
            source: ResolutionSource::Cached,
            ..entry.resolved.clone()
        })
    }

    fn remember(
        &self,
        descriptor: &EditorDescriptor,
        executable: PathBuf,
        source: ResolutionSource,
    ) -> ResolvedEditor {
        let resolved = ResolvedEditor {
            id: descriptor.id.clone(),
            executable,
            resolved_at: Utc::now(),
            source,
        };

        info!(
            event = "core.editor.resolve_completed",
            id = %resolved.id,
            executable = %resolved.executable.display(),
            source = %resolved.source
        );

        if self.cache_ttl > chrono::Duration::zero() {
            self.cache.write().unwrap_or_else(|e| e.into_inner()).insert(
                descriptor.id.clone(),
                CacheEntry {
                    resolved: resolved.clone(),
                    override_path: descriptor.override_path.clone(),
                    candidates: descriptor.candidates.clone(),
                },
            );
        }

        resolved
    }

    fn check_override(&self, path: &Path) -> Option<PathBuf> {
        let expanded = match path.to_str() {
            Some(pattern) => PathBuf::from(self.probe.expand_env_vars(pattern, self.platform)?),
            None => path.to_path_buf(),
        };
        self.is_usable(&expanded).then_some(expanded)
    }

    /// First candidate that resolves, in declared order.
    ///
    /// With parallel probes every candidate is checked on its own thread, but
    /// the winner is still picked by position, not by completion order.
    fn first_match(&self, candidates: &[&CandidatePath]) -> Option<PathBuf> {
        if !self.parallel_probes || candidates.len() < 2 {
            return candidates
                .iter()
                .find_map(|candidate| self.probe_candidate(candidate));
        }

        let results: Vec<Option<PathBuf>> = std::thread::scope(|scope| {
            let handles: Vec<_> = candidates
                .iter()
                .map(|candidate| scope.spawn(move || self.probe_candidate(candidate)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or(None))
                .collect()
        });

        results.into_iter().flatten().next()
    }

    fn probe_candidate(&self, candidate: &CandidatePath) -> Option<PathBuf> {
        if candidate.is_bare_command() {
            let found = self.probe.find_on_path(&candidate.pattern);
            debug!(
                event = "core.editor.candidate_checked",
                pattern = %candidate.pattern,
                kind = "path_lookup",
                found = found.is_some()
            );
            return found;
        }

        let Some(expanded) = self.probe.expand_env_vars(&candidate.pattern, self.platform) else {
            debug!(
                event = "core.editor.candidate_unexpandable",
                pattern = %candidate.pattern,
                platform = %self.platform
            );
            return None;
        };

        let path = PathBuf::from(expanded);
        let usable = self.is_usable(&path);
        debug!(
            event = "core.editor.candidate_checked",
            pattern = %candidate.pattern,
            path = %path.display(),
            found = usable
        );
        usable.then_some(path)
    }

    /// Exists and is executable. Probe errors count as "not usable".
    fn is_usable(&self, path: &Path) -> bool {
        if !self.probe.file_exists(path) {
            return false;
        }

        match self.probe.is_executable(path) {
            Ok(executable) => executable,
            Err(e) => {
                warn!(
                    event = "core.editor.probe_failed",
                    path = %path.display(),
                    error = %e
                );
                false
            }
        }
    }
}
