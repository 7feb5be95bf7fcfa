// Resource names handed to the engine, and the persisted handles behind them.
//
// With persistence on, every configured resource is loaded once at
// construction and its handle replaces the path for all later calls. Each
// handle is tracked with its kind so teardown can call the matching free
// operation exactly once.

use tracing::{info, warn};
use unitex_core::enums::{ResourceKind, Stage};
use unitex_core::{Result, UnitexError};

use crate::config::ResourcesConfig;
use crate::engine::Engine;

/// A handle loaded into engine memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedResource {
    pub kind: ResourceKind,
    pub handle: String,
}

/// Effective resource names: persisted handles, or plain paths.
#[derive(Debug, Default)]
pub struct ResourceSet {
    pub alphabet: Option<String>,
    pub alphabet_sorted: Option<String>,
    pub sentence: Option<String>,
    pub replace: Option<String>,
    pub dictionaries: Vec<String>,
    paths: ResourcesConfig,
    persisted: Vec<PersistedResource>,
}

impl ResourceSet {
    /// Plain paths, nothing loaded.
    pub fn from_paths(config: &ResourcesConfig) -> Self {
        Self {
            alphabet: config.alphabet.clone(),
            alphabet_sorted: config.alphabet_sorted.clone(),
            sentence: config.sentence.clone(),
            replace: config.replace.clone(),
            dictionaries: config.dictionaries.clone(),
            paths: config.clone(),
            persisted: Vec::new(),
        }
    }

    /// Load every configured resource into `engine`.
    ///
    /// If one load fails, the handles loaded so far are freed before the
    /// error is returned.
    pub fn load<E: Engine + ?Sized>(config: &ResourcesConfig, engine: &E) -> Result<Self> {
        let mut set = Self::from_paths(config);
        if let Err(e) = set.persist_all(engine) {
            set.release(engine);
            return Err(e);
        }
        Ok(set)
    }

    fn persist_all<E: Engine + ?Sized>(&mut self, engine: &E) -> Result<()> {
        if let Some(path) = self.alphabet.take() {
            self.alphabet = Some(self.persist(engine, ResourceKind::Alphabet, &path)?);
        }
        if let Some(path) = self.alphabet_sorted.take() {
            self.alphabet_sorted = Some(self.persist(engine, ResourceKind::Alphabet, &path)?);
        }
        if let Some(path) = self.sentence.take() {
            self.sentence = Some(self.persist(engine, ResourceKind::Grammar, &path)?);
        }
        if let Some(path) = self.replace.take() {
            self.replace = Some(self.persist(engine, ResourceKind::Grammar, &path)?);
        }
        let paths = std::mem::take(&mut self.dictionaries);
        for path in &paths {
            let handle = self.persist(engine, ResourceKind::Dictionary, path)?;
            self.dictionaries.push(handle);
        }
        Ok(())
    }

    fn persist<E: Engine + ?Sized>(
        &mut self,
        engine: &E,
        kind: ResourceKind,
        path: &str,
    ) -> Result<String> {
        info!("Persisting {kind} '{path}'...");
        let handle = engine.load_persistent(kind, path).ok_or_else(|| {
            UnitexError::stage(Stage::Persistence, format!("could not load {kind} '{path}'"))
        })?;
        self.persisted.push(PersistedResource {
            kind,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    /// Free every persisted handle and fall back to plain paths.
    ///
    /// Returns the number of handles freed; a second call frees nothing.
    pub fn release<E: Engine + ?Sized>(&mut self, engine: &E) -> usize {
        let released = self.persisted.len();
        for resource in self.persisted.drain(..) {
            info!("Freeing {} '{}'...", resource.kind, resource.handle);
            engine.free_persistent(resource.kind, &resource.handle);
        }
        if released > 0 {
            let paths = std::mem::take(&mut self.paths);
            *self = Self::from_paths(&paths);
        }
        released
    }

    /// Handles still waiting to be freed.
    pub fn outstanding(&self) -> &[PersistedResource] {
        &self.persisted
    }

    /// The alphabet, or a configuration error naming what needed it.
    pub fn require_alphabet(&self, purpose: &str) -> Result<&str> {
        self.alphabet.as_deref().ok_or_else(|| {
            UnitexError::config(format!("unable to {purpose}: no alphabet file provided"))
        })
    }
}

impl Drop for ResourceSet {
    fn drop(&mut self) {
        if !self.persisted.is_empty() {
            warn!(
                count = self.persisted.len(),
                "persisted resources dropped without being freed"
            );
        }
    }
}
