//! In-memory snippet registry.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use splice_core::{
    application::{ApplicationError, ports::SnippetRegistry},
    domain::{DomainValidator, DynSnippet},
    error::SpliceResult,
};

/// Thread-safe in-memory snippet registry, keyed by snippet name.
#[derive(Clone)]
pub struct InMemoryRegistry {
    inner: Arc<RwLock<BTreeMap<String, Arc<dyn DynSnippet>>>>,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a registry holding `snippets`, each checked as on registration.
    ///
    /// # Errors
    ///
    /// - the snippet's own declaration error (unnamed, repeated parameter,
    ///   default breaking its rule)
    /// - `DuplicateSnippet` if two snippets share a name
    pub fn with_snippets<I>(snippets: I) -> SpliceResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn DynSnippet>>,
    {
        let registry = Self::new();
        for snippet in snippets {
            DomainValidator::validate_snippet(snippet.as_ref())?;
            registry.insert(snippet)?;
        }
        Ok(registry)
    }

    /// Number of registered snippets. A poisoned lock counts as empty.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every snippet.
    pub fn clear(&self) -> SpliceResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::RegistryLockError)?;
        inner.clear();
        Ok(())
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SnippetRegistry for InMemoryRegistry {
    fn get(&self, name: &str) -> SpliceResult<Arc<dyn DynSnippet>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::RegistryLockError)?;

        inner.get(name).cloned().ok_or_else(|| {
            ApplicationError::SnippetNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> SpliceResult<Vec<Arc<dyn DynSnippet>>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::RegistryLockError)?;

        Ok(inner.values().cloned().collect())
    }

    fn insert(&self, snippet: Arc<dyn DynSnippet>) -> SpliceResult<()> {
        let name = snippet.key();
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::RegistryLockError)?;

        if inner.contains_key(&name) {
            return Err(ApplicationError::DuplicateSnippet { name }.into());
        }
        inner.insert(name, snippet);
        Ok(())
    }

    fn remove(&self, name: &str) -> SpliceResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::RegistryLockError)?;

        inner.remove(name).map(|_| ()).ok_or_else(|| {
            ApplicationError::SnippetNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }
}
