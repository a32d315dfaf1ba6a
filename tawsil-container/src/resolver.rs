//! Resolver registry and cache: the typed fallback behind bindings.
//!
//! Resolvers are grouped by [`Kind`] and tried in registration order; the
//! first one to return `Some` wins and its value is cached under
//! `(kind, id)` for the life of the container. The cache is consulted before
//! any resolver runs, so each pair is resolved at most once.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::container::Container;
use crate::error::{Result, TawsilError};
use crate::guard::InitGuard;
use crate::kind::{CacheKey, Kind};
use crate::value::Value;

/// A fallback producer: `(id, container) -> value or absent`.
pub type ResolverFn = Arc<dyn Fn(&str, &Container) -> Result<Option<Value>> + Send + Sync>;

/// Resolvers by kind, plus the `(kind, id)` result cache.
#[derive(Default)]
pub(crate) struct ResolverRegistry {
    resolvers: RwLock<HashMap<Kind, Vec<ResolverFn>>>,
    cache: DashMap<CacheKey, Arc<OnceCell<Value>>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `resolver` to the list for `kind`.
    pub fn add(&self, kind: Kind, resolver: ResolverFn) {
        let mut resolvers = self.resolvers.write();
        let list = resolvers.entry(kind.clone()).or_default();
        list.push(resolver);
        debug!(kind = %kind, position = list.len(), "Registered resolver");
    }

    pub fn count(&self, kind: &Kind) -> usize {
        self.resolvers.read().get(kind).map_or(0, Vec::len)
    }

    /// Peeks the cache without running resolvers.
    pub fn cached(&self, id: &str, kind: &Kind) -> Option<Value> {
        self.cache
            .get(&CacheKey::new(kind, id))
            .and_then(|cell| cell.get().cloned())
    }

    pub fn cache_len(&self) -> usize {
        self.cache.iter().filter(|entry| entry.value().get().is_some()).count()
    }

    /// Resolves `id` for `kind`, consulting the cache first.
    ///
    /// Concurrent first requests for the same pair wait on one another, so
    /// the winning resolver runs once.
    pub fn resolve(&self, id: &str, kind: &Kind, container: &Container) -> Result<Value> {
        if let Some(hit) = self.cached(id, kind) {
            trace!(id, kind = %kind, "Resolver cache hit");
            return Ok(hit);
        }

        let resolvers = self
            .resolvers
            .read()
            .get(kind)
            .cloned()
            .unwrap_or_default();

        if resolvers.is_empty() {
            trace!(id, kind = %kind, "No resolvers for kind");
            return Err(TawsilError::unresolvable(id, kind));
        }

        let key = CacheKey::new(kind, id);
        let cell = Arc::clone(&self.cache.entry(key.clone()).or_default());

        let result = match cell.get() {
            Some(value) => Ok(value.clone()),
            None => {
                let _guard = InitGuard::enter(Arc::as_ptr(&cell), || {
                    format!("resolver for \"{id}\" (kind {kind})")
                })?;
                cell.get_or_try_init(|| run_resolvers(&resolvers, id, kind, container))
                    .cloned()
            }
        };

        drop(cell);
        if result.is_err() {
            // A thread still holding the cell may yet fill it.
            self.cache
                .remove_if(&key, |_, cell| cell.get().is_none() && Arc::strong_count(cell) == 1);
        }
        result
    }
}

fn run_resolvers(
    resolvers: &[ResolverFn],
    id: &str,
    kind: &Kind,
    container: &Container,
) -> Result<Value> {
    for (position, resolver) in resolvers.iter().enumerate() {
        if let Some(value) = resolver(id, container)? {
            debug!(id, kind = %kind, position, "Resolved by resolver");
            return Ok(value);
        }
    }
    trace!(id, kind = %kind, "All resolvers returned absent");
    Err(TawsilError::unresolvable(id, kind))
}
