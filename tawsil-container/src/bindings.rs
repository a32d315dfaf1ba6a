//! Binding store: maps service ids to the factories that produce them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::container::Container;
use crate::error::Result;
use crate::lifecycle::Lifecycle;
use crate::value::Value;

/// Type alias for binding factories.
///
/// A factory receives the container (so providers can resolve their own
/// dependencies) and returns the bound value. Factories are cloned out of
/// the store before they run, so no lock is held while caller code executes.
pub type FactoryFn = Arc<dyn Fn(&Container) -> Result<Value> + Send + Sync>;

/// Registration entry for a single binding.
#[derive(Clone)]
pub(crate) struct Binding {
    pub id: String,
    pub lifecycle: Lifecycle,
    pub factory: FactoryFn,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

/// Stores all bindings, keyed by exact id.
///
/// Each id normally holds one binding; in multi-binding mode later
/// registrations append instead of replacing.
#[derive(Debug, Default)]
pub(crate) struct BindingStore {
    bindings: RwLock<HashMap<String, Vec<Binding>>>,
}

impl BindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a binding, replacing or appending per `append`.
    pub fn register(&self, binding: Binding, append: bool) {
        debug!(id = %binding.id, lifecycle = %binding.lifecycle, append, "Registered binding");
        let mut bindings = self.bindings.write();
        let slot = bindings.entry(binding.id.clone()).or_default();
        if !append {
            slot.clear();
        }
        slot.push(binding);
    }

    /// Removes every binding under `id`. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.bindings.write().remove(id).is_some();
        if removed {
            debug!(id, "Removed binding");
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bindings.read().contains_key(id)
    }

    pub fn count(&self, id: &str) -> usize {
        self.bindings.read().get(id).map_or(0, Vec::len)
    }

    /// Clones the bindings under `id`, in registration order.
    pub fn get(&self, id: &str) -> Option<Vec<Binding>> {
        self.bindings.read().get(id).cloned()
    }

    /// Lifecycle of the most recent binding under `id`.
    pub fn lifecycle(&self, id: &str) -> Option<Lifecycle> {
        self.bindings
            .read()
            .get(id)
            .and_then(|slot| slot.last())
            .map(|binding| binding.lifecycle)
    }

    /// Returns all bound ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.bindings.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }
}
