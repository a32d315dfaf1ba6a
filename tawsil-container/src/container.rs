//! # The Container, heart of Tawsil
//!
//! A runtime registry mapping string ids to values, singletons and
//! factories, able to build types and call functions by supplying their
//! declared dependencies.
//!
//! # Architecture
//! ```text
//! ContainerBuilder  ──build()──>  Container
//!                                    │
//!          ┌─────────────┬───────────┼─────────────┐
//!          ▼             ▼           ▼             ▼
//!     BindingStore   aliases   ResolverRegistry  TypeCatalogue
//!          │                         │
//!          └──────── invoke() ───────┘
//! ```
//!
//! # Examples
//! ```rust
//! use tawsil_container::prelude::*;
//!
//! let container = Container::new();
//! container.bind("foo", Value::new(String::from("bar"))).unwrap();
//! container.bind("hello", Value::new(String::from("world"))).unwrap();
//!
//! let greet = Invocable::new("greet", |args| {
//!     let foo: String = args.cloned(0)?;
//!     let hello: String = args.cloned(1)?;
//!     let temp: String = args.cloned(2)?;
//!     Ok(Value::new(format!("{foo}-{hello}-{temp}")))
//! })
//! .param(Parameter::new("foo"))
//! .param(Parameter::new("hello"))
//! .param(Parameter::new("temp"));
//!
//! let args = Args::new().with("temp", Value::new(String::from("baz")));
//! let out = container.invoke(greet, args).unwrap();
//! assert_eq!(out.cloned::<String>().unwrap(), "bar-world-baz");
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, info, trace};

use tawsil_support::rendering::suggest_similar;

use crate::bindings::{Binding, BindingStore, FactoryFn};
use crate::error::{ContainerError, Result, TawsilError};
use crate::guard::InitGuard;
use crate::kind::Kind;
use crate::lifecycle::Lifecycle;
use crate::provider::Provider;
use crate::resolver::{ResolverFn, ResolverRegistry};
use crate::settings::ContainerSettings;
use crate::types::{Injectable, TypeCatalogue, TypeSpec};
use crate::value::Value;

const MAX_SUGGESTIONS: usize = 3;

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`] with non-default settings or extra types.
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .strict_service_ids(true)
///     .with_type(TypeSpec::interface("Logger"))
///     .build();
/// ```
pub struct ContainerBuilder {
    settings: ContainerSettings,
    types: Vec<TypeSpec>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            settings: ContainerSettings::default(),
            types: Vec::new(),
        }
    }

    /// Reject service ids that name a catalogued type.
    pub fn strict_service_ids(mut self, strict: bool) -> Self {
        self.settings.strict_service_ids = strict;
        self
    }

    /// Keep every registration of an id instead of replacing it.
    pub fn multi_binding(mut self, multi: bool) -> Self {
        self.settings.multi_binding = multi;
        self
    }

    /// Load the specs `#[injectable]` registered at link time (on by default).
    pub fn register_linked_types(mut self, load: bool) -> Self {
        self.settings.register_linked_types = load;
        self
    }

    /// Replace all settings at once, e.g. with ones read from a config file.
    pub fn settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add a type spec to the catalogue.
    pub fn with_type(mut self, spec: TypeSpec) -> Self {
        self.types.push(spec);
        self
    }

    pub fn build(self) -> Container {
        let types = TypeCatalogue::new();
        if self.settings.register_linked_types {
            types.load_linked();
        }
        for spec in self.types {
            types.insert(spec);
        }

        info!(
            types = types.len(),
            strict = self.settings.strict_service_ids,
            multi = self.settings.multi_binding,
            "Container built"
        );

        Container {
            settings: self.settings,
            bindings: BindingStore::new(),
            aliases: RwLock::new(HashMap::new()),
            resolvers: ResolverRegistry::new(),
            types,
        }
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Thread-safe dependency injection container.
///
/// Every operation takes `&self`; share it with `Arc<Container>`.
pub struct Container {
    settings: ContainerSettings,
    bindings: BindingStore,
    aliases: RwLock<HashMap<String, String>>,
    resolvers: ResolverRegistry,
    types: TypeCatalogue,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// A container with default settings.
    pub fn new() -> Self {
        ContainerBuilder::new().build()
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    // ── Binding store ──

    /// Returns `true` if anything is bound under `id`.
    pub fn has(&self, id: &str) -> bool {
        self.bindings.contains(id)
    }

    /// Produces the value bound under `id`.
    ///
    /// ```rust,ignore
    /// let logger = container.get("logger")?;
    /// ```
    pub fn get(&self, id: &str) -> Result<Value> {
        trace!(id, "Getting service");
        let slot = self.bindings.get(id).unwrap_or_default();

        match slot.as_slice() {
            [] => Err(TawsilError::service_not_found(id, self.suggestions(id))),
            [binding] => (binding.factory)(self),
            many => Err(ContainerError::AmbiguousService {
                id: id.to_string(),
                count: many.len(),
            }
            .into()),
        }
    }

    /// Produces every value bound under `id`, in registration order.
    pub fn get_all(&self, id: &str) -> Result<Vec<Value>> {
        let slot = self.bindings.get(id).unwrap_or_default();
        if slot.is_empty() {
            return Err(TawsilError::service_not_found(id, self.suggestions(id)));
        }
        slot.iter().map(|binding| (binding.factory)(self)).collect()
    }

    /// `get` followed by a downcast to `Arc<T>`.
    pub fn get_shared<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
        self.get(id)?.try_shared::<T>(id)
    }

    /// `get` followed by a clone of the `T` inside.
    pub fn get_cloned<T: Any + Clone>(&self, id: &str) -> Result<T> {
        self.get(id)?.try_cloned::<T>(id)
    }

    /// Number of bindings under `id` (more than one only in multi-binding mode).
    pub fn count(&self, id: &str) -> usize {
        self.bindings.count(id)
    }

    pub fn lifecycle(&self, id: &str) -> Option<Lifecycle> {
        self.bindings.lifecycle(id)
    }

    /// All bound ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.bindings.ids()
    }

    /// Binds a ready value, returned as-is by every `get`.
    pub fn bind(&self, id: &str, value: Value) -> Result<&Self> {
        self.check_service_id(id)?;
        let factory: FactoryFn = Arc::new(move |_: &Container| -> Result<Value> { Ok(value.clone()) });
        self.register_binding(id, Lifecycle::Value, factory);
        Ok(self)
    }

    /// Binds the id string itself as the value.
    pub fn bind_self(&self, id: &str) -> Result<&Self> {
        self.bind(id, Value::new(id.to_string()))
    }

    /// Binds a provider that runs once, on the first `get`.
    ///
    /// Concurrent first calls wait for the one running the provider.
    pub fn singleton(&self, id: &str, provider: impl Into<Provider>) -> Result<&Self> {
        self.check_service_id(id)?;
        let provider = provider.into();
        let cell: Arc<OnceCell<Value>> = Arc::new(OnceCell::new());
        let owner = id.to_string();

        let factory: FactoryFn = Arc::new(move |container: &Container| -> Result<Value> {
            if let Some(value) = cell.get() {
                trace!(id = %owner, "Singleton cache hit");
                return Ok(value.clone());
            }
            let _guard = InitGuard::enter(Arc::as_ptr(&cell), || format!("singleton \"{owner}\""))?;
            cell.get_or_try_init(|| container.provide(&provider)).cloned()
        });

        self.register_binding(id, Lifecycle::Singleton, factory);
        Ok(self)
    }

    /// Singleton whose provider constructs the type named `id`.
    pub fn singleton_self(&self, id: &str) -> Result<&Self> {
        self.singleton(id, Provider::of_type(id))
    }

    /// Binds a provider that runs on every `get`.
    pub fn factory(&self, id: &str, provider: impl Into<Provider>) -> Result<&Self> {
        self.check_service_id(id)?;
        let provider = provider.into();
        let factory: FactoryFn =
            Arc::new(move |container: &Container| -> Result<Value> { container.provide(&provider) });
        self.register_binding(id, Lifecycle::Factory, factory);
        Ok(self)
    }

    /// Factory whose provider constructs the type named `id`.
    pub fn factory_self(&self, id: &str) -> Result<&Self> {
        self.factory(id, Provider::of_type(id))
    }

    /// Removes every binding under `id`; a missing id is a no-op.
    ///
    /// A singleton's memoized instance goes with its binding.
    pub fn unbind(&self, id: &str) -> &Self {
        self.bindings.remove(id);
        self
    }

    // ── Class aliases ──

    /// Points the type name `type_alias` at the service bound under `service_id`.
    ///
    /// Parameters declared with that type then receive the service.
    pub fn alias(&self, service_id: &str, type_alias: &str) -> Result<&Self> {
        if !self.types.contains(type_alias) {
            return Err(ContainerError::UnknownType(type_alias.to_string()).into());
        }
        if !self.has(service_id) {
            return Err(TawsilError::service_not_found(
                service_id,
                self.suggestions(service_id),
            ));
        }

        self.aliases
            .write()
            .insert(type_alias.to_string(), service_id.to_string());
        debug!(service = service_id, alias = type_alias, "Registered class alias");
        Ok(self)
    }

    pub fn has_alias(&self, type_name: &str) -> bool {
        self.aliases.read().contains_key(type_name)
    }

    /// Produces the service aliased to `type_name`.
    pub fn get_alias(&self, type_name: &str) -> Result<Value> {
        let service_id = self.aliases.read().get(type_name).cloned();
        match service_id {
            Some(service_id) => self.get(&service_id),
            None => Err(TawsilError::alias_not_found(type_name)),
        }
    }

    // ── Resolvers ──

    /// Adds a resolver for parameters without a declared type.
    pub fn add_resolver<F>(&self, resolver: F) -> &Self
    where
        F: Fn(&str, &Container) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.add_typed_resolver(Kind::Untyped, resolver)
    }

    /// Adds a resolver for parameters declared with `kind`.
    ///
    /// Resolvers of one kind are tried in the order they were added.
    pub fn add_typed_resolver<F>(&self, kind: impl Into<Kind>, resolver: F) -> &Self
    where
        F: Fn(&str, &Container) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        let resolver: ResolverFn = Arc::new(resolver);
        self.resolvers.add(kind.into(), resolver);
        self
    }

    /// Produces `id` through the resolvers of `kind`, caching the result.
    pub fn resolve(&self, id: &str, kind: impl Into<Kind>) -> Result<Value> {
        self.resolvers.resolve(id, &kind.into(), self)
    }

    /// Returns whether `resolve(id, kind)` succeeds.
    ///
    /// Only `NotFound` means "no"; any other failure is returned.
    pub fn is_resolvable(&self, id: &str, kind: impl Into<Kind>) -> Result<bool> {
        match self.resolve(id, kind) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// The cached resolver result for `(id, kind)`, without running resolvers.
    pub fn cached(&self, id: &str, kind: impl Into<Kind>) -> Option<Value> {
        self.resolvers.cached(id, &kind.into())
    }

    pub fn resolver_count(&self, kind: impl Into<Kind>) -> usize {
        self.resolvers.count(&kind.into())
    }

    // ── Type catalogue ──

    /// Adds or replaces a type spec.
    pub fn register_type(&self, spec: TypeSpec) -> &Self {
        self.types.insert(spec);
        self
    }

    /// Adds the spec of an [`Injectable`] type.
    pub fn register<T: Injectable>(&self) -> &Self {
        self.register_type(T::type_spec())
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    pub fn type_spec(&self, name: &str) -> Option<Arc<TypeSpec>> {
        self.types.get(name)
    }

    pub(crate) fn type_spec_of(&self, type_id: TypeId) -> Option<Arc<TypeSpec>> {
        self.types.get_by_type(type_id)
    }

    // ── Internal ──

    fn register_binding(&self, id: &str, lifecycle: Lifecycle, factory: FactoryFn) {
        let binding = Binding {
            id: id.to_string(),
            lifecycle,
            factory,
        };
        self.bindings.register(binding, self.settings.multi_binding);
    }

    fn check_service_id(&self, id: &str) -> Result<()> {
        if self.settings.strict_service_ids && self.types.contains(id) {
            return Err(ContainerError::ReservedServiceId(id.to_string()).into());
        }
        Ok(())
    }

    fn suggestions(&self, id: &str) -> Vec<String> {
        let ids = self.bindings.ids();
        let available: Vec<&str> = ids.iter().map(String::as_str).collect();
        suggest_similar(id, &available, MAX_SUGGESTIONS)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.bindings.len())
            .field("aliases", &self.aliases.read().len())
            .field("cached", &self.resolvers.cache_len())
            .field("types", &self.types.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::error::{ContainerError, Result, TawsilError};
    pub use crate::global::{app, global, reset_global, set_global};
    pub use crate::kind::Kind;
    pub use crate::lifecycle::Lifecycle;
    pub use crate::provider::{Owner, Provider, Target};
    pub use crate::settings::ContainerSettings;
    pub use crate::signature::{Args, Arguments, InstanceMethod, Invocable, Parameter};
    pub use crate::types::{Injectable, TypeSpec};
    pub use crate::value::Value;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
