//! Binding lifecycles.
//!
//! A lifecycle determines how often a binding's provider runs:
//! - [`Lifecycle::Value`]: never, the value was supplied up front
//! - [`Lifecycle::Singleton`]: once, on first `get`
//! - [`Lifecycle::Factory`]: on every `get`
use std::fmt;

/// Defines how a binding produces its value.
///
/// # Examples
/// ```
/// use tawsil_container::lifecycle::Lifecycle;
///
/// assert!(Lifecycle::Singleton.is_cached());
/// assert!(!Lifecycle::Factory.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// A pre-supplied value, returned as-is on every `get`.
    ///
    /// Registered with `bind()`.
    Value,

    /// Provider invoked exactly once; the result is memoized.
    ///
    /// Created on first `get`, lives until the binding is removed.
    ///
    /// # When to use
    /// - Connection pools
    /// - Configuration objects
    /// - Shared caches
    Singleton,

    /// Provider invoked on every `get`.
    ///
    /// Never cached. Each `get()` returns a fresh instance.
    ///
    /// # When to use
    /// - Lightweight stateless services
    /// - Objects with mutable state that shouldn't be shared
    Factory,
}

impl Lifecycle {
    /// Returns `true` if repeated `get` calls yield the same instance.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifecycle::Value | Lifecycle::Singleton)
    }

    /// Returns `true` if the binding runs a provider through the invocation engine.
    #[inline]
    pub fn invokes_provider(&self) -> bool {
        matches!(self, Lifecycle::Singleton | Lifecycle::Factory)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Value => write!(f, "Value"),
            Lifecycle::Singleton => write!(f, "Singleton"),
            Lifecycle::Factory => write!(f, "Factory"),
        }
    }
}
