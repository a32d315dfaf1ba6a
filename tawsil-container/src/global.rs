//! The process-wide container and its accessors.
//!
//! The shared instance is created on first access. Applications that need
//! custom settings install their own with [`set_global`]; tests call
//! [`reset_global`] to start from a fresh container.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::container::Container;
use crate::error::Result;
use crate::value::Value;

static GLOBAL_CONTAINER: Lazy<RwLock<Arc<Container>>> =
    Lazy::new(|| RwLock::new(Arc::new(Container::default())));

/// The shared container.
///
/// # Examples
///
/// ```
/// use tawsil_container::global::global;
/// use tawsil_container::value::Value;
///
/// global().bind("greeting", Value::new(String::from("Hello from global!"))).unwrap();
/// ```
pub fn global() -> Arc<Container> {
    GLOBAL_CONTAINER.read().clone()
}

/// Replaces the shared container. Handles obtained earlier keep the old one.
pub fn set_global(container: Container) -> Arc<Container> {
    let container = Arc::new(container);
    *GLOBAL_CONTAINER.write() = container.clone();
    debug!("Installed global container");
    container
}

/// Replaces the shared container with an empty default one.
pub fn reset_global() {
    set_global(Container::default());
}

/// Shorthand for `global().get(id)`.
pub fn app(id: &str) -> Result<Value> {
    global().get(id)
}
