//! Container settings.
//!
//! Usually set through [`ContainerBuilder`](crate::container::ContainerBuilder),
//! but also deserializable so an application can keep them in its own
//! config file:
//!
//! ```toml
//! [container]
//! strict_service_ids = true
//! multi_binding = false
//! ```

use serde::{Deserialize, Serialize};

/// Knobs that change how a [`Container`](crate::container::Container) behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// Reject service ids that name a catalogued type.
    ///
    /// Such ids shadow the type; register the service under another id
    /// and point an alias at it instead.
    pub strict_service_ids: bool,

    /// Append repeated registrations of an id instead of replacing them.
    ///
    /// `get_all` then returns every value; `get` on such an id is ambiguous.
    pub multi_binding: bool,

    /// Load the type specs registered by `#[injectable]` at link time.
    pub register_linked_types: bool,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            strict_service_ids: false,
            multi_binding: false,
            register_linked_types: true,
        }
    }
}
