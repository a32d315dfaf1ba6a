//! Resolver kinds and cache keys.
//!
//! A [`Kind`] groups resolvers (and their cached results) by the declared
//! type of the parameter being filled. Parameters without a meaningful type
//! use [`Kind::Untyped`].

use std::any::type_name;
use std::fmt;

use tawsil_support::rendering::{is_untyped_name, shorten_type_name, unwrap_pointer_name};

/// Grouping key for resolvers.
///
/// # Examples
/// ```
/// use tawsil_container::kind::Kind;
///
/// struct SomeType;
///
/// assert_eq!(Kind::of::<SomeType>(), Kind::named("SomeType"));
/// assert_eq!(Kind::of::<String>(), Kind::Untyped);
/// assert_eq!(Kind::from("SomeType"), Kind::named("SomeType"));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// Resolvers registered without a type.
    #[default]
    Untyped,
    /// Resolvers for one declared type name.
    Named(String),
}

impl Kind {
    /// Creates a named kind.
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        Kind::Named(name.into())
    }

    /// Derives the kind a parameter of type `T` declares.
    ///
    /// `Arc<X>`, `&X` and `Arc<dyn X + Send + Sync>` declare `X`; scalars,
    /// strings and std collections are untyped.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_type_name(type_name::<T>())
    }

    /// Derives a kind from a (possibly fully qualified) type name.
    pub fn from_type_name(full_name: &str) -> Self {
        let short = shorten_type_name(full_name);
        let bare = unwrap_pointer_name(&short);
        if bare.is_empty() || is_untyped_name(&short) || is_untyped_name(bare) {
            return Kind::Untyped;
        }
        Kind::Named(bare.to_string())
    }

    /// Returns the type name for named kinds.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        match self {
            Kind::Untyped => None,
            Kind::Named(name) => Some(name),
        }
    }

    #[inline]
    pub fn is_untyped(&self) -> bool {
        matches!(self, Kind::Untyped)
    }
}

impl From<&str> for Kind {
    fn from(name: &str) -> Self {
        if name.is_empty() {
            Kind::Untyped
        } else {
            Kind::Named(name.to_string())
        }
    }
}

impl From<String> for Kind {
    fn from(name: String) -> Self {
        Kind::from(name.as_str())
    }
}

impl From<Option<&str>> for Kind {
    fn from(name: Option<&str>) -> Self {
        name.map(Kind::from).unwrap_or_default()
    }
}

impl From<&Kind> for Kind {
    fn from(kind: &Kind) -> Self {
        kind.clone()
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Untyped => write!(f, "Kind(untyped)"),
            Kind::Named(name) => write!(f, "Kind({name})"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Untyped => write!(f, "<untyped>"),
            Kind::Named(name) => write!(f, "\"{name}\""),
        }
    }
}

/// Resolver cache key: kind first, then identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub kind: Kind,
    pub id: String,
}

impl CacheKey {
    pub fn new(kind: &Kind, id: &str) -> Self {
        Self {
            kind: kind.clone(),
            id: id.to_string(),
        }
    }
}
