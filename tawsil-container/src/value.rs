//! Type-erased values handed out by the container.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{ContainerError, Result};

/// A shared, type-erased value.
///
/// Cloning a `Value` clones the pointer, never the payload, so two clones
/// are the *same* instance (see [`Value::ptr_eq`]).
///
/// # Examples
/// ```
/// use tawsil_container::value::Value;
///
/// let value = Value::new(String::from("bar"));
/// assert_eq!(value.cloned::<String>(), Some("bar".to_string()));
/// assert!(value.ptr_eq(&value.clone()));
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Value {
    /// Wraps `value`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an existing shared pointer without reallocating.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// The [`TypeId`] of the stored payload.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The type name of the stored payload.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns the payload as a shared pointer, if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner.clone().downcast::<T>().ok()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a clone of the payload, if it is a `T`.
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Like [`Value::downcast_ref`], failing with a type mismatch naming `context`.
    pub fn try_ref<T: Any>(&self, context: &str) -> Result<&T> {
        self.downcast_ref::<T>()
            .ok_or_else(|| self.mismatch::<T>(context).into())
    }

    /// Like [`Value::downcast`], failing with a type mismatch naming `context`.
    pub fn try_shared<T: Any + Send + Sync>(&self, context: &str) -> Result<Arc<T>> {
        self.downcast::<T>()
            .ok_or_else(|| self.mismatch::<T>(context).into())
    }

    /// Like [`Value::cloned`], failing with a type mismatch naming `context`.
    pub fn try_cloned<T: Any + Clone>(&self, context: &str) -> Result<T> {
        self.try_ref::<T>(context).cloned()
    }

    /// Returns `true` if both values point at the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn mismatch<T>(&self, context: &str) -> ContainerError {
        ContainerError::TypeMismatch {
            context: context.to_string(),
            expected: type_name::<T>(),
            found: self.type_name,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct SomeType {
        id: String,
    }

    #[test]
    fn downcast_to_right_type() {
        let value = Value::new(SomeType { id: "object".into() });
        assert!(value.is::<SomeType>());
        assert_eq!(value.downcast::<SomeType>().unwrap().id, "object");
        assert!(value.downcast::<String>().is_none());
    }

    #[test]
    fn from_arc_shares_the_pointer() {
        let shared = Arc::new(SomeType { id: "x".into() });
        let value = Value::from_arc(shared.clone());
        assert!(Arc::ptr_eq(&shared, &value.downcast::<SomeType>().unwrap()));
    }

    #[test]
    fn clones_are_identical() {
        let a = Value::new(1u8);
        let b = a.clone();
        let c = Value::new(1u8);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn try_ref_reports_mismatch() {
        let value = Value::new(42i32);
        let err = value.try_ref::<String>("greet").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("greet"));
        assert!(msg.contains("String"));
        assert!(msg.contains("i32"));
    }
}
