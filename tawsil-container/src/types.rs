//! The type catalogue: what the container knows about constructible types.
//!
//! A [`TypeSpec`] stands in for runtime reflection over a type: its name,
//! its constructor, and its static and instance methods, each with an
//! explicit [`Signature`](crate::signature::Signature).
//!
//! Specs reach the catalogue two ways:
//! - at link time, through `#[injectable]` on an `impl` block (collected
//!   with [`inventory`]);
//! - at runtime, through `Container::register_type`.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::signature::{InstanceMethod, Invocable};
use crate::value::Value;

/// A method known to a [`TypeSpec`].
#[derive(Debug, Clone)]
pub enum Method {
    /// Needs no owner instance.
    Static(Invocable),
    /// Called on an owner instance.
    Instance(InstanceMethod),
}

impl Method {
    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self, Method::Static(_))
    }
}

/// Everything the invocation engine needs to build and call a type.
///
/// # Examples
/// ```
/// use tawsil_container::signature::{Invocable, Parameter};
/// use tawsil_container::types::TypeSpec;
/// use tawsil_container::value::Value;
///
/// struct HelloWorld { foo: String }
///
/// let spec = TypeSpec::new::<HelloWorld>("HelloWorld").with_constructor(
///     Invocable::new("HelloWorld::new", |args| {
///         Ok(Value::new(HelloWorld { foo: args.cloned(0)? }))
///     })
///     .param(Parameter::new("foo")),
/// );
///
/// assert!(spec.is_constructible());
/// ```
#[derive(Clone)]
pub struct TypeSpec {
    name: String,
    type_id: Option<TypeId>,
    constructor: Option<Invocable>,
    methods: HashMap<String, Method>,
}

impl TypeSpec {
    /// A spec for the concrete type `T`, with no constructor yet.
    pub fn new<T: Any>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: Some(TypeId::of::<T>()),
            constructor: None,
            methods: HashMap::new(),
        }
    }

    /// A spec for `T` whose constructor is [`Default::default`].
    pub fn with_default<T: Any + Default + Send + Sync>(name: impl Into<String>) -> Self {
        let name = name.into();
        let constructor = Invocable::new(format!("{name}::default"), |_| Ok(Value::new(T::default())));
        Self::new::<T>(name).with_constructor(constructor)
    }

    /// A known type name with no concrete type behind it (e.g. a trait).
    ///
    /// Interfaces can be aliased but never constructed.
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: None,
            constructor: None,
            methods: HashMap::new(),
        }
    }

    pub fn with_constructor(mut self, constructor: Invocable) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn with_static(mut self, name: impl Into<String>, method: Invocable) -> Self {
        self.methods.insert(name.into(), Method::Static(method));
        self
    }

    pub fn with_method(mut self, name: impl Into<String>, method: InstanceMethod) -> Self {
        self.methods.insert(name.into(), Method::Instance(method));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    pub fn constructor(&self) -> Option<&Invocable> {
        self.constructor.as_ref()
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    #[inline]
    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&String> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("TypeSpec")
            .field("name", &self.name)
            .field("constructible", &self.is_constructible())
            .field("methods", &methods)
            .finish()
    }
}

/// Implemented by types that describe themselves to the container.
///
/// Usually generated by `#[injectable]` on an inherent `impl` block.
pub trait Injectable: Any + Send + Sync {
    fn type_spec() -> TypeSpec;
}

/// A link-time catalogue entry, submitted with [`inventory::submit!`].
pub struct TypeRegistration {
    pub name: &'static str,
    pub spec: fn() -> TypeSpec,
}

impl TypeRegistration {
    pub const fn new(name: &'static str, spec: fn() -> TypeSpec) -> Self {
        Self { name, spec }
    }
}

inventory::collect!(TypeRegistration);

/// Name- and `TypeId`-indexed store of [`TypeSpec`]s.
#[derive(Default)]
pub(crate) struct TypeCatalogue {
    by_name: RwLock<HashMap<String, Arc<TypeSpec>>>,
    by_type: RwLock<HashMap<TypeId, Arc<TypeSpec>>>,
}

impl TypeCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every spec submitted at link time.
    pub fn load_linked(&self) {
        for registration in inventory::iter::<TypeRegistration> {
            self.insert((registration.spec)());
        }
    }

    /// Adds or replaces a spec.
    pub fn insert(&self, spec: TypeSpec) {
        debug!(name = %spec.name, constructible = spec.is_constructible(), "Registered type");
        let spec = Arc::new(spec);
        if let Some(type_id) = spec.type_id {
            self.by_type.write().insert(type_id, spec.clone());
        }
        self.by_name.write().insert(spec.name.clone(), spec);
    }

    pub fn get(&self, name: &str) -> Option<Arc<TypeSpec>> {
        self.by_name.read().get(name).cloned()
    }

    pub fn get_by_type(&self, type_id: TypeId) -> Option<Arc<TypeSpec>> {
        self.by_type.read().get(&type_id).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Parameter;

    #[derive(Default)]
    struct FooBar;

    #[test]
    fn default_constructor_builds() {
        let spec = TypeSpec::with_default::<FooBar>("FooBar");
        let built = spec.constructor().unwrap().call(vec![]).unwrap();
        assert!(built.is::<FooBar>());
    }

    #[test]
    fn interface_is_not_constructible() {
        let spec = TypeSpec::interface("Logger");
        assert!(!spec.is_constructible());
        assert!(spec.type_id().is_none());
    }

    #[test]
    fn methods_keep_their_receiver() {
        let spec = TypeSpec::new::<FooBar>("FooBar")
            .with_static(
                "call_static",
                Invocable::new("FooBar::call_static", |_| Ok(Value::new("static"))),
            )
            .with_method(
                "call_instance",
                InstanceMethod::new("FooBar::call_instance", |_, _| Ok(Value::new("instance")))
                    .param(Parameter::new("unused")),
            );

        assert!(spec.method("call_static").unwrap().is_static());
        assert!(!spec.method("call_instance").unwrap().is_static());
        assert!(spec.method("missing").is_none());
    }

    #[test]
    fn catalogue_indexes_by_name_and_type() {
        let catalogue = TypeCatalogue::new();
        catalogue.insert(TypeSpec::with_default::<FooBar>("FooBar"));
        catalogue.insert(TypeSpec::interface("Logger"));

        assert!(catalogue.contains("FooBar"));
        assert!(catalogue.contains("Logger"));
        assert_eq!(catalogue.len(), 2);
        assert_eq!(
            catalogue.get_by_type(TypeId::of::<FooBar>()).unwrap().name(),
            "FooBar"
        );
    }
}
