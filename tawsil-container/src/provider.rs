//! Invocation targets and binding providers.
//!
//! A [`Target`] says *what* to invoke; the caller decides its shape, so the
//! engine never sniffs strings or tuples at runtime. A [`Provider`] is what
//! a binding is built from: a ready value, or a target to invoke.
//!
//! # Examples
//! ```rust,ignore
//! container.singleton("foo", Target::constructor("FooBar"))?;
//! container.factory("bar", counter_invocable)?;
//! container.invoke(Target::method(Owner::instance(hello), "get_foo"), Args::new())?;
//! ```

use std::fmt;

use crate::signature::Invocable;
use crate::value::Value;

/// The owner side of a method reference.
#[derive(Debug, Clone)]
pub enum Owner {
    /// A catalogued type name; instance methods construct an owner first.
    Type(String),
    /// An existing instance.
    Instance(Value),
}

impl Owner {
    pub fn of_type(name: impl Into<String>) -> Self {
        Owner::Type(name.into())
    }

    pub fn instance(value: Value) -> Self {
        Owner::Instance(value)
    }
}

/// What the invocation engine is asked to run.
#[derive(Debug, Clone)]
pub enum Target {
    /// Build a catalogued type through its constructor.
    Constructor(String),
    /// Call a static or instance method.
    Method { owner: Owner, method: String },
    /// Call a plain callable.
    Invocable(Invocable),
}

impl Target {
    pub fn constructor(type_name: impl Into<String>) -> Self {
        Target::Constructor(type_name.into())
    }

    pub fn method(owner: Owner, method: impl Into<String>) -> Self {
        Target::Method {
            owner,
            method: method.into(),
        }
    }

    /// Human-readable name for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            Target::Constructor(name) => format!("{name}::constructor"),
            Target::Method { owner, method } => match owner {
                Owner::Type(name) => format!("{name}::{method}"),
                Owner::Instance(value) => format!("<{}>::{method}", value.type_name()),
            },
            Target::Invocable(invocable) => invocable.name().to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<Invocable> for Target {
    fn from(invocable: Invocable) -> Self {
        Target::Invocable(invocable)
    }
}

/// What a binding produces its value from.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Returned as-is; no invocation.
    Value(Value),
    /// Invoked through the engine with no explicit arguments.
    Target(Target),
}

impl Provider {
    pub fn value(value: Value) -> Self {
        Provider::Value(value)
    }

    /// A provider that constructs the catalogued type `type_name`.
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Provider::Target(Target::constructor(type_name))
    }
}

impl From<Value> for Provider {
    fn from(value: Value) -> Self {
        Provider::Value(value)
    }
}

impl From<Target> for Provider {
    fn from(target: Target) -> Self {
        Provider::Target(target)
    }
}

impl From<Invocable> for Provider {
    fn from(invocable: Invocable) -> Self {
        Provider::Target(Target::Invocable(invocable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_targets() {
        assert_eq!(Target::constructor("FooBar").describe(), "FooBar::constructor");
        assert_eq!(
            Target::method(Owner::of_type("FooBar"), "call").to_string(),
            "FooBar::call"
        );

        let on_instance = Target::method(Owner::instance(Value::new(1u8)), "get");
        assert_eq!(on_instance.describe(), "<u8>::get");
    }

    #[test]
    fn providers_from_parts() {
        let invocable = Invocable::new("make", |_| Ok(Value::new(())));
        assert!(matches!(Provider::from(invocable), Provider::Target(Target::Invocable(_))));
        assert!(matches!(Provider::from(Value::new(1u8)), Provider::Value(_)));
        assert!(matches!(
            Provider::of_type("FooBar"),
            Provider::Target(Target::Constructor(name)) if name == "FooBar"
        ));
    }
}
