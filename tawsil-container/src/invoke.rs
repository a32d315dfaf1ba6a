//! The invocation engine: resolve a target's parameters, then call it.

use tracing::{debug, instrument};

use crate::container::Container;
use crate::error::{ContainerError, Result, TawsilError};
use crate::policy::resolve_signature;
use crate::provider::{Owner, Provider, Target};
use crate::signature::{Args, InstanceMethod, Invocable};
use crate::types::Method;
use crate::value::Value;

impl Container {
    /// Invokes `target`, filling its parameters from `args` first and the
    /// container second.
    ///
    /// ```rust,ignore
    /// container.invoke(Target::constructor("HelloWorld"), Args::new())?;
    /// container.invoke(Target::method(Owner::instance(hello), "get_foo"), Args::new())?;
    /// container.invoke(greet, Args::new().with("temp", Value::new("baz")))?;
    /// ```
    pub fn invoke(&self, target: impl Into<Target>, args: Args) -> Result<Value> {
        self.invoke_target(&target.into(), &args)
    }

    /// [`invoke`](Container::invoke) without explicit arguments.
    pub fn call(&self, target: impl Into<Target>) -> Result<Value> {
        self.invoke(target, Args::new())
    }

    /// Produces a binding's value from its provider.
    pub(crate) fn provide(&self, provider: &Provider) -> Result<Value> {
        match provider {
            Provider::Value(value) => Ok(value.clone()),
            Provider::Target(target) => self.invoke_target(target, &Args::new()),
        }
    }

    #[instrument(level = "debug", skip_all, fields(callable = %target))]
    fn invoke_target(&self, target: &Target, args: &Args) -> Result<Value> {
        match target {
            Target::Invocable(invocable) => self.call_invocable(invocable, args),
            Target::Constructor(type_name) => self.construct(type_name, args),
            Target::Method { owner, method } => self.call_method(owner, method, args),
        }
    }

    fn call_invocable(&self, invocable: &Invocable, args: &Args) -> Result<Value> {
        let values = resolve_signature(self, invocable.signature(), args, invocable.name())?;
        invocable.call(values)
    }

    fn call_instance_method(
        &self,
        method: &InstanceMethod,
        owner: &Value,
        args: &Args,
    ) -> Result<Value> {
        let values = resolve_signature(self, method.signature(), args, method.name())?;
        method.call(owner, values)
    }

    fn construct(&self, type_name: &str, args: &Args) -> Result<Value> {
        let spec = self
            .type_spec(type_name)
            .ok_or_else(|| ContainerError::UnknownType(type_name.to_string()))?;
        let constructor = spec
            .constructor()
            .ok_or_else(|| ContainerError::NotConstructible(type_name.to_string()))?;

        debug!(type_name, "Constructing");
        self.call_invocable(constructor, args)
    }

    fn call_method(&self, owner: &Owner, method: &str, args: &Args) -> Result<Value> {
        match owner {
            Owner::Type(type_name) => {
                let spec = self
                    .type_spec(type_name)
                    .ok_or_else(|| ContainerError::UnknownType(type_name.to_string()))?;

                match spec.method(method) {
                    Some(Method::Static(invocable)) => self.call_invocable(invocable, args),
                    Some(Method::Instance(instance_method)) => {
                        // explicit args belong to the constructor
                        let instance = self.construct(type_name, args)?;
                        self.call_instance_method(instance_method, &instance, &Args::new())
                    }
                    None => Err(method_not_found(type_name, method)),
                }
            }
            Owner::Instance(instance) => {
                let spec = self
                    .type_spec_of(instance.type_id())
                    .ok_or_else(|| ContainerError::UnknownType(instance.type_name().to_string()))?;

                match spec.method(method) {
                    Some(Method::Instance(instance_method)) => {
                        self.call_instance_method(instance_method, instance, args)
                    }
                    Some(Method::Static(invocable)) => self.call_invocable(invocable, args),
                    None => Err(method_not_found(spec.name(), method)),
                }
            }
        }
    }
}

fn method_not_found(owner: &str, method: &str) -> TawsilError {
    ContainerError::MethodNotFound {
        owner: owner.to_string(),
        method: method.to_string(),
    }
    .into()
}
