//! Dependency resolution policy: how one parameter gets its value.
//!
//! Steps are tried in a fixed order, first match wins:
//!
//! 1. explicit argument keyed by the parameter's name
//! 2. explicit argument keyed by the parameter's position
//! 3. class alias registered for the parameter's declared type
//! 4. binding whose id equals the parameter's name
//! 5. resolver for `(name, declared type)`
//! 6. the parameter's default value
//! 7. `NotFound` naming the parameter
//!
//! Explicit caller overrides beat type aliasing, which beats name-based
//! bindings, generic typed resolution and finally language-level defaults.

use tracing::trace;

use crate::container::Container;
use crate::error::{Result, TawsilError};
use crate::signature::{Args, Parameter, Signature};
use crate::value::Value;

/// Fills every parameter of `signature`, in order.
pub(crate) fn resolve_signature(
    container: &Container,
    signature: &Signature,
    args: &Args,
    target: &str,
) -> Result<Vec<Value>> {
    signature
        .iter()
        .map(|param| resolve_parameter(container, param, args, target))
        .collect()
}

/// Picks a value for one parameter.
pub(crate) fn resolve_parameter(
    container: &Container,
    param: &Parameter,
    args: &Args,
    target: &str,
) -> Result<Value> {
    let name = param.name();

    if let Some(value) = args.by_name(name) {
        trace!(callable = target, param = name, step = "named argument", "Parameter resolved");
        return Ok(value.clone());
    }

    if let Some(value) = args.by_index(param.index()) {
        trace!(callable = target, param = name, step = "positional argument", "Parameter resolved");
        return Ok(value.clone());
    }

    if let Some(type_name) = param.kind().name() {
        if container.has_alias(type_name) {
            trace!(callable = target, param = name, step = "alias", alias = type_name, "Parameter resolved");
            return container.get_alias(type_name);
        }
    }

    if container.has(name) {
        trace!(callable = target, param = name, step = "binding", "Parameter resolved");
        return container.get(name);
    }

    match container.resolve(name, param.kind()) {
        Ok(value) => {
            trace!(callable = target, param = name, step = "resolver", "Parameter resolved");
            return Ok(value);
        }
        Err(err) if err.is_not_found() => {}
        Err(err) => return Err(err),
    }

    if let Some(default) = param.default_value() {
        trace!(callable = target, param = name, step = "default", "Parameter resolved");
        return Ok(default.clone());
    }

    Err(TawsilError::parameter_not_found(name, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;
    use crate::types::TypeSpec;

    struct Pool;

    fn pool_param() -> Parameter {
        Parameter::new("db").typed::<Pool>()
    }

    fn untyped_resolver(container: &Container, answer: &'static str) {
        container.add_resolver(move |_: &str, _: &Container| -> Result<Option<Value>> {
            Ok(Some(Value::new(answer)))
        });
    }

    fn text(value: Value) -> &'static str {
        value.cloned::<&'static str>().unwrap()
    }

    #[test]
    fn named_argument_beats_everything() {
        let container = Container::new();
        container.bind("foo", Value::new("bound")).unwrap();

        let param = Parameter::new("foo");
        let args = Args::new().with("foo", Value::new("named")).at(0, Value::new("positional"));

        let value = resolve_parameter(&container, &param, &args, "t").unwrap();
        assert_eq!(text(value), "named");
    }

    #[test]
    fn positional_argument_beats_binding() {
        let container = Container::new();
        container.bind("foo", Value::new("bound")).unwrap();

        let args = Args::positional([Value::new("positional")]);
        let value = resolve_parameter(&container, &Parameter::new("foo"), &args, "t").unwrap();
        assert_eq!(text(value), "positional");
    }

    #[test]
    fn alias_beats_name_binding() {
        let container = Container::new();
        container.register_type(TypeSpec::interface("Pool"));
        container.bind("db", Value::new("by name")).unwrap();
        container.bind("primary", Value::new("by alias")).unwrap();
        container.alias("primary", "Pool").unwrap();

        let value = resolve_parameter(&container, &pool_param(), &Args::new(), "t").unwrap();
        assert_eq!(text(value), "by alias");
    }

    #[test]
    fn binding_beats_resolver() {
        let container = Container::new();
        container.bind("db", Value::new("bound")).unwrap();
        container.add_typed_resolver(Kind::of::<Pool>(), |_: &str, _: &Container| -> Result<Option<Value>> {
            Ok(Some(Value::new("resolved")))
        });

        let value = resolve_parameter(&container, &pool_param(), &Args::new(), "t").unwrap();
        assert_eq!(text(value), "bound");
    }

    #[test]
    fn resolver_uses_declared_kind() {
        let container = Container::new();
        untyped_resolver(&container, "untyped");
        container.add_typed_resolver("Pool", |id: &str, _: &Container| -> Result<Option<Value>> {
            Ok(Some(Value::new(format!("pool:{id}"))))
        });

        let typed = resolve_parameter(&container, &pool_param(), &Args::new(), "t").unwrap();
        assert_eq!(typed.cloned::<String>().unwrap(), "pool:db");

        let untyped = resolve_parameter(&container, &Parameter::new("x"), &Args::new(), "t").unwrap();
        assert_eq!(text(untyped), "untyped");
    }

    #[test]
    fn resolver_beats_default() {
        let container = Container::new();
        untyped_resolver(&container, "resolved");

        let param = Parameter::new("foo").with_default(Value::new("default"));
        let value = resolve_parameter(&container, &param, &Args::new(), "t").unwrap();
        assert_eq!(text(value), "resolved");
    }

    #[test]
    fn default_when_nothing_else() {
        let container = Container::new();
        let param = Parameter::new("foo").with_default(Value::new("bar"));

        let value = resolve_parameter(&container, &param, &Args::new(), "t").unwrap();
        assert_eq!(text(value), "bar");
    }

    #[test]
    fn missing_parameter_is_named() {
        let container = Container::new();
        let err = resolve_parameter(&container, &Parameter::new("something"), &Args::new(), "closure")
            .unwrap_err();

        match err {
            TawsilError::NotFound(inner) => assert_eq!(inner.identifier(), "something"),
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn resolver_errors_other_than_not_found_propagate() {
        let container = Container::new();
        container.add_resolver(|_: &str, _: &Container| -> Result<Option<Value>> {
            Err(TawsilError::construction_failed("resolver", "boom"))
        });

        let param = Parameter::new("foo").with_default(Value::new("bar"));
        let err = resolve_parameter(&container, &param, &Args::new(), "t").unwrap_err();
        assert!(matches!(err, TawsilError::ConstructionFailed { .. }));
    }
}
