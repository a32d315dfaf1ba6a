//! Parameter descriptors and the callables that carry them.
//!
//! Rust has no runtime reflection over function signatures, so every
//! callable the container invokes brings an explicit [`Signature`]:
//! the ordered list of [`Parameter`]s it wants filled. Descriptors are
//! either written by hand or generated by `#[injectable]`.
//!
//! # Examples
//! ```
//! use tawsil_container::signature::{Invocable, Parameter};
//! use tawsil_container::value::Value;
//!
//! let greet = Invocable::new("greet", |args| {
//!     let foo: String = args.cloned(0)?;
//!     let temp: String = args.cloned(1)?;
//!     Ok(Value::new(format!("{foo}-{temp}")))
//! })
//! .param(Parameter::new("foo"))
//! .param(Parameter::new("temp").with_default(Value::new(String::from("baz"))));
//!
//! assert_eq!(greet.signature().len(), 2);
//! assert_eq!(greet.signature().get(1).map(|p| p.index()), Some(1));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TawsilError};
use crate::kind::Kind;
use crate::value::Value;

/// Describes one formal parameter of a callable.
#[derive(Clone)]
pub struct Parameter {
    name: String,
    kind: Kind,
    default: Option<Value>,
    index: usize,
}

impl Parameter {
    /// An untyped parameter without a default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Kind::Untyped,
            default: None,
            index: 0,
        }
    }

    /// Sets the declared type used for aliases and typed resolvers.
    pub fn with_kind(mut self, kind: impl Into<Kind>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Declares the type as `T`, see [`Kind::of`].
    pub fn typed<T: ?Sized + 'static>(self) -> Self {
        self.with_kind(Kind::of::<T>())
    }

    /// Sets the value used when nothing else can fill the parameter.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    #[inline]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Position of the parameter within its signature.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_default", &self.has_default())
            .field("index", &self.index)
            .finish()
    }
}

/// Ordered parameters of a callable.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter, assigning its positional index.
    pub fn push(&mut self, mut param: Parameter) {
        param.index = self.params.len();
        self.params.push(param);
    }

    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<Parameter> for Signature {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut signature = Signature::new();
        for param in iter {
            signature.push(param);
        }
        signature
    }
}

/// Explicit arguments supplied by the caller of `invoke`.
///
/// Values may be keyed by parameter name, by positional index, or both;
/// a name match wins over a position match.
#[derive(Debug, Clone, Default)]
pub struct Args {
    named: HashMap<String, Value>,
    positional: HashMap<usize, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional arguments, indexed from zero in iteration order.
    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            named: HashMap::new(),
            positional: values.into_iter().enumerate().collect(),
        }
    }

    /// Adds a value for the parameter called `name`.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.named.insert(name.into(), value);
        self
    }

    /// Adds a value for the parameter at `index`.
    pub fn at(mut self, index: usize, value: Value) -> Self {
        self.positional.insert(index, value);
        self
    }

    pub fn by_name(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    pub fn by_index(&self, index: usize) -> Option<&Value> {
        self.positional.get(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }
}

/// Resolved arguments handed to a callable, in signature order.
pub struct Arguments {
    target: String,
    values: Vec<Value>,
}

impl Arguments {
    pub fn new(target: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            target: target.into(),
            values,
        }
    }

    /// Name of the callable these arguments were resolved for.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw value at `index`.
    pub fn value(&self, index: usize) -> Result<&Value> {
        self.values
            .get(index)
            .ok_or_else(|| TawsilError::parameter_not_found(&format!("#{index}"), &self.target))
    }

    /// A clone of the `T` at `index`.
    pub fn cloned<T: Any + Clone>(&self, index: usize) -> Result<T> {
        self.value(index)?.try_cloned::<T>(&self.context(index))
    }

    /// The `T` at `index` as a shared pointer.
    pub fn shared<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        self.value(index)?.try_shared::<T>(&self.context(index))
    }

    pub fn get_ref<T: Any>(&self, index: usize) -> Result<&T> {
        let context = self.context(index);
        self.value(index)?.try_ref::<T>(&context)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn context(&self, index: usize) -> String {
        format!("argument #{index} of {}", self.target)
    }
}

/// Body of a free function or static method.
pub type InvokeFn = Arc<dyn Fn(Arguments) -> Result<Value> + Send + Sync>;

/// Body of an instance method: receives the owner instance first.
pub type MethodFn = Arc<dyn Fn(&Value, Arguments) -> Result<Value> + Send + Sync>;

/// A plain callable plus the descriptors of its parameters.
#[derive(Clone)]
pub struct Invocable {
    name: String,
    signature: Signature,
    body: InvokeFn,
}

impl Invocable {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature: Signature::new(),
            body: Arc::new(body),
        }
    }

    /// Appends a parameter descriptor.
    pub fn param(mut self, param: Parameter) -> Self {
        self.signature.push(param);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn call(&self, values: Vec<Value>) -> Result<Value> {
        (self.body)(Arguments::new(self.name.clone(), values))
    }
}

impl fmt::Debug for Invocable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocable")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

/// A method that needs an owner instance.
#[derive(Clone)]
pub struct InstanceMethod {
    name: String,
    signature: Signature,
    body: MethodFn,
}

impl InstanceMethod {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Value, Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature: Signature::new(),
            body: Arc::new(body),
        }
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.signature.push(param);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn call(&self, owner: &Value, values: Vec<Value>) -> Result<Value> {
        (self.body)(owner, Arguments::new(self.name.clone(), values))
    }
}

impl fmt::Debug for InstanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceMethod")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_assigns_indices() {
        let signature: Signature = ["a", "b", "c"].into_iter().map(Parameter::new).collect();
        let indices: Vec<usize> = signature.iter().map(Parameter::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn typed_parameter_declares_kind() {
        struct Mailer;
        let param = Parameter::new("mailer").typed::<Arc<Mailer>>();
        assert_eq!(param.kind(), &Kind::named("Mailer"));
        assert!(!param.has_default());
    }

    #[test]
    fn args_by_name_and_position() {
        let args = Args::positional([Value::new(1u8), Value::new(2u8)])
            .with("temp", Value::new("baz"));

        assert_eq!(args.by_index(1).and_then(|v| v.cloned::<u8>()), Some(2));
        assert!(args.by_index(2).is_none());
        assert!(args.by_name("temp").is_some());
        assert!(!args.is_empty());
    }

    #[test]
    fn arguments_typed_access() {
        let args = Arguments::new("join", vec![Value::new(String::from("a")), Value::new(7u32)]);

        assert_eq!(args.cloned::<String>(0).unwrap(), "a");
        assert_eq!(*args.shared::<u32>(1).unwrap(), 7);
        assert!(args.cloned::<u32>(0).is_err());
        assert!(args.value(5).unwrap_err().is_not_found());
    }

    #[test]
    fn invocable_calls_body() {
        let double = Invocable::new("double", |args| {
            let n: u32 = args.cloned(0)?;
            Ok(Value::new(n * 2))
        })
        .param(Parameter::new("n"));

        let result = double.call(vec![Value::new(21u32)]).unwrap();
        assert_eq!(result.cloned::<u32>(), Some(42));
        assert_eq!(double.name(), "double");
    }
}
