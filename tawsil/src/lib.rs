//! # Tawsil: runtime dependency injection for Rust
//!
//! A container that maps string ids to values, singletons and factories,
//! and invokes functions, constructors and methods by filling their
//! parameters from explicit arguments, class aliases, bindings named like
//! the parameter, typed resolvers and finally declared defaults.
//!
//! # Examples
//! ```rust
//! use tawsil::prelude::*;
//! use tawsil::injectable;
//!
//! #[injectable]
//! fn greet(foo: String, #[inject(default = String::from("baz"))] temp: String) -> String {
//!     format!("{foo}-{temp}")
//! }
//!
//! let container = Container::new();
//! container.bind("foo", Value::new(String::from("bar"))).unwrap();
//!
//! let out = container.call(greet_invocable()).unwrap();
//! assert_eq!(out.cloned::<String>().unwrap(), "bar-baz");
//! ```

pub use tawsil_container::*;
pub use tawsil_derive::*;
pub use tawsil_support::*;
