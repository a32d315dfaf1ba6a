//! Core container implementation for Tawsil DI.

pub mod bindings;
pub mod container;
pub mod error;
pub mod global;
pub mod kind;
pub mod lifecycle;
pub mod provider;
pub mod resolver;
pub mod settings;
pub mod signature;
pub mod types;
pub mod value;

mod guard;
mod invoke;
mod policy;

pub use container::{Container, ContainerBuilder, prelude};
pub use error::{ContainerError, NotFoundError, Result, Subject, TawsilError};
pub use global::{app, global, reset_global, set_global};
pub use kind::Kind;
pub use lifecycle::Lifecycle;
pub use provider::{Owner, Provider, Target};
pub use settings::ContainerSettings;
pub use signature::{Args, Arguments, InstanceMethod, Invocable, Parameter, Signature};
pub use types::{Injectable, Method, TypeRegistration, TypeSpec};
pub use value::Value;

#[doc(hidden)]
pub use inventory;
