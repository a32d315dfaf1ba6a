//! # Tawsil Macros
//!
//! Procedural macros that describe functions and types to the container,
//! so it can fill their parameters without runtime reflection.
//!
//! - [`injectable`] on a free function emits `<fn>_invocable()`;
//! - [`injectable`] on an inherent `impl` block implements `Injectable`
//!   and registers the type in the link-time catalogue.

use proc_macro::TokenStream;
use syn::{Item, parse_macro_input};

mod expand;
mod options;
mod params;

/// Generates parameter descriptors for a function or an `impl` block.
///
/// # Options
///
/// - `name = "..."`: invocable name (functions) or catalogue name (types)
/// - `fallible`: the function, or every method, returns `Result<T, E>`
/// - `crate = "path"`: where `tawsil` lives (default `::tawsil`)
///
/// # Parameter attributes
///
/// - `#[inject(default = expr)]`: value used when nothing else resolves (a `&T`
///   parameter takes a `T`, a `&str` one a string literal)
/// - `#[inject(kind = "Type")]`: resolver kind and alias name to use
/// - `#[inject(untyped)]`: resolve through untyped resolvers only
/// - `#[inject(name = "id")]`: look up `id` instead of the parameter name
///
/// # Method attributes (inside an `impl` block)
///
/// - `#[inject(constructor)]`: build the type with this method (default: `new`)
/// - `#[inject(fallible)]`: this method returns `Result<T, E>`
/// - `#[inject(skip)]`: leave the method out of the type spec
///
/// # Examples
///
/// ```rust,ignore
/// #[injectable]
/// fn greet(foo: String, #[inject(default = String::from("baz"))] temp: String) -> String {
///     format!("{foo}-{temp}")
/// }
///
/// let out = container.call(greet_invocable())?;
///
/// struct HelloWorld { foo: String }
///
/// #[injectable]
/// impl HelloWorld {
///     fn new(foo: String) -> Self { Self { foo } }
///     fn get_foo(&self) -> String { self.foo.clone() }
/// }
/// ```
#[proc_macro_attribute]
pub fn injectable(args: TokenStream, input: TokenStream) -> TokenStream {
    let options = match options::InjectableArgs::parse(args.into()) {
        Ok(options) => options,
        Err(err) => return err.write_errors().into(),
    };

    let expanded = match parse_macro_input!(input as Item) {
        Item::Fn(item) => expand::injectable_fn(options, item),
        Item::Impl(item) => expand::injectable_impl(options, item),
        other => Err(syn::Error::new_spanned(
            other,
            "#[injectable] applies to functions and inherent impl blocks",
        )),
    };

    expanded.unwrap_or_else(syn::Error::into_compile_error).into()
}
