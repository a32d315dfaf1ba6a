//! Parsing of `#[injectable(...)]` and `#[inject(...)]` options.

use darling::FromMeta;
use darling::ast::NestedMeta;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Expr, LitStr, Path};

/// Top-level `#[injectable(...)]` options.
#[derive(Debug, Default, FromMeta)]
pub struct InjectableArgs {
    #[darling(default)]
    pub name: Option<String>,
    #[darling(default)]
    pub fallible: bool,
    #[darling(default, rename = "crate")]
    pub krate: Option<Path>,
}

impl InjectableArgs {
    pub fn parse(args: TokenStream) -> darling::Result<Self> {
        let list = NestedMeta::parse_meta_list(args)?;
        Self::from_list(&list)
    }

    /// Path to the `tawsil` facade in generated code.
    pub fn crate_path(&self) -> TokenStream {
        match &self.krate {
            Some(path) => quote!(#path),
            None => quote!(::tawsil),
        }
    }
}

/// `#[inject(...)]` on a parameter.
#[derive(Default)]
pub struct ParamOptions {
    pub default: Option<Expr>,
    pub kind: Option<String>,
    pub untyped: bool,
    pub name: Option<String>,
}

impl ParamOptions {
    /// Reads and removes every `#[inject]` attribute in `attrs`.
    pub fn take(attrs: &mut Vec<Attribute>) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in take_inject_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    options.default = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("kind") {
                    let kind: LitStr = meta.value()?.parse()?;
                    options.kind = Some(kind.value());
                } else if meta.path.is_ident("untyped") {
                    options.untyped = true;
                } else if meta.path.is_ident("name") {
                    let name: LitStr = meta.value()?.parse()?;
                    options.name = Some(name.value());
                } else {
                    return Err(meta.error(
                        "unknown parameter option, expected `default`, `kind`, `untyped` or `name`",
                    ));
                }
                Ok(())
            })?;
        }

        if options.untyped && options.kind.is_some() {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "`untyped` and `kind` cannot be combined",
            ));
        }
        Ok(options)
    }
}

/// `#[inject(...)]` on a method inside an `impl` block.
#[derive(Default)]
pub struct MethodOptions {
    pub constructor: bool,
    pub fallible: bool,
    pub skip: bool,
}

impl MethodOptions {
    pub fn take(attrs: &mut Vec<Attribute>) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in take_inject_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("constructor") {
                    options.constructor = true;
                } else if meta.path.is_ident("fallible") {
                    options.fallible = true;
                } else if meta.path.is_ident("skip") {
                    options.skip = true;
                } else {
                    return Err(meta.error(
                        "unknown method option, expected `constructor`, `fallible` or `skip`",
                    ));
                }
                Ok(())
            })?;
        }
        Ok(options)
    }
}

fn take_inject_attrs(attrs: &mut Vec<Attribute>) -> Vec<Attribute> {
    let (inject, rest): (Vec<_>, Vec<_>) = std::mem::take(attrs)
        .into_iter()
        .partition(|attr| attr.path().is_ident("inject"));
    *attrs = rest;
    inject
}
