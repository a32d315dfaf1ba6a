//! Turning a Rust parameter list into descriptors and extraction code.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{GenericArgument, Ident, Pat, PatType, PathArguments, ReturnType, Type};

use crate::options::ParamOptions;

/// Generated pieces for one signature.
pub struct PreparedParams {
    /// `.param(Parameter::new(..)...)` calls, in order.
    pub descriptors: Vec<TokenStream>,
    /// `let __tawsil_argN = ...;` statements reading `__args`.
    pub bindings: Vec<TokenStream>,
    /// The `__tawsil_argN` idents to pass to the real call.
    pub idents: Vec<Ident>,
}

pub fn prepare<'a>(
    krate: &TokenStream,
    inputs: impl Iterator<Item = &'a mut PatType>,
) -> syn::Result<PreparedParams> {
    let mut prepared = PreparedParams {
        descriptors: Vec::new(),
        bindings: Vec::new(),
        idents: Vec::new(),
    };

    for (index, input) in inputs.enumerate() {
        let options = ParamOptions::take(&mut input.attrs)?;
        let name = match (&options.name, input.pat.as_ref()) {
            (Some(name), _) => name.clone(),
            (None, Pat::Ident(pat)) => pat.ident.unraw().to_string(),
            (None, other) => {
                return Err(syn::Error::new_spanned(
                    other,
                    "destructured parameters need #[inject(name = \"...\")]",
                ));
            }
        };

        let ty = input.ty.as_ref();
        let kind = if options.untyped {
            quote!()
        } else if let Some(kind) = &options.kind {
            quote!(.with_kind(#kind))
        } else {
            let declared = declared_type(ty);
            quote!(.typed::<#declared>())
        };
        let default = match &options.default {
            Some(expr) => {
                let value = default_value(krate, ty, quote!(#expr));
                quote!(.with_default(#value))
            }
            None => quote!(),
        };

        prepared
            .descriptors
            .push(quote!(.param(#krate::Parameter::new(#name) #kind #default)));

        let ident = format_ident!("__tawsil_arg{}", index);
        let extract = extract(ty, index)?;
        prepared.bindings.push(quote!(let #ident = #extract;));
        prepared.idents.push(ident);
    }

    Ok(prepared)
}

/// The type whose name becomes the parameter's kind.
fn declared_type(ty: &Type) -> &Type {
    match ty {
        Type::Reference(reference) => declared_type(&reference.elem),
        Type::Paren(paren) => declared_type(&paren.elem),
        Type::Group(group) => declared_type(&group.elem),
        other => other,
    }
}

/// Reads argument `index` of `__args` as `ty`.
fn extract(ty: &Type, index: usize) -> syn::Result<TokenStream> {
    if let Type::Reference(reference) = ty {
        if reference.mutability.is_some() {
            return Err(syn::Error::new_spanned(
                ty,
                "injected values are shared, `&mut` parameters are not supported",
            ));
        }
        let elem = reference.elem.as_ref();
        if is_str(elem) {
            return Ok(quote!(__args.get_ref::<::std::string::String>(#index)?.as_str()));
        }
        return Ok(quote!(__args.get_ref::<#elem>(#index)?));
    }

    Ok(match shared_inner(ty) {
        Some(inner) => quote!(__args.shared::<#inner>(#index)?),
        None => quote!(__args.cloned::<#ty>(#index)?),
    })
}

/// Wraps `expr` of type `ty` in a `Value`, unwrapping `Arc<T>` so the
/// container sees the `T`.
pub fn wrap_value(krate: &TokenStream, ty: &Type, expr: TokenStream) -> TokenStream {
    if shared_inner(ty).is_some() {
        quote!(#krate::Value::from_arc(#expr))
    } else {
        quote!(#krate::Value::new(#expr))
    }
}

/// Wraps a `#[inject(default = ..)]` expression the way `extract` reads it
/// back. Reference parameters store the owned value.
fn default_value(krate: &TokenStream, ty: &Type, expr: TokenStream) -> TokenStream {
    match ty {
        Type::Reference(reference) if is_str(&reference.elem) => {
            quote!(#krate::Value::new(::std::string::String::from(#expr)))
        }
        Type::Reference(reference) => wrap_value(krate, &reference.elem, expr),
        other => wrap_value(krate, other, expr),
    }
}

/// Type of the produced value, looking through `Result` when fallible.
pub fn output_type(output: &ReturnType, fallible: bool) -> syn::Result<Option<Type>> {
    let ty = match output {
        ReturnType::Default if fallible => {
            return Err(call_site_error("`fallible` needs a `Result<T, E>` return type"));
        }
        ReturnType::Default => return Ok(None),
        ReturnType::Type(_, ty) => ty.as_ref(),
    };
    if !fallible {
        return Ok(Some(ty.clone()));
    }
    first_generic("Result", ty)
        .cloned()
        .map(Some)
        .ok_or_else(|| syn::Error::new_spanned(ty, "`fallible` needs a `Result<T, E>` return type"))
}

/// `T` for `Arc<T>` with a sized `T`. `Arc<dyn Trait>` is stored as is.
fn shared_inner(ty: &Type) -> Option<&Type> {
    first_generic("Arc", ty).filter(|inner| !matches!(inner, Type::TraitObject(_)))
}

fn first_generic<'a>(wrapper: &str, ty: &'a Type) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

fn is_str(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.qself.is_none() && path.path.is_ident("str"))
}

fn call_site_error(message: &str) -> syn::Error {
    syn::Error::new(Span::call_site(), message)
}
