//! Code generation for `#[injectable]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{FnArg, ImplItem, ImplItemFn, ItemFn, ItemImpl, PatType, ReturnType, Signature, Type};

use crate::options::{InjectableArgs, MethodOptions, ParamOptions};
use crate::params::{self, PreparedParams};

/// `#[injectable] fn ...`: keeps the function and adds `<fn>_invocable()`.
pub fn injectable_fn(options: InjectableArgs, mut item: ItemFn) -> syn::Result<TokenStream> {
    reject_unsupported(&item.sig)?;

    let krate = options.crate_path();
    let fn_ident = item.sig.ident.clone();
    let name = options
        .name
        .clone()
        .unwrap_or_else(|| fn_ident.unraw().to_string());

    let prepared = params::prepare(&krate, typed_inputs(&mut item.sig)?.into_iter())?;
    let invocable = invocable(
        &krate,
        &name,
        quote!(#fn_ident),
        prepared,
        &item.sig.output,
        options.fallible,
    )?;

    let vis = &item.vis;
    let handle = format_ident!("{}_invocable", fn_ident.unraw());
    let doc = format!("[`{fn_ident}`] with the parameter descriptors the container needs.");

    Ok(quote! {
        #item

        #[doc = #doc]
        #vis fn #handle() -> #krate::Invocable {
            #invocable
        }
    })
}

/// `#[injectable] impl Type { ... }`: implements `Injectable` and registers
/// the type spec at link time.
pub fn injectable_impl(options: InjectableArgs, mut item: ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[injectable] applies to inherent impl blocks only",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[injectable] does not support generic impl blocks",
        ));
    }

    let krate = options.crate_path();
    let self_ty = item.self_ty.as_ref().clone();
    let type_name = match &options.name {
        Some(name) => name.clone(),
        None => type_ident(&self_ty)?,
    };

    let mut constructor: Option<TokenStream> = None;
    let mut members = Vec::new();
    {
        let mut entries: Vec<(&mut ImplItemFn, MethodOptions)> = Vec::new();
        for impl_item in &mut item.items {
            if let ImplItem::Fn(method) = impl_item {
                let method_options = MethodOptions::take(&mut method.attrs)?;
                entries.push((method, method_options));
            }
        }
        let explicit_constructor = entries.iter().any(|(_, opts)| opts.constructor);

        for (method, method_options) in entries {
            if method_options.skip {
                for input in param_inputs(&mut method.sig) {
                    ParamOptions::take(&mut input.attrs)?;
                }
                continue;
            }
            reject_unsupported(&method.sig)?;

            let method_ident = method.sig.ident.clone();
            let method_name = method_ident.unraw().to_string();
            let target = format!("{type_name}::{method_name}");
            let fallible = options.fallible || method_options.fallible;
            let is_constructor = method_options.constructor
                || (!explicit_constructor && method_name == "new");

            let on_instance = match method.sig.receiver() {
                None => false,
                Some(receiver) if receiver.reference.is_some() && receiver.mutability.is_none() => true,
                Some(receiver) => {
                    return Err(syn::Error::new_spanned(
                        receiver,
                        "only `&self` methods can be injected, mark this one #[inject(skip)]",
                    ));
                }
            };
            if on_instance && is_constructor {
                return Err(syn::Error::new_spanned(
                    &method.sig,
                    "a constructor cannot take `self`",
                ));
            }

            let prepared = params::prepare(&krate, param_inputs(&mut method.sig).into_iter())?;

            if on_instance {
                let built = instance_method(
                    &krate,
                    &self_ty,
                    &target,
                    &method_ident,
                    prepared,
                    &method.sig.output,
                    fallible,
                )?;
                members.push(quote!(.with_method(#method_name, #built)));
                continue;
            }

            let built = invocable(
                &krate,
                &target,
                quote!(<#self_ty>::#method_ident),
                prepared,
                &method.sig.output,
                fallible,
            )?;
            if !is_constructor {
                members.push(quote!(.with_static(#method_name, #built)));
            } else if constructor.is_none() {
                constructor = Some(quote!(.with_constructor(#built)));
            } else {
                return Err(syn::Error::new_spanned(
                    &method.sig,
                    "a type has at most one constructor",
                ));
            }
        }
    }

    Ok(quote! {
        #item

        impl #krate::Injectable for #self_ty {
            fn type_spec() -> #krate::TypeSpec {
                #krate::TypeSpec::new::<#self_ty>(#type_name)
                    #constructor
                    #(#members)*
            }
        }

        #krate::inventory::submit! {
            #krate::TypeRegistration::new(#type_name, <#self_ty as #krate::Injectable>::type_spec)
        }
    })
}

fn invocable(
    krate: &TokenStream,
    name: &str,
    callee: TokenStream,
    prepared: PreparedParams,
    output: &ReturnType,
    fallible: bool,
) -> syn::Result<TokenStream> {
    let PreparedParams {
        descriptors,
        bindings,
        idents,
    } = prepared;
    let body = call_body(krate, name, quote!(#callee(#(#idents),*)), output, fallible)?;

    Ok(quote! {
        #krate::Invocable::new(#name, |__args: #krate::Arguments| {
            #(#bindings)*
            #body
        })
        #(#descriptors)*
    })
}

fn instance_method(
    krate: &TokenStream,
    self_ty: &Type,
    name: &str,
    method: &syn::Ident,
    prepared: PreparedParams,
    output: &ReturnType,
    fallible: bool,
) -> syn::Result<TokenStream> {
    let PreparedParams {
        descriptors,
        bindings,
        idents,
    } = prepared;
    let body = call_body(krate, name, quote!(__this.#method(#(#idents),*)), output, fallible)?;

    Ok(quote! {
        #krate::InstanceMethod::new(#name, |__owner: &#krate::Value, __args: #krate::Arguments| {
            let __this = __owner.try_ref::<#self_ty>(#name)?;
            #(#bindings)*
            #body
        })
        #(#descriptors)*
    })
}

/// Calls the real function and wraps what it returns in a `Value`.
fn call_body(
    krate: &TokenStream,
    name: &str,
    call: TokenStream,
    output: &ReturnType,
    fallible: bool,
) -> syn::Result<TokenStream> {
    let call = if fallible {
        quote!(#call.map_err(|err| #krate::TawsilError::construction_failed(#name, err))?)
    } else {
        call
    };

    Ok(match params::output_type(output, fallible)? {
        None => quote! {
            #call;
            ::core::result::Result::Ok(#krate::Value::new(()))
        },
        Some(ty) => {
            let value = params::wrap_value(krate, &ty, quote!(__output));
            quote! {
                let __output = #call;
                ::core::result::Result::Ok(#value)
            }
        }
    })
}

fn typed_inputs(sig: &mut Signature) -> syn::Result<Vec<&mut PatType>> {
    sig.inputs
        .iter_mut()
        .map(|arg| match arg {
            FnArg::Typed(pat) => Ok(pat),
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "methods belong in an #[injectable] impl block",
            )),
        })
        .collect()
}

/// Typed parameters of a method, skipping its receiver.
fn param_inputs(sig: &mut Signature) -> Vec<&mut PatType> {
    sig.inputs
        .iter_mut()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat) => Some(pat),
            FnArg::Receiver(_) => None,
        })
        .collect()
}

fn reject_unsupported(sig: &Signature) -> syn::Result<()> {
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[injectable] does not support async functions",
        ));
    }
    if sig.generics.type_params().next().is_some() || sig.generics.const_params().next().is_some() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[injectable] does not support generic functions",
        ));
    }
    Ok(())
}

fn type_ident(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.unraw().to_string())
            .ok_or_else(|| syn::Error::new_spanned(ty, "empty type path")),
        other => Err(syn::Error::new_spanned(
            other,
            "cannot name this type, use #[injectable(name = \"...\")]",
        )),
    }
}
