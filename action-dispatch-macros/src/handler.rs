//! Implementation of `#[handler]` and `#[global_handler]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Expr, FnArg, Ident, ItemFn, LitStr, ReturnType, Token, Type,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Scoped,
    Global,
}

/// One `name = value` pair of a pattern.
struct Dimension {
    name: LitStr,
    value: Expr,
}

impl Parse for Dimension {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = if input.peek(LitStr) {
            input.parse::<LitStr>()?
        } else {
            let ident = Ident::parse_any(input)?.unraw();
            LitStr::new(&ident.to_string(), ident.span())
        };
        input.parse::<Token![=]>()?;
        let value: Expr = input.parse()?;
        Ok(Dimension { name, value })
    }
}

/// Arguments: the action name followed by the pattern dimensions.
struct HandlerArgs {
    action: LitStr,
    dimensions: Vec<Dimension>,
}

impl Parse for HandlerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Err(input.error("expected the action name as a string literal"));
        }
        let action: LitStr = input.parse()?;
        if action.value().trim().is_empty() {
            return Err(syn::Error::new(action.span(), "action name must not be empty"));
        }

        let mut dimensions: Vec<Dimension> = Vec::new();
        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let dimension: Dimension = input.parse()?;
            if dimensions
                .iter()
                .any(|d| d.name.value() == dimension.name.value())
            {
                return Err(syn::Error::new(
                    dimension.name.span(),
                    format!("dimension `{}` given more than once", dimension.name.value()),
                ));
            }
            dimensions.push(dimension);
        }

        Ok(HandlerArgs { action, dimensions })
    }
}

fn validate(input: &ItemFn) -> syn::Result<(&Type, &Type)> {
    let sig = &input.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "handler functions must be synchronous",
        ));
    }
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "handler functions must not be generic",
        ));
    }

    let mut typed = Vec::with_capacity(2);
    for arg in &sig.inputs {
        match arg {
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "handler functions must be free functions",
                ));
            }
            FnArg::Typed(pat_type) => typed.push(&*pat_type.ty),
        }
    }

    let &[context_ty, input_ty] = typed.as_slice() else {
        return Err(syn::Error::new_spanned(
            &sig.inputs,
            "handler functions must take exactly two arguments: fn(ctx: &Context, input: In)",
        ));
    };
    if !matches!(context_ty, Type::Reference(r) if r.mutability.is_none()) {
        return Err(syn::Error::new_spanned(
            context_ty,
            "the first argument must be a shared reference to the context (&Context)",
        ));
    }
    Ok((context_ty, input_ty))
}

/// Shared implementation of both attribute macros.
pub(crate) fn handler_impl(attr: TokenStream, item: TokenStream, kind: Kind) -> TokenStream {
    let args = parse_macro_input!(attr as HandlerArgs);
    let input = parse_macro_input!(item as ItemFn);

    match expand(&args, &input, kind) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: &HandlerArgs, input: &ItemFn, kind: Kind) -> syn::Result<TokenStream2> {
    let (context_ty, input_ty) = validate(input)?;

    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let route_fn = format_ident!("{}_route", fn_name.unraw());
    let action = &args.action;

    let output_ty = match &input.sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };
    let fn_ptr = quote! { fn(#context_ty, #input_ty) -> #output_ty };

    let route = match kind {
        Kind::Global => {
            if let Some(first) = args.dimensions.first() {
                return Err(syn::Error::new(
                    first.name.span(),
                    "#[global_handler] takes no dimensions; use #[handler] for a pattern",
                ));
            }
            quote! {
                ::action_dispatch::Route::global(#action, #fn_name as #fn_ptr)
            }
        }
        Kind::Scoped => {
            if args.dimensions.is_empty() {
                return Err(syn::Error::new(
                    action.span(),
                    "#[handler] needs at least one dimension; use #[global_handler] instead",
                ));
            }
            let names = args.dimensions.iter().map(|d| &d.name);
            let values = args.dimensions.iter().map(|d| &d.value);
            quote! {
                ::action_dispatch::Route::scoped(
                    #action,
                    ::std::vec![
                        #((
                            ::std::string::String::from(#names),
                            ::action_dispatch::Value::from(#values),
                        )),*
                    ],
                    #fn_name as #fn_ptr,
                )
            }
        }
    };

    Ok(quote! {
        #input

        #[doc = concat!("Registration route for `", stringify!(#fn_name), "`.")]
        #fn_vis fn #route_fn() -> ::action_dispatch::Route<#fn_ptr> {
            #route
        }
    })
}
