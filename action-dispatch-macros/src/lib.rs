//! Registration attribute macros for action-dispatch.
//!
//! Both macros leave the annotated function untouched and generate a
//! companion `<name>_route()` function returning an
//! `action_dispatch::Route` ready to be installed into a dispatcher.

use proc_macro::TokenStream;

mod handler;

/// Declares a function as the handler of an action for a pattern.
///
/// ```rust,ignore
/// #[handler("checkout", region = "EU", role = "admin")]
/// fn eu_admin_checkout(ctx: &Context, cents: u64) -> String {
///     format!("EUR {cents} (admin)")
/// }
///
/// dispatcher.install(eu_admin_checkout_route())?;
/// ```
///
/// Dimension names are identifiers or string literals; values are any
/// expression convertible into `action_dispatch::Value`. At least one
/// dimension is required.
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::handler_impl(attr, item, handler::Kind::Scoped)
}

/// Declares a function as the global handler of an action.
///
/// ```rust,ignore
/// #[global_handler("checkout")]
/// fn default_checkout(ctx: &Context, cents: u64) -> String {
///     format!("{cents}")
/// }
/// ```
#[proc_macro_attribute]
pub fn global_handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::handler_impl(attr, item, handler::Kind::Global)
}
