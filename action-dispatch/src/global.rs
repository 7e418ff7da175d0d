//! Process-wide default dispatcher.
//!
//! Explicit [`Dispatcher`] instances are the primary API. The default
//! dispatcher is a convenience for applications that want a single
//! registry without threading a value around; it carries dynamic
//! [`Value`] arguments so handlers of any shape can share it.

use action_dispatch_core::{
    ActionDispatchError, BoxError, Handler, IntoDimensions, Resolution, Value,
};
use action_dispatch_std::{
    dispatcher::{Dispatcher, Resolved},
    registry::RegistrationHandle,
};
use once_cell::sync::Lazy;

/// Positional arguments passed to default dispatcher handlers.
pub type Args = Vec<Value>;

/// What default dispatcher handlers return.
pub type Reply = Result<Value, BoxError>;

/// The type of the default dispatcher.
pub type DynamicDispatcher = Dispatcher<Args, Reply>;

static GLOBAL: Lazy<DynamicDispatcher> = Lazy::new(DynamicDispatcher::new);

/// The process-wide default dispatcher, created on first use.
pub fn global() -> &'static DynamicDispatcher {
    &GLOBAL
}

/// [`Dispatcher::register`] on the default dispatcher.
pub fn register<H>(
    action: impl AsRef<str>,
    pattern: impl IntoDimensions,
    handler: H,
) -> Result<RegistrationHandle, ActionDispatchError>
where
    H: Handler<Args, Output = Reply>,
{
    global().register(action, pattern, handler)
}

/// [`Dispatcher::register_global`] on the default dispatcher.
pub fn register_global<H>(
    action: impl AsRef<str>,
    handler: H,
) -> Result<RegistrationHandle, ActionDispatchError>
where
    H: Handler<Args, Output = Reply>,
{
    global().register_global(action, handler)
}

/// [`Dispatcher::dispatch`] on the default dispatcher.
pub fn dispatch(
    action: impl AsRef<str>,
    context: impl IntoDimensions,
    args: Args,
) -> Result<Reply, ActionDispatchError> {
    global().dispatch(action, context, args)
}

/// [`Dispatcher::resolve`] on the default dispatcher.
pub fn resolve(
    action: impl AsRef<str>,
    context: impl IntoDimensions,
) -> Result<Resolution<Resolved<Args, Reply>>, ActionDispatchError> {
    global().resolve(action, context)
}

/// Declares a lazily-initialized dispatcher static.
///
/// # Example
/// ```rust,ignore
/// action_dispatch::global_dispatcher! {
///     pub static PAYMENTS: Dispatcher<u64, String>;
/// }
///
/// action_dispatch::global_dispatcher! {
///     static ROUTED: Dispatcher<u64, String> = Dispatcher::builder()
///         .dimensions(["region"])
///         .build()
///         .expect("valid dispatcher");
/// }
/// ```
#[macro_export]
macro_rules! global_dispatcher {
    ($(#[$meta:meta])* $vis:vis static $name:ident: Dispatcher<$in:ty, $out:ty>;) => {
        $(#[$meta])*
        $vis static $name: $crate::once_cell::sync::Lazy<$crate::Dispatcher<$in, $out>> =
            $crate::once_cell::sync::Lazy::new($crate::Dispatcher::new);
    };
    ($(#[$meta:meta])* $vis:vis static $name:ident: Dispatcher<$in:ty, $out:ty> = $init:expr;) => {
        $(#[$meta])*
        $vis static $name: $crate::once_cell::sync::Lazy<$crate::Dispatcher<$in, $out>> =
            $crate::once_cell::sync::Lazy::new(|| $init);
    };
}
