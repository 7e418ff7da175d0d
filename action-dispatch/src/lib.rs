//! # action-dispatch - Multi-Dimensional Action Dispatcher
//!
//! `action-dispatch` routes a named action to a handler chosen by the
//! runtime context it is dispatched in. Handlers are registered either
//! globally or for a pattern of dimensions (`region = "EU"`,
//! `role = "admin"`, ...); a dispatch selects the most specific pattern
//! contained in the context and falls back to the global handler.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use action_dispatch::prelude::*;
//!
//! let dispatcher: Dispatcher<u64, String> = Dispatcher::new();
//! dispatcher.register_global("checkout", |_: &Context, cents: u64| format!("USD {cents}"))?;
//! dispatcher.register("checkout", [("region", "EU")], |_: &Context, cents: u64| {
//!     format!("EUR {cents}")
//! })?;
//!
//! let receipt = dispatcher.dispatch("checkout", [("region", "EU"), ("role", "guest")], 250)?;
//! assert_eq!(receipt, "EUR 250");
//! ```
//!
//! ## Attribute Macros
//!
//! With the `macros` feature (default), handlers can be declared next to
//! their implementation:
//!
//! ```rust,ignore
//! #[action_dispatch::handler("checkout", region = "EU")]
//! fn eu_checkout(ctx: &Context, cents: u64) -> String {
//!     format!("EUR {cents}")
//! }
//!
//! dispatcher.install(eu_checkout_route())?;
//! ```
//!
//! ## Features
//!
//! - `macros` (default): `#[handler]` and `#[global_handler]`
//! - `tracing`: `tracing` events on registration and dispatch, and spans
//!   from [`hooks::TracingHandler`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod global;

pub use action_dispatch_core::{
    // Model
    Action,
    // Errors
    ActionDispatchError,
    BoxError,
    // Handler
    BoxHandler,
    Context,
    DimensionName,
    DimensionSchema,
    DuplicateRegistrationError,
    Handler,
    HandlerNotFoundError,
    IntoDimensions,
    InvalidActionError,
    InvalidDimensionError,
    // Resolution
    Match,
    Normalizer,
    Pattern,
    RegistrationId,
    Resolution,
    Resolver,
    Scalar,
    Scope,
    Value,
};

pub use action_dispatch_std::{
    builder::DispatcherBuilder,
    cache::{CacheInfo, DEFAULT_CACHE_MAXSIZE},
    dispatcher::{Dispatcher, DispatcherConfig, Resolved},
    registry::{DuplicatePolicy, Registration, RegistrationHandle, Registry},
    route::Route,
};

pub use global::{
    Args, DynamicDispatcher, Reply, dispatch, global, register, register_global, resolve,
};

/// Handler wrappers.
pub mod hooks {
    pub use action_dispatch_std::hooks::TracingHandler;
}

/// Testing utilities.
pub mod testing {
    pub use action_dispatch_std::testing::{CountingHandler, RecordingHandler};
}

/// Prelude module - common imports for action-dispatch.
///
/// # Usage
///
/// ```rust,ignore
/// use action_dispatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Action, ActionDispatchError, BoxError, Context, Dispatcher, DispatcherBuilder,
        DuplicatePolicy, Handler, Pattern, Resolution, Route, Scope, Value,
    };

    #[cfg(feature = "macros")]
    pub use crate::{global_handler, handler};
}

#[cfg(feature = "macros")]
pub use action_dispatch_macros::{global_handler, handler};

#[doc(hidden)]
pub use once_cell;
