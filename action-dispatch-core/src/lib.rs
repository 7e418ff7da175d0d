//! # action-dispatch-core
//!
//! Core types and traits for the action-dispatch multi-dimensional
//! dispatcher.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! code that defines handlers or alternative resolvers without pulling in
//! the registry and dispatcher from `action-dispatch-std`.
//!
//! # Model
//!
//! - [`Action`]: the name of the operation being dispatched
//! - [`Context`]: the runtime dimensions of a dispatch (`region`, `role`, ...)
//! - [`Pattern`]: a registration-time partial context; a pattern matches
//!   every context that contains all of its dimensions with equal values
//! - [`Scope`]: either [`Scope::Global`] or a pattern
//! - [`Handler`]: the callable invoked for a resolved dispatch
//! - [`Resolver`]: selects the most specific matching registration
//!
//! Raw caller input flows through a [`Normalizer`] which validates dimension
//! names and values before anything reaches matching logic.
//!
//! # Error Types
//!
//! - [`ActionDispatchError`] - Top-level error type
//! - [`InvalidActionError`] - Action validation errors
//! - [`InvalidDimensionError`] - Pattern and context validation errors
//! - [`HandlerNotFoundError`] - Resolution produced no match
//! - [`DuplicateRegistrationError`] - Rejected duplicate registration

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod action;
mod context;
mod dimension;
mod error;
mod handler;
mod normalize;
mod resolution;

// Re-exports
pub use action::Action;
pub use context::{Context, IntoDimensions, Pattern, Scope};
pub use dimension::{DimensionName, Scalar, Value};
pub use error::{
    ActionDispatchError, BoxError, DuplicateRegistrationError, HandlerNotFoundError,
    InvalidActionError, InvalidDimensionError,
};
pub use handler::{BoxHandler, Handler};
pub use normalize::{DimensionSchema, Normalizer};
pub use resolution::{Match, RegistrationId, Resolution, Resolver};
