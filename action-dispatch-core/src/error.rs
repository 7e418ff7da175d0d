//! Error types for action-dispatch.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`ActionDispatchError`] - Top-level error type; every other error converts into it
//! - [`InvalidActionError`] - The action name is structurally invalid
//! - [`InvalidDimensionError`] - A pattern or context dimension is malformed
//! - [`HandlerNotFoundError`] - Resolution produced no match
//! - [`DuplicateRegistrationError`] - The exact action and scope are already registered
//!
//! Errors raised by handlers themselves never pass through these types: a
//! handler's output is returned to the caller untouched.

use crate::{action::Action, context::Context, context::Scope, dimension::Scalar};
use thiserror::Error;

/// A boxed error type for dynamic error handling in handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all dispatcher operations.
///
/// Never constructed on its own; it only wraps the specific errors below so
/// callers can match broadly or narrowly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionDispatchError {
    /// The action name was rejected.
    #[error(transparent)]
    InvalidAction(#[from] InvalidActionError),

    /// A pattern or context dimension was rejected.
    #[error(transparent)]
    InvalidDimension(#[from] InvalidDimensionError),

    /// No handler matched the action and context.
    #[error(transparent)]
    HandlerNotFound(#[from] HandlerNotFoundError),

    /// The action and scope were already registered.
    #[error(transparent)]
    DuplicateRegistration(#[from] DuplicateRegistrationError),
}

impl ActionDispatchError {
    /// Returns true if this error reports a failed resolution.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ActionDispatchError::HandlerNotFound(_))
    }

    /// Returns true if this error comes from input validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ActionDispatchError::InvalidAction(_) | ActionDispatchError::InvalidDimension(_)
        )
    }
}

/// Errors produced when validating an action name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidActionError {
    /// The action name is empty or only whitespace.
    #[error("action name must not be empty")]
    Empty,

    /// The action name contains a non-printable control character.
    #[error("action name {action:?} contains a control character at byte {position}")]
    ControlCharacter {
        /// The rejected action name.
        action: String,
        /// Byte offset of the first control character.
        position: usize,
    },
}

/// Errors produced when normalizing a pattern or context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDimensionError {
    /// A scoped registration was given no dimensions.
    #[error("pattern must constrain at least one dimension; register a global handler instead")]
    EmptyPattern,

    /// A dimension name is empty or only whitespace.
    #[error("dimension name must not be empty")]
    EmptyName,

    /// A dimension name contains a non-printable control character.
    #[error("dimension name {name:?} contains a control character at byte {position}")]
    ControlCharacter {
        /// The rejected dimension name.
        name: String,
        /// Byte offset of the first control character.
        position: usize,
    },

    /// A value cannot take part in equality matching.
    #[error("dimension '{name}' has a {kind} value, which cannot be matched by equality")]
    UnsupportedValue {
        /// The dimension carrying the value.
        name: String,
        /// Human readable kind of the rejected value.
        kind: &'static str,
    },

    /// The same dimension was supplied twice with different values.
    #[error("dimension '{name}' was given conflicting values {first} and {second}")]
    ConflictingValues {
        /// The repeated dimension.
        name: String,
        /// The value seen first.
        first: Scalar,
        /// The disagreeing value.
        second: Scalar,
    },

    /// A pattern names a dimension the dispatcher does not declare.
    #[error("invalid dimension parameter '{name}', available dimensions: {available:?}")]
    Undeclared {
        /// The undeclared dimension.
        name: String,
        /// Declared dimensions, in declaration order.
        available: Vec<String>,
    },
}

/// Resolution found neither a matching pattern nor a global handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no handler found for action '{action}' with context {context}")]
pub struct HandlerNotFoundError {
    /// The action that failed to resolve.
    pub action: Action,
    /// The normalized context that failed to resolve.
    pub context: Context,
}

/// The exact action and scope already have a handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("handler already registered for action '{action}' with {scope}")]
pub struct DuplicateRegistrationError {
    /// The action of the rejected registration.
    pub action: Action,
    /// The scope of the rejected registration.
    pub scope: Scope,
}
