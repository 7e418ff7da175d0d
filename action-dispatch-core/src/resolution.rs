//! # Resolution
//!
//! A [`Resolver`] maps a runtime `(action, context)` pair to the single best
//! registered handler. Resolvers never fail for a missing handler: they
//! return [`Resolution::NotFound`] and leave it to the caller to decide
//! whether that is an error.

use crate::{action::Action, context::Context, context::Scope};
use std::fmt;

/// Identifies a registration. Ids increase with every registration, so
/// ordering by id is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistrationId(u64);

impl RegistrationId {
    /// Wrap a raw sequence number.
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// The raw sequence number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<M> {
    /// A registration matched.
    Matched(M),
    /// Neither a scoped nor a global registration matched.
    NotFound,
}

impl<M> Resolution<M> {
    /// Returns true if a registration matched.
    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched(_))
    }

    /// Returns the match, if any.
    pub fn matched(self) -> Option<M> {
        match self {
            Resolution::Matched(m) => Some(m),
            Resolution::NotFound => None,
        }
    }

    /// Borrow the match.
    pub fn as_ref(&self) -> Resolution<&M> {
        match self {
            Resolution::Matched(m) => Resolution::Matched(m),
            Resolution::NotFound => Resolution::NotFound,
        }
    }

    /// Transform the match.
    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> Resolution<N> {
        match self {
            Resolution::Matched(m) => Resolution::Matched(f(m)),
            Resolution::NotFound => Resolution::NotFound,
        }
    }
}

impl<M> From<Option<M>> for Resolution<M> {
    fn from(value: Option<M>) -> Self {
        match value {
            Some(m) => Resolution::Matched(m),
            None => Resolution::NotFound,
        }
    }
}

/// A borrowed view of the registration selected by a [`Resolver`].
#[derive(Debug)]
pub struct Match<'a, H> {
    /// The selected registration.
    pub id: RegistrationId,
    /// The scope it was registered with.
    pub scope: &'a Scope,
    /// The registered handler.
    pub handler: &'a H,
}

impl<H> Clone for Match<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Match<'_, H> {}

impl<H> Match<'_, H> {
    /// Number of constrained dimensions of the matched scope.
    pub fn specificity(&self) -> usize {
        self.scope.specificity()
    }
}

/// Selects the most specific registration for an action and context.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot resolve handlers of type `{H}`",
    label = "missing `Resolver<{H}>` implementation"
)]
pub trait Resolver<H>: Send + Sync {
    /// Resolve `action` against an already normalized `context`.
    fn resolve<'a>(&'a self, action: &Action, context: &Context) -> Resolution<Match<'a, H>>;

    /// Returns true if `resolve` would find a registration.
    fn contains(&self, action: &Action, context: &Context) -> bool {
        self.resolve(action, context).is_matched()
    }
}
