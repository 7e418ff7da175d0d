//! Deferred registrations.
//!
//! A [`Route`] bundles an action, an optional pattern and a handler without
//! validating anything. Validation happens when the route is installed into
//! a dispatcher, so routes can be built in `const`-like generated code and
//! collected ahead of time.

use action_dispatch_core::{IntoDimensions, Value};
use std::fmt;

/// An action, an optional pattern and a handler awaiting registration.
pub struct Route<H> {
    action: String,
    dimensions: Option<Vec<(String, Value)>>,
    handler: H,
}

impl<H> Route<H> {
    /// A route for contexts matching `dimensions`.
    pub fn scoped(action: impl Into<String>, dimensions: impl IntoDimensions, handler: H) -> Self {
        Self {
            action: action.into(),
            dimensions: Some(dimensions.into_dimensions()),
            handler,
        }
    }

    /// A route applying to every context of `action`.
    pub fn global(action: impl Into<String>, handler: H) -> Self {
        Self {
            action: action.into(),
            dimensions: None,
            handler,
        }
    }

    /// The raw action name.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Raw pattern dimensions; `None` for global routes.
    pub fn dimensions(&self) -> Option<&[(String, Value)]> {
        self.dimensions.as_deref()
    }

    /// Returns true for global routes.
    pub fn is_global(&self) -> bool {
        self.dimensions.is_none()
    }

    /// The handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Replace the handler, keeping action and pattern.
    pub fn map_handler<G>(self, f: impl FnOnce(H) -> G) -> Route<G> {
        Route {
            action: self.action,
            dimensions: self.dimensions,
            handler: f(self.handler),
        }
    }

    pub(crate) fn into_parts(self) -> (String, Option<Vec<(String, Value)>>, H) {
        (self.action, self.dimensions, self.handler)
    }
}

impl<H> fmt::Debug for Route<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("action", &self.action)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}
