//! Builder for [`Dispatcher`].

use crate::{
    cache::DEFAULT_CACHE_MAXSIZE,
    dispatcher::{Dispatcher, DispatcherConfig},
    registry::DuplicatePolicy,
    route::Route,
};
use action_dispatch_core::{ActionDispatchError, BoxHandler, Handler, IntoDimensions};
use std::sync::Arc;

/// Builder for a [`Dispatcher`] with its initial registrations.
///
/// Registrations are validated in [`build`](Self::build), in the order they
/// were added; the first invalid one aborts the build.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::builder()
///     .dimensions(["region", "role"])
///     .cache(128)
///     .global_handler("checkout", |_: &Context, cents: u64| cents)
///     .handler("checkout", [("region", "EU")], |_: &Context, cents: u64| cents * 2)
///     .build()?;
/// ```
pub struct DispatcherBuilder<In, Out> {
    config: DispatcherConfig,
    routes: Vec<Route<BoxHandler<In, Out>>>,
}

impl<In: 'static, Out: 'static> Default for DispatcherBuilder<In, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: 'static, Out: 'static> DispatcherBuilder<In, Out> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            routes: Vec::new(),
        }
    }

    /// Start from an existing configuration.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            config,
            routes: Vec::new(),
        }
    }

    /// Restrict the dispatcher to the declared dimension names.
    pub fn dimensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.dimensions = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the duplicate registration policy.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    /// Enable the resolution cache with the given capacity.
    pub fn cache(mut self, max_size: usize) -> Self {
        self.config.cache_max_size = Some(max_size);
        self
    }

    /// Enable the resolution cache with [`DEFAULT_CACHE_MAXSIZE`].
    pub fn default_cache(self) -> Self {
        self.cache(DEFAULT_CACHE_MAXSIZE)
    }

    /// Add a scoped handler.
    pub fn handler<H>(
        self,
        action: impl Into<String>,
        pattern: impl IntoDimensions,
        handler: H,
    ) -> Self
    where
        H: Handler<In, Output = Out>,
    {
        self.route(Route::scoped(action, pattern, handler))
    }

    /// Add a global handler.
    pub fn global_handler<H>(self, action: impl Into<String>, handler: H) -> Self
    where
        H: Handler<In, Output = Out>,
    {
        self.route(Route::global(action, handler))
    }

    /// Add a [`Route`].
    pub fn route<H>(mut self, route: Route<H>) -> Self
    where
        H: Handler<In, Output = Out>,
    {
        self.routes
            .push(route.map_handler(|handler| Arc::new(handler) as BoxHandler<In, Out>));
        self
    }

    /// Add several routes.
    pub fn routes<H, I>(self, routes: I) -> Self
    where
        H: Handler<In, Output = Out>,
        I: IntoIterator<Item = Route<H>>,
    {
        routes.into_iter().fold(self, Self::route)
    }

    /// Number of pending registrations.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no registration was added.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Validate the configuration and every registration.
    pub fn build(self) -> Result<Dispatcher<In, Out>, ActionDispatchError> {
        let dispatcher = Dispatcher::with_config(self.config)?;
        for route in self.routes {
            dispatcher.install_boxed(route)?;
        }
        Ok(dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_dispatch_core::{Context, InvalidDimensionError};

    #[test]
    fn test_build_registers_in_order() {
        let dispatcher = Dispatcher::builder()
            .global_handler("checkout", |_: &Context, n: i32| n)
            .handler("checkout", [("region", "EU")], |_: &Context, n: i32| -n)
            .build()
            .unwrap();

        assert_eq!(dispatcher.len(), 2);
        assert_eq!(dispatcher.dispatch("checkout", [("region", "EU")], 3).unwrap(), -3);
        assert_eq!(dispatcher.dispatch("checkout", [("region", "US")], 3).unwrap(), 3);
        assert!(!dispatcher.is_cache_enabled());
    }

    #[test]
    fn test_build_fails_on_undeclared_dimension() {
        let err = Dispatcher::builder()
            .dimensions(["region"])
            .handler("checkout", [("tier", "gold")], |_: &Context, (): ()| ())
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            ActionDispatchError::InvalidDimension(InvalidDimensionError::Undeclared {
                name: "tier".to_string(),
                available: vec!["region".to_string()],
            })
        );
    }

    #[test]
    fn test_build_with_cache_and_replace_policy() {
        let dispatcher = Dispatcher::builder()
            .default_cache()
            .duplicate_policy(DuplicatePolicy::Replace)
            .global_handler("ping", |_: &Context, (): ()| "first")
            .global_handler("ping", |_: &Context, (): ()| "second")
            .build()
            .unwrap();

        assert_eq!(dispatcher.len(), 1);
        assert_eq!(dispatcher.dispatch("ping", (), ()).unwrap(), "second");
        assert_eq!(
            dispatcher.cache_info().map(|info| info.max_size),
            Some(DEFAULT_CACHE_MAXSIZE)
        );
    }
}
