//! Thread-safe dispatcher.
//!
//! [`Dispatcher`] ties the pieces together: raw input passes through the
//! [`Normalizer`], registrations land in a [`Registry`] behind a read-write
//! lock, and lookups optionally go through an LRU [`cache`](crate::cache).
//!
//! Locks are always taken registry first, cache second. Handlers run after
//! every lock has been released, so a handler may register, unregister or
//! dispatch on the same dispatcher.

use crate::{
    builder::DispatcherBuilder,
    cache::{CacheInfo, DEFAULT_CACHE_MAXSIZE, ResolutionCache},
    registry::{DuplicatePolicy, Registration, RegistrationHandle, Registry},
    route::Route,
};
use action_dispatch_core::{
    Action, ActionDispatchError, BoxHandler, Context, DimensionSchema, Handler,
    HandlerNotFoundError, IntoDimensions, InvalidDimensionError, Normalizer, RegistrationId,
    Resolution, Resolver, Scope,
};
use parking_lot::{Mutex, RwLock};
use std::{fmt, sync::Arc};

/// Construction-time settings of a [`Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatcherConfig {
    /// Declared dimension names. `None` accepts any dimension.
    pub dimensions: Option<Vec<String>>,
    /// Behavior on exact duplicate registrations.
    pub duplicate_policy: DuplicatePolicy,
    /// Resolution cache capacity. `None` leaves the cache disabled.
    pub cache_max_size: Option<usize>,
}

/// The registration selected for a dispatch, detached from the registry.
pub struct Resolved<In, Out> {
    id: RegistrationId,
    scope: Scope,
    handler: BoxHandler<In, Out>,
}

impl<In: 'static, Out: 'static> Resolved<In, Out> {
    /// The registration id.
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// The scope the handler was registered with.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Number of constrained dimensions; 0 for the global registration.
    pub fn specificity(&self) -> usize {
        self.scope.specificity()
    }

    /// Returns true if the global registration was selected.
    pub fn is_global(&self) -> bool {
        self.scope.is_global()
    }

    /// The selected handler.
    pub fn handler(&self) -> &BoxHandler<In, Out> {
        &self.handler
    }

    /// Invoke the selected handler.
    pub fn call(&self, context: &Context, input: In) -> Out {
        self.handler.call(context, input)
    }

    fn from_registration(registration: &Registration<BoxHandler<In, Out>>) -> Self {
        Self {
            id: registration.id(),
            scope: registration.scope().clone(),
            handler: Arc::clone(registration.handler()),
        }
    }
}

impl<In: 'static, Out: 'static> Clone for Resolved<In, Out> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            scope: self.scope.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<In: 'static, Out: 'static> fmt::Debug for Resolved<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

type CachedResolution<In, Out> = Resolution<Resolved<In, Out>>;

/// A multi-dimensional action dispatcher.
///
/// Handlers are registered per action, either globally or for a pattern of
/// dimensions. A dispatch selects the most specific pattern contained in
/// the runtime context, falling back to the global handler.
///
/// `In` is the input passed to handlers on every dispatch and `Out` what
/// they return. The dispatcher is `Sync` and is meant to be shared, for
/// example through an `Arc` or a `static`.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher: Dispatcher<u64, String> = Dispatcher::new();
/// dispatcher.register_global("checkout", |_: &Context, cents: u64| format!("{cents}"))?;
/// dispatcher.register("checkout", [("region", "EU")], |_: &Context, cents: u64| {
///     format!("EUR {cents}")
/// })?;
///
/// let receipt = dispatcher.dispatch("checkout", [("region", "EU"), ("role", "admin")], 100)?;
/// assert_eq!(receipt, "EUR 100");
/// ```
pub struct Dispatcher<In, Out> {
    registry: RwLock<Registry<BoxHandler<In, Out>>>,
    normalizer: Normalizer,
    cache: Mutex<Option<ResolutionCache<CachedResolution<In, Out>>>>,
}

impl<In: 'static, Out: 'static> Default for Dispatcher<In, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: 'static, Out: 'static> Dispatcher<In, Out> {
    /// Create a dispatcher accepting any dimension, rejecting duplicates
    /// and without a cache.
    pub fn new() -> Self {
        Self::from_parts(Normalizer::new(), DuplicatePolicy::default(), None)
    }

    /// Start building a dispatcher.
    pub fn builder() -> DispatcherBuilder<In, Out> {
        DispatcherBuilder::new()
    }

    /// Create a dispatcher restricted to the declared dimension names.
    ///
    /// Patterns using other dimensions are rejected; contexts are projected
    /// onto the declared dimensions before matching.
    pub fn with_dimensions<I, S>(names: I) -> Result<Self, InvalidDimensionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let schema = DimensionSchema::new(names)?;
        Ok(Self::from_parts(
            Normalizer::with_schema(schema),
            DuplicatePolicy::default(),
            None,
        ))
    }

    /// Create a dispatcher from a [`DispatcherConfig`].
    pub fn with_config(config: DispatcherConfig) -> Result<Self, InvalidDimensionError> {
        let normalizer = match config.dimensions {
            Some(names) => Normalizer::with_schema(DimensionSchema::new(names)?),
            None => Normalizer::new(),
        };
        Ok(Self::from_parts(
            normalizer,
            config.duplicate_policy,
            config.cache_max_size,
        ))
    }

    fn from_parts(
        normalizer: Normalizer,
        policy: DuplicatePolicy,
        cache_max_size: Option<usize>,
    ) -> Self {
        Self {
            registry: RwLock::new(Registry::with_policy(policy)),
            normalizer,
            cache: Mutex::new(cache_max_size.map(|max_size| ResolutionCache::new(max_size, 0))),
        }
    }

    /// The declared dimensions, if the dispatcher has a schema.
    pub fn schema(&self) -> Option<&DimensionSchema> {
        self.normalizer.schema()
    }

    /// The duplicate registration policy.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.registry.read().policy()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a handler used when no scoped registration matches.
    pub fn register_global<H>(
        &self,
        action: impl AsRef<str>,
        handler: H,
    ) -> Result<RegistrationHandle, ActionDispatchError>
    where
        H: Handler<In, Output = Out>,
    {
        let action = Action::new(action)?;
        self.insert(action, Scope::Global, Arc::new(handler))
    }

    /// Register a handler for contexts containing every dimension of
    /// `pattern`.
    ///
    /// An empty pattern is rejected; use [`register_global`](Self::register_global).
    pub fn register<H>(
        &self,
        action: impl AsRef<str>,
        pattern: impl IntoDimensions,
        handler: H,
    ) -> Result<RegistrationHandle, ActionDispatchError>
    where
        H: Handler<In, Output = Out>,
    {
        let action = Action::new(action)?;
        let pattern = self.normalizer.normalize_pattern(pattern)?;
        self.insert(action, Scope::Pattern(pattern), Arc::new(handler))
    }

    /// Register a [`Route`].
    pub fn install<H>(&self, route: Route<H>) -> Result<RegistrationHandle, ActionDispatchError>
    where
        H: Handler<In, Output = Out>,
    {
        self.install_boxed(route.map_handler(|handler| Arc::new(handler) as BoxHandler<In, Out>))
    }

    pub(crate) fn install_boxed(
        &self,
        route: Route<BoxHandler<In, Out>>,
    ) -> Result<RegistrationHandle, ActionDispatchError> {
        let (action, dimensions, handler) = route.into_parts();
        let action = Action::new(action)?;
        let scope = match dimensions {
            Some(dimensions) => Scope::Pattern(self.normalizer.normalize_pattern(dimensions)?),
            None => Scope::Global,
        };
        self.insert(action, scope, handler)
    }

    fn insert(
        &self,
        action: Action,
        scope: Scope,
        handler: BoxHandler<In, Out>,
    ) -> Result<RegistrationHandle, ActionDispatchError> {
        let mut registry = self.registry.write();
        let handle = registry.insert_scoped(action, scope, handler)?;
        self.invalidate_cache(registry.generation());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            action = %handle.action(),
            scope = %handle.scope(),
            registration = %handle.id(),
            "registered handler"
        );

        Ok(handle)
    }

    /// Remove a registration. Returns false if it was already removed.
    pub fn unregister(&self, handle: &RegistrationHandle) -> bool {
        let mut registry = self.registry.write();
        let removed = registry.remove(handle).is_some();
        if removed {
            self.invalidate_cache(registry.generation());

            #[cfg(feature = "tracing")]
            tracing::debug!(
                action = %handle.action(),
                scope = %handle.scope(),
                registration = %handle.id(),
                "unregistered handler"
            );
        }
        removed
    }

    // Caller holds the registry write lock.
    fn invalidate_cache(&self, generation: u64) {
        if let Some(cache) = self.cache.lock().as_mut() {
            cache.invalidate(generation);
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Every registration of `action` in registration order, global
    /// included. Empty if the action is unknown.
    pub fn lookup_candidates(
        &self,
        action: impl AsRef<str>,
    ) -> Result<Vec<Registration<BoxHandler<In, Out>>>, ActionDispatchError> {
        let action = Action::new(action)?;
        let registry = self.registry.read();
        Ok(registry
            .candidates(&action)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Select the handler a dispatch would invoke, without invoking it.
    pub fn resolve(
        &self,
        action: impl AsRef<str>,
        context: impl IntoDimensions,
    ) -> Result<Resolution<Resolved<In, Out>>, ActionDispatchError> {
        let action = Action::new(action)?;
        let context = self.normalizer.normalize_context(context)?;
        Ok(self.resolve_normalized(&action, &context))
    }

    /// Every registration matching the context, best first. The global
    /// registration, if any, comes last.
    pub fn matching(
        &self,
        action: impl AsRef<str>,
        context: impl IntoDimensions,
    ) -> Result<Vec<Resolved<In, Out>>, ActionDispatchError> {
        let action = Action::new(action)?;
        let context = self.normalizer.normalize_context(context)?;
        let registry = self.registry.read();
        Ok(registry
            .rank(&action, &context)
            .into_iter()
            .map(Resolved::from_registration)
            .collect())
    }

    fn resolve_normalized(&self, action: &Action, context: &Context) -> CachedResolution<In, Out> {
        if let Some(cache) = self.cache.lock().as_mut() {
            if let Some(cached) = cache.get(action, context) {
                #[cfg(feature = "tracing")]
                tracing::trace!(%action, %context, "resolution cache hit");
                return cached;
            }
        }

        let (resolution, generation) = {
            let registry = self.registry.read();
            let resolution = registry.resolve(action, context).map(|m| Resolved {
                id: m.id,
                scope: m.scope.clone(),
                handler: Arc::clone(m.handler),
            });
            (resolution, registry.generation())
        };

        if let Some(cache) = self.cache.lock().as_mut() {
            cache.insert(action.clone(), context.clone(), resolution.clone(), generation);
        }
        resolution
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Resolve and invoke the handler for `action` in `context`.
    ///
    /// The handler's output is returned unchanged, including a handler's
    /// own `Err`. Fails with [`ActionDispatchError::HandlerNotFound`] when
    /// neither a scoped nor a global registration matches.
    pub fn dispatch(
        &self,
        action: impl AsRef<str>,
        context: impl IntoDimensions,
        input: In,
    ) -> Result<Out, ActionDispatchError> {
        let action = Action::new(action)?;
        let context = self.normalizer.normalize_context(context)?;

        match self.resolve_normalized(&action, &context) {
            Resolution::Matched(resolved) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    %action,
                    %context,
                    registration = %resolved.id(),
                    scope = %resolved.scope(),
                    "dispatching"
                );
                Ok(resolved.call(&context, input))
            }
            Resolution::NotFound => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%action, %context, "no handler found");
                Err(HandlerNotFoundError { action, context }.into())
            }
        }
    }

    // ------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------

    /// Enable the resolution cache, replacing any existing one.
    ///
    /// `None` uses [`DEFAULT_CACHE_MAXSIZE`]. A size of 0 keeps statistics
    /// but caches nothing.
    pub fn enable_cache(&self, max_size: Option<usize>) {
        let max_size = max_size.unwrap_or(DEFAULT_CACHE_MAXSIZE);
        let registry = self.registry.read();
        *self.cache.lock() = Some(ResolutionCache::new(max_size, registry.generation()));

        #[cfg(feature = "tracing")]
        tracing::debug!(max_size, "resolution cache enabled");
    }

    /// Disable the resolution cache and drop its contents.
    pub fn disable_cache(&self) {
        *self.cache.lock() = None;
    }

    /// Drop cached resolutions and reset statistics. No-op when disabled.
    pub fn clear_cache(&self) {
        if let Some(cache) = self.cache.lock().as_mut() {
            cache.clear();
        }
    }

    /// Returns true if the resolution cache is enabled.
    pub fn is_cache_enabled(&self) -> bool {
        self.cache.lock().is_some()
    }

    /// Cache statistics, or `None` when the cache is disabled.
    pub fn cache_info(&self) -> Option<CacheInfo> {
        self.cache.lock().as_ref().map(ResolutionCache::info)
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Registered actions, sorted by name.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.registry.read().actions().cloned().collect();
        actions.sort();
        actions
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }
}

impl<In: 'static, Out: 'static> fmt::Debug for Dispatcher<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("actions", &self.actions())
            .field("registrations", &self.len())
            .field("schema", &self.schema())
            .field("cache", &self.cache_info())
            .finish()
    }
}
