//! Registry of handlers keyed by action and scope.
//!
//! Each action owns a bucket holding at most one global registration plus
//! scoped registrations grouped by specificity. Within a specificity group
//! registrations keep insertion order, which is what makes tie-breaking
//! deterministic.

use action_dispatch_core::{
    Action, DuplicateRegistrationError, Pattern, RegistrationId, Scope,
};
use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap},
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Source of process-unique registry ids.
static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(0);

/// What to do when the exact action and scope are registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`DuplicateRegistrationError`] (default).
    #[default]
    Reject,
    /// Swap the handler in place. The registration keeps its id and so its
    /// tie-break position.
    Replace,
}

/// A handler stored under an action and scope.
#[derive(Clone)]
pub struct Registration<H> {
    registry: u64,
    id: RegistrationId,
    action: Action,
    scope: Scope,
    handler: H,
}

impl<H> Registration<H> {
    /// The registration id.
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// The registered action.
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The registered scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The pattern, unless this is a global registration.
    pub fn pattern(&self) -> Option<&Pattern> {
        self.scope.pattern()
    }

    /// Number of constrained dimensions; 0 for global registrations.
    pub fn specificity(&self) -> usize {
        self.scope.specificity()
    }

    /// Returns true for global registrations.
    pub fn is_global(&self) -> bool {
        self.scope.is_global()
    }

    /// The stored handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// A handle identifying this registration.
    pub fn handle(&self) -> RegistrationHandle {
        RegistrationHandle {
            registry: self.registry,
            id: self.id,
            action: self.action.clone(),
            scope: self.scope.clone(),
        }
    }
}

impl<H> fmt::Debug for Registration<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("action", &self.action)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Opaque handle returned by registration calls; used to unregister.
///
/// A handle only refers to registrations of the registry that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrationHandle {
    registry: u64,
    id: RegistrationId,
    action: Action,
    scope: Scope,
}

impl RegistrationHandle {
    /// The registration id.
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// The registered action.
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The registered scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

/// All registrations of a single action.
pub(crate) struct ActionBucket<H> {
    pub(crate) global: Option<Registration<H>>,
    /// Scoped registrations, most specific first.
    pub(crate) tiers: BTreeMap<Reverse<usize>, Vec<Registration<H>>>,
}

impl<H> ActionBucket<H> {
    fn new() -> Self {
        Self {
            global: None,
            tiers: BTreeMap::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.global.is_none() && self.tiers.is_empty()
    }

    fn len(&self) -> usize {
        usize::from(self.global.is_some()) + self.tiers.values().map(Vec::len).sum::<usize>()
    }

    fn iter(&self) -> impl Iterator<Item = &Registration<H>> {
        self.global.iter().chain(self.tiers.values().flatten())
    }
}

/// Handler storage for a dispatcher.
///
/// The registry is a plain data structure; the dispatcher wraps it in a lock.
/// It is generic over the stored handler so any value can be registered.
///
/// # Example
/// ```ignore
/// let mut registry = Registry::new();
/// let eu = Pattern::from_dimensions([("region", "EU")])?;
/// registry.insert(Action::new("checkout")?, eu, "eu")?;
/// registry.insert_global(Action::new("checkout")?, "default")?;
/// ```
pub struct Registry<H> {
    instance: u64,
    buckets: HashMap<Action, ActionBucket<H>>,
    policy: DuplicatePolicy,
    next_id: u64,
    generation: u64,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Registry<H> {
    /// Create an empty registry that rejects duplicates.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    /// Create an empty registry with the given duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            instance: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            buckets: HashMap::new(),
            policy,
            next_id: 0,
            generation: 0,
        }
    }

    /// The duplicate policy.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register a handler that applies to every context of `action`.
    pub fn insert_global(
        &mut self,
        action: Action,
        handler: H,
    ) -> Result<RegistrationHandle, DuplicateRegistrationError> {
        self.insert_scoped(action, Scope::Global, handler)
    }

    /// Register a handler for contexts matching `pattern`.
    pub fn insert(
        &mut self,
        action: Action,
        pattern: Pattern,
        handler: H,
    ) -> Result<RegistrationHandle, DuplicateRegistrationError> {
        self.insert_scoped(action, Scope::Pattern(pattern), handler)
    }

    /// Register a handler under an explicit scope.
    pub fn insert_scoped(
        &mut self,
        action: Action,
        scope: Scope,
        handler: H,
    ) -> Result<RegistrationHandle, DuplicateRegistrationError> {
        let policy = self.policy;
        let instance = self.instance;
        let next_id = RegistrationId::new(self.next_id);
        let bucket = self
            .buckets
            .entry(action.clone())
            .or_insert_with(ActionBucket::new);

        let slot = match &scope {
            Scope::Global => bucket.global.as_mut(),
            Scope::Pattern(pattern) => bucket
                .tiers
                .get_mut(&Reverse(pattern.specificity()))
                .and_then(|tier| tier.iter_mut().find(|r| r.scope == scope)),
        };

        if let Some(existing) = slot {
            return match policy {
                DuplicatePolicy::Reject => Err(DuplicateRegistrationError { action, scope }),
                DuplicatePolicy::Replace => {
                    existing.handler = handler;
                    let handle = existing.handle();
                    self.generation += 1;
                    Ok(handle)
                }
            };
        }

        let registration = Registration {
            registry: instance,
            id: next_id,
            action,
            scope,
            handler,
        };
        let handle = registration.handle();
        let specificity = registration.specificity();
        if registration.is_global() {
            bucket.global = Some(registration);
        } else {
            bucket
                .tiers
                .entry(Reverse(specificity))
                .or_default()
                .push(registration);
        }
        self.next_id += 1;
        self.generation += 1;
        Ok(handle)
    }

    /// Remove the registration identified by `handle`.
    ///
    /// Returns `None` if it was already removed or was issued by another
    /// registry.
    pub fn remove(&mut self, handle: &RegistrationHandle) -> Option<Registration<H>> {
        if handle.registry != self.instance {
            return None;
        }
        let bucket = self.buckets.get_mut(&handle.action)?;
        let removed = match &handle.scope {
            Scope::Global => {
                if bucket.global.as_ref().is_some_and(|r| r.id == handle.id) {
                    bucket.global.take()
                } else {
                    None
                }
            }
            Scope::Pattern(pattern) => {
                let key = Reverse(pattern.specificity());
                let tier = bucket.tiers.get_mut(&key)?;
                let index = tier.iter().position(|r| r.id == handle.id)?;
                let registration = tier.remove(index);
                if tier.is_empty() {
                    bucket.tiers.remove(&key);
                }
                Some(registration)
            }
        };
        if bucket.is_empty() {
            self.buckets.remove(&handle.action);
        }
        if removed.is_some() {
            self.generation += 1;
        }
        removed
    }

    /// All registrations of `action` in insertion order, global included.
    ///
    /// Empty if the action was never registered.
    pub fn candidates(&self, action: &Action) -> Vec<&Registration<H>> {
        let Some(bucket) = self.buckets.get(action) else {
            return Vec::new();
        };
        let mut candidates: Vec<_> = bucket.iter().collect();
        candidates.sort_by_key(|r| r.id);
        candidates
    }

    pub(crate) fn bucket(&self, action: &Action) -> Option<&ActionBucket<H>> {
        self.buckets.get(action)
    }

    /// Returns true if `action` has at least one registration.
    pub fn contains_action(&self, action: &Action) -> bool {
        self.buckets.contains_key(action)
    }

    /// Registered actions, in no particular order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.buckets.keys()
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.buckets.values().map(ActionBucket::len).sum()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Counter bumped by every mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(name: &str) -> Action {
        Action::new(name).unwrap()
    }

    fn pattern(pairs: &[(&str, &str)]) -> Pattern {
        Pattern::from_dimensions(pairs.to_vec()).unwrap()
    }

    #[test]
    fn test_candidates_in_insertion_order() {
        let mut registry = Registry::new();
        registry
            .insert(action("checkout"), pattern(&[("region", "EU"), ("role", "admin")]), 1)
            .unwrap();
        registry.insert_global(action("checkout"), 2).unwrap();
        registry
            .insert(action("checkout"), pattern(&[("region", "EU")]), 3)
            .unwrap();

        let handlers: Vec<i32> = registry
            .candidates(&action("checkout"))
            .into_iter()
            .map(|r| *r.handler())
            .collect();
        assert_eq!(handlers, vec![1, 2, 3]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_unknown_action_has_no_candidates() {
        let registry: Registry<i32> = Registry::new();
        assert!(registry.candidates(&action("refund")).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let mut registry = Registry::new();
        registry
            .insert(action("checkout"), pattern(&[("region", "EU")]), 1)
            .unwrap();
        let err = registry
            .insert(action("checkout"), pattern(&[("region", "EU")]), 2)
            .unwrap_err();
        assert_eq!(err.action, action("checkout"));
        assert_eq!(err.scope, Scope::Pattern(pattern(&[("region", "EU")])));

        registry.insert_global(action("checkout"), 3).unwrap();
        assert!(registry.insert_global(action("checkout"), 4).is_err());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_replaced_in_place() {
        let mut registry = Registry::with_policy(DuplicatePolicy::Replace);
        let first = registry
            .insert(action("checkout"), pattern(&[("region", "EU")]), 1)
            .unwrap();
        registry
            .insert(action("checkout"), pattern(&[("tier", "gold")]), 2)
            .unwrap();
        let replaced = registry
            .insert(action("checkout"), pattern(&[("region", "EU")]), 10)
            .unwrap();

        assert_eq!(first.id(), replaced.id());
        let handlers: Vec<i32> = registry
            .candidates(&action("checkout"))
            .into_iter()
            .map(|r| *r.handler())
            .collect();
        assert_eq!(handlers, vec![10, 2]);
    }

    #[test]
    fn test_remove() {
        let mut registry = Registry::new();
        let scoped = registry
            .insert(action("checkout"), pattern(&[("region", "EU")]), 1)
            .unwrap();
        let global = registry.insert_global(action("checkout"), 2).unwrap();
        let generation = registry.generation();

        assert_eq!(registry.remove(&scoped).map(|r| *r.handler()), Some(1));
        assert!(registry.remove(&scoped).is_none());
        assert!(registry.generation() > generation);
        assert!(registry.contains_action(&action("checkout")));

        assert!(registry.remove(&global).is_some());
        assert!(!registry.contains_action(&action("checkout")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stale_global_handle_does_not_remove_replacement() {
        let mut registry = Registry::new();
        let old = registry.insert_global(action("ping"), 1).unwrap();
        registry.remove(&old);
        registry.insert_global(action("ping"), 2).unwrap();

        assert!(registry.remove(&old).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_handle_from_other_registry_is_ignored() {
        let mut first = Registry::new();
        let mut second = Registry::new();
        let handle = first.insert_global(action("checkout"), 1).unwrap();
        let twin = second.insert_global(action("checkout"), 2).unwrap();
        assert_eq!(handle.id(), twin.id());

        let generation = second.generation();
        assert!(second.remove(&handle).is_none());
        assert_eq!(second.len(), 1);
        assert_eq!(second.generation(), generation);

        assert!(first.remove(&handle).is_some());
    }
}
