//! Specificity-ranked resolution over a [`Registry`].
//!
//! This is longest-prefix matching generalized to unordered dimension sets:
//! the number of constrained dimensions plays the role of prefix length and
//! the subset test replaces prefix equality.
//!
//! 1. Scoped registrations are visited most specific first.
//! 2. Within one specificity, the earliest registration wins.
//! 3. If no scoped pattern matches, the global registration is used.
//! 4. Otherwise the outcome is [`Resolution::NotFound`].

use crate::registry::{Registration, Registry};
use action_dispatch_core::{Action, Context, Match, Resolution, Resolver};

impl<H> Registry<H> {
    /// The registration `resolve` selects, if any.
    pub fn best_match(&self, action: &Action, context: &Context) -> Option<&Registration<H>> {
        let bucket = self.bucket(action)?;
        bucket
            .tiers
            .iter()
            // A pattern can only match if the context carries at least as
            // many dimensions.
            .skip_while(|(specificity, _)| specificity.0 > context.len())
            .flat_map(|(_, tier)| tier.iter())
            .find(|registration| registration.scope().matches(context))
            .or(bucket.global.as_ref())
    }

    /// Every registration of `action` matching `context`, best first.
    ///
    /// The first element, if any, is what `resolve` returns.
    pub fn rank(&self, action: &Action, context: &Context) -> Vec<&Registration<H>> {
        let Some(bucket) = self.bucket(action) else {
            return Vec::new();
        };
        bucket
            .tiers
            .values()
            .flatten()
            .filter(|registration| registration.scope().matches(context))
            .chain(bucket.global.iter())
            .collect()
    }
}

impl<H: Send + Sync> Resolver<H> for Registry<H> {
    fn resolve<'a>(&'a self, action: &Action, context: &Context) -> Resolution<Match<'a, H>> {
        self.best_match(action, context)
            .map(|registration| Match {
                id: registration.id(),
                scope: registration.scope(),
                handler: registration.handler(),
            })
            .into()
    }
}
