//! Span instrumentation for handlers.

use action_dispatch_core::{Context, Handler};

/// A Handler wrapper that instruments execution with a `tracing` Span.
///
/// The span records the handler name and the context the action was
/// dispatched with. Without the `tracing` feature the wrapper is a no-op.
pub struct TracingHandler<H> {
    inner: H,
    name: &'static str,
}

impl<H> TracingHandler<H> {
    /// Create a new `TracingHandler` wrapper around a handler.
    pub const fn new(inner: H, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The name recorded on the span.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The wrapped handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: Clone> Clone for TracingHandler<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<In, H> Handler<In> for TracingHandler<H>
where
    H: Handler<In>,
{
    type Output = H::Output;

    #[cfg(feature = "tracing")]
    fn call(&self, context: &Context, input: In) -> Self::Output {
        let span = tracing::info_span!(
            "dispatch_handler",
            handler = %self.name,
            context = %context
        );
        let _entered = span.enter();
        self.inner.call(context, input)
    }

    #[cfg(not(feature = "tracing"))]
    fn call(&self, context: &Context, input: In) -> Self::Output {
        self.inner.call(context, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_handler_delegates() {
        let handler = TracingHandler::new(|_ctx: &Context, n: u32| n * 3, "triple");
        let ctx = Context::from_dimensions([("region", "EU")]).unwrap();

        assert_eq!(handler.call(&ctx, 2), 6);
        assert_eq!(handler.name(), "triple");
    }
}
