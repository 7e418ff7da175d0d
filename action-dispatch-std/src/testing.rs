//! Testing utilities for action-dispatch.
//!
//! # Features
//!
//! - [`RecordingHandler`]: records every context and input it receives
//! - [`CountingHandler`]: counts invocations

use action_dispatch_core::{Context, Handler};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records every call and returns a fixed output.
///
/// Clones share the same recording, so keep one clone for assertions and
/// register the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::<u32, &str>::new("eu");
/// dispatcher.register("checkout", [("region", "EU")], recorder.clone())?;
///
/// dispatcher.dispatch("checkout", [("region", "EU")], 7)?;
/// assert_eq!(recorder.inputs(), vec![7]);
/// ```
pub struct RecordingHandler<In, Out> {
    calls: Arc<Mutex<Vec<(Context, In)>>>,
    output: Out,
}

impl<In, Out> RecordingHandler<In, Out> {
    /// Create a recording handler returning `output` on every call.
    pub fn new(output: Out) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            output,
        }
    }

    /// Contexts of the recorded calls, in call order.
    pub fn contexts(&self) -> Vec<Context> {
        self.calls.lock().iter().map(|(ctx, _)| ctx.clone()).collect()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl<In: Clone, Out> RecordingHandler<In, Out> {
    /// Inputs of the recorded calls, in call order.
    pub fn inputs(&self) -> Vec<In> {
        self.calls.lock().iter().map(|(_, input)| input.clone()).collect()
    }
}

impl<In, Out: Clone> Clone for RecordingHandler<In, Out> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
            output: self.output.clone(),
        }
    }
}

impl<In, Out> Handler<In> for RecordingHandler<In, Out>
where
    In: Send + 'static,
    Out: Clone + Send + Sync + 'static,
{
    type Output = Out;

    fn call(&self, context: &Context, input: In) -> Out {
        self.calls.lock().push((context.clone(), input));
        self.output.clone()
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that only counts how often it was called.
#[derive(Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<In> Handler<In> for CountingHandler {
    type Output = ();

    fn call(&self, _context: &Context, _input: In) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_handler_shares_calls_between_clones() {
        let recorder = RecordingHandler::<u32, &str>::new("ok");
        let registered = recorder.clone();
        let ctx = Context::from_dimensions([("region", "EU")]).unwrap();

        assert_eq!(registered.call(&ctx, 1), "ok");
        assert_eq!(registered.call(&ctx, 2), "ok");

        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.inputs(), vec![1, 2]);
        assert_eq!(recorder.contexts(), vec![ctx.clone(), ctx]);

        recorder.clear();
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_counting_handler() {
        let counter = CountingHandler::new();
        let ctx = Context::new();

        Handler::<&str>::call(&counter, &ctx, "a");
        Handler::<&str>::call(&counter, &ctx, "b");
        assert_eq!(counter.count(), 2);

        counter.reset();
        assert_eq!(counter.count(), 0);
    }
}
