//! # Handlers
//!
//! A handler is the terminal point of a dispatch: it receives the normalized
//! [`Context`] the action was dispatched with plus caller-supplied input,
//! and produces an output that is returned to the caller unchanged.
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `|ctx: &Context, amount: u32| amount * 2`
//! 2. **Function item**: `fn refund(ctx: &Context, order: Order) -> Receipt`
//! 3. **Struct implementation**: `impl Handler<Order> for RefundHandler`
//!
//! Handlers run synchronously on the caller's thread. Fallible handlers
//! return `Result`; the dispatcher passes the `Err` through untouched.

use crate::context::Context;
use std::sync::Arc;

/// A dispatch target.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle input of type `{In}`",
    label = "missing `Handler<{In}>` implementation",
    note = "Closures must take `(&Context, {In})`; annotate the `&Context` parameter type."
)]
pub trait Handler<In>: Send + Sync + 'static {
    /// The value produced by the handler.
    type Output;

    /// Executes the handler logic.
    fn call(&self, context: &Context, input: In) -> Self::Output;
}

// Blanket impl for closures and fn items
impl<F, In, Out> Handler<In> for F
where
    F: Fn(&Context, In) -> Out + Send + Sync + 'static,
{
    type Output = Out;

    fn call(&self, context: &Context, input: In) -> Self::Output {
        (self)(context, input)
    }
}

/// A shared, type-erased handler as stored by the registry.
pub type BoxHandler<In, Out> = Arc<dyn Handler<In, Output = Out>>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Doubler;

    impl Handler<u32> for Doubler {
        type Output = u32;

        fn call(&self, _context: &Context, input: u32) -> u32 {
            input * 2
        }
    }

    fn describe(context: &Context, suffix: &'static str) -> String {
        format!("{}{}", context.len(), suffix)
    }

    #[test]
    fn test_handler_forms() {
        let ctx = Context::new();
        let closure = |_ctx: &Context, n: u32| n + 1;
        assert_eq!(Handler::call(&closure, &ctx, 1), 2);
        assert_eq!(Doubler.call(&ctx, 4), 8);
        assert_eq!(Handler::call(&describe, &ctx, "!"), "0!");
    }

    #[test]
    fn test_box_handler_erases_type() {
        let doubler: BoxHandler<u32, u32> = Arc::new(Doubler);
        let adder: BoxHandler<u32, u32> = Arc::new(|_ctx: &Context, n: u32| n + 10);
        let handlers = vec![doubler, adder];
        let ctx = Context::new();
        let outputs: Vec<u32> = handlers.iter().map(|h| h.call(&ctx, 1)).collect();
        assert_eq!(outputs, vec![2, 11]);
    }
}
