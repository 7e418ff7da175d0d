#![allow(dead_code)]

use action_dispatch::{Context, Dispatcher};

// ============================================================================
// Test Input / Output Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: u64,
    pub cents: u64,
}

impl Order {
    pub fn new(id: u64, cents: u64) -> Self {
        Self { id, cents }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub handler: &'static str,
    pub order_id: u64,
}

pub type CheckoutDispatcher = Dispatcher<Order, Receipt>;

// ============================================================================
// Test Handlers
// ============================================================================

pub fn eu_checkout(_ctx: &Context, order: Order) -> Receipt {
    Receipt {
        handler: "eu",
        order_id: order.id,
    }
}

pub fn eu_admin_checkout(_ctx: &Context, order: Order) -> Receipt {
    Receipt {
        handler: "eu-admin",
        order_id: order.id,
    }
}

pub fn default_checkout(_ctx: &Context, order: Order) -> Receipt {
    Receipt {
        handler: "default",
        order_id: order.id,
    }
}

/// A handler returning a fixed label, for resolution tests.
pub fn labelled(label: &'static str) -> impl Fn(&Context, ()) -> &'static str + Send + Sync + 'static {
    move |_: &Context, ()| label
}

/// Checkout with an EU handler and a global fallback.
pub fn checkout_dispatcher() -> CheckoutDispatcher {
    let dispatcher = Dispatcher::new();
    dispatcher
        .register("checkout", [("region", "EU")], eu_checkout)
        .unwrap();
    dispatcher
        .register_global("checkout", default_checkout)
        .unwrap();
    dispatcher
}
