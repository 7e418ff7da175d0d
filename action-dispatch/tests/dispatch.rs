//! End-to-end dispatch tests.

mod common;

use action_dispatch::{
    ActionDispatchError, BoxError, Context, Dispatcher, HandlerNotFoundError, Resolution, Scalar,
    Value,
};
use common::{Order, checkout_dispatcher};

#[test]
fn test_checkout_scenario() {
    let dispatcher = checkout_dispatcher();

    let receipt = dispatcher
        .dispatch(
            "checkout",
            [("region", "EU"), ("role", "admin")],
            Order::new(1, 500),
        )
        .unwrap();
    assert_eq!(receipt.handler, "eu");
    assert_eq!(receipt.order_id, 1);

    let receipt = dispatcher
        .dispatch("checkout", [("region", "US")], Order::new(2, 500))
        .unwrap();
    assert_eq!(receipt.handler, "default");

    let err = dispatcher
        .dispatch("refund", (), Order::new(3, 500))
        .unwrap_err();
    assert_eq!(
        err,
        ActionDispatchError::HandlerNotFound(HandlerNotFoundError {
            action: "refund".try_into().unwrap(),
            context: Context::new(),
        })
    );
}

#[test]
fn test_not_found_carries_action_and_context() {
    let dispatcher: Dispatcher<(), ()> = Dispatcher::new();
    dispatcher
        .register("export", [("format", "csv")], |_: &Context, (): ()| ())
        .unwrap();

    let err = dispatcher
        .dispatch("export", [("format", "pdf")], ())
        .unwrap_err();
    let ActionDispatchError::HandlerNotFound(not_found) = err else {
        panic!("expected HandlerNotFound");
    };
    assert_eq!(not_found.action.as_str(), "export");
    assert_eq!(
        not_found.context,
        Context::from_dimensions([("format", "pdf")]).unwrap()
    );
    assert_eq!(
        not_found.to_string(),
        r#"no handler found for action 'export' with context {format="pdf"}"#
    );
}

#[test]
fn test_handler_errors_pass_through() {
    let dispatcher: Dispatcher<u64, Result<u64, BoxError>> = Dispatcher::new();
    dispatcher
        .register_global("withdraw", |_: &Context, cents: u64| {
            if cents > 1_000 {
                Err(BoxError::from("insufficient funds"))
            } else {
                Ok(cents)
            }
        })
        .unwrap();

    assert_eq!(dispatcher.dispatch("withdraw", (), 10).unwrap().unwrap(), 10);

    let handler_err = dispatcher
        .dispatch("withdraw", (), 5_000)
        .expect("dispatch itself succeeds")
        .unwrap_err();
    assert_eq!(handler_err.to_string(), "insufficient funds");
}

#[test]
fn test_handler_sees_context() {
    let dispatcher: Dispatcher<(), String> = Dispatcher::new();
    dispatcher
        .register("greet", [("lang", "fr")], |ctx: &Context, (): ()| {
            let user = ctx.get("user").and_then(Scalar::as_str).unwrap_or("stranger");
            format!("bonjour {user}")
        })
        .unwrap();

    let out = dispatcher
        .dispatch("greet", [("lang", "fr"), ("user", "ana")], ())
        .unwrap();
    assert_eq!(out, "bonjour ana");
}

#[test]
fn test_resolve_probes_without_error() {
    let dispatcher = checkout_dispatcher();

    let resolved = dispatcher
        .resolve("checkout", [("region", "EU")])
        .unwrap()
        .matched()
        .unwrap();
    assert_eq!(resolved.specificity(), 1);

    assert_eq!(
        dispatcher.resolve("refund", ()).unwrap().matched().map(|r| r.id()),
        None
    );
    assert!(matches!(
        dispatcher.resolve("refund", ()),
        Ok(Resolution::NotFound)
    ));
}

#[test]
fn test_dynamic_values() {
    let dispatcher: Dispatcher<Vec<Value>, Value> = Dispatcher::new();
    dispatcher
        .register("sum", [("version", 2)], |_: &Context, args: Vec<Value>| {
            let total = args
                .iter()
                .filter_map(|v| match v {
                    Value::Int(n) => Some(*n),
                    _ => None,
                })
                .sum::<i64>();
            Value::Int(total)
        })
        .unwrap();

    let out = dispatcher
        .dispatch("sum", [("version", 2)], vec![Value::from(1), Value::from(2)])
        .unwrap();
    assert_eq!(out, Value::Int(3));
}

#[test]
fn test_traced_handler() {
    use action_dispatch::hooks::TracingHandler;

    let dispatcher: Dispatcher<u32, u32> = Dispatcher::new();
    dispatcher
        .register(
            "double",
            [("region", "EU")],
            TracingHandler::new(|_: &Context, n: u32| n * 2, "double_eu"),
        )
        .unwrap();

    assert_eq!(dispatcher.dispatch("double", [("region", "EU")], 21).unwrap(), 42);
}
