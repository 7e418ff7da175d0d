//! Concurrent registration and dispatch.

mod common;

use action_dispatch::{Context, Dispatcher};
use std::thread;

#[test]
fn test_concurrent_dispatch_during_registration() {
    let dispatcher: Dispatcher<u64, u64> = Dispatcher::new();
    dispatcher
        .register_global("score", |_: &Context, n: u64| n)
        .unwrap();
    dispatcher.enable_cache(Some(32));

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..50u32 {
                let tenant = format!("t{i}");
                dispatcher
                    .register("score", [("tenant", tenant.as_str())], |_: &Context, n: u64| n * 2)
                    .unwrap();
            }
        });

        for worker in 0..4 {
            let dispatcher = &dispatcher;
            s.spawn(move || {
                for i in 0..200u64 {
                    let tenant = format!("t{}", (i + worker) % 60);
                    let out = dispatcher
                        .dispatch("score", [("tenant", tenant.as_str())], 10)
                        .unwrap();
                    // Either the tenant handler or the global fallback.
                    assert!(out == 10 || out == 20, "unexpected output {out}");
                }
            });
        }
    });

    assert_eq!(dispatcher.len(), 51);
    for i in 0..50 {
        let tenant = format!("t{i}");
        assert_eq!(
            dispatcher
                .dispatch("score", [("tenant", tenant.as_str())], 10)
                .unwrap(),
            20
        );
    }
    assert_eq!(
        dispatcher.dispatch("score", [("tenant", "t55")], 10).unwrap(),
        10
    );
}

#[test]
fn test_dispatcher_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Dispatcher<common::Order, common::Receipt>>();
    assert_send_sync::<Dispatcher<std::rc::Rc<u8>, std::rc::Rc<u8>>>();
}
