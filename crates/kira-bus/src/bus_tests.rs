// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kira_core::event::Event;
use parking_lot::Mutex as PMutex;
use std::sync::Arc;

fn envelope() -> EventEnvelope {
    EventEnvelope::new(
        "trace-1",
        Event::MessageReceived {
            text: "hi".into(),
            source: "test".into(),
            external_id: "1".into(),
        },
    )
}

#[test]
fn subscribers_run_in_registration_order() {
    let bus = EventBus::new();
    let order = Arc::new(PMutex::new(Vec::new()));

    let o1 = order.clone();
    bus.subscribe("task.created", move |_| o1.lock().push(1));
    let o2 = order.clone();
    bus.subscribe("task.created", move |_| o2.lock().push(2));
    let o3 = order.clone();
    bus.subscribe("task.created", move |_| o3.lock().push(3));

    bus.publish("task.created", &envelope());

    assert_eq!(*order.lock(), vec![1, 2, 3]);
}

#[test]
fn handler_panic_is_isolated() {
    let bus = EventBus::new();
    let ran = Arc::new(PMutex::new(false));

    bus.subscribe("task.created", |_| panic!("boom"));
    let ran2 = ran.clone();
    bus.subscribe("task.created", move |_| *ran2.lock() = true);

    bus.publish("task.created", &envelope());

    assert!(*ran.lock(), "second handler must still run after first panics");
}

#[test]
fn unrelated_topics_dont_fire() {
    let bus = EventBus::new();
    let fired = Arc::new(PMutex::new(false));
    let f = fired.clone();
    bus.subscribe("task.created", move |_| *f.lock() = true);

    bus.publish("note.created", &envelope());

    assert!(!*fired.lock());
}

#[test]
fn unsubscribe_stops_delivery() {
    let bus = EventBus::new();
    let count = Arc::new(PMutex::new(0));
    let c = count.clone();
    let token = bus.subscribe("task.created", move |_| *c.lock() += 1);

    bus.publish("task.created", &envelope());
    assert!(bus.unsubscribe(token));
    bus.publish("task.created", &envelope());

    assert_eq!(*count.lock(), 1);
}

#[test]
fn unsubscribe_unknown_token_returns_false() {
    let bus = EventBus::new();
    bus.subscribe("task.created", |_| {});
    let bogus = SubscriptionToken(9999);
    assert!(!bus.unsubscribe(bogus));
}

#[test]
fn subscriber_count_reflects_registrations() {
    let bus = EventBus::new();
    assert_eq!(bus.subscriber_count("task.created"), 0);
    bus.subscribe("task.created", |_| {});
    bus.subscribe("task.created", |_| {});
    assert_eq!(bus.subscriber_count("task.created"), 2);
}

#[test]
fn each_subscriber_sees_every_publish_exactly_once() {
    let bus = EventBus::new();
    let count = Arc::new(PMutex::new(0));
    let c = count.clone();
    bus.subscribe("task.created", move |_| *c.lock() += 1);

    for _ in 0..5 {
        bus.publish("task.created", &envelope());
    }

    assert_eq!(*count.lock(), 5);
}
