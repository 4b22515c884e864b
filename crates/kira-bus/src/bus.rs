// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Event Bus (C6): synchronous in-process publish/subscribe.
//!
//! Unlike `oj-daemon::event_bus::EventBus`, which is WAL-backed and async
//! (built for a cross-process daemon/CLI split), Kira's bus dispatches
//! directly on the publishing thread — there is no cross-process boundary
//! to decouple. Subscribers registered for a topic run in registration
//! order; a handler panic is caught and logged so it never aborts the
//! remaining handlers.

use kira_core::event::EventEnvelope;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A boxed event handler. Takes the envelope by reference so publishers
/// retain ownership and handlers cannot mutate what other subscribers see.
pub type Handler = Arc<dyn Fn(&EventEnvelope) + Send + Sync>;

/// Opaque handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

struct Subscription {
    token: SubscriptionToken,
    handler: Handler,
}

/// In-process, synchronous publish/subscribe fabric. No wildcard topics:
/// a subscriber only hears events published under the exact topic string
/// it registered for.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<HashMap<String, Vec<Subscription>>>,
    next_token: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `topic`, returning a token that
    /// [`unsubscribe`](Self::unsubscribe) accepts.
    pub fn subscribe(
        &self,
        topic: impl Into<String>,
        handler: impl Fn(&EventEnvelope) + Send + Sync + 'static,
    ) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token.fetch_add(1, Ordering::SeqCst));
        let mut subscribers = self.subscribers.lock();
        subscribers
            .entry(topic.into())
            .or_default()
            .push(Subscription {
                token,
                handler: Arc::new(handler),
            });
        token
    }

    /// Removes a previously registered subscription. Returns `true` if a
    /// matching subscription was found and removed.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subscribers = self.subscribers.lock();
        for handlers in subscribers.values_mut() {
            let before = handlers.len();
            handlers.retain(|s| s.token != token);
            if handlers.len() != before {
                return true;
            }
        }
        false
    }

    /// Publishes `envelope` under `topic`. Snapshots the subscriber list
    /// under the lock, releases it, then invokes each handler in
    /// registration order on the calling thread. A handler that panics is
    /// isolated: the panic is caught and logged with the envelope's
    /// `trace_id`, and subsequent handlers still run.
    pub fn publish(&self, topic: &str, envelope: &EventEnvelope) {
        let handlers: Vec<Handler> = {
            let subscribers = self.subscribers.lock();
            subscribers
                .get(topic)
                .map(|subs| subs.iter().map(|s| s.handler.clone()).collect())
                .unwrap_or_default()
        };

        for handler in handlers {
            let result = catch_unwind(AssertUnwindSafe(|| handler(envelope)));
            if result.is_err() {
                tracing::error!(
                    trace_id = %envelope.trace_id,
                    topic,
                    "event handler panicked"
                );
            }
        }
    }

    /// Number of subscribers currently registered for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscribers
            .lock()
            .get(topic)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
