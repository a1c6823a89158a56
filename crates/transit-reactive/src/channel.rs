#![forbid(unsafe_code)]

//! Value-less publish/subscribe fan-out.
//!
//! An [`EventChannel<E>`] is the stateless sibling of
//! [`Observable`](crate::Observable): it stores no current value and
//! performs no deduplication. Every [`publish`](EventChannel::publish)
//! reaches every live subscriber exactly once, in registration order, before
//! `publish` returns.
//!
//! # Invariants
//!
//! 1. Subscribers observe events in the exact order they were published.
//! 2. A subscriber registered during a publish does not see that event.
//! 3. A subscriber dropped during a publish may still see that one event,
//!    never a later one.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::subscription::{self, CallbackWeak, Subscription};

struct ChannelInner<E> {
    subscribers: Vec<CallbackWeak<E>>,
    published: u64,
}

/// Synchronous multicast channel for events of type `E`.
///
/// Clones share the same subscriber list.
pub struct EventChannel<E> {
    inner: Rc<RefCell<ChannelInner<E>>>,
}

impl<E> Clone for EventChannel<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> std::fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventChannel")
            .field("published", &inner.published)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<E: 'static> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventChannel<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                subscribers: Vec::new(),
                published: 0,
            })),
        }
    }

    /// Deliver `event` to every live subscriber.
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, event: &E) -> usize {
        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            inner.published += 1;
            subscription::live(&mut inner.subscribers)
        };
        for cb in &callbacks {
            cb(event);
        }
        trace!(subscribers = callbacks.len(), "event published");
        callbacks.len()
    }

    /// Register a callback for future events.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let (weak, guard) = subscription::register(callback);
        self.inner.borrow_mut().subscribers.push(weak);
        guard
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Total number of `publish` calls so far.
    #[must_use]
    pub fn published_count(&self) -> u64 {
        self.inner.borrow().published
    }
}
