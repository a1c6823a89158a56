#![forbid(unsafe_code)]

//! RAII subscription guards shared by [`Observable`](crate::Observable),
//! [`EventChannel`](crate::EventChannel) and [`EventTarget`](crate::EventTarget).
//!
//! Producers keep subscriber callbacks as `Weak` references; the only strong
//! reference lives inside the [`Subscription`] handed back to the caller.
//! Dropping the guard therefore detaches the callback without the producer
//! having to know about it. Dead entries are pruned lazily on the next
//! notification.

use std::rc::{Rc, Weak};

/// A subscriber callback stored as a strong `Rc` in the guard, handed out
/// as `Weak` to the producer.
pub(crate) type CallbackRc<T> = Rc<dyn Fn(&T)>;
pub(crate) type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// Wrap `callback` and return the producer-side weak handle together with
/// the guard that keeps it alive.
pub(crate) fn register<T: 'static>(
    callback: impl Fn(&T) + 'static,
) -> (CallbackWeak<T>, Subscription) {
    let strong: CallbackRc<T> = Rc::new(callback);
    let weak = Rc::downgrade(&strong);
    // `Rc<dyn Fn(&T)>` cannot coerce to `Rc<dyn Any>`, so box the Rc itself.
    (
        weak,
        Subscription {
            _guard: Box::new(strong),
        },
    )
}

/// Prune dead subscribers and collect the live ones, in registration order.
///
/// Callers must release their `RefCell` borrow before invoking the returned
/// callbacks so that subscribers may re-enter the producer.
pub(crate) fn live<T: ?Sized>(subscribers: &mut Vec<Weak<T>>) -> Vec<Rc<T>> {
    subscribers.retain(|w| w.strong_count() > 0);
    subscribers.iter().filter_map(Weak::upgrade).collect()
}

/// RAII guard for a subscriber callback.
///
/// Dropping the `Subscription` causes the associated callback to become
/// unreachable: the strong `Rc` is dropped, so the `Weak` held by the
/// producer fails to upgrade on the next notification.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Explicitly end the subscription. Equivalent to dropping it.
    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
