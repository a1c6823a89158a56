#![forbid(unsafe_code)]

//! Named raw-event sources.
//!
//! [`EventSource`] is the seam through which an external event target (a
//! window, a widget surface, a pointer device) exposes raw input by name,
//! e.g. `"pointermove"`. [`EventTarget`] is an in-process implementation
//! that keeps one [`EventChannel`] per event name and lets the owner
//! [`dispatch`](EventTarget::dispatch) into it.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::channel::EventChannel;
use crate::subscription::Subscription;

/// Something that can deliver raw events of type `E` by name.
pub trait EventSource<E> {
    /// Start listening for `event_name`. The listener stays attached until
    /// the returned guard is dropped.
    fn listen(&self, event_name: &str, callback: Box<dyn Fn(&E)>) -> Subscription;
}

/// In-process event target with one channel per event name.
///
/// Clones share the same channels.
pub struct EventTarget<E> {
    channels: Rc<RefCell<AHashMap<String, EventChannel<E>>>>,
}

impl<E> Clone for EventTarget<E> {
    fn clone(&self) -> Self {
        Self {
            channels: Rc::clone(&self.channels),
        }
    }
}

impl<E> std::fmt::Debug for EventTarget<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTarget")
            .field("event_names", &self.channels.borrow().len())
            .finish()
    }
}

impl<E: 'static> Default for EventTarget<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventTarget<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: Rc::new(RefCell::new(AHashMap::new())),
        }
    }

    /// Deliver `event` to the listeners of `event_name`.
    ///
    /// Returns the number of listeners reached; `0` if nobody ever listened.
    pub fn dispatch(&self, event_name: &str, event: &E) -> usize {
        // Clone the channel out so listeners may attach/detach while it runs.
        let channel = self.channels.borrow().get(event_name).cloned();
        channel.map_or(0, |c| c.publish(event))
    }

    /// Number of registered listeners for `event_name` (including dead ones
    /// not yet pruned by a dispatch).
    #[must_use]
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.channels
            .borrow()
            .get(event_name)
            .map_or(0, EventChannel::subscriber_count)
    }

    fn channel(&self, event_name: &str) -> EventChannel<E> {
        self.channels
            .borrow_mut()
            .entry(event_name.to_owned())
            .or_default()
            .clone()
    }
}

impl<E: 'static> EventSource<E> for EventTarget<E> {
    fn listen(&self, event_name: &str, callback: Box<dyn Fn(&E)>) -> Subscription {
        self.channel(event_name).subscribe(callback)
    }
}
