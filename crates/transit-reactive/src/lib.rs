#![forbid(unsafe_code)]

//! Transit Reactive
//!
//! Single-threaded, synchronous reactive primitives used by the Transit drag
//! coordination engine.
//!
//! # Key Components
//!
//! - [`Observable`] - shared value with change notification and versioning
//! - [`EventChannel`] - value-less multicast of events
//! - [`Subscription`] - RAII guard; dropping it unsubscribes
//! - [`EventSource`] / [`EventTarget`] - named raw-event sources
//!
//! Everything here is `!Send`: delivery happens on the calling thread,
//! inside the call that produced the value.

pub mod channel;
pub mod observable;
pub mod subscription;
pub mod target;

pub use channel::EventChannel;
pub use observable::Observable;
pub use subscription::Subscription;
pub use target::{EventSource, EventTarget};
