#![forbid(unsafe_code)]

//! Drag-scoped listeners.
//!
//! A [`ScopedListener`] forwards raw events from an [`EventSource`] only
//! while the drag bus is active. Its lifetime follows the drag state
//! instead of manual start/stop bookkeeping:
//!
//! ```text
//!            active = true
//!   Detached ──────────────▶ Attached(listener on source)
//!      ▲                          │
//!      └──────────────────────────┘
//!            active = false
//! ```
//!
//! Every `Detached → Attached` transition opens a fresh listener on the
//! source; every `Attached → Detached` transition drops it. Repeated
//! `true`/`false` notifications in the same state are ignored.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;
use transit_reactive::{EventSource, Observable, Subscription};

enum GateState {
    Detached,
    Attached(Subscription),
}

struct Gate<E> {
    source: Rc<dyn EventSource<E>>,
    event_name: String,
    forward: Rc<dyn Fn(&E)>,
    state: GateState,
    attachments: u64,
}

impl<E: 'static> Gate<E> {
    fn attach(&mut self) {
        if matches!(self.state, GateState::Attached(_)) {
            return;
        }
        let forward = Rc::clone(&self.forward);
        let listener = self
            .source
            .listen(&self.event_name, Box::new(move |e: &E| forward(e)));
        self.state = GateState::Attached(listener);
        self.attachments += 1;
        debug!(
            event = %self.event_name,
            attachment = self.attachments,
            "scoped listener attached"
        );
    }

    fn detach(&mut self) {
        if let GateState::Attached(_) = std::mem::replace(&mut self.state, GateState::Detached) {
            debug!(event = %self.event_name, "scoped listener detached");
        }
    }
}

/// Listener whose attachment to its source is bounded by the drag state.
///
/// Created by [`DragBus::listen_when_active`](crate::DragBus::listen_when_active).
/// Dropping it detaches from both the bus and the source.
#[must_use = "dropping a ScopedListener detaches it"]
pub struct ScopedListener<E> {
    gate: Rc<RefCell<Gate<E>>>,
    _active: Subscription,
}

impl<E: 'static> ScopedListener<E> {
    pub(crate) fn new(
        active: &Observable<bool>,
        source: Rc<dyn EventSource<E>>,
        event_name: String,
        callback: impl Fn(&E) + 'static,
    ) -> Self {
        let gate = Rc::new(RefCell::new(Gate {
            source,
            event_name,
            forward: Rc::new(callback),
            state: GateState::Detached,
            attachments: 0,
        }));

        let weak = Rc::downgrade(&gate);
        let sub = active.subscribe(move |is_active| {
            let Some(gate) = weak.upgrade() else {
                return;
            };
            let mut gate = gate.borrow_mut();
            if *is_active {
                gate.attach();
            } else {
                gate.detach();
            }
        });

        if active.get() {
            gate.borrow_mut().attach();
        }

        Self { gate, _active: sub }
    }

    /// `true` while forwarding events from the source.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        matches!(self.gate.borrow().state, GateState::Attached(_))
    }

    /// How many times the listener has attached so far (one per drag).
    #[must_use]
    pub fn attachments(&self) -> u64 {
        self.gate.borrow().attachments
    }
}

impl<E> fmt::Debug for ScopedListener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gate = self.gate.borrow();
        f.debug_struct("ScopedListener")
            .field("event_name", &gate.event_name)
            .field("attached", &matches!(gate.state, GateState::Attached(_)))
            .field("attachments", &gate.attachments)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::DragBus;
    use crate::event::PointerEvent;
    use crate::handle::{Draggable, DraggableRef};
    use crate::identity::Identity;
    use std::cell::Cell;
    use transit_reactive::EventTarget;

    struct Item(Identity);

    impl Draggable for Item {
        fn id(&self) -> &Identity {
            &self.0
        }

        fn droppable(&self) -> Option<Identity> {
            None
        }

        fn index(&self) -> Option<usize> {
            None
        }
    }

    fn setup() -> (DragBus, EventTarget<u32>, ScopedListener<u32>, Rc<Cell<u32>>) {
        let bus = DragBus::new();
        let target = EventTarget::new();
        let sum = Rc::new(Cell::new(0));
        let sum_clone = Rc::clone(&sum);
        let listener = bus.listen_when_active(
            source(&target),
            "pointermove",
            move |e: &u32| sum_clone.set(sum_clone.get() + e),
        );
        (bus, target, listener, sum)
    }

    fn source(target: &EventTarget<u32>) -> Rc<dyn EventSource<u32>> {
        Rc::new(target.clone())
    }

    fn d() -> DraggableRef {
        DraggableRef::new(Item("d".into()))
    }

    #[test]
    fn forwards_only_while_active() {
        let (bus, target, listener, sum) = setup();

        target.dispatch("pointermove", &1);
        assert_eq!(sum.get(), 0);
        assert!(!listener.is_attached());

        bus.emit_drag_start(PointerEvent::default(), d());
        assert!(listener.is_attached());
        target.dispatch("pointermove", &10);
        assert_eq!(sum.get(), 10);

        bus.emit_drag_end(PointerEvent::default());
        assert!(!listener.is_attached());
        target.dispatch("pointermove", &100);
        assert_eq!(sum.get(), 10);
        assert_eq!(target.listener_count("pointermove"), 0);
    }

    #[test]
    fn restarts_fresh_on_each_drag() {
        let (bus, target, listener, sum) = setup();

        for _ in 0..3 {
            bus.emit_drag_start(PointerEvent::default(), d());
            target.dispatch("pointermove", &1);
            bus.emit_drag_end(PointerEvent::default());
        }
        assert_eq!(sum.get(), 3);
        assert_eq!(listener.attachments(), 3);
    }

    #[test]
    fn attaches_immediately_when_created_mid_drag() {
        let bus = DragBus::new();
        bus.emit_drag_start(PointerEvent::default(), d());

        let target = EventTarget::<u32>::new();
        let listener = bus.listen_when_active(source(&target), "pointermove", |_: &u32| {});
        assert!(listener.is_attached());
        assert_eq!(target.listener_count("pointermove"), 1);
    }

    #[test]
    fn dropping_listener_detaches_from_source() {
        let (bus, target, listener, sum) = setup();
        bus.emit_drag_start(PointerEvent::default(), d());
        drop(listener);

        target.dispatch("pointermove", &5);
        assert_eq!(sum.get(), 0);
    }

    #[test]
    fn drag_end_from_inside_forwarded_event() {
        let bus = DragBus::new();
        let target = EventTarget::<u32>::new();
        let bus_clone = bus.clone();
        let listener = bus.listen_when_active(source(&target), "pointerup", move |_: &u32| {
            bus_clone.emit_drag_end(PointerEvent::default());
        });

        bus.emit_drag_start(PointerEvent::default(), d());
        target.dispatch("pointerup", &0);
        assert!(!bus.is_active());
        assert!(!listener.is_attached());
    }
}
