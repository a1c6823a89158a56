#![forbid(unsafe_code)]

//! The drag coordinator: single source of truth for the drag lifecycle.
//!
//! # Design
//!
//! [`DragBus`] holds the current [`DragState`] and one [`EventChannel`] per
//! lifecycle point. Every `emit_*` call runs synchronously: state changes
//! and subscriber callbacks have all completed when it returns.
//!
//! # Invariants
//!
//! 1. `emit_drag_start` moves the state to `InTransit` **before** the
//!    `dragstart` event is published, so subscribers already see the item in
//!    transit.
//! 2. `emit_drag_end` publishes `dragend` carrying the item that *was* in
//!    transit, **then** resets the state to `Idle`.
//! 3. [`DragBus::is_active`] is `true` iff the state is `InTransit`, at every
//!    point of a transition. The `active` observable only drives
//!    notifications and flips in the same call as the state.
//! 4. `remove`/`insert` never touch the state.
//!
//! # Failure Modes
//!
//! The bus does not validate gesture sequencing beyond what the configured
//! [`SequencingPolicy`] asks for. Under `Permissive`/`Warn`, `dragend` while
//! idle publishes an event with an absent draggable and `dragstart` while in
//! transit replaces the tracked item.

use std::rc::Rc;

use tracing::{debug, trace, warn};
use transit_reactive::{EventChannel, EventSource, Observable, Subscription};

use crate::config::{SequencingPolicy, TransitConfig};
use crate::event::{
    DragEnterEvent, DragEvent, DragEventKind, DragLeaveEvent, DragOverEvent, DropZoneEvent,
    InsertEvent, PointerEvent, RemoveEvent, TransferEvent,
};
use crate::gate::ScopedListener;
use crate::handle::{DraggableRef, DropZoneRef};

/// Process-wide drag state: at most one draggable in transit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    InTransit(DraggableRef),
}

impl DragState {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InTransit(_))
    }

    #[must_use]
    pub fn draggable(&self) -> Option<&DraggableRef> {
        match self {
            Self::Idle => None,
            Self::InTransit(d) => Some(d),
        }
    }
}

struct Channels {
    drag_start: EventChannel<DragEvent>,
    drag: EventChannel<DragEvent>,
    drag_enter: EventChannel<DragEnterEvent>,
    drag_over: EventChannel<DragOverEvent>,
    drag_leave: EventChannel<DragLeaveEvent>,
    drag_end: EventChannel<DragEvent>,
    remove: EventChannel<RemoveEvent>,
    insert: EventChannel<InsertEvent>,
}

impl Channels {
    fn new() -> Self {
        Self {
            drag_start: EventChannel::new(),
            drag: EventChannel::new(),
            drag_enter: EventChannel::new(),
            drag_over: EventChannel::new(),
            drag_leave: EventChannel::new(),
            drag_end: EventChannel::new(),
            remove: EventChannel::new(),
            insert: EventChannel::new(),
        }
    }
}

/// Drag coordinator handle.
///
/// Explicitly constructed and passed to whoever needs it. Clones are cheap
/// and share the same state and subscribers.
#[derive(Clone)]
pub struct DragBus {
    in_transit: Observable<Option<DraggableRef>>,
    active: Observable<bool>,
    channels: Rc<Channels>,
    policy: SequencingPolicy,
}

impl std::fmt::Debug for DragBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragBus")
            .field("in_transit", &self.in_transit.get())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for DragBus {
    fn default() -> Self {
        Self::new()
    }
}

impl DragBus {
    /// Create an idle bus with the default [`SequencingPolicy`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(SequencingPolicy::default())
    }

    #[must_use]
    pub fn with_config(config: &TransitConfig) -> Self {
        Self::with_policy(config.sequencing)
    }

    #[must_use]
    pub fn with_policy(policy: SequencingPolicy) -> Self {
        Self {
            in_transit: Observable::new(None),
            active: Observable::new(false),
            channels: Rc::new(Channels::new()),
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> SequencingPolicy {
        self.policy
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> DragState {
        match self.in_transit.get() {
            Some(d) => DragState::InTransit(d),
            None => DragState::Idle,
        }
    }

    /// The draggable currently in transit.
    #[must_use]
    pub fn in_transit(&self) -> Option<DraggableRef> {
        self.in_transit.get()
    }

    /// `true` while a draggable is in transit.
    ///
    /// Read from the tracked item itself, so it already agrees with
    /// [`state`](Self::state) inside `on_in_transit` callbacks, before the
    /// `active` notification goes out.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.in_transit.with(Option::is_some)
    }

    /// Observe the item in transit. Called on every change (`None` when the
    /// drag ends). The current value is not replayed.
    pub fn on_in_transit(
        &self,
        callback: impl Fn(Option<&DraggableRef>) + 'static,
    ) -> Subscription {
        self.in_transit.subscribe(move |d| callback(d.as_ref()))
    }

    /// Observe the derived `active` flag. Called only when it flips.
    pub fn on_active(&self, callback: impl Fn(bool) + 'static) -> Subscription {
        self.active.subscribe(move |a| callback(*a))
    }

    fn set_in_transit(&self, draggable: Option<DraggableRef>) {
        let active = draggable.is_some();
        self.in_transit.set(draggable);
        self.active.set(active);
    }

    /// Apply the sequencing policy to a call that does not fit the
    /// lifecycle. Returns `true` if the call should proceed.
    fn admit(&self, well_formed: bool, kind: DragEventKind) -> bool {
        if well_formed {
            return true;
        }
        match self.policy {
            SequencingPolicy::Permissive => true,
            SequencingPolicy::Warn => {
                warn!(
                    kind = kind.as_str(),
                    active = self.is_active(),
                    "ill-formed drag sequence"
                );
                true
            }
            SequencingPolicy::Reject => {
                warn!(
                    kind = kind.as_str(),
                    active = self.is_active(),
                    "ill-formed drag sequence rejected"
                );
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Emitters
    // -----------------------------------------------------------------------

    /// Begin dragging `draggable`.
    pub fn emit_drag_start(&self, pointer: PointerEvent, draggable: DraggableRef) {
        if !self.admit(!self.is_active(), DragEventKind::DragStart) {
            return;
        }
        debug!(draggable = %draggable.id(), "drag start");
        self.set_in_transit(Some(draggable.clone()));
        self.channels.drag_start.publish(&DragEvent::new(
            DragEventKind::DragStart,
            pointer,
            Some(draggable),
        ));
    }

    /// Pointer moved while dragging.
    pub fn emit_drag(&self, pointer: PointerEvent) {
        if !self.admit(self.is_active(), DragEventKind::Drag) {
            return;
        }
        trace!(x = pointer.x, y = pointer.y, "drag");
        self.channels.drag.publish(&DragEvent::new(
            DragEventKind::Drag,
            pointer,
            self.in_transit(),
        ));
    }

    pub fn emit_drag_enter(&self, pointer: PointerEvent, drop_zone: DropZoneRef) {
        let event = DropZoneEvent::enter(pointer, self.in_transit(), drop_zone);
        self.emit_zone(&self.channels.drag_enter, &event);
    }

    pub fn emit_drag_over(&self, pointer: PointerEvent, drop_zone: DropZoneRef) {
        let event = DropZoneEvent::over(pointer, self.in_transit(), drop_zone);
        self.emit_zone(&self.channels.drag_over, &event);
    }

    pub fn emit_drag_leave(&self, pointer: PointerEvent, drop_zone: DropZoneRef) {
        let event = DropZoneEvent::leave(pointer, self.in_transit(), drop_zone);
        self.emit_zone(&self.channels.drag_leave, &event);
    }

    fn emit_zone(&self, channel: &EventChannel<DropZoneEvent>, event: &DropZoneEvent) {
        if !self.admit(self.is_active(), event.kind) {
            return;
        }
        let zone = event.drop_zone.location();
        if event.kind == DragEventKind::DragOver {
            trace!(zone = %zone, "drag over");
        } else {
            debug!(kind = event.kind.as_str(), zone = %zone, "drop zone");
        }
        channel.publish(event);
    }

    /// Finish the drag. Subscribers see the item that was in transit; the
    /// state is reset afterwards.
    pub fn emit_drag_end(&self, pointer: PointerEvent) {
        if !self.admit(self.is_active(), DragEventKind::DragEnd) {
            return;
        }
        let draggable = self.in_transit();
        debug!(
            draggable = ?draggable.as_ref().map(|d| d.id().as_str()),
            "drag end"
        );
        self.channels.drag_end.publish(&DragEvent::new(
            DragEventKind::DragEnd,
            pointer,
            draggable,
        ));
        self.set_in_transit(None);
    }

    /// `draggable` left its container. Informational only.
    pub fn emit_remove(&self, draggable: DraggableRef) {
        debug!(draggable = %draggable.id(), "remove");
        self.channels
            .remove
            .publish(&TransferEvent::new(DragEventKind::Remove, draggable));
    }

    /// `draggable` entered a container. Informational only.
    pub fn emit_insert(&self, draggable: DraggableRef) {
        debug!(draggable = %draggable.id(), "insert");
        self.channels
            .insert
            .publish(&TransferEvent::new(DragEventKind::Insert, draggable));
    }

    // -----------------------------------------------------------------------
    // Streams
    // -----------------------------------------------------------------------

    pub fn on_drag_start(&self, callback: impl Fn(&DragEvent) + 'static) -> Subscription {
        self.channels.drag_start.subscribe(callback)
    }

    pub fn on_drag(&self, callback: impl Fn(&DragEvent) + 'static) -> Subscription {
        self.channels.drag.subscribe(callback)
    }

    pub fn on_drag_enter(&self, callback: impl Fn(&DragEnterEvent) + 'static) -> Subscription {
        self.channels.drag_enter.subscribe(callback)
    }

    pub fn on_drag_over(&self, callback: impl Fn(&DragOverEvent) + 'static) -> Subscription {
        self.channels.drag_over.subscribe(callback)
    }

    pub fn on_drag_leave(&self, callback: impl Fn(&DragLeaveEvent) + 'static) -> Subscription {
        self.channels.drag_leave.subscribe(callback)
    }

    pub fn on_drag_end(&self, callback: impl Fn(&DragEvent) + 'static) -> Subscription {
        self.channels.drag_end.subscribe(callback)
    }

    pub fn on_remove(&self, callback: impl Fn(&RemoveEvent) + 'static) -> Subscription {
        self.channels.remove.subscribe(callback)
    }

    pub fn on_insert(&self, callback: impl Fn(&InsertEvent) + 'static) -> Subscription {
        self.channels.insert.subscribe(callback)
    }

    /// Forward `event_name` events from `source` to `callback`, but only
    /// while a drag is active.
    ///
    /// The listener attaches to `source` the moment the bus becomes active
    /// (immediately, if it already is) and detaches the moment it becomes
    /// idle. Each drag gets a fresh attachment. Dropping the returned
    /// [`ScopedListener`] tears everything down.
    pub fn listen_when_active<E: 'static>(
        &self,
        source: Rc<dyn EventSource<E>>,
        event_name: impl Into<String>,
        callback: impl Fn(&E) + 'static,
    ) -> ScopedListener<E> {
        ScopedListener::new(&self.active, source, event_name.into(), callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Draggable;
    use crate::identity::Identity;
    use crate::location::Location;
    use std::cell::RefCell;

    struct Item(Identity);

    impl Draggable for Item {
        fn id(&self) -> &Identity {
            &self.0
        }

        fn droppable(&self) -> Option<Identity> {
            Some("list".into())
        }

        fn index(&self) -> Option<usize> {
            Some(0)
        }
    }

    fn item(id: &str) -> DraggableRef {
        DraggableRef::new(Item(id.into()))
    }

    fn p() -> PointerEvent {
        PointerEvent::default()
    }

    #[test]
    fn starts_idle() {
        let bus = DragBus::new();
        assert_eq!(bus.state(), DragState::Idle);
        assert!(!bus.is_active());
        assert!(bus.in_transit().is_none());
    }

    #[test]
    fn drag_start_sets_state_before_publishing() {
        let bus = DragBus::new();
        let d = item("d");
        let seen = Rc::new(RefCell::new(None));

        let bus_clone = bus.clone();
        let seen_clone = Rc::clone(&seen);
        let _sub = bus.on_drag_start(move |e| {
            *seen_clone.borrow_mut() = Some((bus_clone.is_active(), e.draggable.clone()));
        });

        bus.emit_drag_start(p(), d.clone());
        let (active, draggable) = seen.borrow_mut().take().expect("dragstart published");
        assert!(active);
        assert_eq!(draggable, Some(d.clone()));
        assert_eq!(bus.state(), DragState::InTransit(d));
    }

    #[test]
    fn drag_end_publishes_before_reset() {
        let bus = DragBus::new();
        let d = item("d");
        let seen = Rc::new(RefCell::new(None));

        let bus_clone = bus.clone();
        let seen_clone = Rc::clone(&seen);
        let _sub = bus.on_drag_end(move |e| {
            *seen_clone.borrow_mut() = Some((bus_clone.is_active(), e.draggable.clone()));
        });

        bus.emit_drag_start(p(), d.clone());
        bus.emit_drag_end(p());

        let (active, draggable) = seen.borrow_mut().take().expect("dragend published");
        assert!(active, "dragend must observe the pre-reset state");
        assert_eq!(draggable, Some(d));
        assert!(!bus.is_active());
        assert_eq!(bus.state(), DragState::Idle);
    }

    #[test]
    fn is_active_agrees_with_state_inside_transit_callbacks() {
        let bus = DragBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let bus_clone = bus.clone();
        let seen_clone = Rc::clone(&seen);
        let _sub = bus.on_in_transit(move |d| {
            seen_clone.borrow_mut().push((
                d.is_some(),
                bus_clone.is_active(),
                bus_clone.state().is_active(),
            ));
        });

        bus.emit_drag_start(p(), item("d"));
        bus.emit_drag_end(p());
        assert_eq!(*seen.borrow(), vec![(true, true, true), (false, false, false)]);
    }

    #[test]
    fn active_flips_only_on_transitions() {
        let bus = DragBus::with_policy(SequencingPolicy::Permissive);
        let flips = Rc::new(RefCell::new(Vec::new()));
        let flips_clone = Rc::clone(&flips);
        let _sub = bus.on_active(move |a| flips_clone.borrow_mut().push(a));

        bus.emit_drag_start(p(), item("a"));
        bus.emit_drag_start(p(), item("b"));
        bus.emit_drag_end(p());
        assert_eq!(*flips.borrow(), vec![true, false]);
    }

    #[test]
    fn in_transit_stream_follows_state() {
        let bus = DragBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = bus.on_in_transit(move |d| {
            seen_clone
                .borrow_mut()
                .push(d.map(|d| d.id().to_string()))
        });

        bus.emit_drag_start(p(), item("d"));
        bus.emit_drag_end(p());
        assert_eq!(*seen.borrow(), vec![Some("d".to_string()), None]);
    }

    #[test]
    fn each_zone_kind_reaches_only_its_channel() {
        let bus = DragBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = Rc::clone(&log);
        let _enter = bus.on_drag_enter(move |e| l.borrow_mut().push(("enter", e.kind)));
        let l = Rc::clone(&log);
        let _over = bus.on_drag_over(move |e| l.borrow_mut().push(("over", e.kind)));
        let l = Rc::clone(&log);
        let _leave = bus.on_drag_leave(move |e| l.borrow_mut().push(("leave", e.kind)));

        let zone = DropZoneRef::new(Location::new("list", 0));
        bus.emit_drag_start(p(), item("d"));
        bus.emit_drag_leave(p(), zone.clone());
        bus.emit_drag_over(p(), zone.clone());
        bus.emit_drag_enter(p(), zone);

        assert_eq!(
            *log.borrow(),
            vec![
                ("leave", DragEventKind::DragLeave),
                ("over", DragEventKind::DragOver),
                ("enter", DragEventKind::DragEnter),
            ]
        );
    }

    #[test]
    fn zone_events_carry_draggable_and_zone() {
        let bus = DragBus::new();
        let d = item("d");
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _enter = bus.on_drag_enter(move |e| {
            l1.borrow_mut().push((e.kind, e.draggable.clone(), e.drop_zone.location()))
        });
        let l2 = Rc::clone(&log);
        let _over = bus.on_drag_over(move |e| {
            l2.borrow_mut().push((e.kind, e.draggable.clone(), e.drop_zone.location()))
        });
        let l3 = Rc::clone(&log);
        let _leave = bus.on_drag_leave(move |e| {
            l3.borrow_mut().push((e.kind, e.draggable.clone(), e.drop_zone.location()))
        });

        let zone = DropZoneRef::new(Location::new("list", 1));
        bus.emit_drag_start(p(), d.clone());
        bus.emit_drag_enter(p(), zone.clone());
        bus.emit_drag_over(p(), zone.clone());
        bus.emit_drag_leave(p(), zone);

        let log = log.borrow();
        let kinds: Vec<_> = log.iter().map(|(k, _, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                DragEventKind::DragEnter,
                DragEventKind::DragOver,
                DragEventKind::DragLeave
            ]
        );
        assert!(log.iter().all(|(_, dd, _)| dd.as_ref() == Some(&d)));
        assert!(log.iter().all(|(_, _, l)| *l == Location::new("list", 1)));
    }

    #[test]
    fn permissive_drag_end_while_idle_propagates_none() {
        let bus = DragBus::with_policy(SequencingPolicy::Permissive);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = bus.on_drag_end(move |e| seen_clone.borrow_mut().push(e.draggable.is_none()));

        bus.emit_drag_end(p());
        assert_eq!(*seen.borrow(), vec![true]);
        assert!(!bus.is_active());
    }

    #[test]
    fn warn_policy_drag_while_idle_propagates_none() {
        let bus = DragBus::with_policy(SequencingPolicy::Warn);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = bus.on_drag(move |e| seen_clone.borrow_mut().push(e.draggable.is_none()));

        bus.emit_drag(p());
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn permissive_restart_overwrites_item() {
        let bus = DragBus::with_policy(SequencingPolicy::Permissive);
        let (a, b) = (item("a"), item("b"));
        bus.emit_drag_start(p(), a);
        bus.emit_drag_start(p(), b.clone());
        assert_eq!(bus.in_transit(), Some(b));
    }

    #[test]
    fn reject_keeps_current_item_and_drops_stray_end() {
        let bus = DragBus::with_policy(SequencingPolicy::Reject);
        let ends = Rc::new(RefCell::new(0u32));
        let ends_clone = Rc::clone(&ends);
        let _sub = bus.on_drag_end(move |_| *ends_clone.borrow_mut() += 1);

        bus.emit_drag_end(p());
        assert_eq!(*ends.borrow(), 0);

        let (a, b) = (item("a"), item("b"));
        bus.emit_drag_start(p(), a.clone());
        bus.emit_drag_start(p(), b);
        assert_eq!(bus.in_transit(), Some(a));

        bus.emit_drag_end(p());
        assert_eq!(*ends.borrow(), 1);
    }

    #[test]
    fn remove_and_insert_leave_state_alone() {
        let bus = DragBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let _r = bus.on_remove(move |e| l1.borrow_mut().push(e.kind));
        let l2 = Rc::clone(&log);
        let _i = bus.on_insert(move |e| l2.borrow_mut().push(e.kind));

        let d = item("d");
        bus.emit_remove(d.clone());
        bus.emit_insert(d);
        assert_eq!(
            *log.borrow(),
            vec![DragEventKind::Remove, DragEventKind::Insert]
        );
        assert!(!bus.is_active());
    }

    #[test]
    fn clones_share_state() {
        let bus = DragBus::new();
        let other = bus.clone();
        bus.emit_drag_start(p(), item("d"));
        assert!(other.is_active());
    }
}
