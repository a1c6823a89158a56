#![forbid(unsafe_code)]

//! Relocation: deciding where a dragged item goes when the pointer enters a
//! drop zone.
//!
//! # Algorithm
//!
//! For every `dragenter` with target `(droppable, index)`:
//!
//! 1. **Index correction.** If the draggable currently sits in the same
//!    container *before* the target slot, the target index is decremented.
//!    Removing the item first shifts every later slot down by one, so
//!    without the correction every move towards the end of the same list
//!    would land one slot too far.
//! 2. **Change test.** A [`RelocationEvent`] is produced only if the
//!    container differs or the corrected index differs from the current one.
//!    Re-entering the slot the item already occupies is a no-op.
//!
//! # Invariants
//!
//! 1. `origin()` is `None` before the first `dragstart`, equals the
//!    draggable's location right after `dragstart`, and is `None` again after
//!    `dragend`.
//! 2. Relocations are mirrored 1:1 from `dragenter` events: every enter
//!    produces exactly one `Some` or `None`.
//! 3. A `dragenter` without a draggable (bus idle) yields `None`.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};
use transit_reactive::Subscription;

use crate::bus::DragBus;
use crate::event::{DragEnterEvent, RelocationEvent};
use crate::handle::Draggable;
use crate::location::Location;

/// Target index after accounting for the removal of `draggable` from its
/// current slot.
#[must_use]
pub fn drop_index(draggable: &dyn Draggable, target: &Location) -> Option<usize> {
    let same_container = draggable.droppable().as_ref() == Some(&target.droppable);
    match (target.index, draggable.index()) {
        (Some(slot), Some(current)) if same_container && current < slot => Some(slot - 1),
        (slot, _) => slot,
    }
}

/// Compute the relocation for a single `dragenter`, or `None` when the item
/// would stay where it is.
#[must_use]
pub fn relocation_for(event: &DragEnterEvent) -> Option<RelocationEvent> {
    let Some(draggable) = event.draggable.as_ref() else {
        trace!("dragenter without draggable; no relocation");
        return None;
    };
    let target = event.drop_zone.location();
    let index = drop_index(&**draggable, &target);

    let moves_container = draggable.droppable().as_ref() != Some(&target.droppable);
    if !moves_container && draggable.index() == index {
        trace!(draggable = %draggable.id(), zone = %target, "same slot; no relocation");
        return None;
    }

    debug!(
        draggable = %draggable.id(),
        droppable = %target.droppable,
        index = ?index,
        "relocation"
    );
    Some(RelocationEvent {
        pointer: event.pointer,
        draggable: draggable.clone(),
        droppable: target.droppable,
        index,
    })
}

/// Tracks the origin of the current drag and turns `dragenter` events into
/// relocation decisions.
///
/// Lives as long as it is held; dropping it stops the origin bookkeeping.
pub struct RelocationCalculator {
    bus: DragBus,
    origin: Rc<RefCell<Option<Location>>>,
    _subs: Vec<Subscription>,
}

impl std::fmt::Debug for RelocationCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelocationCalculator")
            .field("origin", &self.origin.borrow())
            .finish_non_exhaustive()
    }
}

impl RelocationCalculator {
    #[must_use]
    pub fn new(bus: &DragBus) -> Self {
        let origin = Rc::new(RefCell::new(None));

        let on_start = Rc::clone(&origin);
        let start = bus.on_drag_start(move |e| {
            let location = e.draggable.as_ref().and_then(|d| d.location());
            trace!(origin = ?location, "origin captured");
            *on_start.borrow_mut() = location;
        });

        let on_end = Rc::clone(&origin);
        let end = bus.on_drag_end(move |_| {
            on_end.borrow_mut().take();
        });

        Self {
            bus: bus.clone(),
            origin,
            _subs: vec![start, end],
        }
    }

    /// Where the current drag began, if a drag is in progress.
    #[must_use]
    pub fn origin(&self) -> Option<Location> {
        self.origin.borrow().clone()
    }

    /// Relocation decision for one `dragenter` event.
    #[must_use]
    pub fn compute(&self, event: &DragEnterEvent) -> Option<RelocationEvent> {
        relocation_for(event)
    }

    /// Observe relocation decisions, one per `dragenter`.
    ///
    /// The decision is computed lazily inside each subscriber's callback, at
    /// the moment the `dragenter` is delivered.
    pub fn on_relocation(
        &self,
        callback: impl Fn(Option<&RelocationEvent>) + 'static,
    ) -> Subscription {
        self.bus
            .on_drag_enter(move |e| callback(relocation_for(e).as_ref()))
    }
}
