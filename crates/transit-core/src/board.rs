#![forbid(unsafe_code)]

//! Headless board: ordered lists of draggables that apply relocations.
//!
//! A [`Board`] plays the part of the view layer without rendering anything.
//! It owns the droppable and draggable registries for its scope, answers
//! the position queries of its items from its own ordering, and applies
//! [`RelocationEvent`]s by splicing, confirming each move on the bus with
//! `remove` followed by `insert`.
//!
//! # Example
//!
//! ```
//! use transit_core::{
//!     Board, DragBus, Draggable, DropZoneEvent, PointerEvent,
//!     RelocationCalculator,
//! };
//!
//! let bus = DragBus::new();
//! let calc = RelocationCalculator::new(&bus);
//! let mut board = Board::new(&bus);
//! board.add_droppable("todo").unwrap();
//! let a = board.add_draggable("todo").unwrap();
//! let b = board.add_draggable("todo").unwrap();
//!
//! bus.emit_drag_start(PointerEvent::default(), a.clone());
//! let zone = board.slot("todo", 2).unwrap();
//! let enter = DropZoneEvent::enter(
//!     PointerEvent::default(),
//!     Some(a.clone()),
//!     zone,
//! );
//! let relocation = calc.compute(&enter).unwrap();
//! assert!(board.apply(&relocation));
//! assert_eq!(board.items("todo").unwrap(), vec![b.id().clone(), a.id().clone()]);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::bus::DragBus;
use crate::event::RelocationEvent;
use crate::handle::{Draggable, DraggableRef, DropZoneRef, Droppable, DroppableRef};
use crate::identity::{Identity, IdentityAllocator};
use crate::location::Location;
use crate::registry::Registry;

#[derive(Debug, Default)]
struct BoardState {
    lists: Vec<(Identity, Vec<Identity>)>,
}

impl BoardState {
    fn list_index(&self, list: &str) -> Option<usize> {
        self.lists.iter().position(|(id, _)| id.as_str() == list)
    }

    fn list(&self, list: &str) -> Option<&Vec<Identity>> {
        self.lists
            .iter()
            .find(|(id, _)| id.as_str() == list)
            .map(|(_, items)| items)
    }

    /// `(list position, index within list)` of `item`.
    fn position(&self, item: &Identity) -> Option<(usize, usize)> {
        self.lists.iter().enumerate().find_map(|(l, (_, items))| {
            items.iter().position(|i| i == item).map(|idx| (l, idx))
        })
    }
}

struct BoardItem {
    id: Identity,
    state: Weak<RefCell<BoardState>>,
}

impl Draggable for BoardItem {
    fn id(&self) -> &Identity {
        &self.id
    }

    fn droppable(&self) -> Option<Identity> {
        let state = self.state.upgrade()?;
        let state = state.borrow();
        let (list, _) = state.position(&self.id)?;
        Some(state.lists[list].0.clone())
    }

    fn index(&self) -> Option<usize> {
        let state = self.state.upgrade()?;
        let state = state.borrow();
        state.position(&self.id).map(|(_, idx)| idx)
    }
}

struct BoardList {
    id: Identity,
    state: Weak<RefCell<BoardState>>,
}

impl Droppable for BoardList {
    fn id(&self) -> &Identity {
        &self.id
    }

    fn len(&self) -> usize {
        let Some(state) = self.state.upgrade() else {
            return 0;
        };
        state.borrow().list(self.id.as_str()).map_or(0, Vec::len)
    }
}

/// In-memory model of droppable lists and their draggable items.
pub struct Board {
    bus: DragBus,
    state: Rc<RefCell<BoardState>>,
    droppables: Registry<DroppableRef>,
    draggables: Registry<DraggableRef>,
    ids: IdentityAllocator,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("state", &self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl Board {
    #[must_use]
    pub fn new(bus: &DragBus) -> Self {
        Self {
            bus: bus.clone(),
            state: Rc::new(RefCell::new(BoardState::default())),
            droppables: Registry::new(),
            draggables: Registry::new(),
            ids: IdentityAllocator::new("item"),
        }
    }

    /// Add an empty list. `None` if the name is taken.
    pub fn add_droppable(&mut self, name: impl Into<Identity>) -> Option<DroppableRef> {
        let id = name.into();
        let list = DroppableRef::new(BoardList {
            id: id.clone(),
            state: Rc::downgrade(&self.state),
        });
        if !self.droppables.register(id.clone(), list.clone()) {
            debug!(droppable = %id, "droppable already registered");
            return None;
        }
        self.state.borrow_mut().lists.push((id, Vec::new()));
        Some(list)
    }

    /// Append a new item with a fresh identity to `list`.
    ///
    /// Identities already taken (e.g. by [`add_draggable_named`](Self::add_draggable_named))
    /// are skipped. `None` if `list` does not exist.
    pub fn add_draggable(&mut self, list: &str) -> Option<DraggableRef> {
        if !self.droppables.has(list) {
            return None;
        }
        loop {
            let id = self.ids.next_identity();
            if let Some(item) = self.add_draggable_named(list, id) {
                return Some(item);
            }
        }
    }

    /// Append a new item named `name` to `list`.
    ///
    /// `None` if `list` does not exist or `name` is already registered.
    pub fn add_draggable_named(
        &mut self,
        list: &str,
        name: impl Into<Identity>,
    ) -> Option<DraggableRef> {
        let id = name.into();
        let list_idx = self.state.borrow().list_index(list)?;
        let item = DraggableRef::new(BoardItem {
            id: id.clone(),
            state: Rc::downgrade(&self.state),
        });
        if !self.draggables.register(id.clone(), item.clone()) {
            debug!(draggable = %id, "draggable already registered");
            return None;
        }
        self.state.borrow_mut().lists[list_idx].1.push(id);
        Some(item)
    }

    /// Remove `item` from its list and unregister it.
    ///
    /// Returns `false` if the item was not on this board.
    pub fn remove_draggable(&mut self, item: &DraggableRef) -> bool {
        if !self.draggables.unregister(item) {
            return false;
        }
        let mut state = self.state.borrow_mut();
        if let Some((list, idx)) = state.position(item.id()) {
            state.lists[list].1.remove(idx);
        }
        true
    }

    #[must_use]
    pub fn draggable(&self, id: &str) -> Option<&DraggableRef> {
        self.draggables.get(id)
    }

    #[must_use]
    pub fn droppable(&self, id: &str) -> Option<&DroppableRef> {
        self.droppables.get(id)
    }

    /// Item identities of `list`, in order.
    #[must_use]
    pub fn items(&self, list: &str) -> Option<Vec<Identity>> {
        self.state.borrow().list(list).cloned()
    }

    /// Drop zone for inserting before position `index` of `list`
    /// (`index == len` means after the last item).
    #[must_use]
    pub fn slot(&self, list: &str, index: usize) -> Option<DropZoneRef> {
        self.droppables
            .has(list)
            .then(|| DropZoneRef::new(Location::new(list, index)))
    }

    /// Container-level drop zone: append to `list`.
    #[must_use]
    pub fn tail(&self, list: &str) -> Option<DropZoneRef> {
        self.droppables
            .has(list)
            .then(|| DropZoneRef::new(Location::append(list)))
    }

    /// Move the draggable as decided by `event`, emitting `remove` then
    /// `insert` on the bus.
    ///
    /// The target index is interpreted after removal; indices past the end
    /// and an absent index append. Returns `false` (and changes nothing) if
    /// the item or the target list is unknown.
    pub fn apply(&mut self, event: &RelocationEvent) -> bool {
        let id = event.draggable.id().clone();
        {
            let mut state = self.state.borrow_mut();
            let Some((from, idx)) = state.position(&id) else {
                warn!(draggable = %id, "relocation for unknown draggable");
                return false;
            };
            if state.list_index(event.droppable.as_str()).is_none() {
                warn!(droppable = %event.droppable, "relocation into unknown droppable");
                return false;
            }
            state.lists[from].1.remove(idx);
        }
        self.bus.emit_remove(event.draggable.clone());

        {
            let mut state = self.state.borrow_mut();
            let Some(to) = state.list_index(event.droppable.as_str()) else {
                return false;
            };
            let items = &mut state.lists[to].1;
            match event.index {
                Some(i) if i < items.len() => items.insert(i, id.clone()),
                _ => items.push(id.clone()),
            }
        }
        debug!(draggable = %id, target = %event.target(), "relocation applied");
        self.bus.emit_insert(event.draggable.clone());
        true
    }
}
