#![forbid(unsafe_code)]

//! Drag lifecycle events.
//!
//! A single gesture produces:
//!
//! ```text
//! dragstart → drag* → [dragenter → dragover* → dragleave]* → dragend
//! ```
//!
//! `remove` and `insert` are independent confirmation signals emitted by
//! whoever applies a relocation; they are not part of the pointer lifecycle.

use std::fmt;

use crate::handle::{DraggableRef, DropZoneRef};
use crate::identity::Identity;
use crate::location::Location;

/// Raw pointer sample that triggered an event. Opaque to the engine; it is
/// only carried through to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub pointer_id: u32,
    pub timestamp_ms: u64,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            pointer_id: 0,
            timestamp_ms: 0,
        }
    }

    #[must_use]
    pub const fn with_pointer_id(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    #[must_use]
    pub const fn at_time(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Tag shared by every drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    DragStart,
    Drag,
    DragEnter,
    DragOver,
    DragLeave,
    DragEnd,
    Remove,
    Insert,
}

impl DragEventKind {
    pub const ALL: [Self; 8] = [
        Self::DragStart,
        Self::Drag,
        Self::DragEnter,
        Self::DragOver,
        Self::DragLeave,
        Self::DragEnd,
        Self::Remove,
        Self::Insert,
    ];

    /// Canonical lowercase event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::Drag => "drag",
            Self::DragEnter => "dragenter",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::DragEnd => "dragend",
            Self::Remove => "remove",
            Self::Insert => "insert",
        }
    }

    /// Parse a canonical name back into a kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// `true` for events that carry a drop zone.
    #[must_use]
    pub const fn targets_drop_zone(self) -> bool {
        matches!(self, Self::DragEnter | Self::DragOver | Self::DragLeave)
    }
}

impl fmt::Display for DragEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `dragstart`, `drag` and `dragend`.
///
/// `draggable` is whatever was in transit when the event was published;
/// `None` if the bus was idle.
#[derive(Debug, Clone)]
pub struct DragEvent {
    pub kind: DragEventKind,
    pub pointer: PointerEvent,
    pub draggable: Option<DraggableRef>,
}

impl DragEvent {
    #[must_use]
    pub fn new(kind: DragEventKind, pointer: PointerEvent, draggable: Option<DraggableRef>) -> Self {
        Self {
            kind,
            pointer,
            draggable,
        }
    }
}

/// `dragenter`, `dragover` and `dragleave`: a [`DragEvent`] plus the drop
/// zone under the pointer.
#[derive(Debug, Clone)]
pub struct DropZoneEvent {
    pub kind: DragEventKind,
    pub pointer: PointerEvent,
    pub draggable: Option<DraggableRef>,
    pub drop_zone: DropZoneRef,
}

pub type DragEnterEvent = DropZoneEvent;
pub type DragOverEvent = DropZoneEvent;
pub type DragLeaveEvent = DropZoneEvent;

impl DropZoneEvent {
    #[must_use]
    pub fn enter(
        pointer: PointerEvent,
        draggable: Option<DraggableRef>,
        drop_zone: DropZoneRef,
    ) -> Self {
        Self::with_kind(DragEventKind::DragEnter, pointer, draggable, drop_zone)
    }

    #[must_use]
    pub fn over(
        pointer: PointerEvent,
        draggable: Option<DraggableRef>,
        drop_zone: DropZoneRef,
    ) -> Self {
        Self::with_kind(DragEventKind::DragOver, pointer, draggable, drop_zone)
    }

    #[must_use]
    pub fn leave(
        pointer: PointerEvent,
        draggable: Option<DraggableRef>,
        drop_zone: DropZoneRef,
    ) -> Self {
        Self::with_kind(DragEventKind::DragLeave, pointer, draggable, drop_zone)
    }

    fn with_kind(
        kind: DragEventKind,
        pointer: PointerEvent,
        draggable: Option<DraggableRef>,
        drop_zone: DropZoneRef,
    ) -> Self {
        Self {
            kind,
            pointer,
            draggable,
            drop_zone,
        }
    }
}

/// `remove` and `insert`: a draggable left or entered a container.
#[derive(Debug, Clone)]
pub struct TransferEvent {
    pub kind: DragEventKind,
    pub draggable: DraggableRef,
}

pub type RemoveEvent = TransferEvent;
pub type InsertEvent = TransferEvent;

impl TransferEvent {
    #[must_use]
    pub fn new(kind: DragEventKind, draggable: DraggableRef) -> Self {
        Self { kind, draggable }
    }
}

/// Decision that `draggable` must move to `droppable` at `index`.
///
/// `index` is already corrected for the removal of the draggable from its
/// current position, i.e. it is the slot to insert at *after* removing.
/// `None` means append.
#[derive(Debug, Clone, PartialEq)]
pub struct RelocationEvent {
    pub pointer: PointerEvent,
    pub draggable: DraggableRef,
    pub droppable: Identity,
    pub index: Option<usize>,
}

impl RelocationEvent {
    /// Target as a [`Location`].
    #[must_use]
    pub fn target(&self) -> Location {
        Location {
            droppable: self.droppable.clone(),
            index: self.index,
        }
    }
}
