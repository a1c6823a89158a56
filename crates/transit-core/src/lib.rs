#![forbid(unsafe_code)]

//! Transit Core: drag coordination engine.
//!
//! # Role in Transit
//! `transit-core` sits between a view layer (which detects pointer input and
//! hit-tests drop zones) and the lists that own the draggable items. It
//! broadcasts the drag lifecycle, tracks which item is in transit, and turns
//! `dragenter` events into reorder decisions. It never renders and never
//! mutates application data itself.
//!
//! # Primary responsibilities
//! - **Registry**: uniqueness-enforcing store of draggables and droppables.
//! - **DragBus**: lifecycle channels, in-transit state, gated listeners.
//! - **RelocationCalculator**: index-corrected relocation decisions.
//! - **Board**: headless list model that applies relocations.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --drag_start(d)--> InTransit(d) --drag / enter / over / leave--> InTransit(d)
//!   ^                                                                        |
//!   +------------------------------- drag_end ------------------------------+
//! ```
//!
//! All delivery is synchronous and single-threaded; see `transit-reactive`.

pub mod board;
pub mod bus;
pub mod config;
pub mod event;
pub mod gate;
pub mod handle;
pub mod identity;
pub mod location;
pub mod registry;
pub mod relocation;

#[cfg(feature = "logging")]
pub mod logging;

pub use board::Board;
pub use bus::{DragBus, DragState};
#[cfg(feature = "config")]
pub use config::ConfigError;
pub use config::{LogFormat, LoggingConfig, SequencingPolicy, TransitConfig};
pub use event::{
    DragEnterEvent, DragEvent, DragEventKind, DragLeaveEvent, DragOverEvent, DropZoneEvent,
    InsertEvent, PointerEvent, RelocationEvent, RemoveEvent, TransferEvent,
};
pub use gate::ScopedListener;
pub use handle::{Draggable, DraggableRef, DropZone, DropZoneRef, Droppable, DroppableRef};
pub use identity::{Identity, IdentityAllocator};
pub use location::Location;
pub use registry::Registry;
pub use relocation::{RelocationCalculator, drop_index, relocation_for};

pub use transit_reactive::{EventSource, EventTarget, Subscription};
