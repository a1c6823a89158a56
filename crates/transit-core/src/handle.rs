#![forbid(unsafe_code)]

//! Query seams to the view layer that owns the actual draggable items,
//! their containers and the insertion slots between them.
//!
//! The engine never caches what these report: [`Draggable::droppable`] and
//! [`Draggable::index`] are read at the moment a decision is made, so they
//! must reflect the current ordering.
//!
//! Handles ([`DraggableRef`], [`DroppableRef`], [`DropZoneRef`]) are `Rc`
//! wrappers whose equality is pointer identity. Two handles are equal iff
//! they refer to the same live instance.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::identity::Identity;
use crate::location::Location;

/// An item that can be picked up.
pub trait Draggable {
    /// Registration key of this item.
    fn id(&self) -> &Identity;

    /// Identity of the container currently holding the item, if any.
    fn droppable(&self) -> Option<Identity>;

    /// Current position within [`droppable`](Self::droppable), if any.
    fn index(&self) -> Option<usize>;

    /// Current container and position, or `None` when detached.
    fn location(&self) -> Option<Location> {
        Some(Location {
            droppable: self.droppable()?,
            index: self.index(),
        })
    }
}

/// A container owning an ordered sequence of draggables.
pub trait Droppable {
    fn id(&self) -> &Identity;

    /// Number of draggables currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A specific insertion slot exposed by a droppable.
pub trait DropZone {
    fn location(&self) -> Location;
}

/// A fixed location is its own drop zone.
impl DropZone for Location {
    fn location(&self) -> Location {
        self.clone()
    }
}

macro_rules! shared_handle {
    ($(#[$meta:meta])* $name:ident => $trait:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Rc<dyn $trait>);

        impl $name {
            #[must_use]
            pub fn new(value: impl $trait + 'static) -> Self {
                Self(Rc::new(value))
            }

            #[must_use]
            pub fn from_rc(value: Rc<dyn $trait>) -> Self {
                Self(value)
            }

            /// `true` if both handles point at the same instance.
            #[must_use]
            pub fn ptr_eq(&self, other: &Self) -> bool {
                Rc::ptr_eq(&self.0, &other.0)
            }
        }

        impl Deref for $name {
            type Target = dyn $trait;

            fn deref(&self) -> &Self::Target {
                &*self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.ptr_eq(other)
            }
        }

        impl Eq for $name {}
    };
}

shared_handle!(
    /// Shared handle to a [`Draggable`].
    DraggableRef => Draggable
);
shared_handle!(
    /// Shared handle to a [`Droppable`].
    DroppableRef => Droppable
);
shared_handle!(
    /// Shared handle to a [`DropZone`].
    DropZoneRef => DropZone
);

impl fmt::Debug for DraggableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DraggableRef").field(&self.id().as_str()).finish()
    }
}

impl fmt::Debug for DroppableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DroppableRef").field(&self.id().as_str()).finish()
    }
}

impl fmt::Debug for DropZoneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DropZoneRef").field(&self.location()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        id: Identity,
        at: Option<Location>,
    }

    impl Draggable for Fixed {
        fn id(&self) -> &Identity {
            &self.id
        }

        fn droppable(&self) -> Option<Identity> {
            self.at.as_ref().map(|l| l.droppable.clone())
        }

        fn index(&self) -> Option<usize> {
            self.at.as_ref().and_then(|l| l.index)
        }
    }

    #[test]
    fn equality_is_pointer_identity() {
        let a = DraggableRef::new(Fixed {
            id: "x".into(),
            at: None,
        });
        let b = DraggableRef::new(Fixed {
            id: "x".into(),
            at: None,
        });
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn default_location_combines_queries() {
        let d = Fixed {
            id: "x".into(),
            at: Some(Location::new("list", 3)),
        };
        assert_eq!(d.location(), Some(Location::new("list", 3)));

        let detached = Fixed {
            id: "y".into(),
            at: None,
        };
        assert_eq!(detached.location(), None);
    }

    #[test]
    fn location_is_a_drop_zone() {
        let zone = DropZoneRef::new(Location::append("list"));
        assert_eq!(zone.location(), Location::append("list"));
        assert!(format!("{zone:?}").contains("list"));
    }
}
