#![forbid(unsafe_code)]

//! Container/slot pairs.

use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// "Item sits in container `droppable` at position `index`."
///
/// An absent `index` means "append at end" or "container level, no specific
/// slot".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Location {
    pub droppable: Identity,
    pub index: Option<usize>,
}

impl Location {
    #[must_use]
    pub fn new(droppable: impl Into<Identity>, index: usize) -> Self {
        Self {
            droppable: droppable.into(),
            index: Some(index),
        }
    }

    /// Container-level location without a slot.
    #[must_use]
    pub fn append(droppable: impl Into<Identity>) -> Self {
        Self {
            droppable: droppable.into(),
            index: None,
        }
    }

    /// `true` if `other` names the same container.
    #[must_use]
    pub fn same_container(&self, other: &Self) -> bool {
        self.droppable == other.droppable
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{i}]", self.droppable),
            None => write!(f, "{}[end]", self.droppable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Location::new("a", 2).to_string(), "a[2]");
        assert_eq!(Location::append("a").to_string(), "a[end]");
    }

    #[test]
    fn same_container_ignores_index() {
        assert!(Location::new("a", 0).same_container(&Location::append("a")));
        assert!(!Location::new("a", 0).same_container(&Location::new("b", 0)));
    }
}
