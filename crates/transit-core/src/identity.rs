#![forbid(unsafe_code)]

//! Stable string identities for draggables and droppables.

use std::borrow::Borrow;
use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Opaque string key naming a draggable or droppable for the lifetime of
/// its registration.
///
/// Hashes and compares exactly like the underlying `str`, so registries keyed
/// by `Identity` can be queried with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize), serde(transparent))]
pub struct Identity(String);

impl Identity {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identity {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for Identity {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl PartialEq<str> for Identity {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identity {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Hands out fresh identities of the form `{prefix}-{n}`.
///
/// Used by callers that need a new key after losing a registration race.
#[derive(Debug, Clone)]
pub struct IdentityAllocator {
    prefix: String,
    next: u64,
}

impl IdentityAllocator {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Produce the next identity. Never repeats for a given allocator.
    pub fn next_identity(&mut self) -> Identity {
        let id = Identity(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }

    /// Number of identities handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next
    }
}
