#![forbid(unsafe_code)]

//! Uniqueness-enforcing keyed store for live draggable/droppable instances.
//!
//! # Invariants
//!
//! 1. A key already present is never overwritten by [`Registry::register`];
//!    the call reports `false` and leaves the registry untouched.
//! 2. [`Registry::unregister`] removes by value, not by key, with a linear
//!    scan. Removing an absent value reports `false`.
//!
//! Neither conflict is an error: callers decide how to react (e.g. pick a
//! fresh [`Identity`] from an [`IdentityAllocator`](crate::IdentityAllocator)).
//!
//! # Example
//!
//! ```
//! use transit_core::Registry;
//!
//! let mut reg = Registry::new();
//! assert!(reg.register("list-a", 1));
//! assert!(!reg.register("list-a", 2));
//! assert_eq!(reg.get("list-a"), Some(&1));
//!
//! assert!(reg.unregister(&1));
//! assert!(!reg.unregister(&1));
//! ```

use ahash::AHashMap;

use crate::identity::Identity;

/// Mapping from [`Identity`] to `T` that refuses to overwrite existing keys.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: AHashMap<Identity, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: AHashMap::new(),
        }
    }

    /// Bind `value` to `key`.
    ///
    /// Returns `true` if stored, `false` if the key is already taken.
    pub fn register(&mut self, key: impl Into<Identity>, value: T) -> bool {
        let key = key.into();
        if self.items.contains_key(&key) {
            return false;
        }
        self.items.insert(key, value);
        true
    }

    /// The value bound to `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.get(key)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: PartialEq> Registry<T> {
    /// Remove the binding whose value equals `value`.
    ///
    /// Returns `true` if a binding was removed, `false` if `value` was not
    /// registered.
    pub fn unregister(&mut self, value: &T) -> bool {
        let key = self
            .items
            .iter()
            .find_map(|(k, v)| (v == value).then(|| k.clone()));
        match key {
            Some(k) => self.items.remove(&k).is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_refuses_taken_key() {
        let mut reg = Registry::new();
        assert!(reg.register("k", "v1"));
        assert!(!reg.register("k", "v2"));
        assert_eq!(reg.get("k"), Some(&"v1"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unregister_is_by_value() {
        let mut reg = Registry::new();
        reg.register("a", 10);
        reg.register("b", 20);

        assert!(reg.unregister(&20));
        assert!(!reg.has("b"));
        assert!(reg.has("a"));
    }

    #[test]
    fn unregister_twice_reports_miss() {
        let mut reg = Registry::new();
        reg.register("a", 10);
        assert!(reg.unregister(&10));
        assert!(!reg.unregister(&10));
        assert!(reg.is_empty());
    }

    #[test]
    fn unregister_absent_value() {
        let mut reg: Registry<i32> = Registry::new();
        assert!(!reg.unregister(&1));
    }

    #[test]
    fn key_is_free_again_after_unregister() {
        let mut reg = Registry::new();
        reg.register("a", 1);
        reg.unregister(&1);
        assert!(reg.register("a", 2));
        assert_eq!(reg.get("a"), Some(&2));
    }

    #[test]
    fn get_missing_key() {
        let reg: Registry<u8> = Registry::default();
        assert_eq!(reg.get("nope"), None);
        assert!(!reg.has("nope"));
    }
}
