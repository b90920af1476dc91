//! The single source of truth for materialized objects.
//!
//! One `NetworkStore` holds every object of one load session, keyed by
//! mRID. Entries persist for the life of the session; nothing is removed
//! mid-load, and a second add under the same mRID is rejected rather than
//! overwritten.

use std::collections::HashMap;

use crate::model::{NetworkObject, ObjectKind};
use crate::mrid::Mrid;

/// mRID-keyed store of materialized network objects.
///
/// The store is a plain map; draining deferred references on add is the
/// [`LoadSession`](crate::session::LoadSession)'s job, so that add-then-drain
/// stays a single atomic step from the caller's point of view.
#[derive(Debug, Default)]
pub struct NetworkStore {
    by_id: HashMap<Mrid, NetworkObject>,
}

impl NetworkStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object, returning false if its mRID is already taken.
    ///
    /// The existing object is never overwritten; mRIDs are globally unique,
    /// so a clash with a different kind is still a duplicate.
    pub fn add_object(&mut self, object: NetworkObject) -> bool {
        let mrid = object.mrid().clone();
        if self.by_id.contains_key(&mrid) {
            return false;
        }
        self.by_id.insert(mrid, object);
        true
    }

    /// Looks up an object by mRID.
    #[must_use]
    pub fn get(&self, mrid: &str) -> Option<&NetworkObject> {
        self.by_id.get(mrid)
    }

    /// Looks up an object by mRID, requiring a specific kind.
    #[must_use]
    pub fn get_of_kind(&self, mrid: &str, kind: ObjectKind) -> Option<&NetworkObject> {
        self.by_id.get(mrid).filter(|obj| obj.kind() == kind)
    }

    pub(crate) fn get_mut(&mut self, mrid: &str) -> Option<&mut NetworkObject> {
        self.by_id.get_mut(mrid)
    }

    /// Returns true if an object with this mRID has been added.
    #[must_use]
    pub fn contains(&self, mrid: &str) -> bool {
        self.by_id.contains_key(mrid)
    }

    /// Number of objects in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no objects have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterates over all stored objects in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkObject> {
        self.by_id.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectivityNode, Terminal};

    #[test]
    fn test_add_and_get() {
        let mut store = NetworkStore::new();
        assert!(store.add_object(Terminal::new("t1").into()));
        assert!(store.contains("t1"));
        assert_eq!(store.len(), 1);

        let obj = store.get("t1").unwrap();
        assert_eq!(obj.kind(), ObjectKind::Terminal);
    }

    #[test]
    fn test_duplicate_add_rejected_without_overwrite() {
        let mut store = NetworkStore::new();
        let mut first = Terminal::new("t1");
        first.name = "original".to_string();
        assert!(store.add_object(first.into()));

        let mut second = Terminal::new("t1");
        second.name = "impostor".to_string();
        assert!(!store.add_object(second.into()));

        let kept = store.get("t1").unwrap().as_terminal().unwrap();
        assert_eq!(kept.name, "original");
    }

    #[test]
    fn test_duplicate_across_kinds_still_rejected() {
        let mut store = NetworkStore::new();
        assert!(store.add_object(Terminal::new("x").into()));
        assert!(!store.add_object(ConnectivityNode::new("x").into()));
        assert_eq!(store.get("x").unwrap().kind(), ObjectKind::Terminal);
    }

    #[test]
    fn test_get_of_kind_filters() {
        let mut store = NetworkStore::new();
        store.add_object(Terminal::new("t1").into());
        assert!(store.get_of_kind("t1", ObjectKind::Terminal).is_some());
        assert!(store.get_of_kind("t1", ObjectKind::Feeder).is_none());
        assert!(store.get_of_kind("missing", ObjectKind::Terminal).is_none());
    }

    #[test]
    fn test_empty_store() {
        let store = NetworkStore::new();
        assert!(store.is_empty());
        assert!(!store.contains("t1"));
        assert!(store.get("t1").is_none());
    }
}
