//! Queues of resolutions waiting for a target to materialize.
//!
//! When a reference names an mRID the store has not seen, the wiring action
//! is parked here under that mRID. The queues are strictly FIFO so that a
//! late-arriving target is wired in the original reference-declaration
//! order, which keeps the finished graph reproducible for any permutation
//! of the input stream.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::mrid::Mrid;
use crate::registry::RelationshipDescriptor;

/// One wiring action awaiting a single target mRID.
///
/// Several unrelated (source, descriptor) pairs may wait on the same
/// target; each gets its own entry in that target's queue.
#[derive(Debug, Clone, Copy)]
pub struct PendingResolution<'r> {
    /// The source object declaring the reference.
    pub source: &'r Mrid,
    /// How to wire the relationship once the target exists.
    pub descriptor: &'r RelationshipDescriptor,
}

/// Index of pending resolutions, keyed by the awaited target mRID.
///
/// An entry is created on the first unresolved reference to an mRID and
/// removed wholesale the instant that mRID is added; entries surviving to
/// end-of-load are the dangling references the completeness report names.
#[derive(Debug, Default)]
pub struct DeferredReferenceIndex<'r> {
    by_target: HashMap<Mrid, VecDeque<PendingEntry<'r>>>,
}

#[derive(Debug)]
struct PendingEntry<'r> {
    source: Mrid,
    descriptor: &'r RelationshipDescriptor,
}

impl<'r> DeferredReferenceIndex<'r> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a wiring action under the target it awaits.
    pub fn defer(&mut self, target: Mrid, source: Mrid, descriptor: &'r RelationshipDescriptor) {
        self.by_target
            .entry(target)
            .or_default()
            .push_back(PendingEntry { source, descriptor });
    }

    /// Removes and returns every action queued under `target`, in FIFO
    /// order. Subsequent calls for the same target return nothing, so a
    /// queue is drained exactly once.
    pub(crate) fn take(&mut self, target: &str) -> Vec<(Mrid, &'r RelationshipDescriptor)> {
        self.by_target
            .remove(target)
            .map(|queue| {
                queue
                    .into_iter()
                    .map(|entry| (entry.source, entry.descriptor))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns true if anything is queued under `target`.
    #[must_use]
    pub fn is_awaiting(&self, target: &str) -> bool {
        self.by_target.contains_key(target)
    }

    /// The mRIDs that were referenced but have not materialized, sorted for
    /// deterministic reporting.
    #[must_use]
    pub fn unresolved_ids(&self) -> BTreeSet<Mrid> {
        self.by_target.keys().cloned().collect()
    }

    /// Iterates over every queued action as (awaited target, action), in
    /// FIFO order within each target.
    pub fn waiting(&self) -> impl Iterator<Item = (&Mrid, PendingResolution<'_>)> {
        self.by_target.iter().flat_map(|(target, queue)| {
            queue.iter().map(move |entry| {
                (
                    target,
                    PendingResolution {
                        source: &entry.source,
                        descriptor: entry.descriptor,
                    },
                )
            })
        })
    }

    /// Number of distinct awaited target mRIDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    /// Total queued wiring actions across all targets.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.by_target.values().map(VecDeque::len).sum()
    }

    /// Returns true if nothing is awaiting resolution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ResolverRegistry;

    fn registry() -> ResolverRegistry {
        ResolverRegistry::network()
    }

    #[test]
    fn test_defer_and_take_fifo() {
        let registry = registry();
        let desc = registry
            .descriptor(
                crate::model::ObjectKind::Terminal,
                crate::registry::rel::TERMINAL_CONDUCTING_EQUIPMENT,
            )
            .unwrap();

        let mut index = DeferredReferenceIndex::new();
        index.defer(Mrid::new("ce1"), Mrid::new("t1"), desc);
        index.defer(Mrid::new("ce1"), Mrid::new("t2"), desc);
        index.defer(Mrid::new("ce1"), Mrid::new("t3"), desc);
        assert!(index.is_awaiting("ce1"));
        assert_eq!(index.pending_count(), 3);

        let drained = index.take("ce1");
        let sources: Vec<&str> = drained.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(sources, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_take_is_exactly_once() {
        let registry = registry();
        let desc = registry
            .descriptor(
                crate::model::ObjectKind::Terminal,
                crate::registry::rel::TERMINAL_CONNECTIVITY_NODE,
            )
            .unwrap();

        let mut index = DeferredReferenceIndex::new();
        index.defer(Mrid::new("cn1"), Mrid::new("t1"), desc);
        assert_eq!(index.take("cn1").len(), 1);
        assert!(index.take("cn1").is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_unresolved_ids_sorted() {
        let registry = registry();
        let desc = registry
            .descriptor(
                crate::model::ObjectKind::Feeder,
                crate::registry::rel::FEEDER_SUBSTATION,
            )
            .unwrap();

        let mut index = DeferredReferenceIndex::new();
        index.defer(Mrid::new("zeta"), Mrid::new("f1"), desc);
        index.defer(Mrid::new("alpha"), Mrid::new("f2"), desc);

        let ids: Vec<Mrid> = index.unresolved_ids().into_iter().collect();
        assert_eq!(ids, vec![Mrid::new("alpha"), Mrid::new("zeta")]);
    }

    #[test]
    fn test_take_unknown_target_is_empty() {
        let mut index = DeferredReferenceIndex::new();
        assert!(index.take("nothing-here").is_empty());
    }
}
