//! End-of-load completeness reporting.
//!
//! Partial network extracts are frequently exchanged incomplete by design,
//! so a reference whose target never arrives is an advisory, not a failure.
//! Once the input stream is exhausted, callers snapshot a [`LoadReport`]
//! and decide what a non-empty `unresolved` list means for them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::deferred::DeferredReferenceIndex;
use crate::mrid::Mrid;

/// Counters accumulated over one load session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Objects accepted into the store.
    pub objects_added: usize,
    /// Adds rejected because the mRID was already taken.
    pub duplicate_objects: usize,
    /// References wired, whether immediately or on a later drain.
    pub references_resolved: usize,
    /// References queued at least once for a not-yet-present target.
    pub references_deferred: usize,
    /// References skipped because the target id was blank or absent.
    pub references_skipped: usize,
    /// Repeat presentations of an already-seen reference triple.
    pub references_duplicated: usize,
}

/// One reference still waiting on an unresolved target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitingReference {
    /// The object that declared the reference.
    pub source: Mrid,
    /// Name of the relationship that could not be wired.
    pub relationship: String,
}

/// A target mRID that was referenced but never materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    /// The awaited target mRID.
    pub target: Mrid,
    /// References waiting on it, in declaration order.
    pub waiting: Vec<WaitingReference>,
}

/// Snapshot of a session's completeness at end of load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Session counters.
    pub stats: LoadStats,
    /// Dangling references, sorted by target mRID.
    pub unresolved: Vec<UnresolvedReference>,
}

impl LoadReport {
    pub(crate) fn collect(stats: LoadStats, deferred: &DeferredReferenceIndex<'_>) -> Self {
        let mut by_target: BTreeMap<Mrid, Vec<WaitingReference>> = BTreeMap::new();
        for (target, pending) in deferred.waiting() {
            by_target
                .entry(target.clone())
                .or_default()
                .push(WaitingReference {
                    source: pending.source.clone(),
                    relationship: pending.descriptor.name.to_string(),
                });
        }

        let unresolved = by_target
            .into_iter()
            .map(|(target, waiting)| UnresolvedReference { target, waiting })
            .collect();

        Self { stats, unresolved }
    }

    /// Returns true if every declared reference found its target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Total references still dangling across all targets.
    #[must_use]
    pub fn dangling_reference_count(&self) -> usize {
        self.unresolved.iter().map(|u| u.waiting.len()).sum()
    }
}
