//! The resolution coordinator: one in-flight load session.
//!
//! A [`LoadSession`] composes the object store, the deferred-reference
//! index, and a borrowed descriptor registry. A decoder drives it
//! sequentially: add each materialized object, then declare every
//! relationship field with [`LoadSession::resolve_or_defer`]. References to
//! objects that have not arrived yet are parked and wired the instant the
//! target is added; after the stream ends, the completeness report names
//! whatever never arrived.
//!
//! A session represents exactly one load. It is single-threaded by
//! construction (`&mut self` throughout); a new load requires a fresh
//! session, and cancellation is dropping the session.

use std::collections::{BTreeSet, HashSet};

use crate::deferred::DeferredReferenceIndex;
use crate::error::{SessionError, SessionResult, WireError};
use crate::model::{NetworkObject, ObjectKind};
use crate::mrid::Mrid;
use crate::registry::{RelationshipDescriptor, ResolverRegistry};
use crate::report::{LoadReport, LoadStats};
use crate::store::NetworkStore;

/// Outcome of presenting one reference to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Both endpoints existed; the relationship is fully wired.
    Resolved,
    /// The target has not materialized; the wiring is queued under its mRID.
    Deferred,
    /// The target id was blank or absent: no relationship, nothing queued.
    Skipped,
    /// This (source, relationship, target) triple was already presented;
    /// nothing was re-wired or re-queued.
    Duplicate,
}

/// Identity of one presented reference, for duplicate suppression.
type TripleKey = (Mrid, ObjectKind, &'static str, Mrid);

/// Coordinates resolve-or-defer across one load session.
#[derive(Debug)]
pub struct LoadSession<'r> {
    registry: &'r ResolverRegistry,
    store: NetworkStore,
    deferred: DeferredReferenceIndex<'r>,
    seen: HashSet<TripleKey>,
    stats: LoadStats,
}

impl<'r> LoadSession<'r> {
    /// Creates a fresh session over the given descriptor registry.
    #[must_use]
    pub fn new(registry: &'r ResolverRegistry) -> Self {
        Self {
            registry,
            store: NetworkStore::new(),
            deferred: DeferredReferenceIndex::new(),
            seen: HashSet::new(),
            stats: LoadStats::default(),
        }
    }

    /// Adds a materialized object and drains every resolution queued for
    /// its mRID.
    ///
    /// Returns `Ok(false)` if an object with the same mRID already exists;
    /// the existing object is untouched and no drain runs. Returns
    /// `Ok(true)` once the object is stored and its queue fully drained.
    /// Add-then-drain is one step from the caller's perspective: there is
    /// no point where the object is observable as present but undrained.
    ///
    /// # Errors
    ///
    /// A wiring failure during the drain. The drain still attempts every
    /// queued resolution before the first failure is returned, so the
    /// queue is consumed exactly once either way.
    pub fn add(&mut self, object: impl Into<NetworkObject>) -> SessionResult<bool> {
        let object = object.into();
        let mrid = object.mrid().clone();
        if !self.store.add_object(object) {
            self.stats.duplicate_objects += 1;
            return Ok(false);
        }
        self.stats.objects_added += 1;
        self.drain(&mrid)?;
        Ok(true)
    }

    /// Wires `relationship` from `source` to `target`, or queues it until
    /// the target materializes.
    ///
    /// A `None` or blank target means "no relationship" and is skipped. A
    /// triple already presented, whether wired or still queued, is
    /// suppressed as [`Resolution::Duplicate`].
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownSource`] if `source` was never added (the
    /// decoder must add an object before declaring its references);
    /// [`SessionError::UnknownRelationship`] if the registry has no
    /// descriptor under (source kind, `relationship`); any [`WireError`]
    /// raised on the immediate wiring path.
    pub fn resolve_or_defer(
        &mut self,
        source: &Mrid,
        relationship: &str,
        target: Option<&str>,
    ) -> SessionResult<Resolution> {
        let Some(raw) = target else {
            self.stats.references_skipped += 1;
            return Ok(Resolution::Skipped);
        };
        let target = Mrid::new(raw.trim());
        if target.is_blank() {
            self.stats.references_skipped += 1;
            return Ok(Resolution::Skipped);
        }

        let source_kind = self
            .store
            .get(source.as_str())
            .ok_or_else(|| SessionError::UnknownSource {
                mrid: source.clone(),
            })?
            .kind();

        let descriptor = self
            .registry
            .descriptor(source_kind, relationship)
            .ok_or_else(|| SessionError::UnknownRelationship {
                source_kind,
                relationship: relationship.to_string(),
            })?;

        let key: TripleKey = (
            source.clone(),
            descriptor.source_kind,
            descriptor.name,
            target.clone(),
        );
        if self.seen.contains(&key) {
            self.stats.references_duplicated += 1;
            return Ok(Resolution::Duplicate);
        }
        self.seen.insert(key);

        if self.store.contains(target.as_str()) {
            self.wire(source, descriptor, &target)?;
            self.stats.references_resolved += 1;
            Ok(Resolution::Resolved)
        } else {
            self.deferred.defer(target, source.clone(), descriptor);
            self.stats.references_deferred += 1;
            Ok(Resolution::Deferred)
        }
    }

    /// mRIDs that were referenced but never added, sorted.
    #[must_use]
    pub fn unresolved_reference_ids(&self) -> BTreeSet<Mrid> {
        self.deferred.unresolved_ids()
    }

    /// Total wiring actions still awaiting a target.
    ///
    /// Deferred entries live for the whole session; callers loading very
    /// large partial extracts can watch this to impose their own bound.
    #[must_use]
    pub fn pending_reference_count(&self) -> usize {
        self.deferred.pending_count()
    }

    /// Snapshot of the session's completeness, typically taken once the
    /// input stream is exhausted.
    #[must_use]
    pub fn report(&self) -> LoadReport {
        LoadReport::collect(self.stats, &self.deferred)
    }

    /// The populated object store.
    #[must_use]
    pub fn store(&self) -> &NetworkStore {
        &self.store
    }

    /// Looks up an object by mRID.
    #[must_use]
    pub fn get(&self, mrid: &str) -> Option<&NetworkObject> {
        self.store.get(mrid)
    }

    /// Looks up an object by mRID, requiring a specific kind.
    #[must_use]
    pub fn get_of_kind(&self, mrid: &str, kind: ObjectKind) -> Option<&NetworkObject> {
        self.store.get_of_kind(mrid, kind)
    }

    /// Returns true if an object with this mRID has been added.
    #[must_use]
    pub fn contains(&self, mrid: &str) -> bool {
        self.store.contains(mrid)
    }

    /// The registry this session resolves against.
    #[must_use]
    pub fn registry(&self) -> &'r ResolverRegistry {
        self.registry
    }

    /// Pops everything queued under `target` and wires it in FIFO order.
    ///
    /// Failures do not abort the drain: every queued resolution is
    /// attempted so the queue is consumed exactly once, and the first
    /// failure is returned after the queue is exhausted.
    fn drain(&mut self, target: &Mrid) -> SessionResult<()> {
        let pending = self.deferred.take(target.as_str());
        let mut first_failure: Option<SessionError> = None;

        for (source, descriptor) in pending {
            match self.wire(&source, descriptor, target) {
                Ok(()) => self.stats.references_resolved += 1,
                Err(err) => {
                    tracing::warn!(
                        source = %source,
                        relationship = descriptor.name,
                        target = %target,
                        error = %err,
                        "deferred wiring failed during drain"
                    );
                    first_failure.get_or_insert(err);
                }
            }
        }

        first_failure.map_or(Ok(()), Err)
    }

    /// Applies forward then reverse wiring for one relationship.
    ///
    /// Both endpoint kinds are checked against the descriptor before
    /// either side is mutated, so the only failure path leaves no
    /// half-wired state behind.
    fn wire(
        &mut self,
        source: &Mrid,
        descriptor: &RelationshipDescriptor,
        target: &Mrid,
    ) -> SessionResult<()> {
        self.check_kind(source, descriptor.source_kind, descriptor.name)?;
        self.check_kind(target, descriptor.target_kind, descriptor.name)?;

        let src = self
            .store
            .get_mut(source.as_str())
            .ok_or_else(|| SessionError::UnknownSource {
                mrid: source.clone(),
            })?;
        descriptor.apply_forward(src, target)?;

        if descriptor.is_bidirectional() {
            let tgt = self
                .store
                .get_mut(target.as_str())
                .ok_or_else(|| SessionError::UnknownSource {
                    mrid: target.clone(),
                })?;
            descriptor.apply_reverse(tgt, source)?;
        }
        Ok(())
    }

    fn check_kind(
        &self,
        mrid: &Mrid,
        expected: ObjectKind,
        relationship: &'static str,
    ) -> SessionResult<()> {
        let Some(obj) = self.store.get(mrid.as_str()) else {
            return Err(SessionError::UnknownSource { mrid: mrid.clone() });
        };
        if obj.kind() == expected {
            Ok(())
        } else {
            Err(WireError::KindMismatch {
                relationship,
                expected,
                found: obj.kind(),
                mrid: mrid.clone(),
            }
            .into())
        }
    }
}
