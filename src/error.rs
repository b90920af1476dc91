//! Error types for gridlink.
//!
//! All errors are strongly typed using thiserror. Note what is *not* an
//! error here: a duplicate add is reported through the `add` return value,
//! and a reference whose target never arrives is normal load state surfaced
//! only by the end-of-load completeness report.

use thiserror::Error;

use crate::model::ObjectKind;
use crate::mrid::Mrid;

/// Failures raised while applying a relationship descriptor's wiring
/// functions to a pair of objects.
///
/// A wiring failure is fatal to that single wiring attempt only; it
/// propagates to the immediate caller, which owns per-record failure
/// isolation.
#[derive(Debug, Error)]
pub enum WireError {
    /// The object on one end of the relationship is not the kind the
    /// descriptor expects. This indicates a miswired catalogue or a
    /// producer reusing an mRID across kinds.
    #[error("{relationship}: expected {expected} for {mrid}, found {found}")]
    KindMismatch {
        /// Relationship being wired.
        relationship: &'static str,
        /// Kind the descriptor expects at this end.
        expected: ObjectKind,
        /// Kind actually stored under the mRID.
        found: ObjectKind,
        /// The offending object's mRID.
        mrid: Mrid,
    },
}

/// Top-level error type for a load session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A descriptor's forward or reverse wiring function failed.
    #[error("wiring failed: {0}")]
    Wire(#[from] WireError),

    /// The source object of a reference has not been added to the store.
    ///
    /// Decoders add an object before declaring its references, so a missing
    /// source is a caller sequencing bug rather than ordinary deferral.
    #[error("object not in store: {mrid}")]
    UnknownSource {
        /// The missing source mRID.
        mrid: Mrid,
    },

    /// No descriptor is registered under (source kind, relationship name).
    #[error("no relationship '{relationship}' registered for {source_kind}")]
    UnknownRelationship {
        /// Kind of the source object.
        source_kind: ObjectKind,
        /// Requested relationship name.
        relationship: String,
    },
}

impl SessionError {
    /// Returns true if this is a wiring failure.
    #[must_use]
    pub const fn is_wire(&self) -> bool {
        matches!(self, Self::Wire(_))
    }

    /// Returns true if this error points at a registry or caller bug
    /// rather than at the data being loaded.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::UnknownSource { .. } | Self::UnknownRelationship { .. }
        )
    }
}

/// Result type alias for load-session operations.
pub type SessionResult<T> = Result<T, SessionError>;
