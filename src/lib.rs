//! # gridlink - deferred cross-reference resolution for network models
//!
//! gridlink reconstructs a fully-linked, strongly-typed electrical-network
//! object graph from an unordered stream of flat wire records. Records
//! reference each other only by stable textual identifiers (mRIDs) and may
//! arrive in any order relative to their relationships, so any record may
//! point at an object that has not been materialized yet. The engine defers
//! such references transparently, wires them the instant the target
//! appears, keeps every bidirectional relationship mutually consistent, and
//! tolerates duplicate application safely.
//!
//! ## Core concepts
//!
//! - **Mrid**: the globally unique string identity of one object
//! - **NetworkObject**: a materialized, strongly-typed domain object
//! - **RelationshipDescriptor**: a reusable, typed specification of how to
//!   wire one named relationship once both endpoints exist
//! - **LoadSession**: one in-flight load; add objects, declare references,
//!   then read the completeness report
//!
//! ## Usage
//!
//! ```rust
//! use gridlink::{
//!     ConductingEquipment, LoadSession, Mrid, ResolverRegistry, Terminal, rel,
//! };
//!
//! let registry = ResolverRegistry::network();
//! let mut load = LoadSession::new(&registry);
//!
//! // The terminal arrives before the equipment it references.
//! load.add(Terminal::new("t1"))?;
//! load.resolve_or_defer(
//!     &Mrid::new("t1"),
//!     rel::TERMINAL_CONDUCTING_EQUIPMENT,
//!     Some("ce1"),
//! )?;
//!
//! // The equipment arriving wires both directions at once.
//! load.add(ConductingEquipment::new("ce1"))?;
//! let ce1 = load.get("ce1").unwrap().as_conducting_equipment().unwrap();
//! assert_eq!(ce1.terminals, vec![Mrid::new("t1")]);
//! assert!(load.report().is_complete());
//! # Ok::<(), gridlink::SessionError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod deferred;
pub mod error;
pub mod model;
pub mod mrid;
pub mod registry;
pub mod report;
pub mod session;
pub mod store;

// Re-export primary types at crate root for convenience
pub use deferred::{DeferredReferenceIndex, PendingResolution};
pub use error::{SessionError, SessionResult, WireError};
pub use model::{
    BaseVoltage, ConductingEquipment, ConnectivityNode, Feeder, NetworkObject, ObjectKind,
    Substation, Terminal,
};
pub use mrid::Mrid;
pub use registry::{rel, Cardinality, RelationshipDescriptor, ResolverRegistry, WireFn};
pub use report::{LoadReport, LoadStats, UnresolvedReference, WaitingReference};
pub use session::{LoadSession, Resolution};
pub use store::NetworkStore;
