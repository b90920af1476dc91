//! Stable identifiers for network-model objects.
//!
//! Every object in an exchanged network model carries an mRID: a globally
//! unique, immutable string identifier. Partial extracts produced by
//! independent systems agree only on these ids, so all cross-references in
//! wire records are expressed as mRIDs rather than nested objects.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique, stable master-resource identifier.
///
/// Once assigned by a producer, an `Mrid` never changes. It is the identity
/// anchor that relationship fields reference across independently produced
/// model extracts.
///
/// # Examples
///
/// ```
/// use gridlink::Mrid;
///
/// let id = Mrid::new("t1");
/// assert_eq!(id.as_str(), "t1");
/// assert!(!id.is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mrid(String);

impl Mrid {
    /// Creates an mRID from the given string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh random mRID (UUID v4).
    ///
    /// Producers that originate objects, rather than re-exchange them, use
    /// this to guarantee global uniqueness.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty or whitespace-only.
    ///
    /// A blank mRID in a reference field means "no relationship" and is
    /// never queued for resolution.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Mrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Mrid {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for Mrid {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<Mrid> for String {
    fn from(id: Mrid) -> Self {
        id.0
    }
}

impl Borrow<str> for Mrid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Mrid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
