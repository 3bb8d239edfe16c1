//! Opaque handles issued by the CAD host.
//!
//! Tables remember which host objects they belong to (the parameter, the
//! action, the selected geometry) but never look inside those handles.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference to an object owned by the host document.
///
/// # Examples
///
/// ```
/// use blocklookup::HostRef;
///
/// let handle = HostRef::new();
/// assert!(!handle.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostRef(Uuid);

impl HostRef {
    /// Creates a new random handle.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps a host-issued UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Creates a nil handle (sentinel for "not yet assigned by the host").
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for HostRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for HostRef {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<HostRef> for Uuid {
    fn from(handle: HostRef) -> Self {
        handle.0
    }
}
