//! Namespace identifiers.

use std::fmt;

use super::NAMESPACE_SIZE;

/// Namespace reserved for parity shares. It is also the largest namespace,
/// so parity leaves always sort after original data.
pub const PARITY_NAMESPACE: Namespace = Namespace([0xFF; NAMESPACE_SIZE]);

/// An 8-byte namespace identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace(pub [u8; NAMESPACE_SIZE]);

impl Namespace {
    /// Read the namespace from the first bytes of `data`.
    ///
    /// Returns `None` when `data` is shorter than a namespace.
    pub fn of_share(data: &[u8]) -> Option<Self> {
        let bytes: [u8; NAMESPACE_SIZE] = data.get(..NAMESPACE_SIZE)?.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Namespace whose big-endian value is `value`.
    pub fn from_u64(value: u64) -> Self {
        Self(value.to_be_bytes())
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is the reserved parity namespace.
    pub fn is_parity(&self) -> bool {
        *self == PARITY_NAMESPACE
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
