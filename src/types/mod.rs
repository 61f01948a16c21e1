//! All data types for the eds-archive library.

pub mod error;
pub mod namespace;
pub mod quadrant;

pub use error::{EdsError, EdsResult, ErrorKind, Phase};
pub use namespace::{Namespace, PARITY_NAMESPACE};
pub use quadrant::{Axis, Quadrant};

/// Size of a namespace identifier in bytes.
pub const NAMESPACE_SIZE: usize = 8;

/// Default share size in bytes.
pub const SHARE_SIZE: usize = 512;

/// Size of a namespaced SHA-256 digest: min namespace, max namespace, sha256.
pub const NAMESPACED_HASH_SIZE: usize = 2 * NAMESPACE_SIZE + 32;

/// CARv1 header version.
pub const CAR_VERSION: u64 = 1;

/// Multicodec of NMT nodes.
pub const NMT_CODEC: u64 = 0x7700;

/// Multihash code of namespaced SHA-256 with 8-byte namespaces.
pub const SHA256_NAMESPACE8: u64 = 0x7701;
