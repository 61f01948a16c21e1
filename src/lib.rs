//! eds-archive — content-addressed archives of extended data squares.
//!
//! Serializes an erasure-coded, namespaced-Merkle-committed square of shares
//! into a CARv1 stream: a header declaring the row and column roots, every
//! share in quadrant order, and every inner tree node, so that a reader can
//! verify any single share without re-running the erasure coding.

pub mod cancel;
pub mod car;
pub mod cli;
pub mod config;
pub mod format;
pub mod ipld;
pub mod nmt;
pub mod square;
pub mod types;

// Re-export commonly used types at the crate root
pub use cancel::CancelToken;
pub use car::CarHeader;
pub use config::{ArchiveConfig, WriterConfig};
pub use format::{quadrant_order, roots_to_cids, write_eds, EdsWriter, WriteSummary};
pub use ipld::{BlockStore, MemoryBlockStore, NodeAdder};
pub use nmt::{NamespacedMerkleTree, NmtHasher, NodeHash, NodeVisitor};
pub use square::{
    default_codec, Codec, CodecKind, Commitments, ErasuredTreeConstructor, ExtendedDataSquare,
    ReedSolomon, Tree, TreeConstructor,
};
pub use types::{
    Axis, EdsError, EdsResult, ErrorKind, Namespace, Phase, Quadrant, NAMESPACE_SIZE,
    PARITY_NAMESPACE, SHARE_SIZE,
};
