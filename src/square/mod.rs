//! Extended data squares: geometry, erasure coding and commitment trees.

pub mod codec;
pub mod eds;
pub mod tree;

pub use codec::{default_codec, Codec, CodecKind, ReedSolomon};
pub use eds::{square_width, Commitments, ExtendedDataSquare};
pub use tree::{ErasuredNamespacedMerkleTree, ErasuredTreeConstructor, Tree, TreeConstructor};
