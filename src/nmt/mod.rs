//! Namespaced Merkle trees: the hashing scheme behind row and column roots.

pub mod hasher;
pub mod tree;

pub use hasher::{NmtHasher, NodeHash, LEAF_PREFIX, NODE_PREFIX};
pub use tree::{NamespacedMerkleTree, NodeVisitor};
