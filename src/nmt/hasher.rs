//! Leaf and inner-node hashing for namespaced Merkle trees.
//!
//! Every digest is `min_ns ‖ max_ns ‖ sha256(prefix ‖ payload)`. Leaves use
//! [`LEAF_PREFIX`] and inner nodes [`NODE_PREFIX`], so a digest can be told
//! apart from its payload alone.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::types::{
    EdsError, EdsResult, Namespace, NAMESPACED_HASH_SIZE, NAMESPACE_SIZE, PARITY_NAMESPACE,
};

/// Domain separation byte for leaf hashes.
pub const LEAF_PREFIX: u8 = 0x00;

/// Domain separation byte for inner node hashes.
pub const NODE_PREFIX: u8 = 0x01;

/// A namespaced SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHash(pub [u8; NAMESPACED_HASH_SIZE]);

impl NodeHash {
    /// Parse a digest from exactly [`NAMESPACED_HASH_SIZE`] bytes.
    pub fn from_slice(data: &[u8]) -> EdsResult<Self> {
        let bytes: [u8; NAMESPACED_HASH_SIZE] = data
            .try_into()
            .map_err(|_| EdsError::InvalidDigest(data.len()))?;
        Ok(Self(bytes))
    }

    /// Smallest namespace covered by this node.
    pub fn min_namespace(&self) -> Namespace {
        let mut ns = [0u8; NAMESPACE_SIZE];
        ns.copy_from_slice(&self.0[..NAMESPACE_SIZE]);
        Namespace(ns)
    }

    /// Largest namespace covered by this node.
    pub fn max_namespace(&self) -> Namespace {
        let mut ns = [0u8; NAMESPACE_SIZE];
        ns.copy_from_slice(&self.0[NAMESPACE_SIZE..2 * NAMESPACE_SIZE]);
        Namespace(ns)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHash({})", self.to_hex())
    }
}

impl AsRef<[u8]> for NodeHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Namespaced SHA-256 hasher with 8-byte namespaces.
///
/// Inner nodes ignore the parity namespace when computing their max
/// namespace: if the right child starts at [`PARITY_NAMESPACE`], the node's
/// range ends where the left child's does.
pub struct NmtHasher;

impl NmtHasher {
    /// Hash a tagged leaf (`namespace ‖ share`).
    ///
    /// # Panics
    ///
    /// Panics if `tagged` is shorter than [`NAMESPACE_SIZE`].
    pub fn hash_leaf(tagged: &[u8]) -> NodeHash {
        let ns = &tagged[..NAMESPACE_SIZE];
        let mut hasher = Sha256::new();
        hasher.update([LEAF_PREFIX]);
        hasher.update(tagged);
        let digest = hasher.finalize();

        let mut out = [0u8; NAMESPACED_HASH_SIZE];
        out[..NAMESPACE_SIZE].copy_from_slice(ns);
        out[NAMESPACE_SIZE..2 * NAMESPACE_SIZE].copy_from_slice(ns);
        out[2 * NAMESPACE_SIZE..].copy_from_slice(&digest);
        NodeHash(out)
    }

    /// Hash two child digests into their parent.
    pub fn hash_node(left: &NodeHash, right: &NodeHash) -> NodeHash {
        let min_ns = left.min_namespace();
        let max_ns = if right.min_namespace() == PARITY_NAMESPACE {
            left.max_namespace()
        } else {
            right.max_namespace()
        };

        let mut hasher = Sha256::new();
        hasher.update([NODE_PREFIX]);
        hasher.update(left.0);
        hasher.update(right.0);
        let digest = hasher.finalize();

        let mut out = [0u8; NAMESPACED_HASH_SIZE];
        out[..NAMESPACE_SIZE].copy_from_slice(min_ns.as_bytes());
        out[NAMESPACE_SIZE..2 * NAMESPACE_SIZE].copy_from_slice(max_ns.as_bytes());
        out[2 * NAMESPACE_SIZE..].copy_from_slice(&digest);
        NodeHash(out)
    }

    /// Hash a stored inner node payload (`left ‖ right`).
    pub fn hash_inner_raw(children: &[u8]) -> EdsResult<NodeHash> {
        if children.len() != 2 * NAMESPACED_HASH_SIZE {
            return Err(EdsError::InvalidInnerNode(children.len()));
        }
        let (left, right) = children.split_at(NAMESPACED_HASH_SIZE);
        Ok(Self::hash_node(
            &NodeHash::from_slice(left)?,
            &NodeHash::from_slice(right)?,
        ))
    }

    /// Root of a tree with no leaves.
    pub fn empty_root() -> NodeHash {
        let digest = Sha256::digest(b"");
        let mut out = [0u8; NAMESPACED_HASH_SIZE];
        out[2 * NAMESPACE_SIZE..].copy_from_slice(&digest);
        NodeHash(out)
    }
}
