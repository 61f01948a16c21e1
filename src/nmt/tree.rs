//! Namespaced Merkle tree over tagged leaves.

use std::sync::Arc;

use crate::types::{EdsError, EdsResult, Namespace, NAMESPACED_HASH_SIZE};

use super::hasher::{NmtHasher, NodeHash};

/// Receives every inner node a tree computes.
///
/// Called exactly once per inner node, with the node's digest and its stored
/// payload (`left ‖ right`). Never called for leaves.
pub trait NodeVisitor: Send + Sync {
    /// Observe one inner node.
    fn on_inner_node(&self, hash: &NodeHash, children: &[u8]);
}

/// A namespaced Merkle tree built leaf by leaf.
pub struct NamespacedMerkleTree {
    leaves: Vec<NodeHash>,
    last_namespace: Option<Namespace>,
    visitor: Option<Arc<dyn NodeVisitor>>,
    root: Option<NodeHash>,
}

impl NamespacedMerkleTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            leaves: Vec::new(),
            last_namespace: None,
            visitor: None,
            root: None,
        }
    }

    /// Create an empty tree with room for `capacity` leaves that reports its
    /// inner nodes to `visitor`.
    pub fn with_visitor(capacity: usize, visitor: Option<Arc<dyn NodeVisitor>>) -> Self {
        Self {
            leaves: Vec::with_capacity(capacity),
            last_namespace: None,
            visitor,
            root: None,
        }
    }

    /// Number of leaves pushed so far.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether no leaves were pushed.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Append a tagged leaf (`namespace ‖ data`).
    ///
    /// Leaves must arrive in non-decreasing namespace order.
    pub fn push(&mut self, tagged: &[u8]) -> EdsResult<()> {
        let ns = Namespace::of_share(tagged).ok_or(EdsError::ShareTooSmall(tagged.len()))?;
        if let Some(last) = self.last_namespace {
            if ns < last {
                return Err(EdsError::NamespaceOrder);
            }
        }
        self.last_namespace = Some(ns);
        self.leaves.push(NmtHasher::hash_leaf(tagged));
        self.root = None;
        Ok(())
    }

    /// Compute the root, visiting every inner node on the first call.
    pub fn root(&mut self) -> NodeHash {
        if let Some(root) = self.root {
            return root;
        }
        let root = if self.leaves.is_empty() {
            NmtHasher::empty_root()
        } else {
            self.compute_root(0, self.leaves.len())
        };
        self.root = Some(root);
        root
    }

    fn compute_root(&self, start: usize, end: usize) -> NodeHash {
        let n = end - start;
        if n == 1 {
            return self.leaves[start];
        }
        let split = start + split_point(n);
        let left = self.compute_root(start, split);
        let right = self.compute_root(split, end);
        let hash = NmtHasher::hash_node(&left, &right);

        if let Some(visitor) = &self.visitor {
            let mut children = [0u8; 2 * NAMESPACED_HASH_SIZE];
            children[..NAMESPACED_HASH_SIZE].copy_from_slice(left.as_bytes());
            children[NAMESPACED_HASH_SIZE..].copy_from_slice(right.as_bytes());
            visitor.on_inner_node(&hash, &children);
        }
        hash
    }
}

impl Default for NamespacedMerkleTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest power of two strictly less than `n` (`n > 1`).
fn split_point(n: usize) -> usize {
    let bits = usize::BITS - (n - 1).leading_zeros();
    1 << (bits - 1)
}
