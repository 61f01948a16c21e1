//! Tree construction for the rows and columns of an extended data square.

use std::sync::Arc;

use crate::nmt::{NamespacedMerkleTree, NodeHash, NodeVisitor};
use crate::types::{Axis, EdsError, EdsResult, Quadrant, NAMESPACE_SIZE};

/// A commitment tree over one row or column.
pub trait Tree {
    /// Append the next raw share of the axis.
    fn push(&mut self, share: &[u8]) -> EdsResult<()>;

    /// Root over all pushed shares.
    fn root(&mut self) -> EdsResult<NodeHash>;
}

/// Builds one [`Tree`] per row and column.
pub trait TreeConstructor: Send + Sync {
    /// Tree for `axis` number `index` of a square with original width `ods_width`.
    fn construct(&self, axis: Axis, index: usize, ods_width: usize) -> Box<dyn Tree>;
}

/// Constructs [`ErasuredNamespacedMerkleTree`]s, optionally reporting their
/// inner nodes to a visitor.
#[derive(Clone, Default)]
pub struct ErasuredTreeConstructor {
    visitor: Option<Arc<dyn NodeVisitor>>,
}

impl ErasuredTreeConstructor {
    /// Constructor whose trees report nothing.
    pub fn new() -> Self {
        Self { visitor: None }
    }

    /// Constructor whose trees report every inner node to `visitor`.
    pub fn with_visitor(visitor: Arc<dyn NodeVisitor>) -> Self {
        Self {
            visitor: Some(visitor),
        }
    }
}

impl TreeConstructor for ErasuredTreeConstructor {
    fn construct(&self, axis: Axis, index: usize, ods_width: usize) -> Box<dyn Tree> {
        Box::new(ErasuredNamespacedMerkleTree {
            ods_width,
            axis,
            axis_index: index,
            share_index: 0,
            tree: NamespacedMerkleTree::with_visitor(2 * ods_width, self.visitor.clone()),
        })
    }
}

/// Namespaced tree over one axis that tags each share by its quadrant.
pub struct ErasuredNamespacedMerkleTree {
    ods_width: usize,
    axis: Axis,
    axis_index: usize,
    share_index: usize,
    tree: NamespacedMerkleTree,
}

impl ErasuredNamespacedMerkleTree {
    fn quadrant(&self) -> Quadrant {
        match self.axis {
            Axis::Row => Quadrant::of(self.axis_index, self.share_index, self.ods_width),
            Axis::Column => Quadrant::of(self.share_index, self.axis_index, self.ods_width),
        }
    }
}

impl Tree for ErasuredNamespacedMerkleTree {
    fn push(&mut self, share: &[u8]) -> EdsResult<()> {
        let width = 2 * self.ods_width;
        if self.axis_index >= width || self.share_index >= width {
            return Err(EdsError::TreeOverflow {
                axis: self.axis.name(),
                index: self.axis_index,
                width,
            });
        }
        if share.len() < NAMESPACE_SIZE {
            return Err(EdsError::ShareTooSmall(share.len()));
        }
        let tagged = self.quadrant().tag(share);
        self.tree.push(&tagged)?;
        self.share_index += 1;
        Ok(())
    }

    fn root(&mut self) -> EdsResult<NodeHash> {
        Ok(self.tree.root())
    }
}
