//! The extended data square and its row/column commitments.

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::nmt::NodeHash;
use crate::types::{Axis, EdsError, EdsResult, NAMESPACE_SIZE};

use super::codec::Codec;
use super::tree::TreeConstructor;

/// Width of the square holding `share_count` shares.
///
/// Fails when the square is empty, not square, or cannot be split into
/// four quadrants.
pub fn square_width(share_count: usize) -> EdsResult<usize> {
    if share_count == 0 {
        return Err(EdsError::EmptySquare);
    }
    let width = exact_sqrt(share_count).ok_or(EdsError::NotSquare(share_count))?;
    if width % 2 != 0 {
        return Err(EdsError::OddWidth(width));
    }
    Ok(width)
}

fn exact_sqrt(n: usize) -> Option<usize> {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    (root * root == n).then_some(root)
}

fn check_share_sizes(shares: &[Vec<u8>]) -> EdsResult<usize> {
    let size = shares.first().map(Vec::len).unwrap_or(0);
    if size < NAMESPACE_SIZE {
        return Err(EdsError::ShareTooSmall(size));
    }
    if let Some((index, share)) = shares.iter().enumerate().find(|(_, s)| s.len() != size) {
        return Err(EdsError::ShareSize {
            index,
            expected: size,
            got: share.len(),
        });
    }
    Ok(size)
}

/// Row and column roots of an extended data square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitments {
    row_roots: Vec<NodeHash>,
    col_roots: Vec<NodeHash>,
}

impl Commitments {
    /// Row roots, top to bottom.
    pub fn row_roots(&self) -> &[NodeHash] {
        &self.row_roots
    }

    /// Column roots, left to right.
    pub fn col_roots(&self) -> &[NodeHash] {
        &self.col_roots
    }

    /// Row roots followed by column roots.
    pub fn all_roots(&self) -> impl Iterator<Item = &NodeHash> {
        self.row_roots.iter().chain(self.col_roots.iter())
    }

    /// Total number of roots (`2 × width`).
    pub fn len(&self) -> usize {
        self.row_roots.len() + self.col_roots.len()
    }

    /// Whether there are no roots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// SHA-256 over every root in [`Self::all_roots`] order.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for root in self.all_roots() {
            hasher.update(root.as_bytes());
        }
        hasher.finalize().into()
    }
}

/// A `2k × 2k` square of shares: original data in the top-left quadrant,
/// erasure-coded parity in the other three.
///
/// Shares are immutable once the square is built. Roots are only available
/// through [`ExtendedDataSquare::commit`], which walks every tree.
#[derive(Clone)]
pub struct ExtendedDataSquare {
    width: usize,
    share_size: usize,
    shares: Vec<Vec<u8>>,
    codec: Arc<dyn Codec>,
    constructor: Arc<dyn TreeConstructor>,
}

impl ExtendedDataSquare {
    /// Import a complete square from its shares in row-major order.
    pub fn import(
        shares: Vec<Vec<u8>>,
        codec: Arc<dyn Codec>,
        constructor: Arc<dyn TreeConstructor>,
    ) -> EdsResult<Self> {
        let width = square_width(shares.len())?;
        if width > codec.max_chunks() {
            return Err(EdsError::CodecLimit {
                codec: codec.name(),
                width,
                max: codec.max_chunks(),
            });
        }
        let share_size = check_share_sizes(&shares)?;
        Ok(Self {
            width,
            share_size,
            shares,
            codec,
            constructor,
        })
    }

    /// Extend a `k × k` original square, given in row-major order.
    ///
    /// Rows of the original quadrant are extended into the top-right
    /// quadrant, its columns into the bottom-left, and the rows of the
    /// bottom-left into the bottom-right.
    pub fn compute(
        original: Vec<Vec<u8>>,
        codec: Arc<dyn Codec>,
        constructor: Arc<dyn TreeConstructor>,
    ) -> EdsResult<Self> {
        if original.is_empty() {
            return Err(EdsError::EmptySquare);
        }
        let k = exact_sqrt(original.len()).ok_or(EdsError::NotSquare(original.len()))?;
        let width = 2 * k;
        if width > codec.max_chunks() {
            return Err(EdsError::CodecLimit {
                codec: codec.name(),
                width,
                max: codec.max_chunks(),
            });
        }
        let share_size = check_share_sizes(&original)?;

        let mut grid: Vec<Vec<Vec<u8>>> = vec![Vec::with_capacity(width); width];
        let mut original = original.into_iter();
        for row in grid.iter_mut().take(k) {
            row.extend(original.by_ref().take(k));
        }

        for row in grid.iter_mut().take(k) {
            let data: Vec<&[u8]> = row.iter().map(Vec::as_slice).collect();
            let parity = codec.encode(&data)?;
            row.extend(parity);
        }

        for col in 0..k {
            let data: Vec<&[u8]> = grid[..k].iter().map(|row| row[col].as_slice()).collect();
            let parity = codec.encode(&data)?;
            for (offset, share) in parity.into_iter().enumerate() {
                grid[k + offset].push(share);
            }
        }

        for row in grid.iter_mut().skip(k) {
            let data: Vec<&[u8]> = row.iter().map(Vec::as_slice).collect();
            let parity = codec.encode(&data)?;
            row.extend(parity);
        }

        Ok(Self {
            width,
            share_size,
            shares: grid.into_iter().flatten().collect(),
            codec,
            constructor,
        })
    }

    /// Width of the extended square (`2k`).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Width of the original quadrant (`k`).
    pub fn original_width(&self) -> usize {
        self.width / 2
    }

    /// Size of every share in bytes.
    pub fn share_size(&self) -> usize {
        self.share_size
    }

    /// Total number of shares (`width²`).
    pub fn share_count(&self) -> usize {
        self.shares.len()
    }

    /// The codec this square was built with.
    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.codec
    }

    /// Share at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the square.
    pub fn cell(&self, row: usize, col: usize) -> &[u8] {
        assert!(row < self.width && col < self.width, "cell out of range");
        &self.shares[row * self.width + col]
    }

    /// Share at `(row, col)`, or an error when out of range.
    pub fn get_cell(&self, row: usize, col: usize) -> EdsResult<&[u8]> {
        if row >= self.width || col >= self.width {
            return Err(EdsError::OutOfRange {
                index: row.max(col),
                width: self.width,
            });
        }
        Ok(self.cell(row, col))
    }

    /// Shares of row `index`, left to right.
    pub fn row(&self, index: usize) -> EdsResult<Vec<&[u8]>> {
        self.axis(Axis::Row, index)
    }

    /// Shares of column `index`, top to bottom.
    pub fn column(&self, index: usize) -> EdsResult<Vec<&[u8]>> {
        self.axis(Axis::Column, index)
    }

    fn axis(&self, axis: Axis, index: usize) -> EdsResult<Vec<&[u8]>> {
        if index >= self.width {
            return Err(EdsError::OutOfRange {
                index,
                width: self.width,
            });
        }
        Ok((0..self.width)
            .map(|i| match axis {
                Axis::Row => self.cell(index, i),
                Axis::Column => self.cell(i, index),
            })
            .collect())
    }

    /// Copy of every share in row-major order.
    pub fn flattened(&self) -> Vec<Vec<u8>> {
        self.shares.clone()
    }

    /// Copy of the original quadrant in row-major order.
    pub fn flattened_original(&self) -> Vec<Vec<u8>> {
        let k = self.original_width();
        (0..k)
            .flat_map(|row| (0..k).map(move |col| (row, col)))
            .map(|(row, col)| self.cell(row, col).to_vec())
            .collect()
    }

    /// Build every row and column tree and return their roots.
    ///
    /// This is the only operation that traverses the trees, so any visitor
    /// attached to the tree constructor has seen every inner node once it
    /// returns.
    pub fn commit(&self) -> EdsResult<Commitments> {
        let row_roots = self.axis_roots(Axis::Row)?;
        let col_roots = self.axis_roots(Axis::Column)?;
        Ok(Commitments {
            row_roots,
            col_roots,
        })
    }

    fn axis_roots(&self, axis: Axis) -> EdsResult<Vec<NodeHash>> {
        let k = self.original_width();
        let mut roots = Vec::with_capacity(self.width);
        for index in 0..self.width {
            let mut tree = self.constructor.construct(axis, index, k);
            for share in self.axis(axis, index)? {
                tree.push(share)?;
            }
            roots.push(tree.root()?);
        }
        Ok(roots)
    }
}

impl fmt::Debug for ExtendedDataSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedDataSquare")
            .field("width", &self.width)
            .field("share_size", &self.share_size)
            .field("codec", &self.codec.name())
            .finish()
    }
}

impl PartialEq for ExtendedDataSquare {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.shares == other.shares
    }
}
