//! Quadrants of an extended data square and share tagging.

use std::fmt;

use super::namespace::PARITY_NAMESPACE;
use super::NAMESPACE_SIZE;

/// Tree axis of an extended data square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// A row, indexed top to bottom.
    Row,
    /// A column, indexed left to right.
    Column,
}

impl Axis {
    /// Lowercase name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the four `k×k` sub-squares of an extended data square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Top-left: original data.
    Original,
    /// Top-right: parity from extending rows.
    RowParity,
    /// Bottom-left: parity from extending columns.
    ColumnParity,
    /// Bottom-right: parity of parity.
    Parity,
}

impl Quadrant {
    /// All quadrants in archive order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Original,
        Quadrant::RowParity,
        Quadrant::ColumnParity,
        Quadrant::Parity,
    ];

    /// Position of this quadrant in archive order.
    pub fn index(&self) -> usize {
        match self {
            Quadrant::Original => 0,
            Quadrant::RowParity => 1,
            Quadrant::ColumnParity => 2,
            Quadrant::Parity => 3,
        }
    }

    /// Quadrant holding cell `(row, col)` of a square with original width `k`.
    pub fn of(row: usize, col: usize, k: usize) -> Self {
        match (row < k, col < k) {
            (true, true) => Quadrant::Original,
            (true, false) => Quadrant::RowParity,
            (false, true) => Quadrant::ColumnParity,
            (false, false) => Quadrant::Parity,
        }
    }

    /// Offset of this quadrant's top-left cell in a square with original width `k`.
    pub fn origin(&self, k: usize) -> (usize, usize) {
        match self {
            Quadrant::Original => (0, 0),
            Quadrant::RowParity => (0, k),
            Quadrant::ColumnParity => (k, 0),
            Quadrant::Parity => (k, k),
        }
    }

    /// Prepend the leaf namespace expected by the tree hasher.
    ///
    /// Original shares repeat their own namespace; parity shares carry
    /// [`PARITY_NAMESPACE`].
    ///
    /// # Panics
    ///
    /// Panics if `self` is [`Quadrant::Original`] and `share` is shorter
    /// than [`NAMESPACE_SIZE`].
    pub fn tag(&self, share: &[u8]) -> Vec<u8> {
        let prefix: &[u8] = match self {
            Quadrant::Original => &share[..NAMESPACE_SIZE],
            Quadrant::RowParity | Quadrant::ColumnParity | Quadrant::Parity => {
                PARITY_NAMESPACE.as_bytes()
            }
        };
        let mut tagged = Vec::with_capacity(NAMESPACE_SIZE + share.len());
        tagged.extend_from_slice(prefix);
        tagged.extend_from_slice(share);
        tagged
    }
}
