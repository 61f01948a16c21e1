//! Quadrant ordering of shares.
//!
//! Shares are written quadrant by quadrant (original, row parity, column
//! parity, parity), each quadrant row-major. Readers depend on this mapping
//! to locate a share, so it is part of the archive format.

use crate::square::ExtendedDataSquare;
use crate::types::Quadrant;

/// Position in the leaf section of cell `(i, j)` of `quadrant`, for
/// original width `k`.
pub fn quadrant_position(quadrant: Quadrant, i: usize, j: usize, k: usize) -> usize {
    quadrant.index() * k * k + i * k + j
}

/// Inverse of [`quadrant_position`]: the quadrant and square coordinates of
/// leaf number `position`, or `None` when `position` is not below `4k²`.
pub fn quadrant_cell(position: usize, k: usize) -> Option<(Quadrant, usize, usize)> {
    let quadrant_size = k * k;
    let quadrant = *Quadrant::ALL.get(position.checked_div(quadrant_size)?)?;
    let inner = position % quadrant_size;
    let (row0, col0) = quadrant.origin(k);
    Some((quadrant, row0 + inner / k, col0 + inner % k))
}

/// Every share of `eds` in quadrant order, tagged with its leaf namespace.
pub fn quadrant_order(eds: &ExtendedDataSquare) -> Vec<Vec<u8>> {
    let k = eds.original_width();
    let mut shares = vec![Vec::new(); eds.share_count()];
    for i in 0..k {
        for j in 0..k {
            for quadrant in Quadrant::ALL {
                let (row0, col0) = quadrant.origin(k);
                shares[quadrant_position(quadrant, i, j, k)] =
                    quadrant.tag(eds.cell(row0 + i, col0 + j));
            }
        }
    }
    shares
}
