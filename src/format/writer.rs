//! Writes an extended data square to a CARv1 archive.
//!
//! Layout: `[ header | Q0 | Q1 | Q2 | Q3 | inner nodes ]`. The header declares
//! the row roots then the column roots; leaves follow in quadrant order; the
//! inner nodes of every row and column tree close the archive so that any
//! share can be proven against the declared roots.
//!
//! Bytes written before an error are not rolled back. An archive is only
//! valid if the write returned `Ok`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use cid::Cid;

use crate::cancel::CancelToken;
use crate::car::{write_block, CarHeader};
use crate::config::WriterConfig;
use crate::ipld::{
    inner_cid, inner_node_batch_size, leaf_cid, root_cid, CommittedProofs, MemoryBlockStore,
    NodeAdder,
};
use crate::square::{square_width, Codec, Commitments, ErasuredTreeConstructor, ExtendedDataSquare};
use crate::types::{EdsError, EdsResult, Phase};

use super::order::quadrant_order;

/// Counts reported after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// Roots declared in the header.
    pub roots: usize,
    /// Share blocks written.
    pub leaves: usize,
    /// Inner node blocks written.
    pub proofs: usize,
    /// Total archive size.
    pub bytes_written: u64,
}

/// Writer for EDS archives.
#[derive(Debug, Clone, Default)]
pub struct EdsWriter {
    config: WriterConfig,
}

impl EdsWriter {
    /// Create a writer with the given settings.
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// The writer's settings.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write `eds` to `path`. The file is removed if the write fails.
    pub fn write_to_file(
        &self,
        eds: &ExtendedDataSquare,
        path: &Path,
        cancel: &CancelToken,
    ) -> EdsResult<WriteSummary> {
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(self.config.buffer_capacity, file);
        let result = self.write_to(eds, &mut writer, cancel);
        drop(writer);
        if let Err(e) = &result {
            log::warn!("discarding partial archive {}: {}", path.display(), e);
            if let Err(rm) = std::fs::remove_file(path) {
                log::warn!("failed to remove {}: {}", path.display(), rm);
            }
        }
        result
    }

    /// Write `eds` to any writer.
    ///
    /// The caller's square is only read; a private copy is re-imported to
    /// collect the inner nodes.
    pub fn write_to(
        &self,
        eds: &ExtendedDataSquare,
        writer: &mut impl Write,
        cancel: &CancelToken,
    ) -> EdsResult<WriteSummary> {
        self.write_shares_to(eds.flattened(), Arc::clone(eds.codec()), writer, cancel)
    }

    /// Write the square formed by `shares` (row-major, all four quadrants).
    ///
    /// Geometry is checked before anything is written.
    pub fn write_shares_to(
        &self,
        shares: Vec<Vec<u8>>,
        codec: Arc<dyn Codec>,
        writer: &mut impl Write,
        cancel: &CancelToken,
    ) -> EdsResult<WriteSummary> {
        let width = square_width(shares.len())?;
        log::debug!("writing eds of width {} ({} shares)", width, shares.len());

        // 1. Reimport the square, walking every tree to cache its inner nodes
        let session = WritingSession::initialize(shares, codec, self.config.batch_size, cancel)
            .map_err(|e| e.in_phase(Phase::Reconstruction))?;

        // 2. Header declaring the row and column roots
        let mut bytes_written = session
            .write_header(writer)
            .map_err(|e| e.in_phase(Phase::Header))?;

        // 3. Shares in quadrant order
        let (leaves, leaf_bytes) = session
            .write_quadrants(writer, cancel)
            .map_err(|e| e.in_phase(Phase::Leaves))?;
        bytes_written += leaf_bytes;

        // 4. Cached inner nodes
        let (proofs, proof_bytes) = session
            .write_proofs(writer, cancel)
            .map_err(|e| e.in_phase(Phase::Proofs))?;
        bytes_written += proof_bytes;

        writer
            .flush()
            .map_err(|e| EdsError::from(e).in_phase(Phase::Proofs))?;

        let summary = WriteSummary {
            roots: session.commitments.len(),
            leaves,
            proofs,
            bytes_written,
        };
        log::info!(
            "wrote eds archive: {} roots, {} leaves, {} inner nodes, {} bytes",
            summary.roots,
            summary.leaves,
            summary.proofs,
            summary.bytes_written
        );
        Ok(summary)
    }
}

/// Write `eds` with default settings and no cancellation.
pub fn write_eds(eds: &ExtendedDataSquare, writer: &mut impl Write) -> EdsResult<WriteSummary> {
    EdsWriter::default().write_to(eds, writer, &CancelToken::new())
}

/// CIDs of the row roots followed by the column roots.
pub fn roots_to_cids(commitments: &Commitments) -> EdsResult<Vec<Cid>> {
    commitments
        .all_roots()
        .map(|root| root_cid(root.as_bytes()))
        .collect()
}

/// State of one write: the re-imported square, its roots and its inner nodes.
/// Dropped, with its node store, when the write returns.
struct WritingSession {
    eds: ExtendedDataSquare,
    commitments: Commitments,
    proofs: CommittedProofs,
}

impl WritingSession {
    fn initialize(
        shares: Vec<Vec<u8>>,
        codec: Arc<dyn Codec>,
        batch_size: Option<usize>,
        cancel: &CancelToken,
    ) -> EdsResult<Self> {
        cancel.check()?;
        let share_count = shares.len();
        let ods_width = square_width(share_count)? / 2;
        let expected = inner_node_batch_size(share_count, ods_width);
        let batch = batch_size.unwrap_or(expected);

        let store = Arc::new(MemoryBlockStore::with_capacity(expected));
        // the adder only sees inner nodes, so the store never holds leaves
        let adder = Arc::new(NodeAdder::new(store, batch));
        let constructor = ErasuredTreeConstructor::with_visitor(adder.clone());
        let eds = ExtendedDataSquare::import(shares, codec, Arc::new(constructor))?;
        cancel.check()?;

        let commitments = eds.commit()?;
        cancel.check()?;
        let proofs = adder.commit(&commitments)?;
        log::debug!(
            "cached {} inner nodes (expected at most {})",
            proofs.len()?,
            expected
        );

        Ok(Self {
            eds,
            commitments,
            proofs,
        })
    }

    fn write_header(&self, writer: &mut impl Write) -> EdsResult<u64> {
        let roots = roots_to_cids(&self.commitments)?;
        let written = CarHeader::new(roots).write_to(writer)?;
        Ok(written as u64)
    }

    fn write_quadrants(
        &self,
        writer: &mut impl Write,
        cancel: &CancelToken,
    ) -> EdsResult<(usize, u64)> {
        let shares = quadrant_order(&self.eds);
        let mut written = 0u64;
        for share in &shares {
            cancel.check()?;
            let cid = leaf_cid(share)?;
            written += write_block(writer, &cid, share)? as u64;
        }
        Ok((shares.len(), written))
    }

    fn write_proofs(
        &self,
        writer: &mut impl Write,
        cancel: &CancelToken,
    ) -> EdsResult<(usize, u64)> {
        cancel.check()?;
        let keys = self.proofs.keys()?;
        let mut written = 0u64;
        for key in &keys {
            cancel.check()?;
            let node = self.proofs.get(key)?;
            let cid = inner_cid(&node.data)?;
            written += write_block(writer, &cid, &node.data)? as u64;
        }
        Ok((keys.len(), written))
    }
}
