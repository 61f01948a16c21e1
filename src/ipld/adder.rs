//! Staging inner NMT nodes into a block store while trees are built.

use std::sync::{Arc, Mutex, MutexGuard};

use cid::Cid;

use crate::nmt::{NodeHash, NodeVisitor};
use crate::square::Commitments;
use crate::types::{EdsError, EdsResult};

use super::cid::{cid_from_namespaced_sha256, root_cid};
use super::store::{Block, BlockStore};

/// Number of inner nodes in all row and column trees of a square with
/// `share_count` shares and original width `ods_width`.
///
/// Each of the `2w` trees over `w` leaves has `w − 1` inner nodes, which is
/// `2N − 4k` for `N = w²` and `w = 2k`.
pub fn inner_node_batch_size(share_count: usize, ods_width: usize) -> usize {
    (share_count * 2).saturating_sub(ods_width * 4)
}

#[derive(Default)]
struct BatchState {
    pending: Vec<Block>,
    flushes: usize,
    error: Option<EdsError>,
    committed: bool,
}

/// Collects inner nodes reported by tree visitors into bounded batches.
///
/// A full batch is flushed to the store immediately, so an undersized batch
/// only costs extra flushes. Visitors cannot fail; the first staging error is
/// kept and returned by [`NodeAdder::commit`].
pub struct NodeAdder {
    store: Arc<dyn BlockStore>,
    max_batch: usize,
    state: Mutex<BatchState>,
}

impl NodeAdder {
    /// Stage into `store`, flushing every `max_batch` nodes.
    pub fn new(store: Arc<dyn BlockStore>, max_batch: usize) -> Self {
        let max_batch = max_batch.max(1);
        Self {
            store,
            max_batch,
            state: Mutex::new(BatchState {
                pending: Vec::with_capacity(max_batch),
                ..BatchState::default()
            }),
        }
    }

    /// Configured batch size.
    pub fn max_batch(&self) -> usize {
        self.max_batch
    }

    /// Number of flushes performed so far.
    pub fn flushes(&self) -> EdsResult<usize> {
        Ok(self.lock()?.flushes)
    }

    fn lock(&self) -> EdsResult<MutexGuard<'_, BatchState>> {
        self.state
            .lock()
            .map_err(|_| EdsError::Store("node adder mutex poisoned".to_string()))
    }

    fn flush(&self, state: &mut BatchState) {
        if state.pending.is_empty() {
            return;
        }
        let blocks = std::mem::replace(&mut state.pending, Vec::with_capacity(self.max_batch));
        match self.store.put_many(blocks) {
            Ok(()) => state.flushes += 1,
            Err(e) => state.error = Some(e),
        }
    }

    /// Flush what is left and seal the batch.
    ///
    /// Takes the finished commitments so that it can only run once every
    /// tree has been built, and checks that each root reached the store.
    pub fn commit(&self, commitments: &Commitments) -> EdsResult<CommittedProofs> {
        let mut state = self.lock()?;
        if let Some(err) = state.error.take() {
            return Err(err);
        }
        if state.committed {
            return Err(EdsError::BatchCommitted);
        }
        self.flush(&mut state);
        if let Some(err) = state.error.take() {
            return Err(err);
        }
        state.committed = true;
        drop(state);

        for root in commitments.all_roots() {
            let cid = root_cid(root.as_bytes())?;
            if !self.store.has(&cid)? {
                return Err(EdsError::BlockNotFound(cid.to_string()));
            }
        }
        log::debug!(
            "committed {} inner nodes in {} flushes",
            self.store.len()?,
            self.flushes()?
        );
        Ok(CommittedProofs {
            store: Arc::clone(&self.store),
        })
    }
}

impl NodeVisitor for NodeAdder {
    fn on_inner_node(&self, hash: &NodeHash, children: &[u8]) {
        let Ok(mut state) = self.state.lock() else {
            log::warn!("node adder mutex poisoned, dropping inner node {}", hash.to_hex());
            return;
        };
        if state.error.is_some() {
            return;
        }
        if state.committed {
            state.error = Some(EdsError::BatchCommitted);
            return;
        }
        match cid_from_namespaced_sha256(hash.as_bytes()) {
            Ok(cid) => state.pending.push(Block::new(cid, children.to_vec())),
            Err(e) => {
                state.error = Some(e);
                return;
            }
        }
        if state.pending.len() >= self.max_batch {
            self.flush(&mut state);
        }
    }
}

/// Inner nodes of a fully traversed square, ready to be written out.
///
/// Only obtainable from [`NodeAdder::commit`].
pub struct CommittedProofs {
    store: Arc<dyn BlockStore>,
}

impl CommittedProofs {
    /// Every cached node key, in store order.
    pub fn keys(&self) -> EdsResult<Vec<Cid>> {
        self.store.all_keys()
    }

    /// Fetch one cached node.
    pub fn get(&self, cid: &Cid) -> EdsResult<Block> {
        self.store.get(cid)
    }

    /// Number of cached nodes.
    pub fn len(&self) -> EdsResult<usize> {
        self.store.len()
    }

    /// Whether nothing was cached.
    pub fn is_empty(&self) -> EdsResult<bool> {
        self.store.is_empty()
    }
}
