//! In-memory block storage keyed by CID.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use cid::Cid;

use crate::types::{EdsError, EdsResult};

/// A content-addressed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Identifier of `data`.
    pub cid: Cid,
    /// Raw payload.
    pub data: Vec<u8>,
}

impl Block {
    /// Pair a CID with its payload.
    pub fn new(cid: Cid, data: Vec<u8>) -> Self {
        Self { cid, data }
    }
}

/// Key-value storage for blocks.
pub trait BlockStore: Send + Sync {
    /// Store every block; existing keys are overwritten.
    fn put_many(&self, blocks: Vec<Block>) -> EdsResult<()>;

    /// Fetch one block.
    fn get(&self, cid: &Cid) -> EdsResult<Block>;

    /// Whether a block is present.
    fn has(&self, cid: &Cid) -> EdsResult<bool>;

    /// Every stored key, in no particular order.
    fn all_keys(&self) -> EdsResult<Vec<Cid>>;

    /// Number of stored blocks.
    fn len(&self) -> EdsResult<usize>;

    /// Whether the store holds no blocks.
    fn is_empty(&self) -> EdsResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Mutex-guarded map of blocks.
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: Mutex<HashMap<Cid, Vec<u8>>>,
}

impl MemoryBlockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store sized for `capacity` blocks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            blocks: Mutex::new(HashMap::with_capacity(capacity)),
        }
    }

    fn lock(&self) -> EdsResult<MutexGuard<'_, HashMap<Cid, Vec<u8>>>> {
        self.blocks
            .lock()
            .map_err(|_| EdsError::Store("block store mutex poisoned".to_string()))
    }
}

impl BlockStore for MemoryBlockStore {
    fn put_many(&self, blocks: Vec<Block>) -> EdsResult<()> {
        let mut map = self.lock()?;
        for block in blocks {
            map.insert(block.cid, block.data);
        }
        Ok(())
    }

    fn get(&self, cid: &Cid) -> EdsResult<Block> {
        let map = self.lock()?;
        map.get(cid)
            .map(|data| Block::new(*cid, data.clone()))
            .ok_or_else(|| EdsError::BlockNotFound(cid.to_string()))
    }

    fn has(&self, cid: &Cid) -> EdsResult<bool> {
        Ok(self.lock()?.contains_key(cid))
    }

    fn all_keys(&self) -> EdsResult<Vec<Cid>> {
        Ok(self.lock()?.keys().copied().collect())
    }

    fn len(&self) -> EdsResult<usize> {
        Ok(self.lock()?.len())
    }
}
