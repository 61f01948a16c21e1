//! Content identifiers and the node store that stages inner nodes.

pub mod adder;
pub mod cid;
pub mod store;

pub use self::adder::{inner_node_batch_size, CommittedProofs, NodeAdder};
pub use self::cid::{cid_from_namespaced_sha256, inner_cid, leaf_cid, root_cid};
pub use self::store::{Block, BlockStore, MemoryBlockStore};
