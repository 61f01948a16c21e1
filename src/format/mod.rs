//! Writing extended data squares as CARv1 archives.

pub mod order;
pub mod writer;

pub use order::{quadrant_cell, quadrant_order, quadrant_position};
pub use writer::{roots_to_cids, write_eds, EdsWriter, WriteSummary};
