//! Shared fixtures for the integration tests: square builders and a minimal
//! CARv1 parser used to inspect written archives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, Cursor, Write};
use std::sync::Arc;

use cid::Cid;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use eds_archive::car::CarHeader;
use eds_archive::ipld::{cid_from_namespaced_sha256, inner_cid, leaf_cid};
use eds_archive::nmt::NodeHash;
use eds_archive::{
    default_codec, CancelToken, ErasuredTreeConstructor, ExtendedDataSquare, Namespace,
    NAMESPACE_SIZE,
};

/// Share size used by the tests. Tagged leaves (72 bytes) never collide in
/// size with inner nodes (96 bytes).
pub const TEST_SHARE_SIZE: usize = 64;

/// `k × k` original shares with increasing namespaces and seeded random bodies.
pub fn original_shares(k: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..k * k)
        .map(|i| {
            let mut share = Namespace::from_u64(i as u64 + 1).as_bytes().to_vec();
            share.extend((NAMESPACE_SIZE..TEST_SHARE_SIZE).map(|_| rng.gen::<u8>()));
            share
        })
        .collect()
}

/// Extended square over [`original_shares`].
pub fn make_square(k: usize, seed: u64) -> ExtendedDataSquare {
    ExtendedDataSquare::compute(
        original_shares(k, seed),
        default_codec(),
        Arc::new(ErasuredTreeConstructor::new()),
    )
    .unwrap()
}

/// A parsed archive: header plus every block in stream order.
pub struct ParsedArchive {
    pub header: CarHeader,
    pub header_len: usize,
    pub blocks: Vec<(Cid, Vec<u8>)>,
}

impl ParsedArchive {
    /// The first `count` blocks (the leaf section when `count = width²`).
    pub fn leaves(&self, count: usize) -> &[(Cid, Vec<u8>)] {
        &self.blocks[..count]
    }

    /// Blocks after the first `count`.
    pub fn proofs(&self, count: usize) -> &[(Cid, Vec<u8>)] {
        &self.blocks[count..]
    }

    /// Every block keyed by CID.
    pub fn block_map(&self) -> HashMap<Cid, Vec<u8>> {
        self.blocks.iter().cloned().collect()
    }
}

/// Read one unsigned varint at `*pos`.
pub fn read_uvarint(data: &[u8], pos: &mut usize) -> u64 {
    let mut value = 0u64;
    let mut shift = 0;
    loop {
        let byte = data[*pos];
        *pos += 1;
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return value;
        }
        shift += 7;
    }
}

/// Parse a complete archive, panicking on malformed framing.
pub fn parse_archive(data: &[u8]) -> ParsedArchive {
    let mut pos = 0;
    let len = read_uvarint(data, &mut pos) as usize;
    let header: CarHeader = serde_ipld_dagcbor::from_slice(&data[pos..pos + len]).unwrap();
    pos += len;
    let header_len = pos;

    let mut blocks = Vec::new();
    while pos < data.len() {
        let len = read_uvarint(data, &mut pos) as usize;
        let section = &data[pos..pos + len];
        let mut cursor = Cursor::new(section);
        let cid = Cid::read_bytes(&mut cursor).unwrap();
        let payload = section[cursor.position() as usize..].to_vec();
        blocks.push((cid, payload));
        pos += len;
    }
    ParsedArchive {
        header,
        header_len,
        blocks,
    }
}

fn split_point(n: usize) -> usize {
    let bits = usize::BITS - (n - 1).leading_zeros();
    1 << (bits - 1)
}

/// Walk the tree under `cid` (a subtree over `n` leaves) using only archive
/// blocks, checking every CID against its payload. Returns the tagged
/// leaves in tree order.
pub fn walk_tree(blocks: &HashMap<Cid, Vec<u8>>, cid: &Cid, n: usize) -> Vec<Vec<u8>> {
    let data = blocks
        .get(cid)
        .unwrap_or_else(|| panic!("block {} missing from archive", cid));
    if n == 1 {
        assert_eq!(&leaf_cid(data).unwrap(), cid, "leaf cid mismatch");
        return vec![data.clone()];
    }
    assert_eq!(&inner_cid(data).unwrap(), cid, "inner cid mismatch");
    let half = data.len() / 2;
    let left = NodeHash::from_slice(&data[..half]).unwrap();
    let right = NodeHash::from_slice(&data[half..]).unwrap();
    let left_cid = cid_from_namespaced_sha256(left.as_bytes()).unwrap();
    let right_cid = cid_from_namespaced_sha256(right.as_bytes()).unwrap();
    let split = split_point(n);
    let mut leaves = walk_tree(blocks, &left_cid, split);
    leaves.extend(walk_tree(blocks, &right_cid, n - split));
    leaves
}

/// Sink that cancels `token` after a number of `write` calls.
pub struct CancellingWriter {
    pub buf: Vec<u8>,
    pub writes: usize,
    pub cancel_after: usize,
    pub token: CancelToken,
}

impl CancellingWriter {
    pub fn new(token: CancelToken, cancel_after: usize) -> Self {
        Self {
            buf: Vec::new(),
            writes: 0,
            cancel_after,
            token,
        }
    }
}

impl Write for CancellingWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        self.writes += 1;
        if self.writes >= self.cancel_after {
            self.token.cancel();
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that fails once `limit` bytes have been accepted.
pub struct FailingWriter {
    pub buf: Vec<u8>,
    pub limit: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.buf.len() + data.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::Other, "sink full"));
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
