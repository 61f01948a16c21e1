//! CARv1 header.

use std::io::Write;

use cid::Cid;
use serde::{Deserialize, Serialize};

use crate::types::{EdsError, EdsResult, CAR_VERSION};

use super::util::ld_write;

/// Header of a CARv1 archive: the declared roots and the format version.
///
/// Field order matches DAG-CBOR canonical key order (`roots` before `version`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarHeader {
    /// Root CIDs, in declaration order.
    pub roots: Vec<Cid>,
    /// Format version (always 1).
    pub version: u64,
}

impl CarHeader {
    /// Version 1 header declaring `roots`.
    pub fn new(roots: Vec<Cid>) -> Self {
        Self {
            roots,
            version: CAR_VERSION,
        }
    }

    /// DAG-CBOR encoding of this header.
    pub fn to_dag_cbor(&self) -> EdsResult<Vec<u8>> {
        serde_ipld_dagcbor::to_vec(self).map_err(|e| EdsError::Encoding(e.to_string()))
    }

    /// Write the length-prefixed header. Returns the number of bytes written.
    pub fn write_to(&self, writer: &mut impl Write) -> EdsResult<usize> {
        let encoded = self.to_dag_cbor()?;
        ld_write(writer, &[encoded.as_slice()])
    }
}
