//! Erasure codecs used to extend rows and columns of a data square.

use std::sync::Arc;

use reed_solomon_erasure::galois_8;
use serde::{Deserialize, Serialize};

use crate::types::{EdsError, EdsResult};

/// An erasure codec that turns `k` data chunks into `k` parity chunks.
pub trait Codec: Send + Sync {
    /// Identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Maximum number of chunks (data plus parity) in one codeword.
    fn max_chunks(&self) -> usize;

    /// Compute the parity chunks for `data`. All chunks must share one size.
    fn encode(&self, data: &[&[u8]]) -> EdsResult<Vec<Vec<u8>>>;
}

/// Systematic Reed–Solomon over GF(2^8), backed by `reed-solomon-erasure`.
///
/// The coding matrix is derived from a Vandermonde matrix, so data chunk `j`
/// is the evaluation of the interpolating polynomial at `x = j` and parity
/// chunk `p` its evaluation at `x = k + p`. Any `k` of the `2k` chunks
/// determine the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReedSolomon;

impl Codec for ReedSolomon {
    fn name(&self) -> &'static str {
        "ReedSolomonGF8"
    }

    fn max_chunks(&self) -> usize {
        256
    }

    fn encode(&self, data: &[&[u8]]) -> EdsResult<Vec<Vec<u8>>> {
        let k = data.len();
        if k == 0 {
            return Ok(Vec::new());
        }
        if 2 * k > self.max_chunks() {
            return Err(EdsError::CodecLimit {
                codec: self.name(),
                width: 2 * k,
                max: self.max_chunks(),
            });
        }
        let size = data[0].len();
        if let Some((index, chunk)) = data.iter().enumerate().find(|(_, c)| c.len() != size) {
            return Err(EdsError::ShareSize {
                index,
                expected: size,
                got: chunk.len(),
            });
        }

        if size == 0 {
            return Ok(vec![Vec::new(); k]);
        }

        let encoder =
            galois_8::ReedSolomon::new(k, k).map_err(|e| EdsError::Codec(e.to_string()))?;
        let mut shards: Vec<Vec<u8>> = data.iter().map(|chunk| chunk.to_vec()).collect();
        shards.resize(2 * k, vec![0u8; size]);
        encoder
            .encode(&mut shards)
            .map_err(|e| EdsError::Codec(e.to_string()))?;
        Ok(shards.split_off(k))
    }
}

/// Codecs selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodecKind {
    /// [`ReedSolomon`].
    #[default]
    ReedSolomonGf8,
}

impl CodecKind {
    /// Instantiate the codec.
    pub fn build(&self) -> Arc<dyn Codec> {
        match self {
            CodecKind::ReedSolomonGf8 => Arc::new(ReedSolomon),
        }
    }
}

/// The codec used when none is configured.
pub fn default_codec() -> Arc<dyn Codec> {
    CodecKind::default().build()
}
