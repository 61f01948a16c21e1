//! Error types for the eds-archive library.

use std::fmt;

use thiserror::Error;

/// Pipeline phase an error surfaced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Re-importing the square and caching its inner nodes.
    Reconstruction,
    /// Writing the CARv1 header.
    Header,
    /// Writing the quadrant-ordered shares.
    Leaves,
    /// Writing the cached inner nodes.
    Proofs,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Phase::Reconstruction => "failure creating eds writer",
            Phase::Header => "failure writing carv1 header",
            Phase::Leaves => "failure writing shares",
            Phase::Proofs => "failure writing proofs",
        };
        f.write_str(msg)
    }
}

/// Coarse error category, stable across phase annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input square has an impossible geometry.
    Validation,
    /// The square could not be rebuilt from its shares.
    Reconstruction,
    /// Staging, committing, enumerating or reading cached nodes failed.
    Cache,
    /// A hash could not be turned into a content identifier.
    IdentifierDerivation,
    /// Writing to the sink or encoding the archive framing failed.
    Io,
    /// The caller cancelled the write or its deadline passed.
    Cancelled,
}

/// All errors that can occur in the eds-archive library.
#[derive(Error, Debug)]
pub enum EdsError {
    /// No shares were supplied.
    #[error("share: importing empty data")]
    EmptySquare,

    /// Share count is not a perfect square.
    #[error("number of shares {0} is not a square number")]
    NotSquare(usize),

    /// Square width cannot be split into four quadrants.
    #[error("square width {0} is not even")]
    OddWidth(usize),

    /// A share differs in size from the first share of the square.
    #[error("share {index} has size {got}, expected {expected}")]
    ShareSize {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// Shares must at least hold a namespace.
    #[error("share size {0} is smaller than the namespace size")]
    ShareTooSmall(usize),

    /// The erasure codec rejected its input.
    #[error("codec error: {0}")]
    Codec(String),

    /// Square is wider than the codec can encode.
    #[error("square width {width} exceeds the {codec} codec limit of {max} chunks")]
    CodecLimit {
        codec: &'static str,
        width: usize,
        max: usize,
    },

    /// Leaves pushed to a namespaced tree out of namespace order.
    #[error("pushed data has to be lexicographically ordered by namespace IDs")]
    NamespaceOrder,

    /// More leaves pushed to a tree than the square is wide.
    #[error("tree for {axis} {index} received more than {width} leaves")]
    TreeOverflow {
        axis: &'static str,
        index: usize,
        width: usize,
    },

    /// A cell or axis index outside the square.
    #[error("index {index} out of range for square width {width}")]
    OutOfRange { index: usize, width: usize },

    /// Digest is not a namespaced SHA-256 hash.
    #[error("invalid namespaced sha256 digest of {0} bytes")]
    InvalidDigest(usize),

    /// Multihash wrapping failed.
    #[error("multihash error: {0}")]
    Multihash(String),

    /// Inner node payload has the wrong length.
    #[error("inner node payload of {0} bytes is not two namespaced hashes")]
    InvalidInnerNode(usize),

    /// Block missing from the node store.
    #[error("block {0} not found")]
    BlockNotFound(String),

    /// Node store is poisoned or otherwise unusable.
    #[error("block store failure: {0}")]
    Store(String),

    /// Inner nodes staged after the batch was committed.
    #[error("node batch already committed")]
    BatchCommitted,

    /// DAG-CBOR encoding of the header failed.
    #[error("header encoding error: {0}")]
    Encoding(String),

    /// Configuration could not be loaded or saved.
    #[error("config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Write was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// Deadline elapsed before the write finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Error annotated with the phase that produced it.
    #[error("share: {phase}: {source}")]
    Phase {
        phase: Phase,
        #[source]
        source: Box<EdsError>,
    },
}

impl EdsError {
    /// Wrap this error with the phase it surfaced in.
    pub fn in_phase(self, phase: Phase) -> Self {
        EdsError::Phase {
            phase,
            source: Box::new(self),
        }
    }

    /// The category of this error, looking through phase annotations.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EdsError::EmptySquare | EdsError::NotSquare(_) | EdsError::OddWidth(_) => {
                ErrorKind::Validation
            }
            EdsError::ShareSize { .. }
            | EdsError::ShareTooSmall(_)
            | EdsError::Codec(_)
            | EdsError::CodecLimit { .. }
            | EdsError::NamespaceOrder
            | EdsError::TreeOverflow { .. }
            | EdsError::OutOfRange { .. } => ErrorKind::Reconstruction,
            EdsError::InvalidDigest(_)
            | EdsError::Multihash(_)
            | EdsError::InvalidInnerNode(_) => ErrorKind::IdentifierDerivation,
            EdsError::BlockNotFound(_) | EdsError::Store(_) | EdsError::BatchCommitted => {
                ErrorKind::Cache
            }
            EdsError::Encoding(_) | EdsError::Config(_) | EdsError::Io(_) => ErrorKind::Io,
            EdsError::Cancelled | EdsError::DeadlineExceeded => ErrorKind::Cancelled,
            EdsError::Phase { source, .. } => source.kind(),
        }
    }

    /// The phase this error was annotated with, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            EdsError::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// Convenience result type for eds-archive operations.
pub type EdsResult<T> = Result<T, EdsError>;
