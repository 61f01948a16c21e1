//! Deriving CIDs from namespaced SHA-256 digests.
//!
//! Leaves, inner nodes and roots all map to CIDv1 with the NMT codec; the
//! leaf/inner distinction lives in the digest's domain separation byte.

use cid::multihash::Multihash;
use cid::Cid;

use crate::nmt::NmtHasher;
use crate::types::{
    EdsError, EdsResult, NAMESPACED_HASH_SIZE, NAMESPACE_SIZE, NMT_CODEC, SHA256_NAMESPACE8,
};

/// Wrap a namespaced digest in a CIDv1.
pub fn cid_from_namespaced_sha256(hash: &[u8]) -> EdsResult<Cid> {
    if hash.len() != NAMESPACED_HASH_SIZE {
        return Err(EdsError::InvalidDigest(hash.len()));
    }
    let mh = Multihash::<64>::wrap(SHA256_NAMESPACE8, hash)
        .map_err(|e| EdsError::Multihash(e.to_string()))?;
    Ok(Cid::new_v1(NMT_CODEC, mh))
}

/// CID of a tagged share stored as a leaf block.
pub fn leaf_cid(tagged_share: &[u8]) -> EdsResult<Cid> {
    if tagged_share.len() < NAMESPACE_SIZE {
        return Err(EdsError::ShareTooSmall(tagged_share.len()));
    }
    cid_from_namespaced_sha256(NmtHasher::hash_leaf(tagged_share).as_bytes())
}

/// CID of an inner node stored as `left ‖ right`.
pub fn inner_cid(children: &[u8]) -> EdsResult<Cid> {
    cid_from_namespaced_sha256(NmtHasher::hash_inner_raw(children)?.as_bytes())
}

/// CID of a row or column root.
pub fn root_cid(root: &[u8]) -> EdsResult<Cid> {
    cid_from_namespaced_sha256(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cid_carries_codec_and_digest() {
        let hash = [7u8; NAMESPACED_HASH_SIZE];
        let cid = cid_from_namespaced_sha256(&hash).unwrap();
        assert_eq!(cid.codec(), NMT_CODEC);
        assert_eq!(cid.hash().code(), SHA256_NAMESPACE8);
        assert_eq!(cid.hash().digest(), &hash[..]);
    }

    #[test]
    fn test_wrong_digest_length_rejected() {
        let err = cid_from_namespaced_sha256(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, EdsError::InvalidDigest(32)));
    }

    #[test]
    fn test_inner_cid_requires_two_children() {
        let err = inner_cid(&[0u8; NAMESPACED_HASH_SIZE]).unwrap_err();
        assert!(matches!(err, EdsError::InvalidInnerNode(48)));
    }
}
