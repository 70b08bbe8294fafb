//! SHA-256 digest of a block sequence.
//!
//! The digest is what gets published for a repository. It covers, for each
//! block in sequence order, the title, the description, and the RFC 8785
//! (JCS) canonical JSON of the content payload. Ids, status, audit summary,
//! position and timestamps are not covered, so re-auditing or moving a block
//! on the canvas does not change the digest while reordering does.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::types::ProofBlock;

/// Errors returned by [`sequence_digest`].
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("canonicalization of block {id} failed: {reason}")]
    Canonicalization { id: String, reason: String },
}

/// Hash `blocks` in the given order. Returns `0x` followed by 64 lowercase
/// hex digits.
pub fn sequence_digest<'a>(
    blocks: impl IntoIterator<Item = &'a ProofBlock>,
) -> Result<String, DigestError> {
    let mut hasher = Sha256::new();
    for block in blocks {
        let content = serde_jcs::to_vec(&block.content).map_err(|e| {
            DigestError::Canonicalization {
                id: block.id.clone(),
                reason: e.to_string(),
            }
        })?;
        hasher.update(block.title.as_bytes());
        hasher.update(block.description.as_bytes());
        hasher.update(&content);
    }
    Ok(format!("0x{}", hex::encode(hasher.finalize())))
}
