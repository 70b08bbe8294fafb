//! Local audit preview.
//!
//! The real audit decision comes from the external audit service and is
//! applied with [`EditorStore::apply_audit_result`](crate::EditorStore::apply_audit_result).
//! The preview here is a deterministic stand-in shown until that response
//! arrives: a canned summary keyed by block type, and a pass/fail taken from
//! the length of the trimmed title.

use crate::types::{BlockStatus, BlockType, ProofBlock};
use crate::validation::ValidationError;

/// Minimum trimmed title length (in characters) for the preview to approve.
pub const DEFAULT_MIN_TITLE_LEN: usize = 3;

/// The outcome of a local audit preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPreview {
    pub status: BlockStatus,
    pub summary: String,
}

/// Derive a preview decision for `block`.
///
/// Fails with [`ValidationError::MissingTitle`] when the title is blank.
pub fn preview(block: &ProofBlock, min_title_len: usize) -> Result<AuditPreview, ValidationError> {
    let title = block.title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingTitle);
    }

    let summary = format!(
        "This block (\u{201c}{title}\u{201d}) summarizes a {} step: {}",
        block.block_type,
        detail(block.block_type)
    );
    let status = if title.chars().count() >= min_title_len {
        BlockStatus::Approved
    } else {
        BlockStatus::Rejected
    };

    Ok(AuditPreview { status, summary })
}

fn detail(block_type: BlockType) -> &'static str {
    match block_type {
        BlockType::Text => "it contains narrative or markdown content relevant to the research.",
        BlockType::Image => {
            "it includes an illustrative figure or setup photo supporting the methodology."
        }
        BlockType::Video => "it provides a recorded demonstration or experiment capture.",
        BlockType::Audio => "it provides a recorded explanation, interview, or sensor audio.",
        BlockType::Reference => "it lists bibliographic sources that support this step.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(block_type: BlockType, title: &str) -> ProofBlock {
        let mut b = ProofBlock::with_id("blk", block_type);
        b.title = title.into();
        b
    }

    #[test]
    fn blank_title_refused() {
        assert_eq!(
            preview(&titled(BlockType::Text, "   "), DEFAULT_MIN_TITLE_LEN),
            Err(ValidationError::MissingTitle)
        );
    }

    #[test]
    fn long_enough_title_approved() {
        let p = preview(&titled(BlockType::Video, " Run "), DEFAULT_MIN_TITLE_LEN).unwrap();
        assert_eq!(p.status, BlockStatus::Approved);
        assert!(p.summary.contains("\u{201c}Run\u{201d}"));
        assert!(p.summary.contains("summarizes a video step"));
        assert!(p.summary.ends_with("experiment capture."));
    }

    #[test]
    fn short_title_rejected() {
        let p = preview(&titled(BlockType::Text, "ab"), DEFAULT_MIN_TITLE_LEN).unwrap();
        assert_eq!(p.status, BlockStatus::Rejected);
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        let p = preview(&titled(BlockType::Text, "éé"), DEFAULT_MIN_TITLE_LEN).unwrap();
        assert_eq!(p.status, BlockStatus::Rejected);
    }

    #[test]
    fn summary_is_deterministic_per_type() {
        for t in BlockType::ALL {
            let a = preview(&titled(t, "Step"), DEFAULT_MIN_TITLE_LEN).unwrap();
            let b = preview(&titled(t, "Step"), DEFAULT_MIN_TITLE_LEN).unwrap();
            assert_eq!(a, b);
            assert!(a.summary.contains(&format!("a {t} step")));
        }
    }
}
