use thiserror::Error;

use crate::types::{BlockContent, BlockType, ProofBlock, ReferenceRecord};

/// Reasons a [`ProofBlock`] is not ready to be saved.
///
/// The `Display` text is meant to be shown to the author as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Reference requires author, title, and year (missing: {missing})")]
    IncompleteReference { missing: &'static str },

    #[error("content of kind {found} does not belong to a {expected} block")]
    ContentTypeMismatch {
        expected: BlockType,
        found: BlockType,
    },
}

/// Check that a block is complete enough to be saved.
///
/// Returns `Ok(())` when the block passes, or the first [`ValidationError`]
/// found. The title is checked first and is required for every type. A
/// reference block that carries a record must have a non-blank `author`,
/// `title` and `year`; `link` and `doi` are optional. Media and text payloads
/// are not inspected beyond their variant.
pub fn validate_block(block: &ProofBlock) -> Result<(), ValidationError> {
    if block.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }

    validate_content(block.block_type, &block.content)?;

    match &block.content {
        BlockContent::Reference {
            reference: Some(record),
        } => validate_reference(record),
        BlockContent::Reference { reference: None }
        | BlockContent::Text { .. }
        | BlockContent::Image(_)
        | BlockContent::Video(_)
        | BlockContent::Audio(_) => Ok(()),
    }
}

/// Check that `content` is the variant for `block_type`.
pub fn validate_content(
    block_type: BlockType,
    content: &BlockContent,
) -> Result<(), ValidationError> {
    let found = content.block_type();
    if found != block_type {
        return Err(ValidationError::ContentTypeMismatch {
            expected: block_type,
            found,
        });
    }
    Ok(())
}

fn validate_reference(record: &ReferenceRecord) -> Result<(), ValidationError> {
    let required = [
        ("author", &record.author),
        ("title", &record.title),
        ("year", &record.year),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ValidationError::IncompleteReference { missing: name });
        }
    }
    Ok(())
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaContent;

    fn titled(block_type: BlockType, title: &str) -> ProofBlock {
        let mut b = ProofBlock::with_id("blk-1", block_type);
        b.title = title.into();
        b
    }

    fn reference(author: &str, title: &str, year: &str) -> ReferenceRecord {
        ReferenceRecord {
            author: author.into(),
            title: title.into(),
            year: year.into(),
            link: None,
            doi: None,
        }
    }

    #[test]
    fn titled_blocks_of_every_type_are_valid() {
        for t in BlockType::ALL {
            assert_eq!(validate_block(&titled(t, "Setup")), Ok(()));
        }
    }

    #[test]
    fn empty_title_rejected() {
        assert_eq!(
            validate_block(&titled(BlockType::Text, "")),
            Err(ValidationError::MissingTitle)
        );
    }

    #[test]
    fn whitespace_title_rejected() {
        assert_eq!(
            validate_block(&titled(BlockType::Image, "  \t ")),
            Err(ValidationError::MissingTitle)
        );
    }

    #[test]
    fn title_checked_before_reference_fields() {
        let mut b = titled(BlockType::Reference, "");
        b.content = BlockContent::Reference {
            reference: Some(reference("", "", "")),
        };
        assert_eq!(validate_block(&b), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn reference_missing_author_rejected() {
        let mut b = titled(BlockType::Reference, "Prior work");
        b.content = BlockContent::Reference {
            reference: Some(reference("", "X", "2020")),
        };
        let err = validate_block(&b).unwrap_err();
        assert_eq!(err, ValidationError::IncompleteReference { missing: "author" });
        assert!(err.to_string().contains("author"));
    }

    #[test]
    fn reference_blank_year_rejected() {
        let mut b = titled(BlockType::Reference, "Prior work");
        b.content = BlockContent::Reference {
            reference: Some(reference("Curie", "Radioactive substances", "   ")),
        };
        assert_eq!(
            validate_block(&b),
            Err(ValidationError::IncompleteReference { missing: "year" })
        );
    }

    #[test]
    fn reference_optional_fields_not_required() {
        let mut b = titled(BlockType::Reference, "Prior work");
        b.content = BlockContent::Reference {
            reference: Some(reference("Curie", "Radioactive substances", "1903")),
        };
        assert_eq!(validate_block(&b), Ok(()));
    }

    #[test]
    fn reference_without_record_only_needs_title() {
        assert_eq!(validate_block(&titled(BlockType::Reference, "Later")), Ok(()));
    }

    #[test]
    fn mismatched_content_rejected() {
        let mut b = titled(BlockType::Video, "Run 1");
        b.content = BlockContent::Image(MediaContent::default());
        assert_eq!(
            validate_block(&b),
            Err(ValidationError::ContentTypeMismatch {
                expected: BlockType::Video,
                found: BlockType::Image,
            })
        );
    }
}
