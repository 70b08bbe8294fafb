//! Human-readable text rendering of [`ProofBlock`]s and block sequences.
//!
//! The output is stable plain text suitable for terminals or logs. It is not
//! a canonical format; only the JSON snapshot is.

use crate::registry::BlockRegistry;
use crate::types::{BlockContent, BlockType, MediaContent, ProofBlock};

/// Render a single [`ProofBlock`] as indented plain text.
///
/// ```text
/// [reference] approved  "Prior work"
/// Sources behind the method section.
///
/// Reference:
///   Lovelace, A. (1843). Notes on the Analytical Engine
///   doi: 10.1000/xyz
///
/// Audit: This block ("Prior work") summarizes a reference step: ...
///
/// id: 019526b2-f68a-7c3e-a0b4-1d2e3f4a5b6e  created: 2026-02-18T12:02:00Z
/// ```
pub fn render_block(block: &ProofBlock) -> String {
    let mut out = format!(
        "[{}] {}  \"{}\"\n",
        block.block_type,
        block.status,
        block.display_title()
    );

    if !block.description.trim().is_empty() {
        out.push_str(&wrap(block.description.trim(), 80));
        out.push('\n');
    }

    match &block.content {
        BlockContent::Text { markdown } if !markdown.trim().is_empty() => {
            out.push_str("\nMarkdown:\n");
            for line in markdown.lines() {
                out.push_str(&format!("  {}\n", line));
            }
        }
        BlockContent::Image(media) | BlockContent::Video(media) | BlockContent::Audio(media) => {
            if let Some(line) = media_line(media) {
                out.push('\n');
                out.push_str(&line);
                out.push('\n');
            }
        }
        BlockContent::Reference {
            reference: Some(r),
        } => {
            out.push_str("\nReference:\n");
            out.push_str(&format!("  {} ({}). {}\n", r.author, r.year, r.title));
            if let Some(link) = &r.link {
                out.push_str(&format!("  link: {}\n", link));
            }
            if let Some(doi) = &r.doi {
                out.push_str(&format!("  doi: {}\n", doi));
            }
        }
        _ => {}
    }

    if let Some(summary) = &block.audit_summary {
        out.push('\n');
        out.push_str(&format!("Audit: {}\n", summary));
    }

    out.push('\n');
    out.push_str(&format!("id: {}  created: {}\n", block.id, block.created_at));
    out
}

/// Render an ordered sequence as a numbered list.
///
/// ```text
/// Proof sequence  2 blocks
/// ────────────────────────
///   1. [text]      approved   "Intro"          019526b2
///   2. [image]     in_review  "Bench setup"    019526b3
/// ```
pub fn render_sequence(ordered: &[&ProofBlock]) -> String {
    let total = ordered.len();
    let header = format!(
        "Proof sequence  {} block{}",
        total,
        if total == 1 { "" } else { "s" }
    );
    let rule = "─".repeat(header.chars().count());
    let mut out = format!("{}\n{}\n", header, rule);

    for (i, b) in ordered.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<11} {:<10} {:<32} {}\n",
            i + 1,
            format!("[{}]", b.block_type),
            b.status.to_string(),
            format!("\"{}\"", truncate(b.display_title(), 30)),
            short_id(&b.id)
        ));
    }
    out
}

/// Summarise a registry grouped by block type.
pub fn render_summary(registry: &BlockRegistry) -> String {
    let total = registry.len();
    let mut out = format!(
        "{} block{}\n",
        total,
        if total == 1 { "" } else { "s" }
    );
    for t in BlockType::ALL {
        let blocks = registry.by_type(t);
        if blocks.is_empty() {
            continue;
        }
        out.push_str(&format!("  {:<10} {}\n", t.label(), blocks.len()));
    }
    out
}

// --- helpers -----------------------------------------------------------------

fn media_line(media: &MediaContent) -> Option<String> {
    let url = media.url.as_deref()?;
    let capture = if media.is_screen_capture == Some(true) {
        "  (screen capture)"
    } else {
        ""
    };
    Some(format!("Media: {}{}", url, capture))
}

fn wrap(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0usize;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len > 0 && line_len + word_len + 1 > width {
            result.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }
    result
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max - 1).collect();
        format!("{}…", kept)
    }
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((i, _)) => &id[..i],
        None => id,
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockStatus, ReferenceRecord};

    fn reference_block() -> ProofBlock {
        let mut b = ProofBlock::with_id("019526b2-f68a-7c3e-a0b4-1d2e3f4a5b6c", BlockType::Reference);
        b.title = "Prior work".into();
        b.description = "Sources behind the method section.".into();
        b.status = BlockStatus::Approved;
        b.content = BlockContent::Reference {
            reference: Some(ReferenceRecord {
                author: "Lovelace, A.".into(),
                title: "Notes on the Analytical Engine".into(),
                year: "1843".into(),
                link: None,
                doi: Some("10.1000/xyz".into()),
            }),
        };
        b
    }

    #[test]
    fn render_block_contains_key_fields() {
        let rendered = render_block(&reference_block());
        assert!(rendered.starts_with("[reference] approved  \"Prior work\""));
        assert!(rendered.contains("Lovelace, A."));
        assert!(rendered.contains("doi: 10.1000/xyz"));
        assert!(rendered.contains("019526b2-f68a"));
        assert!(!rendered.contains("Audit:"));
    }

    #[test]
    fn render_block_media_and_untitled() {
        let mut b = ProofBlock::with_id("v1", BlockType::Video);
        b.content = BlockContent::Video(MediaContent {
            url: Some("https://cdn.example/run.mp4".into()),
            is_screen_capture: Some(true),
        });
        let rendered = render_block(&b);
        assert!(rendered.contains("\"Block\""));
        assert!(rendered.contains("Media: https://cdn.example/run.mp4  (screen capture)"));
    }

    #[test]
    fn render_sequence_numbers_in_order() {
        let a = reference_block();
        let mut b = ProofBlock::with_id("bbbbbbbbbbbb", BlockType::Image);
        b.title = "Bench setup".into();
        let rendered = render_sequence(&[&b, &a]);
        assert!(rendered.contains("2 blocks"));
        let first = rendered.find("Bench setup").unwrap();
        let second = rendered.find("Prior work").unwrap();
        assert!(first < second);
        assert!(rendered.contains("  1. [image]"));
        assert!(rendered.contains("bbbbbbbb\n"));
    }

    #[test]
    fn render_summary_groups_by_type() {
        let mut r = BlockRegistry::new();
        r.insert(reference_block()).unwrap();
        r.insert(ProofBlock::with_id("t", BlockType::Text)).unwrap();
        let rendered = render_summary(&r);
        assert!(rendered.starts_with("2 blocks"));
        assert!(rendered.contains("Text"));
        assert!(rendered.contains("Reference"));
        assert!(!rendered.contains("Audio"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééééé", 3), "éé…");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
