//! Inline layout of the canonical sequence.

use crate::config::LayoutConfig;
use crate::types::{Position, ProofBlock};

/// Place `ordered` blocks on a single row, left to right, starting at
/// `config.origin` and stepping `config.spacing` along x.
pub fn inline_positions<'a>(
    ordered: &[&'a ProofBlock],
    config: &LayoutConfig,
) -> Vec<(&'a str, Position)> {
    ordered
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let x = config.origin.x + config.spacing * i as f64;
            (b.id.as_str(), Position::new(x, config.origin.y))
        })
        .collect()
}

/// Consecutive `(source, target)` pairs of the canonical sequence.
///
/// Linking each pair turns the sequence into an explicit chain in the graph.
pub fn sequential_pairs<'a>(ordered: &[&'a ProofBlock]) -> Vec<(&'a str, &'a str)> {
    ordered
        .windows(2)
        .map(|w| (w[0].id.as_str(), w[1].id.as_str()))
        .collect()
}
