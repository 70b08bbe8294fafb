//! Canonical linear ordering of the block graph.
//!
//! The canonical order is the sequence used for list display, layout,
//! auto-linking and the published digest. It always contains every registered
//! block exactly once:
//!
//! 1. With no start marker, or a start marker naming a block that no longer
//!    exists, it is simply registry insertion order.
//! 2. Otherwise it is a depth-first pre-order walk from the start block,
//!    following outgoing edges in the order they were created and skipping
//!    anything already visited. A block with several outgoing edges is
//!    flattened branch by branch.
//! 3. Blocks the walk did not reach are appended in registry order.

use std::collections::HashSet;

use crate::graph::LinkGraph;
use crate::registry::BlockRegistry;
use crate::types::ProofBlock;

/// The canonical sequence of blocks, borrowed from `registry`.
pub fn ordered_blocks<'a>(
    registry: &'a BlockRegistry,
    graph: &LinkGraph,
    start: Option<&str>,
) -> Vec<&'a ProofBlock> {
    ordered_ids(registry, graph, start)
        .into_iter()
        .filter_map(|id| registry.get(id))
        .collect()
}

/// The canonical sequence of block ids, borrowed from `registry`.
pub fn ordered_ids<'a>(
    registry: &'a BlockRegistry,
    graph: &LinkGraph,
    start: Option<&str>,
) -> Vec<&'a str> {
    let Some(start) = start.and_then(|s| registry.get(s)).map(|b| b.id.as_str()) else {
        return registry.ids().collect();
    };

    let mut visited: HashSet<&str> = HashSet::with_capacity(registry.len());
    let mut out: Vec<&'a str> = Vec::with_capacity(registry.len());

    // Children are pushed in reverse so they pop in edge-creation order.
    let mut stack: Vec<String> = vec![start.to_string()];
    while let Some(node) = stack.pop() {
        let Some(block) = registry.get(&node) else {
            // Stored edges are trusted; a dangling endpoint is skipped.
            continue;
        };
        let id = block.id.as_str();
        if !visited.insert(id) {
            continue;
        }
        out.push(id);

        let children: Vec<&str> = graph.outgoing(id).collect();
        for child in children.into_iter().rev() {
            if !visited.contains(child) {
                stack.push(child.to_string());
            }
        }
    }

    for id in registry.ids() {
        if !visited.contains(id) {
            out.push(id);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockType;

    fn registry(ids: &[&str]) -> BlockRegistry {
        let mut r = BlockRegistry::new();
        for id in ids {
            r.insert(ProofBlock::with_id(*id, BlockType::Text)).unwrap();
        }
        r
    }

    fn graph(edges: &[(&str, &str)]) -> LinkGraph {
        let mut g = LinkGraph::new();
        for (s, t) in edges {
            g.add_edge(s, t).unwrap();
        }
        g
    }

    #[test]
    fn no_start_uses_registry_order() {
        let r = registry(&["a", "b", "c"]);
        let g = graph(&[("c", "b"), ("b", "a")]);
        assert_eq!(ordered_ids(&r, &g, None), vec!["a", "b", "c"]);
    }

    #[test]
    fn dangling_start_uses_registry_order() {
        let r = registry(&["a", "b", "c"]);
        let g = graph(&[("c", "b")]);
        assert_eq!(ordered_ids(&r, &g, Some("gone")), vec!["a", "b", "c"]);
    }

    #[test]
    fn follows_chain_from_start() {
        let r = registry(&["a", "b", "c"]);
        let g = graph(&[("c", "b"), ("b", "a")]);
        assert_eq!(ordered_ids(&r, &g, Some("c")), vec!["c", "b", "a"]);
    }

    #[test]
    fn branches_flatten_depth_first_in_edge_order() {
        // s -> x -> x2, s -> y, where s->x was created before s->y.
        let r = registry(&["s", "y", "x", "x2"]);
        let g = graph(&[("s", "x"), ("s", "y"), ("x", "x2")]);
        assert_eq!(ordered_ids(&r, &g, Some("s")), vec!["s", "x", "x2", "y"]);
    }

    #[test]
    fn shared_descendant_visited_once() {
        let r = registry(&["a", "b", "c", "d"]);
        let g = graph(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        assert_eq!(ordered_ids(&r, &g, Some("a")), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn unreached_blocks_appended_in_registry_order() {
        let r = registry(&["lonely", "a", "b", "other"]);
        let g = graph(&[("a", "b")]);
        assert_eq!(
            ordered_ids(&r, &g, Some("a")),
            vec!["a", "b", "lonely", "other"]
        );
    }

    #[test]
    fn start_in_middle_of_chain() {
        let r = registry(&["a", "b", "c"]);
        let g = graph(&[("a", "b"), ("b", "c")]);
        assert_eq!(ordered_ids(&r, &g, Some("b")), vec!["b", "c", "a"]);
    }

    #[test]
    fn edges_to_unregistered_blocks_are_skipped() {
        let r = registry(&["a", "b"]);
        let g = graph(&[("a", "ghost"), ("a", "b")]);
        assert_eq!(ordered_ids(&r, &g, Some("a")), vec!["a", "b"]);
    }

    #[test]
    fn ordered_blocks_matches_ids() {
        let r = registry(&["a", "b"]);
        let g = graph(&[("b", "a")]);
        let blocks = ordered_blocks(&r, &g, Some("b"));
        let ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
