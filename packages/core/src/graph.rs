use std::collections::HashSet;

use thiserror::Error;

use crate::types::Edge;

/// Why an edge insertion was refused.
///
/// The `Display` text is meant to be shown to the author as-is; each variant
/// reads differently so the UI can explain the failed connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Cannot connect a block to itself")]
    SelfLoop { block_id: String },

    #[error("Blocks are already connected ({edge_id})")]
    DuplicateEdge { edge_id: String },

    #[error("Cannot create connection: cycle detected ({from} -> {to})")]
    CycleDetected { from: String, to: String },
}

/// The directed edge set between block ids.
///
/// Each edge means "source precedes target" in the published sequence. The
/// set is kept acyclic, free of self-loops and free of duplicates: every
/// insertion goes through [`LinkGraph::add_edge`], which refuses anything
/// that would break those properties.
///
/// Edges are kept in insertion order; traversals follow outgoing edges in
/// that order.
#[derive(Debug, Default, Clone)]
pub struct LinkGraph {
    edges: Vec<Edge>,
}

impl LinkGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Retrieve an edge by id.
    pub fn get(&self, edge_id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    /// Whether an edge `source -> target` exists.
    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    /// Targets of `id`'s outgoing edges, in edge-insertion order.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source == id)
            .map(|e| e.target.as_str())
    }

    /// Sources of `id`'s incoming edges, in edge-insertion order.
    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.target == id)
            .map(|e| e.source.as_str())
    }

    /// Insert `source -> target`.
    ///
    /// Checks, in order: self-loop, duplicate (same derived id or same pair),
    /// then whether the edge would close a cycle. On any rejection the graph
    /// is left untouched.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<Edge, GraphError> {
        if source == target {
            return Err(GraphError::SelfLoop {
                block_id: source.to_string(),
            });
        }

        let edge = Edge::new(source, target);
        if self.get(&edge.id).is_some() || self.contains(source, target) {
            return Err(GraphError::DuplicateEdge { edge_id: edge.id });
        }

        if self.would_create_cycle(&edge) {
            return Err(GraphError::CycleDetected {
                from: edge.source,
                to: edge.target,
            });
        }

        self.edges.push(edge.clone());
        Ok(edge)
    }

    /// Whether adding `candidate` would close a directed cycle.
    ///
    /// Runs a depth-first search from `candidate.source` over the current
    /// edges plus the candidate, tracking visited nodes and the nodes on the
    /// current path. Reaching a node that is still on the path means a cycle.
    /// Because the stored set is already acyclic, any new cycle has to pass
    /// through the candidate, so searching from its source is enough.
    pub fn would_create_cycle(&self, candidate: &Edge) -> bool {
        self.cycle_from(&candidate.source, Some(candidate))
    }

    /// Whether the stored edge set is acyclic.
    pub fn is_acyclic(&self) -> bool {
        self.edges
            .iter()
            .all(|e| !self.cycle_from(&e.source, None))
    }

    /// Remove an edge by id. Returns the removed edge, if any.
    pub fn remove_edge(&mut self, edge_id: &str) -> Option<Edge> {
        let idx = self.edges.iter().position(|e| e.id == edge_id)?;
        Some(self.edges.remove(idx))
    }

    /// Remove every edge where `block_id` is source or target.
    pub fn remove_touching(&mut self, block_id: &str) -> Vec<Edge> {
        let mut removed = Vec::new();
        self.edges.retain(|e| {
            if e.touches(block_id) {
                removed.push(e.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Rewrite every endpoint equal to `old_id` to `new_id`.
    ///
    /// Edge ids that were derived from the old endpoints are re-derived; ids
    /// assigned some other way are kept.
    pub fn rename_block(&mut self, old_id: &str, new_id: &str) {
        for e in &mut self.edges {
            if !e.touches(old_id) {
                continue;
            }
            let derived = e.has_derived_id();
            if e.source == old_id {
                e.source = new_id.to_string();
            }
            if e.target == old_id {
                e.target = new_id.to_string();
            }
            if derived {
                e.id = Edge::derive_id(&e.source, &e.target);
            }
        }
    }

    /// Drop every edge.
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    // Iterative white/gray/black DFS from `start` over the stored edges plus
    // an optional extra edge.
    fn cycle_from<'a>(&'a self, start: &'a str, extra: Option<&'a Edge>) -> bool {
        struct Frame<'a> {
            node: &'a str,
            successors: Vec<&'a str>,
            next: usize,
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut on_path: HashSet<&str> = HashSet::new();

        visited.insert(start);
        on_path.insert(start);
        let mut frames = vec![Frame {
            node: start,
            successors: self.successors(start, extra),
            next: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            match frame.successors.get(frame.next).copied() {
                Some(child) => {
                    frame.next += 1;
                    if on_path.contains(child) {
                        return true;
                    }
                    if visited.insert(child) {
                        on_path.insert(child);
                        let successors = self.successors(child, extra);
                        frames.push(Frame {
                            node: child,
                            successors,
                            next: 0,
                        });
                    }
                }
                None => {
                    on_path.remove(frame.node);
                    frames.pop();
                }
            }
        }

        false
    }

    fn successors<'a>(&'a self, node: &str, extra: Option<&'a Edge>) -> Vec<&'a str> {
        self.edges
            .iter()
            .chain(extra)
            .filter(|e| e.source == node)
            .map(|e| e.target.as_str())
            .collect()
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(ids: &[&str]) -> LinkGraph {
        let mut g = LinkGraph::new();
        for pair in ids.windows(2) {
            g.add_edge(pair[0], pair[1]).unwrap();
        }
        g
    }

    #[test]
    fn add_and_query() {
        let g = chain(&["a", "b", "c"]);
        assert_eq!(g.len(), 2);
        assert!(g.contains("a", "b"));
        assert!(!g.contains("b", "a"));
        assert_eq!(g.outgoing("a").collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(g.incoming("c").collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(g.get("eb-c").map(|e| e.target.as_str()), Some("c"));
    }

    #[test]
    fn self_loop_rejected() {
        let mut g = LinkGraph::new();
        assert_eq!(
            g.add_edge("a", "a"),
            Err(GraphError::SelfLoop {
                block_id: "a".into()
            })
        );
        assert!(g.is_empty());
    }

    #[test]
    fn duplicate_rejected() {
        let mut g = chain(&["a", "b"]);
        assert!(matches!(
            g.add_edge("a", "b"),
            Err(GraphError::DuplicateEdge { .. })
        ));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn direct_back_edge_is_a_cycle() {
        let mut g = chain(&["a", "b"]);
        assert!(matches!(
            g.add_edge("b", "a"),
            Err(GraphError::CycleDetected { .. })
        ));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn long_back_edge_is_a_cycle() {
        let mut g = chain(&["a", "b", "c", "d", "e"]);
        let before = g.edges().to_vec();
        assert!(matches!(
            g.add_edge("e", "a"),
            Err(GraphError::CycleDetected { .. })
        ));
        assert_eq!(g.edges(), before.as_slice());
        assert!(g.is_acyclic());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let mut g = LinkGraph::new();
        g.add_edge("a", "b").unwrap();
        g.add_edge("a", "c").unwrap();
        g.add_edge("b", "d").unwrap();
        g.add_edge("c", "d").unwrap();
        // A shortcut that rejoins the same sink is still acyclic.
        g.add_edge("a", "d").unwrap();
        assert_eq!(g.len(), 5);
        assert!(g.is_acyclic());
    }

    #[test]
    fn outgoing_keeps_insertion_order() {
        let mut g = LinkGraph::new();
        g.add_edge("root", "z").unwrap();
        g.add_edge("root", "a").unwrap();
        g.add_edge("root", "m").unwrap();
        assert_eq!(g.outgoing("root").collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn remove_edge_by_id() {
        let mut g = chain(&["a", "b", "c"]);
        let removed = g.remove_edge("ea-b").unwrap();
        assert_eq!(removed.source, "a");
        assert_eq!(g.len(), 1);
        assert!(g.remove_edge("ea-b").is_none());
        // With the link gone the reverse direction is allowed.
        g.add_edge("b", "a").unwrap();
    }

    #[test]
    fn remove_touching_cascades() {
        let mut g = chain(&["a", "b", "c"]);
        g.add_edge("a", "c").unwrap();
        let removed = g.remove_touching("b");
        assert_eq!(removed.len(), 2);
        assert!(g.edges().iter().all(|e| !e.touches("b")));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn rename_rewrites_endpoints_and_derived_ids() {
        let mut g = chain(&["tmp", "b"]);
        g.add_edge("c", "tmp").unwrap();
        g.rename_block("tmp", "srv-1");
        assert!(g.edges().iter().all(|e| !e.touches("tmp")));
        assert!(g.contains("srv-1", "b"));
        assert!(g.contains("c", "srv-1"));
        assert!(g.get("esrv-1-b").is_some());
        assert!(g.get("ec-srv-1").is_some());
    }
}
