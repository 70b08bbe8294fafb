use std::collections::HashMap;

use crate::types::{BlockType, ProofBlock};

/// The collection of proof blocks, keyed by id.
///
/// The registry remembers insertion order: [`BlockRegistry::blocks`] and
/// [`BlockRegistry::ids`] enumerate in the order blocks were added, which is
/// the fallback order for the canonical sequence. Replacing a block in place
/// keeps its slot.
#[derive(Debug, Default, Clone)]
pub struct BlockRegistry {
    order: Vec<String>,
    blocks: HashMap<String, ProofBlock>,
}

impl BlockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of blocks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    /// Retrieve a block by id.
    pub fn get(&self, id: &str) -> Option<&ProofBlock> {
        self.blocks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ProofBlock> {
        self.blocks.get_mut(id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Blocks in insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = &ProofBlock> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    /// All blocks of a given type, in insertion order.
    pub fn by_type(&self, block_type: BlockType) -> Vec<&ProofBlock> {
        self.blocks()
            .filter(|b| b.block_type == block_type)
            .collect()
    }

    /// Append a block. Returns the block back if its id is already taken.
    pub fn insert(&mut self, block: ProofBlock) -> Result<(), ProofBlock> {
        if self.blocks.contains_key(&block.id) {
            return Err(block);
        }
        self.order.push(block.id.clone());
        self.blocks.insert(block.id.clone(), block);
        Ok(())
    }

    /// Remove a block by id, returning it.
    pub fn remove(&mut self, id: &str) -> Option<ProofBlock> {
        let block = self.blocks.remove(id)?;
        self.order.retain(|i| i != id);
        Some(block)
    }

    /// Put `block` in the slot held by `old_id`, keeping its position in the
    /// enumeration order. `block.id` may differ from `old_id`.
    ///
    /// Returns `false` without changing anything when `old_id` is unknown or
    /// `block.id` already names a different block.
    pub fn replace(&mut self, old_id: &str, block: ProofBlock) -> bool {
        if !self.blocks.contains_key(old_id) {
            return false;
        }
        if block.id != old_id && self.blocks.contains_key(&block.id) {
            return false;
        }
        self.blocks.remove(old_id);
        if let Some(slot) = self.order.iter_mut().find(|i| *i == old_id) {
            *slot = block.id.clone();
        }
        self.blocks.insert(block.id.clone(), block);
        true
    }

    /// Drop every block.
    pub fn clear(&mut self) {
        self.order.clear();
        self.blocks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str) -> ProofBlock {
        ProofBlock::with_id(id, BlockType::Text)
    }

    #[test]
    fn enumerates_in_insertion_order() {
        let mut r = BlockRegistry::new();
        for id in ["c", "a", "b"] {
            r.insert(block(id)).unwrap();
        }
        assert_eq!(r.ids().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn duplicate_id_refused() {
        let mut r = BlockRegistry::new();
        r.insert(block("a")).unwrap();
        let back = r.insert(block("a")).unwrap_err();
        assert_eq!(back.id, "a");
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut r = BlockRegistry::new();
        for id in ["a", "b", "c"] {
            r.insert(block(id)).unwrap();
        }
        assert!(r.remove("b").is_some());
        assert!(r.remove("b").is_none());
        assert_eq!(r.ids().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn replace_keeps_slot() {
        let mut r = BlockRegistry::new();
        for id in ["a", "tmp", "c"] {
            r.insert(block(id)).unwrap();
        }
        assert!(r.replace("tmp", block("srv")));
        assert_eq!(r.ids().collect::<Vec<_>>(), vec!["a", "srv", "c"]);
        assert!(r.get("tmp").is_none());
        assert!(r.get("srv").is_some());
    }

    #[test]
    fn replace_refuses_collisions_and_unknown_ids() {
        let mut r = BlockRegistry::new();
        r.insert(block("a")).unwrap();
        r.insert(block("b")).unwrap();
        assert!(!r.replace("a", block("b")));
        assert!(!r.replace("zz", block("q")));
        assert_eq!(r.ids().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn by_type_filters() {
        let mut r = BlockRegistry::new();
        r.insert(block("a")).unwrap();
        r.insert(ProofBlock::with_id("b", BlockType::Image)).unwrap();
        assert_eq!(r.by_type(BlockType::Image).len(), 1);
        assert_eq!(r.by_type(BlockType::Audio).len(), 0);
    }
}
