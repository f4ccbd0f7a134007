//! Authoritative collection of placed blocks and text labels

use std::collections::HashMap;

use super::error::LayoutError;
use super::types::{Block, BlockId, Dimensions, Displacements, Position, TextLabel};

/// Ordered block collection plus a separate, cosmetic text label collection.
///
/// Insertion order is kept for deterministic iteration and display only;
/// none of the geometry depends on it.
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    blocks: Vec<Block>,
    index: HashMap<BlockId, usize>,
    texts: Vec<TextLabel>,
    next_id: usize,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.index.get(id).map(|&i| &self.blocks[i])
    }

    /// Like [`get`](Self::get), but unknown ids become an error with suggestions
    pub fn require(&self, id: &BlockId) -> Result<&Block, LayoutError> {
        self.get(id)
            .ok_or_else(|| LayoutError::unknown_block(id.as_str(), self.suggest(id.as_str())))
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.index.contains_key(id)
    }

    /// Insert a new block or replace the one with the same id in place
    pub fn upsert(&mut self, block: Block) -> Result<(), LayoutError> {
        block.dimensions.validate()?;
        match self.index.get(&block.id) {
            Some(&i) => self.blocks[i] = block,
            None => {
                self.index.insert(block.id.clone(), self.blocks.len());
                self.blocks.push(block);
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, id: &BlockId) -> Option<Block> {
        let i = self.index.remove(id)?;
        let removed = self.blocks.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Snapshot of every block in insertion order
    pub fn all(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn update_position(&mut self, id: &BlockId, position: Position) -> Result<(), LayoutError> {
        let mut block = self.require(id)?.clone();
        block.position = position;
        self.upsert(block)
    }

    pub fn update_dimensions(
        &mut self,
        id: &BlockId,
        dimensions: Dimensions,
    ) -> Result<(), LayoutError> {
        let mut block = self.require(id)?.clone();
        block.dimensions = dimensions;
        self.upsert(block)
    }

    /// Commit a batch of resolver positions. Every id is checked before
    /// anything is written.
    pub fn apply(&mut self, displacements: &Displacements) -> Result<(), LayoutError> {
        for id in displacements.ids() {
            self.require(id)?;
        }
        for (id, position) in displacements.iter() {
            if let Some(&i) = self.index.get(id) {
                self.blocks[i].position = *position;
            }
        }
        Ok(())
    }

    /// Generate a fresh local id (`b1`, `b2`, ...) not used by any block or text
    pub fn next_block_id(&mut self) -> BlockId {
        loop {
            self.next_id += 1;
            let candidate = BlockId::new(format!("b{}", self.next_id));
            if !self.contains(&candidate) && self.get_text(&candidate).is_none() {
                return candidate;
            }
        }
    }

    // ── Text labels ───────────────────────────────────────────────

    pub fn upsert_text(&mut self, text: TextLabel) {
        match self.texts.iter_mut().find(|t| t.id == text.id) {
            Some(existing) => *existing = text,
            None => self.texts.push(text),
        }
    }

    pub fn get_text(&self, id: &BlockId) -> Option<&TextLabel> {
        self.texts.iter().find(|t| &t.id == id)
    }

    pub fn remove_text(&mut self, id: &BlockId) -> Option<TextLabel> {
        let i = self.texts.iter().position(|t| &t.id == id)?;
        Some(self.texts.remove(i))
    }

    pub fn texts(&self) -> &[TextLabel] {
        &self.texts
    }

    /// Known block ids within edit distance 2 of `target`, closest first
    pub fn suggest(&self, target: &str) -> Vec<String> {
        let mut candidates: Vec<(String, usize)> = self
            .blocks
            .iter()
            .filter_map(|b| {
                let dist = levenshtein_distance(b.id.as_str(), target);
                if dist <= 2 && dist > 0 {
                    Some((b.id.0.clone(), dist))
                } else {
                    None
                }
            })
            .collect();

        candidates.sort_by_key(|(_, d)| *d);
        candidates
            .into_iter()
            .map(|(name, _)| name)
            .take(3)
            .collect()
    }
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(ids: &[&str]) -> LayoutStore {
        let mut store = LayoutStore::new();
        for (i, id) in ids.iter().enumerate() {
            store
                .upsert(Block::unit(*id, Position::new(i as f64, 0.0, 0.0)))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_upsert_inserts_then_replaces() {
        let mut store = store_with(&["a", "b"]);
        let replacement = Block::unit("a", Position::new(9.0, 0.0, 0.0));
        store.upsert(replacement.clone()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&"a".into()), Some(&replacement));
        let order: Vec<_> = store.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_upsert_rejects_invalid_dimensions() {
        let mut store = LayoutStore::new();
        let mut block = Block::unit("a", Position::origin());
        block.dimensions.height = 0.0;
        assert!(matches!(
            store.upsert(block),
            Err(LayoutError::InvalidDimensions { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut store = store_with(&["a", "b", "c"]);
        let removed = store.remove(&"a".into()).unwrap();
        assert_eq!(removed.id.as_str(), "a");
        assert_eq!(store.get(&"c".into()).unwrap().position.x, 2.0);
        assert!(store.remove(&"a".into()).is_none());
    }

    #[test]
    fn test_update_unknown_suggests() {
        let mut store = store_with(&["lobby", "tower"]);
        let err = store
            .update_position(&"loby".into(), Position::origin())
            .unwrap_err();
        assert_eq!(err.suggestions(), Some(&["lobby".to_string()][..]));
    }

    #[test]
    fn test_update_dimensions() {
        let mut store = store_with(&["a"]);
        let dims = Dimensions::new(2.0, 3.0, 1.0).unwrap();
        store.update_dimensions(&"a".into(), dims).unwrap();
        assert_eq!(store.get(&"a".into()).unwrap().dimensions, dims);
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut store = store_with(&["a"]);
        let mut d = Displacements::new();
        d.insert("a".into(), Position::new(0.0, 5.0, 0.0));
        d.insert("ghost".into(), Position::origin());
        assert!(store.apply(&d).is_err());
        assert_eq!(store.get(&"a".into()).unwrap().position.y, 0.0);
    }

    #[test]
    fn test_all_is_a_snapshot() {
        let mut store = store_with(&["a"]);
        let snapshot = store.all();
        store.update_position(&"a".into(), Position::new(0.0, 3.0, 0.0)).unwrap();
        assert_eq!(snapshot[0].position.y, 0.0);
    }

    #[test]
    fn test_next_block_id_skips_taken() {
        let mut store = store_with(&["b1"]);
        assert_eq!(store.next_block_id().as_str(), "b2");
    }

    #[test]
    fn test_texts_are_separate() {
        let mut store = store_with(&["a"]);
        store.upsert_text(TextLabel::new("title", "Tower A", Position::new(0.0, 5.0, 0.0)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.texts().len(), 1);
        assert!(store.remove_text(&"title".into()).is_some());
        assert!(store.texts().is_empty());
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("hello", "hello"), 0);
        assert_eq!(levenshtein_distance("server", "servr"), 1);
        assert_eq!(levenshtein_distance("cat", "dog"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }
}
