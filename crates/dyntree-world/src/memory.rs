use std::sync::Arc;

use dyntree_blocks::{Block, BlockRegistry};
use dyntree_geom::{BlockBounds, BlockPos};
use hashbrown::HashMap;

use crate::{Biome, DestroyMode, LevelAccess};

#[derive(Default, Debug, Clone, Copy)]
pub struct WorldStats {
    pub chunk_entries: usize,
    pub blocks: usize,
    pub rev_entries: usize,
    pub drops: usize,
}

/// Sparse chunked block store. Unset positions read as air.
pub struct MemoryWorld {
    registry: Arc<BlockRegistry>,
    sx: i32,
    sz: i32,
    // key=(cx,cz) -> map of world position -> Block
    inner: HashMap<(i32, i32), HashMap<BlockPos, Block>>,
    // latest change stamp per chunk
    rev: HashMap<(i32, i32), u64>,
    counter: u64,
    default_biome: Biome,
    chunk_biomes: HashMap<(i32, i32), Biome>,
    drops: Vec<(BlockPos, Block)>,
}

impl MemoryWorld {
    pub const DEFAULT_CHUNK_SIZE: i32 = 16;

    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self::with_chunk_size(registry, Self::DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(registry: Arc<BlockRegistry>, chunk_size: i32) -> Self {
        let size = chunk_size.max(1);
        Self {
            registry,
            sx: size,
            sz: size,
            inner: HashMap::new(),
            rev: HashMap::new(),
            counter: 0,
            default_biome: Biome::default(),
            chunk_biomes: HashMap::new(),
            drops: Vec::new(),
        }
    }

    pub fn registry_arc(&self) -> Arc<BlockRegistry> {
        Arc::clone(&self.registry)
    }

    #[inline]
    pub fn chunk_size(&self) -> i32 {
        self.sx
    }

    #[inline]
    pub fn chunk_key(&self, pos: BlockPos) -> (i32, i32) {
        (pos.x.div_euclid(self.sx), pos.z.div_euclid(self.sz))
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            chunk_entries: self.inner.len(),
            blocks: self.inner.values().map(|m| m.len()).sum(),
            rev_entries: self.rev.len(),
            drops: self.drops.len(),
        }
    }

    pub fn set_default_biome(&mut self, biome: Biome) {
        self.default_biome = biome;
    }

    pub fn set_chunk_biome(&mut self, cx: i32, cz: i32, biome: Biome) {
        self.chunk_biomes.insert((cx, cz), biome);
    }

    /// Fills every position of `bounds` with `block`.
    pub fn fill(&mut self, bounds: BlockBounds, block: Block) {
        for p in bounds.iter() {
            self.set_block(p, block);
        }
    }

    /// Highest non-air y in the column at or below `max_y`, if any down to `min_y`.
    pub fn surface_y(&self, x: i32, z: i32, min_y: i32, max_y: i32) -> Option<i32> {
        (min_y..=max_y)
            .rev()
            .find(|&y| !self.registry.is_air(self.block(BlockPos::new(x, y, z))))
    }

    /// All non-air blocks inside `bounds`, sorted by position.
    pub fn snapshot_region(&self, bounds: BlockBounds) -> Vec<(BlockPos, Block)> {
        let (cx0, cz0) = self.chunk_key(bounds.min);
        let (cx1, cz1) = self.chunk_key(bounds.max);
        let mut out = Vec::new();
        for cz in cz0..=cz1 {
            for cx in cx0..=cx1 {
                if let Some(m) = self.inner.get(&(cx, cz)) {
                    out.extend(m.iter().filter(|(p, _)| bounds.contains(**p)).map(|(p, b)| (*p, *b)));
                }
            }
        }
        out.sort_unstable_by_key(|(p, _)| (p.y, p.z, p.x));
        out
    }

    pub fn get_rev(&self, cx: i32, cz: i32) -> u64 {
        self.rev.get(&(cx, cz)).copied().unwrap_or(0)
    }

    /// Current change stamp; compare with `get_rev` to find chunks edited since.
    pub fn current_rev(&self) -> u64 {
        self.counter
    }

    pub fn chunks_changed_since(&self, stamp: u64) -> Vec<(i32, i32)> {
        let mut out: Vec<_> = self
            .rev
            .iter()
            .filter(|(_, r)| **r > stamp)
            .map(|(k, _)| *k)
            .collect();
        out.sort_unstable();
        out
    }

    pub fn drops(&self) -> &[(BlockPos, Block)] {
        &self.drops
    }

    pub fn take_drops(&mut self) -> Vec<(BlockPos, Block)> {
        std::mem::take(&mut self.drops)
    }

    fn bump(&mut self, key: (i32, i32)) {
        self.counter = self.counter.wrapping_add(1).max(1);
        self.rev.insert(key, self.counter);
    }
}

impl LevelAccess for MemoryWorld {
    #[inline]
    fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    fn block(&self, pos: BlockPos) -> Block {
        let k = self.chunk_key(pos);
        self.inner
            .get(&k)
            .and_then(|m| m.get(&pos).copied())
            .unwrap_or(Block::AIR)
    }

    fn set_block(&mut self, pos: BlockPos, block: Block) {
        let k = self.chunk_key(pos);
        if block == Block::AIR {
            let Some(m) = self.inner.get_mut(&k) else {
                return;
            };
            if m.remove(&pos).is_none() {
                return;
            }
            if m.is_empty() {
                self.inner.remove(&k);
            }
        } else {
            let entry = self.inner.entry(k).or_default();
            if entry.insert(pos, block) == Some(block) {
                return;
            }
        }
        self.bump(k);
    }

    fn destroy_block(&mut self, pos: BlockPos, mode: DestroyMode) -> Block {
        let old = self.block(pos);
        if old == Block::AIR {
            return old;
        }
        self.set_block(pos, Block::AIR);
        if mode == DestroyMode::Harvest {
            self.drops.push((pos, old));
        } else {
            log::trace!("destroyed {} at {pos} ({mode:?})", self.registry.name_of(old));
        }
        old
    }

    fn biome_at(&self, pos: BlockPos) -> &Biome {
        self.chunk_biomes
            .get(&self.chunk_key(pos))
            .unwrap_or(&self.default_biome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_world() -> MemoryWorld {
        MemoryWorld::new(Arc::new(BlockRegistry::builtin().unwrap()))
    }

    #[test]
    fn writes_bump_only_the_touched_chunk() {
        let mut w = make_world();
        let stone = w.registry().block_by_name("stone").unwrap();
        let before = w.current_rev();
        w.set_block(BlockPos::new(-1, 5, 17), stone);
        assert_eq!(w.chunks_changed_since(before), vec![(-1, 1)]);
        let stamp = w.get_rev(-1, 1);
        // rewriting the same block is not a change
        w.set_block(BlockPos::new(-1, 5, 17), stone);
        assert_eq!(w.get_rev(-1, 1), stamp);
        assert_eq!(w.get_rev(0, 0), 0);
    }

    #[test]
    fn air_writes_remove_entries() {
        let mut w = make_world();
        let dirt = w.registry().block_by_name("dirt").unwrap();
        let p = BlockPos::new(3, 0, 3);
        w.set_block(p, dirt);
        assert_eq!(w.stats().blocks, 1);
        w.set_block(p, Block::AIR);
        assert_eq!(w.stats().blocks, 0);
        assert_eq!(w.stats().chunk_entries, 0);
    }

    #[test]
    fn only_harvest_produces_drops() {
        let mut w = make_world();
        let log = w.registry().block_by_name("oak_branch").unwrap();
        w.set_block(BlockPos::new(0, 1, 0), log);
        w.set_block(BlockPos::new(0, 2, 0), log);
        assert_eq!(w.destroy_block(BlockPos::new(0, 1, 0), DestroyMode::Ignore), log);
        assert!(w.drops().is_empty());
        w.destroy_block(BlockPos::new(0, 2, 0), DestroyMode::Harvest);
        assert_eq!(w.take_drops(), vec![(BlockPos::new(0, 2, 0), log)]);
        assert!(w.is_air(BlockPos::new(0, 2, 0)));
    }
}
