use dyntree_blocks::{Block, BlockRegistry};
use dyntree_geom::BlockPos;

use crate::Biome;

/// How a block removal should be treated by the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DestroyMode {
    /// Normal removal; the world may produce drops.
    #[default]
    Harvest,
    /// Bulk teardown of a failed generation; no drops or side effects.
    Ignore,
    /// A looped node removed at the analysis overflow point.
    Overflow,
    /// Unsupported wood rotting away.
    Rot,
}

/// Narrow view of the host world that tree generation reads and writes.
pub trait LevelAccess {
    fn registry(&self) -> &BlockRegistry;

    fn block(&self, pos: BlockPos) -> Block;

    fn set_block(&mut self, pos: BlockPos, block: Block);

    /// Removes the block at `pos`, returning what was there.
    fn destroy_block(&mut self, pos: BlockPos, mode: DestroyMode) -> Block {
        let _ = mode;
        let old = self.block(pos);
        self.set_block(pos, Block::AIR);
        old
    }

    fn biome_at(&self, pos: BlockPos) -> &Biome;

    #[inline]
    fn is_air(&self, pos: BlockPos) -> bool {
        self.registry().is_air(self.block(pos))
    }
}
