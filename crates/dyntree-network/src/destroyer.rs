use dyntree_blocks::Block;
use dyntree_geom::{BlockPos, Direction};
use dyntree_world::{DestroyMode, LevelAccess};

use crate::{Family, MapSignal, NodeInspector, analyse_branch};

/// Removes every branch of one family that the walk reaches, remembering
/// which of them were thin tips.
pub struct NodeDestroyer<'f> {
    family: &'f Family,
    mode: DestroyMode,
    ends: Vec<BlockPos>,
    destroyed: usize,
}

impl<'f> NodeDestroyer<'f> {
    pub fn new(family: &'f Family, mode: DestroyMode) -> Self {
        Self {
            family,
            mode,
            ends: Vec::new(),
            destroyed: 0,
        }
    }

    pub fn ends(&self) -> &[BlockPos] {
        &self.ends
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }
}

impl NodeInspector for NodeDestroyer<'_> {
    fn run(&mut self, world: &mut dyn LevelAccess, block: Block, pos: BlockPos, _: Option<Direction>) -> bool {
        if self.family.is_same_tree(block) {
            if self.family.radius_of(block) == self.family.primary_thickness {
                self.ends.push(pos);
            }
            world.destroy_block(pos, self.mode);
            self.destroyed += 1;
        }
        true
    }

    fn return_run(&mut self, _: &mut dyn LevelAccess, _: Block, _: BlockPos, _: Option<Direction>) -> bool {
        false
    }
}

/// Fells the tree whose trunk base is `tree_pos`, returning its thin tips.
pub fn fell_tree(
    world: &mut dyn LevelAccess,
    family: &Family,
    tree_pos: BlockPos,
    mode: DestroyMode,
) -> Vec<BlockPos> {
    let mut destroyer = NodeDestroyer::new(family, mode);
    {
        let mut signal = MapSignal::new(vec![&mut destroyer as &mut dyn NodeInspector]).with_track_visited(true);
        analyse_branch(world, tree_pos, Some(Direction::Down), &mut signal);
    }
    log::debug!(
        "felled {} {} blocks from {tree_pos}",
        destroyer.destroyed(),
        family.name
    );
    destroyer.ends
}
