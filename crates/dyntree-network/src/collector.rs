use dyntree_blocks::Block;
use dyntree_geom::{BlockPos, Direction};
use dyntree_world::LevelAccess;
use hashbrown::HashSet;

use crate::NodeInspector;

/// Gathers every visited position, in first-visit order.
#[derive(Debug, Default)]
pub struct CollectorNode {
    nodes: Vec<BlockPos>,
    seen: HashSet<BlockPos>,
}

impl CollectorNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[BlockPos] {
        &self.nodes
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        self.seen.contains(&pos)
    }

    pub fn into_nodes(self) -> Vec<BlockPos> {
        self.nodes
    }
}

impl NodeInspector for CollectorNode {
    fn run(&mut self, _: &mut dyn LevelAccess, _: Block, pos: BlockPos, _: Option<Direction>) -> bool {
        if self.seen.insert(pos) {
            self.nodes.push(pos);
        }
        false
    }

    fn return_run(&mut self, _: &mut dyn LevelAccess, _: Block, _: BlockPos, _: Option<Direction>) -> bool {
        false
    }
}
