use dyntree_blocks::Block;
use dyntree_geom::{BlockPos, Direction};
use dyntree_world::LevelAccess;

use crate::NodeInspector;

/// Finds branch tips: on the way back, a node is an end when the node that
/// returned just before it is not one of its face neighbours.
#[derive(Debug, Default)]
pub struct FindEndsNode {
    ends: Vec<BlockPos>,
    last: Option<BlockPos>,
}

impl FindEndsNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ends(&self) -> &[BlockPos] {
        &self.ends
    }

    pub fn into_ends(self) -> Vec<BlockPos> {
        self.ends
    }
}

impl NodeInspector for FindEndsNode {
    fn run(&mut self, _: &mut dyn LevelAccess, _: Block, _: BlockPos, _: Option<Direction>) -> bool {
        false
    }

    fn return_run(&mut self, _: &mut dyn LevelAccess, _: Block, pos: BlockPos, _: Option<Direction>) -> bool {
        if !self.last.is_some_and(|last| last.is_face_neighbor(pos)) {
            self.ends.push(pos);
        }
        self.last = Some(pos);
        false
    }
}
