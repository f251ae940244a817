use serde::{Deserialize, Serialize};

// Compact voxel representation used at runtime. For branch blocks `state`
// carries the branch radius.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub state: BlockState,
}

pub type BlockId = u16;
pub type BlockState = u16;

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Block { id, state: 0 }
    }

    #[inline]
    pub const fn with_state(self, state: BlockState) -> Self {
        Block { id: self.id, state }
    }
}

/// Coarse behaviour class of a block, used by tree generation to decide
/// what it may grow through, root in, or replace.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Solid,
    Air,
    Soil,
    RootySoil,
    Branch,
    Leaves,
    Snow,
    Plant,
    Liquid,
}
