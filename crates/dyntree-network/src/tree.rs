use dyntree_blocks::{Block, BlockKind, BlockRegistry};
use dyntree_geom::BlockPos;
use dyntree_world::LevelAccess;

/// A kind of wood: one branch block whose state is the branch radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Family {
    pub name: String,
    pub branch: Block,
    pub primary_thickness: u16,
    pub secondary_thickness: u16,
    pub max_branch_radius: u16,
}

impl Family {
    pub const DEFAULT_PRIMARY_THICKNESS: u16 = 1;
    pub const DEFAULT_SECONDARY_THICKNESS: u16 = 2;
    pub const DEFAULT_MAX_BRANCH_RADIUS: u16 = 8;

    /// Resolves the family's branch block by name; `None` if the registry has none.
    pub fn from_registry(registry: &BlockRegistry, name: &str) -> Option<Family> {
        let branch = registry.find_family_block(name, BlockKind::Branch)?;
        Some(Family {
            name: name.to_string(),
            branch,
            primary_thickness: Self::DEFAULT_PRIMARY_THICKNESS,
            secondary_thickness: Self::DEFAULT_SECONDARY_THICKNESS,
            max_branch_radius: Self::DEFAULT_MAX_BRANCH_RADIUS,
        })
    }

    pub fn with_thickness(mut self, primary: u16, secondary: u16, max_radius: u16) -> Self {
        self.primary_thickness = primary.max(1);
        self.secondary_thickness = secondary.max(self.primary_thickness);
        self.max_branch_radius = max_radius.max(self.secondary_thickness);
        self
    }

    /// Branch block as first placed by generation.
    #[inline]
    pub fn branch_for_placement(&self) -> Block {
        self.branch.with_state(self.primary_thickness)
    }

    #[inline]
    pub fn is_same_tree(&self, block: Block) -> bool {
        block.id == self.branch.id
    }

    /// Radius of a branch of this family, 0 for anything else.
    #[inline]
    pub fn radius_of(&self, block: Block) -> u16 {
        if self.is_same_tree(block) {
            block.state.max(1)
        } else {
            0
        }
    }

    pub fn set_radius(&self, world: &mut dyn LevelAccess, pos: BlockPos, radius: u16) {
        let r = radius.clamp(1, self.max_branch_radius);
        world.set_block(pos, self.branch.with_state(r));
    }
}
