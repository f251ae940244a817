use dyntree_blocks::{Block, BlockKind, BlockRegistry};
use dyntree_geom::{BlockPos, Direction, SafeBounds};
use dyntree_voxmap::SimpleVoxmap;
use dyntree_world::LevelAccess;

use crate::{Family, leaf_clusters};

/// Value a thin branch contributes to neighbouring leaf cells.
pub const TWIG_CELL_VALUE: u8 = 5;

/// "At least `min_count` neighbours of `value` yield `result`."
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverRule {
    pub value: u8,
    pub min_count: u8,
    pub result: u8,
}

impl SolverRule {
    pub const fn new(value: u8, min_count: u8, result: u8) -> Self {
        Self {
            value,
            min_count,
            result,
        }
    }
}

/// Ordered rule list turning six neighbour cell values into a hydration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellSolver {
    rules: Vec<SolverRule>,
}

impl CellSolver {
    pub fn new(rules: Vec<SolverRule>) -> Self {
        Self { rules }
    }

    pub fn deciduous() -> Self {
        Self::new(vec![
            SolverRule::new(5, 1, 4),
            SolverRule::new(4, 2, 3),
            SolverRule::new(3, 2, 2),
            SolverRule::new(4, 1, 1),
        ])
    }

    pub fn conifer() -> Self {
        Self::new(vec![
            SolverRule::new(5, 1, 4),
            SolverRule::new(4, 1, 3),
            SolverRule::new(3, 2, 2),
            SolverRule::new(2, 1, 1),
        ])
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "deciduous" => Some(Self::deciduous()),
            "conifer" => Some(Self::conifer()),
            _ => None,
        }
    }

    /// First matching rule wins; no match means 0.
    pub fn solve(&self, cells: &[u8]) -> u8 {
        let mut counts = [0u8; 16];
        for &c in cells {
            counts[usize::from(c & 0x0F)] += 1;
        }
        self.rules
            .iter()
            .find(|r| counts[usize::from(r.value & 0x0F)] >= r.min_count)
            .map_or(0, |r| r.result)
    }
}

#[derive(Clone, Debug)]
pub struct LeavesProperties {
    pub family: String,
    pub leaves: Block,
    pub smother_leaves_max: u8,
    pub max_hydration: u8,
    pub cluster: Option<SimpleVoxmap>,
    pub solver: CellSolver,
}

impl LeavesProperties {
    pub const DEFAULT_SMOTHER: u8 = 4;
    pub const DEFAULT_MAX_HYDRATION: u8 = 4;

    /// Deciduous leaves for `family`, or `None` when the registry has no leaves block for it.
    pub fn from_registry(registry: &BlockRegistry, family: &str) -> Option<Self> {
        let leaves = registry.find_family_block(family, BlockKind::Leaves)?;
        Some(Self {
            family: family.to_string(),
            leaves,
            smother_leaves_max: Self::DEFAULT_SMOTHER,
            max_hydration: Self::DEFAULT_MAX_HYDRATION,
            cluster: Some(leaf_clusters::deciduous()),
            solver: CellSolver::deciduous(),
        })
    }

    #[inline]
    pub fn is_leaves(&self, block: Block) -> bool {
        block.id == self.leaves.id
    }

    /// Leaves block carrying `hydration`, clamped to `1..=max_hydration`.
    pub fn dynamic_leaves_state(&self, hydration: u8) -> Block {
        self.leaves
            .with_state(u16::from(hydration.clamp(1, self.max_hydration.max(1))))
    }

    pub fn hydration_of(&self, block: Block) -> u8 {
        if self.is_leaves(block) {
            block.state.min(15) as u8
        } else {
            0
        }
    }

    fn cell_value(&self, world: &dyn LevelAccess, family: &Family, pos: BlockPos) -> u8 {
        let block = world.block(pos);
        if self.is_leaves(block) {
            self.hydration_of(block)
        } else if family.is_same_tree(block) && family.radius_of(block) <= family.primary_thickness {
            TWIG_CELL_VALUE
        } else {
            0
        }
    }

    pub fn hydration_from_neighbors(&self, world: &dyn LevelAccess, family: &Family, pos: BlockPos) -> u8 {
        let cells = Direction::ALL.map(|d| self.cell_value(world, family, pos.offset(d)));
        self.solver.solve(&cells)
    }

    /// One aging step of the leaves at `pos`. Returns the new hydration, or
    /// `None` when the leaves dried out and were removed. Hydrated leaves
    /// spread into empty in-bounds neighbours.
    pub fn age(
        &self,
        world: &mut dyn LevelAccess,
        family: &Family,
        pos: BlockPos,
        bounds: &SafeBounds,
    ) -> Option<u8> {
        let old = self.hydration_of(world.block(pos));
        let hydration = self.hydration_from_neighbors(world, family, pos);
        if hydration == 0 {
            world.set_block(pos, Block::AIR);
            return None;
        }
        if hydration != old {
            world.set_block(pos, self.dynamic_leaves_state(hydration));
        }
        if hydration > 1 {
            for dir in Direction::ALL {
                let off = pos.offset(dir);
                if !bounds.in_bounds(off, true) || !world.is_air(off) {
                    continue;
                }
                let h = self.hydration_from_neighbors(world, family, off);
                if h > 0 {
                    world.set_block(off, self.dynamic_leaves_state(h));
                }
            }
        }
        Some(hydration)
    }
}
