use dyntree_world::LevelAccess;
use dyntree_network::LeavesProperties;
use serde::Deserialize;

use crate::PostGenerationContext;

/// Optional post-generation decorations a species can list in its config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenFeature {
    /// Caps the highest branch end with a short spire of leaves.
    ConiferTopper,
}

impl GenFeature {
    pub fn post_generation(
        &self,
        world: &mut dyn LevelAccess,
        ctx: &PostGenerationContext<'_>,
        leaves: &LeavesProperties,
    ) {
        match self {
            GenFeature::ConiferTopper => conifer_topper(world, ctx, leaves),
        }
    }
}

fn conifer_topper(world: &mut dyn LevelAccess, ctx: &PostGenerationContext<'_>, leaves: &LeavesProperties) {
    let Some(&top) = ctx.end_points.iter().max_by_key(|p| p.y) else {
        return;
    };
    let bounds = &ctx.generation.safe_bounds;
    for (step, hydration) in [(1, 4u8), (2, 3), (3, 1)] {
        let pos = top.offset_by(dyntree_geom::Direction::Up, step);
        if !bounds.in_bounds(pos, false) {
            return;
        }
        let block = world.block(pos);
        let reg = world.registry();
        if !(reg.is_air(block) || reg.is_leaves(block)) {
            return;
        }
        world.set_block(pos, leaves.dynamic_leaves_state(hydration));
    }
}
