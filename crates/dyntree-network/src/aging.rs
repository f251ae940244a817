use dyntree_geom::SafeBounds;
use dyntree_voxmap::SimpleVoxmap;
use dyntree_world::LevelAccess;

use crate::{Family, LeavesProperties};

/// Ages the leaves planned in `leaf_map` for `iterations` cycles so a fresh
/// tree looks settled. `leaf_map` itself is left intact; a working copy
/// tracks which cells still hold leaves.
pub fn age_volume(
    world: &mut dyn LevelAccess,
    leaf_map: &SimpleVoxmap,
    iterations: u32,
    bounds: &SafeBounds,
    leaves: &LeavesProperties,
    family: &Family,
) {
    let mut iter_map = leaf_map.clone();
    for i in 0..iterations {
        let cells = iter_map.non_zero_cells(0xFF);
        if cells.is_empty() {
            break;
        }
        let mut removed = 0usize;
        for cell in cells {
            let block = world.block(cell.pos);
            let value = if leaves.is_leaves(block) {
                leaves.age(world, family, cell.pos, bounds).unwrap_or(0)
            } else {
                0
            };
            if value == 0 {
                removed += 1;
            }
            iter_map.set(cell.pos, value);
        }
        log::trace!("age cycle {i}: {removed} cells emptied");
    }
}
