use dyntree_geom::{BlockPos, Direction, SafeBounds};
use dyntree_world::{DestroyMode, LevelAccess};

use crate::{Family, LeavesProperties};

/// Checks whether the branch at `pos` is supported; if not, it rots away.
///
/// A branch is supported by at least two neighbouring tree parts, one of
/// which is a branch or rooty block. An unsupported thin branch first tries
/// to sprout leaves next to itself. When a branch rots, its same-family
/// neighbours are checked too. Returns true if `pos` rotted.
pub fn check_for_rot(
    world: &mut dyn LevelAccess,
    family: &Family,
    leaves: &LeavesProperties,
    pos: BlockPos,
    bounds: &SafeBounds,
) -> bool {
    let block = world.block(pos);
    if !family.is_same_tree(block) {
        return false;
    }
    let radius = family.radius_of(block);
    let mut branches = 0u32;
    let mut supports = 0u32;
    for dir in Direction::ALL {
        let n = world.block(pos.offset(dir));
        if family.is_same_tree(n) || world.registry().is_rooty(n) {
            branches += 1;
            supports += 1;
        } else if leaves.is_leaves(n) {
            supports += 1;
        }
        if branches >= 1 && supports >= 2 {
            return false;
        }
    }

    if radius <= family.primary_thickness {
        for dir in Direction::ALL {
            let off = pos.offset(dir);
            if !bounds.in_bounds(off, true) || !world.is_air(off) {
                continue;
            }
            let h = leaves.hydration_from_neighbors(world, family, off);
            if h > 0 {
                world.set_block(off, leaves.dynamic_leaves_state(h));
                return false;
            }
        }
    }

    world.destroy_block(pos, DestroyMode::Rot);
    log::trace!("{} branch at {pos} rotted", family.name);
    for dir in Direction::ALL {
        let off = pos.offset(dir);
        if family.is_same_tree(world.block(off)) {
            check_for_rot(world, family, leaves, off, bounds);
        }
    }
    true
}
