use dyntree_blocks::Block;
use dyntree_geom::{BlockPos, Direction};
use dyntree_voxmap::{BRANCH, SimpleVoxmap, TWIG};
use dyntree_world::LevelAccess;

use crate::{Family, NodeInspector};

/// Thickens branches bottom-up by cross-section area and paints twigs,
/// branches and leaf clusters into a leaf map.
pub struct NodeInflator<'m> {
    family: &'m Family,
    tapering: f32,
    cluster: Option<&'m SimpleVoxmap>,
    map: &'m mut SimpleVoxmap,
    radius: f32,
    last: Option<BlockPos>,
}

impl<'m> NodeInflator<'m> {
    pub fn new(
        family: &'m Family,
        tapering: f32,
        cluster: Option<&'m SimpleVoxmap>,
        map: &'m mut SimpleVoxmap,
    ) -> Self {
        Self {
            family,
            tapering,
            cluster,
            map,
            radius: f32::from(family.primary_thickness),
            last: None,
        }
    }
}

impl NodeInspector for NodeInflator<'_> {
    fn run(&mut self, world: &mut dyn LevelAccess, block: Block, _: BlockPos, _: Option<Direction>) -> bool {
        if world.registry().is_branch(block) {
            self.radius = f32::from(self.family.primary_thickness);
        }
        false
    }

    fn return_run(
        &mut self,
        world: &mut dyn LevelAccess,
        block: Block,
        pos: BlockPos,
        from_dir: Option<Direction>,
    ) -> bool {
        if !world.registry().is_branch(block) {
            return false;
        }
        // the branch we just returned from is carried in `radius`
        let mut area = self.radius * self.radius;
        let mut is_twig = true;
        for dir in Direction::ALL {
            if Some(dir) == from_dir {
                continue;
            }
            let d_pos = pos.offset(dir);
            if Some(d_pos) == self.last {
                is_twig = false;
                continue;
            }
            let r = f32::from(self.family.radius_of(world.block(d_pos)));
            area += r * r;
        }
        if is_twig {
            self.map.set(pos, TWIG);
            if let Some(cluster) = self.cluster {
                self.map.blit_max(pos, cluster);
            }
        } else {
            let f = self.family;
            self.radius = (area.sqrt() + self.tapering).clamp(
                f32::from(f.secondary_thickness),
                f32::from(f.max_branch_radius),
            );
            f.set_radius(world, pos, self.radius.floor() as u16);
            self.map.set(pos, BRANCH);
        }
        self.last = Some(pos);
        false
    }
}
