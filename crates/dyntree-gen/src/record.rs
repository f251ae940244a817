use dyntree_code::JoCode;
use dyntree_geom::{BlockPos, Direction};
use dyntree_network::{CoderNode, MapSignal, NodeInspector, analyse_branch};
use dyntree_world::LevelAccess;

/// Facing recorded trees are stored in when the caller has no preference.
pub const DEFAULT_RECORD_FACING: Direction = Direction::South;

/// Records the tree standing on the rooty block at `root_pos` as a code
/// read in `facing`. Returns `None` when no branch sits on the root.
///
/// The walk starts on the rooty block itself so the trunk's first step is
/// part of the code.
pub fn record_tree(world: &mut dyn LevelAccess, root_pos: BlockPos, facing: Direction) -> Option<JoCode> {
    if !world.registry().is_branch(world.block(root_pos.above())) {
        return None;
    }
    let mut coder = CoderNode::new();
    let overflow = {
        let mut inspectors: Vec<&mut dyn NodeInspector> = Vec::with_capacity(1);
        inspectors.push(&mut coder);
        let mut signal = MapSignal::new(inspectors);
        analyse_branch(world, root_pos, Some(Direction::Down), &mut signal);
        signal.overflow
    };
    if overflow {
        log::warn!("tree at {root_pos} is deeper than the walk limit; recording is truncated");
    }
    log::debug!("recorded {} nodes at {root_pos}", coder.node_count());
    let mut code = JoCode::from_instructions(coder.compile());
    code.rotate(facing);
    Some(code)
}
