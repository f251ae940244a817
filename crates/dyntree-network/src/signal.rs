use dyntree_blocks::{Block, BlockKind};
use dyntree_geom::{BlockPos, Direction};
use dyntree_world::{DestroyMode, LevelAccess};
use hashbrown::HashSet;

/// Visitor invoked for every node of a branch network walk.
///
/// `run` fires on the way out from the origin, `return_run` on the way back
/// once every child has been walked. `from_dir` points back toward the node
/// the walk arrived from and is `None` at the origin.
pub trait NodeInspector {
    fn run(
        &mut self,
        world: &mut dyn LevelAccess,
        block: Block,
        pos: BlockPos,
        from_dir: Option<Direction>,
    ) -> bool;

    fn return_run(
        &mut self,
        world: &mut dyn LevelAccess,
        block: Block,
        pos: BlockPos,
        from_dir: Option<Direction>,
    ) -> bool;
}

/// State carried through one walk, shared by all attached inspectors.
pub struct MapSignal<'a> {
    inspectors: Vec<&'a mut dyn NodeInspector>,
    pub depth: u32,
    pub max_depth: u32,
    /// Latched once a path runs deeper than `max_depth`; stops the walk.
    pub overflow: bool,
    /// A rooty block was reached.
    pub found_root: bool,
    pub root: Option<BlockPos>,
    /// More than one rooty block was reached.
    pub multiroot: bool,
    pub destroy_looped_nodes: bool,
    pub track_visited: bool,
    visited: HashSet<BlockPos>,
}

impl<'a> MapSignal<'a> {
    pub const MAX_DEPTH: u32 = 32;

    pub fn new(inspectors: Vec<&'a mut dyn NodeInspector>) -> Self {
        Self {
            inspectors,
            depth: 0,
            max_depth: Self::MAX_DEPTH,
            overflow: false,
            found_root: false,
            root: None,
            multiroot: false,
            destroy_looped_nodes: false,
            track_visited: false,
            visited: HashSet::new(),
        }
    }

    pub fn with_destroy_looped_nodes(mut self, destroy: bool) -> Self {
        self.destroy_looped_nodes = destroy;
        self
    }

    pub fn with_track_visited(mut self, track: bool) -> Self {
        self.track_visited = track;
        self
    }

    pub fn visited(&self) -> &HashSet<BlockPos> {
        &self.visited
    }

    fn run(&mut self, world: &mut dyn LevelAccess, block: Block, pos: BlockPos, from_dir: Option<Direction>) {
        for inspector in self.inspectors.iter_mut() {
            inspector.run(world, block, pos, from_dir);
        }
    }

    fn return_run(
        &mut self,
        world: &mut dyn LevelAccess,
        block: Block,
        pos: BlockPos,
        from_dir: Option<Direction>,
    ) {
        for inspector in self.inspectors.iter_mut() {
            inspector.return_run(world, block, pos, from_dir);
        }
    }
}

/// Walks into whatever tree part sits at `pos`. Blocks that are neither
/// branches nor rooty soil end the path.
pub fn analyse(
    world: &mut dyn LevelAccess,
    pos: BlockPos,
    from_dir: Option<Direction>,
    signal: &mut MapSignal<'_>,
) {
    let block = world.block(pos);
    match world.registry().kind_of(block) {
        BlockKind::Branch => analyse_branch(world, pos, from_dir, signal),
        BlockKind::RootySoil => analyse_root(world, block, pos, from_dir, signal),
        _ => {}
    }
}

/// Branch walk from `pos`, regardless of what block is there. Recording
/// starts here on the rooty block so the trunk's own step is captured.
pub fn analyse_branch(
    world: &mut dyn LevelAccess,
    pos: BlockPos,
    from_dir: Option<Direction>,
    signal: &mut MapSignal<'_>,
) {
    if signal.overflow || (signal.track_visited && !signal.visited.insert(pos)) {
        return;
    }
    if signal.depth < signal.max_depth {
        signal.depth += 1;
        let block = world.block(pos);
        signal.run(world, block, pos, from_dir);
        for dir in Direction::ALL {
            if Some(dir) == from_dir {
                continue;
            }
            analyse(world, pos.offset(dir), Some(dir.opposite()), signal);
        }
        signal.return_run(world, block, pos, from_dir);
        signal.depth -= 1;
    } else {
        if signal.destroy_looped_nodes && world.registry().is_branch(world.block(pos)) {
            log::debug!("destroying looped node at {pos}");
            world.destroy_block(pos, DestroyMode::Overflow);
        }
        signal.overflow = true;
    }
}

fn analyse_root(
    world: &mut dyn LevelAccess,
    block: Block,
    pos: BlockPos,
    from_dir: Option<Direction>,
    signal: &mut MapSignal<'_>,
) {
    signal.run(world, block, pos, from_dir);
    if signal.root.is_none() {
        signal.root = Some(pos);
    } else {
        signal.multiroot = true;
    }
    signal.found_root = true;
}
