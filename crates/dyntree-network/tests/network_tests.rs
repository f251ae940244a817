use std::sync::Arc;

use dyntree_blocks::{Block, BlockRegistry};
use dyntree_code::{FORK_CODE, RETURN_CODE};
use dyntree_geom::{BlockBounds, BlockPos, Direction, SafeBounds};
use dyntree_network::rot::check_for_rot;
use dyntree_network::{
    CoderNode, CollectorNode, Family, FindEndsNode, LeavesProperties, MapSignal, NodeInflator,
    NodeInspector, age_volume, analyse_branch, fell_tree,
};
use dyntree_voxmap::{BRANCH, SimpleVoxmap, TWIG};
use dyntree_world::{DestroyMode, LevelAccess, MemoryWorld};

const ROOT: BlockPos = BlockPos::new(0, 64, 0);

struct Fixture {
    world: MemoryWorld,
    family: Family,
    leaves: LeavesProperties,
    rooty: Block,
}

fn fixture() -> Fixture {
    let reg = Arc::new(BlockRegistry::builtin().expect("registry"));
    let family = Family::from_registry(&reg, "oak").unwrap();
    let leaves = LeavesProperties::from_registry(&reg, "oak").unwrap();
    let rooty = reg.block_by_name("rooty_dirt").unwrap();
    let mut world = MemoryWorld::new(reg);
    world.set_block(ROOT, rooty);
    Fixture {
        world,
        family,
        leaves,
        rooty,
    }
}

fn place(f: &mut Fixture, positions: &[(i32, i32, i32)]) {
    let b = f.family.branch_for_placement();
    for &p in positions {
        f.world.set_block(BlockPos::from(p), b);
    }
}

// trunk 65..=66, then up to 67 and north to (0,66,-1)
fn forked(f: &mut Fixture) {
    place(f, &[(0, 65, 0), (0, 66, 0), (0, 67, 0), (0, 66, -1)]);
}

#[test]
fn coder_records_a_straight_trunk() {
    let mut f = fixture();
    place(&mut f, &[(0, 65, 0), (0, 66, 0), (0, 67, 0)]);
    let mut coder = CoderNode::new();
    {
        let mut signal = MapSignal::new(vec![&mut coder as &mut dyn NodeInspector]);
        analyse_branch(&mut f.world, ROOT, Some(Direction::Down), &mut signal);
    }
    assert_eq!(coder.node_count(), 4);
    assert_eq!(coder.compile(), vec![1, 1, 1]);
}

#[test]
fn coder_forks_all_but_the_last_child() {
    let mut f = fixture();
    forked(&mut f);
    let mut coder = CoderNode::new();
    {
        let mut signal = MapSignal::new(vec![&mut coder as &mut dyn NodeInspector]);
        analyse_branch(&mut f.world, ROOT, Some(Direction::Down), &mut signal);
    }
    assert_eq!(coder.compile(), vec![1, 1, FORK_CODE, 1, RETURN_CODE, 2]);
}

#[test]
fn end_finder_reports_tips() {
    let mut f = fixture();
    forked(&mut f);
    let mut ends = FindEndsNode::new();
    {
        let mut signal = MapSignal::new(vec![&mut ends as &mut dyn NodeInspector]);
        analyse_branch(&mut f.world, BlockPos::new(0, 65, 0), Some(Direction::Down), &mut signal);
        assert!(!signal.found_root);
        assert!(!signal.overflow);
    }
    assert_eq!(
        ends.ends(),
        &[BlockPos::new(0, 67, 0), BlockPos::new(0, 66, -1)]
    );
}

#[test]
fn loops_overflow_and_can_be_cut() {
    let mut f = fixture();
    place(&mut f, &[(0, 65, 0), (0, 66, 0), (1, 66, 0), (1, 65, 0)]);
    let mut collector = CollectorNode::new();
    {
        let mut signal = MapSignal::new(vec![&mut collector as &mut dyn NodeInspector]);
        analyse_branch(&mut f.world, BlockPos::new(0, 65, 0), Some(Direction::Down), &mut signal);
        assert!(signal.overflow);
        // coming back around the loop reaches the rooty block from the side
        assert!(signal.found_root);
    }
    assert_eq!(collector.nodes().len(), 5);

    let mut ends = FindEndsNode::new();
    {
        let mut signal = MapSignal::new(vec![&mut ends as &mut dyn NodeInspector]).with_destroy_looped_nodes(true);
        analyse_branch(&mut f.world, BlockPos::new(0, 65, 0), Some(Direction::Down), &mut signal);
        assert!(signal.overflow);
    }
    let remaining = [(0, 65, 0), (0, 66, 0), (1, 66, 0), (1, 65, 0)]
        .iter()
        .filter(|&&p| f.family.is_same_tree(f.world.block(BlockPos::from(p))))
        .count();
    assert_eq!(remaining, 3);
    assert!(f.world.drops().is_empty());
}

#[test]
fn track_visited_stops_loops_without_overflow() {
    let mut f = fixture();
    place(&mut f, &[(0, 65, 0), (0, 66, 0), (1, 66, 0), (1, 65, 0)]);
    let mut collector = CollectorNode::new();
    let mut signal = MapSignal::new(vec![&mut collector as &mut dyn NodeInspector]).with_track_visited(true);
    analyse_branch(&mut f.world, BlockPos::new(0, 65, 0), None, &mut signal);
    assert!(!signal.overflow);
    // the trunk walk with no origin direction also reaches the rooty block
    assert!(signal.found_root);
    assert_eq!(signal.root, Some(ROOT));
    assert_eq!(signal.visited().len(), 4);
}

#[test]
fn fused_trees_report_the_other_root() {
    let mut f = fixture();
    let other_root = BlockPos::new(1, 64, 0);
    f.world.set_block(other_root, f.rooty);
    place(&mut f, &[(0, 65, 0), (1, 65, 0)]);
    let mut signal = MapSignal::new(Vec::new());
    analyse_branch(&mut f.world, BlockPos::new(0, 65, 0), Some(Direction::Down), &mut signal);
    assert!(signal.found_root);
    assert!(!signal.multiroot);
    assert_eq!(signal.root, Some(other_root));
}

#[test]
fn inflator_thickens_trunk_and_paints_twig() {
    let mut f = fixture();
    place(&mut f, &[(0, 65, 0), (0, 66, 0), (0, 67, 0)]);
    let mut map = SimpleVoxmap::new(5, 8, 5);
    map.set_map_and_center(BlockPos::new(0, 65, 0), BlockPos::new(2, 0, 2));
    let cluster = f.leaves.cluster.clone();
    {
        let mut inflator = NodeInflator::new(&f.family, 0.3, cluster.as_ref(), &mut map);
        let mut signal = MapSignal::new(vec![&mut inflator as &mut dyn NodeInspector]);
        analyse_branch(&mut f.world, BlockPos::new(0, 65, 0), Some(Direction::Down), &mut signal);
    }
    assert_eq!(map.get(BlockPos::new(0, 67, 0)), TWIG);
    assert_eq!(map.get(BlockPos::new(0, 66, 0)), BRANCH);
    assert_eq!(map.get(BlockPos::new(0, 65, 0)), BRANCH);
    assert_eq!(map.get(BlockPos::new(1, 67, 0)), 4);
    assert_eq!(f.family.radius_of(f.world.block(BlockPos::new(0, 67, 0))), 1);
    assert_eq!(f.family.radius_of(f.world.block(BlockPos::new(0, 66, 0))), 2);
    assert_eq!(f.family.radius_of(f.world.block(BlockPos::new(0, 65, 0))), 2);
}

#[test]
fn fell_tree_removes_family_and_returns_tips() {
    let mut f = fixture();
    forked(&mut f);
    let ends = fell_tree(&mut f.world, &f.family, BlockPos::new(0, 65, 0), DestroyMode::Ignore);
    assert_eq!(ends.len(), 4);
    assert!(f.world.is_air(BlockPos::new(0, 66, -1)));
    assert!(f.world.registry().is_rooty(f.world.block(ROOT)));
    assert!(f.world.drops().is_empty());
}

#[test]
fn aging_fills_hydration_around_a_twig() {
    let mut f = fixture();
    place(&mut f, &[(0, 65, 0)]);
    let mut map = SimpleVoxmap::new(3, 3, 3);
    map.set_map_and_center(BlockPos::new(0, 65, 0), BlockPos::new(1, 1, 1));
    let leaf = f.leaves.dynamic_leaves_state(1);
    for dir in Direction::HORIZONTAL {
        let p = BlockPos::new(0, 65, 0).offset(dir);
        f.world.set_block(p, leaf);
        map.set(p, 1);
    }
    // an orphan leaf far from any twig dries out
    let orphan = BlockPos::new(1, 66, 1);
    f.world.set_block(orphan, leaf);
    map.set(orphan, 1);

    age_volume(&mut f.world, &map, 2, &SafeBounds::Any, &f.leaves, &f.family);
    for dir in Direction::HORIZONTAL {
        let b = f.world.block(BlockPos::new(0, 65, 0).offset(dir));
        assert_eq!(f.leaves.hydration_of(b), 4, "{dir}");
    }
    assert!(f.world.is_air(orphan));
    // hydrated leaves spread into the air around them
    assert!(f.leaves.is_leaves(f.world.block(BlockPos::new(0, 66, -1))));
    assert!(f.world.is_air(BlockPos::new(0, 66, 0)));
}

#[test]
fn aging_does_not_spread_into_the_outer_ring() {
    let mut f = fixture();
    place(&mut f, &[(0, 65, 0)]);
    let mut map = SimpleVoxmap::new(3, 3, 3);
    map.set_map_and_center(BlockPos::new(0, 65, 0), BlockPos::new(1, 1, 1));
    let leaf = f.leaves.dynamic_leaves_state(1);
    for dir in Direction::HORIZONTAL {
        let p = BlockPos::new(0, 65, 0).offset(dir);
        f.world.set_block(p, leaf);
        map.set(p, 1);
    }
    // x = 1 is the last column of the region, so growth stops at x = 0
    let bounds = SafeBounds::Region(BlockBounds::new(BlockPos::new(-3, 0, -3), BlockPos::new(1, 128, 3)));

    age_volume(&mut f.world, &map, 2, &bounds, &f.leaves, &f.family);
    // cells already planned in the ring still age
    assert_eq!(f.leaves.hydration_of(f.world.block(BlockPos::new(1, 65, 0))), 4);
    assert!(f.leaves.is_leaves(f.world.block(BlockPos::new(-1, 66, 0))));
    assert!(f.world.is_air(BlockPos::new(1, 66, 0)));
    assert!(f.world.is_air(BlockPos::new(2, 65, 0)));
    assert!(f.world.is_air(BlockPos::new(1, 65, 1)));
}

#[test]
fn thick_unsupported_branch_rots() {
    let mut f = fixture();
    let p = BlockPos::new(5, 80, 5);
    f.world.set_block(p, f.family.branch.with_state(3));
    assert!(check_for_rot(&mut f.world, &f.family, &f.leaves, p, &SafeBounds::Any));
    assert!(f.world.is_air(p));
}

#[test]
fn thin_unsupported_branch_sprouts_leaves() {
    let mut f = fixture();
    let p = BlockPos::new(5, 80, 5);
    f.world.set_block(p, f.family.branch_for_placement());
    assert!(!check_for_rot(&mut f.world, &f.family, &f.leaves, p, &SafeBounds::Any));
    assert!(f.family.is_same_tree(f.world.block(p)));
}

#[test]
fn supported_branch_does_not_rot() {
    let mut f = fixture();
    forked(&mut f);
    assert!(!check_for_rot(&mut f.world, &f.family, &f.leaves, BlockPos::new(0, 65, 0), &SafeBounds::Any));
}
