use dyntree_geom::BlockPos;
use dyntree_voxmap::{BRANCH, SimpleVoxmap, TWIG};
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=6
}

fn column(n: usize) -> SimpleVoxmap {
    let mut m = SimpleVoxmap::new(1, n, 1);
    for y in 0..n {
        m.set(BlockPos::new(0, y as i32, 0), 1);
    }
    m
}

#[test]
fn smother_keeps_top_cells_of_a_run() {
    // T=2 over a four-high column starting at y=3: y3 and y2 survive
    let mut m = column(4);
    m.smother(2);
    let col: Vec<u8> = (0..4).map(|y| m.get(BlockPos::new(0, y, 0))).collect();
    assert_eq!(col, vec![0, 0, 1, 1]);
}

#[test]
fn smother_zero_is_a_no_op() {
    let mut m = column(4);
    m.set(BlockPos::new(0, 0, 0), TWIG);
    let before = m.clone();
    m.smother(0);
    assert_eq!(m, before);
}

#[test]
fn gaps_reset_the_run() {
    let mut m = SimpleVoxmap::new(1, 6, 1);
    for y in [5, 4, 2, 1, 0] {
        m.set(BlockPos::new(0, y, 0), 3);
    }
    m.smother(2);
    let col: Vec<u8> = (0..6).map(|y| m.get(BlockPos::new(0, y, 0))).collect();
    assert_eq!(col, vec![0, 3, 3, 0, 3, 3]);
}

#[test]
fn blit_max_keeps_larger_values() {
    let cluster = SimpleVoxmap::from_layers(3, 1, 3, BlockPos::new(1, 0, 1), &[1, 2, 1, 2, 3, 2, 1, 2, 1])
        .expect("3x1x3 cluster");
    let mut m = SimpleVoxmap::new(5, 2, 5);
    m.set(BlockPos::new(2, 0, 2), BRANCH);
    m.set(BlockPos::new(1, 0, 2), 1);
    m.blit_max(BlockPos::new(2, 0, 2), &cluster);
    assert_eq!(m.get(BlockPos::new(2, 0, 2)), BRANCH);
    assert_eq!(m.get(BlockPos::new(1, 0, 2)), 2);
    assert_eq!(m.get(BlockPos::new(1, 0, 1)), 1);
    assert_eq!(m.count_non_zero(), 9);
}

#[test]
fn tops_reports_highest_cell_per_column() {
    let mut m = SimpleVoxmap::new(2, 5, 1);
    m.set_map_and_center(BlockPos::new(10, 60, 10), BlockPos::ZERO);
    m.set(BlockPos::new(10, 61, 10), 2);
    m.set(BlockPos::new(10, 63, 10), 1);
    m.set(BlockPos::new(11, 60, 10), 4);
    let tops = m.tops();
    assert_eq!(tops.len(), 2);
    assert_eq!(tops[0].pos, BlockPos::new(10, 63, 10));
    assert_eq!(tops[1].pos, BlockPos::new(11, 60, 10));
    assert_eq!(tops[1].value, 4);
}

#[test]
fn from_layers_rejects_wrong_size() {
    assert!(SimpleVoxmap::from_layers(2, 2, 2, BlockPos::ZERO, &[0; 7]).is_none());
}

proptest! {
    // every in-bounds cell maps to a unique in-range index
    #[test]
    fn index_is_unique_and_in_range(sx in dim(), sy in dim(), sz in dim(), cx in -8i32..8, cy in -8i32..8, cz in -8i32..8) {
        let mut m = SimpleVoxmap::new(sx, sy, sz);
        m.set_center(BlockPos::new(cx, cy, cz));
        let total = sx * sy * sz;
        let mut seen = vec![false; total];
        for p in m.bounds().iter() {
            let i = m.index(p).unwrap();
            prop_assert!(i < total);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // a smothered column never holds a run longer than the threshold
    #[test]
    fn smother_bounds_run_length(n in 1usize..12, t in 1u8..6) {
        let mut m = column(n);
        m.smother(t);
        let kept = (0..n as i32).filter(|&y| m.get(BlockPos::new(0, y, 0)) != 0).count();
        prop_assert_eq!(kept, n.min(t as usize));
        for y in 0..n.min(t as usize) {
            prop_assert_eq!(m.get(BlockPos::new(0, (n - 1 - y) as i32, 0)), 1);
        }
    }

    #[test]
    fn non_zero_cells_round_trip_positions(sx in dim(), sy in dim(), sz in dim(), seed in any::<u32>()) {
        let mut m = SimpleVoxmap::new(sx, sy, sz);
        m.set_center(BlockPos::new(1, 0, 1));
        let mut s = seed;
        for p in m.bounds().iter() {
            s = s.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            m.set(p, ((s >> 24) & 0x0F) as u8);
        }
        for c in m.non_zero_cells(0x0F) {
            prop_assert_eq!(m.get(c.pos), c.value);
        }
        prop_assert_eq!(m.non_zero_cells(0x0F).len(), m.count_non_zero());
    }
}
