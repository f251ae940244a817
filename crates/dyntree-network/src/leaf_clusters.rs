//! Leaf hydration templates blitted around every twig.
use dyntree_geom::BlockPos;
use dyntree_voxmap::SimpleVoxmap;

#[rustfmt::skip]
const DECIDUOUS: [u8; 100] = [
    // y = -1
    0, 0, 0, 0, 0,
    0, 1, 2, 1, 0,
    0, 2, 4, 2, 0,
    0, 1, 2, 1, 0,
    0, 0, 0, 0, 0,
    // y = 0, twig in the middle
    0, 1, 2, 1, 0,
    1, 3, 4, 3, 1,
    2, 4, 0, 4, 2,
    1, 3, 4, 3, 1,
    0, 1, 2, 1, 0,
    // y = 1
    0, 0, 1, 0, 0,
    0, 2, 3, 2, 0,
    1, 3, 4, 3, 1,
    0, 2, 3, 2, 0,
    0, 0, 1, 0, 0,
    // y = 2
    0, 0, 0, 0, 0,
    0, 0, 1, 0, 0,
    0, 1, 2, 1, 0,
    0, 0, 1, 0, 0,
    0, 0, 0, 0, 0,
];

#[rustfmt::skip]
const CONIFER: [u8; 50] = [
    // y = 0, twig in the middle
    0, 0, 1, 0, 0,
    0, 2, 4, 2, 0,
    1, 4, 0, 4, 1,
    0, 2, 4, 2, 0,
    0, 0, 1, 0, 0,
    // y = 1
    0, 0, 0, 0, 0,
    0, 1, 2, 1, 0,
    0, 2, 4, 2, 0,
    0, 1, 2, 1, 0,
    0, 0, 0, 0, 0,
];

fn build(len_y: usize, center: BlockPos, data: &[u8]) -> SimpleVoxmap {
    SimpleVoxmap::from_layers(5, len_y, 5, center, data).unwrap_or_else(|| {
        let mut m = SimpleVoxmap::new(5, len_y, 5);
        m.set_center(center);
        m
    })
}

/// Rounded 5x4x5 crown.
pub fn deciduous() -> SimpleVoxmap {
    build(4, BlockPos::new(2, 1, 2), &DECIDUOUS)
}

/// Flat 5x2x5 tier.
pub fn conifer() -> SimpleVoxmap {
    build(2, BlockPos::new(2, 0, 2), &CONIFER)
}

pub fn by_name(name: &str) -> Option<SimpleVoxmap> {
    match name {
        "deciduous" => Some(deciduous()),
        "conifer" => Some(conifer()),
        _ => None,
    }
}
