use dyntree_geom::Direction;

// Rows indexed by facing, columns by instruction. Down, up, fork and return
// are fixed points; only the horizontal directions permute.
const DIR_MAP: [[u8; 8]; 6] = [
    [0, 1, 2, 3, 4, 5, 6, 7], // D
    [0, 1, 2, 3, 4, 5, 6, 7], // U
    [0, 1, 2, 3, 4, 5, 6, 7], // N
    [0, 1, 3, 2, 5, 4, 6, 7], // S
    [0, 1, 5, 4, 2, 3, 6, 7], // W
    [0, 1, 4, 5, 3, 2, 6, 7], // E
];

/// Table that rotates stored instructions toward `facing`.
#[inline]
pub fn forward_table(facing: Direction) -> &'static [u8; 8] {
    &DIR_MAP[facing.index()]
}

/// Table that undoes `forward_table(facing)`: the west and east rows trade places.
#[inline]
pub fn inverse_table(facing: Direction) -> &'static [u8; 8] {
    let row = match facing {
        Direction::West => Direction::East,
        Direction::East => Direction::West,
        other => other,
    };
    &DIR_MAP[row.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_undoes_forward() {
        for facing in Direction::ALL {
            let f = forward_table(facing);
            let inv = inverse_table(facing);
            for code in 0u8..8 {
                assert_eq!(inv[usize::from(f[usize::from(code)])], code, "{facing}");
            }
        }
    }

    #[test]
    fn fixed_points() {
        for facing in Direction::ALL {
            let f = forward_table(facing);
            for code in [0u8, 1, 6, 7] {
                assert_eq!(f[usize::from(code)], code);
            }
        }
    }
}
