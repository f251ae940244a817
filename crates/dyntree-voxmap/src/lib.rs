//! Bounded byte voxel map used to plan leaves around a growing tree.
#![forbid(unsafe_code)]

use dyntree_geom::{BlockBounds, BlockPos};

/// Low nibble: leaf hydration.
pub const LEAF_MASK: u8 = 0x0F;
/// Twig marker, set on branch tips.
pub const TWIG: u8 = 0x10;
/// Branch occupancy marker.
pub const BRANCH: u8 = 0x20;
/// Leaf value placed directly above every twig while smothering.
pub const TWIG_CAP: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub pos: BlockPos,
    pub value: u8,
}

/// Fixed-size grid addressed by positions offset from a movable center.
///
/// Storage is `y * layer + z * len_x + x` after adding the center, so whole
/// horizontal layers are contiguous and can be skipped via the `touched` flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleVoxmap {
    data: Vec<u8>,
    touched: Vec<bool>,
    len_x: usize,
    len_y: usize,
    len_z: usize,
    layer: usize,
    center: BlockPos,
}

impl SimpleVoxmap {
    pub fn new(len_x: usize, len_y: usize, len_z: usize) -> Self {
        let layer = len_x * len_z;
        Self {
            data: vec![0; layer * len_y],
            touched: vec![false; len_y],
            len_x,
            len_y,
            len_z,
            layer,
            center: BlockPos::ZERO,
        }
    }

    /// Builds a map from raw layer-major data. Layers holding any non-zero
    /// value are marked touched. Returns `None` if `data` has the wrong size.
    pub fn from_layers(
        len_x: usize,
        len_y: usize,
        len_z: usize,
        center: BlockPos,
        data: &[u8],
    ) -> Option<Self> {
        let mut map = Self::new(len_x, len_y, len_z);
        if data.len() != map.data.len() {
            return None;
        }
        map.data.copy_from_slice(data);
        for y in 0..len_y {
            let start = y * map.layer;
            map.touched[y] = map.data[start..start + map.layer].iter().any(|&v| v != 0);
        }
        map.center = center;
        Some(map)
    }

    #[inline]
    pub fn len_x(&self) -> usize {
        self.len_x
    }
    #[inline]
    pub fn len_y(&self) -> usize {
        self.len_y
    }
    #[inline]
    pub fn len_z(&self) -> usize {
        self.len_z
    }

    #[inline]
    pub fn center(&self) -> BlockPos {
        self.center
    }

    pub fn set_center(&mut self, center: BlockPos) {
        self.center = center;
    }

    /// Places grid cell `center_pos` at world position `map_pos`.
    pub fn set_map_and_center(&mut self, map_pos: BlockPos, center_pos: BlockPos) {
        self.center = center_pos - map_pos;
    }

    /// Inclusive bounds of the grid in the current coordinate frame.
    pub fn bounds(&self) -> BlockBounds {
        let min = -self.center;
        let max = min
            + BlockPos::new(
                self.len_x as i32 - 1,
                self.len_y as i32 - 1,
                self.len_z as i32 - 1,
            );
        BlockBounds { min, max }
    }

    #[inline]
    fn raw_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= self.len_x || y >= self.len_y || z >= self.len_z {
            return None;
        }
        Some(y * self.layer + z * self.len_x + x)
    }

    #[inline]
    pub fn index(&self, pos: BlockPos) -> Option<usize> {
        let p = pos + self.center;
        self.raw_index(p.x, p.y, p.z)
    }

    #[inline]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.index(pos).is_some()
    }

    /// Out-of-bounds reads return 0.
    #[inline]
    pub fn get(&self, pos: BlockPos) -> u8 {
        self.index(pos).map_or(0, |i| self.data[i])
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: BlockPos, value: u8) {
        let p = pos + self.center;
        if let Some(i) = self.raw_index(p.x, p.y, p.z) {
            self.data[i] = value;
            self.touched[p.y as usize] = true;
        }
    }

    pub fn set_or(&mut self, pos: BlockPos, bits: u8) {
        let v = self.get(pos);
        self.set(pos, v | bits);
    }

    #[inline]
    pub fn is_layer_touched(&self, y: usize) -> bool {
        self.touched.get(y).copied().unwrap_or(false)
    }

    /// Writes every non-zero cell of `src`, centred on `pos`, keeping the larger value.
    pub fn blit_max(&mut self, pos: BlockPos, src: &SimpleVoxmap) {
        for cell in src.non_zero_cells(0xFF) {
            let dst = pos + cell.pos;
            if cell.value > self.get(dst) {
                self.set(dst, cell.value);
            }
        }
    }

    /// Cells whose value shares a bit with `mask`, in storage order.
    pub fn non_zero_cells(&self, mask: u8) -> Vec<Cell> {
        let mut out = Vec::new();
        for y in 0..self.len_y {
            if !self.touched[y] {
                continue;
            }
            for z in 0..self.len_z {
                for x in 0..self.len_x {
                    let v = self.data[y * self.layer + z * self.len_x + x];
                    if v & mask != 0 {
                        out.push(Cell {
                            pos: BlockPos::new(x as i32, y as i32, z as i32) - self.center,
                            value: v,
                        });
                    }
                }
            }
        }
        out
    }

    pub fn count_non_zero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    fn top_touched_layer(&self) -> Option<usize> {
        (0..self.len_y).rev().find(|&y| self.touched[y])
    }

    /// Highest non-zero cell of every column.
    pub fn tops(&self) -> Vec<Cell> {
        let Some(start_y) = self.top_touched_layer() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for z in 0..self.len_z {
            for x in 0..self.len_x {
                let top = (0..=start_y).rev().find_map(|y| {
                    let v = self.data[y * self.layer + z * self.len_x + x];
                    (v != 0).then_some((y, v))
                });
                if let Some((y, value)) = top {
                    out.push(Cell {
                        pos: BlockPos::new(x as i32, y as i32, z as i32) - self.center,
                        value,
                    });
                }
            }
        }
        out
    }

    /// Caps each column's run of stacked leaf cells at `max`, scanning down
    /// from the topmost touched layer. An empty cell resets the run; a twig
    /// counts toward it and gets a `TWIG_CAP` leaf directly above. A `max` of
    /// zero leaves the map untouched.
    pub fn smother(&mut self, max: u8) {
        if max == 0 {
            return;
        }
        let Some(start_y) = self.top_touched_layer() else {
            return;
        };
        let mut cleared = 0usize;
        for z in 0..self.len_z as i32 {
            for x in 0..self.len_x as i32 {
                let mut count = 0u32;
                for y in (0..=start_y as i32).rev() {
                    let Some(i) = self.raw_index(x, y, z) else {
                        continue;
                    };
                    let v = self.data[i];
                    if v == 0 {
                        count = 0;
                    } else if v & LEAF_MASK != 0 {
                        count += 1;
                        if count > u32::from(max) {
                            self.data[i] = 0;
                            cleared += 1;
                        }
                    } else if v & TWIG != 0 {
                        count += 1;
                        if let Some(above) = self.raw_index(x, y + 1, z) {
                            self.data[above] = TWIG_CAP;
                            self.touched[y as usize + 1] = true;
                        }
                    }
                }
            }
        }
        log::trace!("smother(max={max}) cleared {cleared} cells");
    }
}
