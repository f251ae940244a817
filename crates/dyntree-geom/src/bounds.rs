use crate::BlockPos;

/// Inclusive integer box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockBounds {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl BlockBounds {
    /// Builds a box from two corners in any order.
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn from_points<I: IntoIterator<Item = BlockPos>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = BlockBounds::new(first, first);
        for p in it {
            b = b.union_point(p);
        }
        Some(b)
    }

    #[inline]
    pub fn union_point(self, p: BlockPos) -> Self {
        Self {
            min: BlockPos::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            max: BlockPos::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        }
    }

    #[inline]
    pub fn contains(&self, p: BlockPos) -> bool {
        self.contains_xz(p) && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn contains_xz(&self, p: BlockPos) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }

    pub fn expand(self, n: i32) -> Self {
        Self {
            min: self.min - BlockPos::new(n, n, n),
            max: self.max + BlockPos::new(n, n, n),
        }
    }

    /// Grows (or with a negative `n`, shrinks) the box horizontally only.
    pub fn expand_xz(self, n: i32) -> Self {
        Self {
            min: self.min - BlockPos::new(n, 0, n),
            max: self.max + BlockPos::new(n, 0, n),
        }
    }

    pub fn size(&self) -> BlockPos {
        self.max - self.min + BlockPos::new(1, 1, 1)
    }

    /// Positions in y, z, x order.
    pub fn iter(&self) -> impl Iterator<Item = BlockPos> + '_ {
        (self.min.y..=self.max.y).flat_map(move |y| {
            (self.min.z..=self.max.z)
                .flat_map(move |z| (self.min.x..=self.max.x).map(move |x| BlockPos::new(x, y, z)))
        })
    }
}

/// Predicate limiting generation writes to columns known to be loaded.
///
/// `Any` is used for interactive growth where the whole world is writable; a
/// `Region` marks world generation, where only the decorated chunk and its
/// neighbours may be touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SafeBounds {
    #[default]
    Any,
    Region(BlockBounds),
}

impl SafeBounds {
    /// Safe bounds for decorating chunk `(cx, cz)`: the chunk plus its eight neighbours.
    pub fn chunk_neighborhood(cx: i32, cz: i32, chunk_size: i32) -> Self {
        let min = BlockPos::new((cx - 1) * chunk_size, i32::MIN, (cz - 1) * chunk_size);
        let max = BlockPos::new((cx + 2) * chunk_size - 1, i32::MAX, (cz + 2) * chunk_size - 1);
        SafeBounds::Region(BlockBounds { min, max })
    }

    /// Column check; with `gap` the outermost ring of the region is excluded so
    /// that neighbour lookups from an accepted position stay inside the region.
    pub fn in_bounds(&self, pos: BlockPos, gap: bool) -> bool {
        match self {
            SafeBounds::Any => true,
            SafeBounds::Region(b) => {
                if gap {
                    b.expand_xz(-1).contains_xz(pos)
                } else {
                    b.contains_xz(pos)
                }
            }
        }
    }

    #[inline]
    pub fn is_world_gen(&self) -> bool {
        matches!(self, SafeBounds::Region(_))
    }
}
