use std::fmt;
use std::sync::Arc;

use dyntree_blocks::Block;
use dyntree_geom::{BlockPos, Direction, SafeBounds};
use dyntree_world::Biome;

use crate::{Species, SpeciesLookup};

/// Parameters of one `generate` call.
#[derive(Clone)]
pub struct GenerationContext {
    pub species: Arc<dyn Species>,
    pub root_pos: BlockPos,
    pub radius: i32,
    pub facing: Direction,
    pub safe_bounds: SafeBounds,
    pub biome: Biome,
    /// Resolves the species of foreign branches met during teardown.
    pub lookup: Option<Arc<dyn SpeciesLookup>>,
    /// Set on the retry after a failed first attempt.
    pub second_chance: bool,
}

impl GenerationContext {
    pub const DEFAULT_RADIUS: i32 = 8;

    pub fn new(species: Arc<dyn Species>, root_pos: BlockPos) -> Self {
        Self {
            species,
            root_pos,
            radius: Self::DEFAULT_RADIUS,
            facing: Direction::North,
            safe_bounds: SafeBounds::Any,
            biome: Biome::default(),
            lookup: None,
            second_chance: false,
        }
    }

    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius.max(0);
        self
    }

    pub fn with_facing(mut self, facing: Direction) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_safe_bounds(mut self, bounds: SafeBounds) -> Self {
        self.safe_bounds = bounds;
        self
    }

    pub fn with_biome(mut self, biome: Biome) -> Self {
        self.biome = biome;
        self
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn SpeciesLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Copy used for the single retry.
    pub fn second_chance(&self) -> Self {
        Self {
            second_chance: true,
            ..self.clone()
        }
    }

    #[inline]
    pub fn is_world_gen(&self) -> bool {
        self.safe_bounds.is_world_gen()
    }
}

impl fmt::Debug for GenerationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationContext")
            .field("species", &self.species.name())
            .field("root_pos", &self.root_pos)
            .field("radius", &self.radius)
            .field("facing", &self.facing)
            .field("safe_bounds", &self.safe_bounds)
            .field("biome", &self.biome.name)
            .field("second_chance", &self.second_chance)
            .finish()
    }
}

/// What post-generation hooks get to see of a finished tree.
pub struct PostGenerationContext<'a> {
    pub generation: &'a GenerationContext,
    /// Root after pre-generation adjustment.
    pub root_pos: BlockPos,
    pub end_points: &'a [BlockPos],
    /// Soil that was at the root before the rooty block went in.
    pub initial_dirt: Block,
}
