use std::error::Error;
use std::sync::Arc;

use dyntree_geom::{BlockBounds, BlockPos, Direction, SafeBounds};
use dyntree_gen::{EventBus, GenerationContext, GenerationOutcome, SpeciesCatalog, SpeciesLookup, generate};
use dyntree_world::{LevelAccess, MemoryWorld};
use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::synth::{hash2, rand01, synthesize_code};
use crate::worldgen::{BiomeDef, WorldGenConfig};

const SALT_JITTER_X: u32 = 0x51ed_270b;
const SALT_JITTER_Z: u32 = 0x6b1a_3c2d;
const SALT_PLANT: u32 = 0x1f3d_5b79;
const SALT_SPECIES: u32 = 0x2c1b_3c6d;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForestStats {
    pub candidates: u32,
    pub generated: u32,
    pub aborted: u32,
    pub no_trunk: u32,
    pub rotted: u32,
    pub abandoned: u32,
    /// Trees that needed the second attempt, whatever its result.
    pub retried: u32,
}

impl ForestStats {
    fn record(&mut self, outcome: &GenerationOutcome, attempts: u32) {
        match outcome {
            GenerationOutcome::Generated { .. } => self.generated += 1,
            GenerationOutcome::Aborted => self.aborted += 1,
            GenerationOutcome::NoTrunk => self.no_trunk += 1,
            GenerationOutcome::Rotted => self.rotted += 1,
            GenerationOutcome::Abandoned => self.abandoned += 1,
        }
        if attempts > 1 {
            self.retried += 1;
        }
    }
}

struct Noise {
    height: FastNoiseLite,
    biome: FastNoiseLite,
}

impl Noise {
    fn new(cfg: &WorldGenConfig) -> Self {
        let mut height = FastNoiseLite::with_seed(cfg.seed);
        height.set_noise_type(Some(NoiseType::OpenSimplex2));
        height.set_frequency(Some(cfg.terrain.frequency));
        let mut biome = FastNoiseLite::with_seed(cfg.seed ^ 99_173);
        biome.set_noise_type(Some(NoiseType::OpenSimplex2));
        biome.set_frequency(Some(cfg.biome_frequency));
        Self { height, biome }
    }

    fn surface_y(&self, cfg: &WorldGenConfig, x: i32, z: i32) -> i32 {
        let n = self.height.get_noise_2d(x as f32, z as f32);
        let t = ((n + 1.0) * 0.5).clamp(0.0, 1.0);
        let span = (cfg.terrain.max_y - cfg.terrain.min_y).max(0) as f32;
        cfg.terrain.min_y + (t * span).round() as i32
    }

    fn biome_index(&self, cfg: &WorldGenConfig, cx: i32, cz: i32) -> usize {
        let half = cfg.chunk_size / 2;
        let n = self
            .biome
            .get_noise_2d((cx * cfg.chunk_size + half) as f32, (cz * cfg.chunk_size + half) as f32);
        let t = ((n + 1.0) * 0.5).clamp(0.0, 0.999_9);
        ((t * cfg.biomes.len() as f32) as usize).min(cfg.biomes.len().saturating_sub(1))
    }
}

fn chunk_range(cfg: &WorldGenConfig) -> impl Iterator<Item = (i32, i32)> + '_ {
    let r = cfg.radius_chunks.max(0);
    (-r..=r).flat_map(move |cz| (-r..=r).map(move |cx| (cx, cz)))
}

/// Lays down stone, soil and grass following the height noise, and assigns
/// a biome to every chunk.
pub fn build_terrain(world: &mut MemoryWorld, cfg: &WorldGenConfig) -> Result<(), Box<dyn Error>> {
    let reg = world.registry_arc();
    let stone = reg.block_by_name("stone").ok_or("block table has no stone")?;
    let dirt = reg.block_by_name("dirt").ok_or("block table has no dirt")?;
    let grass = reg.block_by_name("grass_block").ok_or("block table has no grass_block")?;
    let noise = Noise::new(cfg);
    let cs = cfg.chunk_size;
    let floor = cfg.terrain.min_y - 8;
    for (cx, cz) in chunk_range(cfg) {
        let def = &cfg.biomes[noise.biome_index(cfg, cx, cz)];
        world.set_chunk_biome(cx, cz, def.biome());
        for lz in 0..cs {
            for lx in 0..cs {
                let (x, z) = (cx * cs + lx, cz * cs + lz);
                let top = noise.surface_y(cfg, x, z);
                let soil_bottom = top - cfg.terrain.soil_depth.max(0);
                world.fill(
                    BlockBounds::new(BlockPos::new(x, floor, z), BlockPos::new(x, soil_bottom - 1, z)),
                    stone,
                );
                if soil_bottom < top {
                    world.fill(
                        BlockBounds::new(BlockPos::new(x, soil_bottom, z), BlockPos::new(x, top - 1, z)),
                        dirt,
                    );
                }
                world.set_block(BlockPos::new(x, top, z), grass);
            }
        }
    }
    log::debug!("terrain built: {:?}", world.stats());
    Ok(())
}

/// Decorates every chunk with trees, one chunk at a time, each tree
/// confined to its chunk's neighbourhood.
pub fn plant_forest(
    world: &mut MemoryWorld,
    cfg: &WorldGenConfig,
    catalog: &Arc<SpeciesCatalog>,
    events: &mut EventBus,
) -> ForestStats {
    let noise = Noise::new(cfg);
    let cs = cfg.chunk_size;
    let spacing = cfg.trees.spacing.max(1);
    let lookup: Arc<dyn SpeciesLookup> = catalog.clone();
    let mut stats = ForestStats::default();
    for (cx, cz) in chunk_range(cfg) {
        let def = &cfg.biomes[noise.biome_index(cfg, cx, cz)];
        let bounds = SafeBounds::chunk_neighborhood(cx, cz, cs);
        for gz in (0..cs).step_by(spacing as usize) {
            for gx in (0..cs).step_by(spacing as usize) {
                let (bx, bz) = (cx * cs + gx, cz * cs + gz);
                let jx = (rand01(bx, bz, cfg.seed, SALT_JITTER_X) * spacing as f32) as i32;
                let jz = (rand01(bx, bz, cfg.seed, SALT_JITTER_Z) * spacing as f32) as i32;
                let (x, z) = ((bx + jx).min(cx * cs + cs - 1), (bz + jz).min(cz * cs + cs - 1));
                if rand01(x, z, cfg.seed, SALT_PLANT) >= cfg.trees.probability {
                    continue;
                }
                stats.candidates += 1;
                let root = BlockPos::new(x, noise.surface_y(cfg, x, z), z);
                let Some(report) = plant_tree(world, cfg, catalog, &lookup, def, root, bounds, events) else {
                    continue;
                };
                stats.record(&report.outcome, report.attempts);
            }
        }
    }
    log::info!(
        "forest: {} candidates, {} trees, {} abandoned, {} retried",
        stats.candidates,
        stats.generated,
        stats.abandoned,
        stats.retried
    );
    stats
}

#[allow(clippy::too_many_arguments)]
fn plant_tree(
    world: &mut MemoryWorld,
    cfg: &WorldGenConfig,
    catalog: &SpeciesCatalog,
    lookup: &Arc<dyn SpeciesLookup>,
    def: &BiomeDef,
    root: BlockPos,
    bounds: SafeBounds,
    events: &mut EventBus,
) -> Option<dyntree_gen::GenerationReport> {
    let name = def.pick_species(rand01(root.x, root.z, cfg.seed, SALT_SPECIES))?;
    let Some(species) = catalog.get(name) else {
        log::warn!("biome {} names unknown species {name}", def.name);
        return None;
    };
    let h = hash2(root.x, root.z, cfg.seed as u32);
    let mut code = synthesize_code(h, cfg.trees.trunk_min, cfg.trees.trunk_max).with_careful(cfg.trees.careful);
    let facing = Direction::HORIZONTAL[(h >> 8) as usize % 4];
    let ctx = GenerationContext::new(species, root)
        .with_radius(cfg.trees.leaf_radius)
        .with_facing(facing)
        .with_safe_bounds(bounds)
        .with_biome(world.biome_at(root).clone())
        .with_lookup(Arc::clone(lookup));
    let report = generate(&mut code, world, &ctx, events);
    log::trace!("{name} at {root}: {:?} after {} attempt(s)", report.outcome, report.attempts);
    Some(report)
}

/// Builds the terrain and plants the forest in a fresh world.
pub fn grow_forest(
    world: &mut MemoryWorld,
    cfg: &WorldGenConfig,
    catalog: &Arc<SpeciesCatalog>,
    events: &mut EventBus,
) -> Result<ForestStats, Box<dyn Error>> {
    build_terrain(world, cfg)?;
    Ok(plant_forest(world, cfg, catalog, events))
}
