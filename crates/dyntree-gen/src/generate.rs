use dyntree_blocks::Block;
use dyntree_code::{CodeError, Instruction, JoCode};
use dyntree_geom::{BlockPos, Direction, SafeBounds};
use dyntree_network::{
    CollectorNode, FindEndsNode, MapSignal, NodeInspector, age_volume, analyse_branch,
};
use dyntree_voxmap::{LEAF_MASK, SimpleVoxmap};
use dyntree_world::{DestroyMode, LevelAccess};

use crate::{EventBus, GenEvent, GenerationContext, PostGenerationContext, Species};

/// Deepest fork nesting `generate_fork` follows before giving up on a code.
pub const MAX_FORK_DEPTH: usize = 128;

/// Vertical steps searched above a leaf column for a snow slot.
const SNOW_SEARCH_STEPS: i32 = 5;
/// Biomes at or above this base temperature never get snow dressing.
const SNOW_MAX_BASE_TEMPERATURE: f32 = 0.4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The tree stands; `end_points` are its surviving branch tips.
    Generated { end_points: Vec<BlockPos> },
    /// The species refused the site. Nothing was written.
    Aborted,
    /// No trunk block ended up above the root; the soil was restored.
    NoTrunk,
    /// The whole tree rotted away right after aging.
    Rotted,
    /// The network stayed broken and was torn down; the soil was restored.
    Abandoned,
}

impl GenerationOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    pub outcome: GenerationOutcome,
    /// 1, or 2 when the second chance was used.
    pub attempts: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
enum InvalidNetwork {
    #[error("branch network reaches a rooty block")]
    FoundRoot,
    #[error("branch network is deeper than the walk limit")]
    Overflow,
    #[error(transparent)]
    Code(#[from] CodeError),
}

enum Attempt {
    Done(GenerationOutcome),
    Invalid {
        tree_pos: BlockPos,
        soil: Soil,
        reason: InvalidNetwork,
    },
}

/// The block a rooty block replaced.
#[derive(Clone, Copy, Debug)]
struct Soil {
    pos: BlockPos,
    block: Block,
}

impl Soil {
    /// Puts the soil back if the rooty block is still there.
    fn restore(self, world: &mut dyn LevelAccess) {
        if world.registry().is_rooty(world.block(self.pos)) {
            world.set_block(self.pos, self.block);
        }
    }
}

/// Grows the tree described by `code` at `ctx.root_pos`.
///
/// A broken network (fused into another root or looping) is torn down and
/// regenerated once. A second failure, or a code nested deeper than
/// [`MAX_FORK_DEPTH`], is torn down and reported as
/// [`GenerationOutcome::Abandoned`] with the original soil put back.
pub fn generate(
    code: &mut JoCode,
    world: &mut dyn LevelAccess,
    ctx: &GenerationContext,
    events: &mut EventBus,
) -> GenerationReport {
    let mut ctx = ctx.clone();
    let mut attempts = 0;
    let mut first_soil: Option<Soil> = None;
    loop {
        attempts += 1;
        match generate_once(code, world, &ctx, first_soil, events) {
            Attempt::Done(outcome) => return GenerationReport { outcome, attempts },
            Attempt::Invalid { tree_pos, soil, reason } => {
                if ctx.is_world_gen() {
                    if ctx.second_chance {
                        log::debug!("second attempt for code {code} at {tree_pos} also failed: {reason}");
                    } else {
                        log::warn!(
                            "non-viable branch network during world generation at {tree_pos}: species={} radius={} code={code} ({reason})",
                            ctx.species.name(),
                            ctx.radius
                        );
                    }
                }
                cleanup_frankentree(world, tree_pos, &ctx);
                // the code itself is broken, so a retry would fail the same way
                if ctx.second_chance || matches!(reason, InvalidNetwork::Code(_)) {
                    soil.restore(world);
                    return GenerationReport {
                        outcome: GenerationOutcome::Abandoned,
                        attempts,
                    };
                }
                first_soil = Some(soil);
                ctx = ctx.second_chance();
            }
        }
    }
}

fn generate_once(
    code: &mut JoCode,
    world: &mut dyn LevelAccess,
    ctx: &GenerationContext,
    first_soil: Option<Soil>,
    events: &mut EventBus,
) -> Attempt {
    let species: &dyn Species = ctx.species.as_ref();
    let bounds = &ctx.safe_bounds;
    code.set_facing(ctx.facing);

    let Some(root_pos) = species.pre_generation(world, ctx.root_pos, ctx.radius, ctx.facing, bounds, code)
    else {
        log::trace!("{} refused root at {}", species.name(), ctx.root_pos);
        return Attempt::Done(GenerationOutcome::Aborted);
    };

    // a retry sees the rooty block left by the first attempt
    let soil = match first_soil {
        Some(soil) if soil.pos == root_pos => soil,
        _ => Soil {
            pos: root_pos,
            block: world.block(root_pos),
        },
    };
    let initial_dirt = soil.block;
    species.place_rooty_dirt_block(world, root_pos, 0);

    if let Err(err) = generate_fork(code, world, species, 0, root_pos, false, 0) {
        return Attempt::Invalid {
            tree_pos: root_pos.above(),
            soil,
            reason: err.into(),
        };
    }

    let tree_pos = root_pos.above();
    let family = species.family();
    if !family.is_same_tree(world.block(tree_pos)) {
        world.set_block(root_pos, initial_dirt);
        return Attempt::Done(GenerationOutcome::NoTrunk);
    }

    let r = ctx.radius;
    let side = (2 * r + 1) as usize;
    let mut leaf_map = SimpleVoxmap::new(side, species.world_gen_leaf_map_height(), side);
    leaf_map.set_map_and_center(tree_pos, BlockPos::new(r, 0, r));

    let mut ends = FindEndsNode::new();
    let (found_root, overflow) = {
        let mut inflator = species.node_inflator(&mut leaf_map);
        let mut inspectors: Vec<&mut dyn NodeInspector> = Vec::with_capacity(2);
        inspectors.push(inflator.as_mut());
        inspectors.push(&mut ends);
        let mut signal = MapSignal::new(inspectors).with_destroy_looped_nodes(code.is_careful());
        analyse_branch(world, tree_pos, Some(Direction::Down), &mut signal);
        (signal.found_root, signal.overflow)
    };
    if found_root || overflow {
        let reason = if found_root {
            InvalidNetwork::FoundRoot
        } else {
            InvalidNetwork::Overflow
        };
        return Attempt::Invalid {
            tree_pos,
            soil,
            reason,
        };
    }
    let mut end_points = ends.into_ends();

    let leaves = species.leaves_properties();
    leaf_map.smother(leaves.smother_leaves_max);
    place_leaves(world, &mut leaf_map, ctx);
    for cell in leaf_map.non_zero_cells(0xFF) {
        if !bounds.in_bounds(cell.pos, true) {
            leaf_map.set(cell.pos, 0);
        }
    }

    age_volume(
        world,
        &leaf_map,
        species.world_gen_age_iterations(),
        bounds,
        leaves,
        family,
    );

    if species.handle_rot(world, &mut end_points, root_pos, tree_pos, bounds) {
        log::debug!("{} at {root_pos} rotted away during generation", species.name());
        return Attempt::Done(GenerationOutcome::Rotted);
    }

    let post = PostGenerationContext {
        generation: ctx,
        root_pos,
        end_points: &end_points,
        initial_dirt,
    };
    species.post_generation(world, &post);
    events.post(
        world,
        GenEvent::PostGeneration {
            species: species.name().to_string(),
            root_pos,
            end_points: end_points.clone(),
            safe_bounds: ctx.safe_bounds,
            initial_dirt,
        },
    );

    add_snow(world, &leaf_map, root_pos, ctx);
    log::debug!(
        "generated {} at {root_pos} with {} ends",
        species.name(),
        end_points.len()
    );
    Attempt::Done(GenerationOutcome::Generated { end_points })
}

/// Draws one branch of the skeleton starting at instruction `index`.
/// Returns the index just past the branch's closing RETURN (or the end).
///
/// Once a placement fails the rest of the branch is disabled, but the cursor
/// keeps moving so nested forks still line up.
fn generate_fork(
    code: &JoCode,
    world: &mut dyn LevelAccess,
    species: &dyn Species,
    mut index: usize,
    mut pos: BlockPos,
    mut disabled: bool,
    depth: usize,
) -> Result<usize, CodeError> {
    if depth > MAX_FORK_DEPTH {
        return Err(CodeError::ForkDepthExceeded {
            index,
            limit: MAX_FORK_DEPTH,
        });
    }
    while let Some(instruction) = code.instruction_at(index) {
        match instruction {
            Instruction::Fork => {
                index = generate_fork(code, world, species, index + 1, pos, disabled, depth + 1)?;
            }
            Instruction::Return => return Ok(index + 1),
            Instruction::Move(dir) => {
                pos = pos.offset(dir);
                if !disabled {
                    disabled = !set_block_for_generation(world, species, pos, dir, code.is_careful());
                }
                index += 1;
            }
        }
    }
    Ok(index)
}

/// Places a primary-thickness branch at `pos` if the spot is free. Careful
/// placement also refuses spots touching another branch anywhere except
/// the block we came from.
fn set_block_for_generation(
    world: &mut dyn LevelAccess,
    species: &dyn Species,
    pos: BlockPos,
    dir: Direction,
    careful: bool,
) -> bool {
    if !is_free_to_set_block(world, pos) {
        return false;
    }
    if careful && !is_clear_of_nearby_branches(world, pos, dir.opposite()) {
        return false;
    }
    world.set_block(pos, species.family().branch_for_placement());
    true
}

fn is_free_to_set_block(world: &dyn LevelAccess, pos: BlockPos) -> bool {
    let block = world.block(pos);
    let reg = world.registry();
    reg.is_air(block)
        || reg.is_leaves(block)
        || reg.is_replaceable(block)
        || reg.is_liquid(block)
        || is_foliage(world, block)
}

fn is_foliage(world: &dyn LevelAccess, block: Block) -> bool {
    let reg = world.registry();
    reg.has_tag(block, "foliage") || reg.has_tag(block, "flowers")
}

fn is_clear_of_nearby_branches(world: &dyn LevelAccess, pos: BlockPos, except: Direction) -> bool {
    Direction::ALL
        .into_iter()
        .filter(|&d| d != except)
        .all(|d| !world.registry().is_branch(world.block(pos.offset(d))))
}

/// Writes the smothered leaf map into the world. Cells outside the safe
/// bounds or on occupied ground are dropped from the map.
fn place_leaves(world: &mut dyn LevelAccess, leaf_map: &mut SimpleVoxmap, ctx: &GenerationContext) {
    let leaves = ctx.species.leaves_properties();
    let mut placed = 0usize;
    for cell in leaf_map.non_zero_cells(LEAF_MASK) {
        if !ctx.safe_bounds.in_bounds(cell.pos, false) {
            leaf_map.set(cell.pos, 0);
            continue;
        }
        let block = world.block(cell.pos);
        let reg = world.registry();
        if reg.is_air(block) || reg.is_leaves(block) || is_foliage(world, block) {
            world.set_block(cell.pos, leaves.dynamic_leaves_state(cell.value & LEAF_MASK));
            placed += 1;
        }
    }
    log::trace!("placed {placed} leaves");
}

/// Tears down a broken network: every in-bounds branch reachable from
/// `tree_pos`, plus the leaf clusters around the thin ones.
fn cleanup_frankentree(world: &mut dyn LevelAccess, tree_pos: BlockPos, ctx: &GenerationContext) {
    let mut collector = CollectorNode::new();
    {
        let mut inspectors: Vec<&mut dyn NodeInspector> = Vec::with_capacity(1);
        inspectors.push(&mut collector);
        let mut signal = MapSignal::new(inspectors).with_track_visited(true);
        analyse_branch(world, tree_pos, None, &mut signal);
    }
    let bounds = &ctx.safe_bounds;
    let mut removed = 0usize;
    for pos in collector.into_nodes() {
        if !bounds.in_bounds(pos, false) {
            continue;
        }
        let block = world.block(pos);
        if !world.registry().is_branch(block) {
            continue;
        }
        if let Some(species) = species_of_branch(world, block, ctx) {
            let family = species.family();
            if family.radius_of(block) == family.primary_thickness {
                clear_cluster_leaves(world, pos, species.as_ref(), bounds);
            }
        }
        world.destroy_block(pos, DestroyMode::Ignore);
        removed += 1;
    }
    log::debug!("cleared {removed} branches of a broken network at {tree_pos}");
}

fn species_of_branch(
    world: &dyn LevelAccess,
    block: Block,
    ctx: &GenerationContext,
) -> Option<std::sync::Arc<dyn Species>> {
    let family = world.registry().family_of(block)?;
    if let Some(found) = ctx.lookup.as_ref().and_then(|l| l.common_species(family)) {
        return Some(found);
    }
    ctx.species
        .family()
        .is_same_tree(block)
        .then(|| std::sync::Arc::clone(&ctx.species))
}

fn clear_cluster_leaves(world: &mut dyn LevelAccess, pos: BlockPos, species: &dyn Species, bounds: &SafeBounds) {
    let leaves = species.leaves_properties();
    let Some(cluster) = leaves.cluster.as_ref() else {
        return;
    };
    for cell in cluster.non_zero_cells(0xFF) {
        let del = pos + cell.pos;
        if bounds.in_bounds(del, false) && leaves.is_leaves(world.block(del)) {
            world.set_block(del, Block::AIR);
        }
    }
}

/// Dusts the top of each leaf column with snow in cold, snowy biomes.
fn add_snow(world: &mut dyn LevelAccess, leaf_map: &SimpleVoxmap, root_pos: BlockPos, ctx: &GenerationContext) {
    if ctx.biome.base_temperature >= SNOW_MAX_BASE_TEMPERATURE {
        return;
    }
    let Some(snow) = world.registry().block_by_name("snow") else {
        return;
    };
    if !world.biome_at(root_pos).should_snow(root_pos) {
        return;
    }
    let mut placed = 0usize;
    for top in leaf_map.tops() {
        let mut pos = top.pos;
        for _ in 0..SNOW_SEARCH_STEPS {
            let block = world.block(pos);
            let reg = world.registry();
            if reg.is_air(block) {
                world.set_block(pos, snow);
                placed += 1;
                break;
            }
            if block.id == snow.id || (reg.is_solid(block) && !reg.is_leaves(block)) {
                break;
            }
            pos = pos.above();
        }
    }
    log::trace!("placed {placed} snow layers");
}
