//! `dyntree`: encode, grow and record JoCode tree skeletons.
#![forbid(unsafe_code)]

mod forest;
mod synth;
mod worldgen;

use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dyntree_blocks::BlockRegistry;
use dyntree_code::{Instruction, JoCode, encode};
use dyntree_geom::{BlockBounds, BlockPos, Direction};
use dyntree_gen::{
    DEFAULT_RECORD_FACING, EventBus, GenerationContext, GenerationOutcome, SpeciesCatalog, generate,
    record_tree,
};
use dyntree_world::{LevelAccess, MemoryWorld};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tree skeleton codes: decode, grow, record", long_about = None)]
struct Args {
    /// Block table (defaults to the built-in one)
    #[arg(long, global = true)]
    blocks: Option<PathBuf>,
    /// Species table (defaults to the built-in one)
    #[arg(long, global = true)]
    species: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the instructions of a code
    Decode { code: String },
    /// Pack raw instruction values (0-7) into a code
    Encode {
        #[arg(required = true)]
        instructions: Vec<u8>,
    },
    /// Grow one tree on a flat patch of dirt and summarise it
    Grow {
        code: String,
        #[arg(long, default_value = "oak")]
        tree: String,
        #[arg(long, default_value = "north")]
        facing: Direction,
        #[arg(long)]
        careful: bool,
        /// Leaf map radius
        #[arg(long, default_value_t = GenerationContext::DEFAULT_RADIUS)]
        radius: i32,
    },
    /// Grow a tree, then record it back into a code
    Record {
        code: String,
        #[arg(long, default_value = "oak")]
        tree: String,
        #[arg(long, default_value = "north")]
        facing: Direction,
        /// Facing the recorded code is stored in
        #[arg(long)]
        record_facing: Option<Direction>,
    },
    /// Generate noise terrain and plant a forest on it
    Forest {
        #[arg(long, default_value = "assets/worldgen.toml")]
        config: PathBuf,
    },
}

const FLAT_ROOT: BlockPos = BlockPos::new(0, 63, 0);

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Decode { code } => {
            let code = JoCode::new(&code);
            let names: Vec<String> = (0..code.len())
                .filter_map(|i| code.instruction_at(i))
                .map(describe)
                .collect();
            println!("{:?}", code.instructions());
            println!("{}", names.join(" "));
        }
        Command::Encode { instructions } => {
            if let Some(bad) = instructions.iter().find(|&&v| v > 7) {
                return Err(format!("instruction {bad} is out of range 0-7").into());
            }
            println!("{}", encode(&instructions));
        }
        Command::Grow {
            code,
            tree,
            facing,
            careful,
            radius,
        } => {
            let (mut world, catalog) = load(args.blocks.as_deref(), args.species.as_deref())?;
            let mut code = JoCode::new(&code).with_careful(careful);
            let outcome = grow(&mut world, &catalog, &tree, &mut code, facing, radius)?;
            println!("{outcome:?}");
            for (name, count) in census(&world, FLAT_ROOT) {
                println!("{name:>16} {count}");
            }
        }
        Command::Record {
            code,
            tree,
            facing,
            record_facing,
        } => {
            let (mut world, catalog) = load(args.blocks.as_deref(), args.species.as_deref())?;
            let mut code = JoCode::new(&code);
            let outcome = grow(&mut world, &catalog, &tree, &mut code, facing, GenerationContext::DEFAULT_RADIUS)?;
            if !outcome.is_generated() {
                return Err(format!("tree did not grow: {outcome:?}").into());
            }
            let facing = record_facing.unwrap_or(DEFAULT_RECORD_FACING);
            let recorded = record_tree(&mut world, FLAT_ROOT, facing).ok_or("no tree on the root")?;
            println!("{recorded}");
        }
        Command::Forest { config } => {
            let cfg = worldgen::load_config_from_path(&config)?;
            let (flat, catalog) = load(args.blocks.as_deref(), args.species.as_deref())?;
            let mut world = MemoryWorld::with_chunk_size(flat.registry_arc(), cfg.chunk_size);
            let catalog = Arc::new(catalog);
            let mut events = EventBus::new();
            let stats = forest::grow_forest(&mut world, &cfg, &catalog, &mut events)?;
            println!("{stats:#?}");
            println!("{:?}", world.stats());
        }
    }
    Ok(())
}

fn describe(instruction: Instruction) -> String {
    match instruction {
        Instruction::Move(dir) => dir.name().to_string(),
        Instruction::Fork => "fork".to_string(),
        Instruction::Return => "return".to_string(),
    }
}

fn load(blocks: Option<&Path>, species: Option<&Path>) -> Result<(MemoryWorld, SpeciesCatalog), Box<dyn Error>> {
    let registry = match blocks {
        Some(p) => BlockRegistry::load_from_path(p)?,
        None => BlockRegistry::builtin()?,
    };
    let catalog = match species {
        Some(p) => SpeciesCatalog::load_from_path(p, &registry)?,
        None => SpeciesCatalog::builtin(&registry)?,
    };
    Ok((MemoryWorld::new(Arc::new(registry)), catalog))
}

fn grow(
    world: &mut MemoryWorld,
    catalog: &SpeciesCatalog,
    tree: &str,
    code: &mut JoCode,
    facing: Direction,
    radius: i32,
) -> Result<GenerationOutcome, Box<dyn Error>> {
    let species = catalog.get(tree).ok_or_else(|| format!("unknown species '{tree}'"))?;
    let dirt = world.registry().block_by_name("dirt").ok_or("block table has no dirt")?;
    let r = radius.max(1);
    world.fill(
        BlockBounds::new(
            FLAT_ROOT + BlockPos::new(-r, -3, -r),
            FLAT_ROOT + BlockPos::new(r, 0, r),
        ),
        dirt,
    );
    let ctx = GenerationContext::new(species, FLAT_ROOT)
        .with_radius(radius)
        .with_facing(facing);
    let report = generate(code, world, &ctx, &mut EventBus::new());
    log::info!("{tree} {}: {:?} after {} attempt(s)", code, report.outcome, report.attempts);
    Ok(report.outcome)
}

/// Block counts above the flat ground, by name.
fn census(world: &MemoryWorld, root: BlockPos) -> BTreeMap<String, usize> {
    let area = BlockBounds::new(root + BlockPos::new(-16, 0, -16), root + BlockPos::new(16, 48, 16));
    let mut counts = BTreeMap::new();
    for (_, block) in world.snapshot_region(area) {
        *counts.entry(world.registry().name_of(block).to_string()).or_insert(0) += 1;
    }
    counts
}
