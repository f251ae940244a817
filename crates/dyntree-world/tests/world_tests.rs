use std::sync::Arc;

use dyntree_blocks::BlockRegistry;
use dyntree_geom::{BlockBounds, BlockPos};
use dyntree_world::{Biome, LevelAccess, MemoryWorld, Precipitation};

fn make_world() -> MemoryWorld {
    MemoryWorld::new(Arc::new(BlockRegistry::builtin().expect("registry")))
}

#[test]
fn fill_and_surface() {
    let mut w = make_world();
    let dirt = w.registry().block_by_name("dirt").unwrap();
    w.fill(
        BlockBounds::new(BlockPos::new(-4, 0, -4), BlockPos::new(4, 3, 4)),
        dirt,
    );
    assert_eq!(w.surface_y(0, 0, -16, 64), Some(3));
    assert_eq!(w.surface_y(5, 0, -16, 64), None);
    let snap = w.snapshot_region(BlockBounds::new(BlockPos::new(0, 3, 0), BlockPos::new(1, 3, 1)));
    assert_eq!(snap.len(), 4);
    assert!(snap.windows(2).all(|p| (p[0].0.z, p[0].0.x) < (p[1].0.z, p[1].0.x)));
}

#[test]
fn chunk_biomes_override_default() {
    let mut w = make_world();
    let taiga = Biome::new("taiga", 0.1, Precipitation::Rain);
    w.set_chunk_biome(1, 0, taiga.clone());
    assert_eq!(w.biome_at(BlockPos::new(16, 64, 0)), &taiga);
    assert_eq!(w.biome_at(BlockPos::new(15, 64, 0)).name, "plains");
}

#[test]
fn biome_parses_from_toml() {
    let b: Biome = toml::from_str("name = \"desert\"\nbase_temperature = 2.0\nprecipitation = \"none\"").unwrap();
    assert_eq!(b.precipitation, Precipitation::None);
    let d: Biome = toml::from_str("name = \"meadow\"").unwrap();
    assert_eq!(d.base_temperature, 0.8);
    assert_eq!(d.precipitation, Precipitation::Rain);
}
