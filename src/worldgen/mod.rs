use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use dyntree_world::{Biome, Precipitation};

/// Forest demo parameters, read from `assets/worldgen.toml`.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i32,
    /// Chunks generated in each direction from the origin chunk.
    #[serde(default = "default_radius_chunks")]
    pub radius_chunks: i32,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub trees: Trees,
    #[serde(default = "default_biome_frequency")]
    pub biome_frequency: f32,
    #[serde(default = "default_biomes")]
    pub biomes: Vec<BiomeDef>,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            chunk_size: default_chunk_size(),
            radius_chunks: default_radius_chunks(),
            terrain: Terrain::default(),
            trees: Trees::default(),
            biome_frequency: default_biome_frequency(),
            biomes: default_biomes(),
        }
    }
}

fn default_seed() -> i32 {
    1337
}
fn default_chunk_size() -> i32 {
    16
}
fn default_radius_chunks() -> i32 {
    2
}
fn default_biome_frequency() -> f32 {
    0.01
}
fn default_biomes() -> Vec<BiomeDef> {
    vec![BiomeDef {
        name: "plains".into(),
        base_temperature: default_temperature(),
        precipitation: Precipitation::Rain,
        species: BTreeMap::from([("oak".to_string(), 1.0)]),
    }]
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_height_freq")]
    pub frequency: f32,
    #[serde(default = "default_min_y")]
    pub min_y: i32,
    #[serde(default = "default_max_y")]
    pub max_y: i32,
    /// Dirt layers between the grass and the stone.
    #[serde(default = "default_soil_depth")]
    pub soil_depth: i32,
}
fn default_height_freq() -> f32 {
    0.03
}
fn default_min_y() -> i32 {
    60
}
fn default_max_y() -> i32 {
    72
}
fn default_soil_depth() -> i32 {
    3
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            frequency: default_height_freq(),
            min_y: default_min_y(),
            max_y: default_max_y(),
            soil_depth: default_soil_depth(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trees {
    /// Grid step between tree candidates; each candidate is jittered inside its cell.
    #[serde(default = "default_spacing")]
    pub spacing: i32,
    #[serde(default = "default_tree_prob")]
    pub probability: f32,
    #[serde(default = "default_leaf_radius")]
    pub leaf_radius: i32,
    #[serde(default = "default_trunk_min")]
    pub trunk_min: i32,
    #[serde(default = "default_trunk_max")]
    pub trunk_max: i32,
    #[serde(default)]
    pub careful: bool,
}
fn default_spacing() -> i32 {
    6
}
fn default_tree_prob() -> f32 {
    0.6
}
fn default_leaf_radius() -> i32 {
    8
}
fn default_trunk_min() -> i32 {
    3
}
fn default_trunk_max() -> i32 {
    6
}
impl Default for Trees {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            probability: default_tree_prob(),
            leaf_radius: default_leaf_radius(),
            trunk_min: default_trunk_min(),
            trunk_max: default_trunk_max(),
            careful: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct BiomeDef {
    pub name: String,
    #[serde(default = "default_temperature")]
    pub base_temperature: f32,
    #[serde(default)]
    pub precipitation: Precipitation,
    /// Species name to relative weight.
    #[serde(default)]
    pub species: BTreeMap<String, f32>,
}
fn default_temperature() -> f32 {
    0.8
}

impl BiomeDef {
    pub fn biome(&self) -> Biome {
        Biome::new(self.name.clone(), self.base_temperature, self.precipitation)
    }

    /// Weighted pick with `r01` in `[0, 1)`; `None` when no species has weight.
    pub fn pick_species(&self, r01: f32) -> Option<&str> {
        let total: f32 = self.species.values().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut target = r01 * total;
        let mut last = None;
        for (name, w) in &self.species {
            if *w <= 0.0 {
                continue;
            }
            last = Some(name.as_str());
            if target < *w {
                return last;
            }
            target -= *w;
        }
        last
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldGenConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    if cfg.biomes.is_empty() {
        return Err("worldgen config needs at least one biome".into());
    }
    if cfg.chunk_size <= 0 || cfg.trees.spacing <= 0 {
        return Err("chunk_size and trees.spacing must be positive".into());
    }
    Ok(cfg)
}
