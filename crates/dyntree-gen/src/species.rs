use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use dyntree_blocks::{Block, BlockId, BlockKind, BlockRegistry};
use dyntree_code::JoCode;
use dyntree_geom::{BlockPos, Direction, SafeBounds};
use dyntree_network::rot::check_for_rot;
use dyntree_network::{CellSolver, Family, LeavesProperties, NodeInflator, NodeInspector, leaf_clusters};
use dyntree_voxmap::SimpleVoxmap;
use dyntree_world::LevelAccess;
use serde::Deserialize;

use crate::{GenFeature, PostGenerationContext};

const BUILTIN_SPECIES: &str = include_str!("../assets/default_species.toml");

/// Species-specific hooks consulted by the generation engine.
pub trait Species {
    fn name(&self) -> &str;

    fn family(&self) -> &Family;

    fn leaves_properties(&self) -> &LeavesProperties;

    /// Added to the cross-section radius of every non-twig branch.
    fn tapering(&self) -> f32 {
        0.3
    }

    fn accepts_soil(&self, registry: &BlockRegistry, block: Block) -> bool {
        matches!(registry.kind_of(block), BlockKind::Soil | BlockKind::RootySoil)
    }

    /// Validates or moves the root. `None` aborts generation with no side effects.
    fn pre_generation(
        &self,
        world: &mut dyn LevelAccess,
        root_pos: BlockPos,
        radius: i32,
        facing: Direction,
        bounds: &SafeBounds,
        code: &JoCode,
    ) -> Option<BlockPos> {
        let _ = (radius, facing, code);
        if !bounds.in_bounds(root_pos, false) {
            return None;
        }
        let reg = world.registry();
        let above = world.block(root_pos.above());
        let free = reg.is_air(above) || reg.is_replaceable(above) || reg.is_leaves(above);
        (free && self.accepts_soil(reg, world.block(root_pos))).then_some(root_pos)
    }

    fn place_rooty_dirt_block(&self, world: &mut dyn LevelAccess, pos: BlockPos, fertility: u16);

    fn node_inflator<'m>(&'m self, map: &'m mut SimpleVoxmap) -> Box<dyn NodeInspector + 'm> {
        Box::new(NodeInflator::new(
            self.family(),
            self.tapering(),
            self.leaves_properties().cluster.as_ref(),
            map,
        ))
    }

    fn world_gen_leaf_map_height(&self) -> usize {
        32
    }

    fn world_gen_age_iterations(&self) -> u32 {
        3
    }

    /// Prunes `ends` that are no longer thin branches and, during world
    /// generation, rots unsupported tips. True when the whole tree is gone.
    fn handle_rot(
        &self,
        world: &mut dyn LevelAccess,
        ends: &mut Vec<BlockPos>,
        root_pos: BlockPos,
        tree_pos: BlockPos,
        bounds: &SafeBounds,
    ) -> bool {
        let _ = root_pos;
        let family = self.family();
        let leaves = self.leaves_properties();
        ends.retain(|&end| {
            let radius = family.radius_of(world.block(end));
            if radius != family.primary_thickness {
                return false;
            }
            !(bounds.is_world_gen() && check_for_rot(world, family, leaves, end, bounds))
        });
        ends.is_empty() && !family.is_same_tree(world.block(tree_pos))
    }

    fn post_generation(&self, world: &mut dyn LevelAccess, ctx: &PostGenerationContext<'_>) {
        let _ = (world, ctx);
    }
}

/// Finds the representative species of a wood family.
pub trait SpeciesLookup {
    fn common_species(&self, family: &str) -> Option<Arc<dyn Species>>;
}

// species.toml entry
#[derive(Deserialize, Debug, Clone)]
pub struct SpeciesConfig {
    pub name: String,
    pub family: String,
    #[serde(default = "default_leaf_cluster")]
    pub leaf_cluster: String,
    #[serde(default = "default_cell_solver")]
    pub cell_solver: String,
    #[serde(default = "default_smother")]
    pub smother_leaves_max: u8,
    #[serde(default = "default_max_hydration")]
    pub max_hydration: u8,
    #[serde(default = "default_primary")]
    pub primary_thickness: u16,
    #[serde(default = "default_secondary")]
    pub secondary_thickness: u16,
    #[serde(default = "default_max_radius")]
    pub max_branch_radius: u16,
    #[serde(default = "default_tapering")]
    pub tapering: f32,
    #[serde(default = "default_leaf_map_height")]
    pub leaf_map_height: usize,
    #[serde(default = "default_age_iterations")]
    pub age_iterations: u32,
    #[serde(default)]
    pub soils: Vec<String>,
    #[serde(default = "default_rooty_block")]
    pub rooty_block: String,
    #[serde(default)]
    pub features: Vec<GenFeature>,
}

fn default_leaf_cluster() -> String {
    "deciduous".into()
}
fn default_cell_solver() -> String {
    "deciduous".into()
}
fn default_smother() -> u8 {
    LeavesProperties::DEFAULT_SMOTHER
}
fn default_max_hydration() -> u8 {
    LeavesProperties::DEFAULT_MAX_HYDRATION
}
fn default_primary() -> u16 {
    Family::DEFAULT_PRIMARY_THICKNESS
}
fn default_secondary() -> u16 {
    Family::DEFAULT_SECONDARY_THICKNESS
}
fn default_max_radius() -> u16 {
    Family::DEFAULT_MAX_BRANCH_RADIUS
}
fn default_tapering() -> f32 {
    0.3
}
fn default_leaf_map_height() -> usize {
    32
}
fn default_age_iterations() -> u32 {
    3
}
fn default_rooty_block() -> String {
    "rooty_dirt".into()
}

#[derive(Deserialize, Debug)]
struct SpeciesFile {
    species: Vec<SpeciesConfig>,
}

/// Data-driven species built from a [`SpeciesConfig`].
#[derive(Clone, Debug)]
pub struct TreeSpecies {
    name: String,
    family: Family,
    leaves: LeavesProperties,
    rooty: Block,
    tapering: f32,
    leaf_map_height: usize,
    age_iterations: u32,
    soils: Vec<BlockId>,
    features: Vec<GenFeature>,
}

impl TreeSpecies {
    pub fn from_config(cfg: &SpeciesConfig, registry: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let family = Family::from_registry(registry, &cfg.family)
            .ok_or_else(|| format!("species '{}': no branch block for family '{}'", cfg.name, cfg.family))?
            .with_thickness(cfg.primary_thickness, cfg.secondary_thickness, cfg.max_branch_radius);
        let mut leaves = LeavesProperties::from_registry(registry, &cfg.family)
            .ok_or_else(|| format!("species '{}': no leaves block for family '{}'", cfg.name, cfg.family))?;
        leaves.smother_leaves_max = cfg.smother_leaves_max;
        leaves.max_hydration = cfg.max_hydration;
        leaves.cluster = match cfg.leaf_cluster.as_str() {
            "none" => None,
            name => Some(
                leaf_clusters::by_name(name)
                    .ok_or_else(|| format!("species '{}': unknown leaf cluster '{name}'", cfg.name))?,
            ),
        };
        leaves.solver = CellSolver::by_name(&cfg.cell_solver)
            .ok_or_else(|| format!("species '{}': unknown cell solver '{}'", cfg.name, cfg.cell_solver))?;
        let rooty = registry
            .block_by_name(&cfg.rooty_block)
            .ok_or_else(|| format!("species '{}': unknown rooty block '{}'", cfg.name, cfg.rooty_block))?;
        let soils = cfg
            .soils
            .iter()
            .map(|s| {
                registry
                    .id_by_name(s)
                    .ok_or_else(|| format!("species '{}': unknown soil '{s}'", cfg.name))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: cfg.name.clone(),
            family,
            leaves,
            rooty,
            tapering: cfg.tapering,
            leaf_map_height: cfg.leaf_map_height.max(1),
            age_iterations: cfg.age_iterations,
            soils,
            features: cfg.features.clone(),
        })
    }

    pub fn features(&self) -> &[GenFeature] {
        &self.features
    }
}

impl Species for TreeSpecies {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> &Family {
        &self.family
    }

    fn leaves_properties(&self) -> &LeavesProperties {
        &self.leaves
    }

    fn tapering(&self) -> f32 {
        self.tapering
    }

    fn accepts_soil(&self, registry: &BlockRegistry, block: Block) -> bool {
        match registry.kind_of(block) {
            BlockKind::RootySoil => true,
            BlockKind::Soil => self.soils.is_empty() || self.soils.contains(&block.id),
            _ => false,
        }
    }

    fn place_rooty_dirt_block(&self, world: &mut dyn LevelAccess, pos: BlockPos, fertility: u16) {
        world.set_block(pos, self.rooty.with_state(fertility));
    }

    fn world_gen_leaf_map_height(&self) -> usize {
        self.leaf_map_height
    }

    fn world_gen_age_iterations(&self) -> u32 {
        self.age_iterations
    }

    fn post_generation(&self, world: &mut dyn LevelAccess, ctx: &PostGenerationContext<'_>) {
        for feature in &self.features {
            feature.post_generation(world, ctx, &self.leaves);
        }
    }
}

/// All configured species, keyed by name. The first species of each family
/// is that family's common species.
#[derive(Default)]
pub struct SpeciesCatalog {
    species: Vec<Arc<TreeSpecies>>,
    by_name: HashMap<String, usize>,
}

impl SpeciesCatalog {
    pub fn builtin(registry: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUILTIN_SPECIES, registry)
    }

    pub fn load_from_path(path: impl AsRef<Path>, registry: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let src = fs::read_to_string(path)?;
        Self::from_toml_str(&src, registry)
    }

    pub fn from_toml_str(src: &str, registry: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let file: SpeciesFile = toml::from_str(src)?;
        let mut catalog = SpeciesCatalog::default();
        for cfg in &file.species {
            if catalog.by_name.contains_key(&cfg.name) {
                return Err(format!("duplicate species '{}'", cfg.name).into());
            }
            let species = TreeSpecies::from_config(cfg, registry)?;
            catalog.by_name.insert(cfg.name.clone(), catalog.species.len());
            catalog.species.push(Arc::new(species));
        }
        log::debug!("loaded {} species", catalog.species.len());
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<Arc<TreeSpecies>> {
        self.by_name.get(name).map(|&i| Arc::clone(&self.species[i]))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.species.iter().map(|s| s.name())
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl SpeciesLookup for SpeciesCatalog {
    fn common_species(&self, family: &str) -> Option<Arc<dyn Species>> {
        self.species
            .iter()
            .find(|s| s.family().name == family)
            .map(|s| Arc::clone(s) as Arc<dyn Species>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BlockRegistry {
        BlockRegistry::builtin().expect("registry")
    }

    #[test]
    fn builtin_catalog_resolves_common_species() {
        let reg = registry();
        let catalog = SpeciesCatalog::builtin(&reg).unwrap();
        assert_eq!(catalog.len(), 4);
        let oak = catalog.common_species("oak").unwrap();
        assert_eq!(oak.name(), "oak");
        assert!(catalog.common_species("maple").is_none());
        let spruce = catalog.get("spruce").unwrap();
        assert_eq!(spruce.features(), &[GenFeature::ConiferTopper]);
        assert_eq!(spruce.world_gen_leaf_map_height(), 40);
    }

    #[test]
    fn soils_limit_where_a_species_roots() {
        let reg = registry();
        let catalog = SpeciesCatalog::builtin(&reg).unwrap();
        let sand = reg.block_by_name("sand").unwrap();
        let rooty = reg.block_by_name("rooty_dirt").unwrap();
        assert!(!catalog.get("oak").unwrap().accepts_soil(&reg, sand));
        assert!(catalog.get("swamp_oak").unwrap().accepts_soil(&reg, sand));
        assert!(catalog.get("oak").unwrap().accepts_soil(&reg, rooty));
    }

    #[test]
    fn bad_configs_are_rejected() {
        let reg = registry();
        let unknown_family = "[[species]]\nname = \"x\"\nfamily = \"maple\"\n";
        assert!(SpeciesCatalog::from_toml_str(unknown_family, &reg).is_err());
        let dup = "[[species]]\nname = \"a\"\nfamily = \"oak\"\n[[species]]\nname = \"a\"\nfamily = \"oak\"\n";
        assert!(SpeciesCatalog::from_toml_str(dup, &reg).is_err());
        let bad_cluster = "[[species]]\nname = \"a\"\nfamily = \"oak\"\nleaf_cluster = \"palm\"\n";
        assert!(SpeciesCatalog::from_toml_str(bad_cluster, &reg).is_err());
    }

    #[test]
    fn clusterless_species_paints_no_leaves() {
        let reg = registry();
        let src = "[[species]]\nname = \"bare\"\nfamily = \"birch\"\nleaf_cluster = \"none\"\n";
        let catalog = SpeciesCatalog::from_toml_str(src, &reg).unwrap();
        assert!(catalog.get("bare").unwrap().leaves_properties().cluster.is_none());
    }
}
