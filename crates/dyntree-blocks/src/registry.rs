use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig};
use super::types::{Block, BlockId, BlockKind};

const BUILTIN_BLOCKS: &str = include_str!("../assets/default_blocks.toml");

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub kind: BlockKind,
    pub family: Option<String>,
    pub solid: bool,
    pub replaceable: bool,
    pub tags: Vec<String>,
}

impl BlockType {
    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry built from the block table compiled into the crate.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUILTIN_BLOCKS)
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(&blocks_toml)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(src)?;
        Self::from_configs(cfg)
    }

    /// Ids are positional unless given; `air` must come first so `Block::AIR` stays id 0.
    pub fn from_configs(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        for def in cfg.blocks.into_iter() {
            let BlockDef {
                name,
                id,
                kind,
                family,
                solid,
                replaceable,
                tags,
            } = def;
            let expected = reg.blocks.len() as u16;
            let id = id.unwrap_or(expected);
            if id != expected {
                return Err(format!("block '{name}' has id {id}, expected {expected}").into());
            }
            if reg.by_name.contains_key(&name) {
                return Err(format!("duplicate block name '{name}'").into());
            }
            if id == 0 && kind != BlockKind::Air {
                return Err(format!("block id 0 must be air, found '{name}'").into());
            }
            let solid = solid.unwrap_or(matches!(
                kind,
                BlockKind::Solid | BlockKind::Soil | BlockKind::RootySoil | BlockKind::Branch
            ));
            let replaceable = replaceable.unwrap_or(matches!(kind, BlockKind::Air | BlockKind::Plant));
            if matches!(kind, BlockKind::Branch | BlockKind::Leaves) && family.is_none() {
                return Err(format!("block '{name}' is {kind:?} but names no family").into());
            }
            reg.by_name.insert(name.clone(), id);
            reg.blocks.push(BlockType {
                id,
                name,
                kind,
                family,
                solid,
                replaceable,
                tags,
            });
        }
        if reg.blocks.is_empty() {
            return Err("block table is empty".into());
        }
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::new)
    }

    pub fn name_of(&self, block: Block) -> &str {
        self.get(block.id).map(|t| t.name.as_str()).unwrap_or("unknown")
    }

    /// Unknown ids behave as solid stone-like blocks.
    #[inline]
    pub fn kind_of(&self, block: Block) -> BlockKind {
        self.get(block.id).map(|t| t.kind).unwrap_or_default()
    }

    #[inline]
    pub fn is_air(&self, block: Block) -> bool {
        self.kind_of(block) == BlockKind::Air
    }

    #[inline]
    pub fn is_branch(&self, block: Block) -> bool {
        self.kind_of(block) == BlockKind::Branch
    }

    #[inline]
    pub fn is_leaves(&self, block: Block) -> bool {
        self.kind_of(block) == BlockKind::Leaves
    }

    #[inline]
    pub fn is_rooty(&self, block: Block) -> bool {
        self.kind_of(block) == BlockKind::RootySoil
    }

    #[inline]
    pub fn is_liquid(&self, block: Block) -> bool {
        self.kind_of(block) == BlockKind::Liquid
    }

    pub fn is_solid(&self, block: Block) -> bool {
        self.get(block.id).is_none_or(|t| t.solid)
    }

    pub fn is_replaceable(&self, block: Block) -> bool {
        self.get(block.id).is_some_and(|t| t.replaceable)
    }

    pub fn has_tag(&self, block: Block, tag: &str) -> bool {
        self.get(block.id).is_some_and(|t| t.has_tag(tag))
    }

    pub fn family_of(&self, block: Block) -> Option<&str> {
        self.get(block.id).and_then(|t| t.family.as_deref())
    }

    /// First block of `kind` belonging to `family`.
    pub fn find_family_block(&self, family: &str, kind: BlockKind) -> Option<Block> {
        self.blocks
            .iter()
            .find(|t| t.kind == kind && t.family.as_deref() == Some(family))
            .map(|t| Block::new(t.id))
    }
}
