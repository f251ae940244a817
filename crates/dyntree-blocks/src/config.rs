use serde::Deserialize;

use crate::types::BlockKind;

// Top-level blocks config file
#[derive(Deserialize, Debug, Clone)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub kind: BlockKind,
    // Tree family for branch and leaves blocks
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub solid: Option<bool>,
    // Whether generation may overwrite this block (tall grass, flowers)
    #[serde(default)]
    pub replaceable: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
}
