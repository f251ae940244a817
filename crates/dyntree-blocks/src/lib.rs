//! Block ids, block kinds, and the name-keyed registry loaded from TOML.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{BlockRegistry, BlockType};
pub use types::{Block, BlockId, BlockKind, BlockState};
