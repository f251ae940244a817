//! World access used by tree generation, plus an in-memory chunked world.
#![forbid(unsafe_code)]

mod biome;
mod level;
mod memory;

pub use biome::{Biome, Precipitation};
pub use level::{DestroyMode, LevelAccess};
pub use memory::{MemoryWorld, WorldStats};
