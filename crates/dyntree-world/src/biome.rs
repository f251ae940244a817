use dyntree_geom::BlockPos;
use serde::{Deserialize, Serialize};

/// Altitude above which temperature starts to fall.
const LAPSE_START_Y: i32 = 80;
const LAPSE_PER_BLOCK: f32 = 0.05 / 30.0;
const SNOW_TEMPERATURE: f32 = 0.15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precipitation {
    None,
    #[default]
    Rain,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Biome {
    pub name: String,
    #[serde(default = "default_temperature")]
    pub base_temperature: f32,
    #[serde(default)]
    pub precipitation: Precipitation,
}

fn default_temperature() -> f32 {
    0.8
}

impl Default for Biome {
    fn default() -> Self {
        Self {
            name: "plains".into(),
            base_temperature: default_temperature(),
            precipitation: Precipitation::Rain,
        }
    }
}

impl Biome {
    pub fn new(name: impl Into<String>, base_temperature: f32, precipitation: Precipitation) -> Self {
        Self {
            name: name.into(),
            base_temperature,
            precipitation,
        }
    }

    pub fn temperature_at(&self, pos: BlockPos) -> f32 {
        if pos.y > LAPSE_START_Y {
            self.base_temperature - (pos.y - LAPSE_START_Y) as f32 * LAPSE_PER_BLOCK
        } else {
            self.base_temperature
        }
    }

    /// Precipitation at `pos` falls as snow.
    pub fn should_snow(&self, pos: BlockPos) -> bool {
        self.precipitation != Precipitation::None && self.temperature_at(pos) < SNOW_TEMPERATURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_falls_with_altitude() {
        let b = Biome::new("hills", 0.2, Precipitation::Rain);
        assert_eq!(b.temperature_at(BlockPos::new(0, 64, 0)), 0.2);
        assert!(!b.should_snow(BlockPos::new(0, 64, 0)));
        // 0.2 - 60 * 0.05/30 = 0.1
        assert!(b.should_snow(BlockPos::new(0, 140, 0)));
    }

    #[test]
    fn dry_biomes_never_snow() {
        let b = Biome::new("frozen_desert", -0.5, Precipitation::None);
        assert!(!b.should_snow(BlockPos::new(0, 64, 0)));
    }
}
