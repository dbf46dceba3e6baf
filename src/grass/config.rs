//! Grass field generation settings.

use serde::{Deserialize, Serialize};

use super::blade::{
    GRASS_BLADE_TYPE, MAX_BEND, MAX_HEIGHT, MAX_WIDTH, MIN_BEND, MIN_HEIGHT, MIN_WIDTH, NUM_BLADES,
};
use crate::core::{Error, Result};

/// Blade population and attribute ranges for one field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    /// Blades per field (power of two).
    pub blade_count: u32,
    pub min_height: f32,
    pub max_height: f32,
    pub min_width: f32,
    pub max_width: f32,
    /// Stiffness range.
    pub min_bend: f32,
    pub max_bend: f32,
    /// Shape tag written to every blade.
    pub blade_type: i32,
    /// Placement noise is sampled at `(x, z) * noise_scale`.
    pub noise_scale: f32,
    /// Placement noise is scaled by this to get the root height.
    pub noise_height: f32,
    /// Base seed; each tile adds its index.
    pub seed: u64,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            blade_count: NUM_BLADES,
            min_height: MIN_HEIGHT,
            max_height: MAX_HEIGHT,
            min_width: MIN_WIDTH,
            max_width: MAX_WIDTH,
            min_bend: MIN_BEND,
            max_bend: MAX_BEND,
            blade_type: GRASS_BLADE_TYPE,
            noise_scale: 0.5,
            noise_height: 2.0,
            seed: 0x6d65_6164,
        }
    }
}

impl GrassConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.blade_count.is_power_of_two() {
            return Err(Error::Config(format!(
                "grass blade_count must be a power of two, got {}",
                self.blade_count
            )));
        }
        for (name, min, max) in [
            ("height", self.min_height, self.max_height),
            ("width", self.min_width, self.max_width),
            ("bend", self.min_bend, self.max_bend),
        ] {
            if !(min >= 0.0 && min <= max) {
                return Err(Error::Config(format!(
                    "grass {} range [{}, {}] is invalid",
                    name, min, max
                )));
            }
        }
        if self.min_height <= 0.0 {
            return Err(Error::Config("grass min_height must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = GrassConfig::default();
        assert_eq!(cfg.blade_count, 32768);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let cfg = GrassConfig { blade_count: 1000, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let cfg = GrassConfig { min_width: 0.2, max_width: 0.1, ..Default::default() };
        assert!(cfg.validate().is_err());
    }
}
