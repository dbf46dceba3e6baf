//! Terrain grid configuration

use serde::{Deserialize, Serialize};

use super::relief::ReliefParams;
use crate::core::{Error, Result};

/// Largest resolution whose `6 * res^2` index list stays addressable by u32
pub const MAX_RESOLUTION: u32 = 26_754;

/// Layout of the terrain tile grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Edge length of one tile in world units
    pub tile_size: f32,
    /// Subdivisions per tile edge
    pub resolution: u32,
    /// Tiles along X
    pub grid_width: u32,
    /// Tiles along Z
    pub grid_height: u32,
    /// Vertex height source
    pub relief: ReliefParams,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            tile_size: 15.0,
            resolution: 100,
            grid_width: 3,
            grid_height: 3,
            relief: ReliefParams::default(),
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.tile_size > 0.0 && self.tile_size.is_finite()) {
            return Err(Error::Config(format!("terrain tile_size must be positive, got {}", self.tile_size)));
        }
        if self.resolution == 0 {
            return Err(Error::Config("terrain resolution must be at least 1".into()));
        }
        if self.resolution > MAX_RESOLUTION {
            return Err(Error::Config(format!(
                "terrain resolution {} exceeds {}, tile indices would not fit in u32",
                self.resolution, MAX_RESOLUTION
            )));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(Error::Config(format!(
                "terrain grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.relief.height_scale < 0.0 {
            return Err(Error::Config("terrain relief height_scale must not be negative".into()));
        }
        if self.relief.height_scale > 0.0 && self.relief.scale <= 0.0 {
            return Err(Error::Config("terrain relief scale must be positive".into()));
        }
        Ok(())
    }

    pub fn tile_count(&self) -> usize {
        (self.grid_width * self.grid_height) as usize
    }

    /// Center of tile `(i, j)`. The grid is centered on the world origin.
    pub fn tile_center(&self, i: u32, j: u32) -> (f32, f32) {
        let start_x = -0.5 * self.grid_width as f32 * self.tile_size;
        let start_z = -0.5 * self.grid_height as f32 * self.tile_size;
        (
            start_x + (i as f32 + 0.5) * self.tile_size,
            start_z + (j as f32 + 0.5) * self.tile_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(TerrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let config = TerrainConfig { resolution: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_resolution_bounded_by_u32_index_count() {
        let largest = TerrainConfig { resolution: MAX_RESOLUTION, ..Default::default() };
        assert!(largest.validate().is_ok());
        let res = MAX_RESOLUTION as u64;
        assert!(6 * res * res <= u32::MAX as u64);
        assert!((res + 1) * (res + 1) <= u32::MAX as u64);

        for resolution in [MAX_RESOLUTION + 1, 65_536, u32::MAX] {
            let config = TerrainConfig { resolution, ..Default::default() };
            assert!(matches!(config.validate(), Err(Error::Config(_))), "resolution {resolution}");
        }
        let next = (MAX_RESOLUTION + 1) as u64;
        assert!(6 * next * next > u32::MAX as u64);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = TerrainConfig { grid_height: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tile_centers_span_origin() {
        let config = TerrainConfig::default();
        assert_eq!(config.tile_center(0, 0), (-15.0, -15.0));
        assert_eq!(config.tile_center(1, 1), (0.0, 0.0));
        assert_eq!(config.tile_center(2, 2), (15.0, 15.0));
    }
}
