//! Terrain tile collection and world height queries

use super::config::TerrainConfig;
use super::relief::ReliefGenerator;
use super::tile::HeightfieldTile;

/// Grid of height-field tiles covering a rectangle centered on the origin.
pub struct TerrainIndex {
    tiles: Vec<HeightfieldTile>,
    grid_width: u32,
    grid_height: u32,
}

impl TerrainIndex {
    /// Build every tile of the grid, row by row (`j` outer, `i` inner).
    pub fn build(config: &TerrainConfig) -> Self {
        let relief = ReliefGenerator::new(config.relief.clone());
        let mut tiles = Vec::with_capacity(config.tile_count());

        for j in 0..config.grid_height {
            for i in 0..config.grid_width {
                let offset = config.tile_center(i, j);
                tiles.push(HeightfieldTile::generate(config.tile_size, config.resolution, offset, &relief));
            }
        }

        log::debug!(
            "Built terrain index: {}x{} tiles of size {} (resolution {})",
            config.grid_width, config.grid_height, config.tile_size, config.resolution
        );

        Self {
            tiles,
            grid_width: config.grid_width,
            grid_height: config.grid_height,
        }
    }

    /// Wrap tiles that were built elsewhere. Queries scan them in the given order.
    pub fn from_tiles(tiles: Vec<HeightfieldTile>) -> Self {
        let count = tiles.len() as u32;
        Self { tiles, grid_width: count, grid_height: 1 }
    }

    pub fn tiles(&self) -> &[HeightfieldTile] {
        &self.tiles
    }

    pub fn grid_size(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    /// Tile at grid coordinates `(i, j)`
    pub fn tile(&self, i: u32, j: u32) -> Option<&HeightfieldTile> {
        if i >= self.grid_width || j >= self.grid_height {
            return None;
        }
        self.tiles.get((j * self.grid_width + i) as usize)
    }

    /// Index of the first tile containing `(x, z)`
    pub fn tile_index_at(&self, x: f32, z: f32) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.contains(x, z))
    }

    /// First tile containing `(x, z)`
    pub fn tile_at(&self, x: f32, z: f32) -> Option<&HeightfieldTile> {
        self.tile_index_at(x, z).map(|i| &self.tiles[i])
    }

    /// Terrain height at `(x, z)`, or 0 outside the covered region
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.tile_at(x, z).map_or(0.0, |tile| tile.height_at(x, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::relief::ReliefParams;

    fn small_config() -> TerrainConfig {
        TerrainConfig { resolution: 10, ..Default::default() }
    }

    #[test]
    fn test_build_grid() {
        let index = TerrainIndex::build(&small_config());
        assert_eq!(index.tiles().len(), 9);
        assert_eq!(index.grid_size(), (3, 3));
        assert_eq!(index.tile(1, 1).map(|t| t.offset()), Some((0.0, 0.0)));
        assert!(index.tile(3, 0).is_none());
    }

    #[test]
    fn test_origin_resolves_to_center_tile() {
        let index = TerrainIndex::build(&small_config());
        assert_eq!(index.tile_index_at(0.0, 0.0), Some(4));
    }

    #[test]
    fn test_outside_region_falls_back_to_zero() {
        let index = TerrainIndex::build(&TerrainConfig {
            relief: ReliefParams { height_scale: 5.0, ..Default::default() },
            ..small_config()
        });
        assert!(index.tile_at(22.6, 0.0).is_none());
        assert_eq!(index.height_at(22.6, 0.0), 0.0);
        assert_eq!(index.height_at(-1000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_shared_edge_first_match_wins() {
        let index = TerrainIndex::build(&small_config());
        // x = 7.5 lies on the edge between tiles (1, 1) and (2, 1)
        assert_eq!(index.tile_index_at(7.5, 0.0), Some(4));
    }

    #[test]
    fn test_height_matches_owning_tile() {
        let index = TerrainIndex::build(&TerrainConfig {
            relief: ReliefParams { height_scale: 5.0, ..Default::default() },
            ..small_config()
        });
        for (x, z) in [(0.3, -1.2), (13.7, 11.1), (-20.0, 4.4), (5.0, -17.9)] {
            let tile = index.tile_at(x, z).expect("point inside grid");
            assert_eq!(index.height_at(x, z), tile.height_at(x, z));
        }
    }

    #[test]
    fn test_from_tiles_scans_in_order() {
        let a = HeightfieldTile::from_heights(2.0, 1, (0.0, 0.0), &[1.0; 4]);
        let b = HeightfieldTile::from_heights(2.0, 1, (0.5, 0.0), &[2.0; 4]);
        let index = TerrainIndex::from_tiles(vec![a, b]);
        assert_eq!(index.height_at(0.75, 0.0), 1.0);
        assert_eq!(index.height_at(1.25, 0.0), 2.0);
    }
}
