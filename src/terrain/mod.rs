//! Tiled height-field terrain

pub mod config;
pub mod relief;
pub mod tile;
pub mod index;

pub use config::TerrainConfig;
pub use relief::{ReliefGenerator, ReliefParams};
pub use tile::{HeightfieldTile, TerrainVertex, TERRAIN_KIND};
pub use index::TerrainIndex;
