//! Render and compute pipelines

pub mod grass;
pub mod simulate_cull;
pub mod terrain;

pub use grass::GrassPipeline;
pub use simulate_cull::{SimulateCullPipeline, WORKGROUP_SIZE};
pub use terrain::TerrainPipeline;
