//! Rendering system and GPU interfaces

pub mod buffer;
pub mod context;
pub mod grass_buffers;
pub mod pipeline;
pub mod renderable;
pub mod renderer;
pub mod terrain_mesh;
pub mod texture;

pub use context::GpuContext;
pub use grass_buffers::GrassBuffers;
pub use renderable::{DrawRecord, Renderable};
pub use renderer::Renderer;
pub use terrain_mesh::TerrainMesh;
