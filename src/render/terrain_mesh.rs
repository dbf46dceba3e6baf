//! GPU copy of a terrain tile

use super::buffer::GpuBuffer;
use super::renderable::{DrawRecord, Renderable};
use crate::core::Result;
use crate::terrain::HeightfieldTile;

/// Vertex and index buffers of one tile
pub struct TerrainMesh {
    vertices: GpuBuffer,
    indices: GpuBuffer,
    index_count: u32,
}

impl TerrainMesh {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, tile: &HeightfieldTile) -> Result<Self> {
        let indices = tile.indices();
        let vertices = GpuBuffer::with_data_staged(
            device,
            queue,
            "terrain_vertices",
            bytemuck::cast_slice(tile.vertices()),
            wgpu::BufferUsages::VERTEX,
        )?;
        let index_buffer = GpuBuffer::with_data_staged(
            device,
            queue,
            "terrain_indices",
            bytemuck::cast_slice(&indices),
            wgpu::BufferUsages::INDEX,
        )?;

        Ok(Self {
            vertices,
            indices: index_buffer,
            index_count: indices.len() as u32,
        })
    }
}

impl Renderable for TerrainMesh {
    fn vertex_buffer(&self) -> &wgpu::Buffer {
        self.vertices.buffer()
    }

    fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        Some(self.indices.buffer())
    }

    fn draw_record(&self) -> DrawRecord<'_> {
        DrawRecord::Indexed { index_count: self.index_count }
    }
}
