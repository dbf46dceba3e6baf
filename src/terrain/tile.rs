//! Height-field terrain tile

use bytemuck::{Pod, Zeroable};

use super::relief::ReliefGenerator;

/// Shape tag written into every terrain vertex. Grass blades use their own tag.
pub const TERRAIN_KIND: i32 = 1;

/// Terrain mesh vertex (48 bytes). Must match `VertexInput` in terrain.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub kind: i32,
    pub _pad: [i32; 3],
}

impl TerrainVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Sint32,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One square patch of terrain.
///
/// Vertices form a row-major `(resolution + 1)^2` grid centered on `offset`.
/// Geometry is fixed once built.
#[derive(Clone, Debug)]
pub struct HeightfieldTile {
    size: f32,
    resolution: u32,
    offset: (f32, f32),
    vertices: Vec<TerrainVertex>,
}

impl HeightfieldTile {
    /// Build a tile from row-major heights, `(resolution + 1)^2` of them.
    /// Missing trailing heights read as 0.
    pub fn from_heights(size: f32, resolution: u32, offset: (f32, f32), heights: &[f32]) -> Self {
        let resolution = resolution.max(1);
        let half = size / 2.0;
        let step = size / resolution as f32;
        let stride = resolution + 1;

        let mut vertices = Vec::with_capacity(stride as usize * stride as usize);
        for z in 0..stride {
            for x in 0..stride {
                let index = (z * stride + x) as usize;
                vertices.push(TerrainVertex {
                    position: [
                        -half + x as f32 * step + offset.0,
                        heights.get(index).copied().unwrap_or(0.0),
                        -half + z as f32 * step + offset.1,
                    ],
                    normal: [0.0, 1.0, 0.0],
                    uv: [x as f32 / resolution as f32, z as f32 / resolution as f32],
                    kind: TERRAIN_KIND,
                    _pad: [0; 3],
                });
            }
        }

        Self { size, resolution, offset, vertices }
    }

    /// Build a tile whose vertex heights come from `relief`
    pub fn generate(size: f32, resolution: u32, offset: (f32, f32), relief: &ReliefGenerator) -> Self {
        let resolution = resolution.max(1);
        let half = size / 2.0;
        let step = size / resolution as f32;
        let stride = resolution + 1;

        let heights: Vec<f32> = (0..stride)
            .flat_map(|z| (0..stride).map(move |x| (x, z)))
            .map(|(x, z)| {
                relief.height_at(
                    -half + x as f32 * step + offset.0,
                    -half + z as f32 * step + offset.1,
                )
            })
            .collect();

        Self::from_heights(size, resolution, offset, &heights)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// World-space (x, z) center
    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    /// Stored height of grid vertex `(x, z)`
    pub fn vertex_height(&self, x: u32, z: u32) -> f32 {
        let stride = self.resolution + 1;
        self.vertices[(z.min(self.resolution) * stride + x.min(self.resolution)) as usize].position[1]
    }

    /// Two triangles per cell, `tl, bl, tr, tr, bl, br`
    pub fn indices(&self) -> Vec<u32> {
        let res = self.resolution;
        let mut indices = Vec::with_capacity(res as usize * res as usize * 6);
        for z in 0..res {
            for x in 0..res {
                let top_left = z * (res + 1) + x;
                let top_right = top_left + 1;
                let bottom_left = (z + 1) * (res + 1) + x;
                let bottom_right = bottom_left + 1;
                indices.extend_from_slice(&[
                    top_left, bottom_left, top_right,
                    top_right, bottom_left, bottom_right,
                ]);
            }
        }
        indices
    }

    /// Closed-rectangle containment test against `offset ± size/2`
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let half = self.size / 2.0;
        x >= self.offset.0 - half && x <= self.offset.0 + half
            && z >= self.offset.1 - half && z <= self.offset.1 + half
    }

    /// Bilinear height at world (x, z). Points outside the tile read 0.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        if !self.contains(x, z) {
            return 0.0;
        }

        let half = self.size / 2.0;
        let step = self.size / self.resolution as f32;
        let res = self.resolution as i64;

        let local_x = (x - self.offset.0 + half) / step;
        let local_z = (z - self.offset.1 + half) / step;

        let x0 = (local_x.floor() as i64).clamp(0, res);
        let z0 = (local_z.floor() as i64).clamp(0, res);
        let x1 = (x0 + 1).clamp(0, res);
        let z1 = (z0 + 1).clamp(0, res);

        let tx = local_x - x0 as f32;
        let tz = local_z - z0 as f32;

        let h00 = self.vertex_height(x0 as u32, z0 as u32);
        let h10 = self.vertex_height(x1 as u32, z0 as u32);
        let h01 = self.vertex_height(x0 as u32, z1 as u32);
        let h11 = self.vertex_height(x1 as u32, z1 as u32);

        let h0 = mix(h00, h10, tx);
        let h1 = mix(h01, h11, tx);
        mix(h0, h1, tz)
    }
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 cells, heights increase with x and z
    fn ramp_tile(offset: (f32, f32)) -> HeightfieldTile {
        let heights: Vec<f32> = (0..3)
            .flat_map(|z| (0..3).map(move |x| x as f32 + 10.0 * z as f32))
            .collect();
        HeightfieldTile::from_heights(4.0, 2, offset, &heights)
    }

    #[test]
    fn test_vertex_grid_layout() {
        let tile = ramp_tile((10.0, -5.0));
        assert_eq!(tile.vertices().len(), 9);
        assert_eq!(tile.vertices()[0].position, [8.0, 0.0, -7.0]);
        assert_eq!(tile.vertices()[8].position, [12.0, 22.0, -3.0]);
        assert_eq!(tile.vertices()[4].uv, [0.5, 0.5]);
        assert!(tile.vertices().iter().all(|v| v.normal == [0.0, 1.0, 0.0] && v.kind == TERRAIN_KIND));
    }

    #[test]
    fn test_indices_winding() {
        let tile = ramp_tile((0.0, 0.0));
        let indices = tile.indices();
        assert_eq!(indices.len(), 2 * 2 * 6);
        assert_eq!(&indices[..6], &[0, 3, 1, 1, 3, 4]);
        assert!(indices.iter().all(|&i| (i as usize) < tile.vertices().len()));
    }

    #[test]
    fn test_contains_is_closed() {
        let tile = ramp_tile((10.0, 0.0));
        assert!(tile.contains(8.0, -2.0));
        assert!(tile.contains(12.0, 2.0));
        assert!(!tile.contains(12.01, 0.0));
        assert!(!tile.contains(0.0, 0.0));
    }

    #[test]
    fn test_height_at_vertices_is_exact() {
        let tile = ramp_tile((10.0, -5.0));
        for vertex in tile.vertices() {
            let [x, y, z] = vertex.position;
            assert_eq!(tile.height_at(x, z), y, "vertex at ({}, {})", x, z);
        }
    }

    #[test]
    fn test_height_at_interpolates() {
        let tile = ramp_tile((0.0, 0.0));
        // Center of first cell: mean of 0, 1, 10, 11
        assert!((tile.height_at(-1.0, -1.0) - 5.5).abs() < 1e-5);
        // Halfway along an edge between vertices 1 and 2
        assert!((tile.height_at(1.0, -2.0) - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_height_outside_is_zero() {
        let tile = ramp_tile((0.0, 0.0));
        assert_eq!(tile.height_at(5.0, 0.0), 0.0);
        assert_eq!(tile.height_at(0.0, -100.0), 0.0);
    }

    #[test]
    fn test_generate_flat() {
        let relief = ReliefGenerator::new(Default::default());
        let tile = HeightfieldTile::generate(15.0, 10, (0.0, 0.0), &relief);
        assert_eq!(tile.vertices().len(), 121);
        assert_eq!(tile.height_at(3.3, -2.1), 0.0);
    }

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<TerrainVertex>(), 48);
    }
}
