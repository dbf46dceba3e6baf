//! GPU-shared grass blade records (80 bytes per blade, 16-byte aligned).

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Blades per field. Must be a power of two.
pub const NUM_BLADES: u32 = 1 << 15;
pub const MIN_HEIGHT: f32 = 1.3;
pub const MAX_HEIGHT: f32 = 2.5;
pub const MIN_WIDTH: f32 = 0.1;
pub const MAX_WIDTH: f32 = 0.14;
pub const MIN_BEND: f32 = 7.0;
pub const MAX_BEND: f32 = 13.0;

/// Shape tag for grass draws. Terrain vertices carry `TERRAIN_KIND`.
pub const GRASS_BLADE_TYPE: i32 = 2;

/// Vertices emitted per surviving blade by grass.wgsl (7 segments, triangle strip).
pub const BLADE_STRIP_VERTICES: u32 = 15;

/// One grass blade. Must match `Blade` in simulate_cull.wgsl and the
/// instance attributes of grass.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Blade {
    /// Root position, facing angle in radians
    pub v0: [f32; 4],
    /// Bezier control point, height
    pub v1: [f32; 4],
    /// Physical guide point, width
    pub v2: [f32; 4],
    /// Up vector, stiffness
    pub up: [f32; 4],
    pub blade_type: i32,
    pub _pad: [i32; 3],
}

impl Blade {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x4,
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Sint32,
    ];

    /// Unbent blade rooted at `position`: v1 and v2 both sit at `position + up * height`.
    pub fn new(position: Vec3, direction: f32, height: f32, width: f32, stiffness: f32, up: Vec3) -> Self {
        let tip = position + up * height;
        Self {
            v0: position.extend(direction).to_array(),
            v1: tip.extend(height).to_array(),
            v2: tip.extend(width).to_array(),
            up: up.extend(stiffness).to_array(),
            blade_type: GRASS_BLADE_TYPE,
            _pad: [0; 3],
        }
    }

    /// Per-instance layout: one blade feeds a whole strip.
    pub fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec4::from_array(self.v0).truncate()
    }

    pub fn direction(&self) -> f32 {
        self.v0[3]
    }

    pub fn control_point(&self) -> Vec3 {
        Vec4::from_array(self.v1).truncate()
    }

    pub fn height(&self) -> f32 {
        self.v1[3]
    }

    pub fn guide(&self) -> Vec3 {
        Vec4::from_array(self.v2).truncate()
    }

    pub fn width(&self) -> f32 {
        self.v2[3]
    }

    pub fn up_vector(&self) -> Vec3 {
        Vec4::from_array(self.up).truncate()
    }

    pub fn stiffness(&self) -> f32 {
        self.up[3]
    }

    /// Replace the evolving control points, keeping height and width
    pub fn set_curve(&mut self, v1: Vec3, v2: Vec3) {
        self.v1 = v1.extend(self.v1[3]).to_array();
        self.v2 = v2.extend(self.v2[3]).to_array();
    }
}

/// Indirect draw arguments, `{vertex_count, instance_count, first_vertex, first_instance}`.
/// Layout matches `wgpu::util::DrawIndirectArgs`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndirect {
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

impl DrawIndirect {
    /// Survivor-count record: `vertex_count` is the number of culled blades.
    pub fn survivors(count: u32) -> Self {
        Self { vertex_count: count, instance_count: 1, first_vertex: 0, first_instance: 0 }
    }

    /// Instanced strip draw over `count` culled blades.
    pub fn blade_strips(count: u32) -> Self {
        Self {
            vertex_count: BLADE_STRIP_VERTICES,
            instance_count: count,
            first_vertex: 0,
            first_instance: 0,
        }
    }
}

/// Interactive deformation sphere: world position and radius.
/// Radius 0 disables collision. Must match `Collision` in simulate_cull.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CollisionTransform {
    pub center: [f32; 3],
    pub radius: f32,
}

impl CollisionTransform {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center: center.to_array(), radius }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.center)
    }

    pub fn with_radius(self, radius: f32) -> Self {
        Self { radius, ..self }
    }

    pub fn is_active(&self) -> bool {
        self.radius > 0.0
    }
}
