//! GPU uniform buffer for camera data

use bytemuck::{Pod, Zeroable};

use super::uniform::UniformBuffer;
use crate::core::camera::Camera;
use crate::core::Result;

/// Camera uniform data for GPU (must match `Camera` in grass.wgsl and terrain.wgsl)
/// WGSL vec3 has 16-byte alignment, so we need explicit padding
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// View-projection matrix (64 bytes, offset 0)
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space (12 bytes, offset 64)
    pub position: [f32; 3],
    /// Padding after position for vec3 alignment (4 bytes, offset 76)
    pub _pos_pad: f32,
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: camera.position.to_array(),
            _pos_pad: 0.0,
        }
    }
}

/// GPU buffer for camera uniform
pub struct CameraBuffer {
    /// Uniform buffer
    uniform: UniformBuffer<CameraUniform>,
    /// Bind group layout
    bind_group_layout: wgpu::BindGroupLayout,
    /// Bind group
    bind_group: wgpu::BindGroup,
}

impl CameraBuffer {
    /// Create new camera buffer
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, camera: &Camera) -> Result<Self> {
        let uniform = UniformBuffer::new(device, queue, "camera_uniform", &CameraUniform::from_camera(camera))?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        Ok(Self {
            uniform,
            bind_group_layout,
            bind_group,
        })
    }

    /// Update buffer with camera data
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera) {
        self.uniform.write(queue, &CameraUniform::from_camera(camera));
    }

    /// Get bind group layout
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Get bind group
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
