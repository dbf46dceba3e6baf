//! Compute pipeline that simulates grass blades and compacts the visible ones

use crate::core::time::TimeUniform;
use crate::core::Result;
use crate::grass::SimulateParams;
use crate::render::buffer::UniformBuffer;
use crate::render::grass_buffers::GrassBuffers;

/// Threads per workgroup, must match `@workgroup_size` in simulate_cull.wgsl
pub const WORKGROUP_SIZE: u32 = 256;

/// Workgroups needed to cover `blade_count` blades
pub fn workgroup_count(blade_count: u32) -> u32 {
    blade_count.div_ceil(WORKGROUP_SIZE)
}

/// Simulate-cull pipeline.
///
/// Group 0 holds the frame-wide params and time uniforms, group 1 the
/// per-field buffers (see [`GrassBuffers`]).
pub struct SimulateCullPipeline {
    pipeline: wgpu::ComputePipeline,
    field_layout: wgpu::BindGroupLayout,
    frame_bind_group: wgpu::BindGroup,
    params: UniformBuffer<SimulateParams>,
    time: UniformBuffer<TimeUniform>,
}

impl SimulateCullPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        params: &SimulateParams,
        time: &TimeUniform,
    ) -> Result<Self> {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("simulate_cull_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/simulate_cull.wgsl").into()),
        });

        let params_buffer = UniformBuffer::new(device, queue, "simulate_params", params)?;
        let time_buffer = UniformBuffer::new(device, queue, "simulate_time", time)?;

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("simulate_frame_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let field_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("simulate_field_layout"),
            entries: &[
                storage_entry(0),
                storage_entry(1),
                storage_entry(2),
                uniform_entry(3),
            ],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("simulate_frame_bind_group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: time_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("simulate_cull_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &field_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("simulate_cull_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            pipeline,
            field_layout,
            frame_bind_group,
            params: params_buffer,
            time: time_buffer,
        })
    }

    /// Layout every field's bind group is created against
    pub fn field_layout(&self) -> &wgpu::BindGroupLayout {
        &self.field_layout
    }

    /// Upload this frame's params and time
    pub fn update(&self, queue: &wgpu::Queue, params: &SimulateParams, time: &TimeUniform) {
        self.params.write(queue, params);
        self.time.write(queue, time);
    }

    /// Record one field's pass: reset the survivor count, simulate and cull,
    /// then copy the count into the instance slot of the draw record.
    ///
    /// The params uniform is shared by all fields, so fields encoded in the
    /// same frame must have the same blade count.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, field: &GrassBuffers) {
        encoder.clear_buffer(field.survivors(), 0, Some(4));

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("simulate_cull_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(1, field.bind_group(), &[]);
            pass.dispatch_workgroups(workgroup_count(field.blade_count()), 1, 1);
        }

        // survivors.vertex_count -> draw_args.instance_count
        encoder.copy_buffer_to_buffer(field.survivors(), 0, field.draw_args(), 4, 4);
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
