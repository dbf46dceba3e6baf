//! GPU resources of one grass field

use super::buffer::{GpuBuffer, UniformBuffer};
use super::renderable::{DrawRecord, Renderable};
use crate::core::{Error, Result};
use crate::grass::{CollisionTransform, DrawIndirect, GrassField};

/// Buffers the simulate-cull pass and the grass draw share for one field.
///
/// - `blades`: source array, simulated in place
/// - `culled`: compacted survivors, also the per-instance vertex buffer
/// - `survivors`: `{count, 1, 0, 0}`, reset and incremented by the kernel
/// - `draw_args`: `{strip vertices, count, 0, 0}`, count copied from `survivors`
/// - `readback`: host-visible copy of the survivor count
pub struct GrassBuffers {
    /// Only reached through `bind_group`, owned here so it outlives it
    #[allow(dead_code)]
    blades: GpuBuffer,
    culled: GpuBuffer,
    survivors: GpuBuffer,
    draw_args: GpuBuffer,
    readback: GpuBuffer,
    collision: UniformBuffer<CollisionTransform>,
    blade_count: u32,
    bind_group: wgpu::BindGroup,
}

impl GrassBuffers {
    /// Upload `field` and bind it against the simulate-cull field layout.
    /// The culled array starts as a copy of every blade, so the first frame
    /// draws the unculled set.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        field: &GrassField,
    ) -> Result<Self> {
        let blade_count = field.blade_count();
        let blade_bytes: &[u8] = bytemuck::cast_slice(field.blades());

        let blades = GpuBuffer::with_data_staged(
            device,
            queue,
            "grass_blades",
            blade_bytes,
            wgpu::BufferUsages::STORAGE,
        )?;
        let culled = GpuBuffer::with_data_staged(
            device,
            queue,
            "grass_culled_blades",
            blade_bytes,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::VERTEX,
        )?;
        let survivors = GpuBuffer::with_data_staged(
            device,
            queue,
            "grass_survivors",
            bytemuck::bytes_of(&DrawIndirect::survivors(blade_count)),
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::INDIRECT | wgpu::BufferUsages::COPY_SRC,
        )?;
        let draw_args = GpuBuffer::with_data_staged(
            device,
            queue,
            "grass_draw_args",
            bytemuck::bytes_of(&DrawIndirect::blade_strips(blade_count)),
            wgpu::BufferUsages::INDIRECT,
        )?;
        let readback = GpuBuffer::new(
            device,
            "grass_survivor_readback",
            std::mem::size_of::<u32>() as u64,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        )?;
        let collision = UniformBuffer::new(device, queue, "grass_collision", &field.collision())?;

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("grass_field_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: blades.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: culled.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: survivors.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 3, resource: collision.as_entire_binding() },
            ],
        });

        Ok(Self {
            blades,
            culled,
            survivors,
            draw_args,
            readback,
            collision,
            blade_count,
            bind_group,
        })
    }

    /// Push the field's collision transform if it changed since the last sync
    pub fn sync_collision(&self, queue: &wgpu::Queue, field: &mut GrassField) {
        if field.take_dirty() {
            self.collision.write(queue, &field.collision());
        }
    }

    /// Record a copy of the survivor count into the readback buffer.
    /// Must be encoded after this frame's simulate-cull pass.
    pub fn encode_readback(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_buffer_to_buffer(self.survivors.buffer(), 0, self.readback.buffer(), 0, 4);
    }

    /// Block until the last encoded readback has landed and return the
    /// survivor count it captured
    pub fn read_survivors(&self, device: &wgpu::Device) -> Result<u32> {
        let slice = self.readback.buffer().slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait { submission_index: None, timeout: None })
            .map_err(|e| Error::Gpu(e.to_string()))?;
        rx.recv()
            .map_err(|e| Error::Gpu(e.to_string()))?
            .map_err(|e| Error::Gpu(e.to_string()))?;

        let count = {
            let data = slice.get_mapped_range();
            u32::from_le_bytes([data[0], data[1], data[2], data[3]])
        };
        self.readback.buffer().unmap();
        Ok(count)
    }

    pub fn blade_count(&self) -> u32 {
        self.blade_count
    }

    /// Survivor-count record
    pub fn survivors(&self) -> &wgpu::Buffer {
        self.survivors.buffer()
    }

    /// Instanced strip draw record
    pub fn draw_args(&self) -> &wgpu::Buffer {
        self.draw_args.buffer()
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

impl Renderable for GrassBuffers {
    fn vertex_buffer(&self) -> &wgpu::Buffer {
        self.culled.buffer()
    }

    fn draw_record(&self) -> DrawRecord<'_> {
        DrawRecord::Indirect { args: self.draw_args.buffer(), offset: 0 }
    }
}
