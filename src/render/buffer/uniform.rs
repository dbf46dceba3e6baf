//! Typed uniform buffers

use std::marker::PhantomData;

use bytemuck::Pod;

use super::gpu_buffer::GpuBuffer;
use crate::core::Result;

/// Uniform buffer holding exactly one `T`.
///
/// `write` replaces the whole value through the queue, so a reader sees
/// either the previous value or the new one. Writes from several threads
/// must be serialized by the caller.
pub struct UniformBuffer<T: Pod> {
    buffer: GpuBuffer,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, value: &T) -> Result<Self> {
        let buffer = GpuBuffer::new(
            device,
            label,
            std::mem::size_of::<T>() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )?;
        buffer.write(queue, 0, bytemuck::bytes_of(value));
        Ok(Self { buffer, _marker: PhantomData })
    }

    /// Full overwrite of the stored value
    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        self.buffer.write(queue, 0, bytemuck::bytes_of(value));
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        self.buffer.buffer()
    }

    pub fn as_entire_binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}
