//! Owned GPU buffer with staged uploads

use crate::core::{Error, Result};

/// A `wgpu::Buffer` that is destroyed when dropped.
///
/// Every constructor validates the requested size against the device limits
/// and returns `Error::Gpu` instead of letting allocation fail on the device.
/// Buffers created earlier in a failing constructor are released by their
/// own `Drop` on the error path.
pub struct GpuBuffer {
    buffer: wgpu::Buffer,
}

impl GpuBuffer {
    /// Allocate an uninitialized buffer
    pub fn new(device: &wgpu::Device, label: &str, size: u64, usage: wgpu::BufferUsages) -> Result<Self> {
        let size = Self::checked_size(device, label, size)?;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        });
        Ok(Self { buffer })
    }

    /// Allocate a device-local buffer and fill it through a temporary
    /// host-visible staging buffer and a device-side copy.
    pub fn with_data_staged(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        data: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Result<Self> {
        let size = Self::checked_size(device, label, data.len() as u64)?;

        let staging = {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label}_staging")),
                size,
                usage: wgpu::BufferUsages::MAP_WRITE | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: true,
            });
            buffer.slice(..).get_mapped_range_mut()[..data.len()].copy_from_slice(data);
            buffer.unmap();
            Self { buffer }
        };

        let target = Self::new(device, label, size, usage | wgpu::BufferUsages::COPY_DST)?;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("staged_upload"),
        });
        encoder.copy_buffer_to_buffer(&staging.buffer, 0, &target.buffer, 0, size);
        queue.submit(std::iter::once(encoder.finish()));

        Ok(target)
    }

    fn checked_size(device: &wgpu::Device, label: &str, size: u64) -> Result<u64> {
        if size == 0 {
            return Err(Error::Gpu(format!("Buffer '{label}' has zero size")));
        }
        let max = device.limits().max_buffer_size;
        if size > max {
            return Err(Error::Gpu(format!(
                "Buffer '{label}' needs {size} bytes, device allows {max}"
            )));
        }
        Ok(size.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT))
    }

    /// Overwrite part of the buffer through the queue
    pub fn write(&self, queue: &wgpu::Queue, offset: u64, data: &[u8]) {
        queue.write_buffer(&self.buffer, offset, data);
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn as_entire_binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

impl Drop for GpuBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}
