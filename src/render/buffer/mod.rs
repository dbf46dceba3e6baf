//! GPU buffer management

pub mod gpu_buffer;
pub mod uniform;
pub mod camera_buffer;

pub use gpu_buffer::GpuBuffer;
pub use uniform::UniformBuffer;
pub use camera_buffer::{CameraBuffer, CameraUniform};
