//! Meadow - GPU-simulated interactive grass over tiled terrain

pub mod core;
pub mod math;
pub mod terrain;
pub mod grass;
pub mod interaction;
pub mod scene;
pub mod render;
