//! Procedural grass fields.
//!
//! Each terrain tile gets a fixed-size field of Bezier blades. Every frame
//! the simulate-cull pass bends blades under gravity, wind and the
//! interactive collision sphere, then compacts the visible ones into the
//! culled array that the indirect draw consumes.

pub mod blade;
pub mod config;
pub mod field;
pub mod generate;
pub mod params;
pub mod simulate;

pub use blade::{
    Blade, CollisionTransform, DrawIndirect, BLADE_STRIP_VERTICES, GRASS_BLADE_TYPE, NUM_BLADES,
};
pub use config::GrassConfig;
pub use field::GrassField;
pub use generate::scatter_blades;
pub use params::{CullConfig, SimulateParams};
pub use simulate::SimulateCullPass;
