//! Textures: ground image and depth target

pub mod depth;
pub mod ground;

pub use depth::{DepthTexture, DEPTH_FORMAT};
pub use ground::GroundTexture;
