//! Scene assembly: terrain tiles plus one grass field per tile

pub mod config;
pub mod manager;

pub use config::SceneConfig;
pub use manager::Scene;
