//! Per-tile grass field state.

use super::blade::{Blade, CollisionTransform};
use super::config::GrassConfig;
use super::generate::scatter_blades;
use crate::terrain::HeightfieldTile;

/// Host-side grass field for one terrain tile.
///
/// Owns the generated blade array and the latest collision transform.
/// GPU copies live in `render::GrassBuffers`; `take_dirty` tells the
/// renderer when the collision uniform needs a refresh.
pub struct GrassField {
    blades: Vec<Blade>,
    offset: (f32, f32),
    size: f32,
    collision: CollisionTransform,
    interactive: bool,
    dirty: bool,
}

impl GrassField {
    /// Scatter a field over `tile`'s footprint
    pub fn generate(config: &GrassConfig, tile: &HeightfieldTile, seed: u64) -> Self {
        Self::from_blades(scatter_blades(config, tile.size(), tile.offset(), seed), tile.offset(), tile.size())
    }

    pub fn from_blades(blades: Vec<Blade>, offset: (f32, f32), size: f32) -> Self {
        Self {
            blades,
            offset,
            size,
            collision: CollisionTransform::default(),
            interactive: false,
            dirty: true,
        }
    }

    pub fn blades(&self) -> &[Blade] {
        &self.blades
    }

    pub fn blades_mut(&mut self) -> &mut [Blade] {
        &mut self.blades
    }

    pub fn blade_count(&self) -> u32 {
        self.blades.len() as u32
    }

    /// Footprint center
    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn collision(&self) -> CollisionTransform {
        self.collision
    }

    /// Overwrite the collision transform. Last write wins.
    pub fn set_collision(&mut self, collision: CollisionTransform) {
        self.collision = collision;
        self.dirty = true;
    }

    /// Change only the collision radius, keeping the center
    pub fn set_collision_radius(&mut self, radius: f32) {
        self.set_collision(self.collision.with_radius(radius));
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Returns true once after each collision change
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
