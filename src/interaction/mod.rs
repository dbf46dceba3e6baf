//! Pointer-driven grass deformation.
//!
//! A pointer position becomes a world ray, the ray is marched against the
//! terrain index, and the hit becomes the collision sphere of every
//! interactive grass field.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::camera::Camera;
use crate::core::{Error, Result};
use crate::grass::{CollisionTransform, GrassField};
use crate::math::Ray;
use crate::terrain::TerrainIndex;

/// Raycast and collision-radius settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// March step along the ray in world units
    pub step: f32,
    /// March limit in world units
    pub max_distance: f32,
    /// Starting base radius
    pub base_radius: f32,
    /// Collision radius = base radius * radius_scale
    pub radius_scale: f32,
    /// Base radius change per scroll notch
    pub scroll_sensitivity: f32,
    /// Lower bound for the base radius
    pub min_base_radius: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            max_distance: 10_000.0,
            base_radius: 0.5,
            radius_scale: 2.5,
            scroll_sensitivity: 0.1,
            min_base_radius: 0.0,
        }
    }
}

impl InteractionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.step <= 0.0 {
            return Err(Error::Config(format!("interaction step must be positive, got {}", self.step)));
        }
        if self.max_distance < self.step {
            return Err(Error::Config("interaction max_distance must be at least one step".into()));
        }
        if self.min_base_radius < 0.0 || self.base_radius < self.min_base_radius {
            return Err(Error::Config(format!(
                "interaction base_radius {} must be at least min_base_radius {}",
                self.base_radius, self.min_base_radius
            )));
        }
        Ok(())
    }
}

/// Maps pointer input to collision transforms.
pub struct InteractionController {
    config: InteractionConfig,
    base_radius: f32,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        let base_radius = config.base_radius;
        Self { config, base_radius }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Collision radius written on the next hit
    pub fn radius(&self) -> f32 {
        self.base_radius * self.config.radius_scale
    }

    /// March `ray` against the terrain. Returns `(x, terrain height, z)` at
    /// the first sample at or below the surface.
    pub fn raycast(&self, ray: &Ray, terrain: &TerrainIndex) -> Option<Vec3> {
        ray.march(self.config.step, self.config.max_distance)
            .find_map(|point| {
                let ground = terrain.height_at(point.x, point.z);
                (point.y <= ground).then(|| Vec3::new(point.x, ground, point.z))
            })
    }

    /// Cast through a window-space pointer position and, on a hit, move the
    /// collision sphere of every interactive field there. A miss leaves all
    /// fields untouched.
    pub fn pointer_pick(
        &self,
        camera: &Camera,
        pointer: (f32, f32),
        viewport: (f32, f32),
        terrain: &TerrainIndex,
        fields: &mut [GrassField],
    ) -> Option<CollisionTransform> {
        let ray = camera.screen_ray(pointer.0, pointer.1, viewport.0, viewport.1);
        let hit = self.raycast(&ray, terrain)?;
        let collision = CollisionTransform::new(hit, self.radius());

        for field in fields.iter_mut().filter(|f| f.is_interactive()) {
            field.set_collision(collision);
        }
        log::debug!("Collision moved to ({:.2}, {:.2}, {:.2}) r={:.2}", hit.x, hit.y, hit.z, collision.radius);
        Some(collision)
    }

    /// Grow or shrink the radius by `delta` scroll notches. Only the radius
    /// of each interactive field's collision changes. Returns the new radius.
    pub fn resize(&mut self, delta: f32, fields: &mut [GrassField]) -> f32 {
        self.base_radius = (self.base_radius + delta * self.config.scroll_sensitivity)
            .max(self.config.min_base_radius);
        let radius = self.radius();

        for field in fields.iter_mut().filter(|f| f.is_interactive()) {
            field.set_collision_radius(radius);
        }
        log::debug!("Collision radius set to {:.2}", radius);
        radius
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}
