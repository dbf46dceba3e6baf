//! Simulate-and-cull settings and the GPU uniform built from them (144 bytes).

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::core::camera::Camera;
use crate::core::{Error, Result};
use crate::math::Frustum;

/// User-facing physics and culling settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullConfig {
    /// Cull blades whose width axis is within this |cos| of the view direction.
    pub orientation_threshold: f32,
    /// Frustum margin in world units.
    pub frustum_tolerance: f32,
    /// Beyond this horizontal distance every blade is culled.
    pub max_distance: f32,
    /// Number of distance buckets for the soft distance cull.
    pub distance_buckets: u32,
    /// Gravity acceleration magnitude.
    pub gravity: f32,
    /// Wind force scale.
    pub wind_strength: f32,
    /// Spatial frequency of the wind field.
    pub wind_frequency: f32,
}

impl Default for CullConfig {
    fn default() -> Self {
        Self {
            orientation_threshold: 0.9,
            frustum_tolerance: 1.0,
            max_distance: 50.0,
            distance_buckets: 10,
            gravity: 9.8,
            wind_strength: 4.0,
            wind_frequency: 0.5,
        }
    }
}

impl CullConfig {
    pub fn validate(&self) -> Result<()> {
        if self.distance_buckets == 0 {
            return Err(Error::Config("cull distance_buckets must be at least 1".into()));
        }
        if self.max_distance <= 0.0 {
            return Err(Error::Config("cull max_distance must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.orientation_threshold) {
            return Err(Error::Config(format!(
                "cull orientation_threshold must be in [0, 1], got {}",
                self.orientation_threshold
            )));
        }
        Ok(())
    }
}

/// GPU uniform for the simulate-cull kernel. Must match `Params` in simulate_cull.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SimulateParams {
    /// Near, far, left, right, top, bottom as `(normal, distance)`
    pub frustum_planes: [[f32; 4]; 6],
    // -- 96 bytes --
    pub camera_position: [f32; 3],
    pub orientation_threshold: f32,
    // -- 16 bytes --
    pub gravity: f32,
    pub wind_strength: f32,
    pub wind_frequency: f32,
    pub max_distance: f32,
    // -- 16 bytes --
    pub frustum_tolerance: f32,
    pub distance_buckets: u32,
    pub blade_count: u32,
    pub noise_seed: u32,
    // -- 16 bytes --
    // Total: 144 bytes
}

impl SimulateParams {
    pub fn new(config: &CullConfig, camera: &Camera, blade_count: u32, noise_seed: u32) -> Self {
        let frustum = Frustum::from_view_projection(&camera.view_projection());
        Self {
            frustum_planes: frustum.to_gpu(),
            camera_position: camera.position.to_array(),
            orientation_threshold: config.orientation_threshold,
            gravity: config.gravity,
            wind_strength: config.wind_strength,
            wind_frequency: config.wind_frequency,
            max_distance: config.max_distance,
            frustum_tolerance: config.frustum_tolerance,
            distance_buckets: config.distance_buckets.max(1),
            blade_count,
            noise_seed,
        }
    }

    /// Refresh the camera-dependent fields
    pub fn update_camera(&mut self, camera: &Camera) {
        let frustum = Frustum::from_view_projection(&camera.view_projection());
        self.frustum_planes = frustum.to_gpu();
        self.camera_position = camera.position.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_size() {
        assert_eq!(std::mem::size_of::<SimulateParams>(), 144);
        assert_eq!(std::mem::size_of::<SimulateParams>() % 16, 0);
    }

    #[test]
    fn test_params_from_camera() {
        let camera = Camera::default();
        let params = SimulateParams::new(&CullConfig::default(), &camera, 1024, 3);
        assert_eq!(params.camera_position, [0.0, 1.0, 10.0]);
        assert_eq!(params.blade_count, 1024);
        assert_eq!(params.distance_buckets, 10);
    }

    #[test]
    fn test_update_camera_moves_frustum() {
        let mut camera = Camera::default();
        let mut params = SimulateParams::new(&CullConfig::default(), &camera, 16, 0);
        let before = params.frustum_planes;
        camera.position.x += 5.0;
        params.update_camera(&camera);
        assert_ne!(params.frustum_planes, before);
        assert_eq!(params.camera_position[0], 5.0);
    }

    #[test]
    fn test_validate() {
        assert!(CullConfig::default().validate().is_ok());
        let bad = CullConfig { distance_buckets: 0, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
