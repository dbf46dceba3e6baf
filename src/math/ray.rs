//! Ray type and operations

use crate::core::types::Vec3;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Sample points from the origin outward every `step` units, stopping
    /// before `max_distance`.
    pub fn march(&self, step: f32, max_distance: f32) -> impl Iterator<Item = Vec3> + '_ {
        let steps = if step > 0.0 && max_distance > 0.0 {
            (max_distance / step).ceil() as usize
        } else {
            0
        };
        (0..steps).map(move |i| self.at(i as f32 * step))
    }
}
