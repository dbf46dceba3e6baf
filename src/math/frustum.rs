//! View frustum for blade culling

use crate::core::types::{Vec3, Vec4, Mat4};

/// A plane defined by normal and distance from origin
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Signed distance from point to plane (positive = in front)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Packed as `(normal.xyz, distance)` for GPU upload
    pub fn to_array(&self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.distance]
    }
}

/// View frustum with 6 planes (Near, Far, Left, Right, Top, Bottom)
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix with a [0, 1]
    /// depth range (Gribb/Hartmann).
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let near = Self::normalize_plane(rows[2]);
        let far = Self::normalize_plane(rows[3] - rows[2]);
        let left = Self::normalize_plane(rows[3] + rows[0]);
        let right = Self::normalize_plane(rows[3] - rows[0]);
        let bottom = Self::normalize_plane(rows[3] + rows[1]);
        let top = Self::normalize_plane(rows[3] - rows[1]);

        Self {
            planes: [near, far, left, right, top, bottom],
        }
    }

    fn normalize_plane(plane: Vec4) -> Plane {
        let normal = plane.truncate();
        let len = normal.length();
        if len > 0.0 {
            Plane::new(normal / len, plane.w / len)
        } else {
            Plane::new(Vec3::ZERO, 0.0)
        }
    }

    /// Check if point is inside frustum
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.contains_point_with_margin(point, 0.0)
    }

    /// Check if point is inside the frustum grown by `margin` world units
    /// on every side.
    pub fn contains_point_with_margin(&self, point: Vec3, margin: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= -margin)
    }

    /// Planes packed for the GPU, in the order near, far, left, right, top, bottom
    pub fn to_gpu(&self) -> [[f32; 4]; 6] {
        self.planes.map(|p| p.to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frustum() -> Frustum {
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn test_plane_distance() {
        let plane = Plane::new(Vec3::Y, 0.0);
        assert_eq!(plane.distance_to_point(Vec3::new(0.0, 5.0, 0.0)), 5.0);
        assert_eq!(plane.distance_to_point(Vec3::new(0.0, -3.0, 0.0)), -3.0);
    }

    #[test]
    fn test_frustum_contains_point() {
        let frustum = test_frustum();
        assert!(frustum.contains_point(Vec3::ZERO));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 10.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -200.0)));
    }

    #[test]
    fn test_margin_admits_points_just_outside() {
        let frustum = test_frustum();
        // Half-angle is 30 degrees, so at 5 units away the side plane sits at ~2.89
        let outside = Vec3::new(3.2, 0.0, 0.0);
        assert!(!frustum.contains_point(outside));
        assert!(frustum.contains_point_with_margin(outside, 1.0));
    }

    #[test]
    fn test_planes_are_normalized() {
        for plane in &test_frustum().planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-4);
        }
    }
}
