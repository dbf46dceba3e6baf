//! Pointer-look camera controller with discrete key movement

use crate::core::camera::Camera;
use glam::Vec3;
use winit::keyboard::KeyCode;

/// Look-around camera controller.
///
/// Pointer drags rotate the view (yaw/pitch in degrees), scrolling moves the
/// camera along its view direction, and each W/A/S/D/Q/E press or repeat
/// steps the camera by a fixed distance.
pub struct LookCameraController {
    /// Degrees of rotation per unit of pointer delta
    pub sensitivity: f32,
    /// World units per scroll notch
    pub zoom_sensitivity: f32,
    /// World units per key press
    pub move_step: f32,
    /// Current yaw in degrees (0 looks down -Z)
    yaw: f32,
    /// Current pitch in degrees
    pitch: f32,
}

impl LookCameraController {
    /// Pitch limit, keeps the view from flipping over the pole
    pub const MAX_PITCH: f32 = 89.0;

    /// Create new controller
    pub fn new(sensitivity: f32, zoom_sensitivity: f32, move_step: f32) -> Self {
        Self {
            sensitivity,
            zoom_sensitivity,
            move_step,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Create a controller whose angles match the camera's current facing
    pub fn from_camera(camera: &Camera) -> Self {
        let mut controller = Self::default();
        let f = camera.forward();
        controller.yaw = (-f.x).atan2(-f.z).to_degrees();
        controller.pitch = f.y.clamp(-1.0, 1.0).asin().to_degrees()
            .clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        controller
    }

    /// Rotate the view by a pointer delta
    pub fn look(&mut self, camera: &mut Camera, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        camera.set_rotation_euler(self.yaw.to_radians(), self.pitch.to_radians());
    }

    /// Move along the view direction by `delta` scroll notches
    pub fn zoom(&self, camera: &mut Camera, delta: f32) {
        camera.position += camera.forward() * delta * self.zoom_sensitivity;
    }

    /// Apply a movement key. Returns false for keys the controller ignores.
    pub fn handle_key(&self, camera: &mut Camera, key: KeyCode) -> bool {
        let step = self.move_step;
        let offset = match key {
            KeyCode::KeyW => camera.forward() * step,
            KeyCode::KeyS => camera.forward() * -step,
            KeyCode::KeyA => camera.right() * -step,
            KeyCode::KeyD => camera.right() * step,
            KeyCode::KeyQ => Vec3::Y * -step,
            KeyCode::KeyE => Vec3::Y * step,
            _ => return false,
        };
        camera.position += offset;
        true
    }

    /// Get current yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Get current pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

impl Default for LookCameraController {
    fn default() -> Self {
        Self::new(0.1, 0.5, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        let mut controller = LookCameraController::from_camera(&camera);
        controller.look(&mut camera, 0.0, 10_000.0);
        assert_eq!(controller.pitch(), LookCameraController::MAX_PITCH);
        assert!(camera.forward().y > 0.99);
    }

    #[test]
    fn test_from_camera_keeps_facing() {
        let mut camera = Camera::default();
        let before = camera.forward();
        let mut controller = LookCameraController::from_camera(&camera);
        controller.look(&mut camera, 0.0, 0.0);
        assert!((camera.forward() - before).length() < 0.001);
    }

    #[test]
    fn test_keys_step_camera() {
        let mut camera = Camera::default();
        let controller = LookCameraController::default();
        let start = camera.position;

        assert!(controller.handle_key(&mut camera, KeyCode::KeyE));
        assert!((camera.position - (start + Vec3::Y)).length() < 0.001);

        assert!(controller.handle_key(&mut camera, KeyCode::KeyW));
        assert!((camera.position.z - (start.z - 1.0)).abs() < 0.001);

        assert!(!controller.handle_key(&mut camera, KeyCode::KeyZ));
    }

    #[test]
    fn test_zoom_moves_along_forward() {
        let mut camera = Camera::default();
        let controller = LookCameraController::default();
        let start = camera.position;
        controller.zoom(&mut camera, 2.0);
        assert!((camera.position - (start + camera.forward())).length() < 0.001);
    }
}
