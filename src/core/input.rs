//! Pointer and keyboard input state
//!
//! Owned by the frame driver. Raw window events are folded into this state
//! and translated into [`InputAction`]s that the camera controller and the
//! interaction controller consume.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Scale applied to cursor deltas before they reach the camera
pub const POINTER_SENSITIVITY: f32 = 0.5;

/// Pixels per scroll "line" for touchpads reporting pixel deltas
const PIXELS_PER_SCROLL_LINE: f32 = 40.0;

/// What a processed event asks the application to do
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputAction {
    /// Rotate the view by a scaled pointer delta (left button held)
    Look { dx: f32, dy: f32 },
    /// Cast a ray through this window-space cursor position (right button held)
    Pick { x: f32, y: f32 },
    /// Grow or shrink the collision radius (middle button held while scrolling)
    ResizeCollision { delta: f32 },
    /// Move the camera along its view direction
    Zoom { delta: f32 },
    /// A key was pressed or auto-repeated
    Key(KeyCode),
}

/// Tracks pointer buttons and cursor position
pub struct InputState {
    /// Currently pressed mouse buttons
    mouse_buttons: HashSet<MouseButton>,
    /// Cursor position at the previous motion event (or button press)
    previous_position: (f32, f32),
    /// Latest cursor position
    mouse_position: (f32, f32),
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self {
            mouse_buttons: HashSet::new(),
            previous_position: (0.0, 0.0),
            mouse_position: (0.0, 0.0),
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<InputAction> {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state,
                    ..
                },
                ..
            } => (*state == ElementState::Pressed).then_some(InputAction::Key(*key_code)),
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.button_changed(*button, *state == ElementState::Pressed);
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_SCROLL_LINE,
                };
                self.scrolled(lines)
            }
            _ => None,
        }
    }

    /// Record a button transition. A press re-anchors the previous cursor
    /// position so the first drag delta starts from where the press happened.
    pub fn button_changed(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
            self.previous_position = self.mouse_position;
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    /// Record cursor motion. Left drag looks, right drag picks; the previous
    /// position is updated in every case.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> Option<InputAction> {
        let dx = (self.previous_position.0 - x) * POINTER_SENSITIVITY;
        let dy = (self.previous_position.1 - y) * POINTER_SENSITIVITY;

        let action = if self.is_mouse_button_pressed(MouseButton::Left) {
            Some(InputAction::Look { dx, dy })
        } else if self.is_mouse_button_pressed(MouseButton::Right) {
            Some(InputAction::Pick { x, y })
        } else {
            None
        };

        self.mouse_position = (x, y);
        self.previous_position = (x, y);
        action
    }

    /// Record a scroll of `lines` notches
    pub fn scrolled(&mut self, lines: f32) -> Option<InputAction> {
        if lines == 0.0 {
            return None;
        }
        if self.is_mouse_button_pressed(MouseButton::Middle) {
            Some(InputAction::ResizeCollision { delta: lines })
        } else {
            Some(InputAction::Zoom { delta: lines })
        }
    }

    /// Check if mouse button is pressed
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Get current mouse position
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_without_buttons_does_nothing() {
        let mut input = InputState::new();
        assert_eq!(input.pointer_moved(10.0, 10.0), None);
        assert_eq!(input.mouse_position(), (10.0, 10.0));
    }

    #[test]
    fn test_left_drag_looks_with_scaled_delta() {
        let mut input = InputState::new();
        input.pointer_moved(100.0, 100.0);
        input.button_changed(MouseButton::Left, true);

        let action = input.pointer_moved(90.0, 104.0);
        assert_eq!(action, Some(InputAction::Look { dx: 5.0, dy: -2.0 }));
    }

    #[test]
    fn test_left_takes_priority_over_right() {
        let mut input = InputState::new();
        input.button_changed(MouseButton::Left, true);
        input.button_changed(MouseButton::Right, true);
        assert!(matches!(input.pointer_moved(1.0, 1.0), Some(InputAction::Look { .. })));
    }

    #[test]
    fn test_right_drag_picks_at_cursor() {
        let mut input = InputState::new();
        input.button_changed(MouseButton::Right, true);
        assert_eq!(input.pointer_moved(42.0, 24.0), Some(InputAction::Pick { x: 42.0, y: 24.0 }));

        input.button_changed(MouseButton::Right, false);
        assert_eq!(input.pointer_moved(43.0, 24.0), None);
    }

    #[test]
    fn test_scroll_routing_depends_on_middle_button() {
        let mut input = InputState::new();
        assert_eq!(input.scrolled(1.0), Some(InputAction::Zoom { delta: 1.0 }));

        input.button_changed(MouseButton::Middle, true);
        assert_eq!(input.scrolled(-2.0), Some(InputAction::ResizeCollision { delta: -2.0 }));
        assert_eq!(input.scrolled(0.0), None);
    }
}
