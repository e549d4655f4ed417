//! Input state tracking

use glam::Vec2;
use std::collections::HashSet;
use tracing::trace;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Tracks the current state of input devices
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Currently pressed keys
    pub keys_pressed: HashSet<KeyCode>,
    /// Mouse position in window coordinates
    pub mouse_position: Vec2,
    /// Mouse movement delta since last frame
    pub mouse_delta: Vec2,
    /// Currently pressed mouse buttons
    pub mouse_buttons_pressed: HashSet<MouseButton>,
    /// Whether the host currently shows the OS cursor
    pub cursor_visible: bool,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame data (like mouse delta)
    pub fn clear_frame_data(&mut self) {
        self.mouse_delta = Vec2::ZERO;
    }

    /// Record a key press or release
    pub fn handle_key(&mut self, key_code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_pressed.insert(key_code);
                trace!("Key pressed: {:?}", key_code);
            }
            ElementState::Released => {
                self.keys_pressed.remove(&key_code);
                trace!("Key released: {:?}", key_code);
            }
        }
    }

    /// Update mouse position
    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        self.mouse_position = Vec2::new(x, y);
    }

    /// Add mouse movement delta
    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.mouse_delta += Vec2::new(dx, dy);
        trace!("Mouse delta: ({}, {})", dx, dy);
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.mouse_buttons_pressed.insert(button);
                trace!("Mouse button pressed: {:?}", button);
            }
            ElementState::Released => {
                self.mouse_buttons_pressed.remove(&button);
                trace!("Mouse button released: {:?}", button);
            }
        }
    }

    /// Check if a key is currently pressed
    pub fn is_key_pressed(&self, key_code: KeyCode) -> bool {
        self.keys_pressed.contains(&key_code)
    }

    /// Check if a mouse button is currently pressed
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons_pressed.contains(&button)
    }

    pub fn is_shift_down(&self) -> bool {
        self.is_key_pressed(KeyCode::ShiftLeft) || self.is_key_pressed(KeyCode::ShiftRight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_state_keyboard() {
        let mut state = InputState::new();

        state.handle_key(KeyCode::KeyW, ElementState::Pressed);
        assert!(state.is_key_pressed(KeyCode::KeyW));

        state.handle_key(KeyCode::KeyW, ElementState::Released);
        assert!(!state.is_key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_input_state_mouse() {
        let mut state = InputState::new();

        state.set_mouse_position(100.0, 200.0);
        assert_eq!(state.mouse_position, Vec2::new(100.0, 200.0));

        state.add_mouse_delta(5.0, -3.0);
        state.add_mouse_delta(1.0, 1.0);
        assert_eq!(state.mouse_delta, Vec2::new(6.0, -2.0));

        state.clear_frame_data();
        assert_eq!(state.mouse_delta, Vec2::ZERO);

        state.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(state.is_mouse_button_pressed(MouseButton::Left));

        state.handle_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!state.is_mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_shift_either_side() {
        let mut state = InputState::new();
        assert!(!state.is_shift_down());
        state.handle_key(KeyCode::ShiftRight, ElementState::Pressed);
        assert!(state.is_shift_down());
    }
}
