//! Input handling: keyboard state, wheel accumulation, the eased page scroll and
//! the section map that turns both into navigation.

pub mod scroll;
pub mod sections;

pub use scroll::*;
pub use sections::*;

use std::collections::HashSet;

use winit::event::MouseScrollDelta;

/// Pixels one wheel "line" scrolls the page by.
pub const LINE_HEIGHT_PX: f32 = 40.0;

/// Input gathered between two frames.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Wheel movement this frame in page pixels, positive scrolls down the page.
    wheel_px: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once the frame has consumed its input.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.wheel_px = 0.0;
    }

    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    pub fn process_wheel(&mut self, delta: MouseScrollDelta) {
        // Wheel "up" (positive y) moves toward the top of the page.
        self.wheel_px += match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT_PX,
            MouseScrollDelta::PixelDelta(p) => -p.y as f32,
        };
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn keys_pressed(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys_pressed.iter().copied()
    }

    pub fn wheel_px(&self) -> f32 {
        self.wheel_px
    }

    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn pressed_is_edge_triggered() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Digit3, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::Digit3));
        input.end_frame();
        // Key repeat while held does not re-trigger.
        input.process_keyboard(KeyCode::Digit3, ElementState::Pressed);
        assert!(!input.is_key_pressed(KeyCode::Digit3));
        assert!(input.is_key_held(KeyCode::Digit3));
        input.process_keyboard(KeyCode::Digit3, ElementState::Released);
        assert!(!input.is_key_held(KeyCode::Digit3));
    }

    #[test]
    fn wheel_accumulates_until_end_of_frame() {
        let mut input = InputState::new();
        input.process_wheel(MouseScrollDelta::LineDelta(0.0, -1.0));
        input.process_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 10.0)));
        assert_eq!(input.wheel_px(), LINE_HEIGHT_PX - 10.0);
        input.end_frame();
        assert_eq!(input.wheel_px(), 0.0);
    }
}
