// Keyboard and cursor state folded from winit events into a per-frame
// snapshot the camera polls: held pan keys, cursor position for edge
// scrolling, accumulated wheel zoom.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

pub struct InputState {
    held: HashSet<KeyCode>,
    /// Cursor position in window pixels, origin top-left.
    pub mouse_position: Vec2,
    /// Vertical scroll accumulated since the last `end_frame`, in lines.
    pub scroll_delta: f32,
    /// Window size in pixels, tracked through resize events.
    pub window_size: Vec2,
}

impl InputState {
    pub fn new(window_size: Vec2) -> Self {
        Self {
            held: HashSet::new(),
            mouse_position: Vec2::ZERO,
            scroll_delta: 0.0,
            window_size,
        }
    }

    /// Fold one winit event into the snapshot. Every window event goes
    /// through here before the application's own handling.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event: key, .. } => {
                let PhysicalKey::Code(code) = key.physical_key else {
                    return;
                };
                match key.state {
                    ElementState::Pressed => {
                        self.held.insert(code);
                    }
                    ElementState::Released => {
                        self.held.remove(&code);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    // Touchpads report pixels; roughly 100 px per line.
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            WindowEvent::Resized(size) => {
                self.window_size = Vec2::new(size.width as f32, size.height as f32);
            }
            _ => {}
        }
    }

    /// Clear the per-frame scroll accumulator once the camera has consumed
    /// it.
    pub fn end_frame(&mut self) {
        self.scroll_delta = 0.0;
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }
}
