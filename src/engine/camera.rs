// 2D pan/zoom camera over the layout plane.
//
// Model:
//   - target: the world point the view is centered on
//   - zoom: screen pixels per world unit
//   - WASD pans, screen edges pan, the wheel zooms, all clamped
//
// World y grows downward (rooms use screen-like coordinates), so the ortho
// projection flips the vertical axis.

use glam::{Mat4, Vec2};
use winit::keyboard::KeyCode;

use super::input::InputState;

pub struct LayoutCamera {
    /// View center on the layout plane.
    /// Private: clamped to [bounds_min, bounds_max] in update().
    target: Vec2,

    /// Pixels per world unit.
    /// Private: clamped to [min_zoom, max_zoom] in update().
    zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,

    /// Pan speed in world units per second.
    pub move_speed: f32,
    /// Zoom change per scroll line.
    pub zoom_speed: f32,

    /// Edge scrolling: pan when the cursor is within this margin (pixels)
    /// of a window border.
    pub edge_scroll_speed: f32,
    pub edge_scroll_margin: f32,

    pub bounds_min: Vec2,
    pub bounds_max: Vec2,
}

impl LayoutCamera {
    /// Camera framing a `region`-sized layout: centered, zoomed out far
    /// enough to see all of it with a margin.
    pub fn for_region(region: Vec2) -> Self {
        Self {
            target: region / 2.0,
            zoom: 0.85,
            min_zoom: 0.25,
            max_zoom: 4.0,
            move_speed: 300.0,
            zoom_speed: 0.1,
            edge_scroll_speed: 300.0,
            edge_scroll_margin: 20.0,
            bounds_min: Vec2::ZERO,
            bounds_max: region,
        }
    }

    /// Apply pan/zoom input. Call once per frame before rendering.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        let mut move_dir = Vec2::ZERO;
        if input.is_key_held(KeyCode::KeyW) {
            move_dir.y -= 1.0;
        }
        if input.is_key_held(KeyCode::KeyS) {
            move_dir.y += 1.0;
        }
        if input.is_key_held(KeyCode::KeyD) {
            move_dir.x += 1.0;
        }
        if input.is_key_held(KeyCode::KeyA) {
            move_dir.x -= 1.0;
        }
        if move_dir != Vec2::ZERO {
            self.target += move_dir.normalize() * self.move_speed * dt;
        }

        // Edge scrolling: cursor near a border pans toward that border.
        let cursor = input.mouse_position;
        let win = input.window_size;
        if win.x > 0.0 && win.y > 0.0 {
            let margin = self.edge_scroll_margin;
            let mut edge_dir = Vec2::ZERO;
            if cursor.x < margin {
                edge_dir.x -= 1.0;
            } else if cursor.x > win.x - margin {
                edge_dir.x += 1.0;
            }
            if cursor.y < margin {
                edge_dir.y -= 1.0;
            } else if cursor.y > win.y - margin {
                edge_dir.y += 1.0;
            }
            if edge_dir != Vec2::ZERO {
                self.target += edge_dir.normalize() * self.edge_scroll_speed * dt;
            }
        }

        // Scroll up zooms in.
        self.zoom =
            (self.zoom + input.scroll_delta * self.zoom_speed).clamp(self.min_zoom, self.max_zoom);
        self.target = self.target.clamp(self.bounds_min, self.bounds_max);
    }

    /// Ortho view-projection for a viewport of the given pixel size. World y
    /// maps downward on screen.
    pub fn view_projection(&self, viewport: Vec2) -> Mat4 {
        let half = viewport / (2.0 * self.zoom);
        Mat4::orthographic_rh(
            self.target.x - half.x,
            self.target.x + half.x,
            self.target.y + half.y,
            self.target.y - half.y,
            -1.0,
            1.0,
        )
    }

    /// Project a world point to viewport pixels, origin top-left. Agrees
    /// with view_projection; the egui overlay layers use this.
    pub fn world_to_screen(&self, world: Vec2, viewport: Vec2) -> Vec2 {
        (world - self.target) * self.zoom + viewport / 2.0
    }

    /// Pixels covered by a world-space length at the current zoom.
    pub fn scale_to_screen(&self, length: f32) -> f32 {
        length * self.zoom
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }
}
