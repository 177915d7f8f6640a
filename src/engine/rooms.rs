// Rooms: axis-aligned rectangles settled by the physics collaborator.
//
// A room's authoritative position is its physics body. Everything drawn or
// triangulated uses the grid-snapped corner derived from that position, so
// the final layout sits on the tile grid no matter where the solver left
// the body.

use glam::Vec2;

use super::physics::BodyId;
use super::rng::LayoutRng;

// ============================================================================
// ROOM
// ============================================================================

/// Render/selection state of a room. Active wins over sleeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomStatus {
    /// Still settling, or settled but not picked as an anchor.
    Default,
    /// Picked as a triangulation anchor.
    Active,
    /// Body reported asleep and not an anchor.
    Sleeping,
}

#[derive(Clone, Debug)]
pub struct Room {
    pub body: BodyId,
    pub width: f32,
    pub height: f32,
    active: bool,
}

impl Room {
    pub fn new(body: BodyId, width: f32, height: f32) -> Self {
        Self { body, width, height, active: false }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Mark as a triangulation anchor. One-way until the layout resets.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Grid-snapped top-left corner for the given body position.
    pub fn origin(&self, body_pos: Vec2, grid: f32) -> Vec2 {
        Vec2::new(
            snap(body_pos.x - self.width / 2.0, grid),
            snap(body_pos.y - self.height / 2.0, grid),
        )
    }

    /// Room center derived from the snapped corner. Triangulation anchors
    /// use this, not the raw body position, so corridors land on the grid.
    pub fn center(&self, body_pos: Vec2, grid: f32) -> Vec2 {
        self.origin(body_pos, grid) + self.size() / 2.0
    }
}

// ============================================================================
// PLACEMENT
// ============================================================================

/// Snap to the grid: the unique multiple of `grid` in the half-open range
/// (v - 1, v + grid - 1]. For whole-number v this is ceil-to-multiple.
#[inline]
pub fn snap(v: f32, grid: f32) -> f32 {
    ((v + grid - 1.0) / grid).floor() * grid
}

/// Uniform point in the ellipse with the given half-axes, snapped per-axis
/// to the grid. Folding the sum of two uniform draws yields the linearly
/// rising radial density an area-uniform sample needs.
pub fn random_point_in_ellipse(rng: &mut LayoutRng, half_axes: Vec2, grid: f32) -> Vec2 {
    let t = std::f32::consts::TAU * rand::Rng::gen_range(rng, 0.0..1.0f32);
    let u: f32 = rand::Rng::gen_range(rng, 0.0..1.0f32) + rand::Rng::gen_range(rng, 0.0..1.0f32);
    let r = if u > 1.0 { 2.0 - u } else { u };
    Vec2::new(
        snap(half_axes.x * r * t.cos(), grid),
        snap(half_axes.y * r * t.sin(), grid),
    )
}

/// Room width roll: ((d10 + 2) + (d7 + 1)) grid units, 12..=72 on the
/// default grid of 4.
pub fn random_width(rng: &mut LayoutRng, grid: f32) -> f32 {
    ((rng.rn(10) + 2) + (rng.rn(7) + 1)) as f32 * grid
}

/// Room height roll: ((d7 + 2) + (d5 + 1)) grid units, 12..=52 on the
/// default grid of 4. Shorter than wide, matching the flat spawn ellipse.
pub fn random_height(rng: &mut LayoutRng, grid: f32) -> f32 {
    ((rng.rn(7) + 2) + (rng.rn(5) + 1)) as f32 * grid
}

/// Number of rooms for one layout: base + 2d6.
pub fn random_room_count(rng: &mut LayoutRng, base: u32) -> u32 {
    rng.rn(6) + rng.rn(6) + base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_lands_on_grid() {
        assert_eq!(snap(8.0, 4.0), 8.0);
        assert_eq!(snap(9.0, 4.0), 12.0);
        assert_eq!(snap(11.0, 4.0), 12.0);
        assert_eq!(snap(0.0, 4.0), 0.0);
        assert_eq!(snap(-5.0, 4.0), -4.0);
    }

    #[test]
    fn test_snap_range_invariant() {
        let grid = 4.0;
        for i in 0..200 {
            let v = i as f32 * 0.37 - 20.0;
            let s = snap(v, grid);
            assert_eq!(s % grid, 0.0);
            assert!(s > v - 1.0 - 1e-4 && s <= v + grid - 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_size_rolls_are_grid_multiples_in_range() {
        let mut rng = LayoutRng::new(0xBEEF);
        for _ in 0..500 {
            let w = random_width(&mut rng, 4.0);
            let h = random_height(&mut rng, 4.0);
            assert_eq!(w % 4.0, 0.0);
            assert_eq!(h % 4.0, 0.0);
            assert!((12.0..=72.0).contains(&w));
            assert!((12.0..=52.0).contains(&h));
        }
    }

    #[test]
    fn test_room_count_range() {
        let mut rng = LayoutRng::new(3);
        for _ in 0..200 {
            let count = random_room_count(&mut rng, 22);
            assert!((22..=32).contains(&count));
        }
    }

    #[test]
    fn test_ellipse_points_stay_in_bounds() {
        let mut rng = LayoutRng::new(11);
        let half_axes = Vec2::new(64.0, 4.0);
        for _ in 0..500 {
            let pt = random_point_in_ellipse(&mut rng, half_axes, 4.0);
            assert_eq!(pt.x % 4.0, 0.0);
            assert_eq!(pt.y % 4.0, 0.0);
            // Snapping can push a coordinate at most grid-1 outward.
            assert!(pt.x.abs() <= half_axes.x + 3.0);
            assert!(pt.y.abs() <= half_axes.y + 3.0);
        }
    }

    #[test]
    fn test_center_sits_on_snapped_origin() {
        use super::super::physics::BodyId;
        let room = Room::new(BodyId(0), 40.0, 24.0);
        let body_pos = Vec2::new(101.3, 77.9);
        let origin = room.origin(body_pos, 4.0);
        assert_eq!(origin, Vec2::new(84.0, 68.0));
        assert_eq!(room.center(body_pos, 4.0), origin + Vec2::new(20.0, 12.0));
    }

    #[test]
    fn test_activate_is_one_way() {
        use super::super::physics::BodyId;
        let mut room = Room::new(BodyId(1), 16.0, 16.0);
        assert!(!room.active());
        room.activate();
        assert!(room.active());
        assert_eq!(room.area(), 256.0);
    }
}
