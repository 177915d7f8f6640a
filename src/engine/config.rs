// Generation tunables. The defaults reproduce the reference layout feel:
// an 800x800 region, 4-unit tile grid, and two to three dozen rooms packed
// from a flat spawn ellipse.

use glam::Vec2;

/// Tunables for one Generator. Construct with `GenConfig::default()` and
/// override fields as needed.
#[derive(Clone, Debug)]
pub struct GenConfig {
    /// Layout region size in world units. Rooms settle inside it and the
    /// triangulation's bounding triangle is sized from it.
    pub region: Vec2,
    /// Alignment grid for room corners and spawn points.
    pub grid: f32,
    /// Half-axes of the spawn ellipse around the region center. Wide and
    /// flat, so the pile spreads horizontally as it relaxes.
    pub spawn_extent: Vec2,
    /// Base room count per layout; two d6 rolls are added on top.
    pub room_count_base: u32,
    /// Padding added to each collider so settled rooms keep a gap.
    pub collider_padding: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Anchor qualification: both room dimensions must exceed this.
    pub min_anchor_size: f32,
    /// Anchor qualification: room area must exceed this.
    pub min_anchor_area: f32,
    /// Fewer qualifying rooms than this forces a reset and a fresh layout.
    pub min_anchor_count: usize,
    /// Fixed timestep handed to the physics space per relaxing tick.
    pub step_dt: f32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            region: Vec2::new(800.0, 800.0),
            grid: 4.0,
            spawn_extent: Vec2::new(64.0, 4.0),
            room_count_base: 22,
            collider_padding: 3.0,
            restitution: 0.0,
            friction: 1.0,
            min_anchor_size: 32.0,
            min_anchor_area: 1280.0,
            min_anchor_count: 3,
            step_dt: 1.0 / 60.0,
        }
    }
}
