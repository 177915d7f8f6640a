// Generation pipeline: a forward-only state machine advanced one tick at a
// time.
//
// Each tick reads the derived phase (most advanced first) and performs at
// most one phase's worth of work:
//
//   Spanned       corridors built           -> idle, layout is final
//   Triangulated  triangles, no corridors   -> build corridors, drop extras
//   Selected      anchors marked            -> triangulate anchor centers
//   Settled       every body asleep         -> pick anchors (or retry)
//   Relaxing      rooms still moving        -> one physics step
//
// The phase is never stored. It is recomputed from owned state, so an
// external refresh can never leave a stale phase behind. An empty room list
// reads as Settled (vacuously at rest), which makes the first tick after
// construction or reset regenerate through the retry path.

use std::time::Instant;

use glam::Vec2;
use log::{debug, info, warn};

use super::config::GenConfig;
use super::corridors::{self, CorridorSet};
use super::error::GenError;
use super::geom::Point;
use super::physics::{BodySpec, PhysicsSpace};
use super::rng::LayoutRng;
use super::rooms::{self, Room, RoomStatus};
use super::triangle::Triangle;
use super::triangulation::Triangulation;

// ============================================================================
// PHASE
// ============================================================================

/// Generation phases, least advanced first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Relaxing,
    Settled,
    Selected,
    Triangulated,
    Spanned,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Relaxing => "relaxing",
            Phase::Settled => "settled",
            Phase::Selected => "selected",
            Phase::Triangulated => "triangulated",
            Phase::Spanned => "spanned",
        }
    }
}

// ============================================================================
// STATS
// ============================================================================

/// Counters surfaced in the debug overlay.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenStats {
    /// Layouts placed so far, the initial one included.
    pub generations: u32,
    /// Automatic rejections for layouts with too few anchor candidates.
    pub retries: u32,
    pub triangulation_ms: f32,
    pub spanning_ms: f32,
}

// ============================================================================
// GENERATOR
// ============================================================================

pub struct Generator<P: PhysicsSpace> {
    config: GenConfig,
    space: P,
    rng: LayoutRng,
    rooms: Vec<Room>,
    triangles: Option<Vec<Triangle>>,
    corridors: Option<CorridorSet>,
    stats: GenStats,
}

impl<P: PhysicsSpace> Generator<P> {
    pub fn new(config: GenConfig, space: P, rng: LayoutRng) -> Self {
        Self {
            config,
            space,
            rng,
            rooms: Vec::new(),
            triangles: None,
            corridors: None,
            stats: GenStats::default(),
        }
    }

    // ---- state inspection --------------------------------------------------

    /// Current phase, derived most-advanced-first from owned state.
    pub fn phase(&self) -> Phase {
        if self.corridors.is_some() {
            Phase::Spanned
        } else if self.triangles.is_some() {
            Phase::Triangulated
        } else if self.rooms.iter().any(Room::active) {
            Phase::Selected
        } else if self.rooms.iter().all(|r| self.space.is_asleep(r.body)) {
            Phase::Settled
        } else {
            Phase::Relaxing
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn triangles(&self) -> Option<&[Triangle]> {
        self.triangles.as_deref()
    }

    pub fn corridors(&self) -> Option<&CorridorSet> {
        self.corridors.as_ref()
    }

    pub fn stats(&self) -> &GenStats {
        &self.stats
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Tri-state render status for one room.
    pub fn room_status(&self, room: &Room) -> RoomStatus {
        if room.active() {
            RoomStatus::Active
        } else if self.space.is_asleep(room.body) {
            RoomStatus::Sleeping
        } else {
            RoomStatus::Default
        }
    }

    /// Grid-snapped top-left corner of a room, for drawing.
    pub fn room_origin(&self, room: &Room) -> Vec2 {
        room.origin(self.space.position(room.body), self.config.grid)
    }

    /// Grid-snapped center of a room. Anchor centers feed the triangulation.
    pub fn room_center(&self, room: &Room) -> Vec2 {
        room.center(self.space.position(room.body), self.config.grid)
    }

    // ---- control surface ---------------------------------------------------

    /// Advance the state machine by one step. Returns the phase the
    /// generator is in after the tick's work.
    pub fn tick(&mut self) -> Result<Phase, GenError> {
        match self.phase() {
            Phase::Spanned => {}
            Phase::Triangulated => self.span()?,
            Phase::Selected => self.triangulate()?,
            Phase::Settled => self.select_anchors(),
            Phase::Relaxing => self.space.step(self.config.step_dt),
        }
        Ok(self.phase())
    }

    /// Discard the current layout and place a fresh random one.
    pub fn refresh(&mut self) {
        self.reset();
        self.place_rooms();
        self.stats.generations += 1;
        info!(
            "layout #{}: {} rooms placed",
            self.stats.generations,
            self.rooms.len()
        );
    }

    /// Return to the empty state: every body unregistered, triangle and
    /// corridor results cleared. Idempotent.
    pub fn reset(&mut self) {
        for room in &self.rooms {
            self.space.remove_body(room.body);
        }
        self.rooms.clear();
        self.triangles = None;
        self.corridors = None;
    }

    // ---- phase work --------------------------------------------------------

    fn place_rooms(&mut self) {
        let center = self.config.region / 2.0;
        let count = rooms::random_room_count(&mut self.rng, self.config.room_count_base);
        for _ in 0..count {
            let offset = rooms::random_point_in_ellipse(
                &mut self.rng,
                self.config.spawn_extent,
                self.config.grid,
            );
            let width = rooms::random_width(&mut self.rng, self.config.grid);
            let height = rooms::random_height(&mut self.rng, self.config.grid);
            let pad = self.config.collider_padding;
            let body = self.space.add_body(&BodySpec {
                position: center + offset,
                half_extents: Vec2::new((width + pad) / 2.0, (height + pad) / 2.0),
                mass: width * height,
                restitution: self.config.restitution,
                friction: self.config.friction,
            });
            self.rooms.push(Room::new(body, width, height));
            debug!("room {width}x{height} spawned at offset {offset}");
        }
    }

    /// Qualify rooms by size and area, reject the whole layout if too few
    /// qualify, otherwise activate the largest-by-area candidates.
    fn select_anchors(&mut self) {
        let mut qualifying: Vec<usize> = (0..self.rooms.len())
            .filter(|&i| {
                let r = &self.rooms[i];
                r.width > self.config.min_anchor_size
                    && r.height > self.config.min_anchor_size
                    && r.area() > self.config.min_anchor_area
            })
            .collect();

        if qualifying.len() < self.config.min_anchor_count {
            warn!(
                "only {} of {} rooms qualify as anchors, regenerating",
                qualifying.len(),
                self.rooms.len()
            );
            self.stats.retries += 1;
            self.refresh();
            return;
        }

        // Sum of three quarter-range rolls plus a floor of at least four.
        let quarter = (qualifying.len() / 4) as u32;
        let rolled = (self.rng.rn(quarter) + self.rng.rn(quarter) + self.rng.rn(quarter)) as usize
            + (quarter as usize).max(4);
        let target = rolled.min(qualifying.len());

        // Largest area first, take the head.
        qualifying.sort_by(|&x, &y| self.rooms[y].area().total_cmp(&self.rooms[x].area()));
        for &i in qualifying.iter().take(target) {
            self.rooms[i].activate();
        }
        info!(
            "selected {target} anchors from {} qualifying rooms",
            qualifying.len()
        );
    }

    fn triangulate(&mut self) -> Result<(), GenError> {
        let started = Instant::now();
        let centers: Vec<Point> = self
            .rooms
            .iter()
            .filter(|r| r.active())
            .map(|r| Point::from(self.room_center(r)))
            .collect();
        let anchor_count = centers.len();

        let mut triangulation = Triangulation::new(self.config.region.x, self.config.region.y);
        triangulation.compute(centers)?;
        let mut triangles: Vec<Triangle> = triangulation.triangles().iter().copied().collect();
        // Canonical order: the hash set's iteration order must not leak into
        // corridor node numbering.
        triangles.sort_unstable();

        self.stats.triangulation_ms = started.elapsed().as_secs_f32() * 1000.0;
        info!(
            "triangulated {anchor_count} anchors into {} faces",
            triangles.len()
        );
        self.triangles = Some(triangles);
        Ok(())
    }

    /// Build corridors from the triangle set, then drop every room that was
    /// not selected as an anchor, unregistering its body.
    fn span(&mut self) -> Result<(), GenError> {
        let Some(triangles) = self.triangles.as_deref() else {
            return Ok(());
        };
        let started = Instant::now();
        let set = corridors::build_corridors(triangles, &mut self.rng)?;
        self.stats.spanning_ms = started.elapsed().as_secs_f32() * 1000.0;
        info!(
            "spanning tree: {} corridors plus {} loops",
            set.spanning.len(),
            set.loops.len()
        );

        for room in self.rooms.iter().filter(|r| !r.active()) {
            self.space.remove_body(room.body);
        }
        self.rooms.retain(Room::active);
        self.corridors = Some(set);
        Ok(())
    }
}
