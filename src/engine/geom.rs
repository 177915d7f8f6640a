// 2D geometry primitives for the layout core.
//
// Point is the identity-bearing vertex type: unlike a raw glam::Vec2 it is
// Eq + Hash + Ord, so it can key hash maps and canonically sort triangle
// vertices. Distance math goes through Vec2.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use glam::Vec2;

// ============================================================================
// POINT
// ============================================================================

/// A 2D point with bit-level identity.
///
/// Equality, hashing, and ordering all go through the raw f32 bits
/// (`to_bits` / `total_cmp`), which keeps Eq, Hash, and Ord mutually
/// consistent. Consequence: `-0.0 != 0.0`. Layout coordinates come out of
/// grid snapping and never produce a negative zero.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn dist(&self, other: Point) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.x.to_bits());
        state.write_u32(self.y.to_bits());
    }
}

impl Ord for Point {
    /// Lexicographic order, x before y. Triangle vertex canonicalization
    /// relies on this being total.
    fn cmp(&self, other: &Self) -> Ordering {
        self.x.total_cmp(&other.x).then(self.y.total_cmp(&other.y))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// CIRCLE
// ============================================================================

/// A circle described by center and radius. Produced by circumcircle
/// computation, consumed by the point-insertion test and the debug overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    /// Boundary-inclusive containment: a point exactly on the circle counts
    /// as inside. The triangulation relies on this to treat on-circle points
    /// as violating the Delaunay property.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.center.dist(p) <= self.radius
    }
}
