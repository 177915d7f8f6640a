// Triangulation face: an unordered set of three vertices.
//
// Vertices are sorted into a canonical array at construction, so the derived
// Eq/Hash/Ord are vertex-order independent and Triangle can key the
// triangulation's sets and the per-insertion candidate counter.

use super::error::GenError;
use super::geom::{Circle, Point};

/// A triangle identified by its vertex set: `Triangle::new(a, b, c)` equals
/// `Triangle::new(c, a, b)` for any a, b, c.
///
/// The vertices must be pairwise distinct and non-collinear for the
/// circumcircle to exist; `circumcircle` reports anything else as degenerate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triangle {
    verts: [Point; 3],
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        let mut verts = [a, b, c];
        verts.sort_unstable();
        Self { verts }
    }

    /// The vertices in canonical (sorted) order.
    #[inline]
    pub fn vertices(&self) -> &[Point; 3] {
        &self.verts
    }

    /// True iff the two triangles share at least one vertex.
    pub fn adjoins(&self, other: &Triangle) -> bool {
        self.verts.iter().any(|v| other.verts.contains(v))
    }

    /// The three edges as (min, max) vertex pairs, so the same undirected
    /// edge compares equal no matter which triangle produced it.
    pub fn edges(&self) -> [(Point, Point); 3] {
        let [a, b, c] = self.verts;
        [(a, b), (a, c), (b, c)]
    }

    /// The unique circle through all three vertices, via the closed-form
    /// circumcenter solution. A zero denominator means the vertices are
    /// collinear (or coincident) and no such circle exists.
    pub fn circumcircle(&self) -> Result<Circle, GenError> {
        let [p1, p2, p3] = self.verts;
        let d = 2.0 * ((p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x));
        if d == 0.0 {
            return Err(GenError::DegenerateGeometry { a: p1, b: p2, c: p3 });
        }
        // Squared-norm differences shared by both center coordinates.
        let q2 = p2.x * p2.x - p1.x * p1.x + p2.y * p2.y - p1.y * p1.y;
        let q3 = p3.x * p3.x - p1.x * p1.x + p3.y * p3.y - p1.y * p1.y;
        let center = Point::new(
            ((p3.y - p1.y) * q2 + (p1.y - p2.y) * q3) / d,
            ((p1.x - p3.x) * q2 + (p2.x - p1.x) * q3) / d,
        );
        Ok(Circle { center, radius: center.dist(p1) })
    }
}
