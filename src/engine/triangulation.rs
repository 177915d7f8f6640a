// Incremental Delaunay triangulation, Bowyer-Watson point insertion.
//
// Based on: A. Bowyer, "Computing Dirichlet tessellations" and D. F. Watson,
// "Computing the n-dimensional Delaunay tessellation" (both 1981). Each new
// point removes every triangle whose circumcircle contains it, then stitches
// the cavity boundary back to the point.
//
// The bounding triangle for a w x h region is the equilateral triangle with
// circumradius 2r centered on the region, r being the region half-diagonal
// plus one. Its incircle has radius r and therefore covers the whole region,
// so every inserted point lies strictly inside the triangle.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use super::error::GenError;
use super::geom::Point;
use super::triangle::Triangle;

pub struct Triangulation {
    triangles: HashSet<Triangle>,
    bounding: Triangle,
}

impl Triangulation {
    /// Set up for points inside a `width x height` region anchored at the
    /// origin. The triangle set starts as just the bounding triangle.
    pub fn new(width: f32, height: f32) -> Self {
        let center = Vec2::new(width / 2.0, height / 2.0);
        let radius = center.length() + 1.0;
        let sqrt3 = 3.0_f32.sqrt();
        let bounding = Triangle::new(
            Point::new(center.x - sqrt3 * radius, center.y - radius),
            Point::new(center.x + sqrt3 * radius, center.y - radius),
            Point::new(center.x, center.y + 2.0 * radius),
        );
        let mut triangles = HashSet::new();
        triangles.insert(bounding);
        Self { triangles, bounding }
    }

    /// Insert one point, restoring the Delaunay property.
    ///
    /// The circumcircle test is boundary-inclusive: a point exactly on a
    /// circumcircle counts as violating and triggers retriangulation. For
    /// exactly-cocircular inputs this makes the result depend on insertion
    /// order; callers accept that.
    pub fn insert(&mut self, point: Point) -> Result<(), GenError> {
        let mut bad = Vec::new();
        for tri in &self.triangles {
            if tri.circumcircle()?.contains(point) {
                bad.push(*tri);
            }
        }

        // Count each candidate across the whole cavity. A candidate produced
        // twice grew from an edge interior to the cavity (shared by two bad
        // triangles) and must not survive; the exactly-once candidates are
        // the cavity boundary fan.
        let mut candidates: HashMap<Triangle, u32> = HashMap::new();
        for tri in &bad {
            self.triangles.remove(tri);
            let [a, b, c] = *tri.vertices();
            for candidate in [
                Triangle::new(point, a, b),
                Triangle::new(point, b, c),
                Triangle::new(point, c, a),
            ] {
                *candidates.entry(candidate).or_insert(0) += 1;
            }
        }
        self.triangles.extend(
            candidates
                .into_iter()
                .filter(|&(_, count)| count == 1)
                .map(|(tri, _)| tri),
        );
        Ok(())
    }

    /// Insert every point in iteration order, then drop all triangles that
    /// share a vertex with the bounding triangle. What remains is the final
    /// triangulation; fewer than three inserted points leave it empty.
    pub fn compute<I>(&mut self, points: I) -> Result<(), GenError>
    where
        I: IntoIterator<Item = Point>,
    {
        for point in points {
            self.insert(point)?;
        }
        let bounding = self.bounding;
        self.triangles.retain(|tri| !tri.adjoins(&bounding));
        Ok(())
    }

    pub fn triangles(&self) -> &HashSet<Triangle> {
        &self.triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::LayoutRng;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    /// 24 distinct grid-snapped points inside a 200 x 200 region. The engine
    /// assumes generic position, so sampling rejects repeats and exactly
    /// collinear triples.
    fn random_grid_points(seed: u64) -> Vec<Point> {
        let mut rng = LayoutRng::new(seed);
        let mut points: Vec<Point> = Vec::new();
        while points.len() < 24 {
            let q = p(rng.rn(50) as f32 * 4.0, rng.rn(50) as f32 * 4.0);
            let collinear = points.iter().enumerate().any(|(i, &a)| {
                points[i + 1..]
                    .iter()
                    .any(|&b| (b.x - a.x) * (q.y - a.y) - (b.y - a.y) * (q.x - a.x) == 0.0)
            });
            if points.contains(&q) || collinear {
                continue;
            }
            points.push(q);
        }
        points
    }

    /// Six points on an ellipse around (50, 50). Strict convexity rules out
    /// collinear triples, and no four eccentric angles sum to a full turn,
    /// which rules out cocircular quadruples.
    fn hexagon() -> Vec<Point> {
        let (cx, cy, a, b) = (50.0_f32, 50.0_f32, 45.0_f32, 30.0_f32);
        [5.0_f32, 40.0, 95.0, 160.0, 230.0, 300.0]
            .iter()
            .map(|deg| {
                let t = deg.to_radians();
                p(cx + a * t.cos(), cy + b * t.sin())
            })
            .collect()
    }

    #[test]
    fn test_starts_with_one_triangle_covering_the_region() {
        let tri = Triangulation::new(10.0, 10.0);
        assert_eq!(tri.triangles().len(), 1);
        let circle = tri.triangles().iter().next().unwrap().circumcircle().unwrap();
        for corner in [p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0), p(10.0, 10.0)] {
            assert!(circle.contains(corner));
        }
    }

    #[test]
    fn test_three_points_leave_exactly_their_triangle() {
        let mut tri = Triangulation::new(10.0, 10.0);
        tri.compute([p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0)]).unwrap();
        assert_eq!(tri.triangles().len(), 1);
        let only = tri.triangles().iter().next().unwrap();
        assert_eq!(*only, Triangle::new(p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0)));
    }

    #[test]
    fn test_too_few_points_leave_nothing() {
        let mut tri = Triangulation::new(10.0, 10.0);
        tri.compute([p(5.0, 5.0)]).unwrap();
        assert!(tri.triangles().is_empty());

        let mut tri = Triangulation::new(10.0, 10.0);
        tri.compute([p(2.0, 2.0), p(8.0, 7.0)]).unwrap();
        assert!(tri.triangles().is_empty());
    }

    #[test]
    fn test_convex_hexagon_triangulates_delaunay() {
        let points = hexagon();
        let mut tri = Triangulation::new(100.0, 100.0);
        let bounding = *tri.triangles().iter().next().unwrap();
        tri.compute(points.clone()).unwrap();

        // Any triangulation of a convex hexagon has 4 faces.
        assert_eq!(tri.triangles().len(), 4);
        for t in tri.triangles() {
            assert!(!t.adjoins(&bounding));
            // Delaunay property: no input point strictly inside any
            // circumcircle.
            let circle = t.circumcircle().unwrap();
            for &q in &points {
                if t.vertices().contains(&q) {
                    continue;
                }
                assert!(circle.center.dist(q) >= circle.radius - 1e-2);
            }
        }
    }

    #[test]
    fn test_random_point_sets_triangulate_delaunay() {
        for seed in [7, 99, 4242] {
            let points = random_grid_points(seed);
            let mut tri = Triangulation::new(200.0, 200.0);
            let bounding = *tri.triangles().iter().next().unwrap();
            tri.compute(points.clone()).unwrap();

            assert!(!tri.triangles().is_empty());
            for t in tri.triangles() {
                assert!(!t.adjoins(&bounding));
                let circle = t.circumcircle().unwrap();
                for &q in &points {
                    if t.vertices().contains(&q) {
                        continue;
                    }
                    assert!(
                        circle.center.dist(q) >= circle.radius - 1e-2,
                        "seed {seed}: input point inside a surviving circumcircle"
                    );
                }
            }
        }
    }

    #[test]
    fn test_insertion_is_incremental() {
        let points = hexagon();
        let mut tri = Triangulation::new(100.0, 100.0);
        for &q in &points {
            tri.insert(q).unwrap();
        }
        // Before cleanup the set still carries bounding-vertex fans; every
        // input point must appear as a vertex somewhere.
        for &q in &points {
            assert!(
                tri.triangles()
                    .iter()
                    .any(|t| t.vertices().contains(&q))
            );
        }
    }

    #[test]
    fn test_cocircular_square_splits_into_two_faces() {
        // All four corners lie on one circle. The boundary-inclusive test
        // forces a split either way the diagonal falls, and both halves
        // share the square's circumcircle.
        let corners = [p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0), p(10.0, 10.0)];
        let mut tri = Triangulation::new(10.0, 10.0);
        tri.compute(corners).unwrap();
        assert_eq!(tri.triangles().len(), 2);
        for t in tri.triangles() {
            let circle = t.circumcircle().unwrap();
            assert!((circle.center.x - 5.0).abs() < 1e-3);
            assert!((circle.center.y - 5.0).abs() < 1e-3);
            assert!((circle.radius - 50.0_f32.sqrt()).abs() < 1e-3);
        }
    }
}
