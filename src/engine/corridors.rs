// Corridor extraction: triangulation edges -> weighted segments -> spanning
// tree plus sampled loop edges.
//
// Node indices are assigned in first-seen order over the deduplicated edge
// list and ties in the length sort keep that order, so a given triangle list
// and RNG state always produce the same corridor set.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;

use super::error::GenError;
use super::geom::Point;
use super::graph::{DisjointGraph, Segment};
use super::rng::LayoutRng;
use super::triangle::Triangle;

/// Fraction of rejected edges promoted to loop corridors (one in eight).
const LOOP_DIVISOR: usize = 8;

// ============================================================================
// CORRIDOR
// ============================================================================

/// A corridor between two room centers, ready for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corridor {
    pub a: Point,
    pub b: Point,
    pub length: f32,
    /// Angle of the a->b direction in radians. Precomputed so the renderer
    /// can instance corridors as rotated quads without re-deriving it.
    pub angle: f32,
}

impl Corridor {
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            a,
            b,
            length: a.dist(b),
            angle: (b.y - a.y).atan2(b.x - a.x),
        }
    }
}

/// The corridor layout for one generation: the spanning tree in acceptance
/// order, then the sampled loop corridors.
#[derive(Debug, Default)]
pub struct CorridorSet {
    pub spanning: Vec<Corridor>,
    pub loops: Vec<Corridor>,
}

impl CorridorSet {
    pub fn len(&self) -> usize {
        self.spanning.len() + self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spanning.is_empty() && self.loops.is_empty()
    }

    /// All corridors, spanning tree first.
    pub fn iter(&self) -> impl Iterator<Item = &Corridor> {
        self.spanning.iter().chain(self.loops.iter())
    }
}

// ============================================================================
// BUILDER
// ============================================================================

fn intern(p: Point, nodes: &mut Vec<Point>, index: &mut HashMap<Point, usize>) -> usize {
    if let Some(&i) = index.get(&p) {
        i
    } else {
        nodes.push(p);
        index.insert(p, nodes.len() - 1);
        nodes.len() - 1
    }
}

/// Build the corridor set for a triangle list.
///
/// Deduplicates triangle edges as canonical vertex pairs, indexes the
/// distinct endpoints in first-seen order, weights each pair by Euclidean
/// distance, runs Kruskal over the ascending sort for the spanning tree,
/// then samples one eighth of the rejected edges as loops.
///
/// Fails with `DisconnectedEdgeSet` if the spanning tree cannot reach every
/// node, which a well-formed triangulation never causes.
pub fn build_corridors(
    triangles: &[Triangle],
    rng: &mut LayoutRng,
) -> Result<CorridorSet, GenError> {
    let mut nodes: Vec<Point> = Vec::new();
    let mut index: HashMap<Point, usize> = HashMap::new();
    let mut seen: HashSet<(Point, Point)> = HashSet::new();
    let mut segments: Vec<Segment> = Vec::new();

    for tri in triangles {
        for (a, b) in tri.edges() {
            if !seen.insert((a, b)) {
                continue;
            }
            let ia = intern(a, &mut nodes, &mut index);
            let ib = intern(b, &mut nodes, &mut index);
            segments.push(Segment::new(ia, ib, a.dist(b)));
        }
    }

    if nodes.is_empty() {
        return Ok(CorridorSet::default());
    }

    // Stable sort: equal lengths keep first-seen order, which keeps seeded
    // runs reproducible.
    segments.sort_by(|x, y| x.length.total_cmp(&y.length));

    let mut graph = DisjointGraph::new(nodes.len());
    let spanning = graph.search(&segments);
    if spanning.len() + 1 != nodes.len() {
        return Err(GenError::DisconnectedEdgeSet {
            accepted: spanning.len(),
            nodes: nodes.len(),
        });
    }

    // Each undirected edge appears once in `segments`, so the index pair
    // identifies it.
    let accepted: HashSet<(usize, usize)> = spanning.iter().map(|s| (s.a, s.b)).collect();
    let rejected: Vec<Segment> = segments
        .iter()
        .copied()
        .filter(|s| !accepted.contains(&(s.a, s.b)))
        .collect();
    let loops: Vec<Segment> = rejected
        .choose_multiple(rng, rejected.len() / LOOP_DIVISOR)
        .copied()
        .collect();

    Ok(CorridorSet {
        spanning: spanning
            .iter()
            .map(|s| Corridor::new(nodes[s.a], nodes[s.b]))
            .collect(),
        loops: loops
            .iter()
            .map(|s| Corridor::new(nodes[s.a], nodes[s.b]))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_corridor_precomputes_length_and_angle() {
        let c = Corridor::new(p(0.0, 0.0), p(0.0, 5.0));
        assert_eq!(c.length, 5.0);
        assert!((c.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        let c = Corridor::new(p(0.0, 0.0), p(-3.0, 0.0));
        assert_eq!(c.length, 3.0);
        assert!((c.angle - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_single_triangle_spans_two_shortest_edges() {
        let tri = Triangle::new(p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0));
        let mut rng = LayoutRng::new(1);
        let set = build_corridors(&[tri], &mut rng).unwrap();
        // Both sqrt(13) edges beat the length-4 base, which closes a cycle.
        assert_eq!(set.spanning.len(), 2);
        assert!(set.loops.is_empty());
        for c in &set.spanning {
            assert!((c.length - 13.0_f32.sqrt()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_shared_edge_counts_once() {
        // Two triangles glued along (0,0)-(4,0): 6 raw edges, 5 distinct.
        let t1 = Triangle::new(p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0));
        let t2 = Triangle::new(p(0.0, 0.0), p(4.0, 0.0), p(2.0, -3.0));
        let mut rng = LayoutRng::new(1);
        let set = build_corridors(&[t1, t2], &mut rng).unwrap();
        // 4 nodes: 3 spanning edges, 2 rejected, 2/8 = 0 loops.
        assert_eq!(set.spanning.len(), 3);
        assert!(set.loops.is_empty());
    }

    #[test]
    fn test_loop_count_is_an_eighth_of_rejected() {
        // A 16-spoke wheel: hub to rim spokes plus the rim ring, 32 distinct
        // edges over 17 nodes. The tree uses 16, leaving 16 rejected and
        // 16/8 = 2 loops.
        let hub = p(0.0, 0.0);
        let rim: Vec<Point> = (0..16)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / 16.0;
                let radius = if i % 2 == 0 { 30.0 } else { 40.0 };
                p(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        let triangles: Vec<Triangle> = (0..16)
            .map(|i| Triangle::new(hub, rim[i], rim[(i + 1) % 16]))
            .collect();

        let mut rng = LayoutRng::new(99);
        let set = build_corridors(&triangles, &mut rng).unwrap();
        assert_eq!(set.spanning.len(), 16);
        assert_eq!(set.loops.len(), 2);
        // Loops come from the rejected pool, never from the tree.
        for lp in &set.loops {
            assert!(!set.spanning.contains(lp));
        }
    }

    #[test]
    fn test_disjoint_triangles_fail_as_disconnected() {
        let t1 = Triangle::new(p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0));
        let t2 = Triangle::new(p(50.0, 50.0), p(54.0, 50.0), p(52.0, 53.0));
        let mut rng = LayoutRng::new(1);
        let err = build_corridors(&[t1, t2], &mut rng).unwrap_err();
        assert_eq!(err, GenError::DisconnectedEdgeSet { accepted: 4, nodes: 6 });
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        let mut rng = LayoutRng::new(1);
        let set = build_corridors(&[], &mut rng).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_same_seed_same_loops() {
        let hub = p(0.0, 0.0);
        let rim: Vec<Point> = (0..16)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / 16.0;
                let radius = if i % 2 == 0 { 30.0 } else { 40.0 };
                p(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        let triangles: Vec<Triangle> = (0..16)
            .map(|i| Triangle::new(hub, rim[i], rim[(i + 1) % 16]))
            .collect();

        let set_a = build_corridors(&triangles, &mut LayoutRng::new(5)).unwrap();
        let set_b = build_corridors(&triangles, &mut LayoutRng::new(5)).unwrap();
        assert_eq!(set_a.spanning, set_b.spanning);
        assert_eq!(set_a.loops, set_b.loops);
    }
}
