// Disjoint-set over node indices with explicit member lists, plus Kruskal's
// minimum-spanning-tree search.
//
// merge() folds the smaller group's member list into the larger and rewrites
// the moved nodes' group ids, so group lookup stays a plain array read with
// no find/compress step. Any node is relabeled at most log2(n) times, so the
// total relabel work over a whole merge sequence is O(n log n).

/// An undirected weighted edge between two node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: usize,
    pub b: usize,
    pub length: f32,
}

impl Segment {
    pub fn new(a: usize, b: usize, length: f32) -> Self {
        Self { a, b, length }
    }
}

/// Size-balanced union-find substrate for Kruskal's algorithm.
///
/// Invariant: `group[i]` names the group node i belongs to, and
/// `members[group[i]]` contains i. The non-empty member lists partition
/// the node range.
pub struct DisjointGraph {
    group: Vec<usize>,
    members: Vec<Vec<usize>>,
}

impl DisjointGraph {
    /// n singleton groups: node i alone in group i.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            group: (0..num_nodes).collect(),
            members: (0..num_nodes).map(|i| vec![i]).collect(),
        }
    }

    #[inline]
    pub fn group_of(&self, node: usize) -> usize {
        self.group[node]
    }

    /// Number of nodes in the same group as `node`.
    pub fn group_len(&self, node: usize) -> usize {
        self.members[self.group[node]].len()
    }

    /// Unite the groups of `a` and `b`. The smaller member list is drained
    /// into the larger one and only the moved nodes are relabeled. The two
    /// groups must be distinct.
    pub fn merge(&mut self, a: usize, b: usize) {
        let (ga, gb) = (self.group[a], self.group[b]);
        debug_assert_ne!(ga, gb, "merge of already-united nodes");
        let (keep, fold) = if self.members[ga].len() >= self.members[gb].len() {
            (ga, gb)
        } else {
            (gb, ga)
        };
        let moved = std::mem::take(&mut self.members[fold]);
        for &node in &moved {
            self.group[node] = keep;
        }
        self.members[keep].extend(moved);
    }

    /// Kruskal: scan segments in order, accept each one whose endpoints are
    /// not yet connected, merging as it goes. `segments` must already be
    /// sorted ascending by length; no sorting happens here. Returns the
    /// accepted segments in acceptance order.
    pub fn search(&mut self, segments: &[Segment]) -> Vec<Segment> {
        let mut spanning = Vec::new();
        for seg in segments {
            if self.group[seg.a] != self.group[seg.b] {
                self.merge(seg.a, seg.b);
                spanning.push(*seg);
            }
        }
        spanning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use super::super::rng::LayoutRng;

    /// Every node must sit in exactly one member list, and that list must be
    /// the one its group id names.
    fn assert_partition(graph: &DisjointGraph, num_nodes: usize) {
        let mut seen = vec![0usize; num_nodes];
        for (gid, members) in graph.members.iter().enumerate() {
            for &node in members {
                assert_eq!(graph.group_of(node), gid);
                seen[node] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    /// Prim's algorithm as an independent reference for MST total weight.
    fn prim_total(num_nodes: usize, segments: &[Segment]) -> f32 {
        let mut in_tree = vec![false; num_nodes];
        let mut best = vec![f32::INFINITY; num_nodes];
        best[0] = 0.0;
        let mut total = 0.0;
        for _ in 0..num_nodes {
            let next = (0..num_nodes)
                .filter(|&n| !in_tree[n])
                .min_by(|&x, &y| best[x].total_cmp(&best[y]))
                .unwrap();
            in_tree[next] = true;
            total += best[next];
            for seg in segments {
                let other = if seg.a == next {
                    seg.b
                } else if seg.b == next {
                    seg.a
                } else {
                    continue;
                };
                if !in_tree[other] && seg.length < best[other] {
                    best[other] = seg.length;
                }
            }
        }
        total
    }

    #[test]
    fn test_new_graph_is_all_singletons() {
        let graph = DisjointGraph::new(5);
        assert_partition(&graph, 5);
        for node in 0..5 {
            assert_eq!(graph.group_len(node), 1);
        }
    }

    #[test]
    fn test_merge_folds_smaller_into_larger() {
        let mut graph = DisjointGraph::new(6);
        graph.merge(0, 1);
        graph.merge(0, 2);
        // {0,1,2} has the majority; merging in the singleton 5 must keep the
        // big group's id and relabel only node 5.
        let big = graph.group_of(0);
        graph.merge(5, 0);
        assert_eq!(graph.group_of(5), big);
        assert_eq!(graph.group_len(0), 4);
        assert_partition(&graph, 6);
    }

    #[test]
    fn test_search_three_edge_triangle() {
        // Edges (0,1) len 1, (1,2) len 2, (0,2) len 3: the first two span,
        // the third closes a cycle and is rejected.
        let segments = [
            Segment::new(0, 1, 1.0),
            Segment::new(1, 2, 2.0),
            Segment::new(0, 2, 3.0),
        ];
        let mut graph = DisjointGraph::new(3);
        let spanning = graph.search(&segments);
        assert_eq!(spanning, vec![segments[0], segments[1]]);
        assert_eq!(spanning.iter().map(|s| s.length).sum::<f32>(), 3.0);
        assert_eq!(graph.group_len(0), 3);
    }

    #[test]
    fn test_search_matches_prim_on_complete_graph() {
        let mut rng = LayoutRng::new(0x5EED);
        let n = 9;
        let mut segments = Vec::new();
        for a in 0..n {
            for b in (a + 1)..n {
                segments.push(Segment::new(a, b, rng.gen_range(1..1000) as f32));
            }
        }
        let reference = prim_total(n, &segments);

        segments.sort_by(|x, y| x.length.total_cmp(&y.length));
        let mut graph = DisjointGraph::new(n);
        let spanning = graph.search(&segments);
        assert_eq!(spanning.len(), n - 1);
        let total: f32 = spanning.iter().map(|s| s.length).sum();
        assert_eq!(total, reference);
        assert_partition(&graph, n);
    }

    #[test]
    fn test_search_on_disconnected_input_spans_each_component() {
        // Two separate triangles: 0-1-2 and 3-4-5. Kruskal can only accept
        // two edges per component.
        let mut segments = vec![
            Segment::new(0, 1, 1.0),
            Segment::new(1, 2, 2.0),
            Segment::new(0, 2, 5.0),
            Segment::new(3, 4, 3.0),
            Segment::new(4, 5, 4.0),
            Segment::new(3, 5, 6.0),
        ];
        segments.sort_by(|x, y| x.length.total_cmp(&y.length));
        let mut graph = DisjointGraph::new(6);
        let spanning = graph.search(&segments);
        assert_eq!(spanning.len(), 4);
        assert_ne!(graph.group_of(0), graph.group_of(3));
    }
}
