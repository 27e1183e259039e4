use rayon::prelude::*;

use crate::geom::{AdjacencyRule, SpatialIndex};

/// An unweighted, undirected adjacency graph in compressed sparse row format.
/// Vertex `i` is the `i`-th eligible record in id order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectivityGraph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
}

impl ConnectivityGraph {
    /// Construct a graph from per-vertex neighbor lists.
    pub fn new(num_nodes: usize, edges: &[Vec<u32>]) -> Self {
        assert!(edges.len() == num_nodes, "edges.len() must equal num_nodes");

        Self {
            size: num_nodes,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| { *acc += len; Some(*acc) })
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
        }
    }

    /// Build the graph over `geometries` with `rule`.
    ///
    /// Candidate pairs come from an R-tree over envelopes grown by the rule's
    /// reach, so the predicate only runs on nearby pairs. Candidates are
    /// evaluated in parallel but collected per vertex in index order and every
    /// neighbor list is sorted, so the edge set does not depend on scheduling.
    pub fn build<R: AdjacencyRule>(rule: &R, geometries: &[&R::Geometry]) -> Self {
        let bounds = geometries.iter().map(|g| rule.bounds(g)).collect::<Vec<_>>();
        let index = SpatialIndex::new(&bounds);
        let reach = rule.reach();

        let forward = (0..geometries.len()).into_par_iter()
            .map(|i| {
                let Some(rect) = bounds[i] else { return Vec::new() };
                index.within(&rect, reach).into_iter()
                    .filter(|&j| j > i && rule.is_adjacent(geometries[i], geometries[j]))
                    .map(|j| j as u32)
                    .collect::<Vec<u32>>()
            })
            .collect::<Vec<_>>();

        let mut lists = vec![Vec::new(); geometries.len()];
        for (i, neighbors) in forward.iter().enumerate() {
            for &j in neighbors {
                lists[i].push(j);
                lists[j as usize].push(i as u32);
            }
        }
        lists.iter_mut().for_each(|list| list.sort_unstable());

        Self::new(geometries.len(), &lists)
    }

    /// Get the number of vertices in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of directed edge entries (twice the undirected count).
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the neighbors of a given node, in ascending order.
    #[inline]
    pub fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, LineString, Point};

    use crate::geom::{PointRule, SegmentRule};

    fn make_test_graph() -> ConnectivityGraph {
        ConnectivityGraph::new(
            4,
            &[
                vec![1, 2],       // 0
                vec![0, 2],       // 1
                vec![0, 1, 3],    // 2
                vec![2],          // 3
            ],
        )
    }

    #[test]
    fn csr_graph_construction() {
        let graph = make_test_graph();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 8);
        assert_eq!(graph.offsets, vec![0, 2, 4, 7, 8]);
        assert_eq!(graph.edges, vec![1, 2, 0, 2, 0, 1, 3, 2]);

        for window in graph.offsets.windows(2) { assert!(window[0] <= window[1]) }
    }

    #[test]
    fn degree_and_neighbors() {
        let graph = make_test_graph();
        assert_eq!(graph.degree(2), 3);
        assert_eq!(graph.degree(3), 1);
        assert_eq!(graph.edges(2).collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = ConnectivityGraph::new(0, &[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.offsets, vec![0]);
    }

    #[test]
    #[should_panic(expected = "edges.len() must equal num_nodes")]
    fn new_panics_when_edges_len_mismatch() {
        ConnectivityGraph::new(0, &[vec![]]);
    }

    #[test]
    fn build_point_graph_is_symmetric_without_self_edges() {
        let points: Vec<Point<f64>> = vec![
            point!(x: 0.0, y: 0.0),
            point!(x: 20.0, y: 0.0),
            point!(x: 45.0, y: 0.0),
            point!(x: 1000.0, y: 1000.0),
        ];
        let refs = points.iter().collect::<Vec<_>>();
        let graph = ConnectivityGraph::build(&PointRule { d_max: 30.0, n_min: 3 }, &refs);

        assert_eq!(graph.edges(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.edges(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(graph.edges(2).collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.degree(3), 0);
        for u in 0..graph.node_count() {
            assert!(graph.edges(u).all(|v| v != u));
            assert!(graph.edges(u).all(|v| graph.edges(v).any(|w| w == u)));
        }
    }

    #[test]
    fn build_is_deterministic() {
        let lines: Vec<LineString<f64>> = (0..40)
            .map(|k| {
                let x = (k % 8) as f64 * 50.0;
                let y = (k / 8) as f64 * 50.0;
                line_string![(x: x, y: y), (x: x + 45.0, y: y)]
            })
            .collect();
        let refs = lines.iter().collect::<Vec<_>>();
        let rule = SegmentRule { tolerance: 10.0, min_length_m: 200.0 };

        let first = ConnectivityGraph::build(&rule, &refs);
        for _ in 0..5 {
            assert_eq!(ConnectivityGraph::build(&rule, &refs), first);
        }
        // Each row of 8 lines chains with 5 m gaps; rows are 50 m apart.
        assert_eq!(first.degree(0), 1);
        assert_eq!(first.degree(1), 2);
    }
}
