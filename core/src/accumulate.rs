//! Dependency back-propagation and score scaling.

use rayon::prelude::*;
use tracing::warn;

use crate::graph::{Graph, GraphKind};
use crate::traversal::ShortestPaths;

/// Push dependencies from each vertex to its predecessors, in decreasing
/// distance order, and add every non-source dependency to `centrality`.
///
/// `delta` must be all zeros on entry and is left all zeros on return.
pub fn accumulate_vertices(paths: &ShortestPaths, delta: &mut [f64], centrality: &mut [f64]) {
    for &w in paths.order.iter().rev() {
        let w = w as usize;
        let coeff = (1.0 + delta[w]) / paths.sigma[w];
        for p in &paths.predecessors[w] {
            let v = p.vertex as usize;
            delta[v] += paths.sigma[v] * coeff;
        }
        if w != paths.source as usize {
            centrality[w] += delta[w];
        }
    }
    clear(paths, delta);
}

/// Same back-propagation, but each contribution is credited to the edge it
/// flows over instead of to the vertex.
pub fn accumulate_edges(paths: &ShortestPaths, delta: &mut [f64], centrality: &mut [f64]) {
    for &w in paths.order.iter().rev() {
        let w = w as usize;
        let coeff = (1.0 + delta[w]) / paths.sigma[w];
        for p in &paths.predecessors[w] {
            let v = p.vertex as usize;
            let c = paths.sigma[v] * coeff;
            delta[v] += c;
            centrality[p.edge as usize] += c;
        }
    }
    clear(paths, delta);
}

/// Level-by-level back-propagation where each vertex pulls its dependency
/// from its successors. Vertices of one level are processed in parallel and
/// each one writes only its own slot.
pub fn accumulate_vertices_levelwise(
    graph: &Graph,
    paths: &ShortestPaths,
    delta: &mut [f64],
    centrality: &mut [f32],
) {
    let depth = paths.depth();
    for d in (0..depth).rev() {
        let level = paths.level(d);
        let next = d as u32 + 1;
        let shared: &[f64] = &*delta;
        let pulled: Vec<f64> = level
            .par_iter()
            .map(|&v| {
                let sigma_v = paths.sigma[v as usize];
                graph
                    .neighbors_out(v)
                    .iter()
                    .filter(|e| paths.distance[e.target as usize] == next)
                    .map(|e| {
                        let w = e.target as usize;
                        sigma_v / paths.sigma[w] * (1.0 + shared[w])
                    })
                    .sum::<f64>()
            })
            .collect();

        for (&v, dep) in level.iter().zip(pulled) {
            delta[v as usize] = dep;
            if v != paths.source {
                centrality[v as usize] += dep as f32;
            }
        }
    }
    clear(paths, delta);
}

fn clear(paths: &ShortestPaths, delta: &mut [f64]) {
    for &v in &paths.order {
        delta[v as usize] = 0.0;
    }
}

/// Element-wise sum of two accumulators of equal length.
pub fn merge(mut a: Vec<f64>, b: Vec<f64>) -> Vec<f64> {
    for (x, y) in a.iter_mut().zip(b) {
        *x += y;
    }
    a
}

/// What the scores are attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Vertices,
    Edges,
}

/// Scaling applied to raw accumulated dependencies.
#[derive(Debug, Clone, Copy)]
pub struct Normalization {
    pub kind: GraphKind,
    pub target: Target,
    pub vertex_count: usize,
    pub normalized: bool,
    /// Number of sources when only a subset of vertices seeded traversals.
    pub sampled_sources: Option<usize>,
}

impl Normalization {
    /// Combined multiplier for every score.
    ///
    /// Undirected traversals see each unordered pair from both ends, so raw
    /// sums are halved first. Normalization divides by the number of pairs a
    /// vertex (or edge) could lie between; sampled runs are then scaled up by
    /// `n / k`.
    pub fn factor(&self) -> f64 {
        let n = self.vertex_count as f64;
        let mut factor = match self.kind {
            GraphKind::Undirected => 0.5,
            GraphKind::Directed => 1.0,
        };
        if !self.normalized {
            return factor;
        }

        let pair_scale = match self.kind {
            GraphKind::Undirected => 2.0,
            GraphKind::Directed => 1.0,
        };
        match self.target {
            Target::Vertices if self.vertex_count > 2 => {
                factor *= pair_scale / ((n - 1.0) * (n - 2.0));
            }
            Target::Edges if self.vertex_count > 1 => {
                factor *= pair_scale / (n * (n - 1.0));
            }
            target => {
                warn!(
                    scores_for = ?target,
                    vertices = self.vertex_count,
                    "graph too small to normalize, returning raw scores"
                );
            }
        }

        if let Some(k) = self.sampled_sources.filter(|&k| k > 0) {
            factor *= n / k as f64;
        }
        factor
    }

    pub fn apply(&self, scores: &mut [f64]) {
        let factor = self.factor();
        if factor != 1.0 {
            scores.iter_mut().for_each(|s| *s *= factor);
        }
    }

    pub fn apply_f32(&self, scores: &mut [f32]) {
        let factor = self.factor();
        if factor != 1.0 {
            scores.iter_mut().for_each(|s| *s = (*s as f64 * factor) as f32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::shortest_paths;

    fn norm(kind: GraphKind, target: Target, n: usize, normalized: bool) -> Normalization {
        Normalization {
            kind,
            target,
            vertex_count: n,
            normalized,
            sampled_sources: None,
        }
    }

    #[test]
    fn test_path_single_source() {
        // 0 - 1 - 2 - 3 from source 0: vertex 1 carries paths to 2 and 3,
        // vertex 2 carries the path to 3.
        let g = Graph::from_edge_list(GraphKind::Undirected, [(0, 1), (1, 2), (2, 3)], false).unwrap();
        let sp = shortest_paths(&g, 0);
        let mut delta = vec![0.0; 4];
        let mut bc = vec![0.0; 4];
        accumulate_vertices(&sp, &mut delta, &mut bc);
        assert_eq!(bc, vec![0.0, 2.0, 1.0, 0.0]);
        assert!(delta.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_diamond_splits_dependency() {
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1), (0, 2), (1, 3), (2, 3)], false).unwrap();
        let sp = shortest_paths(&g, 0);
        let mut delta = vec![0.0; 4];
        let mut bc = vec![0.0; 4];
        accumulate_vertices(&sp, &mut delta, &mut bc);
        assert_eq!(bc, vec![0.0, 0.5, 0.5, 0.0]);

        let mut ebc = vec![0.0; 4];
        accumulate_edges(&sp, &mut delta, &mut ebc);
        // Edges out of the source carry 1 (own endpoint) + 0.5 (half of 3).
        assert_eq!(ebc, vec![1.5, 1.5, 0.5, 0.5]);
    }

    #[test]
    fn test_levelwise_matches_push() {
        let edges = [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (2, 5), (5, 4), (4, 6)];
        for kind in [GraphKind::Directed, GraphKind::Undirected] {
            let g = Graph::from_edge_list(kind, edges, false).unwrap();
            let mut delta = vec![0.0; 7];
            let mut push = vec![0.0f64; 7];
            let mut pull = vec![0.0f32; 7];
            for s in 0..7 {
                let sp = shortest_paths(&g, s);
                accumulate_vertices(&sp, &mut delta, &mut push);
                accumulate_vertices_levelwise(&g, &sp, &mut delta, &mut pull);
            }
            for (a, b) in push.iter().zip(&pull) {
                assert!((a - *b as f64).abs() < 1e-5, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_merge() {
        assert_eq!(merge(vec![1.0, 2.0], vec![0.5, 0.5]), vec![1.5, 2.5]);
    }

    #[test]
    fn test_factor_unnormalized() {
        assert_eq!(norm(GraphKind::Undirected, Target::Vertices, 5, false).factor(), 0.5);
        assert_eq!(norm(GraphKind::Directed, Target::Vertices, 5, false).factor(), 1.0);
    }

    #[test]
    fn test_factor_normalized_vertices() {
        // Undirected: 0.5 * 2 / (4 * 3)
        let f = norm(GraphKind::Undirected, Target::Vertices, 5, true).factor();
        assert!((f - 1.0 / 12.0).abs() < 1e-12);
        let f = norm(GraphKind::Directed, Target::Vertices, 5, true).factor();
        assert!((f - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_factor_normalized_edges() {
        let f = norm(GraphKind::Undirected, Target::Edges, 4, true).factor();
        assert!((f - 1.0 / 12.0).abs() < 1e-12);
        let f = norm(GraphKind::Directed, Target::Edges, 4, true).factor();
        assert!((f - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_factor_sampled() {
        let mut n = norm(GraphKind::Directed, Target::Vertices, 10, true);
        n.sampled_sources = Some(5);
        let f = n.factor();
        assert!((f - 2.0 / 72.0).abs() < 1e-12);

        // Sampling scale only applies together with normalization.
        n.normalized = false;
        assert_eq!(n.factor(), 1.0);
    }

    #[test]
    fn test_factor_tiny_graph_skips_normalization() {
        assert_eq!(norm(GraphKind::Directed, Target::Vertices, 2, true).factor(), 1.0);
        assert_eq!(norm(GraphKind::Undirected, Target::Edges, 1, true).factor(), 0.5);
    }

    #[test]
    fn test_apply() {
        let mut scores = vec![2.0, 4.0];
        norm(GraphKind::Undirected, Target::Vertices, 3, false).apply(&mut scores);
        assert_eq!(scores, vec![1.0, 2.0]);

        let mut scores = vec![2.0f32, 4.0];
        norm(GraphKind::Undirected, Target::Vertices, 3, false).apply_f32(&mut scores);
        assert_eq!(scores, vec![1.0, 2.0]);
    }
}
