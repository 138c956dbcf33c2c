use rayon::prelude::*;

use crate::accumulate::{self, accumulate_edges, accumulate_vertices};
use crate::graph::{Graph, VertexIndex};
use crate::traversal::ShortestPaths;

/// Per-worker scratch state, reused across every source the worker picks up.
struct Worker {
    paths: ShortestPaths,
    delta: Vec<f64>,
    scores: Vec<f64>,
}

impl Worker {
    fn new(node_count: usize, accumulator_len: usize) -> Self {
        Self {
            paths: ShortestPaths::with_capacity(node_count),
            delta: vec![0.0; node_count],
            scores: vec![0.0; accumulator_len],
        }
    }
}

/// Smallest share of sources one fold split may take, so that the number of
/// splits (and accumulators) never exceeds `workers`.
fn split_len(source_count: usize, workers: usize) -> usize {
    source_count.div_ceil(workers.max(1)).max(1)
}

/// Fold sources into per-split accumulators, then sum the accumulators.
fn run<F>(graph: &Graph, sources: &[VertexIndex], accumulator_len: usize, accumulate: F) -> Vec<f64>
where
    F: Fn(&ShortestPaths, &mut [f64], &mut [f64]) + Sync,
{
    let n = graph.node_count();
    let min_len = split_len(sources.len(), rayon::current_num_threads());
    sources
        .par_iter()
        .with_min_len(min_len)
        .fold(
            || Worker::new(n, accumulator_len),
            |mut worker, &source| {
                worker.paths.compute(graph, source);
                accumulate(&worker.paths, &mut worker.delta, &mut worker.scores);
                worker
            },
        )
        .map(|worker| worker.scores)
        .reduce(|| vec![0.0; accumulator_len], accumulate::merge)
}

/// Raw (unscaled) vertex dependencies summed over `sources`.
pub fn vertex_scores(graph: &Graph, sources: &[VertexIndex]) -> Vec<f64> {
    run(graph, sources, graph.node_count(), accumulate_vertices)
}

/// Raw (unscaled) edge dependencies summed over `sources`, indexed by edge.
pub fn edge_scores(graph: &Graph, sources: &[VertexIndex]) -> Vec<f64> {
    run(graph, sources, graph.edge_count(), accumulate_edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphKind;

    #[test]
    fn test_chain_vertex_scores() {
        // Directed 0 -> 1 -> 2 -> 3: 1 lies on 0->2, 0->3; 2 lies on 0->3, 1->3.
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1), (1, 2), (2, 3)], false).unwrap();
        let scores = vertex_scores(&g, &[0, 1, 2, 3]);
        assert_eq!(scores, vec![0.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn test_chain_edge_scores() {
        // Edge (i, i+1) carries every pair (a, b) with a <= i < b.
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1), (1, 2), (2, 3)], false).unwrap();
        let scores = edge_scores(&g, &[0, 1, 2, 3]);
        assert_eq!(scores, vec![3.0, 4.0, 3.0]);
    }

    #[test]
    fn test_split_count_bounded_by_workers() {
        for (sources, workers) in [(0, 4), (1, 4), (7, 4), (100, 8), (1000, 3), (5, 1)] {
            let len = split_len(sources, workers);
            assert!(len >= 1);
            assert!(sources.div_ceil(len) <= workers, "{} sources on {} workers", sources, workers);
        }
    }

    #[test]
    fn test_no_sources() {
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1)], false).unwrap();
        assert_eq!(vertex_scores(&g, &[]), vec![0.0, 0.0]);
        assert_eq!(edge_scores(&g, &[]), vec![0.0]);
    }

    #[test]
    fn test_repeated_source_counts_twice() {
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1), (1, 2)], false).unwrap();
        assert_eq!(vertex_scores(&g, &[0, 0]), vec![0.0, 2.0, 0.0]);
    }
}
