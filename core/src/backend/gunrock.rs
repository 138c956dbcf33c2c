use crate::accumulate::accumulate_vertices_levelwise;
use crate::graph::{Graph, VertexIndex};
use crate::traversal::ShortestPaths;

/// Raw (unscaled) single precision vertex dependencies.
///
/// Sources run one after another; each BFS level is expanded and
/// back-propagated in parallel.
pub fn vertex_scores(graph: &Graph, sources: &[VertexIndex]) -> Vec<f32> {
    let n = graph.node_count();
    let mut paths = ShortestPaths::with_capacity(n);
    let mut delta = vec![0.0f64; n];
    let mut scores = vec![0.0f32; n];

    for &source in sources {
        paths.compute_parallel(graph, source);
        accumulate_vertices_levelwise(graph, &paths, &mut delta, &mut scores);
    }
    scores
}
