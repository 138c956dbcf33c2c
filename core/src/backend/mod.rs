//! Execution strategies behind the two implementation names.
//!
//! `default` runs one traversal per worker and parallelizes across sources.
//! `gunrock` runs one source at a time and parallelizes inside each BFS level.

pub mod default;
pub mod gunrock;

use std::mem::size_of;

use crate::config::EngineConfig;
use crate::error::{CentralityError, Result};
use crate::graph::{Graph, GraphKind};
use crate::options::Implementation;
use crate::traversal::Predecessor;

/// Rough working-memory need of one computation, in bytes.
///
/// Counts per-worker traversal state (distances, path counts, predecessor
/// lists, visit order, dependencies) plus one accumulator per worker and the
/// reduced result. The default strategy caps its fold splits at the worker
/// count, so there is at most one accumulator per worker.
pub fn estimate_working_memory(
    graph: &Graph,
    implementation: Implementation,
    accumulator_len: usize,
    source_count: usize,
    config: &EngineConfig,
) -> usize {
    let n = graph.node_count();
    let adjacency_entries = match graph.kind() {
        GraphKind::Directed => graph.edge_count(),
        GraphKind::Undirected => graph.edge_count() * 2,
    };
    let per_vertex = size_of::<u32>()
        + size_of::<f64>() * 2
        + size_of::<Vec<Predecessor>>()
        + size_of::<u32>();
    let traversal = n * per_vertex + adjacency_entries * size_of::<Predecessor>();

    match implementation {
        Implementation::Default => {
            let workers = config.worker_count().min(source_count.max(1));
            workers * (traversal + accumulator_len * size_of::<f64>())
                + accumulator_len * size_of::<f64>()
        }
        Implementation::Gunrock => {
            traversal + n * size_of::<u32>() * 2 + accumulator_len * size_of::<f32>()
        }
    }
}

/// Fail before traversal if the estimate exceeds `max_memory_mb`.
pub fn check_memory(
    graph: &Graph,
    implementation: Implementation,
    accumulator_len: usize,
    source_count: usize,
    config: &EngineConfig,
) -> Result<()> {
    let bytes =
        estimate_working_memory(graph, implementation, accumulator_len, source_count, config);
    let required_mb = bytes.div_ceil(1024 * 1024);
    if required_mb > config.max_memory_mb {
        return Err(CentralityError::ResourceLimit {
            required_mb,
            limit_mb: config.max_memory_mb,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_scales_with_workers() {
        let g = Graph::from_edge_list(GraphKind::Undirected, (0..99).map(|i| (i, i + 1)), false)
            .unwrap();
        let one = EngineConfig {
            num_threads: Some(1),
            ..Default::default()
        };
        let four = EngineConfig {
            num_threads: Some(4),
            ..Default::default()
        };
        let a = estimate_working_memory(&g, Implementation::Default, 100, 100, &one);
        let b = estimate_working_memory(&g, Implementation::Default, 100, 100, &four);
        assert!(b > a);
        // Never more workers than sources.
        let c = estimate_working_memory(&g, Implementation::Default, 100, 1, &four);
        assert_eq!(a, c);
    }

    #[test]
    fn test_small_graph_fits() {
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1), (1, 2)], false).unwrap();
        assert!(check_memory(&g, Implementation::Gunrock, 3, 3, &EngineConfig::default()).is_ok());
    }
}
