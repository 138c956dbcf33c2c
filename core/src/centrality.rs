use std::time::Instant;

use tracing::info;

use crate::accumulate::{Normalization, Target};
use crate::backend::{self, default, gunrock};
use crate::config::EngineConfig;
use crate::dispatch;
use crate::error::Result;
use crate::graph::Graph;
use crate::options::{BetweennessOptions, EdgeBetweennessOptions, Implementation};
use crate::result::{EdgeCentralityTable, ScoreColumn, VertexCentralityTable};
use crate::source::resolve_sources;

/// Vertex betweenness centrality with the default engine configuration.
///
/// With `SourceSpec::AllVertices` the scores are exact. With a sample or an
/// explicit source list they are estimates; when normalized they are scaled
/// by `n / k`. Summation order across workers is not fixed, so repeated runs
/// may differ in the low-order bits.
pub fn betweenness_centrality(
    graph: &Graph,
    options: &BetweennessOptions,
) -> Result<VertexCentralityTable> {
    betweenness_centrality_with(graph, options, &EngineConfig::default())
}

pub fn betweenness_centrality_with(
    graph: &Graph,
    options: &BetweennessOptions,
    config: &EngineConfig,
) -> Result<VertexCentralityTable> {
    config.validate()?;
    let plan = dispatch::plan_vertex(options)?;
    let sources = resolve_sources(graph, &options.sources, options.seed)?;
    backend::check_memory(
        graph,
        plan.implementation,
        graph.node_count(),
        sources.len(),
        config,
    )?;

    let normalization = Normalization {
        kind: graph.kind(),
        target: Target::Vertices,
        vertex_count: graph.node_count(),
        normalized: options.normalized,
        sampled_sources: sources.sampled_count(),
    };

    let start = Instant::now();
    let scores = config.install(|| match plan.implementation {
        Implementation::Default => {
            let mut raw = default::vertex_scores(graph, &sources.indices);
            normalization.apply(&mut raw);
            ScoreColumn::from_f64(raw, plan.result_dtype)
        }
        Implementation::Gunrock => {
            let mut raw = gunrock::vertex_scores(graph, &sources.indices);
            normalization.apply_f32(&mut raw);
            ScoreColumn::Float32(raw)
        }
    })?;

    info!(
        implementation = %plan.implementation,
        sources = sources.len(),
        vertices = graph.node_count(),
        edges = graph.edge_count(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "betweenness centrality computed"
    );

    Ok(VertexCentralityTable {
        vertex: graph.vertex_ids().collect(),
        betweenness_centrality: scores,
    })
}

/// Edge betweenness centrality with the default engine configuration.
///
/// One row per loaded edge; on undirected graphs an edge's score covers both
/// traversal directions.
pub fn edge_betweenness_centrality(
    graph: &Graph,
    options: &EdgeBetweennessOptions,
) -> Result<EdgeCentralityTable> {
    edge_betweenness_centrality_with(graph, options, &EngineConfig::default())
}

pub fn edge_betweenness_centrality_with(
    graph: &Graph,
    options: &EdgeBetweennessOptions,
    config: &EngineConfig,
) -> Result<EdgeCentralityTable> {
    config.validate()?;
    let plan = dispatch::plan_edge(options)?;
    let sources = resolve_sources(graph, &options.sources, options.seed)?;
    backend::check_memory(
        graph,
        plan.implementation,
        graph.edge_count(),
        sources.len(),
        config,
    )?;

    let normalization = Normalization {
        kind: graph.kind(),
        target: Target::Edges,
        vertex_count: graph.node_count(),
        normalized: options.normalized,
        sampled_sources: sources.sampled_count(),
    };

    let start = Instant::now();
    let scores = config.install(|| {
        let mut raw = default::edge_scores(graph, &sources.indices);
        normalization.apply(&mut raw);
        ScoreColumn::from_f64(raw, plan.result_dtype)
    })?;

    info!(
        implementation = %plan.implementation,
        sources = sources.len(),
        vertices = graph.node_count(),
        edges = graph.edge_count(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "edge betweenness centrality computed"
    );

    let (src, dst) = (0..graph.edge_count() as u32)
        .map(|e| {
            let (a, b) = graph.edge_endpoints(e);
            (graph.external_id(a), graph.external_id(b))
        })
        .unzip();

    Ok(EdgeCentralityTable {
        src,
        dst,
        edge_betweenness_centrality: scores,
        directed: graph.is_directed(),
    })
}
