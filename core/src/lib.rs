//! centrality-accel-core: Betweenness centrality over in-memory graphs.
//!
//! A pure Rust library that loads an edge list into an adjacency structure
//! (renumbering external vertex ids to dense indices when asked) and computes
//! vertex and edge betweenness with Brandes' algorithm. Scores can be exact
//! (every vertex is a source) or estimated from a random or caller-chosen
//! subset of sources.
//!
//! Two execution strategies are available by name: `"default"` parallelizes
//! across sources, `"gunrock"` parallelizes inside each BFS level and
//! produces single precision scores.

mod accumulate;
mod backend;
mod centrality;
mod config;
mod dispatch;
mod error;
mod graph;
mod options;
mod renumber;
mod result;
mod sampler;
mod source;
mod traversal;

pub use backend::{check_memory, estimate_working_memory};
pub use centrality::{
    betweenness_centrality, betweenness_centrality_with, edge_betweenness_centrality,
    edge_betweenness_centrality_with,
};
pub use config::{EngineConfig, DEFAULT_MEMORY_MB, MAX_MEMORY_MB, MIN_MEMORY_MB};
pub use dispatch::{plan_edge, plan_vertex, ExecutionPlan};
pub use error::{CentralityError, Result};
pub use graph::{
    Edge, EdgeIndex, Graph, GraphBuilder, GraphKind, VertexId, VertexIndex,
};
pub use options::{
    BetweennessOptions, BetweennessRequest, EdgeBetweennessOptions, EdgeBetweennessRequest,
    Implementation, ResultDtype, SourceArg, SourceSpec,
};
pub use renumber::{RenumberMap, Renumbering};
pub use result::{EdgeCentralityTable, EdgeScore, ScoreColumn, VertexCentralityTable, VertexScore};
pub use sampler::{rng_for_seed, sample_sources};
pub use source::{resolve_sources, resolve_sources_with_rng, SourceSet};
pub use traversal::{shortest_paths, Predecessor, ShortestPaths, UNREACHED};
