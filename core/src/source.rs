use rand::Rng;

use crate::error::Result;
use crate::graph::{Graph, VertexId, VertexIndex};
use crate::options::SourceSpec;
use crate::sampler;

/// Resolved BFS roots for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    pub indices: Vec<VertexIndex>,
    /// True when the roots are a sample or caller list rather than every vertex.
    pub subset: bool,
}

impl SourceSet {
    pub fn all(graph: &Graph) -> Self {
        Self {
            indices: (0..graph.node_count() as VertexIndex).collect(),
            subset: false,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Source count to scale sampled estimates by, if any.
    pub fn sampled_count(&self) -> Option<usize> {
        self.subset.then_some(self.indices.len())
    }
}

/// Resolve a source spec. `seed` only matters for `SampleCount`.
pub fn resolve_sources(graph: &Graph, spec: &SourceSpec, seed: Option<u64>) -> Result<SourceSet> {
    match spec {
        SourceSpec::AllVertices => Ok(SourceSet::all(graph)),
        SourceSpec::SampleCount(k) => sampled(graph, *k, &mut sampler::rng_for_seed(seed)),
        SourceSpec::ExplicitList(ids) => listed(graph, ids),
    }
}

/// Resolve a source spec drawing samples from a caller-owned generator.
pub fn resolve_sources_with_rng<R: Rng + ?Sized>(
    graph: &Graph,
    spec: &SourceSpec,
    rng: &mut R,
) -> Result<SourceSet> {
    match spec {
        SourceSpec::AllVertices => Ok(SourceSet::all(graph)),
        SourceSpec::SampleCount(k) => sampled(graph, *k, rng),
        SourceSpec::ExplicitList(ids) => listed(graph, ids),
    }
}

fn sampled<R: Rng + ?Sized>(graph: &Graph, k: u64, rng: &mut R) -> Result<SourceSet> {
    Ok(SourceSet {
        indices: sampler::sample_sources(graph.node_count(), k, rng)?,
        subset: true,
    })
}

fn listed(graph: &Graph, ids: &[VertexId]) -> Result<SourceSet> {
    Ok(SourceSet {
        indices: graph.renumbering().translate(ids)?,
        subset: true,
    })
}
