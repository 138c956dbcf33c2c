use std::collections::HashSet;

use crate::config::DEFAULT_MEMORY_MB;
use crate::error::{CentralityError, Result};
use crate::renumber::{RenumberMap, Renumbering};

/// External vertex identifier, as supplied by the caller. May be sparse.
pub type VertexId = u64;

/// Dense internal vertex index in `[0, vertex_count)`.
pub type VertexIndex = u32;

/// Index into the graph's edge list.
pub type EdgeIndex = u32;

/// Whether edges are followed in one direction or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Directed,
    Undirected,
}

/// One adjacency entry: the vertex on the other end plus the edge it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: VertexIndex,
    pub edge: EdgeIndex,
}

/// Immutable in-memory graph over dense indices.
///
/// `outgoing[v]` holds the edges leaving v. For undirected graphs every edge is
/// stored in the adjacency of both endpoints under the same edge index, and
/// `incoming` is left empty (`neighbors_in` falls back to `outgoing`).
#[derive(Debug, Clone)]
pub struct Graph {
    kind: GraphKind,
    outgoing: Vec<Vec<Edge>>,
    incoming: Vec<Vec<Edge>>,
    edges: Vec<(VertexIndex, VertexIndex)>,
    renumbering: Renumbering,
}

impl Graph {
    pub fn builder(kind: GraphKind) -> GraphBuilder {
        GraphBuilder::new(kind)
    }

    /// Build directly from an `(from, to)` id list.
    ///
    /// With `renumber = false` the ids must already be dense; the vertex count is
    /// `max id + 1`.
    pub fn from_edge_list<I>(kind: GraphKind, edges: I, renumber: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let mut builder = GraphBuilder::new(kind).renumber(renumber);
        builder.load_edges(edges);
        builder.build()
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn is_directed(&self) -> bool {
        self.kind == GraphKind::Directed
    }

    pub fn renumbering(&self) -> &Renumbering {
        &self.renumbering
    }

    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges leaving `v` (both directions for undirected graphs).
    pub fn neighbors_out(&self, v: VertexIndex) -> &[Edge] {
        self.outgoing
            .get(v as usize)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    /// Edges entering `v`. Same as `neighbors_out` for undirected graphs.
    pub fn neighbors_in(&self, v: VertexIndex) -> &[Edge] {
        let side = match self.kind {
            GraphKind::Directed => &self.incoming,
            GraphKind::Undirected => &self.outgoing,
        };
        side.get(v as usize).map(|edges| edges.as_slice()).unwrap_or(&[])
    }

    /// Endpoints of an edge in internal indices, as originally loaded.
    pub fn edge_endpoints(&self, edge: EdgeIndex) -> (VertexIndex, VertexIndex) {
        self.edges[edge as usize]
    }

    pub fn external_id(&self, v: VertexIndex) -> VertexId {
        self.renumbering.external_id(v)
    }

    /// External ids in internal index order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.node_count() as VertexIndex).map(move |v| self.renumbering.external_id(v))
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let adjacency: usize = self
            .outgoing
            .iter()
            .chain(self.incoming.iter())
            .map(|v| v.len() * size_of::<Edge>() + size_of::<Vec<Edge>>())
            .sum();
        let edge_list = self.edges.len() * size_of::<(VertexIndex, VertexIndex)>();
        let index_mem = match &self.renumbering {
            Renumbering::Identity { .. } => 0,
            Renumbering::Map(map) => map.len() * (size_of::<VertexId>() * 2 + 16),
        };

        adjacency + edge_list + index_mem
    }
}

/// Bytes of per-vertex adjacency headers for `n` vertices.
fn adjacency_bytes(kind: GraphKind, n: usize) -> usize {
    let sides = match kind {
        GraphKind::Directed => 2,
        GraphKind::Undirected => 1,
    };
    n.saturating_mul(sides * std::mem::size_of::<Vec<Edge>>())
}

/// Collects vertices and edges, then produces an immutable [`Graph`].
///
/// Repeated edges are dropped: `(a, b)` twice on a directed graph, or `(a, b)`
/// and `(b, a)` on an undirected one, yield a single edge with the index of
/// the first occurrence.
pub struct GraphBuilder {
    kind: GraphKind,
    renumber: bool,
    memory_limit_mb: usize,
    vertices: Vec<VertexId>,
    edges: Vec<(VertexId, VertexId)>,
}

impl GraphBuilder {
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            renumber: true,
            memory_limit_mb: DEFAULT_MEMORY_MB,
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(kind: GraphKind, node_count: usize, edge_count: usize) -> Self {
        Self {
            kind,
            renumber: true,
            memory_limit_mb: DEFAULT_MEMORY_MB,
            vertices: Vec::with_capacity(node_count),
            edges: Vec::with_capacity(edge_count),
        }
    }

    /// Whether to renumber ids through a hash index (default) or treat them as
    /// dense indices.
    pub fn renumber(mut self, renumber: bool) -> Self {
        self.renumber = renumber;
        self
    }

    /// Cap on the per-vertex adjacency allocation made by `build`.
    ///
    /// Identity numbering allocates `max id + 1` slots, so a single sparse id
    /// can exceed it; `build` then fails with `ResourceLimit`.
    pub fn memory_limit_mb(mut self, limit_mb: usize) -> Self {
        self.memory_limit_mb = limit_mb;
        self
    }

    /// Declare a vertex, so isolated vertices are part of the graph.
    /// Declaring the same id twice fails at `build`.
    pub fn add_vertex(&mut self, id: VertexId) -> &mut Self {
        self.vertices.push(id);
        self
    }

    /// Add an edge. Endpoints that were not declared are added implicitly.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> &mut Self {
        self.edges.push((from, to));
        self
    }

    pub fn load_edges<I>(&mut self, edges: I) -> &mut Self
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        self.edges.extend(edges);
        self
    }

    pub fn build(self) -> Result<Graph> {
        let renumbering = if self.renumber {
            let mut map = RenumberMap::with_capacity(self.vertices.len());
            for &id in &self.vertices {
                map.insert_unique(id)?;
            }
            for &(from, to) in &self.edges {
                map.get_or_insert(from)?;
                map.get_or_insert(to)?;
            }
            Renumbering::Map(map)
        } else {
            let mut seen = HashSet::with_capacity(self.vertices.len());
            for &id in &self.vertices {
                if !seen.insert(id) {
                    return Err(CentralityError::DuplicateVertex(id));
                }
            }
            let max_id = self
                .vertices
                .iter()
                .copied()
                .chain(self.edges.iter().flat_map(|&(a, b)| [a, b]))
                .max();
            let vertex_count = match max_id {
                None => 0,
                Some(id) if id <= VertexIndex::MAX as VertexId - 1 => id as usize + 1,
                Some(id) => {
                    return Err(CentralityError::InvalidArgument(format!(
                        "vertex id {} exceeds the dense index range; enable renumbering",
                        id
                    )))
                }
            };
            Renumbering::Identity { vertex_count }
        };

        let n = renumbering.vertex_count();
        let required_mb = adjacency_bytes(self.kind, n).div_ceil(1024 * 1024);
        if required_mb > self.memory_limit_mb {
            return Err(CentralityError::ResourceLimit {
                required_mb,
                limit_mb: self.memory_limit_mb,
            });
        }
        if self.edges.len() > EdgeIndex::MAX as usize {
            return Err(CentralityError::InvalidArgument(format!(
                "graph exceeds {} edges",
                EdgeIndex::MAX
            )));
        }

        let mut outgoing: Vec<Vec<Edge>> = vec![Vec::new(); n];
        let mut incoming: Vec<Vec<Edge>> = match self.kind {
            GraphKind::Directed => vec![Vec::new(); n],
            GraphKind::Undirected => Vec::new(),
        };
        let mut edges = Vec::with_capacity(self.edges.len());
        let mut seen = HashSet::with_capacity(self.edges.len());

        for &(from, to) in &self.edges {
            let a = renumbering.index_of(from)?;
            let b = renumbering.index_of(to)?;
            let key = match self.kind {
                GraphKind::Directed => (a, b),
                GraphKind::Undirected => (a.min(b), a.max(b)),
            };
            if !seen.insert(key) {
                continue;
            }
            let edge = edges.len() as EdgeIndex;
            edges.push((a, b));
            outgoing[a as usize].push(Edge { target: b, edge });
            match self.kind {
                GraphKind::Directed => incoming[b as usize].push(Edge { target: a, edge }),
                GraphKind::Undirected => {
                    if a != b {
                        outgoing[b as usize].push(Edge { target: a, edge });
                    }
                }
            }
        }

        Ok(Graph {
            kind: self.kind,
            outgoing,
            incoming,
            edges,
            renumbering,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_counts() {
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1), (1, 2), (2, 0)], false).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert!(g.is_directed());
    }

    #[test]
    fn test_directed_adjacency() {
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1), (0, 2)], false).unwrap();
        assert_eq!(g.neighbors_out(0).len(), 2);
        assert_eq!(g.neighbors_out(1).len(), 0);
        assert_eq!(g.neighbors_in(1), &[Edge { target: 0, edge: 0 }]);
        assert_eq!(g.neighbors_in(2), &[Edge { target: 0, edge: 1 }]);
    }

    #[test]
    fn test_undirected_is_symmetrized() {
        let g = Graph::from_edge_list(GraphKind::Undirected, [(0, 1)], false).unwrap();
        assert_eq!(g.neighbors_out(0), &[Edge { target: 1, edge: 0 }]);
        assert_eq!(g.neighbors_out(1), &[Edge { target: 0, edge: 0 }]);
        assert_eq!(g.neighbors_in(1), g.neighbors_out(1));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_undirected_self_loop_stored_once() {
        let g = Graph::from_edge_list(GraphKind::Undirected, [(0, 0)], false).unwrap();
        assert_eq!(g.neighbors_out(0).len(), 1);
    }

    #[test]
    fn test_identity_counts_gaps_as_vertices() {
        // Ids 0 and 5 only: identity numbering still has 6 vertices.
        let g = Graph::from_edge_list(GraphKind::Undirected, [(0, 5)], false).unwrap();
        assert_eq!(g.node_count(), 6);
        assert!(g.neighbors_out(3).is_empty());
    }

    #[test]
    fn test_renumbered_sparse_ids() {
        let g = Graph::from_edge_list(GraphKind::Undirected, [(1000, 5), (5, 77)], true).unwrap();
        assert_eq!(g.node_count(), 3);
        assert!(g.renumbering().is_renumbered());
        let ids: Vec<VertexId> = g.vertex_ids().collect();
        assert_eq!(ids, vec![1000, 5, 77]);
        let (a, b) = g.edge_endpoints(1);
        assert_eq!((g.external_id(a), g.external_id(b)), (5, 77));
    }

    #[test]
    fn test_declared_isolated_vertex() {
        let mut b = Graph::builder(GraphKind::Undirected);
        b.add_vertex(42).add_edge(1, 2);
        let g = b.build().unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.renumbering().index_of(42).unwrap(), 0);
        assert!(g.neighbors_out(0).is_empty());
    }

    #[test]
    fn test_duplicate_declared_vertex_rejected() {
        let mut b = Graph::builder(GraphKind::Directed);
        b.add_vertex(3).add_vertex(3);
        assert_eq!(b.build().unwrap_err(), CentralityError::DuplicateVertex(3));

        let mut b = Graph::builder(GraphKind::Directed).renumber(false);
        b.add_vertex(3).add_vertex(3);
        assert_eq!(b.build().unwrap_err(), CentralityError::DuplicateVertex(3));
    }

    #[test]
    fn test_repeated_edges_collapse() {
        let g = Graph::from_edge_list(GraphKind::Undirected, [(0, 1), (1, 0), (0, 1), (1, 2)], false)
            .unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.neighbors_out(1), &[Edge { target: 0, edge: 0 }, Edge { target: 2, edge: 1 }]);
        assert_eq!(g.edge_endpoints(1), (1, 2));

        // Opposite directions are distinct directed edges.
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1), (1, 0), (0, 1)], false).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.neighbors_out(0).len(), 1);
    }

    #[test]
    fn test_identity_sparse_id_hits_memory_cap() {
        let err = Graph::from_edge_list(GraphKind::Directed, [(0, 4_000_000_000)], false).unwrap_err();
        assert!(matches!(err, CentralityError::ResourceLimit { limit_mb: 4096, .. }));

        let mut b = Graph::builder(GraphKind::Undirected).renumber(false).memory_limit_mb(1);
        b.add_edge(0, 1_000_000);
        assert!(matches!(b.build(), Err(CentralityError::ResourceLimit { limit_mb: 1, .. })));
    }

    #[test]
    fn test_identity_rejects_huge_ids() {
        let err = Graph::from_edge_list(GraphKind::Directed, [(0, u64::MAX)], false).unwrap_err();
        assert!(matches!(err, CentralityError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_graph() {
        let g = Graph::builder(GraphKind::Undirected).build().unwrap();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.neighbors_out(0).is_empty());
    }

    #[test]
    fn test_memory_usage_nonzero() {
        let g = Graph::from_edge_list(GraphKind::Directed, [(0, 1), (1, 2)], true).unwrap();
        assert!(g.memory_usage() > 0);
    }
}
