use rayon::prelude::*;

use crate::graph::{EdgeIndex, Graph, VertexIndex};

/// Distance marker for vertices the current traversal has not reached.
pub const UNREACHED: u32 = u32::MAX;

/// A vertex one hop closer to the source on some shortest path, plus the
/// edge that links them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predecessor {
    pub vertex: VertexIndex,
    pub edge: EdgeIndex,
}

/// Shortest path counts from one source.
///
/// The buffers are sized for the whole graph and reused across sources;
/// `compute` only resets the entries the previous traversal touched.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    pub source: VertexIndex,
    /// Hops from the source, `UNREACHED` if not reachable.
    pub distance: Vec<u32>,
    /// Number of distinct shortest paths from the source. Zero if unreachable.
    pub sigma: Vec<f64>,
    pub predecessors: Vec<Vec<Predecessor>>,
    /// Reached vertices in non-decreasing distance order.
    pub order: Vec<VertexIndex>,
    /// `order[level_offsets[d]..level_offsets[d + 1]]` are the vertices at distance `d`.
    pub level_offsets: Vec<usize>,
}

impl ShortestPaths {
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            source: 0,
            distance: vec![UNREACHED; node_count],
            sigma: vec![0.0; node_count],
            predecessors: vec![Vec::new(); node_count],
            order: Vec::with_capacity(node_count),
            level_offsets: Vec::new(),
        }
    }

    pub fn is_reachable(&self, v: VertexIndex) -> bool {
        self.distance
            .get(v as usize)
            .map_or(false, |&d| d != UNREACHED)
    }

    /// Number of vertices reached, the source included.
    pub fn reached(&self) -> usize {
        self.order.len()
    }

    /// Number of BFS levels, the source level included.
    pub fn depth(&self) -> usize {
        self.level_offsets.len().saturating_sub(1)
    }

    /// Vertices at distance `d`.
    pub fn level(&self, d: usize) -> &[VertexIndex] {
        &self.order[self.level_offsets[d]..self.level_offsets[d + 1]]
    }

    fn reset(&mut self, source: VertexIndex) {
        for &v in &self.order {
            let v = v as usize;
            self.distance[v] = UNREACHED;
            self.sigma[v] = 0.0;
            self.predecessors[v].clear();
        }
        self.order.clear();
        self.level_offsets.clear();
        self.source = source;
    }

    /// Level-synchronous BFS from `source`, one worker.
    ///
    /// A source outside the graph leaves nothing reached.
    pub fn compute(&mut self, graph: &Graph, source: VertexIndex) {
        self.reset(source);
        if source as usize >= graph.node_count() {
            return;
        }

        self.distance[source as usize] = 0;
        self.sigma[source as usize] = 1.0;
        self.order.push(source);
        self.level_offsets.push(0);

        let mut level_start = 0;
        let mut depth = 0u32;
        while level_start < self.order.len() {
            let level_end = self.order.len();
            self.level_offsets.push(level_end);

            for i in level_start..level_end {
                let v = self.order[i];
                let sigma_v = self.sigma[v as usize];
                for edge in graph.neighbors_out(v) {
                    let w = edge.target as usize;
                    if self.distance[w] == UNREACHED {
                        self.distance[w] = depth + 1;
                        self.order.push(edge.target);
                    }
                    if self.distance[w] == depth + 1 {
                        self.sigma[w] += sigma_v;
                        self.predecessors[w].push(Predecessor {
                            vertex: v,
                            edge: edge.edge,
                        });
                    }
                }
            }

            level_start = level_end;
            depth += 1;
        }
    }

    /// Level-synchronous BFS from `source` with each level expanded in parallel.
    ///
    /// Discovery scans the frontier in parallel. Path counts and predecessors of
    /// each newly reached vertex are then pulled from its in-neighbors, so every
    /// vertex is written by exactly one worker.
    pub fn compute_parallel(&mut self, graph: &Graph, source: VertexIndex) {
        self.reset(source);
        if source as usize >= graph.node_count() {
            return;
        }

        self.distance[source as usize] = 0;
        self.sigma[source as usize] = 1.0;
        self.order.push(source);
        self.level_offsets.push(0);

        let mut frontier_start = 0;
        let mut depth = 0u32;
        loop {
            let frontier = &self.order[frontier_start..];
            let distance = &self.distance;
            let mut next: Vec<VertexIndex> = frontier
                .par_iter()
                .flat_map_iter(move |&v| {
                    graph
                        .neighbors_out(v)
                        .iter()
                        .map(|e| e.target)
                        .filter(move |&w| distance[w as usize] == UNREACHED)
                })
                .collect();
            next.par_sort_unstable();
            next.dedup();

            let next_start = self.order.len();
            self.level_offsets.push(next_start);
            if next.is_empty() {
                break;
            }

            for &w in &next {
                self.distance[w as usize] = depth + 1;
            }

            let distance = &self.distance;
            let sigma = &self.sigma;
            let pulled: Vec<(f64, Vec<Predecessor>)> = next
                .par_iter()
                .map(|&w| {
                    let mut count = 0.0;
                    let mut preds = Vec::new();
                    for e in graph.neighbors_in(w) {
                        if distance[e.target as usize] == depth {
                            count += sigma[e.target as usize];
                            preds.push(Predecessor {
                                vertex: e.target,
                                edge: e.edge,
                            });
                        }
                    }
                    (count, preds)
                })
                .collect();

            for (&w, (count, preds)) in next.iter().zip(pulled) {
                self.sigma[w as usize] = count;
                self.predecessors[w as usize] = preds;
            }

            self.order.extend_from_slice(&next);
            frontier_start = next_start;
            depth += 1;
        }
    }
}

/// Shortest path counts from `source` on a fresh buffer.
pub fn shortest_paths(graph: &Graph, source: VertexIndex) -> ShortestPaths {
    let mut paths = ShortestPaths::with_capacity(graph.node_count());
    paths.compute(graph, source);
    paths
}
