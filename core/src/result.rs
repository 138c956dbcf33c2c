use serde::Serialize;

use crate::graph::VertexId;
use crate::options::ResultDtype;

/// Score values in the precision the caller asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScoreColumn {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl ScoreColumn {
    /// Narrow double precision scores when single precision was requested.
    pub fn from_f64(values: Vec<f64>, dtype: ResultDtype) -> Self {
        match dtype {
            ResultDtype::Float64 => ScoreColumn::Float64(values),
            ResultDtype::Float32 => {
                ScoreColumn::Float32(values.into_iter().map(|v| v as f32).collect())
            }
        }
    }

    pub fn dtype(&self) -> ResultDtype {
        match self {
            ScoreColumn::Float32(_) => ResultDtype::Float32,
            ScoreColumn::Float64(_) => ResultDtype::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScoreColumn::Float32(v) => v.len(),
            ScoreColumn::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Score at row `i`, widened to f64.
    pub fn get(&self, i: usize) -> Option<f64> {
        match self {
            ScoreColumn::Float32(v) => v.get(i).map(|&s| s as f64),
            ScoreColumn::Float64(v) => v.get(i).copied(),
        }
    }

    pub fn iter_f64(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            ScoreColumn::Float32(v) => Box::new(v.iter().map(|&s| s as f64)),
            ScoreColumn::Float64(v) => Box::new(v.iter().copied()),
        }
    }
}

/// One row of a vertex table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VertexScore {
    pub vertex: VertexId,
    pub betweenness_centrality: f64,
}

/// One row of an edge table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeScore {
    pub src: VertexId,
    pub dst: VertexId,
    pub edge_betweenness_centrality: f64,
}

/// Vertex betweenness, one row per vertex. Row order is unspecified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexCentralityTable {
    pub vertex: Vec<VertexId>,
    pub betweenness_centrality: ScoreColumn,
}

impl VertexCentralityTable {
    pub fn len(&self) -> usize {
        self.vertex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex.is_empty()
    }

    pub fn dtype(&self) -> ResultDtype {
        self.betweenness_centrality.dtype()
    }

    pub fn rows(&self) -> impl Iterator<Item = VertexScore> + '_ {
        self.vertex
            .iter()
            .zip(self.betweenness_centrality.iter_f64())
            .map(|(&vertex, score)| VertexScore {
                vertex,
                betweenness_centrality: score,
            })
    }

    /// Score of one vertex, by external id.
    pub fn score_of(&self, vertex: VertexId) -> Option<f64> {
        let row = self.vertex.iter().position(|&v| v == vertex)?;
        self.betweenness_centrality.get(row)
    }

    /// Highest-scoring rows, ties broken by ascending vertex id.
    /// `top_n = 0` returns every row.
    pub fn top(&self, top_n: usize) -> Vec<VertexScore> {
        let mut rows: Vec<VertexScore> = self.rows().collect();
        rows.sort_by(|a, b| {
            b.betweenness_centrality
                .total_cmp(&a.betweenness_centrality)
                .then(a.vertex.cmp(&b.vertex))
        });
        if top_n > 0 && top_n < rows.len() {
            rows.truncate(top_n);
        }
        rows
    }
}

/// Edge betweenness, one row per loaded edge. Row order is unspecified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeCentralityTable {
    pub src: Vec<VertexId>,
    pub dst: Vec<VertexId>,
    pub edge_betweenness_centrality: ScoreColumn,
    #[serde(skip)]
    pub(crate) directed: bool,
}

impl EdgeCentralityTable {
    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    pub fn dtype(&self) -> ResultDtype {
        self.edge_betweenness_centrality.dtype()
    }

    pub fn rows(&self) -> impl Iterator<Item = EdgeScore> + '_ {
        self.src
            .iter()
            .zip(&self.dst)
            .zip(self.edge_betweenness_centrality.iter_f64())
            .map(|((&src, &dst), score)| EdgeScore {
                src,
                dst,
                edge_betweenness_centrality: score,
            })
    }

    /// Score of the first edge between `src` and `dst`. On undirected graphs
    /// either orientation matches.
    pub fn score_of(&self, src: VertexId, dst: VertexId) -> Option<f64> {
        let row = self.src.iter().zip(&self.dst).position(|(&a, &b)| {
            (a == src && b == dst) || (!self.directed && a == dst && b == src)
        })?;
        self.edge_betweenness_centrality.get(row)
    }

    /// Highest-scoring rows, ties broken by ascending endpoints.
    /// `top_n = 0` returns every row.
    pub fn top(&self, top_n: usize) -> Vec<EdgeScore> {
        let mut rows: Vec<EdgeScore> = self.rows().collect();
        rows.sort_by(|a, b| {
            b.edge_betweenness_centrality
                .total_cmp(&a.edge_betweenness_centrality)
                .then(a.src.cmp(&b.src))
                .then(a.dst.cmp(&b.dst))
        });
        if top_n > 0 && top_n < rows.len() {
            rows.truncate(top_n);
        }
        rows
    }
}
