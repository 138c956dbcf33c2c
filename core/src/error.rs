use thiserror::Error;

use crate::graph::VertexId;

/// Errors raised by the centrality engine.
///
/// Everything except `ResourceLimit` and `ThreadPool` is a precondition
/// violation detected before any traversal starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CentralityError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("vertex {0} not found")]
    NotFound(VertexId),

    #[error("duplicate vertex identifier {0}")]
    DuplicateVertex(VertexId),

    #[error("computation needs ~{required_mb}MB, exceeds max_memory_mb={limit_mb}MB")]
    ResourceLimit { required_mb: usize, limit_mb: usize },

    #[error("worker pool unavailable: {0}")]
    ThreadPool(String),

    #[error("invalid engine configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CentralityError>;
