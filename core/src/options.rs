//! Call parameters for the two entry points.
//!
//! The typed option structs are what the engine consumes. The `*Request`
//! structs carry the same parameters in their loosely typed form (strings,
//! count-or-list) as they arrive from JSON or a command line, and convert
//! into options with the same ordered validation the dispatcher applies.

use std::fmt;

use serde::Deserialize;

use crate::dispatch;
use crate::error::{CentralityError, Result};
use crate::graph::VertexId;

/// Which vertices seed the traversals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceSpec {
    /// Every vertex is a source: exact betweenness.
    #[default]
    AllVertices,
    /// A uniform random sample of this many vertex indices.
    SampleCount(u64),
    /// These external ids, translated through the graph's renumbering.
    ExplicitList(Vec<VertexId>),
}

impl SourceSpec {
    /// True when only a subset of sources is used, so scores are estimates.
    pub fn is_subset(&self) -> bool {
        !matches!(self, SourceSpec::AllVertices)
    }
}

/// Execution strategy for vertex betweenness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Implementation {
    /// Source-parallel, supports sampling and both precisions.
    #[default]
    Default,
    /// Frontier-parallel, all vertices as sources, single precision only.
    Gunrock,
}

impl Implementation {
    /// Resolve an implementation name. `None` selects the default.
    pub fn from_name(name: Option<&str>) -> Result<Self> {
        match name {
            None | Some("default") => Ok(Implementation::Default),
            Some("gunrock") => Ok(Implementation::Gunrock),
            Some(other) => Err(CentralityError::InvalidArgument(format!(
                "unknown implementation '{}': only 'default' and 'gunrock' are supported",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Implementation::Default => "default",
            Implementation::Gunrock => "gunrock",
        }
    }
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Floating point width of the result scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultDtype {
    Float32,
    #[default]
    Float64,
}

impl ResultDtype {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "float32" | "f32" => Ok(ResultDtype::Float32),
            "float64" | "f64" => Ok(ResultDtype::Float64),
            other => Err(CentralityError::TypeMismatch(format!(
                "result dtype can only be float32 or float64, got '{}'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultDtype::Float32 => "float32",
            ResultDtype::Float64 => "float64",
        }
    }
}

/// Parameters for vertex betweenness.
#[derive(Debug, Clone, PartialEq)]
pub struct BetweennessOptions {
    pub sources: SourceSpec,
    pub normalized: bool,
    /// Name of an edge weight attribute. Weighted paths are not supported;
    /// any value is rejected.
    pub weight: Option<String>,
    /// Count path endpoints as crossed. Not supported.
    pub endpoints: bool,
    pub implementation: Implementation,
    /// Only used with `SourceSpec::SampleCount`.
    pub seed: Option<u64>,
    pub result_dtype: ResultDtype,
}

impl Default for BetweennessOptions {
    fn default() -> Self {
        Self {
            sources: SourceSpec::AllVertices,
            normalized: true,
            weight: None,
            endpoints: false,
            implementation: Implementation::Default,
            seed: None,
            result_dtype: ResultDtype::Float64,
        }
    }
}

impl BetweennessOptions {
    pub fn with_sources(mut self, sources: SourceSpec) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn with_implementation(mut self, implementation: Implementation) -> Self {
        self.implementation = implementation;
        self
    }

    pub fn with_result_dtype(mut self, result_dtype: ResultDtype) -> Self {
        self.result_dtype = result_dtype;
        self
    }
}

/// Parameters for edge betweenness.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeBetweennessOptions {
    pub sources: SourceSpec,
    pub normalized: bool,
    pub weight: Option<String>,
    pub seed: Option<u64>,
    pub result_dtype: ResultDtype,
}

impl Default for EdgeBetweennessOptions {
    fn default() -> Self {
        Self {
            sources: SourceSpec::AllVertices,
            normalized: true,
            weight: None,
            seed: None,
            result_dtype: ResultDtype::Float64,
        }
    }
}

impl EdgeBetweennessOptions {
    pub fn with_sources(mut self, sources: SourceSpec) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn with_result_dtype(mut self, result_dtype: ResultDtype) -> Self {
        self.result_dtype = result_dtype;
        self
    }
}

/// `k` as it appears in a request: a sample size or a list of vertex ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SourceArg {
    Count(u64),
    List(Vec<VertexId>),
}

impl From<Option<SourceArg>> for SourceSpec {
    fn from(k: Option<SourceArg>) -> Self {
        match k {
            None => SourceSpec::AllVertices,
            Some(SourceArg::Count(k)) => SourceSpec::SampleCount(k),
            Some(SourceArg::List(ids)) => SourceSpec::ExplicitList(ids),
        }
    }
}

fn default_normalized() -> bool {
    true
}

fn default_dtype() -> String {
    ResultDtype::Float64.as_str().to_string()
}

/// Loosely typed vertex betweenness parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct BetweennessRequest {
    #[serde(default)]
    pub k: Option<SourceArg>,
    #[serde(default = "default_normalized")]
    pub normalized: bool,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub endpoints: bool,
    #[serde(default)]
    pub implementation: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_dtype")]
    pub result_dtype: String,
}

impl Default for BetweennessRequest {
    fn default() -> Self {
        Self {
            k: None,
            normalized: true,
            weight: None,
            endpoints: false,
            implementation: None,
            seed: None,
            result_dtype: default_dtype(),
        }
    }
}

impl BetweennessRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CentralityError::InvalidArgument(format!("malformed request: {}", e)))
    }

    /// Validate in dispatch order and produce typed options.
    pub fn into_options(self) -> Result<BetweennessOptions> {
        let implementation = Implementation::from_name(self.implementation.as_deref())?;
        dispatch::reject_unsupported(self.endpoints, self.weight.as_deref())?;
        let result_dtype = ResultDtype::from_name(&self.result_dtype)?;

        let options = BetweennessOptions {
            sources: self.k.into(),
            normalized: self.normalized,
            weight: None,
            endpoints: false,
            implementation,
            seed: self.seed,
            result_dtype,
        };
        dispatch::check_implementation(&options)?;
        Ok(options)
    }
}

/// Loosely typed edge betweenness parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeBetweennessRequest {
    #[serde(default)]
    pub k: Option<SourceArg>,
    #[serde(default = "default_normalized")]
    pub normalized: bool,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_dtype")]
    pub result_dtype: String,
}

impl Default for EdgeBetweennessRequest {
    fn default() -> Self {
        Self {
            k: None,
            normalized: true,
            weight: None,
            seed: None,
            result_dtype: default_dtype(),
        }
    }
}

impl EdgeBetweennessRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CentralityError::InvalidArgument(format!("malformed request: {}", e)))
    }

    pub fn into_options(self) -> Result<EdgeBetweennessOptions> {
        dispatch::reject_unsupported(false, self.weight.as_deref())?;
        let result_dtype = ResultDtype::from_name(&self.result_dtype)?;

        Ok(EdgeBetweennessOptions {
            sources: self.k.into(),
            normalized: self.normalized,
            weight: None,
            seed: self.seed,
            result_dtype,
        })
    }
}
