//! Feature validation and backend selection.
//!
//! Checks run in a fixed order and all of them complete before any traversal
//! work starts:
//! 1. implementation name (enforced by `Implementation` on the typed path),
//! 2. endpoint inclusion,
//! 3. weights,
//! 4. result precision (enforced by `ResultDtype` on the typed path),
//! 5. gunrock combined with source sampling.

use tracing::debug;

use crate::error::{CentralityError, Result};
use crate::options::{
    BetweennessOptions, EdgeBetweennessOptions, Implementation, ResultDtype, SourceSpec,
};

/// What the entry point will actually run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub implementation: Implementation,
    pub result_dtype: ResultDtype,
}

/// Reject features no backend implements.
pub fn reject_unsupported(endpoints: bool, weight: Option<&str>) -> Result<()> {
    if endpoints {
        return Err(CentralityError::NotSupported(
            "endpoints accumulation for betweenness centrality".into(),
        ));
    }
    if weight.is_some() {
        return Err(CentralityError::NotSupported(
            "weighted betweenness centrality; only unweighted shortest paths are computed".into(),
        ));
    }
    Ok(())
}

/// Reject source specs the selected implementation cannot honor.
pub fn check_implementation(options: &BetweennessOptions) -> Result<()> {
    match options.implementation {
        Implementation::Default => Ok(()),
        Implementation::Gunrock if options.sources.is_subset() => {
            Err(CentralityError::InvalidArgument(
                "source sampling is not supported by the gunrock implementation; \
                 use all vertices or the default implementation"
                    .into(),
            ))
        }
        Implementation::Gunrock => Ok(()),
    }
}

/// Validate vertex betweenness options and pick the backend.
///
/// Gunrock only produces single precision; a double precision request is
/// routed to the default implementation instead.
pub fn plan_vertex(options: &BetweennessOptions) -> Result<ExecutionPlan> {
    reject_unsupported(options.endpoints, options.weight.as_deref())?;
    check_implementation(options)?;
    note_unused_seed(&options.sources, options.seed);

    let implementation = match (options.implementation, options.result_dtype) {
        (Implementation::Gunrock, ResultDtype::Float64) => {
            debug!("float64 results requested, switching from gunrock to default implementation");
            Implementation::Default
        }
        (implementation, _) => implementation,
    };

    Ok(ExecutionPlan {
        implementation,
        result_dtype: options.result_dtype,
    })
}

/// Validate edge betweenness options. Edges always use the default backend.
pub fn plan_edge(options: &EdgeBetweennessOptions) -> Result<ExecutionPlan> {
    reject_unsupported(false, options.weight.as_deref())?;
    note_unused_seed(&options.sources, options.seed);

    Ok(ExecutionPlan {
        implementation: Implementation::Default,
        result_dtype: options.result_dtype,
    })
}

fn note_unused_seed(sources: &SourceSpec, seed: Option<u64>) {
    if seed.is_some() && !matches!(sources, SourceSpec::SampleCount(_)) {
        debug!("seed is only used when sampling by count; ignoring it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = plan_vertex(&BetweennessOptions::default()).unwrap();
        assert_eq!(plan.implementation, Implementation::Default);
        assert_eq!(plan.result_dtype, ResultDtype::Float64);
    }

    #[test]
    fn test_gunrock_with_float32() {
        let opts = BetweennessOptions::default()
            .with_implementation(Implementation::Gunrock)
            .with_result_dtype(ResultDtype::Float32);
        assert_eq!(plan_vertex(&opts).unwrap().implementation, Implementation::Gunrock);
    }

    #[test]
    fn test_gunrock_with_float64_falls_back() {
        let opts = BetweennessOptions::default().with_implementation(Implementation::Gunrock);
        assert_eq!(plan_vertex(&opts).unwrap().implementation, Implementation::Default);
    }

    #[test]
    fn test_gunrock_rejects_sampling() {
        for sources in [SourceSpec::SampleCount(3), SourceSpec::ExplicitList(vec![0])] {
            let opts = BetweennessOptions::default()
                .with_implementation(Implementation::Gunrock)
                .with_sources(sources);
            assert!(matches!(plan_vertex(&opts), Err(CentralityError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_endpoints_checked_before_weight() {
        let opts = BetweennessOptions {
            endpoints: true,
            weight: Some("w".into()),
            ..Default::default()
        };
        match plan_vertex(&opts) {
            Err(CentralityError::NotSupported(msg)) => assert!(msg.contains("endpoints")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_before_gunrock_check() {
        let opts = BetweennessOptions {
            weight: Some("w".into()),
            implementation: Implementation::Gunrock,
            sources: SourceSpec::SampleCount(2),
            ..Default::default()
        };
        assert!(matches!(plan_vertex(&opts), Err(CentralityError::NotSupported(_))));
    }

    #[test]
    fn test_edge_plan() {
        let plan = plan_edge(&EdgeBetweennessOptions::default()).unwrap();
        assert_eq!(plan.implementation, Implementation::Default);

        let opts = EdgeBetweennessOptions {
            weight: Some("w".into()),
            ..Default::default()
        };
        assert!(matches!(plan_edge(&opts), Err(CentralityError::NotSupported(_))));
    }
}
