//! Source vertex sampling.
//!
//! Samples are drawn over positional indices `[0, n)`, not over external ids:
//! index `i` is not necessarily the vertex whose id is `i` when the graph is
//! renumbered.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{CentralityError, Result};
use crate::graph::VertexIndex;

/// Create the generator used for sampling.
///
/// An explicit seed makes the sample reproducible. Without one the generator
/// is seeded from OS entropy.
pub fn rng_for_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Uniformly sample `k` distinct indices from `[0, n)` without replacement.
pub fn sample_sources<R: Rng + ?Sized>(
    n: usize,
    k: u64,
    rng: &mut R,
) -> Result<Vec<VertexIndex>> {
    if k > n as u64 {
        return Err(CentralityError::InvalidArgument(format!(
            "sample size k={} exceeds vertex count {}",
            k, n
        )));
    }

    Ok(rand::seq::index::sample(rng, n, k as usize)
        .into_iter()
        .map(|i| i as VertexIndex)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_distinct_and_in_range() {
        let mut rng = rng_for_seed(Some(7));
        let sample = sample_sources(50, 20, &mut rng).unwrap();
        assert_eq!(sample.len(), 20);
        let unique: HashSet<_> = sample.iter().copied().collect();
        assert_eq!(unique.len(), 20);
        assert!(sample.iter().all(|&v| v < 50));
    }

    #[test]
    fn test_same_seed_same_sample() {
        let a = sample_sources(1000, 10, &mut rng_for_seed(Some(42))).unwrap();
        let b = sample_sources(1000, 10, &mut rng_for_seed(Some(42))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_sample_is_permutation() {
        let mut sample = sample_sources(8, 8, &mut rng_for_seed(Some(1))).unwrap();
        sample.sort_unstable();
        assert_eq!(sample, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_sample() {
        let sample = sample_sources(8, 0, &mut rng_for_seed(None)).unwrap();
        assert!(sample.is_empty());
    }

    #[test]
    fn test_oversized_sample_rejected() {
        let err = sample_sources(3, 4, &mut rng_for_seed(Some(0))).unwrap_err();
        assert!(matches!(err, CentralityError::InvalidArgument(_)));
    }
}
