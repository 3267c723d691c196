//! # Market Dynamics
//!
//! `dynamics` simulates the pricing factor of a real estate market over a
//! period sequence. Each component produces one or more
//! [`Flow`](crate::flux::Flow)s aligned to the same
//! [`Sequence`](crate::periodicity::Sequence); [`Market`] composes them.
//!
//! ## Modules
//!
//! | Module          | Description                                                                             |
//! |-----------------|-----------------------------------------------------------------------------------------|
//! | [`trend`]       | Deterministic geometric growth of the initial rent level.                               |
//! | [`volatility`]  | Gaussian innovations, AR(1) filtering and mean-reverting accumulation around the trend. |
//! | [`cyclicality`] | Space and asset market cycles synthesised as (asymmetric) sine waves.                  |
//! | [`noise`]       | Independent per-period deviations applied to value levels.                             |
//! | [`black_swan`]  | A single rare shock whose effect dissipates geometrically.                              |
//! | [`market`]      | Composition into space/asset markets, values, implied cap rates and returns.            |
//!
//! ## Parallelism
//!
//! Batch constructors (`from_likelihoods`, `Volatility::from_trends`) draw
//! their parameters and one seed per element from the caller's generator and
//! then build the elements on the `rayon` pool. Results keep input order.
//!
use rand::Rng;
use tracing::warn;

use crate::error::Result;

pub mod black_swan;
pub mod cyclicality;
pub mod market;
pub mod noise;
pub mod trend;
pub mod volatility;

pub use black_swan::BlackSwan;
pub use cyclicality::Cycle;
pub use cyclicality::CycleEstimates;
pub use cyclicality::Cyclicality;
pub use cyclicality::CyclicalityLikelihoods;
pub use market::Market;
pub use noise::Noise;
pub use trend::Trend;
pub use volatility::Volatility;

/// One independent seed per batch element.
pub(crate) fn batch_seeds<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<u64> {
  (0..n).map(|_| rng.gen::<u64>()).collect()
}

/// Folds per-element results in input order, failing with the first error.
pub(crate) fn collect_batch<T>(label: &str, results: Vec<Result<T>>) -> Result<Vec<T>> {
  let mut items = Vec::with_capacity(results.len());
  for (index, result) in results.into_iter().enumerate() {
    match result {
      Ok(item) => items.push(item),
      Err(err) => {
        warn!(batch = label, index, error = %err, "batch element failed");
        return Err(err);
      }
    }
  }
  Ok(items)
}

#[cfg(test)]
mod tests {
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use tracing_test::traced_test;

  use super::batch_seeds;
  use super::collect_batch;
  use crate::error::DynamicsError;

  #[test]
  fn seeds_are_reproducible() {
    let a = batch_seeds(4, &mut StdRng::seed_from_u64(9));
    let b = batch_seeds(4, &mut StdRng::seed_from_u64(9));
    assert_eq!(a, b);
    assert_eq!(a.len(), 4);
  }

  #[test]
  #[traced_test]
  fn first_failure_in_input_order_is_reported() {
    let results = vec![
      Ok(1),
      Err(DynamicsError::invalid("a", "first")),
      Err(DynamicsError::invalid("b", "second")),
    ];
    let err = collect_batch("test", results).unwrap_err();
    assert_eq!(err, DynamicsError::invalid("a", "first"));
    assert!(logs_contain("batch element failed"));
  }

  #[test]
  fn all_successes_keep_their_order() {
    let results: Vec<crate::error::Result<usize>> = (0..5).map(Ok).collect();
    assert_eq!(collect_batch("test", results).unwrap(), vec![0, 1, 2, 3, 4]);
  }
}
