//! # Traits
//!
//! $$
//! \text{Trait contracts: }\mathcal{A}:\text{parameters}\to\text{draws/series}
//! $$
//!
use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::dynamics::batch_seeds;
use crate::error::DynamicsError;
use crate::error::Result;
use crate::flux::Flow;

/// Common contract of the parametric laws used to drive the simulation.
pub trait DistributionExt: rand_distr::Distribution<f64> {
  fn cdf(&self, x: f64) -> f64;

  fn mean(&self) -> f64;

  fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array1<f64>
  where
    Self: Sized,
  {
    Array1::random_using(n, self, rng)
  }

  /// CDF evaluated at each parameter; parameters must lie in `[0, 1]`.
  fn cumulative_density(&self, parameters: &[f64]) -> Result<Vec<f64>> {
    check_unit_interval(parameters)?;
    Ok(parameters.iter().map(|&p| self.cdf(p)).collect())
  }

  /// Probability mass between consecutive parameters (`n - 1` results).
  fn interval_density(&self, parameters: &[f64]) -> Result<Vec<f64>> {
    check_unit_interval(parameters)?;
    Ok(
      parameters
        .windows(2)
        .map(|w| self.cdf(w[1]) - self.cdf(w[0]))
        .collect(),
    )
  }
}

fn check_unit_interval(parameters: &[f64]) -> Result<()> {
  match parameters.iter().find(|p| !(0.0..=1.0).contains(*p)) {
    Some(p) => Err(DynamicsError::InvalidDistribution(format!(
      "density parameter {p} must be between 0 and 1 inclusive"
    ))),
    None => Ok(()),
  }
}

/// Generators that draw a fresh series on every call.
pub trait SeriesExt: Send + Sync {
  fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Flow;

  /// `m` independent draws. Each worker is seeded from `rng`, so the batch is
  /// reproducible for a seeded caller and ordered like the seeds.
  fn generate_par<R: Rng + ?Sized>(&self, m: usize, rng: &mut R) -> Vec<Flow> {
    batch_seeds(m, rng)
      .into_par_iter()
      .map(|seed| self.generate(&mut StdRng::seed_from_u64(seed)))
      .collect()
  }
}
