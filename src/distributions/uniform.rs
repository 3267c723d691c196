//! # Uniform
//!
//! $$
//! f(x)=\frac{1}{b-a}\mathbf{1}_{a\le x\le b}
//! $$
//!
use rand::Rng;
use rand_distr::Distribution;
use statrs::distribution::ContinuousCDF;

use crate::error::DynamicsError;
use crate::error::Result;
use crate::traits::DistributionExt;

/// Constant density on `[lower, lower + range)`. A zero range is a point
/// mass at `lower`.
#[derive(Debug, Clone, Copy)]
pub struct Uniform {
  lower: f64,
  range: f64,
  sampler: Option<rand_distr::Uniform<f64>>,
}

impl Uniform {
  pub fn new(lower: f64, range: f64) -> Result<Self> {
    if !lower.is_finite() || !range.is_finite() || range < 0.0 {
      return Err(DynamicsError::InvalidDistribution(format!(
        "uniform needs a finite lower bound and non-negative range (got {lower}, {range})"
      )));
    }

    Ok(Self {
      lower,
      range,
      sampler: (range > 0.0).then(|| rand_distr::Uniform::new(lower, lower + range)),
    })
  }

  /// The unit interval `[0, 1)`.
  pub fn standard() -> Self {
    Self {
      lower: 0.0,
      range: 1.0,
      sampler: Some(rand_distr::Uniform::new(0.0, 1.0)),
    }
  }

  pub fn symmetric(mean: f64, residual: f64) -> Result<Self> {
    Self::new(mean - residual, residual * 2.0)
  }

  pub fn lower(&self) -> f64 {
    self.lower
  }

  pub fn upper(&self) -> f64 {
    self.lower + self.range
  }
}

impl Default for Uniform {
  fn default() -> Self {
    Self::standard()
  }
}

impl Distribution<f64> for Uniform {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
    match &self.sampler {
      Some(sampler) => sampler.sample(rng),
      None => self.lower,
    }
  }
}

impl DistributionExt for Uniform {
  fn cdf(&self, x: f64) -> f64 {
    if self.range == 0.0 {
      return if x < self.lower { 0.0 } else { 1.0 };
    }
    match statrs::distribution::Uniform::new(self.lower, self.upper()) {
      Ok(dist) => dist.cdf(x),
      Err(_) => f64::NAN,
    }
  }

  fn mean(&self) -> f64 {
    self.lower + self.range / 2.0
  }
}
