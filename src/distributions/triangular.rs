//! # Triangular
//!
//! $$
//! f(x)=\begin{cases}\frac{2(x-a)}{(b-a)(c-a)} & a\le x<c\\ \frac{2(b-x)}{(b-a)(b-c)} & c\le x\le b\end{cases}
//! $$
//!
use rand::Rng;
use rand_distr::Distribution;
use statrs::distribution::ContinuousCDF;

use crate::error::DynamicsError;
use crate::error::Result;
use crate::traits::DistributionExt;

#[derive(Debug, Clone)]
pub struct Triangular {
  lower: f64,
  upper: f64,
  mode: f64,
  sampler: Option<rand_distr::Triangular<f64>>,
  cdf: Option<statrs::distribution::Triangular>,
}

impl Triangular {
  /// Linear density on `[lower, upper]` peaking at `mode`. Equal bounds give
  /// a point mass.
  pub fn new(lower: f64, upper: f64, mode: f64) -> Result<Self> {
    if !(lower <= mode && mode <= upper) {
      return Err(DynamicsError::InvalidDistribution(format!(
        "triangular mode {mode} must lie within [{lower}, {upper}]"
      )));
    }
    if !lower.is_finite() || !upper.is_finite() {
      return Err(DynamicsError::InvalidDistribution(
        "triangular bounds must be finite".into(),
      ));
    }

    let (sampler, cdf) = if upper > lower {
      let sampler = rand_distr::Triangular::new(lower, upper, mode)
        .map_err(|e| DynamicsError::InvalidDistribution(e.to_string()))?;
      let cdf = statrs::distribution::Triangular::new(lower, upper, mode)
        .map_err(|e| DynamicsError::InvalidDistribution(e.to_string()))?;
      (Some(sampler), Some(cdf))
    } else {
      (None, None)
    };

    Ok(Self {
      lower,
      upper,
      mode,
      sampler,
      cdf,
    })
  }

  pub fn symmetric(mode: f64, residual: f64) -> Result<Self> {
    Self::new(mode - residual, mode + residual, mode)
  }

  pub fn lower(&self) -> f64 {
    self.lower
  }

  pub fn upper(&self) -> f64 {
    self.upper
  }

  pub fn mode(&self) -> f64 {
    self.mode
  }
}

impl Distribution<f64> for Triangular {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
    match &self.sampler {
      Some(sampler) => sampler.sample(rng),
      None => self.lower,
    }
  }
}

impl DistributionExt for Triangular {
  fn cdf(&self, x: f64) -> f64 {
    match &self.cdf {
      Some(dist) => dist.cdf(x),
      None if x < self.lower => 0.0,
      None => 1.0,
    }
  }

  fn mean(&self) -> f64 {
    (self.lower + self.upper + self.mode) / 3.0
  }
}
