//! # Distributions
//!
//! The parametric laws that drive the market simulation. [`Form`] is the
//! closed set of them; every caller goes through [`DistributionExt`] and never
//! matches on the variant.
//!
use rand::Rng;
use rand_distr::Distribution;

use crate::error::Result;
use crate::traits::DistributionExt;

pub mod pert;
pub mod triangular;
pub mod uniform;

pub use pert::Pert;
pub use triangular::Triangular;
pub use uniform::Uniform;

/// Standard PERT weighting of the most likely value.
pub const PERT_WEIGHTING: f64 = 4.0;

/// Shape of a symmetric law built with [`Form::symmetric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
  Uniform,
  Triangular,
  Pert,
}

#[derive(Debug, Clone)]
pub enum Form {
  Uniform(Uniform),
  Triangular(Triangular),
  Pert(Pert),
}

impl Form {
  /// A law of the given kind centred on `mean` with half-range `residual`.
  pub fn symmetric(kind: Kind, mean: f64, residual: f64) -> Result<Self> {
    Ok(match kind {
      Kind::Uniform => Form::Uniform(Uniform::symmetric(mean, residual)?),
      Kind::Triangular => Form::Triangular(Triangular::symmetric(mean, residual)?),
      Kind::Pert => Form::Pert(Pert::new(
        mean,
        PERT_WEIGHTING,
        mean - residual,
        mean + residual,
      )?),
    })
  }

  pub fn uniform(lower: f64, range: f64) -> Result<Self> {
    Ok(Form::Uniform(Uniform::new(lower, range)?))
  }

  pub fn triangular(lower: f64, upper: f64, mode: f64) -> Result<Self> {
    Ok(Form::Triangular(Triangular::new(lower, upper, mode)?))
  }

  pub fn pert(peak: f64, weighting: f64, minimum: f64, maximum: f64) -> Result<Self> {
    Ok(Form::Pert(Pert::new(peak, weighting, minimum, maximum)?))
  }
}

impl Default for Form {
  fn default() -> Self {
    Form::Uniform(Uniform::standard())
  }
}

impl From<Uniform> for Form {
  fn from(value: Uniform) -> Self {
    Form::Uniform(value)
  }
}

impl From<Triangular> for Form {
  fn from(value: Triangular) -> Self {
    Form::Triangular(value)
  }
}

impl From<Pert> for Form {
  fn from(value: Pert) -> Self {
    Form::Pert(value)
  }
}

impl Distribution<f64> for Form {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
    match self {
      Form::Uniform(d) => d.sample(rng),
      Form::Triangular(d) => d.sample(rng),
      Form::Pert(d) => d.sample(rng),
    }
  }
}

impl DistributionExt for Form {
  fn cdf(&self, x: f64) -> f64 {
    match self {
      Form::Uniform(d) => d.cdf(x),
      Form::Triangular(d) => d.cdf(x),
      Form::Pert(d) => d.cdf(x),
    }
  }

  fn mean(&self) -> f64 {
    match self {
      Form::Uniform(d) => d.mean(),
      Form::Triangular(d) => d.mean(),
      Form::Pert(d) => d.mean(),
    }
  }
}
