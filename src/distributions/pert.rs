//! # PERT
//!
//! $$
//! X = m + (M-m)\,B,\quad B\sim\mathrm{Beta}\!\left(1+w\frac{c-m}{M-m},\;1+w\frac{M-c}{M-m}\right)
//! $$
//!
use rand::Rng;
use rand_distr::Distribution;
use statrs::distribution::ContinuousCDF;

use crate::error::DynamicsError;
use crate::error::Result;
use crate::traits::DistributionExt;

#[derive(Debug, Clone)]
pub struct Pert {
  peak: f64,
  weighting: f64,
  minimum: f64,
  maximum: f64,
  sampler: rand_distr::Beta<f64>,
  cdf: statrs::distribution::Beta,
}

impl Pert {
  pub fn new(peak: f64, weighting: f64, minimum: f64, maximum: f64) -> Result<Self> {
    if !minimum.is_finite() || !maximum.is_finite() || maximum <= minimum {
      return Err(DynamicsError::InvalidDistribution(format!(
        "PERT maximum {maximum} must exceed minimum {minimum}"
      )));
    }
    if !(minimum <= peak && peak <= maximum) {
      return Err(DynamicsError::InvalidDistribution(format!(
        "PERT peak {peak} must lie within [{minimum}, {maximum}]"
      )));
    }
    if !(weighting >= 0.0) || !weighting.is_finite() {
      return Err(DynamicsError::InvalidDistribution(format!(
        "PERT weighting {weighting} must be non-negative"
      )));
    }

    let scale = maximum - minimum;
    let alpha = 1.0 + weighting * (peak - minimum) / scale;
    let beta = 1.0 + weighting * (maximum - peak) / scale;
    let sampler = rand_distr::Beta::new(alpha, beta)
      .map_err(|e| DynamicsError::InvalidDistribution(e.to_string()))?;
    let cdf = statrs::distribution::Beta::new(alpha, beta)
      .map_err(|e| DynamicsError::InvalidDistribution(e.to_string()))?;

    Ok(Self {
      peak,
      weighting,
      minimum,
      maximum,
      sampler,
      cdf,
    })
  }

  pub fn peak(&self) -> f64 {
    self.peak
  }

  pub fn weighting(&self) -> f64 {
    self.weighting
  }

  pub fn minimum(&self) -> f64 {
    self.minimum
  }

  pub fn maximum(&self) -> f64 {
    self.maximum
  }

  fn scale(&self) -> f64 {
    self.maximum - self.minimum
  }
}

impl Distribution<f64> for Pert {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
    self.minimum + self.scale() * self.sampler.sample(rng)
  }
}

impl DistributionExt for Pert {
  fn cdf(&self, x: f64) -> f64 {
    let z = ((x - self.minimum) / self.scale()).clamp(0.0, 1.0);
    self.cdf.cdf(z)
  }

  fn mean(&self) -> f64 {
    (self.minimum + self.weighting * self.peak + self.maximum) / (self.weighting + 2.0)
  }
}
