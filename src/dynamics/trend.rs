//! # Trend
//!
//! $$
//! T_i = T_0\,(1+g)^i,\qquad T_0 = \pi_0\,c
//! $$
//!
//! The long-run rent level. It is geometric, so asset values derived from it
//! through a cap rate cannot turn negative.
//!
use ndarray::Array1;
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;
use tracing::trace;

use crate::dynamics::collect_batch;
use crate::error::DynamicsError;
use crate::error::Result;
use crate::flux::Flow;
use crate::flux::Units;
use crate::periodicity::Sequence;
use crate::projection::Extrapolation;
use crate::traits::DistributionExt;

/// Price factor applied to the cap rate when no initial value is given.
pub const DEFAULT_PRICE_FACTOR: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
  cap_rate: f64,
  growth_rate: f64,
  initial_price_factor: f64,
  initial_value: f64,
  trend: Flow,
}

impl Trend {
  /// Geometric trend starting at `initial_value`, or at `cap_rate` when it is
  /// omitted.
  pub fn new(
    sequence: Sequence,
    cap_rate: f64,
    growth_rate: f64,
    initial_value: Option<f64>,
  ) -> Result<Self> {
    Self::build(
      sequence,
      cap_rate,
      growth_rate,
      DEFAULT_PRICE_FACTOR,
      initial_value,
    )
  }

  /// Geometric trend starting at `initial_price_factor * cap_rate`.
  pub fn with_price_factor(
    sequence: Sequence,
    cap_rate: f64,
    growth_rate: f64,
    initial_price_factor: f64,
  ) -> Result<Self> {
    Self::build(sequence, cap_rate, growth_rate, initial_price_factor, None)
  }

  fn build(
    sequence: Sequence,
    cap_rate: f64,
    growth_rate: f64,
    initial_price_factor: f64,
    initial_value: Option<f64>,
  ) -> Result<Self> {
    if !(cap_rate > 0.0) || !cap_rate.is_finite() {
      return Err(DynamicsError::invalid(
        "cap_rate",
        format!("{cap_rate} must be positive"),
      ));
    }
    if sequence.is_empty() {
      return Err(DynamicsError::invalid("sequence", "must contain at least one period"));
    }

    let initial_value = initial_value.unwrap_or(initial_price_factor * cap_rate);
    if !(initial_value > 0.0) || !initial_value.is_finite() {
      return Err(DynamicsError::invalid(
        "initial_value",
        format!("{initial_value} must be positive"),
      ));
    }

    let trend = Extrapolation::Compounding { rate: growth_rate }.project(
      initial_value,
      sequence,
      "Market Trend",
      Units::Scalar,
    )?;

    debug!(
      cap_rate,
      growth_rate,
      initial_value,
      periods = sequence.len(),
      "trend"
    );

    Ok(Self {
      cap_rate,
      growth_rate,
      initial_price_factor,
      initial_value,
      trend,
    })
  }

  /// One trend per `(growth rate, initial value)` pair drawn from the two
  /// laws.
  pub fn from_likelihoods<D, R>(
    sequence: Sequence,
    cap_rate: f64,
    growth_rate_dist: &D,
    initial_value_dist: &D,
    iterations: usize,
    rng: &mut R,
  ) -> Result<Vec<Self>>
  where
    D: DistributionExt,
    R: Rng + ?Sized,
  {
    let growth_rates = growth_rate_dist.sample_n(iterations, rng);
    let initial_values = initial_value_dist.sample_n(iterations, rng);
    trace!(iterations, "trend batch");

    let results = growth_rates
      .iter()
      .zip(initial_values.iter())
      .map(|(&g, &v)| (g, v))
      .collect::<Vec<_>>()
      .into_par_iter()
      .map(|(growth_rate, initial_value)| {
        Self::new(sequence, cap_rate, growth_rate, Some(initial_value))
      })
      .collect();

    collect_batch("trend", results)
  }

  pub fn sequence(&self) -> &Sequence {
    self.trend.sequence()
  }

  pub fn cap_rate(&self) -> f64 {
    self.cap_rate
  }

  pub fn growth_rate(&self) -> f64 {
    self.growth_rate
  }

  pub fn initial_price_factor(&self) -> f64 {
    self.initial_price_factor
  }

  pub fn initial_value(&self) -> f64 {
    self.initial_value
  }

  pub fn flow(&self) -> &Flow {
    &self.trend
  }

  pub fn values(&self) -> &Array1<f64> {
    self.trend.movements()
  }
}
