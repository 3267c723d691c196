//! # Summary
//!
//! $$
//! \bar{x}=\frac{1}{n}\sum_k x_k,\qquad \sigma=\sqrt{\frac{1}{n}\sum_k (x_k-\bar{x})^2},\qquad q_p = F_n^{-1}(p)
//! $$
//!
//! Cross-sectional statistics of a Monte Carlo ensemble.
//!
use rayon::prelude::*;
use statrs::statistics::Data;
use statrs::statistics::OrderStatistics;
use statrs::statistics::Statistics;

use crate::dynamics::Market;
use crate::error::DynamicsError;
use crate::error::Result;
use crate::flux::Flow;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
  pub count: usize,
  pub mean: f64,
  /// Population standard deviation.
  pub std_dev: f64,
  pub min: f64,
  pub max: f64,
  pub p5: f64,
  pub p50: f64,
  pub p95: f64,
}

impl Summary {
  pub fn of(values: &[f64]) -> Result<Self> {
    if values.is_empty() {
      return Err(DynamicsError::invalid("values", "cannot summarise an empty sample"));
    }

    let mut data = Data::new(values.to_vec());
    Ok(Self {
      count: values.len(),
      mean: values.iter().mean(),
      std_dev: values.iter().population_std_dev(),
      min: Statistics::min(values.iter()),
      max: Statistics::max(values.iter()),
      p5: data.quantile(0.05),
      p50: data.quantile(0.5),
      p95: data.quantile(0.95),
    })
  }

  /// One summary per period of the selected series across the ensemble.
  pub fn per_period<F>(markets: &[Market], selector: F) -> Result<Vec<Self>>
  where
    F: Fn(&Market) -> &Flow,
  {
    let flows = markets.iter().map(|m| selector(m)).collect::<Vec<_>>();
    let Some(first) = flows.first() else {
      return Err(DynamicsError::invalid("markets", "ensemble is empty"));
    };
    if let Some(other) = flows.iter().find(|f| f.sequence() != first.sequence()) {
      return Err(DynamicsError::Misaligned {
        left: first.name().to_string(),
        right: other.name().to_string(),
      });
    }

    (0..first.len())
      .into_par_iter()
      .map(|i| {
        let values = flows.iter().map(|f| f.movements()[i]).collect::<Vec<_>>();
        Self::of(&values)
      })
      .collect()
  }
}
