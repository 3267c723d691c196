//! # Volatility
//!
//! $$
//! \begin{aligned}
//! \varepsilon_i &= \sigma\,\Phi^{-1}(u_i), \quad u_i\sim U(0,1)\\
//! a_0 &= \varepsilon_0,\quad a_i = \varepsilon_i + \rho\,a_{i-1}\\
//! C_0 &= T_0,\quad C_i = C_{i-1}(1+g+a_i) + \kappa\,(T_{i-1}-C_{i-1})
//! \end{aligned}
//! $$
//!
//! Innovations are realised every period and accumulate into the rent level.
//! Reversion uses the previous period's gap to the trend.
//!
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;
use tracing::debug;
use tracing::trace;

use crate::distributions::Uniform;
use crate::dynamics::batch_seeds;
use crate::dynamics::collect_batch;
use crate::dynamics::Trend;
use crate::error::DynamicsError;
use crate::error::Result;
use crate::flux::Flow;
use crate::flux::Units;
use crate::periodicity::Sequence;
use crate::traits::DistributionExt;

#[derive(Debug, Clone, PartialEq)]
pub struct Volatility {
  volatility_per_period: Option<f64>,
  autoregression_param: f64,
  mean_reversion_param: f64,
  volatility: Flow,
  autoregressive_returns: Flow,
  cumulative_volatility: Flow,
}

impl Volatility {
  pub fn new<R: Rng + ?Sized>(
    trend: &Trend,
    volatility_per_period: f64,
    autoregression_param: f64,
    mean_reversion_param: f64,
    sequence: Sequence,
    rng: &mut R,
  ) -> Result<Self> {
    if !(volatility_per_period >= 0.0) || !volatility_per_period.is_finite() {
      return Err(DynamicsError::invalid(
        "volatility_per_period",
        format!("{volatility_per_period} must be non-negative"),
      ));
    }

    // Inverse normal of a uniform draw, as spreadsheet NORMSINV(RAND()).
    let normal =
      Normal::new(0.0, 1.0).map_err(|e| DynamicsError::InvalidDistribution(e.to_string()))?;
    let innovations = Uniform::standard()
      .sample_n(sequence.len(), rng)
      .mapv(|u| normal.inverse_cdf(u.max(f64::MIN_POSITIVE)) * volatility_per_period);

    let mut volatility = Self::with_innovations(
      trend,
      innovations,
      autoregression_param,
      mean_reversion_param,
      sequence,
    )?;
    volatility.volatility_per_period = Some(volatility_per_period);
    Ok(volatility)
  }

  /// Deterministic construction from already scaled innovations.
  pub fn with_innovations(
    trend: &Trend,
    innovations: Array1<f64>,
    autoregression_param: f64,
    mean_reversion_param: f64,
    sequence: Sequence,
  ) -> Result<Self> {
    check_unit_param("autoregression_param", autoregression_param)?;
    check_unit_param("mean_reversion_param", mean_reversion_param)?;
    if trend.sequence() != &sequence {
      return Err(DynamicsError::Misaligned {
        left: trend.flow().name().to_string(),
        right: "Volatility".to_string(),
      });
    }

    let volatility = Flow::new("Volatility", Units::Scalar, sequence, innovations)?;
    let ar_returns = autoregression(autoregression_param, volatility.movements());
    let cumulative = accumulate(
      trend.growth_rate(),
      trend.values(),
      mean_reversion_param,
      &ar_returns,
    );

    debug!(
      autoregression_param,
      mean_reversion_param,
      periods = sequence.len(),
      "volatility"
    );

    Ok(Self {
      volatility_per_period: None,
      autoregression_param,
      mean_reversion_param,
      volatility,
      autoregressive_returns: Flow::new("Autoregressive Returns", Units::Scalar, sequence, ar_returns)?,
      cumulative_volatility: Flow::new("Cumulative Volatility", Units::Scalar, sequence, cumulative)?,
    })
  }

  /// One volatility per trend, sharing the scalar parameters. Each element
  /// draws its innovations from its own seeded generator.
  pub fn from_trends<R: Rng + ?Sized>(
    trends: &[Trend],
    volatility_per_period: f64,
    autoregression_param: f64,
    mean_reversion_param: f64,
    sequence: Sequence,
    rng: &mut R,
  ) -> Result<Vec<Self>> {
    let seeds = batch_seeds(trends.len(), rng);
    trace!(iterations = trends.len(), "volatility batch");

    let results = trends
      .par_iter()
      .zip(seeds)
      .map(|(trend, seed)| {
        Self::new(
          trend,
          volatility_per_period,
          autoregression_param,
          mean_reversion_param,
          sequence,
          &mut StdRng::seed_from_u64(seed),
        )
      })
      .collect();

    collect_batch("volatility", results)
  }

  pub fn volatility_per_period(&self) -> Option<f64> {
    self.volatility_per_period
  }

  pub fn autoregression_param(&self) -> f64 {
    self.autoregression_param
  }

  pub fn mean_reversion_param(&self) -> f64 {
    self.mean_reversion_param
  }

  pub fn innovations(&self) -> &Flow {
    &self.volatility
  }

  pub fn autoregressive_returns(&self) -> &Flow {
    &self.autoregressive_returns
  }

  /// The simulated rent level.
  pub fn cumulative(&self) -> &Flow {
    &self.cumulative_volatility
  }
}

fn check_unit_param(field: &str, value: f64) -> Result<()> {
  if (0.0..1.0).contains(&value) {
    Ok(())
  } else {
    Err(DynamicsError::invalid(field, format!("{value} must lie in [0, 1)")))
  }
}

/// First-order autoregressive filter of the innovations.
pub fn autoregression(parameter: f64, innovations: &Array1<f64>) -> Array1<f64> {
  let mut ar = Array1::<f64>::zeros(innovations.len());
  for i in 0..innovations.len() {
    ar[i] = if i == 0 {
      innovations[0]
    } else {
      innovations[i] + parameter * ar[i - 1]
    };
  }
  ar
}

/// Geometric accumulation of the returns around the trend, reverting toward
/// it by `mean_reversion` of the previous period's gap.
pub fn accumulate(
  trend_rate: f64,
  trend: &Array1<f64>,
  mean_reversion: f64,
  ar_returns: &Array1<f64>,
) -> Array1<f64> {
  let n = trend.len().min(ar_returns.len());
  let mut cumulative = Array1::<f64>::zeros(n);
  for i in 0..n {
    cumulative[i] = if i == 0 {
      trend[0]
    } else {
      cumulative[i - 1] * (1.0 + trend_rate + ar_returns[i])
        + mean_reversion * (trend[i - 1] - cumulative[i - 1])
    };
  }
  cumulative
}
