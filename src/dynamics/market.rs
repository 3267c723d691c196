//! # Market
//!
//! $$
//! \begin{aligned}
//! S_i &= W^s_i\,C_i, \qquad K_i = c - W^a_i, \qquad V_i = S_i / K_i\\
//! H_i &= (1+\eta_i)\,V_i\,(1 + I\,b_i)\\
//! \hat{c}_i &= S_{i+1}/H_i, \qquad r_i = H_{i+1}/H_i - 1
//! \end{aligned}
//! $$
//!
//! Composition of trend, volatility, cycles, noise and black swan into the
//! series that price a pro forma: rent level, cap rate, true and observed
//! values, implied forward cap rates and returns.
//!
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::debug;
use tracing::trace;

use crate::dynamics::batch_seeds;
use crate::dynamics::collect_batch;
use crate::dynamics::BlackSwan;
use crate::dynamics::Cyclicality;
use crate::dynamics::Noise;
use crate::dynamics::Trend;
use crate::dynamics::Volatility;
use crate::error::DynamicsError;
use crate::error::Result;
use crate::flux::Flow;
use crate::flux::Units;
use crate::periodicity::Sequence;
use crate::traits::SeriesExt;

/// One simulated market history. Components are shared read-only, so an
/// ensemble can reuse the same noise and black swan generators.
#[derive(Debug, Clone)]
pub struct Market {
  sequence: Sequence,
  trend: Arc<Trend>,
  volatility: Arc<Volatility>,
  cyclicality: Arc<Cyclicality>,
  noise: Arc<Noise>,
  black_swan: Arc<BlackSwan>,
  space_market: Flow,
  asset_market: Flow,
  asset_true_value: Flow,
  space_market_price_factors: Flow,
  noisy_value: Flow,
  historical_value: Flow,
  implied_rev_cap_rate: Flow,
  returns: Flow,
}

impl Market {
  /// Composes the components. Noise is drawn before the black swan, both
  /// from `rng`.
  pub fn new<R: Rng + ?Sized>(
    sequence: Sequence,
    trend: impl Into<Arc<Trend>>,
    volatility: impl Into<Arc<Volatility>>,
    cyclicality: impl Into<Arc<Cyclicality>>,
    noise: impl Into<Arc<Noise>>,
    black_swan: impl Into<Arc<BlackSwan>>,
    rng: &mut R,
  ) -> Result<Self> {
    let trend = trend.into();
    let volatility = volatility.into();
    let cyclicality = cyclicality.into();
    let noise = noise.into();
    let black_swan = black_swan.into();

    if trend.sequence() != &sequence {
      return Err(DynamicsError::Misaligned {
        left: "Market".to_string(),
        right: trend.flow().name().to_string(),
      });
    }

    let space_market = cyclicality
      .space_waveform()
      .checked_mul(volatility.cumulative())?
      .renamed("Space Market");

    // The asset waveform is the negative of the cap rate cycle.
    let asset_market = cyclicality
      .asset_waveform()
      .negate()
      .shift_by(trend.cap_rate())
      .renamed("Asset Market")
      .with_units(Units::Rate);
    if let Some((i, rate)) = asset_market
      .movements()
      .iter()
      .enumerate()
      .find(|(_, rate)| !(**rate > 0.0))
    {
      return Err(DynamicsError::invalid(
        "asset_market",
        format!("cap rate {rate} in period {i} must stay positive"),
      ));
    }

    let asset_true_value = space_market
      .checked_div(&asset_market)?
      .renamed("Asset True Value");

    let initial_value = trend.initial_value();
    let space_market_price_factors =
      space_market.map("Space Market Price Factors", |v| v / initial_value);

    let noisy_value = noise
      .generate(rng)
      .shift_by(1.0)
      .checked_mul(&asset_true_value)?
      .renamed("Noisy Value");

    let historical_value = black_swan
      .generate(rng)
      .scale(black_swan.impact())
      .shift_by(1.0)
      .checked_mul(&noisy_value)?
      .renamed("Historical Value");

    let implied_rev_cap_rate = space_market
      .lead()
      .checked_div(&historical_value.drop_last())?
      .renamed("Implied Cap Rate")
      .with_units(Units::Rate);

    let returns = historical_value
      .lead()
      .checked_div(&historical_value.drop_last())?
      .shift_by(-1.0)
      .renamed("Returns")
      .with_units(Units::Rate);

    debug!(
      cap_rate = trend.cap_rate(),
      growth_rate = trend.growth_rate(),
      periods = sequence.len(),
      "market"
    );

    Ok(Self {
      sequence,
      trend,
      volatility,
      cyclicality,
      noise,
      black_swan,
      space_market,
      asset_market,
      asset_true_value,
      space_market_price_factors,
      noisy_value,
      historical_value,
      implied_rev_cap_rate,
      returns,
    })
  }

  /// One market per positionally matched `(trend, volatility, cyclicality)`,
  /// all sharing `noise` and `black_swan`. Each element draws its noise and
  /// black swan from its own seeded generator.
  pub fn from_likelihoods<R: Rng + ?Sized>(
    sequence: Sequence,
    trends: Vec<Trend>,
    volatilities: Vec<Volatility>,
    cyclicalities: Vec<Cyclicality>,
    noise: impl Into<Arc<Noise>>,
    black_swan: impl Into<Arc<BlackSwan>>,
    rng: &mut R,
  ) -> Result<Vec<Self>> {
    if trends.len() != volatilities.len() || trends.len() != cyclicalities.len() {
      return Err(DynamicsError::invalid(
        "batch",
        format!(
          "{} trends, {} volatilities and {} cyclicalities must match",
          trends.len(),
          volatilities.len(),
          cyclicalities.len()
        ),
      ));
    }

    let noise = noise.into();
    let black_swan = black_swan.into();
    let seeds = batch_seeds(trends.len(), rng);
    trace!(iterations = trends.len(), "market batch");

    let parts = trends
      .into_iter()
      .zip(volatilities)
      .zip(cyclicalities)
      .zip(seeds)
      .map(|(((t, v), c), seed)| (t, v, c, seed))
      .collect::<Vec<_>>();

    let results = parts
      .into_par_iter()
      .map(|(trend, volatility, cyclicality, seed)| {
        Self::new(
          sequence,
          trend,
          volatility,
          cyclicality,
          Arc::clone(&noise),
          Arc::clone(&black_swan),
          &mut StdRng::seed_from_u64(seed),
        )
      })
      .collect();

    collect_batch("market", results)
  }

  pub fn sequence(&self) -> &Sequence {
    &self.sequence
  }

  pub fn trend(&self) -> &Trend {
    &self.trend
  }

  pub fn volatility(&self) -> &Volatility {
    &self.volatility
  }

  pub fn cyclicality(&self) -> &Cyclicality {
    &self.cyclicality
  }

  pub fn noise(&self) -> &Noise {
    &self.noise
  }

  pub fn black_swan(&self) -> &BlackSwan {
    &self.black_swan
  }

  /// Rent level: the space cycle applied to the accumulated volatility.
  pub fn space_market(&self) -> &Flow {
    &self.space_market
  }

  /// Cap rate: the long-run rate less the asset cycle.
  pub fn asset_market(&self) -> &Flow {
    &self.asset_market
  }

  pub fn asset_true_value(&self) -> &Flow {
    &self.asset_true_value
  }

  /// Rent level as a ratio of the initial rent, for operating cash flows.
  pub fn space_market_price_factors(&self) -> &Flow {
    &self.space_market_price_factors
  }

  pub fn noisy_value(&self) -> &Flow {
    &self.noisy_value
  }

  pub fn historical_value(&self) -> &Flow {
    &self.historical_value
  }

  /// Next period's rent over this period's observed value (`N - 1` periods).
  pub fn implied_rev_cap_rate(&self) -> &Flow {
    &self.implied_rev_cap_rate
  }

  /// Period-over-period change of the observed value (`N - 1` periods).
  pub fn returns(&self) -> &Flow {
    &self.returns
  }
}
