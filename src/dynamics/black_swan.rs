//! # Black Swan
//!
//! $$
//! b_j = \begin{cases} 0 & j < k\\ (1-\delta)^{\,j-k} & j \ge k\end{cases},
//! \qquad k = \min\{i : e_i < \lambda\}
//! $$
//!
//! At most one rare event per history. Its effect dissipates geometrically
//! after the period in which it fires.
//!
use ndarray::Array1;
use rand::Rng;
use tracing::debug;

use crate::distributions::Form;
use crate::error::DynamicsError;
use crate::error::Result;
use crate::flux::Flow;
use crate::flux::Units;
use crate::periodicity::Sequence;
use crate::traits::DistributionExt;
use crate::traits::SeriesExt;

#[derive(Debug, Clone)]
pub struct BlackSwan {
  sequence: Sequence,
  likelihood: f64,
  dissipation_rate: f64,
  probability: Form,
  impact: f64,
}

impl BlackSwan {
  pub fn new(
    sequence: Sequence,
    likelihood: f64,
    dissipation_rate: f64,
    probability: impl Into<Form>,
    impact: f64,
  ) -> Result<Self> {
    if !(0.0..=1.0).contains(&likelihood) {
      return Err(DynamicsError::invalid(
        "likelihood",
        format!("{likelihood} must lie in [0, 1]"),
      ));
    }
    if !(0.0..1.0).contains(&dissipation_rate) {
      return Err(DynamicsError::invalid(
        "dissipation_rate",
        format!("{dissipation_rate} must lie in [0, 1)"),
      ));
    }
    if !impact.is_finite() {
      return Err(DynamicsError::invalid("impact", "must be finite"));
    }

    debug!(likelihood, dissipation_rate, impact, "black swan");

    Ok(Self {
      sequence,
      likelihood,
      dissipation_rate,
      probability: probability.into(),
      impact,
    })
  }

  pub fn sequence(&self) -> &Sequence {
    &self.sequence
  }

  pub fn likelihood(&self) -> f64 {
    self.likelihood
  }

  pub fn dissipation_rate(&self) -> f64 {
    self.dissipation_rate
  }

  /// Signed share of value lost (or gained) when the event fires.
  pub fn impact(&self) -> f64 {
    self.impact
  }
}

impl SeriesExt for BlackSwan {
  fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Flow {
    let events = self.probability.sample_n(self.sequence.len(), rng);
    let effects = black_swan_effects(self.likelihood, self.dissipation_rate, &events);
    Flow::from_fn("Black Swan Effect", Units::Scalar, self.sequence, |i| {
      effects[i]
    })
  }
}

/// Effect indicator of the first event below `likelihood`: `0` before it,
/// `1` when it fires, then decaying by `1 - dissipation_rate` per period.
pub fn black_swan_effects(
  likelihood: f64,
  dissipation_rate: f64,
  events: &Array1<f64>,
) -> Array1<f64> {
  let mut trigger: Option<usize> = None;
  let mut effects = Array1::<f64>::zeros(events.len());

  for (i, &event) in events.iter().enumerate() {
    effects[i] = match trigger {
      Some(k) => (1.0 - dissipation_rate).powi(i32::try_from(i - k).unwrap_or(i32::MAX)),
      None if event < likelihood => {
        trigger = Some(i);
        1.0
      }
      None => 0.0,
    };
  }

  effects
}
