//! # Cyclicality
//!
//! $$
//! y(x) = A\sin\!\Big(\tfrac{2\pi}{P}(x-\varphi) - f(x)\Big),\qquad
//! f(x) = \sin\!\Big(\tfrac{2\pi}{P}(x-\varphi) - f(x)\Big)
//! $$
//!
//! Two loosely coupled market cycles: the space (rental) market, which
//! oscillates around `1` and scales the rent level, and the asset
//! (capital) market, which oscillates around `0` and is read as the negative of
//! the cap rate deviation.
//!
//! The asymmetric wave is the fixed point of the recursive sine above with a
//! shear in `(0, 1]`. Each period is solved independently by bisection.
//!
use std::f64::consts::PI;

use impl_new_derive::ImplNew;
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
use crate::traits::DistributionExt;

/// Width of the bracket at which the bisection stops.
pub const DEFAULT_PRECISION: f64 = 1e-8;
/// Margin added around the `[-1, 1]` bracket.
pub const DEFAULT_BOUND: f64 = 0.1;
/// Hard cap on bisection steps per period.
pub const MAX_BISECTION_ITERATIONS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycle {
  period: f64,
  phase: f64,
  amplitude: f64,
}

impl Cycle {
  pub fn new(period: f64, phase: f64, amplitude: f64) -> Result<Self> {
    if !(period > 0.0) || !period.is_finite() {
      return Err(DynamicsError::invalid(
        "period",
        format!("cycle period {period} must be positive"),
      ));
    }
    if !phase.is_finite() || !amplitude.is_finite() {
      return Err(DynamicsError::invalid(
        "cycle",
        format!("phase {phase} and amplitude {amplitude} must be finite"),
      ));
    }

    Ok(Self {
      period,
      phase,
      amplitude,
    })
  }

  pub fn period(&self) -> f64 {
    self.period
  }

  pub fn phase(&self) -> f64 {
    self.phase
  }

  pub fn amplitude(&self) -> f64 {
    self.amplitude
  }

  fn angle(&self, index: usize) -> f64 {
    (index as f64 - self.phase) * (2.0 * PI / self.period)
  }

  /// `amplitude * sin((i - phase) * 2π / period)` for each period `i`.
  pub fn sine(&self, sequence: Sequence) -> Flow {
    Flow::from_fn("Sine Cycle", Units::Scalar, sequence, |i| {
      self.amplitude * self.angle(i).sin()
    })
  }

  pub fn asymmetric_sine(&self, parameter: f64, sequence: Sequence) -> Result<Flow> {
    self.asymmetric_sine_with(parameter, sequence, DEFAULT_PRECISION, DEFAULT_BOUND)
  }

  /// Asymmetric (sawtooth-like) wave with shear `parameter`. A zero shear is
  /// the plain [`Cycle::sine`].
  pub fn asymmetric_sine_with(
    &self,
    parameter: f64,
    sequence: Sequence,
    precision: f64,
    bound: f64,
  ) -> Result<Flow> {
    if !(0.0..=1.0).contains(&parameter) {
      return Err(DynamicsError::invalid(
        "parameter",
        format!("asymmetry {parameter} must lie in [0, 1]"),
      ));
    }
    if !(precision > 0.0) || !precision.is_finite() {
      return Err(DynamicsError::invalid(
        "precision",
        format!("{precision} must be positive"),
      ));
    }
    if !(bound >= 0.0) || !bound.is_finite() {
      return Err(DynamicsError::invalid(
        "bound",
        format!("{bound} must be non-negative"),
      ));
    }

    if parameter == 0.0 {
      return Ok(self.sine(sequence).renamed("Asymmetric Sine Cycle"));
    }

    let values = (0..sequence.len())
      .into_par_iter()
      .map(|i| {
        bisect(self.angle(i), parameter, precision, bound)
          .map(|root| root * self.amplitude / -parameter)
          .ok_or_else(|| DynamicsError::NonConvergence {
            function: "asymmetric_sine".to_string(),
            iterations: MAX_BISECTION_ITERATIONS,
          })
      })
      .collect::<Result<Vec<f64>>>()?;

    Flow::new(
      "Asymmetric Sine Cycle",
      Units::Scalar,
      sequence,
      values.into(),
    )
  }
}

/// Root of `-sin(angle + y) - y / parameter` on `[-(1 + bound), 1 + bound]`.
/// The function is decreasing in `y`, so a positive value moves the lower
/// end up.
fn bisect(angle: f64, parameter: f64, precision: f64, bound: f64) -> Option<f64> {
  let mut upper = 1.0 + bound;
  let mut lower = -upper;
  let mut iterations = 0;

  while upper - lower > precision {
    if iterations == MAX_BISECTION_ITERATIONS {
      return None;
    }
    let mid = (lower + upper) / 2.0;
    if -(angle + mid).sin() - mid / parameter > 0.0 {
      lower = mid;
    } else {
      upper = mid;
    }
    iterations += 1;
  }

  Some((lower + upper) / 2.0)
}

/// Point estimates from which both cycles are derived. The asset cycle is a
/// perturbation of the space cycle.
#[derive(ImplNew, Debug, Clone, Copy, PartialEq)]
pub struct CycleEstimates {
  /// Share of the space period by which the space cycle is shifted.
  pub space_cycle_phase_prop: f64,
  pub space_cycle_period: f64,
  /// Peak-to-trough height of the space cycle, as a fraction of mid-cycle.
  pub space_cycle_height: f64,
  /// Asset period minus space period.
  pub asset_cycle_period_diff: f64,
  /// Asset phase offset from the space phase, as a share of the asset period.
  pub asset_cycle_phase_diff_prop: f64,
  /// In cap rate units.
  pub asset_cycle_amplitude: f64,
  pub space_cycle_asymmetric_parameter: f64,
  pub asset_cycle_asymmetric_parameter: f64,
}

/// Laws of the eight [`CycleEstimates`] fields, drawn independently.
#[derive(ImplNew, Debug, Clone)]
pub struct CyclicalityLikelihoods<D> {
  pub space_cycle_phase_prop: D,
  pub space_cycle_period: D,
  pub space_cycle_height: D,
  pub asset_cycle_period_diff: D,
  pub asset_cycle_phase_diff_prop: D,
  pub asset_cycle_amplitude: D,
  pub space_cycle_asymmetric_parameter: D,
  pub asset_cycle_asymmetric_parameter: D,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cyclicality {
  space_cycle: Cycle,
  asset_cycle: Cycle,
  space_cycle_asymmetric_parameter: f64,
  asset_cycle_asymmetric_parameter: f64,
  space_waveform: Flow,
  asset_waveform: Flow,
}

impl Cyclicality {
  pub fn new(
    sequence: Sequence,
    space_cycle: Cycle,
    asset_cycle: Cycle,
    space_cycle_asymmetric_parameter: f64,
    asset_cycle_asymmetric_parameter: f64,
  ) -> Result<Self> {
    let space_waveform = space_cycle
      .asymmetric_sine(space_cycle_asymmetric_parameter, sequence)?
      .shift_by(1.0)
      .renamed("Space Cycle Waveform");
    let asset_waveform = asset_cycle
      .asymmetric_sine(asset_cycle_asymmetric_parameter, sequence)?
      .renamed("Asset Cycle Waveform");

    debug!(
      space_period = space_cycle.period,
      space_phase = space_cycle.phase,
      space_amplitude = space_cycle.amplitude,
      asset_period = asset_cycle.period,
      asset_phase = asset_cycle.phase,
      asset_amplitude = asset_cycle.amplitude,
      "cyclicality"
    );

    Ok(Self {
      space_cycle,
      asset_cycle,
      space_cycle_asymmetric_parameter,
      asset_cycle_asymmetric_parameter,
      space_waveform,
      asset_waveform,
    })
  }

  #[allow(clippy::too_many_arguments)]
  pub fn from_params(
    sequence: Sequence,
    space_cycle_period: f64,
    space_cycle_phase: f64,
    space_cycle_amplitude: f64,
    asset_cycle_period: f64,
    asset_cycle_phase: f64,
    asset_cycle_amplitude: f64,
    space_cycle_asymmetric_parameter: f64,
    asset_cycle_asymmetric_parameter: f64,
  ) -> Result<Self> {
    Self::new(
      sequence,
      Cycle::new(space_cycle_period, space_cycle_phase, space_cycle_amplitude)?,
      Cycle::new(asset_cycle_period, asset_cycle_phase, asset_cycle_amplitude)?,
      space_cycle_asymmetric_parameter,
      asset_cycle_asymmetric_parameter,
    )
  }

  pub fn from_estimates(sequence: Sequence, estimates: &CycleEstimates) -> Result<Self> {
    let space_cycle_phase = estimates.space_cycle_phase_prop * estimates.space_cycle_period;
    let space_cycle_amplitude = estimates.space_cycle_height / 2.0;
    let asset_cycle_period = estimates.space_cycle_period + estimates.asset_cycle_period_diff;
    let asset_cycle_phase =
      space_cycle_phase + estimates.asset_cycle_phase_diff_prop * asset_cycle_period;

    Self::from_params(
      sequence,
      estimates.space_cycle_period,
      space_cycle_phase,
      space_cycle_amplitude,
      asset_cycle_period,
      asset_cycle_phase,
      estimates.asset_cycle_amplitude,
      estimates.space_cycle_asymmetric_parameter,
      estimates.asset_cycle_asymmetric_parameter,
    )
  }

  /// `iterations` cyclicalities, each from an independent draw of all eight
  /// estimates. Draws are taken serially from `rng`; the waveforms are then
  /// solved in parallel.
  pub fn from_likelihoods<D, R>(
    sequence: Sequence,
    likelihoods: &CyclicalityLikelihoods<D>,
    iterations: usize,
    rng: &mut R,
  ) -> Result<Vec<Self>>
  where
    D: DistributionExt,
    R: Rng + ?Sized,
  {
    let phase_props = likelihoods.space_cycle_phase_prop.sample_n(iterations, rng);
    let periods = likelihoods.space_cycle_period.sample_n(iterations, rng);
    let heights = likelihoods.space_cycle_height.sample_n(iterations, rng);
    let period_diffs = likelihoods.asset_cycle_period_diff.sample_n(iterations, rng);
    let phase_diff_props = likelihoods.asset_cycle_phase_diff_prop.sample_n(iterations, rng);
    let amplitudes = likelihoods.asset_cycle_amplitude.sample_n(iterations, rng);
    let space_params = likelihoods
      .space_cycle_asymmetric_parameter
      .sample_n(iterations, rng);
    let asset_params = likelihoods
      .asset_cycle_asymmetric_parameter
      .sample_n(iterations, rng);
    trace!(iterations, "cyclicality batch");

    let estimates = (0..iterations)
      .map(|i| {
        CycleEstimates::new(
          phase_props[i],
          periods[i],
          heights[i],
          period_diffs[i],
          phase_diff_props[i],
          amplitudes[i],
          space_params[i],
          asset_params[i],
        )
      })
      .collect::<Vec<_>>();

    let results = estimates
      .par_iter()
      .map(|estimates| Self::from_estimates(sequence, estimates))
      .collect();

    collect_batch("cyclicality", results)
  }

  pub fn space_cycle(&self) -> &Cycle {
    &self.space_cycle
  }

  pub fn asset_cycle(&self) -> &Cycle {
    &self.asset_cycle
  }

  pub fn space_cycle_asymmetric_parameter(&self) -> f64 {
    self.space_cycle_asymmetric_parameter
  }

  pub fn asset_cycle_asymmetric_parameter(&self) -> f64 {
    self.asset_cycle_asymmetric_parameter
  }

  /// Multiplicative rent factor, centred on `1`.
  pub fn space_waveform(&self) -> &Flow {
    &self.space_waveform
  }

  /// Negative cap rate deviation, centred on `0`.
  pub fn asset_waveform(&self) -> &Flow {
    &self.asset_waveform
  }
}

#[cfg(test)]
mod tests {
  use std::f64::consts::PI;

  use approx::assert_abs_diff_eq;
  use chrono::NaiveDate;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use roots::find_root_brent;
  use roots::SimpleConvergency;

  use super::*;
  use crate::distributions::Form;
  use crate::distributions::Kind;
  use crate::periodicity::Frequency;

  fn years(n: usize) -> Sequence {
    Sequence::from_bounds(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), Frequency::Year, n).unwrap()
  }

  #[test]
  fn quarter_period_sine() {
    let wave = Cycle::new(4.0, 0.0, 1.0).unwrap().sine(years(4));
    let expected = [0.0, 1.0, 0.0, -1.0];
    for (v, e) in wave.movements().iter().zip(expected) {
      assert_abs_diff_eq!(*v, e, epsilon = 1e-12);
    }
  }

  #[test]
  fn zero_shear_is_exactly_the_sine() {
    let cycle = Cycle::new(15.1, 14.3, 0.5).unwrap();
    let sine = cycle.sine(years(25));
    let asymmetric = cycle.asymmetric_sine(0.0, years(25)).unwrap();
    assert_eq!(sine.movements(), asymmetric.movements());
  }

  #[test]
  fn bisection_matches_a_reference_root_finder() {
    let cycle = Cycle::new(16.1, 15.6, 0.02).unwrap();
    let parameter = 0.7;
    let wave = cycle.asymmetric_sine_with(parameter, years(25), 1e-12, DEFAULT_BOUND).unwrap();

    for (i, value) in wave.movements().iter().enumerate() {
      let angle = (i as f64 - 15.6) * 2.0 * PI / 16.1;
      let g = |y: f64| -(angle + y).sin() - y / parameter;
      let mut convergency = SimpleConvergency {
        eps: 1e-14,
        max_iter: 100,
      };
      let root = find_root_brent(-1.1, 1.1, g, &mut convergency).unwrap();
      assert_abs_diff_eq!(*value, root * 0.02 / -parameter, epsilon = 1e-10);
    }
  }

  #[test]
  fn asymmetric_wave_is_the_sine_of_a_sheared_angle() {
    let cycle = Cycle::new(15.1, 14.3, 0.5).unwrap();
    let parameter = 0.7;
    let wave = cycle.asymmetric_sine(parameter, years(25)).unwrap();
    for (i, value) in wave.movements().iter().enumerate() {
      let angle = (i as f64 - 14.3) * 2.0 * PI / 15.1;
      // y = -p sin(angle + y) at the root, and the wave is amplitude * sin(angle + y).
      let y = -parameter * value / 0.5;
      assert_abs_diff_eq!(*value, 0.5 * (angle + y).sin(), epsilon = 1e-7);
      assert!(value.abs() <= 0.5 + 1e-12);
    }
  }

  #[test]
  fn unreachable_precision_is_a_convergence_failure() {
    let cycle = Cycle::new(10.0, 0.0, 1.0).unwrap();
    let err = cycle
      .asymmetric_sine_with(0.5, years(3), 1e-300, DEFAULT_BOUND)
      .unwrap_err();
    assert!(matches!(err, DynamicsError::NonConvergence { .. }));
  }

  #[test]
  fn invalid_cycles_and_solver_settings_are_rejected() {
    assert!(Cycle::new(0.0, 0.0, 1.0).is_err());
    assert!(Cycle::new(10.0, f64::NAN, 1.0).is_err());
    let cycle = Cycle::new(10.0, 0.0, 1.0).unwrap();
    assert!(cycle.asymmetric_sine(1.5, years(3)).is_err());
    assert!(cycle.asymmetric_sine_with(0.5, years(3), 0.0, 0.1).is_err());
    assert!(cycle.asymmetric_sine_with(0.5, years(3), 1e-8, -0.1).is_err());
  }

  #[test]
  fn waveforms_are_centred_on_one_and_zero() {
    let cyclicality = Cyclicality::from_params(years(25), 15.1, 14.3, 0.5, 16.1, 15.6, 0.02, 0.7, 0.7).unwrap();
    let space = cyclicality.space_waveform().movements();
    let asset = cyclicality.asset_waveform().movements();
    assert!(space.iter().all(|v| (v - 1.0).abs() <= 0.5 + 1e-12));
    assert!(asset.iter().all(|v| v.abs() <= 0.02 + 1e-12));

    let raw = Cycle::new(15.1, 14.3, 0.5)
      .unwrap()
      .asymmetric_sine(0.7, years(25))
      .unwrap();
    for (s, r) in space.iter().zip(raw.movements().iter()) {
      assert_abs_diff_eq!(*s, 1.0 + r, epsilon = 1e-15);
    }
  }

  #[test]
  fn estimates_perturb_the_space_cycle() {
    let estimates = CycleEstimates::new(0.25, 12.0, 0.4, 1.0, 0.1, 0.01, 0.5, 0.0);
    let cyclicality = Cyclicality::from_estimates(years(10), &estimates).unwrap();
    let space = cyclicality.space_cycle();
    let asset = cyclicality.asset_cycle();
    assert_abs_diff_eq!(space.phase(), 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(space.amplitude(), 0.2, epsilon = 1e-12);
    assert_abs_diff_eq!(asset.period(), 13.0, epsilon = 1e-12);
    assert_abs_diff_eq!(asset.phase(), 3.0 + 1.3, epsilon = 1e-12);
    assert_eq!(asset.amplitude(), 0.01);
  }

  #[test]
  fn likelihood_batch_keeps_input_order_and_is_reproducible() {
    let likelihoods = CyclicalityLikelihoods::new(
      Form::uniform(0.0, 1.0).unwrap(),
      Form::symmetric(Kind::Uniform, 15.0, 5.0).unwrap(),
      Form::symmetric(Kind::Uniform, 0.5, 0.1).unwrap(),
      Form::symmetric(Kind::Uniform, 0.0, 1.0).unwrap(),
      Form::symmetric(Kind::Uniform, 0.0, 0.1).unwrap(),
      Form::symmetric(Kind::Uniform, 0.02, 0.005).unwrap(),
      Form::symmetric(Kind::Uniform, 0.5, 0.2).unwrap(),
      Form::symmetric(Kind::Uniform, 0.5, 0.2).unwrap(),
    );
    let a = Cyclicality::from_likelihoods(years(25), &likelihoods, 16, &mut StdRng::seed_from_u64(4)).unwrap();
    let b = Cyclicality::from_likelihoods(years(25), &likelihoods, 16, &mut StdRng::seed_from_u64(4)).unwrap();
    assert_eq!(a.len(), 16);
    assert_eq!(a, b);
    assert!(a
      .iter()
      .all(|c| (10.0..20.0).contains(&c.space_cycle().period())));
  }

  #[test]
  fn failing_element_aborts_the_batch() {
    let likelihoods = CyclicalityLikelihoods::new(
      Form::default(),
      Form::symmetric(Kind::Uniform, 15.0, 5.0).unwrap(),
      Form::default(),
      Form::default(),
      Form::default(),
      Form::default(),
      // Shears above one are rejected by the solver.
      Form::symmetric(Kind::Uniform, 2.0, 0.1).unwrap(),
      Form::default(),
    );
    let result = Cyclicality::from_likelihoods(years(5), &likelihoods, 4, &mut StdRng::seed_from_u64(8));
    assert!(matches!(result, Err(DynamicsError::InvalidInput { .. })));
  }
}
