//! # Projection
//!
//! $$
//! v_i = v_0\,\phi_i,\qquad \phi_i\in\{(1+r)^i,\; 1+si,\; \mathbf{1}_{i \bmod k = 0}\}
//! $$
//!
//! Deterministic extrapolation of a starting value across a period sequence.
//!
use ndarray::Array1;

use crate::error::DynamicsError;
use crate::error::Result;
use crate::flux::Flow;
use crate::flux::Units;
use crate::periodicity::Sequence;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extrapolation {
  /// Geometric growth at `rate` per period.
  Compounding { rate: f64 },
  /// Linear growth of `slope` (as a share of the initial value) per period.
  StraightLine { slope: f64 },
  /// The full value every `interval` periods, starting with the first.
  Recurring { interval: usize },
}

impl Extrapolation {
  /// Multiplicative factor of the initial value for periods `0..n`.
  pub fn factors(&self, n: usize) -> Result<Array1<f64>> {
    match *self {
      Extrapolation::Compounding { rate } => {
        if rate <= -1.0 || !rate.is_finite() {
          return Err(DynamicsError::invalid(
            "rate",
            format!("compounding rate {rate} must be finite and above -1"),
          ));
        }
        let mut factors = Array1::<f64>::ones(n);
        for i in 1..n {
          factors[i] = factors[i - 1] * (1.0 + rate);
        }
        Ok(factors)
      }
      Extrapolation::StraightLine { slope } => {
        Ok(Array1::from_shape_fn(n, |i| 1.0 + slope * i as f64))
      }
      Extrapolation::Recurring { interval } => {
        if interval == 0 {
          return Err(DynamicsError::invalid("interval", "must be at least one period"));
        }
        Ok(Array1::from_shape_fn(n, |i| {
          if i % interval == 0 {
            1.0
          } else {
            0.0
          }
        }))
      }
    }
  }

  pub fn project(
    &self,
    value: f64,
    sequence: Sequence,
    name: impl Into<String>,
    units: Units,
  ) -> Result<Flow> {
    let movements = self.factors(sequence.len())? * value;
    Flow::new(name, units, sequence, movements)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use chrono::NaiveDate;
  use ndarray::array;

  use super::Extrapolation;
  use crate::flux::Units;
  use crate::periodicity::Frequency;
  use crate::periodicity::Sequence;

  #[test]
  fn compounding_factors() {
    let f = Extrapolation::Compounding { rate: 0.1 }.factors(4).unwrap();
    assert_relative_eq!(f[3], 1.331, max_relative = 1e-12);
    assert_eq!(f[0], 1.0);
  }

  #[test]
  fn straight_line_and_recurring_factors() {
    let line = Extrapolation::StraightLine { slope: 0.5 }.factors(3).unwrap();
    assert_eq!(line, array![1.0, 1.5, 2.0]);
    let every_other = Extrapolation::Recurring { interval: 2 }.factors(5).unwrap();
    assert_eq!(every_other, array![1.0, 0.0, 1.0, 0.0, 1.0]);
    assert!(Extrapolation::Recurring { interval: 0 }.factors(5).is_err());
  }

  #[test]
  fn projects_a_value_onto_a_sequence() {
    let seq = Sequence::from_bounds(
      NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
      Frequency::Year,
      3,
    )
    .unwrap();
    let flow = Extrapolation::Compounding { rate: 0.0 }
      .project(100.0, seq, "Rent", Units::Currency("USD".into()))
      .unwrap();
    assert_eq!(flow.movements(), &array![100.0, 100.0, 100.0]);
    assert_eq!(flow.name(), "Rent");
  }
}
