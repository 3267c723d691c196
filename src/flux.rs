//! # Flux
//!
//! $$
//! F = \{(d_i, v_i)\}_{i=0}^{N-1},\quad d_i = \text{end of period } i
//! $$
//!
//! A `Flow` is a named, unit-tagged run of values aligned to a period
//! sequence. Arithmetic between flows is only defined when both share the
//! same sequence; nothing is truncated or padded to make them fit.
//!
use chrono::NaiveDate;
use ndarray::s;
use ndarray::Array1;

use crate::error::DynamicsError;
use crate::error::Result;
use crate::periodicity::Sequence;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Units {
  #[default]
  Scalar,
  Rate,
  Currency(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
  name: String,
  units: Units,
  sequence: Sequence,
  movements: Array1<f64>,
}

impl Flow {
  pub fn new(
    name: impl Into<String>,
    units: Units,
    sequence: Sequence,
    movements: Array1<f64>,
  ) -> Result<Self> {
    let name = name.into();
    if movements.len() != sequence.len() {
      return Err(DynamicsError::invalid(
        "movements",
        format!(
          "'{name}' has {} values for a sequence of {} periods",
          movements.len(),
          sequence.len()
        ),
      ));
    }

    Ok(Self {
      name,
      units,
      sequence,
      movements,
    })
  }

  pub fn from_fn<F>(name: impl Into<String>, units: Units, sequence: Sequence, f: F) -> Self
  where
    F: FnMut(usize) -> f64,
  {
    Self {
      name: name.into(),
      units,
      sequence,
      movements: Array1::from_shape_fn(sequence.len(), f),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn units(&self) -> &Units {
    &self.units
  }

  pub fn sequence(&self) -> &Sequence {
    &self.sequence
  }

  pub fn movements(&self) -> &Array1<f64> {
    &self.movements
  }

  pub fn len(&self) -> usize {
    self.movements.len()
  }

  pub fn is_empty(&self) -> bool {
    self.movements.is_empty()
  }

  pub fn renamed(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn with_units(mut self, units: Units) -> Self {
    self.units = units;
    self
  }

  fn zip_with<F>(&self, other: &Flow, op: F) -> Result<Flow>
  where
    F: Fn(f64, f64) -> f64,
  {
    if self.sequence != other.sequence {
      return Err(DynamicsError::Misaligned {
        left: self.name.clone(),
        right: other.name.clone(),
      });
    }

    let mut movements = self.movements.clone();
    movements.zip_mut_with(&other.movements, |a, &b| *a = op(*a, b));
    Ok(Flow {
      name: self.name.clone(),
      units: self.units.clone(),
      sequence: self.sequence,
      movements,
    })
  }

  pub fn checked_add(&self, other: &Flow) -> Result<Flow> {
    self.zip_with(other, |a, b| a + b)
  }

  pub fn checked_sub(&self, other: &Flow) -> Result<Flow> {
    self.zip_with(other, |a, b| a - b)
  }

  pub fn checked_mul(&self, other: &Flow) -> Result<Flow> {
    self.zip_with(other, |a, b| a * b)
  }

  pub fn checked_div(&self, other: &Flow) -> Result<Flow> {
    self.zip_with(other, |a, b| a / b)
  }

  pub fn map<F>(&self, name: impl Into<String>, f: F) -> Flow
  where
    F: Fn(f64) -> f64,
  {
    Flow {
      name: name.into(),
      units: self.units.clone(),
      sequence: self.sequence,
      movements: self.movements.mapv(f),
    }
  }

  pub fn scale(&self, factor: f64) -> Flow {
    self.map(self.name.clone(), |v| v * factor)
  }

  pub fn shift_by(&self, amount: f64) -> Flow {
    self.map(self.name.clone(), |v| v + amount)
  }

  pub fn negate(&self) -> Flow {
    self.scale(-1.0)
  }

  /// Values `0..N-1` on the shrunk sequence.
  pub fn drop_last(&self) -> Flow {
    let n = self.len().saturating_sub(1);
    Flow {
      name: self.name.clone(),
      units: self.units.clone(),
      sequence: self.sequence.shrink(),
      movements: self.movements.slice(s![..n]).to_owned(),
    }
  }

  /// Values `1..N` moved one period back onto the shrunk sequence, so that
  /// period `i` carries what was observed at `i + 1`.
  pub fn lead(&self) -> Flow {
    let start = self.len().min(1);
    Flow {
      name: self.name.clone(),
      units: self.units.clone(),
      sequence: self.sequence.shrink(),
      movements: self.movements.slice(s![start..]).to_owned(),
    }
  }

  pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
    self
      .sequence
      .index_of(date)
      .and_then(|i| self.movements.get(i).copied())
  }

  pub fn sum(&self) -> f64 {
    self.movements.sum()
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use chrono::NaiveDate;
  use ndarray::array;

  use super::Flow;
  use super::Units;
  use crate::error::DynamicsError;
  use crate::periodicity::Frequency;
  use crate::periodicity::Sequence;

  fn years(n: usize) -> Sequence {
    Sequence::from_bounds(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), Frequency::Year, n).unwrap()
  }

  #[test]
  fn rejects_length_mismatch() {
    let err = Flow::new("x", Units::Scalar, years(3), array![1.0, 2.0]).unwrap_err();
    assert!(matches!(err, DynamicsError::InvalidInput { .. }));
  }

  #[test]
  fn elementwise_arithmetic_on_aligned_flows() {
    let a = Flow::new("a", Units::Scalar, years(3), array![1.0, 2.0, 3.0]).unwrap();
    let b = Flow::new("b", Units::Scalar, years(3), array![2.0, 4.0, 6.0]).unwrap();
    assert_eq!(a.checked_mul(&b).unwrap().movements(), &array![2.0, 8.0, 18.0]);
    assert_eq!(b.checked_div(&a).unwrap().movements(), &array![2.0, 2.0, 2.0]);
    assert_eq!(b.checked_sub(&a).unwrap().movements(), &array![1.0, 2.0, 3.0]);
    assert_abs_diff_eq!(a.checked_add(&b).unwrap().sum(), 18.0);
  }

  #[test]
  fn misaligned_flows_fail_loudly() {
    let a = Flow::from_fn("a", Units::Scalar, years(3), |_| 1.0);
    let b = Flow::from_fn("b", Units::Scalar, years(4), |_| 1.0);
    let shifted = Flow::from_fn("c", Units::Scalar, years(3).offset(1).unwrap(), |_| 1.0);
    assert!(matches!(a.checked_mul(&b), Err(DynamicsError::Misaligned { .. })));
    assert!(matches!(a.checked_sub(&shifted), Err(DynamicsError::Misaligned { .. })));
  }

  #[test]
  fn lead_and_drop_last_share_the_shrunk_sequence() {
    let a = Flow::from_fn("a", Units::Scalar, years(4), |i| i as f64);
    let lead = a.lead();
    let lag = a.drop_last();
    assert_eq!(lead.sequence(), lag.sequence());
    assert_eq!(lead.movements(), &array![1.0, 2.0, 3.0]);
    assert_eq!(lag.movements(), &array![0.0, 1.0, 2.0]);
    assert_eq!(lead.checked_sub(&lag).unwrap().movements(), &array![1.0, 1.0, 1.0]);
  }

  #[test]
  fn arithmetic_keeps_the_left_units() {
    let rent =
      Flow::from_fn("rent", Units::Scalar, years(2), |_| 100.0).with_units(Units::Currency("USD".into()));
    let growth = Flow::from_fn("growth", Units::Rate, years(2), |_| 1.05);
    let grown = rent.checked_mul(&growth).unwrap();
    assert_eq!(grown.units(), &Units::Currency("USD".into()));
    assert_eq!(grown.name(), "rent");
  }

  #[test]
  fn single_period_flow_shrinks_to_empty() {
    let a = Flow::from_fn("a", Units::Scalar, years(1), |_| 5.0);
    assert!(a.lead().is_empty());
    assert!(a.drop_last().is_empty());
  }

  #[test]
  fn lookup_by_calendar_date() {
    let a = Flow::from_fn("a", Units::Rate, years(3), |i| 10.0 * i as f64);
    assert_eq!(a.value_at(NaiveDate::from_ymd_opt(2001, 3, 1).unwrap()), Some(10.0));
    assert_eq!(a.value_at(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()), None);
    assert_eq!(a.negate().movements(), &array![-0.0, -10.0, -20.0]);
    assert_eq!(a.shift_by(1.0).movements(), &array![1.0, 11.0, 21.0]);
  }
}
