//! # Periodicity
//!
//! $$
//! \mathcal{S} = \{[t_0 + i\Delta, t_0 + (i+1)\Delta) : i = 0,\ldots,N-1\}
//! $$
//!
//! Fixed-frequency, calendar-aligned period sequences. Every series in the
//! crate is indexed `0..N` against one of these and keyed by its period-end
//! dates.
//!
use chrono::Datelike;
use chrono::Days;
use chrono::Months;
use chrono::NaiveDate;

use crate::error::DynamicsError;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
  Year,
  SemiYear,
  Quarter,
  Month,
  Week,
  Day,
}

impl Frequency {
  /// Number of periods of this frequency in a calendar year (weeks and days
  /// are nominal).
  pub fn yearly_count(&self) -> f64 {
    match self {
      Frequency::Year => 1.0,
      Frequency::SemiYear => 2.0,
      Frequency::Quarter => 4.0,
      Frequency::Month => 12.0,
      Frequency::Week => 52.0,
      Frequency::Day => 365.0,
    }
  }

  fn months(&self) -> Option<u32> {
    match self {
      Frequency::Year => Some(12),
      Frequency::SemiYear => Some(6),
      Frequency::Quarter => Some(3),
      Frequency::Month => Some(1),
      Frequency::Week | Frequency::Day => None,
    }
  }

  /// Start of the period that contains `date`. Weeks start on Monday.
  pub fn floor(&self, date: NaiveDate) -> Option<NaiveDate> {
    match self.months() {
      Some(months) => {
        let month0 = (date.month0() / months) * months;
        NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1)
      }
      None => match self {
        Frequency::Week => {
          date.checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))
        }
        _ => Some(date),
      },
    }
  }

  /// Moves `date` by `n` whole periods (backwards when negative).
  pub fn advance(&self, date: NaiveDate, n: i64) -> Option<NaiveDate> {
    match self.months() {
      Some(months) => {
        let total = u32::try_from(n.unsigned_abs().checked_mul(months as u64)?).ok()?;
        if n >= 0 {
          date.checked_add_months(Months::new(total))
        } else {
          date.checked_sub_months(Months::new(total))
        }
      }
      None => {
        let step = if *self == Frequency::Week { 7 } else { 1 };
        let days = Days::new(n.unsigned_abs().checked_mul(step)?);
        if n >= 0 {
          date.checked_add_days(days)
        } else {
          date.checked_sub_days(days)
        }
      }
    }
  }
}

/// An ordered run of `len` equally spaced periods starting with the period
/// that contains `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sequence {
  start: NaiveDate,
  frequency: Frequency,
  len: usize,
}

impl Sequence {
  pub fn from_bounds(date: NaiveDate, frequency: Frequency, periods: usize) -> Result<Self> {
    let start = frequency
      .floor(date)
      .ok_or_else(|| DynamicsError::InvalidDate(format!("cannot align {date} to {frequency:?}")))?;

    let sequence = Self {
      start,
      frequency,
      len: periods,
    };
    // Reject horizons that run off the calendar up front.
    sequence.period_start(periods)?;
    Ok(sequence)
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn frequency(&self) -> Frequency {
    self.frequency
  }

  pub fn start(&self) -> NaiveDate {
    self.start
  }

  pub fn period_start(&self, index: usize) -> Result<NaiveDate> {
    let n = i64::try_from(index)
      .map_err(|_| DynamicsError::InvalidDate(format!("period index {index} out of range")))?;
    self
      .frequency
      .advance(self.start, n)
      .ok_or_else(|| DynamicsError::InvalidDate(format!("period {index} overflows the calendar")))
  }

  pub fn period_end(&self, index: usize) -> Result<NaiveDate> {
    let next = self.period_start(index + 1)?;
    next
      .pred_opt()
      .ok_or_else(|| DynamicsError::InvalidDate(format!("no day precedes {next}")))
  }

  /// Period-end dates, one per period.
  pub fn datestamps(&self) -> Result<Vec<NaiveDate>> {
    (0..self.len).map(|i| self.period_end(i)).collect()
  }

  /// Period-start dates, one per period.
  pub fn start_datestamps(&self) -> Result<Vec<NaiveDate>> {
    (0..self.len).map(|i| self.period_start(i)).collect()
  }

  /// The same sequence without its final period.
  pub fn shrink(&self) -> Self {
    Self {
      len: self.len.saturating_sub(1),
      ..*self
    }
  }

  /// A sequence of the same length moved by whole periods.
  pub fn offset(&self, periods: i64) -> Result<Self> {
    let start = self
      .frequency
      .advance(self.start, periods)
      .ok_or_else(|| DynamicsError::InvalidDate(format!("cannot offset {} by {periods}", self.start)))?;
    Ok(Self { start, ..*self })
  }

  /// Index of the period containing `date`, if any.
  pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
    if date < self.start {
      return None;
    }
    (0..self.len).find(|&i| matches!(self.period_end(i), Ok(end) if date <= end))
  }
}
