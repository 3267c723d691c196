//! # Noise
//!
//! $$
//! \eta_i \overset{iid}{\sim} D
//! $$
//!
//! Transaction or observation error, realised every period and applied to
//! value levels. It never accumulates.
//!
use rand::Rng;

use crate::distributions::Form;
use crate::flux::Flow;
use crate::flux::Units;
use crate::periodicity::Sequence;
use crate::traits::DistributionExt;
use crate::traits::SeriesExt;

#[derive(Debug, Clone)]
pub struct Noise {
  sequence: Sequence,
  noise_dist: Form,
}

impl Noise {
  pub fn new(sequence: Sequence, noise_dist: impl Into<Form>) -> Self {
    Self {
      sequence,
      noise_dist: noise_dist.into(),
    }
  }

  pub fn sequence(&self) -> &Sequence {
    &self.sequence
  }

  pub fn distribution(&self) -> &Form {
    &self.noise_dist
  }
}

impl SeriesExt for Noise {
  /// A fresh independent draw per period.
  fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Flow {
    let draws = self.noise_dist.sample_n(self.sequence.len(), rng);
    Flow::from_fn("Noise", Units::Scalar, self.sequence, |i| draws[i])
  }
}
