//! # Errors
//!
//! Construction-time failures of the market dynamics components. Nothing in
//! the crate retries: a failed component means the enclosing market (or batch)
//! fails with it.
//!
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DynamicsError {
  #[error("invalid input: {field}: {reason}")]
  InvalidInput { field: String, reason: String },

  #[error("invalid distribution: {0}")]
  InvalidDistribution(String),

  #[error("misaligned series: '{left}' and '{right}' do not share a period sequence")]
  Misaligned { left: String, right: String },

  #[error("{function} did not converge after {iterations} iterations")]
  NonConvergence { function: String, iterations: usize },

  #[error("invalid date: {0}")]
  InvalidDate(String),
}

impl DynamicsError {
  pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
    DynamicsError::InvalidInput {
      field: field.to_string(),
      reason: reason.into(),
    }
  }
}

pub type Result<T> = std::result::Result<T, DynamicsError>;
