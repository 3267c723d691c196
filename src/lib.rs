//! # Market Dynamics
//!
//! Stochastic real estate market simulation for discounted cash flow models.
//! A market history combines a geometric growth trend, autoregressive
//! mean-reverting volatility, asymmetric space and asset market cycles,
//! per-period noise and a rare dissipating black swan. The resulting pricing
//! factors, implied cap rates and returns scale a deterministic pro forma into
//! scenario outcomes.
//!
//! ## Modules
//!
//! | Module            | Description                                                                 |
//! |-------------------|-----------------------------------------------------------------------------|
//! | [`distributions`] | Uniform, triangular and PERT laws behind the closed [`Form`] variant set.   |
//! | [`dynamics`]      | Trend, volatility, cyclicality, noise, black swan and their market.         |
//! | [`error`]         | Crate error type.                                                           |
//! | [`flux`]          | Named, unit-tagged series aligned to a period sequence.                     |
//! | [`periodicity`]   | Calendar-aligned fixed-frequency period sequences.                          |
//! | [`projection`]    | Deterministic compounding, straight-line and recurring extrapolation.       |
//! | [`summary`]       | Cross-sectional statistics of an ensemble.                                  |
//! | [`traits`]        | Distribution and series generator contracts.                               |
//!
//! ## Randomness
//!
//! Nothing reads a global generator. Every sampling call takes an explicit
//! `&mut impl Rng`; a seeded `StdRng` makes a whole ensemble reproducible,
//! including its parallel parts.
//!
pub mod distributions;
pub mod dynamics;
pub mod error;
pub mod flux;
pub mod periodicity;
pub mod projection;
pub mod summary;
pub mod traits;

pub use distributions::Form;
pub use distributions::Kind;
pub use dynamics::BlackSwan;
pub use dynamics::Cycle;
pub use dynamics::CycleEstimates;
pub use dynamics::Cyclicality;
pub use dynamics::CyclicalityLikelihoods;
pub use dynamics::Market;
pub use dynamics::Noise;
pub use dynamics::Trend;
pub use dynamics::Volatility;
pub use error::DynamicsError;
pub use error::Result;
pub use flux::Flow;
pub use flux::Units;
pub use periodicity::Frequency;
pub use periodicity::Sequence;
pub use summary::Summary;
pub use traits::DistributionExt;
pub use traits::SeriesExt;
