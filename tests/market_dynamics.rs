use approx::assert_relative_eq;
use chrono::NaiveDate;
use market_dynamics::BlackSwan;
use market_dynamics::Cyclicality;
use market_dynamics::CyclicalityLikelihoods;
use market_dynamics::Form;
use market_dynamics::Frequency;
use market_dynamics::Kind;
use market_dynamics::Market;
use market_dynamics::Noise;
use market_dynamics::Sequence;
use market_dynamics::Summary;
use market_dynamics::Trend;
use market_dynamics::Volatility;
use rand::rngs::StdRng;
use rand::SeedableRng;

const ITERATIONS: usize = 200;
const PERIODS: usize = 25;

fn sequence() -> Sequence {
  Sequence::from_bounds(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), Frequency::Year, PERIODS).unwrap()
}

fn simulate(seed: u64) -> Vec<Market> {
  let seq = sequence();
  let mut rng = StdRng::seed_from_u64(seed);

  let growth = Form::symmetric(Kind::Pert, -0.002537905, 0.003).unwrap();
  let initial = Form::symmetric(Kind::Pert, 0.050747414, 0.005).unwrap();
  let trends = Trend::from_likelihoods(seq, 0.05, &growth, &initial, ITERATIONS, &mut rng).unwrap();

  let volatilities = Volatility::from_trends(&trends, 0.1, 0.2, 0.3, seq, &mut rng).unwrap();

  let likelihoods = CyclicalityLikelihoods::new(
    Form::uniform(0.0, 1.0).unwrap(),
    Form::symmetric(Kind::Uniform, 15.0, 5.0).unwrap(),
    Form::symmetric(Kind::Uniform, 0.5, 0.1).unwrap(),
    Form::symmetric(Kind::Uniform, 0.0, 1.0).unwrap(),
    Form::symmetric(Kind::Uniform, 0.0, 0.1).unwrap(),
    Form::symmetric(Kind::Uniform, 0.02, 0.005).unwrap(),
    Form::symmetric(Kind::Uniform, 0.7, 0.2).unwrap(),
    Form::symmetric(Kind::Uniform, 0.7, 0.2).unwrap(),
  );
  let cyclicalities = Cyclicality::from_likelihoods(seq, &likelihoods, ITERATIONS, &mut rng).unwrap();

  let noise = Noise::new(seq, Form::symmetric(Kind::Triangular, 0.0, 0.05).unwrap());
  let black_swan = BlackSwan::new(seq, 0.05, 0.3, Form::default(), -0.25).unwrap();

  Market::from_likelihoods(seq, trends, volatilities, cyclicalities, noise, black_swan, &mut rng).unwrap()
}

#[test]
fn ensemble_is_reproducible_for_a_seed() {
  let a = simulate(7);
  let b = simulate(7);
  for (x, y) in a.iter().zip(b.iter()) {
    assert_eq!(x.historical_value(), y.historical_value());
    assert_eq!(x.implied_rev_cap_rate(), y.implied_rev_cap_rate());
  }
}

#[test]
fn every_market_is_internally_consistent() {
  let markets = simulate(11);
  assert_eq!(markets.len(), ITERATIONS);

  for market in &markets {
    let trend = market.trend().values();
    let space = market.space_market().movements();
    let cap = market.asset_market().movements();
    let waveform = market.cyclicality().asset_waveform().movements();
    let historical = market.historical_value().movements();

    assert_eq!(space.len(), PERIODS);
    assert_eq!(market.returns().len(), PERIODS - 1);
    assert_eq!(market.implied_rev_cap_rate().len(), PERIODS - 1);
    assert_eq!(market.volatility().cumulative().movements()[0], trend[0]);

    for i in 0..PERIODS {
      assert_relative_eq!(cap[i], 0.05 - waveform[i], max_relative = 1e-12);
      assert!(cap[i] > 0.0);
      assert_relative_eq!(
        market.space_market_price_factors().movements()[i],
        space[i] / market.trend().initial_value(),
        max_relative = 1e-12
      );
    }
    for i in 0..PERIODS - 1 {
      assert_relative_eq!(
        market.returns().movements()[i],
        historical[i + 1] / historical[i] - 1.0,
        max_relative = 1e-9
      );
    }
  }
}

#[test]
fn ensemble_statistics_are_plausible() {
  let markets = simulate(13);

  let price_factors = Summary::per_period(&markets, |m| m.space_market_price_factors()).unwrap();
  assert_eq!(price_factors.len(), PERIODS);
  // Every history starts from its own drawn rent with the space cycle applied.
  assert!(price_factors[0].min > 0.0);
  assert_relative_eq!(price_factors[0].mean, 1.0, max_relative = 0.5);

  let cap_rates = Summary::per_period(&markets, |m| m.asset_market()).unwrap();
  for period in &cap_rates {
    assert_eq!(period.count, ITERATIONS);
    assert!(period.min > 0.0);
    assert!(period.p5 <= period.p50 && period.p50 <= period.p95);
    assert!((period.mean - 0.05).abs() < 0.03);
  }

  let growth_rates = markets.iter().map(|m| m.trend().growth_rate()).collect::<Vec<_>>();
  let growth = Summary::of(&growth_rates).unwrap();
  assert!(growth.min >= -0.002537905 - 0.003 - 1e-12);
  assert!(growth.max <= -0.002537905 + 0.003 + 1e-12);
}
