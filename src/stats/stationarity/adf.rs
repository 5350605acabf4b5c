use tracing::debug;

use super::common::CriticalValues;
use super::common::DeterministicTerm;
use super::common::LagSelection;
use super::common::choose_lag_for_adf;
use super::common::fit_adf;
use super::common::max_lag_bound;
use super::common::schwert_max_lags;
use super::common::validate_alpha;
use super::common::validate_series;
use super::error::Result;
use super::error::StationarityError;
use super::mackinnon::mackinnon_critical_values;
use super::mackinnon::mackinnon_p_value;

/// Configuration for the Augmented Dickey-Fuller unit-root test.
#[derive(Debug, Clone, Copy)]
pub struct ADFConfig {
  /// Deterministic terms included in the test regression.
  pub deterministic: DeterministicTerm,
  /// Lag-order selection strategy.
  pub lag_selection: LagSelection,
  /// Maximum lag considered. If `None`, the Schwert (1989) rule is used.
  pub max_lags: Option<usize>,
  /// Significance level used to compute `reject_unit_root`.
  pub alpha: f64,
}

impl Default for ADFConfig {
  fn default() -> Self {
    Self {
      deterministic: DeterministicTerm::Constant,
      lag_selection: LagSelection::Aic,
      max_lags: None,
      alpha: 0.05,
    }
  }
}

/// Result of the Augmented Dickey-Fuller test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ADFResult {
  /// ADF t-statistic for the lagged level coefficient.
  pub statistic: f64,
  /// MacKinnon (1994) approximate p-value.
  pub p_value: f64,
  /// Selected lag order.
  pub used_lags: usize,
  /// Number of regression observations used by the fitted model.
  pub nobs: usize,
  /// MacKinnon (2010) critical values at 1%, 5%, 10% levels.
  pub critical_values: CriticalValues,
  /// Best criterion value of the lag search (`None` for a fixed lag).
  pub ic_best: Option<f64>,
  /// Whether the null (unit root) is rejected at `alpha`.
  pub reject_unit_root: bool,
}

/// Augmented Dickey-Fuller unit-root test.
///
/// Candidate lags are compared on a common sample; the selected lag is then
/// re-estimated on every observation it can use.
///
/// # Errors
/// `InvalidArgument` for non-finite, constant or too-short series and for a
/// maximum lag above `n/2 - ntrend - 1`. `SingularDesign` if a regression
/// design is rank-deficient.
pub fn adf_test(y: &[f64], cfg: ADFConfig) -> Result<ADFResult> {
  validate_series(y, 3)?;
  validate_alpha(cfg.alpha)?;

  let (min, max) = y
    .iter()
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
  if max == min {
    return Err(StationarityError::invalid("invalid input, series is constant"));
  }

  let n = y.len();
  let max_lags = match cfg.max_lags {
    None => schwert_max_lags(n, cfg.deterministic)?,
    Some(p) => match max_lag_bound(n, cfg.deterministic) {
      Some(bound) if p <= bound => p,
      _ => {
        return Err(StationarityError::invalid(format!(
          "max lag {p} must be at most n/2 - 1 - ntrend for n = {n}"
        )));
      }
    },
  };

  let (used_lags, ic_best) =
    choose_lag_for_adf(y, cfg.deterministic, cfg.lag_selection, max_lags)?;
  debug!(
    max_lags,
    used_lags,
    selection = ?cfg.lag_selection,
    "ADF lag order selected"
  );

  let fit = fit_adf(y, used_lags, cfg.deterministic)?;
  let p_value = mackinnon_p_value(fit.statistic, cfg.deterministic, 1)?;
  let critical_values = mackinnon_critical_values(1, cfg.deterministic, Some(fit.nobs))?;
  let reject_unit_root = fit.statistic < critical_values.value_at(cfg.alpha);

  Ok(ADFResult {
    statistic: fit.statistic,
    p_value,
    used_lags,
    nobs: fit.nobs,
    critical_values,
    ic_best,
    reject_unit_root,
  })
}

#[cfg(test)]
pub(crate) mod tests {
  use rand::Rng;
  use rand::SeedableRng;
  use rand::rngs::StdRng;
  use rand_distr::StandardNormal;

  use super::ADFConfig;
  use super::adf_test;
  use crate::stats::stationarity::common::DeterministicTerm;
  use crate::stats::stationarity::common::LagSelection;
  use crate::stats::stationarity::error::StationarityError;

  pub(crate) fn simulate_ar1(phi: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = vec![0.0; n];
    for t in 1..n {
      let eps: f64 = rng.sample(StandardNormal);
      x[t] = phi * x[t - 1] + eps;
    }
    x
  }

  pub(crate) fn simulate_random_walk(n: usize, seed: u64) -> Vec<f64> {
    simulate_ar1(1.0, n, seed)
  }

  #[test]
  fn adf_rejects_stationary_ar1() {
    let x = simulate_ar1(0.7, 2400, 1);
    let cfg = ADFConfig {
      deterministic: DeterministicTerm::Constant,
      lag_selection: LagSelection::Fixed,
      max_lags: Some(4),
      ..ADFConfig::default()
    };
    let res = adf_test(&x, cfg).unwrap();
    assert!(
      res.reject_unit_root,
      "expected unit-root rejection, got {res:?}"
    );
    assert!(res.p_value < 0.01);
    assert_eq!(res.used_lags, 4);
    assert_eq!(res.nobs, 2400 - 1 - 4);
    assert_eq!(res.ic_best, None);
  }

  #[test]
  fn adf_keeps_unit_root_for_random_walk() {
    let x = simulate_random_walk(2400, 2);
    let cfg = ADFConfig {
      deterministic: DeterministicTerm::Constant,
      lag_selection: LagSelection::Fixed,
      max_lags: Some(4),
      alpha: 0.01,
    };
    let res = adf_test(&x, cfg).unwrap();
    assert!(
      !res.reject_unit_root,
      "expected no rejection for random walk, got {res:?}"
    );
  }

  #[test]
  fn adf_lag_search_reports_criterion() {
    let x = simulate_ar1(0.5, 500, 3);
    for selection in [LagSelection::Aic, LagSelection::Bic, LagSelection::TStat] {
      let cfg = ADFConfig {
        deterministic: DeterministicTerm::None,
        lag_selection: selection,
        max_lags: Some(8),
        ..ADFConfig::default()
      };
      let res = adf_test(&x, cfg).unwrap();
      assert!(res.used_lags <= 8);
      assert_eq!(res.nobs, 500 - 1 - res.used_lags);
      assert!(res.ic_best.is_some_and(f64::is_finite));
    }
  }

  #[test]
  fn adf_rejects_oversized_lag_and_constant_input() {
    let x = simulate_ar1(0.5, 40, 4);
    let cfg = ADFConfig {
      deterministic: DeterministicTerm::ConstantTrend,
      max_lags: Some(18),
      ..ADFConfig::default()
    };
    assert!(matches!(
      adf_test(&x, cfg),
      Err(StationarityError::InvalidArgument(_))
    ));
    assert!(matches!(
      adf_test(&[2.0; 50], ADFConfig::default()),
      Err(StationarityError::InvalidArgument(_))
    ));
  }
}
