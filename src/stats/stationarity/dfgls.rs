//! Elliott-Rothenberg-Stock (1996) DF-GLS unit-root test.
//!
//! The series is GLS-detrended under the local-to-unity alternative
//! `1 + cbar/n` and a zero-mean ADF tau test is run on the result.

use std::str::FromStr;

use ndarray::ArrayView;
use ndarray::Dimension;
use tracing::debug;
use tracing::trace;

use super::adf::ADFConfig;
use super::adf::adf_test;
use super::common::CriticalValues;
use super::common::DeterministicTerm;
use super::common::LagSelection;
use super::common::ols;
use super::common::validate_alpha;
use super::common::validate_series;
use super::error::Result;
use super::error::StationarityError;
use super::mackinnon::mackinnon_critical_values;
use super::mackinnon::mackinnon_p_value;

/// Shortest series accepted; keeps `1 + cbar/n` inside (0, 1) for both trends.
pub const DFGLS_MIN_OBS: usize = 20;

/// Adjusted series below this fraction of the input spread carry no signal.
const DEGENERATE_TOL: f64 = 1e-10;

/// Deterministic specification for ERS / DF-GLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DFGLSTrend {
  /// Constant-only GLS detrending.
  Constant,
  /// Constant + linear trend GLS detrending.
  ConstantTrend,
}

impl DFGLSTrend {
  /// Local-to-unity parameter `1 + cbar/n`.
  pub fn gls_alpha(self, n: usize) -> f64 {
    let cbar = match self {
      DFGLSTrend::Constant => -7.0,
      DFGLSTrend::ConstantTrend => -13.5,
    };
    1.0 + cbar / n as f64
  }
}

impl From<DFGLSTrend> for DeterministicTerm {
  fn from(trend: DFGLSTrend) -> Self {
    match trend {
      DFGLSTrend::Constant => DeterministicTerm::Constant,
      DFGLSTrend::ConstantTrend => DeterministicTerm::ConstantTrend,
    }
  }
}

impl FromStr for DFGLSTrend {
  type Err = StationarityError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "c" | "constant" => Ok(DFGLSTrend::Constant),
      "ct" | "constant_trend" => Ok(DFGLSTrend::ConstantTrend),
      other => Err(StationarityError::invalid(format!(
        "DFGLS: regression option '{other}' not understood"
      ))),
    }
  }
}

/// Configuration for the Elliott-Rothenberg-Stock DF-GLS test.
#[derive(Debug, Clone, Copy)]
pub struct DFGLSConfig {
  /// Trend specification used in GLS detrending.
  pub trend: DFGLSTrend,
  /// Lag-order selection strategy for the ADF-on-detrended stage.
  pub lag_selection: LagSelection,
  /// Maximum lag considered. If `None`, the Schwert (1989) rule is used.
  pub max_lags: Option<usize>,
  /// Significance level used to compute `reject_unit_root`.
  pub alpha: f64,
}

impl Default for DFGLSConfig {
  fn default() -> Self {
    Self {
      trend: DFGLSTrend::Constant,
      lag_selection: LagSelection::Aic,
      max_lags: None,
      alpha: 0.05,
    }
  }
}

/// Result of the Elliott-Rothenberg-Stock DF-GLS test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DFGLSResult {
  /// DF-GLS test statistic.
  pub statistic: f64,
  /// MacKinnon approximate p-value.
  pub p_value: f64,
  /// Selected lag order.
  pub used_lags: usize,
  /// Number of observations used in the terminal regression.
  pub nobs: usize,
  /// Critical values at 1%, 5%, 10% levels.
  pub critical_values: CriticalValues,
  /// Best criterion value of the lag search (`None` for a fixed lag).
  pub ic_best: Option<f64>,
  /// Whether the null (unit root) is rejected at `alpha`.
  pub reject_unit_root: bool,
}

/// Flattens a 1-D array or a single-column 2-D array.
fn as_univariate<D: Dimension>(x: &ArrayView<'_, f64, D>) -> Result<Vec<f64>> {
  let shape = x.shape();
  let univariate = match shape.len() {
    1 => true,
    2 => shape[1] == 1,
    _ => false,
  };
  if !univariate {
    return Err(StationarityError::invalid(format!(
      "DFGLS: x must be a 1d array or a 2d array with a single column, got shape {shape:?}"
    )));
  }
  Ok(x.iter().copied().collect())
}

/// OLS coefficients of the quasi-differenced deterministic regression.
///
/// Returns the level, followed by the slope on `t = 1..n` for
/// [`DFGLSTrend::ConstantTrend`].
pub(crate) fn gls_coefficients(y: &[f64], trend: DFGLSTrend) -> Result<Vec<f64>> {
  let n = y.len();
  let alpha = trend.gls_alpha(n);
  let k = DeterministicTerm::from(trend).n_terms();
  debug!(n, gls_alpha = alpha, ?trend, "GLS detrending");

  let mut endog = Vec::with_capacity(n);
  let mut exog = Vec::with_capacity(n);
  for t in 0..n {
    if t == 0 {
      endog.push(y[0]);
      exog.push(vec![1.0; k]);
      continue;
    }

    endog.push(y[t] - alpha * y[t - 1]);
    let mut row = Vec::with_capacity(k);
    row.push(1.0 - alpha);
    if trend == DFGLSTrend::ConstantTrend {
      // Index runs 1..=n, so period t + 1 follows period t.
      row.push((t + 1) as f64 - alpha * t as f64);
    }
    exog.push(row);
  }

  let fit = ols(&endog, &exog)?;
  trace!(coefficients = ?fit.beta, "GLS deterministic component");
  Ok(fit.beta)
}

/// Subtracts the fitted deterministic component from the original series.
pub(crate) fn remove_deterministic(y: &[f64], coef: &[f64], trend: DFGLSTrend) -> Result<Vec<f64>> {
  let k = DeterministicTerm::from(trend).n_terms();
  if coef.len() != k {
    return Err(StationarityError::invalid(format!(
      "expected {k} deterministic coefficients, got {}",
      coef.len()
    )));
  }

  let adjusted = y
    .iter()
    .enumerate()
    .map(|(t, &v)| match trend {
      DFGLSTrend::Constant => v - coef[0],
      DFGLSTrend::ConstantTrend => v - coef[0] - coef[1] * (t + 1) as f64,
    })
    .collect();
  Ok(adjusted)
}

/// Elliott-Rothenberg-Stock DF-GLS test.
///
/// Accepts a 1-D array or a single-column 2-D array. For
/// [`DFGLSTrend::ConstantTrend`] the p-value and critical values are taken
/// from the constant-only MacKinnon surface at the terminal regression's
/// sample size.
///
/// # Errors
/// `InvalidArgument` on a bad shape, fewer than [`DFGLS_MIN_OBS`] or
/// non-finite observations, or an invalid config. `SingularDesign` if the
/// deterministic component explains the whole series, or an auxiliary
/// regression design is rank-deficient.
pub fn dfgls<D: Dimension>(x: ArrayView<'_, f64, D>, cfg: DFGLSConfig) -> Result<DFGLSResult> {
  let y = as_univariate(&x)?;
  validate_series(&y, DFGLS_MIN_OBS)?;
  validate_alpha(cfg.alpha)?;

  let coef = gls_coefficients(&y, cfg.trend)?;
  let y_detrended = remove_deterministic(&y, &coef, cfg.trend)?;

  let (lo, hi) = y
    .iter()
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
  let spread = hi - lo;
  if spread == 0.0 || y_detrended.iter().all(|v| v.abs() <= spread * DEGENERATE_TOL) {
    return Err(StationarityError::SingularDesign {
      rank: 0,
      columns: 1,
    });
  }

  let adf = adf_test(
    &y_detrended,
    ADFConfig {
      deterministic: DeterministicTerm::None,
      lag_selection: cfg.lag_selection,
      max_lags: cfg.max_lags,
      alpha: cfg.alpha,
    },
  )?;

  let (p_value, critical_values) = match cfg.trend {
    DFGLSTrend::Constant => (adf.p_value, adf.critical_values),
    DFGLSTrend::ConstantTrend => {
      debug!(
        statistic = adf.statistic,
        nobs = adf.nobs,
        "re-evaluating trend case on the constant-only surface"
      );
      (
        mackinnon_p_value(adf.statistic, DeterministicTerm::Constant, 1)?,
        mackinnon_critical_values(1, DeterministicTerm::Constant, Some(adf.nobs))?,
      )
    }
  };
  let reject_unit_root = adf.statistic < critical_values.value_at(cfg.alpha);

  Ok(DFGLSResult {
    statistic: adf.statistic,
    p_value,
    used_lags: adf.used_lags,
    nobs: adf.nobs,
    critical_values,
    ic_best: adf.ic_best,
    reject_unit_root,
  })
}
