use std::f64::consts::PI;
use std::str::FromStr;

use nalgebra::DMatrix;
use nalgebra::DVector;

use super::error::Result;
use super::error::StationarityError;

/// One-sided 5% standard normal quantile, the stopping rule of t-stat lag search.
const TSTAT_STOP: f64 = 1.644_853_626_951_472_2;

/// Deterministic terms included in an ADF-type regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeterministicTerm {
  None,
  Constant,
  ConstantTrend,
}

impl DeterministicTerm {
  /// Number of deterministic regressors.
  pub fn n_terms(self) -> usize {
    match self {
      DeterministicTerm::None => 0,
      DeterministicTerm::Constant => 1,
      DeterministicTerm::ConstantTrend => 2,
    }
  }
}

impl FromStr for DeterministicTerm {
  type Err = StationarityError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "n" | "nc" | "none" => Ok(DeterministicTerm::None),
      "c" | "constant" => Ok(DeterministicTerm::Constant),
      "ct" | "constant_trend" => Ok(DeterministicTerm::ConstantTrend),
      other => Err(StationarityError::invalid(format!(
        "regression option '{other}' not understood"
      ))),
    }
  }
}

/// Lag-order selection rule for the ADF auxiliary regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LagSelection {
  /// No search: the maximum lag is used as the lag order.
  Fixed,
  /// Akaike information criterion.
  Aic,
  /// Bayesian information criterion.
  Bic,
  /// General-to-specific: last lag significant at the 5% level.
  TStat,
}

impl FromStr for LagSelection {
  type Err = StationarityError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "aic" => Ok(LagSelection::Aic),
      "bic" => Ok(LagSelection::Bic),
      "t-stat" | "tstat" => Ok(LagSelection::TStat),
      "none" | "fixed" => Ok(LagSelection::Fixed),
      other => Err(StationarityError::invalid(format!(
        "information criterion '{other}' not understood"
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
  pub one_percent: f64,
  pub five_percent: f64,
  pub ten_percent: f64,
}

impl CriticalValues {
  pub fn value_at(self, alpha: f64) -> f64 {
    if alpha <= 0.01 {
      self.one_percent
    } else if alpha <= 0.05 {
      self.five_percent
    } else {
      self.ten_percent
    }
  }

  /// Critical values keyed by significance label (`"1%"`, `"5%"`, `"10%"`).
  pub fn labelled(self) -> [(&'static str, f64); 3] {
    [
      ("1%", self.one_percent),
      ("5%", self.five_percent),
      ("10%", self.ten_percent),
    ]
  }
}

#[derive(Debug, Clone)]
pub struct OlsResult {
  pub beta: Vec<f64>,
  pub std_err: Vec<f64>,
  pub t_values: Vec<f64>,
  pub residuals: Vec<f64>,
  pub ssr: f64,
  pub sigma2: f64,
  pub nobs: usize,
  pub k: usize,
}

impl OlsResult {
  /// Gaussian log-likelihood evaluated at the OLS estimate.
  pub fn llf(&self) -> f64 {
    let n = self.nobs as f64;
    -0.5 * n * ((2.0 * PI).ln() + (self.ssr / n).ln() + 1.0)
  }

  pub fn aic(&self) -> f64 {
    -2.0 * self.llf() + 2.0 * self.k as f64
  }

  pub fn bic(&self) -> f64 {
    -2.0 * self.llf() + (self.nobs as f64).ln() * self.k as f64
  }
}

#[derive(Debug, Clone, Copy)]
pub struct AdfFit {
  /// t-value of the lagged level coefficient.
  pub statistic: f64,
  pub nobs: usize,
}

pub fn validate_series(y: &[f64], min_n: usize) -> Result<()> {
  if y.len() < min_n {
    return Err(StationarityError::invalid(format!(
      "series must have at least {min_n} observations, got {}",
      y.len()
    )));
  }
  if !y.iter().all(|v| v.is_finite()) {
    return Err(StationarityError::invalid(
      "series must contain only finite values",
    ));
  }
  Ok(())
}

pub fn validate_alpha(alpha: f64) -> Result<()> {
  if alpha > 0.0 && alpha < 1.0 {
    Ok(())
  } else {
    Err(StationarityError::invalid(format!(
      "alpha must be in (0, 1), got {alpha}"
    )))
  }
}

pub fn difference(y: &[f64]) -> Vec<f64> {
  y.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Largest lag order the ADF regression accepts: `n/2 - ntrend - 1`.
pub fn max_lag_bound(n: usize, det: DeterministicTerm) -> Option<usize> {
  (n / 2).checked_sub(det.n_terms() + 1)
}

/// Schwert (1989) rule `ceil(12 (n/100)^{1/4})`, clamped to [`max_lag_bound`].
pub fn schwert_max_lags(n: usize, det: DeterministicTerm) -> Result<usize> {
  let bound = max_lag_bound(n, det).ok_or_else(|| {
    StationarityError::invalid("sample size is too short to use selected regression component")
  })?;
  let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
  Ok(schwert.min(bound))
}

pub fn ols(y: &[f64], x: &[Vec<f64>]) -> Result<OlsResult> {
  if y.is_empty() {
    return Err(StationarityError::invalid("OLS requires non-empty response"));
  }
  if y.len() != x.len() {
    return Err(StationarityError::invalid(format!(
      "OLS y/x row mismatch ({} vs {})",
      y.len(),
      x.len()
    )));
  }
  let n = y.len();
  let k = x[0].len();
  if k == 0 {
    return Err(StationarityError::invalid(
      "OLS requires at least one regressor",
    ));
  }
  if x.iter().any(|row| row.len() != k) {
    return Err(StationarityError::invalid(
      "OLS design matrix must be rectangular",
    ));
  }
  if n <= k {
    return Err(StationarityError::invalid(
      "OLS requires nobs > number of regressors",
    ));
  }

  let mut flat_x = Vec::with_capacity(n * k);
  for row in x {
    flat_x.extend_from_slice(row);
  }

  let x_mat = DMatrix::from_row_slice(n, k, &flat_x);
  let y_vec = DVector::from_row_slice(y);

  let svd = x_mat.clone().svd(true, true);
  let s_max = svd.singular_values.max();
  let tol = s_max * (n.max(k) as f64) * f64::EPSILON;
  let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
  let singular = StationarityError::SingularDesign { rank, columns: k };
  if rank < k {
    return Err(singular);
  }

  let beta = svd.solve(&y_vec, tol).map_err(|_| singular.clone())?;
  let v_t = svd.v_t.as_ref().ok_or(singular)?;
  let inv_s2 = svd.singular_values.map(|s| 1.0 / (s * s));
  let xtx_inv = v_t.transpose() * DMatrix::from_diagonal(&inv_s2) * v_t;

  let fitted = &x_mat * &beta;
  let residuals_vec = y_vec - fitted;

  let residuals: Vec<f64> = residuals_vec.iter().copied().collect();
  let ssr = residuals.iter().map(|u| u * u).sum::<f64>();
  let dof = (n - k) as f64;
  let sigma2 = (ssr / dof).max(0.0);

  let mut std_err = vec![0.0; k];
  let mut t_values = vec![0.0; k];
  for i in 0..k {
    std_err[i] = (xtx_inv[(i, i)] * sigma2).max(0.0).sqrt();
    t_values[i] = if std_err[i] > 0.0 {
      beta[i] / std_err[i]
    } else {
      f64::NAN
    };
  }

  Ok(OlsResult {
    beta: beta.iter().copied().collect(),
    std_err,
    t_values,
    residuals,
    ssr,
    sigma2,
    nobs: n,
    k,
  })
}

/// Builds `dy_t ~ [deterministics, y_{t-1}, dy_{t-1}, .., dy_{t-lags}]`.
///
/// The first `trim` differences are dropped (`trim >= lags`), so candidate
/// lags of one search share a common sample. Returns the response, the
/// design rows and the column index of `y_{t-1}`.
fn build_adf_design(
  y: &[f64],
  dy: &[f64],
  lags: usize,
  trim: usize,
  det: DeterministicTerm,
) -> (Vec<f64>, Vec<Vec<f64>>, usize) {
  let n_dy = dy.len();
  let gamma_index = det.n_terms();

  let mut lhs = Vec::with_capacity(n_dy.saturating_sub(trim));
  let mut rhs = Vec::with_capacity(n_dy.saturating_sub(trim));

  for (row_no, t) in (trim..n_dy).enumerate() {
    lhs.push(dy[t]);

    let mut row = Vec::with_capacity(gamma_index + 1 + lags);
    match det {
      DeterministicTerm::None => {}
      DeterministicTerm::Constant => row.push(1.0),
      DeterministicTerm::ConstantTrend => {
        row.push(1.0);
        row.push((row_no + 1) as f64);
      }
    }

    // dy[t] = y[t+1] - y[t], so the lagged level is y[t].
    row.push(y[t]);

    for i in 1..=lags {
      row.push(dy[t - i]);
    }

    rhs.push(row);
  }

  (lhs, rhs, gamma_index)
}

pub fn fit_adf(y: &[f64], lags: usize, det: DeterministicTerm) -> Result<AdfFit> {
  let dy = difference(y);
  if dy.len() <= lags {
    return Err(StationarityError::invalid(format!(
      "lag order {lags} too large for {} observations",
      y.len()
    )));
  }

  let (lhs, rhs, gamma_index) = build_adf_design(y, &dy, lags, lags, det);
  let fit = ols(&lhs, &rhs)?;

  Ok(AdfFit {
    statistic: fit.t_values[gamma_index],
    nobs: fit.nobs,
  })
}

/// Searches lags `0..=max_lags` on the sample trimmed by `max_lags`.
///
/// Returns the chosen lag and the criterion value attached to it (the
/// minimum AIC/BIC, or `|t|` of the last lag for [`LagSelection::TStat`]).
/// [`LagSelection::Fixed`] returns `max_lags` without fitting.
pub fn choose_lag_for_adf(
  y: &[f64],
  det: DeterministicTerm,
  lag_selection: LagSelection,
  max_lags: usize,
) -> Result<(usize, Option<f64>)> {
  if lag_selection == LagSelection::Fixed {
    return Ok((max_lags, None));
  }

  let dy = difference(y);
  if dy.len() <= max_lags {
    return Err(StationarityError::invalid(format!(
      "max lag {max_lags} too large for {} observations",
      y.len()
    )));
  }

  let mut fits = Vec::with_capacity(max_lags + 1);
  for lag in 0..=max_lags {
    let (lhs, rhs, _) = build_adf_design(y, &dy, lag, max_lags, det);
    fits.push(ols(&lhs, &rhs)?);
  }

  match lag_selection {
    LagSelection::Aic | LagSelection::Bic => {
      let mut best_lag = 0usize;
      let mut best_score = f64::INFINITY;
      for (lag, fit) in fits.iter().enumerate() {
        let ic = if lag_selection == LagSelection::Aic {
          fit.aic()
        } else {
          fit.bic()
        };
        if ic < best_score {
          best_score = ic;
          best_lag = lag;
        }
      }
      Ok((best_lag, Some(best_score)))
    }
    LagSelection::TStat => {
      let mut chosen = (max_lags, 0.0);
      for (lag, fit) in fits.iter().enumerate().rev() {
        let t_last = fit.t_values[fit.k - 1].abs();
        chosen = (lag, t_last);
        if t_last >= TSTAT_STOP {
          break;
        }
      }
      Ok((chosen.0, Some(chosen.1)))
    }
    LagSelection::Fixed => Ok((max_lags, None)),
  }
}
