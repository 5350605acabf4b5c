//! MacKinnon response surfaces for Dickey-Fuller tau statistics.
//!
//! p-values follow MacKinnon (1994), critical values MacKinnon (2010).
//! Only the single-series (`N = 1`) rows are tabulated.

use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

use super::common::CriticalValues;
use super::common::DeterministicTerm;
use super::error::Result;
use super::error::StationarityError;

struct PValueSurface {
  max_stat: f64,
  min_stat: f64,
  star_stat: f64,
  small_p: [f64; 3],
  large_p: [f64; 4],
}

// Coefficients are stored pre-scaled (small-p by [1, 1, 1e-2], large-p by
// [1, 1e-1, 1e-1, 1e-2]) in increasing polynomial order.
const TAU_NC: PValueSurface = PValueSurface {
  max_stat: f64::INFINITY,
  min_stat: -19.04,
  star_stat: -1.04,
  small_p: [0.6344, 1.2378, 3.2496e-2],
  large_p: [0.4797, 9.3557e-1, -6.999e-2, 3.3066e-2],
};

const TAU_C: PValueSurface = PValueSurface {
  max_stat: 2.74,
  min_stat: -18.83,
  star_stat: -1.61,
  small_p: [2.1659, 1.4412, 3.8269e-2],
  large_p: [1.7339, 9.3202e-1, -1.2745e-1, -1.0368e-2],
};

const TAU_CT: PValueSurface = PValueSurface {
  max_stat: 0.7,
  min_stat: -16.18,
  star_stat: -2.89,
  small_p: [3.2512, 1.6047, 4.9588e-2],
  large_p: [2.5261, 6.1654e-1, -3.7956e-1, -6.0285e-2],
};

/// `[c0, c1, c2, c3]` per level (1%, 5%, 10%): `cv(T) = c0 + c1/T + c2/T^2 + c3/T^3`.
const CRIT_NC: [[f64; 4]; 3] = [
  [-2.56574, -2.2358, -3.627, 0.0],
  [-1.94100, -0.2686, -3.365, 31.223],
  [-1.61682, 0.2656, -2.714, 25.364],
];

const CRIT_C: [[f64; 4]; 3] = [
  [-3.43035, -6.5393, -16.786, -79.433],
  [-2.86154, -2.8903, -4.234, -40.040],
  [-2.56677, -1.5384, -2.809, 0.0],
];

const CRIT_CT: [[f64; 4]; 3] = [
  [-3.95877, -9.0531, -28.428, -134.155],
  [-3.41049, -4.3904, -9.036, -45.374],
  [-3.12705, -2.5856, -3.925, -22.380],
];

fn check_n_series(n_series: usize) -> Result<()> {
  if n_series == 1 {
    Ok(())
  } else {
    Err(StationarityError::invalid(format!(
      "MacKinnon surfaces are tabulated for a single series only, got N = {n_series}"
    )))
  }
}

fn polyval(coef: &[f64], x: f64) -> f64 {
  coef.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Approximate asymptotic p-value of a tau statistic.
pub fn mackinnon_p_value(stat: f64, det: DeterministicTerm, n_series: usize) -> Result<f64> {
  check_n_series(n_series)?;
  let surface = match det {
    DeterministicTerm::None => &TAU_NC,
    DeterministicTerm::Constant => &TAU_C,
    DeterministicTerm::ConstantTrend => &TAU_CT,
  };

  if stat > surface.max_stat {
    return Ok(1.0);
  }
  if stat < surface.min_stat {
    return Ok(0.0);
  }
  let z = if stat <= surface.star_stat {
    polyval(&surface.small_p, stat)
  } else {
    polyval(&surface.large_p, stat)
  };
  let std_normal =
    Normal::new(0.0, 1.0).map_err(|e| StationarityError::invalid(e.to_string()))?;
  Ok(std_normal.cdf(z))
}

/// Critical values at 1%, 5% and 10%.
///
/// `nobs = None` returns the asymptotic values.
pub fn mackinnon_critical_values(
  n_series: usize,
  det: DeterministicTerm,
  nobs: Option<usize>,
) -> Result<CriticalValues> {
  check_n_series(n_series)?;
  let table = match det {
    DeterministicTerm::None => &CRIT_NC,
    DeterministicTerm::Constant => &CRIT_C,
    DeterministicTerm::ConstantTrend => &CRIT_CT,
  };

  let at = |row: &[f64; 4]| match nobs {
    Some(0) => f64::NEG_INFINITY,
    Some(t) => polyval(row, 1.0 / t as f64),
    None => row[0],
  };

  Ok(CriticalValues {
    one_percent: at(&table[0]),
    five_percent: at(&table[1]),
    ten_percent: at(&table[2]),
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  #[test]
  fn p_values_on_the_no_constant_surface() {
    let p = mackinnon_p_value(0.32491, DeterministicTerm::None, 1).unwrap();
    assert_abs_diff_eq!(p, 0.78154, epsilon = 1e-5);
    let p = mackinnon_p_value(-2.33832, DeterministicTerm::None, 1).unwrap();
    assert_abs_diff_eq!(p, 0.01866, epsilon = 1e-5);
    let p = mackinnon_p_value(-4.07340, DeterministicTerm::None, 1).unwrap();
    assert_abs_diff_eq!(p, 0.00005, epsilon = 1e-5);
  }

  #[test]
  fn five_percent_critical_value_has_five_percent_p_value() {
    for det in [
      DeterministicTerm::None,
      DeterministicTerm::Constant,
      DeterministicTerm::ConstantTrend,
    ] {
      let cv = mackinnon_critical_values(1, det, None).unwrap();
      let p = mackinnon_p_value(cv.five_percent, det, 1).unwrap();
      assert_abs_diff_eq!(p, 0.05, epsilon = 2.5e-3);
    }
  }

  #[test]
  fn p_value_is_monotone_and_clipped() {
    let mut prev = 0.0;
    for i in 0..200 {
      let stat = -8.0 + 0.05 * i as f64;
      let p = mackinnon_p_value(stat, DeterministicTerm::Constant, 1).unwrap();
      assert!(p >= prev, "p-value decreased at stat = {stat}");
      prev = p;
    }
    assert_eq!(mackinnon_p_value(3.0, DeterministicTerm::Constant, 1).unwrap(), 1.0);
    assert_eq!(mackinnon_p_value(-20.0, DeterministicTerm::ConstantTrend, 1).unwrap(), 0.0);
  }

  #[test]
  fn finite_sample_critical_values() {
    let cv = mackinnon_critical_values(1, DeterministicTerm::Constant, Some(100)).unwrap();
    assert_abs_diff_eq!(cv.five_percent, -2.8909064, epsilon = 1e-7);
    let asym = mackinnon_critical_values(1, DeterministicTerm::Constant, None).unwrap();
    assert_eq!(asym.one_percent, -3.43035);
    assert!(cv.one_percent < asym.one_percent);
  }

  #[test]
  fn multiple_series_are_rejected() {
    assert!(matches!(
      mackinnon_p_value(-2.0, DeterministicTerm::Constant, 2),
      Err(StationarityError::InvalidArgument(_))
    ));
    assert!(mackinnon_critical_values(0, DeterministicTerm::None, None).is_err());
  }
}
