//! # dfgls-rs
//!
//! Unit-root testing for univariate time series: the Elliott-Rothenberg-Stock
//! DF-GLS test, built on an Augmented Dickey-Fuller engine with automatic lag
//! selection and MacKinnon response-surface p-values.
//!
//! ```ignore
//! use dfgls_rs::stats::stationarity::dfgls::{dfgls, DFGLSConfig, DFGLSTrend};
//!
//! let cfg = DFGLSConfig { trend: DFGLSTrend::ConstantTrend, ..DFGLSConfig::default() };
//! let res = dfgls(ndarray::aview1(&series), cfg)?;
//! println!("{} (p = {})", res.statistic, res.p_value);
//! ```
pub mod stats;

pub use stats::stationarity::dfgls::DFGLSConfig;
pub use stats::stationarity::dfgls::DFGLSResult;
pub use stats::stationarity::dfgls::DFGLSTrend;
pub use stats::stationarity::dfgls::dfgls;
