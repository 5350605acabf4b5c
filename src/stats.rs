//! # Stats
//!
//! $$
//! y_t=d_t+u_t,\qquad u_t=\rho u_{t-1}+\varepsilon_t,\qquad H_0:\rho=1
//! $$
//!
pub mod stationarity;
