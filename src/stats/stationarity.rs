//! Stationarity and unit-root tests.

mod common;

pub mod adf;
pub mod dfgls;
pub mod error;
pub mod mackinnon;

pub use common::CriticalValues;
pub use common::DeterministicTerm;
pub use common::LagSelection;
pub use common::OlsResult;
pub use common::ols;
pub use error::Result;
pub use error::StationarityError;
