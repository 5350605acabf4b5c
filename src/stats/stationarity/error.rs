use thiserror::Error;

/// Errors raised by the stationarity and unit-root tests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StationarityError {
  /// Bad option token, series shape, sample length or tuning constant.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),
  /// The regression design matrix does not have full column rank.
  #[error("singular design matrix (rank {rank} < {columns} columns)")]
  SingularDesign { rank: usize, columns: usize },
}

impl StationarityError {
  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidArgument(msg.into())
  }
}

pub type Result<T> = std::result::Result<T, StationarityError>;
