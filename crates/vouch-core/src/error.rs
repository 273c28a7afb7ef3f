//! Error types for `vouch-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Caller-supplied input failed a format or presence check. Always raised
  /// before any store access.
  #[error("invalid argument: {0}")]
  InvalidArgument(&'static str),

  /// No record exists for the identifier. Only raised by operations where
  /// disclosing existence is intentional.
  #[error("no identity registered for {0}")]
  NotFound(String),

  /// A conditional write lost to a concurrent writer twice in a row.
  #[error("conflicting concurrent update for {0}")]
  Conflict(String),

  /// The backing store failed. Propagated unchanged; retry policy belongs to
  /// the caller.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into the [`Error::Store`] variant.
  pub(crate) fn store<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
