//! Error type for `factbank-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] factbank_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A quoted column value too short to carry its wrapping characters.
  #[error("malformed {table}.{column} value: {value:?}")]
  MalformedField {
    table:  &'static str,
    column: &'static str,
    value:  String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
