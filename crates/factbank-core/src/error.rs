//! Error types for `factbank-core`.
//!
//! Only unrecoverable defects surface here. An offset that cannot be
//! recovered is not an error in this sense; it lands in the diagnostics log
//! kept by [`crate::offsets::OffsetResolver`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(
    "source {local_id:?} in {file}#{sentence} (level {level}) has no parent \
     {parent:?} one level up"
  )]
  OrphanSource {
    file:     String,
    sentence: i64,
    local_id: String,
    parent:   Option<String>,
    level:    u8,
  },

  #[error("no file offset base for {file}#{sentence}")]
  MissingBaseOffset { file: String, sentence: i64 },

  #[error("no dependency parse for sentence {0:?}")]
  MissingParse(String),

  #[error("parse provider error: {0}")]
  Parse(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
