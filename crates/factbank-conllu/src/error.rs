//! Error types for the CoNLL-U reader.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("line {line}: expected 10 tab-separated columns, found {found}")]
  ColumnCount { line: usize, found: usize },

  #[error("line {line}: invalid {column} value {value:?}")]
  InvalidField {
    line:   usize,
    column: &'static str,
    value:  String,
  },

  #[error("line {line}: token ids must run 1..n, expected {expected}")]
  TokenOrder { line: usize, expected: usize },

  #[error("line {line}: head {head} points outside a sentence of {len} tokens")]
  HeadOutOfRange { line: usize, head: usize, len: usize },

  #[error("line {line}: token {form:?} not found in sentence text {text:?}")]
  Unaligned {
    line: usize,
    form: String,
    text: String,
  },

  #[error("line {line}: sentence has no tokens")]
  EmptySentence { line: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
