//! Storage seams: where the corpus comes from and where records go.
//!
//! Implemented by storage backends (e.g. `factbank-store-sqlite`). The
//! pipeline itself never touches storage; the binary loads a [`Corpus`],
//! runs the processor, and hands the result to a [`MasterSink`].

use std::future::Future;

use crate::{corpus::Corpus, model::MasterRecords};

/// A relational extraction of FactBank.
pub trait CorpusSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read every sentence with its sources, attitudes, targets and offsets.
  fn load_corpus(&self) -> impl Future<Output = Result<Corpus, Self::Error>> + Send + '_;
}

/// The persistence target for a finished run.
pub trait MasterSink: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist all record sets. Implementations write them atomically:
  /// either every record lands or none does.
  fn write_master(
    &self,
    records: MasterRecords,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
