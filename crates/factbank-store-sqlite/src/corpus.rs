//! [`SqliteCorpus`]: reads a FactBank extraction from its relational form.

use std::path::Path;

use rusqlite::OpenFlags;
use tracing::debug;

use factbank_core::{corpus::Corpus, store::CorpusSource};

use crate::{
  encode::{
    RawBaseOffset, RawCorpus, RawFactValue, RawRelSource, RawSentence,
    RawSourceOffsets, RawTarget, RawTokenOffsets,
  },
  schema::{
    BASE_OFFSETS_QUERY, FACT_VALUES_QUERY, REL_SOURCES_QUERY, SENTENCES_QUERY,
    SOURCE_OFFSETS_QUERY, TARGETS_QUERY, TOKEN_OFFSETS_QUERY,
  },
  Result,
};

/// A FactBank database (`factbank_data.db`), opened read-only.
#[derive(Clone)]
pub struct SqliteCorpus {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteCorpus {
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .await?;
    Ok(Self { conn })
  }

  /// Wrap an already-open connection, e.g. an in-memory database a test
  /// has populated.
  pub fn from_connection(conn: tokio_rusqlite::Connection) -> Self {
    Self { conn }
  }

  async fn read_raw(&self) -> Result<RawCorpus> {
    let raw = self
      .conn
      .call(|conn| {
        let mut raw = RawCorpus::default();

        let mut stmt = conn.prepare(SENTENCES_QUERY)?;
        raw.sentences = stmt
          .query_map([], |r| {
            Ok(RawSentence { file: r.get(0)?, sentence: r.get(1)?, text: r.get(2)? })
          })?
          .collect::<rusqlite::Result<_>>()?;

        let mut stmt = conn.prepare(BASE_OFFSETS_QUERY)?;
        raw.base_offsets = stmt
          .query_map([], |r| {
            Ok(RawBaseOffset {
              file:     r.get(0)?,
              sentence: r.get(1)?,
              offset:   r.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<_>>()?;

        let mut stmt = conn.prepare(REL_SOURCES_QUERY)?;
        raw.rel_sources = stmt
          .query_map([], |r| {
            Ok(RawRelSource {
              file:       r.get(0)?,
              sentence:   r.get(1)?,
              local_id:   r.get(2)?,
              descriptor: r.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<_>>()?;

        let mut stmt = conn.prepare(SOURCE_OFFSETS_QUERY)?;
        raw.source_offsets = stmt
          .query_map([], |r| {
            Ok(RawSourceOffsets {
              file:     r.get(0)?,
              sentence: r.get(1)?,
              start:    r.get(2)?,
              end:      r.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<_>>()?;

        let mut stmt = conn.prepare(TARGETS_QUERY)?;
        raw.targets = stmt
          .query_map([], |r| {
            Ok(RawTarget {
              file:      r.get(0)?,
              sentence:  r.get(1)?,
              event_id:  r.get(2)?,
              token_loc: r.get(3)?,
              head:      r.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<_>>()?;

        let mut stmt = conn.prepare(TOKEN_OFFSETS_QUERY)?;
        raw.token_offsets = stmt
          .query_map([], |r| {
            Ok(RawTokenOffsets {
              file:      r.get(0)?,
              sentence:  r.get(1)?,
              token_loc: r.get(2)?,
              start:     r.get(3)?,
              end:       r.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<_>>()?;

        let mut stmt = conn.prepare(FACT_VALUES_QUERY)?;
        raw.fact_values = stmt
          .query_map([], |r| {
            Ok(RawFactValue {
              file:     r.get(0)?,
              sentence: r.get(1)?,
              local_id: r.get(2)?,
              event_id: r.get(3)?,
              label:    r.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<_>>()?;

        Ok(raw)
      })
      .await?;
    Ok(raw)
  }
}

impl CorpusSource for SqliteCorpus {
  type Error = crate::Error;

  async fn load_corpus(&self) -> Result<Corpus> {
    let raw = self.read_raw().await?;
    debug!(
      sentences = raw.sentences.len(),
      sources = raw.rel_sources.len(),
      fact_values = raw.fact_values.len(),
      "extracted factbank rows"
    );
    raw.into_corpus()
  }
}
