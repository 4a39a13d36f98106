//! [`SqliteMaster`]: writes a finished run into the master schema.

use std::path::Path;

use rusqlite::params;
use tracing::info;

use factbank_core::{model::MasterRecords, store::MasterSink};

use crate::{schema::MASTER_SCHEMA, Result};

/// The master database (`fb_master.db`). Opening it (re)creates the schema.
#[derive(Clone)]
pub struct SqliteMaster {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteMaster {
  /// Open (or create) a master database at `path` and reset its schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let master = Self { conn };
    master.init_schema().await?;
    Ok(master)
  }

  /// Open an in-memory master database, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let master = Self { conn };
    master.init_schema().await?;
    Ok(master)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(MASTER_SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl MasterSink for SqliteMaster {
  type Error = crate::Error;

  async fn write_master(&self, records: MasterRecords) -> Result<()> {
    let counts = (
      records.sentences.len(),
      records.mentions.len(),
      records.sources.len(),
      records.attitudes.len(),
      records.errors.len(),
    );

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO sentences (sentence_id, file, file_sentence_id, sentence)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for s in &records.sentences {
            stmt.execute(params![
              s.sentence_id.get(),
              s.file,
              s.file_sentence_id,
              s.text
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO mentions (
               token_id, sentence_id, token_text, token_offset_start,
               token_offset_end, phrase_text, phrase_offset_start,
               phrase_offset_end
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for m in &records.mentions {
            let (start, end) = m.token_offsets();
            let phrase = m.phrase.as_ref();
            stmt.execute(params![
              m.mention_id.get(),
              m.sentence_id.get(),
              m.text,
              start,
              end,
              phrase.map(|p| p.text.as_str()),
              phrase.map(|p| p.span.start as i64),
              phrase.map(|p| p.span.end as i64),
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO sources (
               source_id, sentence_id, token_id, parent_source_id,
               nesting_level, [source]
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for s in &records.sources {
            stmt.execute(params![
              s.source_id.get(),
              s.sentence_id.get(),
              s.mention_id.get(),
              s.parent.as_raw(),
              s.nesting_level,
              s.source_text,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO attitudes (
               attitude_id, source_id, target_token_id, label, label_type
             ) VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for a in &records.attitudes {
            stmt.execute(params![
              a.attitude_id.get(),
              a.source_id.get(),
              a.target_mention_id.get(),
              a.label().as_str(),
              a.label_type.as_str(),
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO errors (
               file, file_sentence_id, offset_start, offset_end,
               predicted_head, head, raw_sentence, result_sentence,
               rel_source_text
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for e in &records.errors {
            stmt.execute(params![
              e.file,
              e.file_sentence_id,
              e.offset_start,
              e.offset_end,
              e.predicted_head,
              e.head,
              e.raw_sentence,
              e.result_sentence,
              e.rel_source_text,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    let (sentences, mentions, sources, attitudes, errors) = counts;
    info!(sentences, mentions, sources, attitudes, errors, "master records written");
    Ok(())
  }
}
