//! Decoding helpers between FactBank's quoted text columns and the corpus
//! types in `factbank-core`.
//!
//! FactBank stores its string columns with their original quoting still
//! attached. Identifier-like columns (`file`, `relSourceId`, `eText`) carry
//! one wrapping character on each side; free-text columns (`sent`,
//! `relSourceText`, `factValue`) carry one in front and two behind. Event ids
//! are compared as stored and are never unquoted.

use std::collections::HashMap;

use factbank_core::corpus::{
  Corpus, DeclaredAttitude, DeclaredSource, RawOffsets, SentenceKey, SentenceRow,
  TargetRef,
};

use crate::{Error, Result};

/// Strip `lead` characters from the front and `trail` from the back.
pub fn strip_wrapping(
  raw: &str,
  lead: usize,
  trail: usize,
  table: &'static str,
  column: &'static str,
) -> Result<String> {
  let len = raw.chars().count();
  if len < lead + trail {
    return Err(Error::MalformedField { table, column, value: raw.to_owned() });
  }
  Ok(raw.chars().skip(lead).take(len - lead - trail).collect())
}

fn key(raw_file: &str, sentence: i64, table: &'static str) -> Result<SentenceKey> {
  Ok(SentenceKey::new(strip_wrapping(raw_file, 1, 1, table, "file")?, sentence))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `sentences` row.
pub struct RawSentence {
  pub file:     String,
  pub sentence: i64,
  pub text:     String,
}

/// `offsets` row for the first token of a sentence.
pub struct RawBaseOffset {
  pub file:     String,
  pub sentence: i64,
  pub offset:   Option<i64>,
}

pub struct RawRelSource {
  pub file:       String,
  pub sentence:   i64,
  pub local_id:   String,
  pub descriptor: String,
}

/// `fb_source` joined with `offsets`.
pub struct RawSourceOffsets {
  pub file:     String,
  pub sentence: i64,
  pub start:    Option<i64>,
  pub end:      Option<i64>,
}

/// `tokens_tml` joined with `fb_factValue`.
pub struct RawTarget {
  pub file:      String,
  pub sentence:  i64,
  pub event_id:  String,
  pub token_loc: i64,
  pub head:      String,
}

pub struct RawTokenOffsets {
  pub file:      String,
  pub sentence:  i64,
  pub token_loc: i64,
  pub start:     Option<i64>,
  pub end:       Option<i64>,
}

pub struct RawFactValue {
  pub file:     String,
  pub sentence: i64,
  pub local_id: String,
  pub event_id: String,
  pub label:    String,
}

/// Every extraction query's rows, as read.
#[derive(Default)]
pub struct RawCorpus {
  pub sentences:      Vec<RawSentence>,
  pub base_offsets:   Vec<RawBaseOffset>,
  pub rel_sources:    Vec<RawRelSource>,
  pub source_offsets: Vec<RawSourceOffsets>,
  pub targets:        Vec<RawTarget>,
  pub token_offsets:  Vec<RawTokenOffsets>,
  pub fact_values:    Vec<RawFactValue>,
}

impl RawCorpus {
  pub fn into_corpus(self) -> Result<Corpus> {
    let mut corpus = Corpus::default();

    for row in self.sentences {
      let key = key(&row.file, row.sentence, "sentences")?;
      let text = strip_wrapping(&row.text, 1, 2, "sentences", "sent")?;
      corpus.annotations_mut(&key);
      corpus.sentences.push(SentenceRow { key, text });
    }

    for row in self.base_offsets {
      let key = key(&row.file, row.sentence, "offsets")?;
      corpus.annotations_mut(&key).base_offset = row.offset;
    }

    // fb_source is joined per sentence, not per source, so one approximate
    // pair serves every source of the sentence. Later rows overwrite.
    let mut approx = HashMap::new();
    for row in self.source_offsets {
      let key = key(&row.file, row.sentence, "fb_source")?;
      approx.insert(key, RawOffsets { start: row.start, end: row.end });
    }

    for row in self.rel_sources {
      let key = key(&row.file, row.sentence, "fb_relSource")?;
      let local_id =
        strip_wrapping(&row.local_id, 1, 1, "fb_relSource", "relSourceId")?;
      let descriptor =
        strip_wrapping(&row.descriptor, 1, 2, "fb_relSource", "relSourceText")?;
      let approx = approx.get(&key).copied().unwrap_or_default();
      corpus
        .annotations_mut(&key)
        .sources
        .push(DeclaredSource { local_id, descriptor, approx });
    }

    for row in self.targets {
      let key = key(&row.file, row.sentence, "tokens_tml")?;
      let head = strip_wrapping(&row.head, 1, 1, "fb_factValue", "eText")?;
      corpus
        .annotations_mut(&key)
        .targets
        .insert(row.event_id, TargetRef { token_loc: row.token_loc, head });
    }

    for row in self.token_offsets {
      let key = key(&row.file, row.sentence, "offsets")?;
      corpus
        .annotations_mut(&key)
        .token_offsets
        .insert(row.token_loc, RawOffsets { start: row.start, end: row.end });
    }

    for row in self.fact_values {
      let key = key(&row.file, row.sentence, "fb_factValue")?;
      let local_id =
        strip_wrapping(&row.local_id, 1, 1, "fb_factValue", "relSourceId")?;
      let label = strip_wrapping(&row.label, 1, 2, "fb_factValue", "factValue")?;
      corpus
        .annotations_mut(&key)
        .attitudes
        .entry(local_id)
        .or_default()
        .push(DeclaredAttitude { event_id: row.event_id, label });
    }

    Ok(corpus)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_asymmetric_wrapping() {
    let text = strip_wrapping("'John said.''", 1, 2, "sentences", "sent").unwrap();
    assert_eq!(text, "John said.");
    let id = strip_wrapping("'s1_s0'", 1, 1, "fb_relSource", "relSourceId").unwrap();
    assert_eq!(id, "s1_s0");
  }

  #[test]
  fn counts_characters_not_bytes() {
    let text = strip_wrapping("«café»»", 1, 2, "sentences", "sent").unwrap();
    assert_eq!(text, "café");
  }

  #[test]
  fn rejects_values_shorter_than_their_wrapping() {
    let err = strip_wrapping("'", 1, 2, "fb_factValue", "factValue").unwrap_err();
    assert!(matches!(err, Error::MalformedField { column: "factValue", .. }));
    assert_eq!(strip_wrapping("''", 1, 1, "t", "c").unwrap(), "");
  }
}
